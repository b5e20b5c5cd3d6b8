//! State - UI-facing state slices
//!
//! Each slice owns one screen's data, applies `ServiceEvent`s addressed to
//! it and queues notices for the UI to show.

pub mod dashboard_state;
pub mod linked_state;
pub mod notice;
pub mod project_state;
pub mod remaining;
pub mod slot;
pub mod thresholds_state;
pub mod tracker_state;

pub use dashboard_state::*;
pub use linked_state::*;
pub use notice::*;
pub use project_state::*;
pub use remaining::*;
pub use slot::*;
pub use thresholds_state::*;
pub use tracker_state::*;
