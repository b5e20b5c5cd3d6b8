//! Domain - Pure Data Structures and Wire Types
//!
//! These types mirror the budget REST API payloads and carry no I/O.

pub mod aggregation;
pub mod config;
pub mod expense;
pub mod issue;
pub mod overview;
pub mod project;
pub mod report;
pub mod threshold;

pub use aggregation::*;
pub use config::*;
pub use expense::*;
pub use issue::*;
pub use overview::*;
pub use project::*;
pub use report::*;
pub use threshold::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
