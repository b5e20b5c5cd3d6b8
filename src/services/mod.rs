//! Service Layer
//!
//! The service layer wraps the budget REST API and the issue tracker, and
//! runs fetches on the tokio runtime.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ServiceHub                              │
//! │  ┌──────────────────┐  ┌────────────┐  ┌────────────────┐   │
//! │  │ BudgetClient     │  │  runtime   │  │  generations   │   │
//! │  │ (reqwest)        │  │  (tokio)   │  │  (AtomicU64)   │   │
//! │  └──────────────────┘  └────────────┘  └────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ ServiceEvent
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      State Layer                             │
//! │              (DashboardState, TrackerState, ...)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod events;
mod hub;
#[cfg(test)]
mod mock;
mod runtime;
mod stores;

pub use client::*;
pub use events::*;
pub use hub::*;
#[cfg(test)]
pub use mock::*;
pub use runtime::*;
pub use stores::*;
