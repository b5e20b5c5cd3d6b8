//! Budget View Client Library
//!
//! Client-side core of a project budgeting add-on: tabular expense and
//! threshold views with sort, filter, pagination, edit-in-place, confirmed
//! delete and CSV export, fed by the budget REST API.

pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod state;
pub mod table;
pub mod utils;
