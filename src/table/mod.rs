//! Tabular View Engine
//!
//! Generic sort / filter / paginate / edit / delete / export logic over a
//! collection of rows. The engine is pure: network round-trips go through
//! the `RowUpdater` and `RowRemover` ports supplied by the caller.
//!
//! ```text
//! rows ──► filter (all predicates) ──► stable sort ──► page slice ──► visible rows
//!            ▲                           ▲               ▲
//!            └────────── ViewState ──────┴───────────────┘
//! ```

mod column;
mod delete;
mod edit;
mod engine;
mod export;
mod value;
mod view_state;

pub use column::*;
pub use delete::*;
pub use edit::*;
pub use engine::*;
pub use export::*;
pub use value::*;
pub use view_state::*;

use crate::error::Result;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;

/// A record displayable in a tabular view
pub trait TableRow: Clone + Debug {
    /// Stable, unique row identity
    type Id: Clone + Eq + Hash + Debug + Display;
    /// Field edit applicable to a staged copy of the row
    type Edit;

    fn id(&self) -> Self::Id;

    /// Cell value for a column key; unknown keys yield `CellValue::Empty`
    fn cell(&self, key: &str) -> CellValue<'_>;

    fn apply_edit(&mut self, edit: Self::Edit);

    /// Client-side checks run before an edit is sent
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Persists an edited row and returns the canonical version
pub trait RowUpdater<R: TableRow> {
    fn update_row(&self, row: R) -> impl Future<Output = Result<R>> + Send;
}

/// Removes a row from the backing store
pub trait RowRemover<R: TableRow> {
    fn remove_row(&self, id: R::Id) -> impl Future<Output = Result<()>> + Send;
}
