//! Edit Buffer
//!
//! Staged copy of the one row currently being edited.

use crate::table::TableRow;

#[derive(Debug)]
pub struct EditBuffer<R: TableRow> {
    row_id: R::Id,
    draft: R,
    committing: bool,
}

impl<R: TableRow> EditBuffer<R> {
    pub fn new(row: &R) -> Self {
        Self {
            row_id: row.id(),
            draft: row.clone(),
            committing: false,
        }
    }

    pub fn row_id(&self) -> &R::Id {
        &self.row_id
    }

    /// The staged row, including uncommitted edits
    pub fn draft(&self) -> &R {
        &self.draft
    }

    /// Whether an update round-trip is in flight
    pub fn is_committing(&self) -> bool {
        self.committing
    }

    pub(crate) fn apply(&mut self, edit: R::Edit) {
        self.draft.apply_edit(edit);
    }

    pub(crate) fn set_committing(&mut self, committing: bool) {
        self.committing = committing;
    }
}
