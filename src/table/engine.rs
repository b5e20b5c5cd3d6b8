//! Tabular View
//!
//! Owns the source rows of one table together with its view state, edit
//! buffer and delete flow.

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{Error, Result};
use crate::table::{
    ColumnDescriptor, ColumnFilter, DeleteFlow, DeleteState, EditBuffer, RowRemover, RowUpdater,
    SortDirection, TableRow, ViewState, find_column,
};
use tracing::{debug, info, warn};

pub struct TabularView<R: TableRow> {
    columns: &'static [ColumnDescriptor],
    rows: Vec<R>,
    view: ViewState,
    edit: Option<EditBuffer<R>>,
    delete: DeleteFlow<R::Id>,
}

impl<R: TableRow> TabularView<R> {
    pub fn new(columns: &'static [ColumnDescriptor]) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            view: ViewState::new(DEFAULT_PAGE_SIZE),
            edit: None,
            delete: DeleteFlow::new(),
        }
    }

    /// Start with an ascending sort on `key`
    pub fn with_sort(mut self, key: &str) -> Result<Self> {
        self.set_sort(key)?;
        Ok(self)
    }

    pub fn with_page_size(mut self, size: usize) -> Result<Self> {
        self.set_page_size(size)?;
        Ok(self)
    }

    // ==================== Accessors ====================

    pub fn columns(&self) -> &'static [ColumnDescriptor] {
        self.columns
    }

    pub fn column(&self, key: &str) -> Option<&'static ColumnDescriptor> {
        find_column(self.columns, key)
    }

    /// Source rows in source order
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: &R::Id) -> Option<&R> {
        self.rows.iter().find(|row| &row.id() == id)
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn edit_buffer(&self) -> Option<&EditBuffer<R>> {
        self.edit.as_ref()
    }

    pub fn delete_state(&self) -> &DeleteState<R::Id> {
        self.delete.state()
    }

    pub fn is_editing(&self, id: &R::Id) -> bool {
        self.edit.as_ref().is_some_and(|buffer| buffer.row_id() == id)
    }

    /// The row as it should be displayed: the staged copy while editing
    pub fn display_row<'a>(&'a self, row: &'a R) -> &'a R {
        match &self.edit {
            Some(buffer) if buffer.row_id() == &row.id() => buffer.draft(),
            _ => row,
        }
    }

    // ==================== Source Rows ====================

    /// Replace the whole collection after a successful fetch
    pub fn replace_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;

        let rows = &self.rows;
        let present = |id: &R::Id| rows.iter().any(|row| &row.id() == id);
        if let Some(buffer) = &self.edit
            && !buffer.is_committing()
            && !present(buffer.row_id())
        {
            debug!(row = %buffer.row_id(), "Edited row vanished on refresh, dropping buffer");
            self.edit = None;
        }
        self.delete.forget_pending_unless(present);
        self.clamp_page();
    }

    /// Add a row after a confirmed create
    pub fn insert_row(&mut self, row: R) {
        self.upsert(row);
    }

    fn upsert(&mut self, row: R) {
        let id = row.id();
        match self.rows.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => *slot = row,
            None => self.rows.push(row),
        }
        self.clamp_page();
    }

    // ==================== Derivation ====================

    fn filtered(&self) -> Vec<&R> {
        let filters = &self.view.filters;
        self.rows
            .iter()
            .filter(|row| {
                filters
                    .iter()
                    .all(|(key, filter)| filter.predicate.matches(&row.cell(key)))
            })
            .collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_count(&self) -> usize {
        self.view.page_count(self.filtered_count())
    }

    /// Rows on the current page: filter, stable sort, then slice
    pub fn derive_visible_rows(&self) -> Vec<&R> {
        let mut rows = self.filtered();
        if let Some(key) = self.view.sort_key {
            let direction = self.view.sort_direction;
            rows.sort_by(|a, b| direction.apply(a.cell(key).compare(&b.cell(key))));
        }
        let range = self.view.page_range(rows.len());
        rows.drain(range).collect()
    }

    fn clamp_page(&mut self) {
        let filtered = self.filtered_count();
        self.view.clamp(filtered);
    }

    // ==================== Sorting & Filtering ====================

    /// Sort by `key`; the same key again flips the direction
    pub fn set_sort(&mut self, key: &str) -> Result<()> {
        let column = match self.column(key) {
            Some(column) if column.sortable => column,
            _ => {
                return Err(Error::InvalidColumn {
                    key: key.to_string(),
                });
            }
        };

        if self.view.sort_key == Some(column.key) {
            self.view.sort_direction = self.view.sort_direction.toggled();
        } else {
            self.view.sort_key = Some(column.key);
            self.view.sort_direction = SortDirection::Ascending;
        }
        debug!(key = column.key, direction = ?self.view.sort_direction, "Sort changed");
        Ok(())
    }

    /// Replace the filter on `key`; a blank value removes it
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<()> {
        let column = match self.column(key) {
            Some(column) if column.filterable => column,
            _ => {
                return Err(Error::InvalidColumn {
                    key: key.to_string(),
                });
            }
        };

        match column.predicate(value)? {
            Some(predicate) => {
                self.view.filters.insert(
                    column.key,
                    ColumnFilter {
                        raw: value.trim().to_string(),
                        predicate,
                    },
                );
            }
            None => {
                self.view.filters.remove(column.key);
            }
        }
        self.view.page_index = 0;
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.view.filters.clear();
        self.view.page_index = 0;
    }

    // ==================== Pagination ====================

    pub fn set_page(&mut self, index: usize) {
        self.view.page_index = index;
        self.clamp_page();
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(Error::validation(
                "page_size",
                "Page size must be greater than zero",
            ));
        }
        self.view.page_size = size;
        self.clamp_page();
        Ok(())
    }

    // ==================== Editing ====================

    /// Stage a copy of row `id` for editing
    pub fn begin_edit(&mut self, id: &R::Id) -> Result<()> {
        if let Some(buffer) = &self.edit {
            if buffer.row_id() == id {
                return Ok(());
            }
            return Err(Error::AlreadyEditing {
                row_id: buffer.row_id().to_string(),
            });
        }

        let row = self.row(id).ok_or_else(|| Error::RowNotFound {
            row_id: id.to_string(),
        })?;
        self.edit = Some(EditBuffer::new(row));
        debug!(row = %id, "Edit started");
        Ok(())
    }

    pub fn update_edit_field(&mut self, edit: R::Edit) -> Result<()> {
        let buffer = self.edit.as_mut().ok_or(Error::NotEditing {})?;
        if buffer.is_committing() {
            return Err(Error::OperationInProgress {
                operation: format!("commit {}", buffer.row_id()),
            });
        }
        buffer.apply(edit);
        Ok(())
    }

    /// Validate the buffer and mark it in flight; returns the row to send
    pub fn begin_commit(&mut self) -> Result<R> {
        let buffer = self.edit.as_mut().ok_or(Error::NotEditing {})?;
        if buffer.is_committing() {
            return Err(Error::OperationInProgress {
                operation: format!("commit {}", buffer.row_id()),
            });
        }
        buffer.draft().validate()?;
        buffer.set_committing(true);
        Ok(buffer.draft().clone())
    }

    /// Apply the outcome of the update round-trip
    ///
    /// Success replaces the source row carrying the returned row's id and
    /// clears the buffer if it still belongs to that row. A row that left the
    /// source meanwhile (deleted, or gone on refresh) is not brought back.
    /// Failure leaves the source untouched and hands the error back.
    pub fn finish_commit(&mut self, result: Result<R>) -> Result<()> {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(buffer) = self.edit.as_mut() {
                    buffer.set_committing(false);
                }
                warn!(error = %e, "Row update failed, keeping edit buffer");
                return Err(e);
            }
        };

        let id = row.id();
        if self.is_editing(&id) {
            self.edit = None;
        }
        match self.rows.iter_mut().find(|existing| existing.id() == id) {
            Some(slot) => {
                *slot = row;
                self.clamp_page();
                info!(row = %id, "Row updated");
            }
            None => warn!(row = %id, "Updated row no longer present, dropping result"),
        }
        Ok(())
    }

    /// Validate, send and apply the edit buffer in one step
    pub async fn commit_edit<S: RowUpdater<R>>(&mut self, store: &S) -> Result<()> {
        let draft = self.begin_commit()?;
        let result = store.update_row(draft).await;
        self.finish_commit(result)
    }

    /// Discard the edit buffer
    pub fn cancel_edit(&mut self) {
        if let Some(buffer) = self.edit.take() {
            debug!(row = %buffer.row_id(), "Edit cancelled");
        }
    }

    // ==================== Deleting ====================

    /// Ask for confirmation before deleting row `id`
    pub fn request_delete(&mut self, id: &R::Id) -> Result<()> {
        if self.row(id).is_none() {
            return Err(Error::RowNotFound {
                row_id: id.to_string(),
            });
        }
        self.ensure_not_committing(id)?;
        self.delete.request(id.clone())
    }

    fn ensure_not_committing(&self, id: &R::Id) -> Result<()> {
        match &self.edit {
            Some(buffer) if buffer.is_committing() && buffer.row_id() == id => {
                Err(Error::OperationInProgress {
                    operation: format!("commit {id}"),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.delete.cancel()
    }

    /// Confirm the pending delete; returns the row id to send
    pub fn confirm_delete(&mut self) -> Result<R::Id> {
        if let Some(id) = self.delete.pending() {
            self.ensure_not_committing(id)?;
        }
        self.delete.confirm()
    }

    /// Apply the outcome of the delete round-trip
    pub fn finish_delete(&mut self, result: Result<()>) -> Result<()> {
        let Some(id) = self.delete.finish() else {
            return Err(Error::Invalid {
                message: "No delete in flight".to_string(),
            });
        };

        if let Err(e) = result {
            warn!(row = %id, error = %e, "Row delete failed, keeping row");
            return Err(e);
        }

        self.rows.retain(|row| row.id() != id);
        if self.is_editing(&id) {
            self.edit = None;
        }
        self.clamp_page();
        info!(row = %id, "Row deleted");
        Ok(())
    }

    /// Confirm, send and apply the pending delete in one step
    pub async fn delete_confirmed<S: RowRemover<R>>(&mut self, store: &S) -> Result<R::Id> {
        let id = self.confirm_delete()?;
        let result = store.remove_row(id.clone()).await;
        self.finish_delete(result)?;
        Ok(id)
    }

    // ==================== Export ====================

    /// Source rows matching `predicate`, in source order
    pub fn export_rows<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a R> + 'a
    where
        P: Fn(&R) -> bool + 'a,
    {
        self.rows.iter().filter(move |row| predicate(row))
    }
}

impl<R: TableRow> std::fmt::Debug for TabularView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabularView")
            .field("rows", &self.rows.len())
            .field("view", &self.view)
            .field("editing", &self.edit.as_ref().map(|buffer| buffer.row_id()))
            .field("delete", self.delete.state())
            .finish()
    }
}
