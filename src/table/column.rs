//! Column Definition
//!
//! Static column descriptors shared by every instance of a table kind.

use crate::error::{Error, Result};
use crate::table::Predicate;

/// How a column's cells are interpreted for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Tags,
}

/// Column definition for a tabular view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column identifier, also the key passed to `TableRow::cell`
    pub key: &'static str,
    /// Column header label
    pub label: &'static str,
    pub sortable: bool,
    pub filterable: bool,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Create a new column that can neither be sorted nor filtered
    pub const fn new(key: &'static str, label: &'static str, kind: ColumnKind) -> Self {
        Self {
            key,
            label,
            sortable: false,
            filterable: false,
            kind,
        }
    }

    /// Make the column sortable
    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Make the column filterable
    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, ColumnKind::Number)
    }

    /// Build the predicate for a raw filter value
    ///
    /// Returns `Ok(None)` for a blank value, which clears the filter.
    pub fn predicate(&self, raw: &str) -> Result<Option<Predicate>> {
        let value = raw.trim();
        if value.is_empty() {
            return Ok(None);
        }

        let predicate = match self.kind {
            ColumnKind::Number => {
                let threshold = value.parse::<f64>().ok().filter(|n| n.is_finite());
                let Some(threshold) = threshold else {
                    return Err(Error::validation(
                        self.key,
                        format!("{} filter must be a number", self.label),
                    ));
                };
                Predicate::AtMost(threshold)
            }
            ColumnKind::Text | ColumnKind::Date => Predicate::Contains(value.to_lowercase()),
            ColumnKind::Tags => Predicate::TagContains(value.to_lowercase()),
        };
        Ok(Some(predicate))
    }
}

/// Find a column by key
pub fn find_column<'a>(
    columns: &'a [ColumnDescriptor],
    key: &str,
) -> Option<&'a ColumnDescriptor> {
    columns.iter().find(|column| column.key == key)
}
