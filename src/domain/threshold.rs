//! Alert thresholds
//!
//! Percentages of the total budget at which the server sends alerts.

use crate::error::{Error, Result};
use crate::table::{CellValue, ColumnDescriptor, ColumnKind, TableRow};
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// One configured threshold
///
/// The server only stores the percentage; `created_at` is stamped when the
/// list is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdRow {
    pub value: u32,
    pub created_at: DateTime<Utc>,
}

impl ThresholdRow {
    pub fn new(value: u32, created_at: DateTime<Utc>) -> Self {
        Self { value, created_at }
    }

    /// Wrap a fetched list, stamping every row with `now`
    pub fn from_values(values: Vec<u32>, now: DateTime<Utc>) -> Vec<Self> {
        values.into_iter().map(|value| Self::new(value, now)).collect()
    }
}

/// Column keys of the thresholds table
pub mod threshold_columns {
    pub const VALUE: &str = "value";
    pub const CREATED_AT: &str = "createdAt";
    /// Filter-only column over the threshold's decimal text
    pub const SEARCH: &str = "search";
}

pub const THRESHOLD_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new(threshold_columns::VALUE, "Threshold (%)", ColumnKind::Number)
        .sortable(),
    ColumnDescriptor::new(threshold_columns::CREATED_AT, "Created At", ColumnKind::Date)
        .sortable(),
    ColumnDescriptor::new(threshold_columns::SEARCH, "Search Thresholds", ColumnKind::Text)
        .filterable(),
];

impl TableRow for ThresholdRow {
    type Id = u32;
    /// Thresholds are added and removed, never edited
    type Edit = std::convert::Infallible;

    fn id(&self) -> u32 {
        self.value
    }

    fn cell(&self, key: &str) -> CellValue<'_> {
        match key {
            threshold_columns::VALUE => CellValue::Number(f64::from(self.value)),
            threshold_columns::CREATED_AT => CellValue::Timestamp(self.created_at),
            threshold_columns::SEARCH => CellValue::Text(Cow::Owned(self.value.to_string())),
            _ => CellValue::Empty,
        }
    }

    fn apply_edit(&mut self, edit: std::convert::Infallible) {
        match edit {}
    }
}

/// Parse a threshold typed by the user, rejecting blanks and duplicates
pub fn parse_new_threshold(raw: &str, existing: &[ThresholdRow]) -> Result<u32> {
    let value = raw.trim().parse::<u32>().ok();
    match value {
        Some(value) if !existing.iter().any(|row| row.value == value) => Ok(value),
        _ => Err(Error::validation(
            "threshold",
            "Threshold already exists or is invalid.",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_cell_is_decimal_text() {
        let row = ThresholdRow::new(75, Utc::now());
        assert_eq!(row.cell("search").to_string(), "75");
        assert_eq!(row.cell("value").as_number(), Some(75.0));
        assert_eq!(row.id(), 75);
    }

    #[test]
    fn new_threshold_must_be_unique_number() {
        let rows = ThresholdRow::from_values(vec![50, 80], Utc::now());
        assert_eq!(parse_new_threshold(" 90 ", &rows).expect("valid"), 90);
        for raw in ["", "abc", "80", "-5"] {
            let err = parse_new_threshold(raw, &rows).expect_err("rejected");
            assert_eq!(
                err.field_errors().and_then(|e| e.get("threshold")),
                Some("Threshold already exists or is invalid.")
            );
        }
    }
}
