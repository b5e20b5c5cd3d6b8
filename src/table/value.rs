//! Cell Values
//!
//! Typed view of a single table cell, used for sorting, filtering and display.

use chrono::{DateTime, NaiveDate, Utc};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Value of one cell, borrowed from its row where possible
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Short labels such as linked issue keys
    Tags(Vec<Cow<'a, str>>),
    Empty,
}

impl<'a> CellValue<'a> {
    /// Borrowed text cell
    pub fn text(value: &'a str) -> Self {
        CellValue::Text(Cow::Borrowed(value))
    }

    /// Cross-variant ordering: empty cells first, then by kind
    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(_) => 1,
            CellValue::Date(_) => 2,
            CellValue::Timestamp(_) => 3,
            CellValue::Text(_) => 4,
            CellValue::Tags(_) => 5,
        }
    }

    /// Total order used by column sorting
    pub fn compare(&self, other: &CellValue<'_>) -> Ordering {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a.as_ref().cmp(b.as_ref()),
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a.cmp(b),
            (CellValue::Tags(a), CellValue::Tags(b)) => a
                .iter()
                .map(AsRef::<str>::as_ref)
                .cmp(b.iter().map(AsRef::<str>::as_ref)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn tags(&self) -> &[Cow<'a, str>] {
        match self {
            CellValue::Tags(tags) => tags,
            _ => &[],
        }
    }

    /// Text that substring filters match against; `None` for empty cells
    pub fn search_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => write!(f, "{text}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            CellValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Tags(tags) => {
                for (i, tag) in tags.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{tag}")?;
                }
                Ok(())
            }
            CellValue::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        let ten = CellValue::Number(10.0);
        let nine = CellValue::Number(9.5);
        assert_eq!(ten.compare(&nine), Ordering::Greater);
        assert_eq!(ten.compare(&CellValue::Number(10.0)), Ordering::Equal);
    }

    #[test]
    fn empty_sorts_before_values() {
        assert_eq!(CellValue::Empty.compare(&CellValue::text("a")), Ordering::Less);
        assert_eq!(CellValue::Number(1.0).compare(&CellValue::Empty), Ordering::Greater);
    }

    #[test]
    fn display_formats_by_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(CellValue::Date(date).to_string(), "2024-03-09");
        assert_eq!(CellValue::Number(100.0).to_string(), "100");
        let tags = CellValue::Tags(vec![Cow::Borrowed("BUD-1"), Cow::Borrowed("BUD-2")]);
        assert_eq!(tags.to_string(), "BUD-1, BUD-2");
        assert_eq!(CellValue::Empty.search_text(), None);
    }
}
