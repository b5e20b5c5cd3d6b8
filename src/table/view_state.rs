//! View State
//!
//! Sort, filter and pagination settings of one table. UI-only, never persisted.

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::table::CellValue;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Orient an ascending comparison; ties stay ties
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Row predicate derived from a filter value
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Numeric cell value is at most the threshold
    AtMost(f64),
    /// Cell text contains the lowercased term
    Contains(String),
    /// Some tag contains the lowercased term
    TagContains(String),
}

impl Predicate {
    pub fn matches(&self, cell: &CellValue<'_>) -> bool {
        match self {
            Predicate::AtMost(threshold) => cell.as_number().is_some_and(|n| n <= *threshold),
            Predicate::Contains(term) => cell
                .search_text()
                .is_some_and(|text| text.to_lowercase().contains(term.as_str())),
            Predicate::TagContains(term) => cell
                .tags()
                .iter()
                .any(|tag| tag.to_lowercase().contains(term.as_str())),
        }
    }
}

/// Active filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFilter {
    /// Value as entered, trimmed
    pub raw: String,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub(crate) sort_key: Option<&'static str>,
    pub(crate) sort_direction: SortDirection,
    pub(crate) filters: BTreeMap<&'static str, ColumnFilter>,
    pub(crate) page_index: usize,
    pub(crate) page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            filters: BTreeMap::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn sort_key(&self) -> Option<&'static str> {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filters(&self) -> &BTreeMap<&'static str, ColumnFilter> {
        &self.filters
    }

    /// Raw value of the filter on `key`, if any
    pub fn filter_value(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(|filter| filter.raw.as_str())
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages for `filtered` rows, at least 1
    pub fn page_count(&self, filtered: usize) -> usize {
        filtered.div_ceil(self.page_size).max(1)
    }

    /// Pull the page index back onto the last valid page
    pub fn clamp(&mut self, filtered: usize) {
        self.page_index = self.page_index.min(self.page_count(filtered) - 1);
    }

    /// Slice bounds of the current page within `filtered` rows
    pub fn page_range(&self, filtered: usize) -> Range<usize> {
        let start = self.page_index * self.page_size;
        if start >= filtered {
            return 0..0;
        }
        let end = (start + self.page_size).min(filtered);
        start..end
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn page_count_is_at_least_one() {
        let view = ViewState::new(5);
        assert_eq!(view.page_count(0), 1);
        assert_eq!(view.page_count(5), 1);
        assert_eq!(view.page_count(6), 2);
    }

    #[test]
    fn clamp_moves_to_last_page() {
        let mut view = ViewState::new(5);
        view.page_index = 2;
        view.clamp(3);
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.page_range(3), 0..3);
    }

    #[test]
    fn page_range_is_bounded() {
        let mut view = ViewState::new(5);
        view.page_index = 1;
        assert_eq!(view.page_range(12), 5..10);
        view.page_index = 2;
        assert_eq!(view.page_range(12), 10..12);
    }

    #[test]
    fn descending_keeps_ties() {
        assert_eq!(SortDirection::Descending.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn predicates_match_cells() {
        assert!(Predicate::AtMost(100.0).matches(&CellValue::Number(100.0)));
        assert!(!Predicate::AtMost(100.0).matches(&CellValue::Number(100.5)));
        assert!(!Predicate::AtMost(100.0).matches(&CellValue::Empty));
        assert!(Predicate::Contains("soft".into()).matches(&CellValue::text("Software")));
        let tags = CellValue::Tags(vec![Cow::Borrowed("BUD-12"), Cow::Borrowed("OPS-3")]);
        assert!(Predicate::TagContains("ops".into()).matches(&tags));
        assert!(!Predicate::TagContains("dev".into()).matches(&tags));
    }
}
