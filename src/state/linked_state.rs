//! Linked Expenses State
//!
//! Expenses that reference one issue, shown in the issue panel.

use crate::domain::{EXPENSE_COLUMNS, Expense, IssueKey, expense_columns};
use crate::error::Result;
use crate::services::{BudgetApi, ServiceEvent, ServiceHub};
use crate::state::{FetchTracker, Settled};
use crate::table::TabularView;
use tracing::debug;

pub struct LinkedExpensesState {
    issue: Option<IssueKey>,
    table: TabularView<Expense>,
    fetch: FetchTracker,
}

impl LinkedExpensesState {
    pub fn new(page_size: usize) -> Result<Self> {
        let table = TabularView::new(EXPENSE_COLUMNS)
            .with_sort(expense_columns::DATE)?
            .with_page_size(page_size)?;
        Ok(Self {
            issue: None,
            table,
            fetch: FetchTracker::new("linked_expenses"),
        })
    }

    pub fn issue(&self) -> Option<&IssueKey> {
        self.issue.as_ref()
    }

    pub fn set_issue(&mut self, issue: IssueKey) {
        if self.issue.as_ref() == Some(&issue) {
            return;
        }
        self.issue = Some(issue);
        self.fetch.reset();
        self.table.replace_rows(Vec::new());
    }

    pub fn refresh<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) {
        if let Some(issue) = &self.issue {
            let generation = hub.refresh_linked(issue);
            self.fetch.mark_requested(generation);
        }
    }

    pub fn apply(&mut self, event: ServiceEvent) -> bool {
        match event {
            ServiceEvent::LinkedExpensesLoaded {
                generation,
                issue,
                result,
            } => {
                if self.issue.as_ref() == Some(&issue)
                    && let Settled::Applied(rows) = self.fetch.settle(generation, result)
                {
                    debug!(issue = %issue, rows = rows.len(), "Linked expenses loaded");
                    self.table.replace_rows(rows);
                }
                true
            }
            _ => false,
        }
    }

    pub fn table(&self) -> &TabularView<Expense> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TabularView<Expense> {
        &mut self.table
    }

    pub fn fetch(&self) -> &FetchTracker {
        &self.fetch
    }

    /// Sum of every linked expense, regardless of filters
    pub fn total(&self) -> f64 {
        self.table.rows().iter().map(|expense| expense.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MockBudgetApi;

    #[test]
    fn events_for_other_issues_are_ignored() {
        let mut state = LinkedExpensesState::new(5).expect("state");
        state.set_issue(IssueKey::from("BUD-1"));

        assert!(state.apply(ServiceEvent::LinkedExpensesLoaded {
            generation: 1,
            issue: IssueKey::from("BUD-2"),
            result: Ok(vec![MockBudgetApi::expense("a", "BUD", 10.0)]),
        }));
        assert!(state.table().rows().is_empty());

        state.apply(ServiceEvent::LinkedExpensesLoaded {
            generation: 2,
            issue: IssueKey::from("BUD-1"),
            result: Ok(vec![
                MockBudgetApi::expense("a", "BUD", 10.0),
                MockBudgetApi::expense("b", "BUD", 32.5),
            ]),
        });
        assert_eq!(state.table().rows().len(), 2);
        assert_eq!(state.total(), 42.5);
    }

    #[test]
    fn switching_issue_clears_rows() {
        let mut state = LinkedExpensesState::new(5).expect("state");
        state.set_issue(IssueKey::from("BUD-1"));
        state.apply(ServiceEvent::LinkedExpensesLoaded {
            generation: 1,
            issue: IssueKey::from("BUD-1"),
            result: Ok(vec![MockBudgetApi::expense("a", "BUD", 10.0)]),
        });
        state.set_issue(IssueKey::from("BUD-3"));
        assert!(state.table().rows().is_empty());
        assert_eq!(state.total(), 0.0);
    }
}
