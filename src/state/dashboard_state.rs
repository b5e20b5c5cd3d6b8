//! Dashboard State
//!
//! Overview cards, breakdowns and the expense table of the selected project.

use crate::domain::{
    BreakdownEntry, BudgetOverview, EXPENSE_COLUMNS, Expense, ExpenseEdit, ExpenseId, ProjectKey,
    ReportPeriod, TrendPoint, cumulative_trend, expense_columns, expense_trend, month_total,
};
use crate::error::Result;
use crate::services::{BudgetApi, DashboardRequest, ExpenseRows, ServiceEvent, ServiceHub};
use crate::state::{FetchTracker, LoadState, Notices, ResourceSlot, Settled};
use crate::table::{TabularView, export_csv_string, write_csv};
use chrono::NaiveDate;
use std::io::Write;
use tracing::{debug, info};

pub struct DashboardState {
    project: Option<ProjectKey>,
    overview: ResourceSlot<BudgetOverview>,
    by_category: ResourceSlot<Vec<BreakdownEntry>>,
    by_phase: ResourceSlot<Vec<BreakdownEntry>>,
    expenses: TabularView<Expense>,
    expenses_fetch: FetchTracker,
    notices: Notices,
}

impl DashboardState {
    /// Expense table sorted by name, `page_size` rows per page
    pub fn new(page_size: usize) -> Result<Self> {
        let expenses = TabularView::new(EXPENSE_COLUMNS)
            .with_sort(expense_columns::NAME)?
            .with_page_size(page_size)?;
        Ok(Self {
            project: None,
            overview: ResourceSlot::new("overview"),
            by_category: ResourceSlot::new("by_category"),
            by_phase: ResourceSlot::new("by_phase"),
            expenses,
            expenses_fetch: FetchTracker::new("expenses"),
            notices: Notices::default(),
        })
    }

    // ==================== Project ====================

    pub fn project(&self) -> Option<&ProjectKey> {
        self.project.as_ref()
    }

    /// Switch project, dropping everything loaded for the previous one
    pub fn set_project(&mut self, project: ProjectKey) {
        if self.project.as_ref() == Some(&project) {
            return;
        }
        info!(project = %project, "Dashboard project changed");
        self.project = Some(project);
        self.overview.reset();
        self.by_category.reset();
        self.by_phase.reset();
        self.expenses_fetch.reset();
        self.expenses.cancel_edit();
        self.expenses.cancel_delete();
        self.expenses.replace_rows(Vec::new());
    }

    fn is_current(&self, project: &ProjectKey) -> bool {
        self.project.as_ref() == Some(project)
    }

    // ==================== Fetching ====================

    pub fn mark_requested(&mut self, request: &DashboardRequest) {
        self.overview.mark_requested(request.overview);
        self.expenses_fetch.mark_requested(request.expenses);
        self.by_category.mark_requested(request.by_category);
        self.by_phase.mark_requested(request.by_phase);
    }

    /// Issue a full refresh for the current project
    pub fn refresh<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) {
        if let Some(project) = self.project.clone() {
            let request = hub.refresh_dashboard(&project);
            self.mark_requested(&request);
        }
    }

    /// Apply a service event; returns whether it belonged to this slice
    pub fn apply(&mut self, event: ServiceEvent) -> bool {
        match event {
            ServiceEvent::OverviewLoaded {
                generation,
                project,
                result,
            } => {
                if self.is_current(&project) {
                    self.overview.apply(generation, result);
                }
                true
            }
            ServiceEvent::CategoryBreakdownLoaded {
                generation,
                project,
                result,
            } => {
                if self.is_current(&project) {
                    self.by_category.apply(generation, result);
                }
                true
            }
            ServiceEvent::PhaseBreakdownLoaded {
                generation,
                project,
                result,
            } => {
                if self.is_current(&project) {
                    self.by_phase.apply(generation, result);
                }
                true
            }
            ServiceEvent::ExpensesLoaded {
                generation,
                project,
                result,
            } => {
                if self.is_current(&project)
                    && let Settled::Applied(rows) = self.expenses_fetch.settle(generation, result)
                {
                    debug!(project = %project, rows = rows.len(), "Expenses loaded");
                    self.expenses.replace_rows(rows);
                }
                true
            }
            _ => false,
        }
    }

    // ==================== Derived Values ====================

    pub fn overview(&self) -> &ResourceSlot<BudgetOverview> {
        &self.overview
    }

    pub fn category_breakdown(&self) -> &ResourceSlot<Vec<BreakdownEntry>> {
        &self.by_category
    }

    pub fn phase_breakdown(&self) -> &ResourceSlot<Vec<BreakdownEntry>> {
        &self.by_phase
    }

    pub fn expenses_fetch(&self) -> &FetchTracker {
        &self.expenses_fetch
    }

    /// Whether any dashboard fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        self.expenses_fetch.is_loading()
            || [
                self.overview.load_state(),
                self.by_category.load_state(),
                self.by_phase.load_state(),
            ]
            .into_iter()
            .any(|state| matches!(state, LoadState::Loading))
    }

    /// A loaded overview with no total budget means the project needs onboarding
    pub fn needs_onboarding(&self) -> bool {
        self.overview
            .value()
            .is_some_and(BudgetOverview::needs_setup)
    }

    /// Daily spend across all loaded expenses
    pub fn trend(&self) -> Vec<TrendPoint> {
        expense_trend(self.expenses.rows())
    }

    /// Running total of `trend`
    pub fn cumulative_trend(&self) -> Vec<TrendPoint> {
        cumulative_trend(&self.trend())
    }

    pub fn spent_this_month(&self, today: NaiveDate) -> f64 {
        month_total(self.expenses.rows(), today)
    }

    // ==================== Expense Table ====================

    pub fn expenses(&self) -> &TabularView<Expense> {
        &self.expenses
    }

    /// Sort, filter, pagination and edit-buffer changes
    pub fn expenses_mut(&mut self) -> &mut TabularView<Expense> {
        &mut self.expenses
    }

    pub fn begin_edit(&mut self, id: &ExpenseId) -> Result<()> {
        self.expenses.begin_edit(id)
    }

    pub fn update_edit_field(&mut self, edit: ExpenseEdit) -> Result<()> {
        self.expenses.update_edit_field(edit)
    }

    pub fn cancel_edit(&mut self) {
        self.expenses.cancel_edit();
    }

    /// Show an expense created elsewhere and refresh the aggregates
    pub fn expense_created<A: BudgetApi>(&mut self, hub: &ServiceHub<A>, expense: Expense) {
        if self.is_current(&ProjectKey::new(expense.project_key.as_str())) {
            self.expenses.insert_row(expense);
            self.refresh(hub);
        }
    }

    /// Send the edit buffer; success refreshes the aggregates
    pub async fn commit_edit<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) -> Result<()> {
        let store = ExpenseRows::new(hub.api());
        match self.expenses.commit_edit(&store).await {
            Ok(()) => {
                self.notices.success("Expense updated successfully");
                self.refresh(hub);
                Ok(())
            }
            Err(e) => {
                if e.field_errors().is_none() {
                    self.notices.error(format!("Failed to update expense: {e}"));
                }
                Err(e)
            }
        }
    }

    pub fn request_delete(&mut self, id: &ExpenseId) -> Result<()> {
        self.expenses.request_delete(id)
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.expenses.cancel_delete()
    }

    /// Delete the confirmed expense; success refreshes the aggregates
    pub async fn delete_confirmed<A: BudgetApi>(
        &mut self,
        hub: &ServiceHub<A>,
    ) -> Result<ExpenseId> {
        let store = ExpenseRows::new(hub.api());
        match self.expenses.delete_confirmed(&store).await {
            Ok(id) => {
                self.notices.success("Expense deleted successfully");
                self.refresh(hub);
                Ok(id)
            }
            Err(e) => {
                self.notices.error(format!("Failed to delete expense: {e}"));
                Err(e)
            }
        }
    }

    // ==================== Export ====================

    /// Expenses dated within `period` of `today`, in source order
    pub fn report_rows(
        &self,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> impl Iterator<Item = &Expense> {
        self.expenses
            .export_rows(move |expense| expense.date.is_some_and(|d| period.contains(d, today)))
    }

    pub fn export_report(&self, period: ReportPeriod, today: NaiveDate) -> Result<String> {
        export_csv_string(self.report_rows(period, today))
    }

    /// Write the report to `writer`; returns the number of expenses written
    pub fn write_report<W: Write>(
        &self,
        writer: W,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<usize> {
        let count = write_csv(writer, self.report_rows(period, today))?;
        info!(period = %period, rows = count, "Expense report exported");
        Ok(count)
    }

    // ==================== Notices ====================

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<crate::state::Notice> {
        self.notices.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::MockBudgetApi;
    use crate::state::NotificationSeverity;
    use crate::table::DeleteState;

    fn project() -> ProjectKey {
        ProjectKey::from("BUD")
    }

    fn loaded(rows: Vec<Expense>) -> DashboardState {
        let mut state = DashboardState::new(5).expect("state");
        state.set_project(project());
        assert!(state.apply(ServiceEvent::ExpensesLoaded {
            generation: 1,
            project: project(),
            result: Ok(rows),
        }));
        state
    }

    fn hub_with(rows: Vec<Expense>) -> ServiceHub<MockBudgetApi> {
        ServiceHub::new(MockBudgetApi::new().with_expenses(rows)).expect("hub")
    }

    fn dated(id: &str, amount: f64, date: (i32, u32, u32)) -> Expense {
        let mut expense = MockBudgetApi::expense(id, "BUD", amount);
        expense.date = NaiveDate::from_ymd_opt(date.0, date.1, date.2);
        expense
    }

    #[test]
    fn events_for_other_projects_are_ignored() {
        let mut state = loaded(vec![MockBudgetApi::expense("e1", "BUD", 10.0)]);
        state.apply(ServiceEvent::ExpensesLoaded {
            generation: 2,
            project: ProjectKey::from("OPS"),
            result: Ok(Vec::new()),
        });
        assert_eq!(state.expenses().rows().len(), 1);
    }

    #[test]
    fn superseded_expense_list_is_dropped() {
        let mut state = loaded(Vec::new());
        state.apply(ServiceEvent::ExpensesLoaded {
            generation: 5,
            project: project(),
            result: Ok(vec![MockBudgetApi::expense("new", "BUD", 1.0)]),
        });
        state.apply(ServiceEvent::ExpensesLoaded {
            generation: 4,
            project: project(),
            result: Ok(vec![MockBudgetApi::expense("old", "BUD", 1.0)]),
        });
        assert_eq!(state.expenses().rows()[0].id, ExpenseId::from("new"));
    }

    #[test]
    fn failed_read_keeps_rows_visible() {
        let mut state = loaded(vec![MockBudgetApi::expense("e1", "BUD", 10.0)]);
        state.apply(ServiceEvent::ExpensesLoaded {
            generation: 2,
            project: project(),
            result: Err(Error::NetworkFailure {
                message: "timeout".to_string(),
            }),
        });
        assert_eq!(state.expenses().rows().len(), 1);
        assert!(matches!(
            state.expenses_fetch().load_state(),
            crate::state::LoadState::Error(_)
        ));
    }

    #[test]
    fn zero_budget_overview_triggers_onboarding() {
        let mut state = loaded(Vec::new());
        assert!(!state.needs_onboarding());
        state.apply(ServiceEvent::OverviewLoaded {
            generation: 1,
            project: project(),
            result: Ok(BudgetOverview::default()),
        });
        assert!(state.needs_onboarding());
    }

    #[test]
    fn monthly_export_only_includes_this_month() {
        let state = loaded(vec![
            dated("a", 10.0, (2024, 5, 3)),
            dated("b", 20.0, (2024, 4, 28)),
            dated("c", 30.0, (2024, 5, 31)),
        ]);
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).expect("date");
        let csv = state
            .export_report(ReportPeriod::Monthly, today)
            .expect("export");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Expense Name,Category,Amount,Issues,Description,Date");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Expense a,"));
        assert!(lines[2].ends_with(",2024-05-31"));
        assert_eq!(state.spent_this_month(today), 40.0);
    }

    #[tokio::test]
    async fn commit_edit_replaces_row_and_notifies() {
        let rows = vec![MockBudgetApi::expense("e1", "BUD", 10.0)];
        let hub = hub_with(rows.clone());
        let mut state = loaded(rows);
        state.begin_edit(&ExpenseId::from("e1")).expect("edit");
        state
            .update_edit_field(ExpenseEdit::Name("  Renamed ".to_string()))
            .expect("update");
        state.commit_edit(&hub).await.expect("commit");

        assert_eq!(state.expenses().rows()[0].budget_name, "Renamed");
        let notices = state.drain_notices();
        assert_eq!(notices[0].severity, NotificationSeverity::Success);
        assert!(state.overview().load_state() == &crate::state::LoadState::Loading);
    }

    #[tokio::test]
    async fn failed_commit_surfaces_error_notice() {
        let rows = vec![MockBudgetApi::expense("e1", "BUD", 10.0)];
        let hub = hub_with(rows.clone());
        hub.api().fail_writes(true);
        let mut state = loaded(rows);
        state.begin_edit(&ExpenseId::from("e1")).expect("edit");
        state
            .update_edit_field(ExpenseEdit::Amount(99.0))
            .expect("update");
        assert!(state.commit_edit(&hub).await.is_err());
        assert_eq!(state.expenses().rows()[0].amount, 10.0);
        assert!(state.expenses().edit_buffer().is_some());
        assert_eq!(state.drain_notices()[0].severity, NotificationSeverity::Error);
    }

    #[tokio::test]
    async fn delete_with_server_error_keeps_row() {
        let rows = vec![MockBudgetApi::expense("e1", "BUD", 10.0)];
        let hub = hub_with(rows.clone());
        hub.api().fail_writes(true);
        let mut state = loaded(rows);
        state.request_delete(&ExpenseId::from("e1")).expect("request");
        let err = state.delete_confirmed(&hub).await.expect_err("server error");
        assert!(matches!(err, Error::ServerError { status: 500, .. }));
        assert_eq!(state.expenses().delete_state(), &DeleteState::Idle);
        assert_eq!(state.expenses().rows().len(), 1);
        assert_eq!(state.drain_notices()[0].severity, NotificationSeverity::Error);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_row() {
        let rows = vec![
            MockBudgetApi::expense("e1", "BUD", 10.0),
            MockBudgetApi::expense("e2", "BUD", 20.0),
        ];
        let hub = hub_with(rows.clone());
        let mut state = loaded(rows);
        state.request_delete(&ExpenseId::from("e2")).expect("request");
        let deleted = state.delete_confirmed(&hub).await.expect("delete");
        assert_eq!(deleted, ExpenseId::from("e2"));
        assert_eq!(state.expenses().rows().len(), 1);
        assert_eq!(hub.api().stored_expenses().len(), 1);
    }
}
