//! Tracker State
//!
//! Budget setup, the new-expense form and the issue picker for the selected
//! project.

use crate::domain::{Expense, ExpenseDraft, IssueSummary, ProjectKey};
use crate::error::{Error, Result};
use crate::services::{BudgetApi, ServiceEvent, ServiceHub};
use crate::state::{FetchTracker, LoadState, Notices, RemainingBudget, ResourceSlot, Settled};
use tracing::info;

pub struct TrackerState {
    project: Option<ProjectKey>,
    remaining: RemainingBudget,
    remaining_fetch: FetchTracker,
    issues: ResourceSlot<Vec<IssueSummary>>,
    issue_term: String,
    notices: Notices,
}

impl TrackerState {
    pub fn new() -> Self {
        Self {
            project: None,
            remaining: RemainingBudget::new(),
            remaining_fetch: FetchTracker::new("remaining"),
            issues: ResourceSlot::new("issue_search"),
            issue_term: String::new(),
            notices: Notices::default(),
        }
    }

    pub fn project(&self) -> Option<&ProjectKey> {
        self.project.as_ref()
    }

    pub fn set_project(&mut self, project: ProjectKey) {
        if self.project.as_ref() == Some(&project) {
            return;
        }
        self.project = Some(project);
        self.remaining = RemainingBudget::new();
        self.remaining_fetch.reset();
        self.issues.reset();
        self.issue_term.clear();
    }

    fn is_current(&self, project: &ProjectKey) -> bool {
        self.project.as_ref() == Some(project)
    }

    fn require_project(&self) -> Result<ProjectKey> {
        self.project.clone().ok_or_else(|| Error::Invalid {
            message: "No project selected".to_string(),
        })
    }

    // ==================== Remaining Budget ====================

    pub fn remaining(&self) -> &RemainingBudget {
        &self.remaining
    }

    /// Probe the remaining budget for the current project
    pub fn refresh_remaining<A: BudgetApi>(&mut self, hub: &ServiceHub<A>) {
        if let Some(project) = &self.project {
            let generation = hub.refresh_remaining(project);
            self.remaining_fetch.mark_requested(generation);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.remaining_fetch.is_loading() || matches!(self.issues.load_state(), LoadState::Loading)
    }

    /// No budget recorded: null/zero, or the probe failed with nothing cached
    pub fn needs_budget_setup(&self) -> bool {
        self.remaining_fetch.applied_generation() > 0 && self.remaining.is_unset()
    }

    /// Validate and record a total budget for the project
    pub async fn set_total_budget<A: BudgetApi>(
        &mut self,
        hub: &ServiceHub<A>,
        raw: &str,
    ) -> Result<f64> {
        let project = self.require_project()?;
        let total = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|total| total.is_finite() && *total > 0.0)
            .ok_or_else(|| Error::validation("totalBudget", "Please enter a valid budget amount"))?;

        if let Err(e) = hub.api().set_total_budget(&project, total).await {
            self.notices.error(format!("Failed to set total budget: {e}"));
            return Err(e);
        }
        info!(project = %project, total, "Total budget set");
        self.remaining.seed(total);
        self.notices.success("Total budget set successfully!");
        Ok(total)
    }

    // ==================== Expense Form ====================

    /// Validate and create an expense, then decrement the remaining budget
    pub async fn submit_expense<A: BudgetApi>(
        &mut self,
        hub: &ServiceHub<A>,
        draft: ExpenseDraft,
    ) -> Result<Expense> {
        let project = self.require_project()?;
        let request = draft.into_new_expense(project.as_str())?;

        match hub.api().create_expense(&request).await {
            Ok(created) => {
                info!(project = %project, amount = request.amount, "Expense created");
                self.remaining.decrement(request.amount);
                self.notices.success("Budget successfully created!");
                Ok(created)
            }
            Err(e) => {
                self.notices
                    .error("Failed to create budget item. Please try again.");
                Err(e)
            }
        }
    }

    // ==================== Issue Picker ====================

    /// Start a search; terms shorter than two characters clear the results
    pub fn search_issues<A: BudgetApi>(&mut self, hub: &ServiceHub<A>, term: &str) {
        let Some(project) = self.project.clone() else {
            return;
        };
        self.issue_term = term.trim().to_string();
        match hub.search_issues(&project, term) {
            Some(generation) => self.issues.mark_requested(generation),
            None => self.issues.reset(),
        }
    }

    pub fn issue_term(&self) -> &str {
        &self.issue_term
    }

    pub fn issue_results(&self) -> &[IssueSummary] {
        self.issues.value().map(Vec::as_slice).unwrap_or_default()
    }

    // ==================== Events ====================

    /// Apply a service event; returns whether it belonged to this slice
    pub fn apply(&mut self, event: ServiceEvent) -> bool {
        match event {
            ServiceEvent::RemainingLoaded {
                generation,
                project,
                result,
            } => {
                if self.is_current(&project)
                    && let Settled::Applied(amount) =
                        self.remaining_fetch.settle(generation, result)
                {
                    self.remaining.set_fetched(amount);
                }
                true
            }
            ServiceEvent::IssuesFound {
                generation,
                project,
                term,
                result,
            } => {
                if self.is_current(&project) && term == self.issue_term {
                    self.issues.apply(generation, result);
                }
                true
            }
            _ => false,
        }
    }

    // ==================== Notices ====================

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<crate::state::Notice> {
        self.notices.drain()
    }
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new()
    }
}
