//! Service Events
//!
//! Completion events for fetches spawned by the `ServiceHub`. Every event
//! carries the generation it was requested under, so state slices can drop
//! results that a newer request already superseded.

use crate::domain::{
    BreakdownEntry, BudgetOverview, Expense, IssueKey, IssueSummary, Project, ProjectKey,
};
use crate::error::Result;

/// Events emitted by the service layer
#[derive(Debug)]
pub enum ServiceEvent {
    // ==================== Dashboard ====================
    /// Overview cards for a project
    OverviewLoaded {
        generation: u64,
        project: ProjectKey,
        result: Result<BudgetOverview>,
    },

    /// Full expense list for a project
    ExpensesLoaded {
        generation: u64,
        project: ProjectKey,
        result: Result<Vec<Expense>>,
    },

    /// Spend grouped by category
    CategoryBreakdownLoaded {
        generation: u64,
        project: ProjectKey,
        result: Result<Vec<BreakdownEntry>>,
    },

    /// Spend grouped by epic
    PhaseBreakdownLoaded {
        generation: u64,
        project: ProjectKey,
        result: Result<Vec<BreakdownEntry>>,
    },

    // ==================== Tracker ====================
    /// Remaining budget probe
    RemainingLoaded {
        generation: u64,
        project: ProjectKey,
        result: Result<Option<f64>>,
    },

    /// Issue picker results
    IssuesFound {
        generation: u64,
        project: ProjectKey,
        term: String,
        result: Result<Vec<IssueSummary>>,
    },

    // ==================== Thresholds ====================
    ThresholdsLoaded {
        generation: u64,
        result: Result<Vec<u32>>,
    },

    // ==================== Issue Panel ====================
    /// Expenses linked to one issue
    LinkedExpensesLoaded {
        generation: u64,
        issue: IssueKey,
        result: Result<Vec<Expense>>,
    },

    // ==================== Projects ====================
    ProjectsLoaded {
        generation: u64,
        result: Result<Vec<Project>>,
    },
}

impl ServiceEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ServiceEvent::OverviewLoaded { generation, .. }
            | ServiceEvent::ExpensesLoaded { generation, .. }
            | ServiceEvent::CategoryBreakdownLoaded { generation, .. }
            | ServiceEvent::PhaseBreakdownLoaded { generation, .. }
            | ServiceEvent::RemainingLoaded { generation, .. }
            | ServiceEvent::IssuesFound { generation, .. }
            | ServiceEvent::ThresholdsLoaded { generation, .. }
            | ServiceEvent::LinkedExpensesLoaded { generation, .. }
            | ServiceEvent::ProjectsLoaded { generation, .. } => *generation,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceEvent::OverviewLoaded { .. } => "overview",
            ServiceEvent::ExpensesLoaded { .. } => "expenses",
            ServiceEvent::CategoryBreakdownLoaded { .. } => "by_category",
            ServiceEvent::PhaseBreakdownLoaded { .. } => "by_phase",
            ServiceEvent::RemainingLoaded { .. } => "remaining",
            ServiceEvent::IssuesFound { .. } => "issue_search",
            ServiceEvent::ThresholdsLoaded { .. } => "thresholds",
            ServiceEvent::LinkedExpensesLoaded { .. } => "linked_expenses",
            ServiceEvent::ProjectsLoaded { .. } => "projects",
        }
    }

    /// Whether the fetch behind this event failed
    pub fn is_failure(&self) -> bool {
        match self {
            ServiceEvent::OverviewLoaded { result, .. } => result.is_err(),
            ServiceEvent::ExpensesLoaded { result, .. }
            | ServiceEvent::LinkedExpensesLoaded { result, .. } => result.is_err(),
            ServiceEvent::CategoryBreakdownLoaded { result, .. }
            | ServiceEvent::PhaseBreakdownLoaded { result, .. } => result.is_err(),
            ServiceEvent::RemainingLoaded { result, .. } => result.is_err(),
            ServiceEvent::IssuesFound { result, .. } => result.is_err(),
            ServiceEvent::ThresholdsLoaded { result, .. } => result.is_err(),
            ServiceEvent::ProjectsLoaded { result, .. } => result.is_err(),
        }
    }
}
