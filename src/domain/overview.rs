//! Budget overview card values

use crate::domain::null_as_default;
use serde::{Deserialize, Serialize};

/// Totals for one project as reported by `GET /budget/overview/{projectKey}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOverview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_budget: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_expenses: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub remaining_budget: f64,
    /// Not every server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u64>,
}

impl BudgetOverview {
    /// A project without a total budget still needs onboarding
    pub fn needs_setup(&self) -> bool {
        self.total_budget <= 0.0
    }

    /// Share of the total budget already spent, in percent
    pub fn spent_percent(&self) -> Option<f64> {
        (self.total_budget > 0.0).then(|| self.total_expenses / self.total_budget * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_task_count_decodes() {
        let overview: BudgetOverview = serde_json::from_str(
            r#"{"totalBudget": 1000.0, "totalExpenses": 250.0, "remainingBudget": 750.0}"#,
        )
        .expect("decode");
        assert_eq!(overview.task_count, None);
        assert!(!overview.needs_setup());
        assert_eq!(overview.spent_percent(), Some(25.0));
    }

    #[test]
    fn zero_budget_needs_setup() {
        let overview = BudgetOverview::default();
        assert!(overview.needs_setup());
        assert_eq!(overview.spent_percent(), None);
    }
}
