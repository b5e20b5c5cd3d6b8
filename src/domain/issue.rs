//! Issue search results

use crate::domain::IssueRef;
use serde::{Deserialize, Serialize};

/// Issue found by the issue tracker search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    /// Issue type name, e.g. "Epic" or "Task"
    pub issue_type: String,
}

impl IssueSummary {
    pub fn is_epic(&self) -> bool {
        self.issue_type.eq_ignore_ascii_case("epic")
    }

    /// Picker label, e.g. `BUD-1: Buy laptops`
    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.summary)
    }
}

impl From<IssueSummary> for IssueRef {
    fn from(issue: IssueSummary) -> Self {
        IssueRef {
            key: issue.key,
            summary: issue.summary,
            issue_type: issue.issue_type,
        }
    }
}
