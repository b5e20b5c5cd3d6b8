//! Projects and issue keys

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key of the project a request was issued for
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ProjectKey(pub Arc<str>);

impl ProjectKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ProjectKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a single issue, e.g. `BUD-12`
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct IssueKey(pub Arc<str>);

impl IssueKey {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project as listed by the issue tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
}

impl Project {
    pub fn project_key(&self) -> ProjectKey {
        ProjectKey::new(self.key.as_str())
    }
}
