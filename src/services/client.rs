//! Budget API Client
//!
//! `BudgetApi` is the port the state layer talks to; `BudgetClient` is its
//! reqwest implementation over the budget REST API and the issue tracker.

use crate::constants::{ISSUE_SEARCH_MAX_RESULTS, ISSUE_SEARCH_MIN_LEN};
use crate::domain::{
    ApiConfig, BreakdownEntry, BudgetOverview, Expense, ExpenseId, IssueKey, IssueSummary,
    NewExpense, Project, ProjectKey,
};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Operations the budget add-on needs from its collaborators
pub trait BudgetApi: Send + Sync + 'static {
    // ==================== Budget ====================

    fn fetch_overview(
        &self,
        project: &ProjectKey,
    ) -> impl Future<Output = Result<BudgetOverview>> + Send;

    /// Remaining budget; `None` when the server has none recorded
    fn fetch_remaining(&self, project: &ProjectKey)
    -> impl Future<Output = Result<Option<f64>>> + Send;

    fn set_total_budget(
        &self,
        project: &ProjectKey,
        total: f64,
    ) -> impl Future<Output = Result<()>> + Send;

    // ==================== Expenses ====================

    fn create_expense(&self, expense: &NewExpense)
    -> impl Future<Output = Result<Expense>> + Send;

    /// Persist an edited expense and return the server's canonical copy
    fn update_expense(&self, expense: &Expense) -> impl Future<Output = Result<Expense>> + Send;

    fn delete_expense(&self, id: &ExpenseId) -> impl Future<Output = Result<()>> + Send;

    fn fetch_project_expenses(
        &self,
        project: &ProjectKey,
    ) -> impl Future<Output = Result<Vec<Expense>>> + Send;

    fn fetch_issue_expenses(
        &self,
        issue: &IssueKey,
    ) -> impl Future<Output = Result<Vec<Expense>>> + Send;

    fn fetch_by_category(
        &self,
        project: &ProjectKey,
    ) -> impl Future<Output = Result<Vec<BreakdownEntry>>> + Send;

    fn fetch_by_phase(
        &self,
        project: &ProjectKey,
    ) -> impl Future<Output = Result<Vec<BreakdownEntry>>> + Send;

    // ==================== Alert Thresholds ====================

    fn fetch_thresholds(&self) -> impl Future<Output = Result<Vec<u32>>> + Send;

    fn add_threshold(&self, value: u32) -> impl Future<Output = Result<()>> + Send;

    fn remove_threshold(&self, value: u32) -> impl Future<Output = Result<()>> + Send;

    // ==================== Issue Tracker ====================

    fn search_issues(
        &self,
        project: &ProjectKey,
        term: &str,
    ) -> impl Future<Output = Result<Vec<IssueSummary>>> + Send;

    fn fetch_projects(&self) -> impl Future<Output = Result<Vec<Project>>> + Send;
}

// ==================== Wire Types ====================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetBudgetRequest<'a> {
    project_key: &'a str,
    total_budget: f64,
}

#[derive(Serialize)]
struct ThresholdRequest {
    threshold: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    issues: Vec<SearchIssue>,
}

#[derive(Deserialize)]
struct SearchIssue {
    key: String,
    #[serde(default)]
    fields: SearchFields,
}

#[derive(Deserialize, Default)]
struct SearchFields {
    summary: Option<String>,
    issuetype: Option<IssueTypeField>,
}

#[derive(Deserialize)]
struct IssueTypeField {
    name: String,
}

impl From<SearchIssue> for IssueSummary {
    fn from(issue: SearchIssue) -> Self {
        IssueSummary {
            key: issue.key,
            summary: issue.fields.summary.unwrap_or_default(),
            issue_type: issue
                .fields
                .issuetype
                .map(|t| t.name)
                .unwrap_or_default(),
        }
    }
}

/// JQL for the issue picker: text search within one project
pub fn issue_search_jql(project: &ProjectKey, term: &str) -> String {
    fn quote(value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }
    format!(
        "project = \"{}\" AND text ~ \"{}*\"",
        quote(project.as_str()),
        quote(term.trim())
    )
}

/// Whether a search term is long enough to send
pub fn is_searchable(term: &str) -> bool {
    term.trim().chars().count() >= ISSUE_SEARCH_MIN_LEN
}

/// Turn a non-2xx response into `ServerError`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "Failed to read error body");
            String::new()
        }
    };
    let message = match body.trim() {
        "" => status.canonical_reason().unwrap_or("request failed").to_string(),
        text => text.to_string(),
    };
    Err(Error::ServerError {
        status: status.as_u16(),
        message,
    })
}

// ==================== HTTP Client ====================

/// reqwest-backed `BudgetApi`
#[derive(Debug, Clone)]
pub struct BudgetClient {
    http: Client,
    base_url: String,
    issue_base_url: String,
}

impl BudgetClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            issue_base_url: config.issue_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn budget_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn issue_url(&self, path: &str) -> String {
        format!("{}{}", self.issue_base_url, path)
    }

    /// Send a request inside a span carrying a fresh correlation id
    async fn send(&self, method: &'static str, url: &str, request: RequestBuilder) -> Result<Response> {
        let request_id = Uuid::new_v4();
        let span = info_span!("http", %request_id, method, url);
        async move {
            debug!("Sending request");
            let response = request.send().await?;
            debug!(status = response.status().as_u16(), "Response received");
            check_status(response).await
        }
        .instrument(span)
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        let response = self.send("GET", &url, self.http.get(&url)).await?;
        Ok(response.json::<T>().await?)
    }
}

impl BudgetApi for BudgetClient {
    async fn fetch_overview(&self, project: &ProjectKey) -> Result<BudgetOverview> {
        self.get_json(self.budget_url(&format!("/budget/overview/{project}")))
            .await
    }

    async fn fetch_remaining(&self, project: &ProjectKey) -> Result<Option<f64>> {
        let url = self.budget_url(&format!("/budget/remaining/{project}"));
        let response = self.send("GET", &url, self.http.get(&url)).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Option<f64>>(&body).map_err(|e| Error::Decode {
            message: format!("remaining budget: {e}"),
        })
    }

    async fn set_total_budget(&self, project: &ProjectKey, total: f64) -> Result<()> {
        let url = self.budget_url("/budget/set");
        let body = SetBudgetRequest {
            project_key: project.as_str(),
            total_budget: total,
        };
        self.send("POST", &url, self.http.post(&url).json(&body))
            .await?;
        Ok(())
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        let url = self.budget_url("/budget");
        let response = self
            .send("POST", &url, self.http.post(&url).json(expense))
            .await?;
        Ok(response.json::<Expense>().await?)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Expense> {
        let url = self.budget_url(&format!("/budget/{}", expense.id));
        let response = self
            .send("PUT", &url, self.http.put(&url).json(expense))
            .await?;
        Ok(response.json::<Expense>().await?)
    }

    async fn delete_expense(&self, id: &ExpenseId) -> Result<()> {
        let url = self.budget_url(&format!("/budget/{id}"));
        self.send("DELETE", &url, self.http.delete(&url)).await?;
        Ok(())
    }

    async fn fetch_project_expenses(&self, project: &ProjectKey) -> Result<Vec<Expense>> {
        self.get_json(self.budget_url(&format!("/budget/expenses/all/{project}")))
            .await
    }

    async fn fetch_issue_expenses(&self, issue: &IssueKey) -> Result<Vec<Expense>> {
        self.get_json(self.budget_url(&format!("/budget/expenses/{issue}")))
            .await
    }

    async fn fetch_by_category(&self, project: &ProjectKey) -> Result<Vec<BreakdownEntry>> {
        self.get_json(self.budget_url(&format!("/budget/expenses/by-category/{project}")))
            .await
    }

    async fn fetch_by_phase(&self, project: &ProjectKey) -> Result<Vec<BreakdownEntry>> {
        self.get_json(self.budget_url(&format!("/budget/expenses/by-phase/{project}")))
            .await
    }

    async fn fetch_thresholds(&self) -> Result<Vec<u32>> {
        self.get_json(self.budget_url("/alert-thresholds")).await
    }

    async fn add_threshold(&self, value: u32) -> Result<()> {
        let url = self.budget_url("/alert-thresholds");
        let body = ThresholdRequest { threshold: value };
        self.send("POST", &url, self.http.post(&url).json(&body))
            .await?;
        Ok(())
    }

    async fn remove_threshold(&self, value: u32) -> Result<()> {
        let url = self.budget_url(&format!("/alert-thresholds/{value}"));
        self.send("DELETE", &url, self.http.delete(&url)).await?;
        Ok(())
    }

    async fn search_issues(&self, project: &ProjectKey, term: &str) -> Result<Vec<IssueSummary>> {
        if !is_searchable(term) {
            return Ok(Vec::new());
        }
        let url = self.issue_url("/search");
        let jql = issue_search_jql(project, term);
        let max_results = ISSUE_SEARCH_MAX_RESULTS.to_string();
        let request = self.http.get(&url).query(&[
            ("jql", jql.as_str()),
            ("fields", "key,summary,issuetype"),
            ("maxResults", max_results.as_str()),
        ]);
        let response = self.send("GET", &url, request).await?;
        let found = response.json::<SearchResponse>().await?;
        Ok(found.issues.into_iter().map(IssueSummary::from).collect())
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.get_json(self.issue_url("/project")).await
    }
}
