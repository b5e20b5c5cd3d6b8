//! In-memory `BudgetApi` double for service and state tests

use crate::domain::{
    BreakdownEntry, BudgetOverview, Expense, ExpenseId, IssueKey, IssueRef, IssueSummary,
    NewExpense, Project, ProjectKey,
};
use crate::error::{Error, Result};
use crate::services::BudgetApi;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MockData {
    overview: BudgetOverview,
    remaining: Option<f64>,
    expenses: Vec<Expense>,
    categories: Vec<BreakdownEntry>,
    thresholds: Vec<u32>,
    projects: Vec<Project>,
    issues: Vec<IssueSummary>,
    next_id: u32,
}

#[derive(Default)]
pub struct MockBudgetApi {
    data: Mutex<MockData>,
    calls: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockBudgetApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expense dated 2024-05-10 linked to `<project>-1`
    pub fn expense(id: &str, project: &str, amount: f64) -> Expense {
        Expense {
            id: ExpenseId::from(id),
            project_key: project.to_string(),
            budget_name: format!("Expense {id}"),
            budget_category: "Software".to_string(),
            selected_issues: vec![IssueRef::new(format!("{project}-1"))],
            description: "test".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 5, 10),
            epic_key: None,
            issue_key: None,
        }
    }

    pub fn with_overview(self, overview: BudgetOverview) -> Self {
        self.data().overview = overview;
        self
    }

    pub fn with_remaining(self, remaining: Option<f64>) -> Self {
        self.data().remaining = remaining;
        self
    }

    pub fn with_expenses(self, expenses: Vec<Expense>) -> Self {
        self.data().expenses = expenses;
        self
    }

    pub fn with_categories(self, categories: Vec<BreakdownEntry>) -> Self {
        self.data().categories = categories;
        self
    }

    pub fn with_thresholds(self, thresholds: Vec<u32>) -> Self {
        self.data().thresholds = thresholds;
        self
    }

    pub fn with_projects(self, keys: &[&str]) -> Self {
        self.data().projects = keys
            .iter()
            .map(|key| Project {
                id: key.to_lowercase(),
                key: key.to_string(),
                name: format!("Project {key}"),
            })
            .collect();
        self
    }

    pub fn with_issues(self, issues: Vec<IssueSummary>) -> Self {
        self.data().issues = issues;
        self
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Calls made so far, e.g. `"PUT e1"`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("mock calls").clone()
    }

    pub fn stored_expenses(&self) -> Vec<Expense> {
        self.data().expenses.clone()
    }

    pub fn stored_thresholds(&self) -> Vec<u32> {
        self.data().thresholds.clone()
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().expect("mock data")
    }

    fn read(&self, call: String) -> Result<()> {
        self.calls.lock().expect("mock calls").push(call);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::NetworkFailure {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn write(&self, call: String) -> Result<()> {
        self.calls.lock().expect("mock calls").push(call);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::ServerError {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> Error {
    Error::ServerError {
        status: 404,
        message: format!("{what} not found"),
    }
}

impl BudgetApi for MockBudgetApi {
    async fn fetch_overview(&self, project: &ProjectKey) -> Result<BudgetOverview> {
        self.read(format!("GET overview {project}"))?;
        Ok(self.data().overview.clone())
    }

    async fn fetch_remaining(&self, project: &ProjectKey) -> Result<Option<f64>> {
        self.read(format!("GET remaining {project}"))?;
        Ok(self.data().remaining)
    }

    async fn set_total_budget(&self, project: &ProjectKey, total: f64) -> Result<()> {
        self.write(format!("POST set {project} {total}"))?;
        let mut data = self.data();
        data.overview.total_budget = total;
        data.overview.remaining_budget = total;
        data.remaining = Some(total);
        Ok(())
    }

    async fn create_expense(&self, expense: &NewExpense) -> Result<Expense> {
        self.write(format!("POST budget {}", expense.budget_name))?;
        let mut data = self.data();
        data.next_id += 1;
        let created = Expense {
            id: ExpenseId::new(format!("new-{}", data.next_id)),
            project_key: expense.project_key.clone(),
            budget_name: expense.budget_name.clone(),
            budget_category: expense.budget_category.clone(),
            selected_issues: expense.selected_issues.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            date: expense.date,
            epic_key: None,
            issue_key: None,
        };
        if let Some(remaining) = data.remaining.as_mut() {
            *remaining -= expense.amount;
        }
        data.expenses.push(created.clone());
        Ok(created)
    }

    async fn update_expense(&self, expense: &Expense) -> Result<Expense> {
        self.write(format!("PUT {}", expense.id))?;
        let mut data = self.data();
        let slot = data
            .expenses
            .iter_mut()
            .find(|e| e.id == expense.id)
            .ok_or_else(|| not_found("expense"))?;
        // Canonical copy: the server trims names
        let mut canonical = expense.clone();
        canonical.budget_name = canonical.budget_name.trim().to_string();
        *slot = canonical.clone();
        Ok(canonical)
    }

    async fn delete_expense(&self, id: &ExpenseId) -> Result<()> {
        self.write(format!("DELETE {id}"))?;
        let mut data = self.data();
        let before = data.expenses.len();
        data.expenses.retain(|e| &e.id != id);
        if data.expenses.len() == before {
            return Err(not_found("expense"));
        }
        Ok(())
    }

    async fn fetch_project_expenses(&self, project: &ProjectKey) -> Result<Vec<Expense>> {
        self.read(format!("GET expenses {project}"))?;
        Ok(self
            .data()
            .expenses
            .iter()
            .filter(|e| e.project_key == project.as_str())
            .cloned()
            .collect())
    }

    async fn fetch_issue_expenses(&self, issue: &IssueKey) -> Result<Vec<Expense>> {
        self.read(format!("GET linked {issue}"))?;
        Ok(self
            .data()
            .expenses
            .iter()
            .filter(|e| e.issue_keys().any(|key| key == issue.as_str()))
            .cloned()
            .collect())
    }

    async fn fetch_by_category(&self, project: &ProjectKey) -> Result<Vec<BreakdownEntry>> {
        self.read(format!("GET by-category {project}"))?;
        Ok(self.data().categories.clone())
    }

    async fn fetch_by_phase(&self, project: &ProjectKey) -> Result<Vec<BreakdownEntry>> {
        self.read(format!("GET by-phase {project}"))?;
        Ok(Vec::new())
    }

    async fn fetch_thresholds(&self) -> Result<Vec<u32>> {
        self.read("GET thresholds".to_string())?;
        Ok(self.data().thresholds.clone())
    }

    async fn add_threshold(&self, value: u32) -> Result<()> {
        self.write(format!("POST threshold {value}"))?;
        self.data().thresholds.push(value);
        Ok(())
    }

    async fn remove_threshold(&self, value: u32) -> Result<()> {
        self.write(format!("DELETE threshold {value}"))?;
        self.data().thresholds.retain(|v| *v != value);
        Ok(())
    }

    async fn search_issues(&self, project: &ProjectKey, term: &str) -> Result<Vec<IssueSummary>> {
        self.read(format!("GET search {project} {term}"))?;
        let term = term.to_lowercase();
        Ok(self
            .data()
            .issues
            .iter()
            .filter(|issue| {
                issue.key.to_lowercase().contains(&term)
                    || issue.summary.to_lowercase().contains(&term)
            })
            .cloned()
            .collect())
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.read("GET projects".to_string())?;
        Ok(self.data().projects.clone())
    }
}
