//! Expense - Budget line items
//!
//! An expense is one budget entry charged against a project and linked to
//! one or more issues. It is the row type of the dashboard expense table and
//! of the per-issue linked expenses list.

use crate::constants::PREDEFINED_CATEGORIES;
use crate::domain::null_as_default;
use crate::error::{Error, FieldErrors, Result};
use crate::table::{CellValue, ColumnDescriptor, ColumnKind, CsvRecord, TableRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// ==================== Identity ====================

/// Server-assigned expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExpenseId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issue linked to an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub issue_type: String,
}

impl IssueRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            summary: String::new(),
            issue_type: String::new(),
        }
    }
}

// ==================== Expense Row ====================

/// A stored expense as returned by the budget API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget_category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_issues: Vec<IssueRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, with = "expense_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epic_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_key: Option<String>,
}

impl Expense {
    /// Keys of the linked issues, in link order
    pub fn issue_keys(&self) -> impl Iterator<Item = &str> {
        self.selected_issues.iter().map(|issue| issue.key.as_str())
    }
}

/// Column keys of the expense table
pub mod expense_columns {
    pub const NAME: &str = "budgetName";
    pub const CATEGORY: &str = "budgetCategory";
    pub const AMOUNT: &str = "amount";
    pub const ISSUES: &str = "selectedIssues";
    pub const DESCRIPTION: &str = "description";
    pub const DATE: &str = "date";
}

pub const EXPENSE_COLUMNS: &[ColumnDescriptor] = &[
    ColumnDescriptor::new(expense_columns::NAME, "Expense Name", ColumnKind::Text).sortable(),
    ColumnDescriptor::new(expense_columns::CATEGORY, "Category", ColumnKind::Text)
        .sortable()
        .filterable(),
    ColumnDescriptor::new(expense_columns::AMOUNT, "Amount", ColumnKind::Number)
        .sortable()
        .filterable(),
    ColumnDescriptor::new(
        expense_columns::ISSUES,
        "Associated Issues/Epics",
        ColumnKind::Tags,
    )
    .sortable()
    .filterable(),
    ColumnDescriptor::new(expense_columns::DESCRIPTION, "Description", ColumnKind::Text)
        .sortable(),
    ColumnDescriptor::new(expense_columns::DATE, "Date", ColumnKind::Date).sortable(),
];

/// A single field change staged on an expense being edited
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseEdit {
    Name(String),
    Category(String),
    Amount(f64),
    Description(String),
    Date(Option<NaiveDate>),
    Issues(Vec<IssueRef>),
    AddIssue(IssueRef),
    RemoveIssue(String),
}

impl TableRow for Expense {
    type Id = ExpenseId;
    type Edit = ExpenseEdit;

    fn id(&self) -> ExpenseId {
        self.id.clone()
    }

    fn cell(&self, key: &str) -> CellValue<'_> {
        match key {
            expense_columns::NAME => CellValue::text(&self.budget_name),
            expense_columns::CATEGORY => CellValue::text(&self.budget_category),
            expense_columns::AMOUNT => CellValue::Number(self.amount),
            expense_columns::ISSUES => {
                CellValue::Tags(self.issue_keys().map(Cow::Borrowed).collect())
            }
            expense_columns::DESCRIPTION => CellValue::text(&self.description),
            expense_columns::DATE => self.date.map_or(CellValue::Empty, CellValue::Date),
            _ => CellValue::Empty,
        }
    }

    fn apply_edit(&mut self, edit: ExpenseEdit) {
        match edit {
            ExpenseEdit::Name(name) => self.budget_name = name,
            ExpenseEdit::Category(category) => self.budget_category = category,
            ExpenseEdit::Amount(amount) => self.amount = amount,
            ExpenseEdit::Description(description) => self.description = description,
            ExpenseEdit::Date(date) => self.date = date,
            ExpenseEdit::Issues(issues) => self.selected_issues = issues,
            ExpenseEdit::AddIssue(issue) => {
                if !self.selected_issues.iter().any(|i| i.key == issue.key) {
                    self.selected_issues.push(issue);
                }
            }
            ExpenseEdit::RemoveIssue(key) => self.selected_issues.retain(|i| i.key != key),
        }
    }

    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if self.budget_name.trim().is_empty() {
            errors.insert("budgetName", "Expense Name cannot be empty");
        }
        if self.budget_category.trim().is_empty() {
            errors.insert("budgetCategory", "Expense Category is required");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            errors.insert("amount", "Please enter a valid amount");
        }
        errors.into_result()
    }
}

impl CsvRecord for Expense {
    const HEADERS: &'static [&'static str] = &[
        "Expense Name",
        "Category",
        "Amount",
        "Issues",
        "Description",
        "Date",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.budget_name.clone(),
            self.budget_category.clone(),
            self.amount.to_string(),
            self.issue_keys().collect::<Vec<_>>().join(";"),
            self.description.clone(),
            self.date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]
    }
}

// ==================== Creation ====================

/// Body of `POST /budget`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub project_key: String,
    pub budget_name: String,
    pub budget_category: String,
    pub selected_issues: Vec<IssueRef>,
    pub description: String,
    pub amount: f64,
    #[serde(default, with = "expense_date")]
    pub date: Option<NaiveDate>,
}

/// Category picked in the expense form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryChoice {
    #[default]
    Unset,
    Predefined(String),
    /// "custom" option with the text typed alongside it
    Custom(String),
}

impl CategoryChoice {
    /// Map a category name to a choice, treating unknown names as custom
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            CategoryChoice::Unset
        } else if PREDEFINED_CATEGORIES.contains(&name) {
            CategoryChoice::Predefined(name.to_string())
        } else {
            CategoryChoice::Custom(name.to_string())
        }
    }
}

/// Unvalidated expense form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub budget_name: String,
    pub category: CategoryChoice,
    pub selected_issues: Vec<IssueRef>,
    /// Amount as typed
    pub amount: String,
    pub description: String,
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// Check every field, collecting one message per failing field
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.budget_name.trim().is_empty() {
            errors.insert("budgetName", "Expense Name cannot be empty");
        }
        match &self.category {
            CategoryChoice::Unset => {
                errors.insert("budgetCategory", "Expense Category is required");
            }
            CategoryChoice::Predefined(name) if name.trim().is_empty() => {
                errors.insert("budgetCategory", "Expense Category is required");
            }
            CategoryChoice::Custom(name) if name.trim().is_empty() => {
                errors.insert("customCategory", "Custom Category cannot be empty");
            }
            _ => {}
        }
        if self.selected_issues.is_empty() {
            errors.insert("selectedIssues", "At least one Jira issue must be selected");
        }
        if self.parsed_amount().is_none() {
            errors.insert("amount", "Please enter a valid amount");
        }
        if self.description.trim().is_empty() {
            errors.insert("description", "Description cannot be empty");
        }

        errors
    }

    fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
    }

    /// Validate and build the create request for `project_key`
    pub fn into_new_expense(self, project_key: &str) -> Result<NewExpense> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(Error::ValidationFailure { errors });
        }

        let amount = self
            .parsed_amount()
            .ok_or_else(|| Error::validation("amount", "Please enter a valid amount"))?;
        let budget_category = match self.category {
            CategoryChoice::Predefined(name) | CategoryChoice::Custom(name) => {
                name.trim().to_string()
            }
            CategoryChoice::Unset => {
                return Err(Error::validation(
                    "budgetCategory",
                    "Expense Category is required",
                ));
            }
        };

        Ok(NewExpense {
            project_key: project_key.to_string(),
            budget_name: self.budget_name.trim().to_string(),
            budget_category,
            selected_issues: self.selected_issues,
            description: self.description.trim().to_string(),
            amount,
            date: self.date,
        })
    }
}

// ==================== Date Wire Format ====================

/// Dates are written as `YYYY-MM-DD`; reads also accept RFC 3339 timestamps.
/// Unparseable values read as no date.
pub(crate) mod expense_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(value, FORMAT) {
            return Some(date);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
            return Some(ts.date_naive());
        }
        // Longer strings starting with a plain date, e.g. "2024-03-01T10:00"
        value
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, FORMAT).ok())
    }

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}
