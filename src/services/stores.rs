//! Row Stores
//!
//! Adapters that let the table engine persist rows through `BudgetApi`.

use crate::domain::{Expense, ExpenseId, ThresholdRow};
use crate::error::Result;
use crate::services::BudgetApi;
use crate::table::{RowRemover, RowUpdater};

/// Expense rows backed by `PUT /budget/{id}` and `DELETE /budget/{id}`
pub struct ExpenseRows<'a, A> {
    api: &'a A,
}

impl<'a, A: BudgetApi> ExpenseRows<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: BudgetApi> RowUpdater<Expense> for ExpenseRows<'_, A> {
    async fn update_row(&self, row: Expense) -> Result<Expense> {
        self.api.update_expense(&row).await
    }
}

impl<A: BudgetApi> RowRemover<Expense> for ExpenseRows<'_, A> {
    async fn remove_row(&self, id: ExpenseId) -> Result<()> {
        self.api.delete_expense(&id).await
    }
}

/// Threshold rows backed by `DELETE /alert-thresholds/{value}`
pub struct ThresholdRows<'a, A> {
    api: &'a A,
}

impl<'a, A: BudgetApi> ThresholdRows<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: BudgetApi> RowRemover<ThresholdRow> for ThresholdRows<'_, A> {
    async fn remove_row(&self, value: u32) -> Result<()> {
        self.api.remove_threshold(value).await
    }
}
