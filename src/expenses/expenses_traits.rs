use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::expenses::expenses_model::{Expense, ExpenseUpdate, ExpenseWithAlert, NewExpense};
use crate::models::Category;
use async_trait::async_trait;

/// Trait for expense repository operations
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;
    fn get_expenses_by_user(&self, user_id: &str) -> Result<Vec<Expense>>;
    fn get_expenses_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>>;
    fn get_expenses_by_category(&self, user_id: &str, category: Category) -> Result<Vec<Expense>>;
    /// Sum of the user's spend in one category over a half-open window.
    fn get_category_spend(
        &self,
        user_id: &str,
        category: Category,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<f64>;
    async fn insert_new_expense(&self, new_expense: NewExpense, tags_json: String)
        -> Result<Expense>;
    async fn update_expense(&self, update: ExpenseUpdate, tags_json: String)
        -> Result<Option<Expense>>;
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}

/// Trait for expense service operations
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>>;
    fn get_expenses_by_user(&self, user_id: &str) -> Result<Vec<Expense>>;
    fn get_expenses_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>>;
    fn get_expenses_by_category(&self, user_id: &str, category: Category) -> Result<Vec<Expense>>;
    /// Persists the expense, then evaluates the budget monitor for its
    /// category. The returned alert never blocks or fails the write.
    async fn log_expense(&self, new_expense: NewExpense) -> Result<ExpenseWithAlert>;
    async fn update_expense(&self, update: ExpenseUpdate) -> Result<Expense>;
    async fn delete_expense(&self, expense_id: &str) -> Result<bool>;
}
