use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::income::income_model::{Income, IncomeUpdate, NewIncome};
use crate::models::IncomeSource;
use async_trait::async_trait;

/// Trait for income repository operations
#[async_trait]
pub trait IncomeRepositoryTrait: Send + Sync {
    fn get_income(&self, income_id: &str) -> Result<Option<Income>>;
    fn get_incomes_by_user(&self, user_id: &str) -> Result<Vec<Income>>;
    fn get_incomes_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Income>>;
    fn get_incomes_by_source(&self, user_id: &str, source: IncomeSource) -> Result<Vec<Income>>;
    /// The user's current streak, read from the most recent income record.
    fn get_current_streak(&self, user_id: &str) -> Result<i32>;
    async fn insert_new_income(
        &self,
        new_income: NewIncome,
        streak_count: i32,
        multiplier: f64,
    ) -> Result<Income>;
    async fn update_income(&self, update: IncomeUpdate) -> Result<Option<Income>>;
    async fn delete_income(&self, income_id: &str) -> Result<bool>;
    /// Zeroes the stored streak so the next logged income starts at 1.
    async fn reset_streak(&self, user_id: &str) -> Result<()>;
}

/// Trait for income service operations
#[async_trait]
pub trait IncomeServiceTrait: Send + Sync {
    fn get_income(&self, income_id: &str) -> Result<Option<Income>>;
    fn get_incomes_by_user(&self, user_id: &str) -> Result<Vec<Income>>;
    fn get_incomes_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Income>>;
    fn get_incomes_by_source(&self, user_id: &str, source: IncomeSource) -> Result<Vec<Income>>;
    fn get_current_streak(&self, user_id: &str) -> Result<i32>;
    /// Logs income with streak bookkeeping: the persisted record already
    /// carries the incremented streak and its multiplier.
    async fn log_income(&self, new_income: NewIncome) -> Result<Income>;
    async fn update_income(&self, update: IncomeUpdate) -> Result<Income>;
    async fn delete_income(&self, income_id: &str) -> Result<bool>;
    async fn reset_streak(&self, user_id: &str) -> Result<()>;
}
