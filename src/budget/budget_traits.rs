use crate::budget::budget_model::{BudgetAlert, BudgetThreshold, ThresholdInput};
use crate::errors::Result;
use crate::models::Category;
use async_trait::async_trait;

/// Trait for budget threshold repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: Send + Sync {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<BudgetThreshold>>;
    fn get_threshold(&self, user_id: &str, category: Category) -> Result<Option<BudgetThreshold>>;
    /// Replaces the user's whole threshold set in one transaction.
    async fn replace_thresholds(
        &self,
        user_id: String,
        thresholds: Vec<ThresholdInput>,
    ) -> Result<Vec<BudgetThreshold>>;
}

/// Trait for the budget alert monitor
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn set_budget_thresholds(
        &self,
        user_id: &str,
        thresholds: Vec<ThresholdInput>,
    ) -> Result<Vec<BudgetThreshold>>;
    fn get_budget_thresholds(&self, user_id: &str) -> Result<Vec<BudgetThreshold>>;
    /// Current-calendar-month alert for one category, recomputed from the
    /// ledger on every call. `None` when no threshold is configured or
    /// spend is below the warning band.
    fn check_category_alert(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<BudgetAlert>>;
    fn check_budget_alerts(&self, user_id: &str) -> Result<Vec<BudgetAlert>>;
}
