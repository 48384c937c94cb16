use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::DashMap;
use log::debug;
use num_traits::ToPrimitive;
use tokio::sync::Mutex;

use crate::constants::MAX_DESCRIPTION_LENGTH;
use crate::errors::Result;
use crate::income::income_errors::IncomeError;
use crate::income::income_model::{Income, IncomeUpdate, NewIncome};
use crate::income::income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
use crate::models::{IncomeSource, RecurringPeriod};
use crate::streaks;
use crate::validation::Validator;

/// Service owning the income ledger and its streak bookkeeping.
///
/// Logging income is a read-increment-write on the user's streak, so the
/// whole sequence runs under a per-user mutex: two concurrent logs for
/// the same user always produce distinct, consecutive streak counts.
pub struct IncomeService {
    repository: Arc<dyn IncomeRepositoryTrait>,
    streak_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl IncomeService {
    pub fn new(repository: Arc<dyn IncomeRepositoryTrait>) -> Self {
        IncomeService {
            repository,
            streak_locks: DashMap::new(),
        }
    }

    fn validate_fields(
        amount: f64,
        source: &str,
        description: &str,
        is_recurring: bool,
        recurring_period: Option<&str>,
    ) -> Result<()> {
        let mut v = Validator::new();
        v.positive_amount("amount", amount);
        v.closed_set::<IncomeSource>("source", source);
        v.required_text("description", description, MAX_DESCRIPTION_LENGTH);
        v.recurring_pair(is_recurring, recurring_period);
        if let Some(period) = recurring_period {
            v.closed_set::<RecurringPeriod>("recurring_period", period);
        }
        Ok(v.finish()?)
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.streak_locks
            .entry(user_id.to_string())
            .or_default()
            .value()
            .clone()
    }
}

#[async_trait]
impl IncomeServiceTrait for IncomeService {
    fn get_income(&self, income_id: &str) -> Result<Option<Income>> {
        self.repository
            .get_income(income_id)
            .map_err(|e| e.for_operation("load income"))
    }

    fn get_incomes_by_user(&self, user_id: &str) -> Result<Vec<Income>> {
        self.repository
            .get_incomes_by_user(user_id)
            .map_err(|e| e.for_operation("load incomes"))
    }

    fn get_incomes_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Income>> {
        self.repository
            .get_incomes_by_date_range(user_id, start, end)
            .map_err(|e| e.for_operation("load incomes"))
    }

    fn get_incomes_by_source(&self, user_id: &str, source: IncomeSource) -> Result<Vec<Income>> {
        self.repository
            .get_incomes_by_source(user_id, source)
            .map_err(|e| e.for_operation("load incomes"))
    }

    fn get_current_streak(&self, user_id: &str) -> Result<i32> {
        self.repository
            .get_current_streak(user_id)
            .map_err(|e| e.for_operation("read streak"))
    }

    async fn log_income(&self, new_income: NewIncome) -> Result<Income> {
        Self::validate_fields(
            new_income.amount,
            &new_income.source,
            &new_income.description,
            new_income.is_recurring,
            new_income.recurring_period.as_deref(),
        )?;

        let lock = self.user_lock(&new_income.user_id);
        let _guard = lock.lock().await;

        // A streak lookup failure aborts the log: income is never
        // persisted with a guessed streak.
        let current = self
            .repository
            .get_current_streak(&new_income.user_id)
            .map_err(|e| e.for_operation("log income"))?;
        let streak = current + 1;
        let multiplier = streaks::streak_multiplier(streak);

        debug!(
            "Logging income for {}: streak {} -> multiplier {}",
            new_income.user_id, streak, multiplier
        );

        self.repository
            .insert_new_income(new_income, streak, multiplier.to_f64().unwrap_or(1.0))
            .await
            .map_err(|e| e.for_operation("log income"))
    }

    async fn update_income(&self, update: IncomeUpdate) -> Result<Income> {
        Self::validate_fields(
            update.amount,
            &update.source,
            &update.description,
            update.is_recurring,
            update.recurring_period.as_deref(),
        )?;
        let income_id = update.id.clone();
        self.repository
            .update_income(update)
            .await
            .map_err(|e| e.for_operation("update income"))?
            .ok_or_else(|| IncomeError::NotFound(income_id).into())
    }

    async fn delete_income(&self, income_id: &str) -> Result<bool> {
        self.repository
            .delete_income(income_id)
            .await
            .map_err(|e| e.for_operation("delete income"))
    }

    async fn reset_streak(&self, user_id: &str) -> Result<()> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;
        self.repository
            .reset_streak(user_id)
            .await
            .map_err(|e| e.for_operation("reset streak"))
    }
}
