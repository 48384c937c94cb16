use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use log::{debug, error, warn};

use crate::chores::chores_errors::ChoreError;
use crate::chores::chores_model::{Allowance, Chore, ChoreStatus, NewAllowance, NewChore};
use crate::chores::chores_traits::{
    AllowanceRepositoryTrait, ChoreRepositoryTrait, ChoreServiceTrait,
};
use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::errors::Result;
use crate::income::income_model::NewIncome;
use crate::income::income_traits::IncomeServiceTrait;
use crate::models::{IncomeSource, RecurringPeriod};
use crate::validation::Validator;

/// Service owning chores and allowances for child accounts.
///
/// Payouts go through the income service so every reward picks up the
/// child's streak bookkeeping like any other logged income.
pub struct ChoreService {
    chore_repository: Arc<dyn ChoreRepositoryTrait>,
    allowance_repository: Arc<dyn AllowanceRepositoryTrait>,
    income_service: Arc<dyn IncomeServiceTrait>,
}

impl ChoreService {
    pub fn new(
        chore_repository: Arc<dyn ChoreRepositoryTrait>,
        allowance_repository: Arc<dyn AllowanceRepositoryTrait>,
        income_service: Arc<dyn IncomeServiceTrait>,
    ) -> Self {
        ChoreService {
            chore_repository,
            allowance_repository,
            income_service,
        }
    }

    fn validate_new_chore(new_chore: &NewChore) -> Result<()> {
        let mut v = Validator::new();
        v.required_text("title", &new_chore.title, MAX_TITLE_LENGTH);
        v.optional_text(
            "description",
            new_chore.description.as_deref(),
            MAX_DESCRIPTION_LENGTH,
        );
        v.positive_amount("reward_amount", new_chore.reward_amount);
        v.recurring_pair(new_chore.is_recurring, new_chore.recurring_period.as_deref());
        if let Some(period) = new_chore.recurring_period.as_deref() {
            v.closed_set::<RecurringPeriod>("recurring_period", period);
        }
        Ok(v.finish()?)
    }

    /// Turns a failed conditional transition into the right domain error.
    fn transition_error(&self, chore_id: &str, to: ChoreStatus) -> Result<Chore> {
        let existing = self
            .chore_repository
            .get_chore(chore_id)
            .map_err(|e| e.for_operation("load chore"))?;
        Err(match existing {
            None => ChoreError::NotFound(chore_id.to_string()).into(),
            Some(chore) => ChoreError::InvalidTransition {
                id: chore.id,
                from: chore.status,
                to: to.as_str().to_string(),
            }
            .into(),
        })
    }
}

#[async_trait]
impl ChoreServiceTrait for ChoreService {
    fn get_chore(&self, chore_id: &str) -> Result<Option<Chore>> {
        self.chore_repository
            .get_chore(chore_id)
            .map_err(|e| e.for_operation("load chore"))
    }

    fn get_chores_for_child(&self, child_id: &str) -> Result<Vec<Chore>> {
        self.chore_repository
            .get_chores_for_child(child_id)
            .map_err(|e| e.for_operation("load chores"))
    }

    async fn create_chore(&self, new_chore: NewChore) -> Result<Chore> {
        Self::validate_new_chore(&new_chore)?;
        self.chore_repository
            .insert_new_chore(new_chore)
            .await
            .map_err(|e| e.for_operation("create chore"))
    }

    async fn complete_chore(&self, chore_id: &str) -> Result<Chore> {
        let transitioned = self
            .chore_repository
            .transition(chore_id, ChoreStatus::Unstarted, ChoreStatus::Completed)
            .await
            .map_err(|e| e.for_operation("complete chore"))?;
        match transitioned {
            Some(chore) => Ok(chore),
            None => self.transition_error(chore_id, ChoreStatus::Completed),
        }
    }

    async fn approve_chore(&self, chore_id: &str) -> Result<Chore> {
        let transitioned = self
            .chore_repository
            .transition(chore_id, ChoreStatus::Completed, ChoreStatus::Approved)
            .await
            .map_err(|e| e.for_operation("approve chore"))?;
        let chore = match transitioned {
            Some(chore) => chore,
            None => return self.transition_error(chore_id, ChoreStatus::Approved),
        };

        // Payout happens on approval only. If it fails the chore goes
        // back to completed so the approval can be retried.
        let payout = NewIncome {
            user_id: chore.child_id.clone(),
            amount: chore.reward_amount,
            source: IncomeSource::Chore.as_str().to_string(),
            description: format!("Chore reward: {}", chore.title),
            income_date: Utc::now().naive_utc(),
            is_recurring: false,
            recurring_period: None,
        };
        if let Err(e) = self.income_service.log_income(payout).await {
            warn!("Payout for chore {} failed, reverting approval: {}", chore.id, e);
            let reverted = self
                .chore_repository
                .transition(&chore.id, ChoreStatus::Approved, ChoreStatus::Completed)
                .await;
            if let Err(revert_err) = reverted {
                error!(
                    "Failed to revert approval of chore {}: {}",
                    chore.id, revert_err
                );
            }
            return Err(e.for_operation("approve chore"));
        }

        // Recurring chores spawn the next instance only now, so a missed
        // week never pre-creates a backlog.
        if chore.is_recurring {
            debug!("Spawning next instance of recurring chore {}", chore.id);
            self.chore_repository
                .insert_next_instance(chore.clone())
                .await
                .map_err(|e| e.for_operation("spawn next chore"))?;
        }

        Ok(chore)
    }

    async fn delete_chore(&self, chore_id: &str) -> Result<bool> {
        self.chore_repository
            .delete_chore(chore_id)
            .await
            .map_err(|e| e.for_operation("delete chore"))
    }

    async fn create_allowance(&self, new_allowance: NewAllowance) -> Result<Allowance> {
        let mut v = Validator::new();
        v.positive_amount("amount", new_allowance.amount);
        v.closed_set::<RecurringPeriod>("period", &new_allowance.period);
        v.finish()?;

        self.allowance_repository
            .insert_new_allowance(new_allowance)
            .await
            .map_err(|e| e.for_operation("create allowance"))
    }

    fn get_allowances_for_child(&self, child_id: &str) -> Result<Vec<Allowance>> {
        self.allowance_repository
            .get_allowances_for_child(child_id)
            .map_err(|e| e.for_operation("load allowances"))
    }

    async fn deactivate_allowance(&self, allowance_id: &str) -> Result<Allowance> {
        self.allowance_repository
            .set_active(allowance_id, false)
            .await
            .map_err(|e| e.for_operation("deactivate allowance"))?
            .ok_or_else(|| ChoreError::AllowanceNotFound(allowance_id.to_string()).into())
    }

    async fn pay_due_allowances(&self) -> Result<usize> {
        let now = Utc::now().naive_utc();
        let due = self
            .allowance_repository
            .get_due_allowances(now)
            .map_err(|e| e.for_operation("pay allowances"))?;

        let mut paid = 0;
        for allowance in due {
            let period = match allowance.period.parse::<RecurringPeriod>() {
                Ok(period) => period,
                Err(_) => {
                    error!(
                        "Allowance {} has unknown period '{}', skipping",
                        allowance.id, allowance.period
                    );
                    continue;
                }
            };

            let income = NewIncome {
                user_id: allowance.child_id.clone(),
                amount: allowance.amount,
                source: IncomeSource::Allowance.as_str().to_string(),
                description: format!("{} allowance", period),
                income_date: now,
                is_recurring: false,
                recurring_period: None,
            };
            if let Err(e) = self.income_service.log_income(income).await {
                error!("Allowance {} payout failed: {}", allowance.id, e);
                continue;
            }

            let next_due = allowance.next_due + Duration::days(period.days());
            self.allowance_repository
                .advance_next_due(&allowance.id, next_due)
                .await
                .map_err(|e| e.for_operation("pay allowances"))?;
            paid += 1;
        }
        Ok(paid)
    }
}
