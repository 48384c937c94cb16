use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::errors::Result;
use crate::goals::goals_errors::GoalError;
use crate::goals::goals_model::{Goal, GoalStatus, GoalUpdate, NewGoal};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::models::{Category, RecurringPeriod};
use crate::validation::Validator;

/// Service owning the savings-goal lifecycle
pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
}

impl GoalService {
    pub fn new(repository: Arc<dyn GoalRepositoryTrait>) -> Self {
        GoalService { repository }
    }

    fn validate_new(new_goal: &NewGoal) -> Result<()> {
        let mut v = Validator::new();
        v.required_text("title", &new_goal.title, crate::constants::MAX_TITLE_LENGTH);
        v.optional_text(
            "description",
            new_goal.description.as_deref(),
            crate::constants::MAX_DESCRIPTION_LENGTH,
        );
        v.positive_amount("target_amount", new_goal.target_amount);
        v.closed_set::<Category>("category", &new_goal.category);
        v.required_text("crop_type", &new_goal.crop_type, 30);
        v.recurring_pair(new_goal.is_recurring, new_goal.recurring_period.as_deref());
        if let Some(period) = new_goal.recurring_period.as_deref() {
            v.closed_set::<RecurringPeriod>("recurring_period", period);
        }
        v.future_date("deadline", new_goal.deadline, Utc::now().naive_utc());
        Ok(v.finish()?)
    }

    fn validate_update(existing: &Goal, update: &GoalUpdate) -> Result<()> {
        let mut v = Validator::new();
        v.required_text("title", &update.title, crate::constants::MAX_TITLE_LENGTH);
        v.optional_text(
            "description",
            update.description.as_deref(),
            crate::constants::MAX_DESCRIPTION_LENGTH,
        );
        v.positive_amount("target_amount", update.target_amount);
        v.closed_set::<Category>("category", &update.category);
        v.required_text("crop_type", &update.crop_type, 30);
        v.recurring_pair(update.is_recurring, update.recurring_period.as_deref());
        if let Some(period) = update.recurring_period.as_deref() {
            v.closed_set::<RecurringPeriod>("recurring_period", period);
        }
        // An edit may not shrink the target below money already saved.
        if update.target_amount < existing.current_amount {
            v.violation(
                "target_amount",
                "must not be lower than the amount already saved",
            );
        }
        let next_status = v.closed_set::<GoalStatus>("status", &update.status);
        if next_status == Some(GoalStatus::Active) {
            v.future_date("deadline", update.deadline, Utc::now().naive_utc());
        }
        v.finish()?;

        let current_status = existing.goal_status();
        let next_status = next_status.expect("status parsed above");
        match current_status {
            Some(current) if current.can_transition_to(next_status) => Ok(()),
            _ => Err(GoalError::InvalidTransition {
                id: existing.id.clone(),
                from: existing.status.clone(),
                to: next_status.as_str().to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        self.repository
            .get_goal(goal_id)
            .map_err(|e| e.for_operation("load goal"))
    }

    fn get_goals_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.repository
            .get_goals_by_user(user_id)
            .map_err(|e| e.for_operation("load goals"))
    }

    fn get_goals_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<Goal>> {
        self.repository
            .get_goals_by_status(user_id, status)
            .map_err(|e| e.for_operation("load goals"))
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        Self::validate_new(&new_goal)?;
        debug!("Planting new goal '{}' for {}", new_goal.title, new_goal.user_id);
        self.repository
            .insert_new_goal(new_goal)
            .await
            .map_err(|e| e.for_operation("create goal"))
    }

    async fn update_goal(&self, update: GoalUpdate) -> Result<Goal> {
        let existing = self
            .repository
            .get_goal(&update.id)
            .map_err(|e| e.for_operation("update goal"))?
            .ok_or_else(|| GoalError::NotFound(update.id.clone()))?;
        Self::validate_update(&existing, &update)?;

        let goal_id = update.id.clone();
        self.repository
            .update_goal(update)
            .await
            .map_err(|e| e.for_operation("update goal"))?
            .ok_or_else(|| GoalError::NotFound(goal_id).into())
    }

    async fn add_goal_progress(&self, goal_id: &str, amount: f64) -> Result<Goal> {
        let mut v = Validator::new();
        v.positive_amount("amount", amount);
        v.finish()?;

        self.repository
            .add_progress(goal_id, amount)
            .await
            .map_err(|e| e.for_operation("add goal progress"))?
            .ok_or_else(|| GoalError::NotFound(goal_id.to_string()).into())
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<bool> {
        self.repository
            .delete_goal(goal_id)
            .await
            .map_err(|e| e.for_operation("delete goal"))
    }
}
