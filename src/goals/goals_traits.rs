use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalStatus, GoalUpdate, NewGoal};
use async_trait::async_trait;

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>>;
    fn get_goals_by_user(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn get_goals_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<Goal>>;
    async fn insert_new_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, update: GoalUpdate) -> Result<Option<Goal>>;
    /// Adds progress and, when the target is reached, flips the goal to
    /// completed in the same transaction. `None` when the goal is missing.
    async fn add_progress(&self, goal_id: &str, amount: f64) -> Result<Option<Goal>>;
    async fn delete_goal(&self, goal_id: &str) -> Result<bool>;
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>>;
    fn get_goals_by_user(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn get_goals_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<Goal>>;
    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal>;
    async fn update_goal(&self, update: GoalUpdate) -> Result<Goal>;
    async fn add_goal_progress(&self, goal_id: &str, amount: f64) -> Result<Goal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<bool>;
}
