use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{Error, Result};
use crate::goals::goals_errors::GoalError;
use crate::goals::goals_model::{Goal, GoalStatus, GoalUpdate, NewGoal};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::schema::goals;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let result = goals::table
            .find(goal_id)
            .first::<Goal>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_goals_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::deadline.asc())
            .load::<Goal>(&mut conn)?)
    }

    fn get_goals_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .filter(goals::status.eq(status.as_str()))
            .order(goals::deadline.asc())
            .load::<Goal>(&mut conn)?)
    }

    async fn insert_new_goal(&self, mut new_goal: NewGoal) -> Result<Goal> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let now = Utc::now().naive_utc();
                new_goal.id = Some(Uuid::new_v4().to_string());
                new_goal.created_at = Some(now);
                new_goal.updated_at = Some(now);

                Ok(diesel::insert_into(goals::table)
                    .values(&new_goal)
                    .returning(goals::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn update_goal(&self, update: GoalUpdate) -> Result<Option<Goal>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Goal>> {
                let goal_id = update.id.clone();
                let updated = diesel::update(goals::table.find(&goal_id))
                    .set((&update, goals::updated_at.eq(Utc::now().naive_utc())))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                Ok(goals::table
                    .find(&goal_id)
                    .first::<Goal>(conn)
                    .optional()?)
            })
            .await
    }

    async fn add_progress(&self, goal_id: &str, amount: f64) -> Result<Option<Goal>> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Goal>> {
                let goal = goals::table
                    .find(&goal_id)
                    .first::<Goal>(conn)
                    .optional()?;
                let goal = match goal {
                    Some(goal) => goal,
                    None => return Ok(None),
                };

                if goal.status != GoalStatus::Active.as_str() {
                    return Err(Error::Goal(GoalError::NotActive {
                        id: goal.id,
                        status: goal.status,
                    }));
                }

                let (new_amount, new_status) = goal.progress_outcome(amount);

                diesel::update(goals::table.find(&goal_id))
                    .set((
                        goals::current_amount.eq(new_amount),
                        goals::status.eq(new_status.as_str()),
                        goals::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                Ok(goals::table
                    .find(&goal_id)
                    .first::<Goal>(conn)
                    .optional()?)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<bool> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted = diesel::delete(goals::table.find(&goal_id)).execute(conn)?;
                Ok(deleted > 0)
            })
            .await
    }
}
