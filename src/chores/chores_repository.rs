use crate::chores::chores_model::{Allowance, Chore, ChoreStatus, NewAllowance, NewChore};
use crate::chores::chores_traits::{AllowanceRepositoryTrait, ChoreRepositoryTrait};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::models::RecurringPeriod;
use crate::schema::{allowances, chores};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct ChoreRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ChoreRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ChoreRepository { pool, writer }
    }
}

#[async_trait]
impl ChoreRepositoryTrait for ChoreRepository {
    fn get_chore(&self, chore_id: &str) -> Result<Option<Chore>> {
        let mut conn = get_connection(&self.pool)?;
        let result = chores::table
            .find(chore_id)
            .first::<Chore>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_chores_for_child(&self, child_id: &str) -> Result<Vec<Chore>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(chores::table
            .filter(chores::child_id.eq(child_id))
            .order(chores::created_at.desc())
            .load::<Chore>(&mut conn)?)
    }

    fn get_chores_by_status(&self, child_id: &str, status: ChoreStatus) -> Result<Vec<Chore>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(chores::table
            .filter(chores::child_id.eq(child_id))
            .filter(chores::status.eq(status.as_str()))
            .order(chores::created_at.desc())
            .load::<Chore>(&mut conn)?)
    }

    async fn insert_new_chore(&self, new_chore: NewChore) -> Result<Chore> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Chore> {
                let now = Utc::now().naive_utc();
                Ok(diesel::insert_into(chores::table)
                    .values((
                        chores::id.eq(Uuid::new_v4().to_string()),
                        chores::child_id.eq(&new_chore.child_id),
                        chores::parent_id.eq(&new_chore.parent_id),
                        chores::title.eq(&new_chore.title),
                        chores::description.eq(new_chore.description.clone()),
                        chores::reward_amount.eq(new_chore.reward_amount),
                        chores::status.eq(ChoreStatus::Unstarted.as_str()),
                        chores::is_recurring.eq(new_chore.is_recurring),
                        chores::recurring_period.eq(new_chore.recurring_period.clone()),
                        chores::due_date.eq(new_chore.due_date),
                        chores::created_at.eq(now),
                        chores::updated_at.eq(now),
                    ))
                    .returning(chores::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn transition(
        &self,
        chore_id: &str,
        from: ChoreStatus,
        to: ChoreStatus,
    ) -> Result<Option<Chore>> {
        let chore_id = chore_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Chore>> {
                let now = Utc::now().naive_utc();
                let guarded = chores::table
                    .find(&chore_id)
                    .filter(chores::status.eq(from.as_str()));

                let updated = match to {
                    ChoreStatus::Completed => diesel::update(guarded)
                        .set((
                            chores::status.eq(to.as_str()),
                            chores::completed_at.eq(now),
                            chores::updated_at.eq(now),
                        ))
                        .execute(conn)?,
                    ChoreStatus::Approved => diesel::update(guarded)
                        .set((
                            chores::status.eq(to.as_str()),
                            chores::approved_at.eq(now),
                            chores::updated_at.eq(now),
                        ))
                        .execute(conn)?,
                    ChoreStatus::Unstarted => diesel::update(guarded)
                        .set((
                            chores::status.eq(to.as_str()),
                            chores::completed_at.eq(None::<NaiveDateTime>),
                            chores::approved_at.eq(None::<NaiveDateTime>),
                            chores::updated_at.eq(now),
                        ))
                        .execute(conn)?,
                };
                if updated == 0 {
                    return Ok(None);
                }
                Ok(chores::table
                    .find(&chore_id)
                    .first::<Chore>(conn)
                    .optional()?)
            })
            .await
    }

    async fn insert_next_instance(&self, chore: Chore) -> Result<Chore> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Chore> {
                let now = Utc::now().naive_utc();
                let next_due = match (
                    chore.due_date,
                    chore
                        .recurring_period
                        .as_deref()
                        .and_then(|p| p.parse::<RecurringPeriod>().ok()),
                ) {
                    (Some(due), Some(period)) => Some(due + Duration::days(period.days())),
                    _ => None,
                };

                Ok(diesel::insert_into(chores::table)
                    .values((
                        chores::id.eq(Uuid::new_v4().to_string()),
                        chores::child_id.eq(&chore.child_id),
                        chores::parent_id.eq(&chore.parent_id),
                        chores::title.eq(&chore.title),
                        chores::description.eq(chore.description.clone()),
                        chores::reward_amount.eq(chore.reward_amount),
                        chores::status.eq(ChoreStatus::Unstarted.as_str()),
                        chores::is_recurring.eq(chore.is_recurring),
                        chores::recurring_period.eq(chore.recurring_period.clone()),
                        chores::due_date.eq(next_due),
                        chores::created_at.eq(now),
                        chores::updated_at.eq(now),
                    ))
                    .returning(chores::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn delete_chore(&self, chore_id: &str) -> Result<bool> {
        let chore_id = chore_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted = diesel::delete(chores::table.find(&chore_id)).execute(conn)?;
                Ok(deleted > 0)
            })
            .await
    }
}

pub struct AllowanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AllowanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AllowanceRepository { pool, writer }
    }
}

#[async_trait]
impl AllowanceRepositoryTrait for AllowanceRepository {
    fn get_allowance(&self, allowance_id: &str) -> Result<Option<Allowance>> {
        let mut conn = get_connection(&self.pool)?;
        let result = allowances::table
            .find(allowance_id)
            .first::<Allowance>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_allowances_for_child(&self, child_id: &str) -> Result<Vec<Allowance>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(allowances::table
            .filter(allowances::child_id.eq(child_id))
            .load::<Allowance>(&mut conn)?)
    }

    fn get_due_allowances(&self, now: NaiveDateTime) -> Result<Vec<Allowance>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(allowances::table
            .filter(allowances::is_active.eq(true))
            .filter(allowances::next_due.le(now))
            .load::<Allowance>(&mut conn)?)
    }

    async fn insert_new_allowance(&self, new_allowance: NewAllowance) -> Result<Allowance> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Allowance> {
                let now = Utc::now().naive_utc();
                Ok(diesel::insert_into(allowances::table)
                    .values((
                        allowances::id.eq(Uuid::new_v4().to_string()),
                        allowances::child_id.eq(&new_allowance.child_id),
                        allowances::parent_id.eq(&new_allowance.parent_id),
                        allowances::amount.eq(new_allowance.amount),
                        allowances::period.eq(&new_allowance.period),
                        allowances::next_due.eq(new_allowance.next_due),
                        allowances::is_active.eq(true),
                        allowances::created_at.eq(now),
                        allowances::updated_at.eq(now),
                    ))
                    .returning(allowances::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn set_active(&self, allowance_id: &str, active: bool) -> Result<Option<Allowance>> {
        let allowance_id = allowance_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<Allowance>> {
                    let updated = diesel::update(allowances::table.find(&allowance_id))
                        .set((
                            allowances::is_active.eq(active),
                            allowances::updated_at.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                    if updated == 0 {
                        return Ok(None);
                    }
                    Ok(allowances::table
                        .find(&allowance_id)
                        .first::<Allowance>(conn)
                        .optional()?)
                },
            )
            .await
    }

    async fn advance_next_due(
        &self,
        allowance_id: &str,
        next_due: NaiveDateTime,
    ) -> Result<Option<Allowance>> {
        let allowance_id = allowance_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<Allowance>> {
                    let updated = diesel::update(allowances::table.find(&allowance_id))
                        .set((
                            allowances::next_due.eq(next_due),
                            allowances::updated_at.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                    if updated == 0 {
                        return Ok(None);
                    }
                    Ok(allowances::table
                        .find(&allowance_id)
                        .first::<Allowance>(conn)
                        .optional()?)
                },
            )
            .await
    }
}
