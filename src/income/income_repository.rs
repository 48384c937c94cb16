use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::income::income_model::{Income, IncomeUpdate, NewIncome};
use crate::income::income_traits::IncomeRepositoryTrait;
use crate::models::IncomeSource;
use crate::schema::incomes;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct IncomeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl IncomeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        IncomeRepository { pool, writer }
    }
}

#[async_trait]
impl IncomeRepositoryTrait for IncomeRepository {
    fn get_income(&self, income_id: &str) -> Result<Option<Income>> {
        let mut conn = get_connection(&self.pool)?;
        let result = incomes::table
            .find(income_id)
            .first::<Income>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_incomes_by_user(&self, user_id: &str) -> Result<Vec<Income>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(incomes::table
            .filter(incomes::user_id.eq(user_id))
            .order(incomes::income_date.desc())
            .load::<Income>(&mut conn)?)
    }

    fn get_incomes_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Income>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(incomes::table
            .filter(incomes::user_id.eq(user_id))
            .filter(incomes::income_date.ge(start))
            .filter(incomes::income_date.lt(end))
            .order(incomes::income_date.desc())
            .load::<Income>(&mut conn)?)
    }

    fn get_incomes_by_source(&self, user_id: &str, source: IncomeSource) -> Result<Vec<Income>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(incomes::table
            .filter(incomes::user_id.eq(user_id))
            .filter(incomes::source.eq(source.as_str()))
            .order(incomes::income_date.desc())
            .load::<Income>(&mut conn)?)
    }

    fn get_current_streak(&self, user_id: &str) -> Result<i32> {
        let mut conn = get_connection(&self.pool)?;
        let latest: Option<i32> = incomes::table
            .filter(incomes::user_id.eq(user_id))
            .order((incomes::income_date.desc(), incomes::created_at.desc()))
            .select(incomes::streak_count)
            .first(&mut conn)
            .optional()?;
        Ok(latest.unwrap_or(0))
    }

    async fn insert_new_income(
        &self,
        new_income: NewIncome,
        streak_count: i32,
        multiplier: f64,
    ) -> Result<Income> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Income> {
                let now = Utc::now().naive_utc();
                let income_id = Uuid::new_v4().to_string();

                Ok(diesel::insert_into(incomes::table)
                    .values((
                        incomes::id.eq(&income_id),
                        incomes::user_id.eq(&new_income.user_id),
                        incomes::amount.eq(new_income.amount),
                        incomes::source.eq(&new_income.source),
                        incomes::description.eq(&new_income.description),
                        incomes::income_date.eq(new_income.income_date),
                        incomes::is_recurring.eq(new_income.is_recurring),
                        incomes::recurring_period.eq(new_income.recurring_period.clone()),
                        incomes::multiplier.eq(multiplier),
                        incomes::streak_count.eq(streak_count),
                        incomes::created_at.eq(now),
                        incomes::updated_at.eq(now),
                    ))
                    .returning(incomes::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn update_income(&self, update: IncomeUpdate) -> Result<Option<Income>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Income>> {
                let income_id = update.id.clone();
                let updated = diesel::update(incomes::table.find(&income_id))
                    .set((
                        incomes::amount.eq(update.amount),
                        incomes::source.eq(&update.source),
                        incomes::description.eq(&update.description),
                        incomes::income_date.eq(update.income_date),
                        incomes::is_recurring.eq(update.is_recurring),
                        incomes::recurring_period.eq(update.recurring_period.clone()),
                        incomes::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                Ok(incomes::table
                    .find(&income_id)
                    .first::<Income>(conn)
                    .optional()?)
            })
            .await
    }

    async fn delete_income(&self, income_id: &str) -> Result<bool> {
        let income_id = income_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted = diesel::delete(incomes::table.find(&income_id)).execute(conn)?;
                Ok(deleted > 0)
            })
            .await
    }

    async fn reset_streak(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let latest: Option<String> = incomes::table
                    .filter(incomes::user_id.eq(&user_id))
                    .order((incomes::income_date.desc(), incomes::created_at.desc()))
                    .select(incomes::id)
                    .first(conn)
                    .optional()?;

                // Nothing logged yet: the streak is already 0.
                if let Some(income_id) = latest {
                    diesel::update(incomes::table.find(&income_id))
                        .set(incomes::streak_count.eq(0))
                        .execute(conn)?;
                }
                Ok(())
            })
            .await
    }
}
