use crate::budget::budget_model::{BudgetThreshold, ThresholdInput};
use crate::budget::budget_traits::BudgetRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::models::Category;
use crate::schema::budget_thresholds;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct BudgetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        BudgetRepository { pool, writer }
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    fn get_thresholds(&self, user_id: &str) -> Result<Vec<BudgetThreshold>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budget_thresholds::table
            .filter(budget_thresholds::user_id.eq(user_id))
            .order(budget_thresholds::category.asc())
            .load::<BudgetThreshold>(&mut conn)?)
    }

    fn get_threshold(&self, user_id: &str, category: Category) -> Result<Option<BudgetThreshold>> {
        let mut conn = get_connection(&self.pool)?;
        let result = budget_thresholds::table
            .filter(budget_thresholds::user_id.eq(user_id))
            .filter(budget_thresholds::category.eq(category.as_str()))
            .first::<BudgetThreshold>(&mut conn)
            .optional()?;
        Ok(result)
    }

    async fn replace_thresholds(
        &self,
        user_id: String,
        thresholds: Vec<ThresholdInput>,
    ) -> Result<Vec<BudgetThreshold>> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Vec<BudgetThreshold>> {
                    let now = Utc::now().naive_utc();

                    diesel::delete(
                        budget_thresholds::table
                            .filter(budget_thresholds::user_id.eq(&user_id)),
                    )
                    .execute(conn)?;

                    for threshold in &thresholds {
                        diesel::insert_into(budget_thresholds::table)
                            .values((
                                budget_thresholds::id.eq(Uuid::new_v4().to_string()),
                                budget_thresholds::user_id.eq(&user_id),
                                budget_thresholds::category.eq(&threshold.category),
                                budget_thresholds::monthly_limit.eq(threshold.monthly_limit),
                                budget_thresholds::warning_percentage
                                    .eq(threshold.warning_percentage),
                                budget_thresholds::created_at.eq(now),
                                budget_thresholds::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                    }

                    Ok(budget_thresholds::table
                        .filter(budget_thresholds::user_id.eq(&user_id))
                        .order(budget_thresholds::category.asc())
                        .load::<BudgetThreshold>(conn)?)
                },
            )
            .await
    }
}
