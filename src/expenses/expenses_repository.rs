use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::expenses::expenses_model::{Expense, ExpenseUpdate, NewExpense};
use crate::expenses::expenses_traits::ExpenseRepositoryTrait;
use crate::models::Category;
use crate::schema::expenses;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::dsl::sum;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ExpenseRepository { pool, writer }
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let result = expenses::table
            .find(expense_id)
            .first::<Expense>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_expenses_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(expenses::table
            .filter(expenses::user_id.eq(user_id))
            .order(expenses::expense_date.desc())
            .load::<Expense>(&mut conn)?)
    }

    fn get_expenses_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::expense_date.ge(start))
            .filter(expenses::expense_date.lt(end))
            .order(expenses::expense_date.desc())
            .load::<Expense>(&mut conn)?)
    }

    fn get_expenses_by_category(&self, user_id: &str, category: Category) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::category.eq(category.as_str()))
            .order(expenses::expense_date.desc())
            .load::<Expense>(&mut conn)?)
    }

    fn get_category_spend(
        &self,
        user_id: &str,
        category: Category,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<f64> {
        let mut conn = get_connection(&self.pool)?;
        let total: Option<f64> = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::category.eq(category.as_str()))
            .filter(expenses::expense_date.ge(start))
            .filter(expenses::expense_date.lt(end))
            .select(sum(expenses::amount))
            .first(&mut conn)?;
        Ok(total.unwrap_or(0.0))
    }

    async fn insert_new_expense(
        &self,
        new_expense: NewExpense,
        tags_json: String,
    ) -> Result<Expense> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let now = Utc::now().naive_utc();
                let expense_id = Uuid::new_v4().to_string();

                Ok(diesel::insert_into(expenses::table)
                    .values((
                        expenses::id.eq(&expense_id),
                        expenses::user_id.eq(&new_expense.user_id),
                        expenses::amount.eq(new_expense.amount),
                        expenses::category.eq(&new_expense.category),
                        expenses::description.eq(&new_expense.description),
                        expenses::expense_date.eq(new_expense.expense_date),
                        expenses::receipt_image_ref.eq(new_expense.receipt_image_ref.clone()),
                        expenses::is_recurring.eq(new_expense.is_recurring),
                        expenses::recurring_period.eq(new_expense.recurring_period.clone()),
                        expenses::tags.eq(&tags_json),
                        expenses::created_at.eq(now),
                        expenses::updated_at.eq(now),
                    ))
                    .returning(expenses::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn update_expense(
        &self,
        update: ExpenseUpdate,
        tags_json: String,
    ) -> Result<Option<Expense>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Expense>> {
                let expense_id = update.id.clone();
                let updated = diesel::update(expenses::table.find(&expense_id))
                    .set((
                        expenses::amount.eq(update.amount),
                        expenses::category.eq(&update.category),
                        expenses::description.eq(&update.description),
                        expenses::expense_date.eq(update.expense_date),
                        expenses::receipt_image_ref.eq(update.receipt_image_ref.clone()),
                        expenses::is_recurring.eq(update.is_recurring),
                        expenses::recurring_period.eq(update.recurring_period.clone()),
                        expenses::tags.eq(&tags_json),
                        expenses::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                Ok(expenses::table
                    .find(&expense_id)
                    .first::<Expense>(conn)
                    .optional()?)
            })
            .await
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<bool> {
                let deleted =
                    diesel::delete(expenses::table.find(&expense_id)).execute(conn)?;
                Ok(deleted > 0)
            })
            .await
    }
}
