use crate::accounts::accounts_model::{Account, NewAccount};
use crate::accounts::accounts_traits::AccountRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::schema::accounts;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AccountRepository { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;
        let result = accounts::table
            .find(account_id)
            .first::<Account>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(accounts::table.load::<Account>(&mut conn)?)
    }

    async fn insert_new_account(&self, mut new_account: NewAccount) -> Result<Account> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Account> {
                let now = Utc::now().naive_utc();
                new_account.id = Some(
                    new_account
                        .id
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                );
                new_account.created_at = Some(now);
                new_account.updated_at = Some(now);

                Ok(diesel::insert_into(accounts::table)
                    .values(&new_account)
                    .returning(accounts::all_columns)
                    .get_result(conn)?)
            })
            .await
    }

    async fn set_active(&self, account_id: &str, active: bool) -> Result<Option<Account>> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Account>> {
                let now = Utc::now().naive_utc();
                let updated = diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::is_active.eq(active),
                        accounts::updated_at.eq(now),
                    ))
                    .execute(conn)?;
                if updated == 0 {
                    return Ok(None);
                }
                Ok(accounts::table
                    .find(&account_id)
                    .first::<Account>(conn)
                    .optional()?)
            })
            .await
    }
}
