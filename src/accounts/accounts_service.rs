use std::sync::Arc;

use async_trait::async_trait;

use crate::accounts::accounts_model::{Account, AccountMode, NewAccount};
use crate::accounts::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;
use crate::validation::Validator;

pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        AccountService { repository }
    }

    fn validate(new_account: &NewAccount) -> Result<()> {
        let mut v = Validator::new();
        v.required_text("name", &new_account.name, 60);
        v.closed_set::<AccountMode>("mode", &new_account.mode);
        v.required_text("currency", &new_account.currency, 3);
        Ok(v.finish()?)
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        self.repository
            .get_account(account_id)
            .map_err(|e| e.for_operation("load account"))
    }

    fn get_accounts(&self) -> Result<Vec<Account>> {
        self.repository
            .get_accounts()
            .map_err(|e| e.for_operation("load accounts"))
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        Self::validate(&new_account)?;
        self.repository
            .insert_new_account(new_account)
            .await
            .map_err(|e| e.for_operation("create account"))
    }

    async fn deactivate_account(&self, account_id: &str) -> Result<Option<Account>> {
        self.repository
            .set_active(account_id, false)
            .await
            .map_err(|e| e.for_operation("deactivate account"))
    }
}
