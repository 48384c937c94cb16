use crate::accounts::accounts_model::{Account, NewAccount};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for account repository operations
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    fn get_account(&self, account_id: &str) -> Result<Option<Account>>;
    fn get_accounts(&self) -> Result<Vec<Account>>;
    async fn insert_new_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn set_active(&self, account_id: &str, active: bool) -> Result<Option<Account>>;
}

/// Trait for account service operations
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    fn get_account(&self, account_id: &str) -> Result<Option<Account>>;
    fn get_accounts(&self) -> Result<Vec<Account>>;
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn deactivate_account(&self, account_id: &str) -> Result<Option<Account>>;
}
