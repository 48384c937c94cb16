use chrono::NaiveDateTime;

use crate::chores::chores_model::{Allowance, Chore, ChoreStatus, NewAllowance, NewChore};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for chore repository operations
#[async_trait]
pub trait ChoreRepositoryTrait: Send + Sync {
    fn get_chore(&self, chore_id: &str) -> Result<Option<Chore>>;
    fn get_chores_for_child(&self, child_id: &str) -> Result<Vec<Chore>>;
    fn get_chores_by_status(&self, child_id: &str, status: ChoreStatus) -> Result<Vec<Chore>>;
    async fn insert_new_chore(&self, new_chore: NewChore) -> Result<Chore>;
    /// Conditional status move guarded by `status = from`; `None` when
    /// the chore is missing or not in the expected state, so a duplicate
    /// concurrent transition is a no-op.
    async fn transition(
        &self,
        chore_id: &str,
        from: ChoreStatus,
        to: ChoreStatus,
    ) -> Result<Option<Chore>>;
    /// Fresh unstarted copy of a recurring chore, due one period later.
    async fn insert_next_instance(&self, chore: Chore) -> Result<Chore>;
    async fn delete_chore(&self, chore_id: &str) -> Result<bool>;
}

/// Trait for allowance repository operations
#[async_trait]
pub trait AllowanceRepositoryTrait: Send + Sync {
    fn get_allowance(&self, allowance_id: &str) -> Result<Option<Allowance>>;
    fn get_allowances_for_child(&self, child_id: &str) -> Result<Vec<Allowance>>;
    fn get_due_allowances(&self, now: NaiveDateTime) -> Result<Vec<Allowance>>;
    async fn insert_new_allowance(&self, new_allowance: NewAllowance) -> Result<Allowance>;
    async fn set_active(&self, allowance_id: &str, active: bool) -> Result<Option<Allowance>>;
    async fn advance_next_due(
        &self,
        allowance_id: &str,
        next_due: NaiveDateTime,
    ) -> Result<Option<Allowance>>;
}

/// Trait for chore and allowance service operations
#[async_trait]
pub trait ChoreServiceTrait: Send + Sync {
    fn get_chore(&self, chore_id: &str) -> Result<Option<Chore>>;
    fn get_chores_for_child(&self, child_id: &str) -> Result<Vec<Chore>>;
    async fn create_chore(&self, new_chore: NewChore) -> Result<Chore>;
    /// Child marks the chore done: unstarted -> completed. No payout.
    async fn complete_chore(&self, chore_id: &str) -> Result<Chore>;
    /// Parent confirms: completed -> approved. The only transition that
    /// pays out income; recurring chores spawn their next instance here.
    async fn approve_chore(&self, chore_id: &str) -> Result<Chore>;
    async fn delete_chore(&self, chore_id: &str) -> Result<bool>;

    async fn create_allowance(&self, new_allowance: NewAllowance) -> Result<Allowance>;
    fn get_allowances_for_child(&self, child_id: &str) -> Result<Vec<Allowance>>;
    async fn deactivate_allowance(&self, allowance_id: &str) -> Result<Allowance>;
    /// Pays every active allowance due by now and advances each schedule
    /// one period. Returns the number paid.
    async fn pay_due_allowances(&self) -> Result<usize>;
}
