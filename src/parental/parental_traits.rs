use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::parental::parental_model::{
    ActionCheck, ApprovalRequest, ApprovalStatus, NewApprovalRequest, NewRestriction,
    ParentChildLink, Restriction, RestrictionType,
};
use async_trait::async_trait;

/// Trait for parent/child link repository operations
#[async_trait]
pub trait LinkRepositoryTrait: Send + Sync {
    fn get_link(&self, link_id: &str) -> Result<Option<ParentChildLink>>;
    fn get_active_link_for_child(&self, child_id: &str) -> Result<Option<ParentChildLink>>;
    fn get_links_for_parent(&self, parent_id: &str) -> Result<Vec<ParentChildLink>>;
    /// Inserts a link unless the child already has an active one; `None`
    /// signals the conflict. Checked and inserted in one transaction.
    async fn insert_link_if_unlinked(
        &self,
        parent_id: String,
        child_id: String,
        nickname: Option<String>,
    ) -> Result<Option<ParentChildLink>>;
    async fn set_active(&self, link_id: &str, active: bool) -> Result<Option<ParentChildLink>>;
}

/// Trait for restriction repository operations
#[async_trait]
pub trait RestrictionRepositoryTrait: Send + Sync {
    fn get_active_restrictions(&self, child_id: &str) -> Result<Vec<Restriction>>;
    fn get_active_restriction_of_type(
        &self,
        child_id: &str,
        restriction_type: RestrictionType,
    ) -> Result<Option<Restriction>>;
    /// Upserts by (child, type): one live limit per kind.
    async fn upsert_restriction(&self, new_restriction: NewRestriction) -> Result<Restriction>;
    async fn set_active(&self, restriction_id: &str, active: bool) -> Result<Option<Restriction>>;
}

/// Trait for approval request repository operations
#[async_trait]
pub trait ApprovalRepositoryTrait: Send + Sync {
    fn get_request(&self, request_id: &str) -> Result<Option<ApprovalRequest>>;
    fn get_pending_for_parent(&self, parent_id: &str) -> Result<Vec<ApprovalRequest>>;
    fn get_requests_for_child(&self, child_id: &str) -> Result<Vec<ApprovalRequest>>;
    async fn insert_request(
        &self,
        new_request: NewApprovalRequest,
        request_data_json: String,
    ) -> Result<ApprovalRequest>;
    /// Conditional transition guarded by `status = 'pending'`; `None`
    /// when the request was already resolved (or never existed), so a
    /// concurrent duplicate resolution is a no-op.
    async fn resolve_request(
        &self,
        request_id: &str,
        status: ApprovalStatus,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>>;
    /// Rejects every pending request past its expiry. Idempotent.
    async fn auto_reject_expired(&self, now: NaiveDateTime) -> Result<usize>;
}

/// Trait for the parental policy engine
#[async_trait]
pub trait ParentalServiceTrait: Send + Sync {
    async fn create_link(
        &self,
        parent_id: &str,
        child_id: &str,
        nickname: Option<String>,
    ) -> Result<ParentChildLink>;
    async fn deactivate_link(&self, link_id: &str) -> Result<ParentChildLink>;
    fn get_children(&self, parent_id: &str) -> Result<Vec<ParentChildLink>>;
    fn get_active_link_for_child(&self, child_id: &str) -> Result<Option<ParentChildLink>>;

    async fn set_restriction(&self, new_restriction: NewRestriction) -> Result<Restriction>;
    fn get_restrictions(&self, child_id: &str) -> Result<Vec<Restriction>>;
    async fn deactivate_restriction(&self, restriction_id: &str) -> Result<Restriction>;
    /// Advisory check of a proposed child action against active
    /// restrictions. Denials are returned as values; callers route them
    /// into approval requests.
    fn validate_child_action(
        &self,
        child_id: &str,
        action_type: RestrictionType,
        amount: f64,
    ) -> Result<ActionCheck>;

    async fn create_approval_request(
        &self,
        new_request: NewApprovalRequest,
    ) -> Result<ApprovalRequest>;
    fn get_pending_requests(&self, parent_id: &str) -> Result<Vec<ApprovalRequest>>;
    fn get_requests_for_child(&self, child_id: &str) -> Result<Vec<ApprovalRequest>>;
    async fn approve_request(
        &self,
        request_id: &str,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>>;
    async fn reject_request(
        &self,
        request_id: &str,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>>;
    async fn sweep_expired_requests(&self) -> Result<usize>;
}
