use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::accounts::accounts_model::AccountMode;
use crate::accounts::accounts_traits::AccountServiceTrait;
use crate::errors::Result;
use crate::parental::parental_errors::ParentalError;
use crate::parental::parental_model::{
    ActionCheck, ApprovalRequest, ApprovalStatus, ApprovalType, NewApprovalRequest,
    NewRestriction, ParentChildLink, Restriction, RestrictionType,
};
use crate::parental::parental_traits::{
    ApprovalRepositoryTrait, LinkRepositoryTrait, ParentalServiceTrait, RestrictionRepositoryTrait,
};
use crate::validation::Validator;

/// Policy engine for child accounts: guardianship links, numeric
/// restrictions and the approval-request workflow.
///
/// The engine decides; it does not write the ledger. A denied action is
/// routed by the caller into an approval request, and an approved
/// request's payload is written back to the ledger by the caller (chores
/// have a dedicated payout path in the chore service).
pub struct ParentalService {
    link_repository: Arc<dyn LinkRepositoryTrait>,
    restriction_repository: Arc<dyn RestrictionRepositoryTrait>,
    approval_repository: Arc<dyn ApprovalRepositoryTrait>,
    account_service: Arc<dyn AccountServiceTrait>,
}

impl ParentalService {
    pub fn new(
        link_repository: Arc<dyn LinkRepositoryTrait>,
        restriction_repository: Arc<dyn RestrictionRepositoryTrait>,
        approval_repository: Arc<dyn ApprovalRepositoryTrait>,
        account_service: Arc<dyn AccountServiceTrait>,
    ) -> Self {
        ParentalService {
            link_repository,
            restriction_repository,
            approval_repository,
            account_service,
        }
    }

    fn require_mode(&self, account_id: &str, expected: AccountMode) -> Result<()> {
        let account = self
            .account_service
            .get_account(account_id)
            .map_err(|e| e.for_operation("verify account mode"))?
            .ok_or_else(|| ParentalError::AccountNotFound(account_id.to_string()))?;
        if account.account_mode() != Some(expected) {
            return Err(ParentalError::ModeMismatch {
                id: account_id.to_string(),
                expected: expected.as_str().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl ParentalServiceTrait for ParentalService {
    async fn create_link(
        &self,
        parent_id: &str,
        child_id: &str,
        nickname: Option<String>,
    ) -> Result<ParentChildLink> {
        self.require_mode(parent_id, AccountMode::Adult)?;
        self.require_mode(child_id, AccountMode::Child)?;

        self.link_repository
            .insert_link_if_unlinked(parent_id.to_string(), child_id.to_string(), nickname)
            .await
            .map_err(|e| e.for_operation("create parent link"))?
            .ok_or_else(|| ParentalError::LinkAlreadyExists(child_id.to_string()).into())
    }

    async fn deactivate_link(&self, link_id: &str) -> Result<ParentChildLink> {
        self.link_repository
            .set_active(link_id, false)
            .await
            .map_err(|e| e.for_operation("deactivate link"))?
            .ok_or_else(|| ParentalError::LinkNotFound(link_id.to_string()).into())
    }

    fn get_children(&self, parent_id: &str) -> Result<Vec<ParentChildLink>> {
        self.link_repository
            .get_links_for_parent(parent_id)
            .map_err(|e| e.for_operation("load linked children"))
    }

    fn get_active_link_for_child(&self, child_id: &str) -> Result<Option<ParentChildLink>> {
        self.link_repository
            .get_active_link_for_child(child_id)
            .map_err(|e| e.for_operation("load parent link"))
    }

    async fn set_restriction(&self, new_restriction: NewRestriction) -> Result<Restriction> {
        let mut v = Validator::new();
        v.closed_set::<RestrictionType>("restriction_type", &new_restriction.restriction_type);
        v.positive_amount("limit_value", new_restriction.limit_value);
        v.finish()?;

        // Only the linked guardian may configure limits; the relationship
        // is checked live, never cached.
        let link = self
            .link_repository
            .get_active_link_for_child(&new_restriction.child_id)
            .map_err(|e| e.for_operation("set restriction"))?;
        match link {
            Some(link) if link.parent_id == new_restriction.parent_id => {}
            _ => {
                return Err(ParentalError::NotLinked {
                    parent_id: new_restriction.parent_id.clone(),
                    child_id: new_restriction.child_id.clone(),
                }
                .into())
            }
        }

        self.restriction_repository
            .upsert_restriction(new_restriction)
            .await
            .map_err(|e| e.for_operation("set restriction"))
    }

    fn get_restrictions(&self, child_id: &str) -> Result<Vec<Restriction>> {
        self.restriction_repository
            .get_active_restrictions(child_id)
            .map_err(|e| e.for_operation("load restrictions"))
    }

    async fn deactivate_restriction(&self, restriction_id: &str) -> Result<Restriction> {
        self.restriction_repository
            .set_active(restriction_id, false)
            .await
            .map_err(|e| e.for_operation("deactivate restriction"))?
            .ok_or_else(|| ParentalError::RestrictionNotFound(restriction_id.to_string()).into())
    }

    fn validate_child_action(
        &self,
        child_id: &str,
        action_type: RestrictionType,
        amount: f64,
    ) -> Result<ActionCheck> {
        let restriction = self
            .restriction_repository
            .get_active_restriction_of_type(child_id, action_type)
            .map_err(|e| e.for_operation("validate child action"))?;

        match restriction {
            None => Ok(ActionCheck::allow()),
            Some(restriction) if amount <= restriction.limit_value => Ok(ActionCheck::allow()),
            Some(restriction) => {
                debug!(
                    "Denying {} of {:.2} for child {}: {} is {:.2}",
                    action_type, amount, child_id, restriction.restriction_type,
                    restriction.limit_value
                );
                let reason = format!(
                    "Amount {:.2} exceeds the {} of {:.2}",
                    amount, restriction.restriction_type, restriction.limit_value
                );
                Ok(ActionCheck::deny(reason, restriction))
            }
        }
    }

    async fn create_approval_request(
        &self,
        new_request: NewApprovalRequest,
    ) -> Result<ApprovalRequest> {
        let mut v = Validator::new();
        v.closed_set::<ApprovalType>("request_type", &new_request.request_type);
        v.required_text("item_id", &new_request.item_id, 64);
        v.finish()?;

        let request_data_json = serde_json::to_string(&new_request.request_data)?;
        self.approval_repository
            .insert_request(new_request, request_data_json)
            .await
            .map_err(|e| e.for_operation("create approval request"))
    }

    fn get_pending_requests(&self, parent_id: &str) -> Result<Vec<ApprovalRequest>> {
        self.approval_repository
            .get_pending_for_parent(parent_id)
            .map_err(|e| e.for_operation("load pending requests"))
    }

    fn get_requests_for_child(&self, child_id: &str) -> Result<Vec<ApprovalRequest>> {
        self.approval_repository
            .get_requests_for_child(child_id)
            .map_err(|e| e.for_operation("load approval requests"))
    }

    async fn approve_request(
        &self,
        request_id: &str,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>> {
        self.approval_repository
            .resolve_request(request_id, ApprovalStatus::Approved, parent_response)
            .await
            .map_err(|e| e.for_operation("approve request"))
    }

    async fn reject_request(
        &self,
        request_id: &str,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>> {
        self.approval_repository
            .resolve_request(request_id, ApprovalStatus::Rejected, parent_response)
            .await
            .map_err(|e| e.for_operation("reject request"))
    }

    async fn sweep_expired_requests(&self) -> Result<usize> {
        self.approval_repository
            .auto_reject_expired(Utc::now().naive_utc())
            .await
            .map_err(|e| e.for_operation("sweep expired requests"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::accounts_model::{Account, NewAccount};
    use crate::errors::Error;
    use chrono::{Duration, NaiveDateTime};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MockAccountService {
        accounts: HashMap<String, Account>,
    }

    #[async_trait]
    impl AccountServiceTrait for MockAccountService {
        fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
            Ok(self.accounts.get(account_id).cloned())
        }
        fn get_accounts(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.values().cloned().collect())
        }
        async fn create_account(&self, _new_account: NewAccount) -> Result<Account> {
            Err(Error::Unexpected("not implemented".to_string()))
        }
        async fn deactivate_account(&self, _account_id: &str) -> Result<Option<Account>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct MockLinkRepository {
        links: Mutex<Vec<ParentChildLink>>,
    }

    #[async_trait]
    impl LinkRepositoryTrait for MockLinkRepository {
        fn get_link(&self, link_id: &str) -> Result<Option<ParentChildLink>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.id == link_id)
                .cloned())
        }

        fn get_active_link_for_child(&self, child_id: &str) -> Result<Option<ParentChildLink>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .iter()
                .find(|l| l.child_id == child_id && l.is_active)
                .cloned())
        }

        fn get_links_for_parent(&self, parent_id: &str) -> Result<Vec<ParentChildLink>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .iter()
                .filter(|l| l.parent_id == parent_id && l.is_active)
                .cloned()
                .collect())
        }

        async fn insert_link_if_unlinked(
            &self,
            parent_id: String,
            child_id: String,
            nickname: Option<String>,
        ) -> Result<Option<ParentChildLink>> {
            let mut links = self.links.lock().unwrap();
            if links.iter().any(|l| l.child_id == child_id && l.is_active) {
                return Ok(None);
            }
            let now = Utc::now().naive_utc();
            let link = ParentChildLink {
                id: Uuid::new_v4().to_string(),
                parent_id,
                child_id,
                nickname,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            links.push(link.clone());
            Ok(Some(link))
        }

        async fn set_active(
            &self,
            link_id: &str,
            active: bool,
        ) -> Result<Option<ParentChildLink>> {
            let mut links = self.links.lock().unwrap();
            match links.iter_mut().find(|l| l.id == link_id) {
                Some(link) => {
                    link.is_active = active;
                    Ok(Some(link.clone()))
                }
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct MockRestrictionRepository {
        restrictions: Mutex<Vec<Restriction>>,
    }

    #[async_trait]
    impl RestrictionRepositoryTrait for MockRestrictionRepository {
        fn get_active_restrictions(&self, child_id: &str) -> Result<Vec<Restriction>> {
            Ok(self
                .restrictions
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.child_id == child_id && r.is_active)
                .cloned()
                .collect())
        }

        fn get_active_restriction_of_type(
            &self,
            child_id: &str,
            restriction_type: RestrictionType,
        ) -> Result<Option<Restriction>> {
            Ok(self
                .restrictions
                .lock()
                .unwrap()
                .iter()
                .find(|r| {
                    r.child_id == child_id
                        && r.restriction_type == restriction_type.as_str()
                        && r.is_active
                })
                .cloned())
        }

        async fn upsert_restriction(
            &self,
            new_restriction: NewRestriction,
        ) -> Result<Restriction> {
            let now = Utc::now().naive_utc();
            let restriction = Restriction {
                id: Uuid::new_v4().to_string(),
                child_id: new_restriction.child_id,
                parent_id: new_restriction.parent_id,
                restriction_type: new_restriction.restriction_type,
                limit_value: new_restriction.limit_value,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            let mut restrictions = self.restrictions.lock().unwrap();
            restrictions.retain(|r| {
                !(r.child_id == restriction.child_id
                    && r.restriction_type == restriction.restriction_type)
            });
            restrictions.push(restriction.clone());
            Ok(restriction)
        }

        async fn set_active(
            &self,
            restriction_id: &str,
            active: bool,
        ) -> Result<Option<Restriction>> {
            let mut restrictions = self.restrictions.lock().unwrap();
            match restrictions.iter_mut().find(|r| r.id == restriction_id) {
                Some(restriction) => {
                    restriction.is_active = active;
                    Ok(Some(restriction.clone()))
                }
                None => Ok(None),
            }
        }
    }

    #[derive(Default)]
    struct MockApprovalRepository {
        requests: Mutex<HashMap<String, ApprovalRequest>>,
    }

    #[async_trait]
    impl ApprovalRepositoryTrait for MockApprovalRepository {
        fn get_request(&self, request_id: &str) -> Result<Option<ApprovalRequest>> {
            Ok(self.requests.lock().unwrap().get(request_id).cloned())
        }

        fn get_pending_for_parent(&self, parent_id: &str) -> Result<Vec<ApprovalRequest>> {
            Ok(self
                .requests
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.parent_id == parent_id && r.status == "pending")
                .cloned()
                .collect())
        }

        fn get_requests_for_child(&self, child_id: &str) -> Result<Vec<ApprovalRequest>> {
            Ok(self
                .requests
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.child_id == child_id)
                .cloned()
                .collect())
        }

        async fn insert_request(
            &self,
            new_request: NewApprovalRequest,
            request_data_json: String,
        ) -> Result<ApprovalRequest> {
            let now = Utc::now().naive_utc();
            let request = ApprovalRequest {
                id: Uuid::new_v4().to_string(),
                child_id: new_request.child_id,
                parent_id: new_request.parent_id,
                request_type: new_request.request_type,
                item_id: new_request.item_id,
                request_data: request_data_json,
                status: "pending".to_string(),
                requested_at: now,
                responded_at: None,
                parent_response: None,
                expires_at: new_request.expires_at,
            };
            self.requests
                .lock()
                .unwrap()
                .insert(request.id.clone(), request.clone());
            Ok(request)
        }

        async fn resolve_request(
            &self,
            request_id: &str,
            status: ApprovalStatus,
            parent_response: Option<String>,
        ) -> Result<Option<ApprovalRequest>> {
            let mut requests = self.requests.lock().unwrap();
            match requests.get_mut(request_id) {
                Some(request) if request.status == "pending" => {
                    request.status = status.as_str().to_string();
                    request.responded_at = Some(Utc::now().naive_utc());
                    request.parent_response = parent_response;
                    Ok(Some(request.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn auto_reject_expired(&self, now: NaiveDateTime) -> Result<usize> {
            let mut requests = self.requests.lock().unwrap();
            let mut rejected = 0;
            for request in requests.values_mut() {
                if request.status == "pending"
                    && request.expires_at.map(|at| at < now).unwrap_or(false)
                {
                    request.status = "rejected".to_string();
                    request.responded_at = Some(now);
                    request.parent_response = Some("expired".to_string());
                    rejected += 1;
                }
            }
            Ok(rejected)
        }
    }

    fn account(id: &str, mode: AccountMode) -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: id.to_string(),
            name: id.to_string(),
            mode: mode.as_str().to_string(),
            currency: "USD".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn service() -> ParentalService {
        let accounts = HashMap::from([
            ("parent-1".to_string(), account("parent-1", AccountMode::Adult)),
            ("child-1".to_string(), account("child-1", AccountMode::Child)),
            ("child-2".to_string(), account("child-2", AccountMode::Child)),
        ]);
        ParentalService::new(
            Arc::new(MockLinkRepository::default()),
            Arc::new(MockRestrictionRepository::default()),
            Arc::new(MockApprovalRepository::default()),
            Arc::new(MockAccountService { accounts }),
        )
    }

    fn spending_request(expires_at: Option<NaiveDateTime>) -> NewApprovalRequest {
        NewApprovalRequest {
            child_id: "child-1".to_string(),
            parent_id: "parent-1".to_string(),
            request_type: "expense".to_string(),
            item_id: "expense-9".to_string(),
            request_data: serde_json::json!({ "amount": 150.0 }),
            expires_at,
        }
    }

    #[tokio::test]
    async fn creates_link_between_adult_and_child() {
        let service = service();
        let link = service
            .create_link("parent-1", "child-1", Some("Sprout".to_string()))
            .await
            .unwrap();
        assert!(link.is_active);
        assert_eq!(link.nickname.as_deref(), Some("Sprout"));
    }

    #[tokio::test]
    async fn link_requires_adult_parent() {
        let service = service();
        let err = service
            .create_link("child-2", "child-1", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parental(ParentalError::ModeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn link_requires_child_mode_target() {
        let service = service();
        let err = service
            .create_link("parent-1", "parent-1", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parental(ParentalError::ModeMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn child_can_have_only_one_active_link() {
        let service = service();
        service.create_link("parent-1", "child-1", None).await.unwrap();
        let err = service
            .create_link("parent-1", "child-1", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Parental(ParentalError::LinkAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn spending_limit_denies_and_allows() {
        let service = service();
        service.create_link("parent-1", "child-1", None).await.unwrap();
        service
            .set_restriction(NewRestriction {
                child_id: "child-1".to_string(),
                parent_id: "parent-1".to_string(),
                restriction_type: "spending_limit".to_string(),
                limit_value: 100.0,
            })
            .await
            .unwrap();

        let denied = service
            .validate_child_action("child-1", RestrictionType::SpendingLimit, 150.0)
            .unwrap();
        assert!(!denied.allowed);
        let reason = denied.reason.expect("denial carries a reason");
        assert!(reason.contains("spending_limit"));
        assert!(reason.contains("100"));
        assert_eq!(denied.restriction.unwrap().limit_value, 100.0);

        let allowed = service
            .validate_child_action("child-1", RestrictionType::SpendingLimit, 80.0)
            .unwrap();
        assert!(allowed.allowed);
        assert!(allowed.reason.is_none());
    }

    #[tokio::test]
    async fn unconfigured_restriction_allows_everything() {
        let service = service();
        let check = service
            .validate_child_action("child-1", RestrictionType::GoalAmountLimit, 1_000_000.0)
            .unwrap();
        assert!(check.allowed);
    }

    #[tokio::test]
    async fn restriction_requires_active_link() {
        let service = service();
        let err = service
            .set_restriction(NewRestriction {
                child_id: "child-1".to_string(),
                parent_id: "parent-1".to_string(),
                restriction_type: "spending_limit".to_string(),
                limit_value: 100.0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parental(ParentalError::NotLinked { .. })));
    }

    #[tokio::test]
    async fn approval_is_exactly_once() {
        let service = service();
        let request = service
            .create_approval_request(spending_request(None))
            .await
            .unwrap();

        let first = service
            .approve_request(&request.id, Some("ok".to_string()))
            .await
            .unwrap();
        assert_eq!(
            first.unwrap().approval_status(),
            Some(ApprovalStatus::Approved)
        );

        // Second resolution of any kind is a no-op.
        let second = service.approve_request(&request.id, None).await.unwrap();
        assert!(second.is_none());
        let reject = service.reject_request(&request.id, None).await.unwrap();
        assert!(reject.is_none());
    }

    #[tokio::test]
    async fn sweep_rejects_expired_exactly_once() {
        let service = service();
        let past = Utc::now().naive_utc() - Duration::hours(1);
        let request = service
            .create_approval_request(spending_request(Some(past)))
            .await
            .unwrap();
        // A request with no expiry is untouched by the sweep.
        service
            .create_approval_request(spending_request(None))
            .await
            .unwrap();

        assert_eq!(service.sweep_expired_requests().await.unwrap(), 1);
        assert_eq!(service.sweep_expired_requests().await.unwrap(), 0);

        let swept = service
            .approval_repository
            .get_request(&request.id)
            .unwrap()
            .unwrap();
        assert_eq!(swept.approval_status(), Some(ApprovalStatus::Rejected));
        assert_eq!(swept.parent_response.as_deref(), Some("expired"));
    }
}
