use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::Result;
use crate::parental::parental_model::{
    ApprovalRequest, ApprovalStatus, NewApprovalRequest, NewRestriction, ParentChildLink,
    Restriction, RestrictionType,
};
use crate::parental::parental_traits::{
    ApprovalRepositoryTrait, LinkRepositoryTrait, RestrictionRepositoryTrait,
};
use crate::schema::{approval_requests, parent_child_links, restrictions};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

pub struct LinkRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LinkRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        LinkRepository { pool, writer }
    }
}

#[async_trait]
impl LinkRepositoryTrait for LinkRepository {
    fn get_link(&self, link_id: &str) -> Result<Option<ParentChildLink>> {
        let mut conn = get_connection(&self.pool)?;
        let result = parent_child_links::table
            .find(link_id)
            .first::<ParentChildLink>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_active_link_for_child(&self, child_id: &str) -> Result<Option<ParentChildLink>> {
        let mut conn = get_connection(&self.pool)?;
        let result = parent_child_links::table
            .filter(parent_child_links::child_id.eq(child_id))
            .filter(parent_child_links::is_active.eq(true))
            .first::<ParentChildLink>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_links_for_parent(&self, parent_id: &str) -> Result<Vec<ParentChildLink>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(parent_child_links::table
            .filter(parent_child_links::parent_id.eq(parent_id))
            .filter(parent_child_links::is_active.eq(true))
            .load::<ParentChildLink>(&mut conn)?)
    }

    async fn insert_link_if_unlinked(
        &self,
        parent_id: String,
        child_id: String,
        nickname: Option<String>,
    ) -> Result<Option<ParentChildLink>> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<ParentChildLink>> {
                    let existing = parent_child_links::table
                        .filter(parent_child_links::child_id.eq(&child_id))
                        .filter(parent_child_links::is_active.eq(true))
                        .first::<ParentChildLink>(conn)
                        .optional()?;
                    if existing.is_some() {
                        return Ok(None);
                    }

                    let now = Utc::now().naive_utc();
                    let link = diesel::insert_into(parent_child_links::table)
                        .values((
                            parent_child_links::id.eq(Uuid::new_v4().to_string()),
                            parent_child_links::parent_id.eq(&parent_id),
                            parent_child_links::child_id.eq(&child_id),
                            parent_child_links::nickname.eq(nickname.clone()),
                            parent_child_links::is_active.eq(true),
                            parent_child_links::created_at.eq(now),
                            parent_child_links::updated_at.eq(now),
                        ))
                        .returning(parent_child_links::all_columns)
                        .get_result::<ParentChildLink>(conn)?;
                    Ok(Some(link))
                },
            )
            .await
    }

    async fn set_active(&self, link_id: &str, active: bool) -> Result<Option<ParentChildLink>> {
        let link_id = link_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<ParentChildLink>> {
                    let updated =
                        diesel::update(parent_child_links::table.find(&link_id))
                            .set((
                                parent_child_links::is_active.eq(active),
                                parent_child_links::updated_at.eq(Utc::now().naive_utc()),
                            ))
                            .execute(conn)?;
                    if updated == 0 {
                        return Ok(None);
                    }
                    Ok(parent_child_links::table
                        .find(&link_id)
                        .first::<ParentChildLink>(conn)
                        .optional()?)
                },
            )
            .await
    }
}

pub struct RestrictionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RestrictionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        RestrictionRepository { pool, writer }
    }
}

#[async_trait]
impl RestrictionRepositoryTrait for RestrictionRepository {
    fn get_active_restrictions(&self, child_id: &str) -> Result<Vec<Restriction>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(restrictions::table
            .filter(restrictions::child_id.eq(child_id))
            .filter(restrictions::is_active.eq(true))
            .load::<Restriction>(&mut conn)?)
    }

    fn get_active_restriction_of_type(
        &self,
        child_id: &str,
        restriction_type: RestrictionType,
    ) -> Result<Option<Restriction>> {
        let mut conn = get_connection(&self.pool)?;
        let result = restrictions::table
            .filter(restrictions::child_id.eq(child_id))
            .filter(restrictions::restriction_type.eq(restriction_type.as_str()))
            .filter(restrictions::is_active.eq(true))
            .first::<Restriction>(&mut conn)
            .optional()?;
        Ok(result)
    }

    async fn upsert_restriction(&self, new_restriction: NewRestriction) -> Result<Restriction> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Restriction> {
                let now = Utc::now().naive_utc();
                let existing: Option<Restriction> = restrictions::table
                    .filter(restrictions::child_id.eq(&new_restriction.child_id))
                    .filter(
                        restrictions::restriction_type
                            .eq(&new_restriction.restriction_type),
                    )
                    .first::<Restriction>(conn)
                    .optional()?;

                let restriction_id = match existing {
                    Some(existing) => {
                        diesel::update(restrictions::table.find(&existing.id))
                            .set((
                                restrictions::parent_id.eq(&new_restriction.parent_id),
                                restrictions::limit_value.eq(new_restriction.limit_value),
                                restrictions::is_active.eq(true),
                                restrictions::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                        existing.id
                    }
                    None => {
                        let restriction_id = Uuid::new_v4().to_string();
                        diesel::insert_into(restrictions::table)
                            .values((
                                restrictions::id.eq(&restriction_id),
                                restrictions::child_id.eq(&new_restriction.child_id),
                                restrictions::parent_id.eq(&new_restriction.parent_id),
                                restrictions::restriction_type
                                    .eq(&new_restriction.restriction_type),
                                restrictions::limit_value.eq(new_restriction.limit_value),
                                restrictions::is_active.eq(true),
                                restrictions::created_at.eq(now),
                                restrictions::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                        restriction_id
                    }
                };

                Ok(restrictions::table
                    .find(&restriction_id)
                    .first::<Restriction>(conn)?)
            })
            .await
    }

    async fn set_active(&self, restriction_id: &str, active: bool) -> Result<Option<Restriction>> {
        let restriction_id = restriction_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<Restriction>> {
                    let updated = diesel::update(restrictions::table.find(&restriction_id))
                        .set((
                            restrictions::is_active.eq(active),
                            restrictions::updated_at.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                    if updated == 0 {
                        return Ok(None);
                    }
                    Ok(restrictions::table
                        .find(&restriction_id)
                        .first::<Restriction>(conn)
                        .optional()?)
                },
            )
            .await
    }
}

pub struct ApprovalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ApprovalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ApprovalRepository { pool, writer }
    }
}

#[async_trait]
impl ApprovalRepositoryTrait for ApprovalRepository {
    fn get_request(&self, request_id: &str) -> Result<Option<ApprovalRequest>> {
        let mut conn = get_connection(&self.pool)?;
        let result = approval_requests::table
            .find(request_id)
            .first::<ApprovalRequest>(&mut conn)
            .optional()?;
        Ok(result)
    }

    fn get_pending_for_parent(&self, parent_id: &str) -> Result<Vec<ApprovalRequest>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(approval_requests::table
            .filter(approval_requests::parent_id.eq(parent_id))
            .filter(approval_requests::status.eq(ApprovalStatus::Pending.as_str()))
            .order(approval_requests::requested_at.asc())
            .load::<ApprovalRequest>(&mut conn)?)
    }

    fn get_requests_for_child(&self, child_id: &str) -> Result<Vec<ApprovalRequest>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(approval_requests::table
            .filter(approval_requests::child_id.eq(child_id))
            .order(approval_requests::requested_at.desc())
            .load::<ApprovalRequest>(&mut conn)?)
    }

    async fn insert_request(
        &self,
        new_request: NewApprovalRequest,
        request_data_json: String,
    ) -> Result<ApprovalRequest> {
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<ApprovalRequest> {
                    let now = Utc::now().naive_utc();
                    Ok(diesel::insert_into(approval_requests::table)
                        .values((
                            approval_requests::id.eq(Uuid::new_v4().to_string()),
                            approval_requests::child_id.eq(&new_request.child_id),
                            approval_requests::parent_id.eq(&new_request.parent_id),
                            approval_requests::request_type.eq(&new_request.request_type),
                            approval_requests::item_id.eq(&new_request.item_id),
                            approval_requests::request_data.eq(&request_data_json),
                            approval_requests::status
                                .eq(ApprovalStatus::Pending.as_str()),
                            approval_requests::requested_at.eq(now),
                            approval_requests::expires_at.eq(new_request.expires_at),
                        ))
                        .returning(approval_requests::all_columns)
                        .get_result(conn)?)
                },
            )
            .await
    }

    async fn resolve_request(
        &self,
        request_id: &str,
        status: ApprovalStatus,
        parent_response: Option<String>,
    ) -> Result<Option<ApprovalRequest>> {
        let request_id = request_id.to_string();
        self.writer
            .exec(
                move |conn: &mut SqliteConnection| -> Result<Option<ApprovalRequest>> {
                    // Guarded by the pending status: the second of two
                    // concurrent resolutions matches zero rows.
                    let updated = diesel::update(
                        approval_requests::table
                            .find(&request_id)
                            .filter(
                                approval_requests::status
                                    .eq(ApprovalStatus::Pending.as_str()),
                            ),
                    )
                    .set((
                        approval_requests::status.eq(status.as_str()),
                        approval_requests::responded_at.eq(Utc::now().naive_utc()),
                        approval_requests::parent_response.eq(parent_response.clone()),
                    ))
                    .execute(conn)?;
                    if updated == 0 {
                        return Ok(None);
                    }
                    Ok(approval_requests::table
                        .find(&request_id)
                        .first::<ApprovalRequest>(conn)
                        .optional()?)
                },
            )
            .await
    }

    async fn auto_reject_expired(&self, now: NaiveDateTime) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let rejected = diesel::update(
                    approval_requests::table
                        .filter(approval_requests::status.eq(ApprovalStatus::Pending.as_str()))
                        .filter(approval_requests::expires_at.is_not_null())
                        .filter(approval_requests::expires_at.lt(now)),
                )
                .set((
                    approval_requests::status.eq(ApprovalStatus::Rejected.as_str()),
                    approval_requests::responded_at.eq(now),
                    approval_requests::parent_response.eq("expired"),
                ))
                .execute(conn)?;
                Ok(rejected)
            })
            .await
    }
}
