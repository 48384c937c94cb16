use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of numeric limits a parent can place on a child account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionType {
    SpendingLimit,
    GoalAmountLimit,
    DailyUsageLimit,
}

impl RestrictionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictionType::SpendingLimit => "spending_limit",
            RestrictionType::GoalAmountLimit => "goal_amount_limit",
            RestrictionType::DailyUsageLimit => "daily_usage_limit",
        }
    }
}

impl FromStr for RestrictionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_limit" => Ok(RestrictionType::SpendingLimit),
            "goal_amount_limit" => Ok(RestrictionType::GoalAmountLimit),
            "daily_usage_limit" => Ok(RestrictionType::DailyUsageLimit),
            _ => Err(format!("unknown restriction type: {}", s)),
        }
    }
}

impl fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of an approval request. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("unknown approval status: {}", s)),
        }
    }
}

/// What kind of item an approval request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalType {
    Goal,
    Reward,
    Expense,
}

impl ApprovalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalType::Goal => "goal",
            ApprovalType::Reward => "reward",
            ApprovalType::Expense => "expense",
        }
    }
}

impl FromStr for ApprovalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goal" => Ok(ApprovalType::Goal),
            "reward" => Ok(ApprovalType::Reward),
            "expense" => Ok(ApprovalType::Expense),
            _ => Err(format!("unknown approval type: {}", s)),
        }
    }
}

/// An active guardianship between two accounts. A child has at most one
/// active link; links are deactivated, never hard-deleted.
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::parent_child_links)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ParentChildLink {
    pub id: String,
    pub parent_id: String,
    pub child_id: String,
    pub nickname: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A configured numeric limit on a child account
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::restrictions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    pub id: String,
    pub child_id: String,
    pub parent_id: String,
    pub restriction_type: String,
    pub limit_value: f64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewRestriction {
    pub child_id: String,
    pub parent_id: String,
    pub restriction_type: String,
    pub limit_value: f64,
}

/// A pending decision routed to a parent because a child action would
/// violate a restriction
#[derive(
    Queryable,
    Identifiable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::approval_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub id: String,
    pub child_id: String,
    pub parent_id: String,
    pub request_type: String,
    pub item_id: String,
    pub request_data: String,
    pub status: String,
    pub requested_at: NaiveDateTime,
    pub responded_at: Option<NaiveDateTime>,
    pub parent_response: Option<String>,
    pub expires_at: Option<NaiveDateTime>,
}

impl ApprovalRequest {
    pub fn approval_status(&self) -> Option<ApprovalStatus> {
        self.status.parse().ok()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewApprovalRequest {
    pub child_id: String,
    pub parent_id: String,
    pub request_type: String,
    pub item_id: String,
    pub request_data: serde_json::Value,
    pub expires_at: Option<NaiveDateTime>,
}

/// Outcome of a restriction check. A denial is a value, not an error:
/// the caller decides whether to route it into an approval request.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActionCheck {
    pub allowed: bool,
    pub reason: Option<String>,
    pub restriction: Option<Restriction>,
}

impl ActionCheck {
    pub fn allow() -> Self {
        ActionCheck {
            allowed: true,
            reason: None,
            restriction: None,
        }
    }

    pub fn deny(reason: String, restriction: Restriction) -> Self {
        ActionCheck {
            allowed: false,
            reason: Some(reason),
            restriction: Some(restriction),
        }
    }
}
