use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a chore: the child marks it completed, the parent
/// approves it. Approval is the only transition that pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreStatus {
    Unstarted,
    Completed,
    Approved,
}

impl ChoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoreStatus::Unstarted => "unstarted",
            ChoreStatus::Completed => "completed",
            ChoreStatus::Approved => "approved",
        }
    }
}

impl FromStr for ChoreStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unstarted" => Ok(ChoreStatus::Unstarted),
            "completed" => Ok(ChoreStatus::Completed),
            "approved" => Ok(ChoreStatus::Approved),
            _ => Err(format!("unknown chore status: {}", s)),
        }
    }
}

impl fmt::Display for ChoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

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
#[diesel(table_name = crate::schema::chores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Chore {
    pub id: String,
    pub child_id: String,
    pub parent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub reward_amount: f64,
    pub status: String,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub approved_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Chore {
    pub fn chore_status(&self) -> Option<ChoreStatus> {
        self.status.parse().ok()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewChore {
    pub child_id: String,
    pub parent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub reward_amount: f64,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub due_date: Option<NaiveDateTime>,
}

/// A scheduled income source for a child, paid when `next_due` passes
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
#[diesel(table_name = crate::schema::allowances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Allowance {
    pub id: String,
    pub child_id: String,
    pub parent_id: String,
    pub amount: f64,
    pub period: String,
    pub next_due: NaiveDateTime,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewAllowance {
    pub child_id: String,
    pub parent_id: String,
    pub amount: f64,
    pub period: String,
    pub next_due: NaiveDateTime,
}
