use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a savings goal ("crop"). `Completed` and `Cancelled` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Paused => "paused",
            GoalStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Cancelled)
    }

    /// Legal status transitions: active may complete, pause or cancel;
    /// paused may only resume.
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            GoalStatus::Active => matches!(
                next,
                GoalStatus::Completed | GoalStatus::Paused | GoalStatus::Cancelled
            ),
            GoalStatus::Paused => matches!(next, GoalStatus::Active),
            GoalStatus::Completed | GoalStatus::Cancelled => false,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "paused" => Ok(GoalStatus::Paused),
            "cancelled" => Ok(GoalStatus::Cancelled),
            _ => Err(format!("unknown goal status: {}", s)),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDateTime,
    pub category: String,
    pub crop_type: String,
    pub status: String,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    /// Parsed status; `None` if the stored value is unrecognized.
    pub fn goal_status(&self) -> Option<GoalStatus> {
        self.status.parse().ok()
    }

    /// Progress toward the target as a percentage (uncapped).
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount * 100.0
    }

    /// New amount and resulting status after adding progress. Reaching the
    /// target completes the goal in the same step; there is no state where
    /// progress exceeds the target on a still-active goal.
    pub fn progress_outcome(&self, amount: f64) -> (f64, GoalStatus) {
        let new_amount = self.current_amount + amount;
        if new_amount >= self.target_amount {
            (new_amount, GoalStatus::Completed)
        } else {
            (new_amount, GoalStatus::Active)
        }
    }
}

#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub id: Option<String>,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub deadline: NaiveDateTime,
    pub category: String,
    pub crop_type: String,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Full-record edit of a goal. Progress is excluded on purpose: it only
/// moves through `add_goal_progress`.
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub deadline: NaiveDateTime,
    pub category: String,
    pub crop_type: String,
    pub status: String,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
}
