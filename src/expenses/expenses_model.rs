use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::budget::budget_model::BudgetAlert;

/// A logged expense ("weed"). Immutable except through an explicit update.
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
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub expense_date: NaiveDateTime,
    pub receipt_image_ref: Option<String>,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    /// JSON array of tag strings, see `tag_list`
    pub tags: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    pub fn tag_list(&self) -> Vec<String> {
        serde_json::from_str(&self.tags).unwrap_or_default()
    }
}

/// Input for logging an expense. Tags are deduplicated and stored as JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub expense_date: NaiveDateTime,
    pub receipt_image_ref: Option<String>,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full-record edit of an expense
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub expense_date: NaiveDateTime,
    pub receipt_image_ref: Option<String>,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub tags: Vec<String>,
}

/// Result of logging an expense: the stored record plus the budget alert
/// the write triggered, if any. The alert is advisory and never blocks
/// the write.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseWithAlert {
    pub expense: Expense,
    pub alert: Option<BudgetAlert>,
}
