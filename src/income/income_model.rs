use chrono::NaiveDateTime;
use diesel::prelude::*;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A logged piece of income ("fertilizer"). `multiplier` and
/// `streak_count` are derived at creation time by the streak engine and
/// are never user-supplied.
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
#[diesel(table_name = crate::schema::incomes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub income_date: NaiveDateTime,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
    pub multiplier: f64,
    pub streak_count: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Income {
    /// Amount after the fertilizer boost, as an exact decimal product.
    pub fn boosted_amount(&self) -> Decimal {
        let amount = Decimal::from_f64(self.amount).unwrap_or_default();
        let multiplier = Decimal::from_f64(self.multiplier).unwrap_or_default();
        crate::streaks::fertilizer_boost(amount, multiplier)
    }
}

/// Input for logging income. Streak and multiplier are attached by the
/// income service, not the caller.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    pub user_id: String,
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub income_date: NaiveDateTime,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
}

/// Edit of an income record. The derived streak fields are excluded.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IncomeUpdate {
    pub id: String,
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub income_date: NaiveDateTime,
    pub is_recurring: bool,
    pub recurring_period: Option<String>,
}
