use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated view of a user's ledger over a time window. Income totals
/// are boosted (amount x multiplier); the savings rate is clamped to
/// [0, 100].
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub user_id: String,
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_amount: f64,
    pub savings_rate: f64,
    pub income_by_source: HashMap<String, f64>,
    pub expenses_by_category: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    SpendingSwing,
    StreakMomentum,
    GoalAtRisk,
}

/// An advisory observation layered on top of the ledger. Never
/// authoritative; generation failures degrade to no insights at all.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}
