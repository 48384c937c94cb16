use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{BUDGET_DANGER_PERCENTAGE, BUDGET_EXCEEDED_PERCENTAGE};

/// Per-category monthly spending limit for one user
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
#[diesel(table_name = crate::schema::budget_thresholds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetThreshold {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub monthly_limit: f64,
    pub warning_percentage: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input for configuring one category threshold
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdInput {
    pub category: String,
    pub monthly_limit: f64,
    pub warning_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Danger,
    Exceeded,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
            AlertSeverity::Exceeded => "exceeded",
        }
    }

    /// Grades period-to-date spend against a threshold. Tiers are checked
    /// from most severe down; below the configured warning percentage no
    /// alert exists at all.
    pub fn grade(percentage: Decimal, warning_percentage: Decimal) -> Option<AlertSeverity> {
        if percentage >= BUDGET_EXCEEDED_PERCENTAGE {
            Some(AlertSeverity::Exceeded)
        } else if percentage >= BUDGET_DANGER_PERCENTAGE {
            Some(AlertSeverity::Danger)
        } else if percentage >= warning_percentage {
            Some(AlertSeverity::Warning)
        } else {
            None
        }
    }
}

/// A graded budget alert. Always derived from current ledger data on
/// demand; never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub category: String,
    pub current_spending: f64,
    pub limit: f64,
    pub percentage: f64,
    pub severity: AlertSeverity,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn grading_precedence() {
        let warn = dec!(80);
        assert_eq!(AlertSeverity::grade(dec!(84), warn), Some(AlertSeverity::Warning));
        assert_eq!(AlertSeverity::grade(dec!(92), warn), Some(AlertSeverity::Danger));
        assert_eq!(AlertSeverity::grade(dec!(100), warn), Some(AlertSeverity::Exceeded));
        assert_eq!(AlertSeverity::grade(dec!(130), warn), Some(AlertSeverity::Exceeded));
        assert_eq!(AlertSeverity::grade(dec!(79.9), warn), None);
    }

    #[test]
    fn warning_band_is_bounded_by_danger() {
        // A warning percentage above 90 never produces plain warnings.
        assert_eq!(AlertSeverity::grade(dec!(91), dec!(95)), Some(AlertSeverity::Danger));
        assert_eq!(AlertSeverity::grade(dec!(89), dec!(95)), None);
    }
}
