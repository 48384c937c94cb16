use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};
use log::debug;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::budget::budget_model::{AlertSeverity, BudgetAlert, BudgetThreshold, ThresholdInput};
use crate::budget::budget_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::errors::Result;
use crate::expenses::expenses_traits::ExpenseRepositoryTrait;
use crate::models::Category;
use crate::validation::Validator;

/// Budget alert monitor: grades period-to-date category spend against the
/// user's configured thresholds.
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
    ) -> Self {
        BudgetService {
            repository,
            expense_repository,
        }
    }

    fn validate_inputs(thresholds: &[ThresholdInput]) -> Result<()> {
        let mut v = Validator::new();
        let mut seen = Vec::new();
        for input in thresholds {
            v.closed_set::<Category>("category", &input.category);
            v.positive_amount("monthly_limit", input.monthly_limit);
            v.percentage("warning_percentage", input.warning_percentage);
            if seen.contains(&input.category) {
                v.violation("category", format!("duplicate category '{}'", input.category));
            }
            seen.push(input.category.clone());
        }
        Ok(v.finish()?)
    }

    fn alert_for(threshold: &BudgetThreshold, spend: f64) -> Option<BudgetAlert> {
        let spend_dec = Decimal::from_f64(spend).unwrap_or_default();
        let limit_dec = Decimal::from_f64(threshold.monthly_limit).unwrap_or_default();
        if limit_dec <= Decimal::ZERO {
            return None;
        }
        let percentage = (spend_dec / limit_dec * dec!(100)).round_dp(1);
        let warning = Decimal::from_f64(threshold.warning_percentage).unwrap_or_default();

        let severity = AlertSeverity::grade(percentage, warning)?;
        let message = match severity {
            AlertSeverity::Exceeded => format!(
                "{} budget exceeded: {:.2} spent of a {:.2} limit",
                threshold.category, spend, threshold.monthly_limit
            ),
            AlertSeverity::Danger => format!(
                "{} spending is at {}% of the monthly limit",
                threshold.category, percentage
            ),
            AlertSeverity::Warning => format!(
                "{} spending reached {}% of the monthly limit",
                threshold.category, percentage
            ),
        };

        Some(BudgetAlert {
            category: threshold.category.clone(),
            current_spending: spend,
            limit: threshold.monthly_limit,
            percentage: percentage.to_f64().unwrap_or(0.0),
            severity,
            message,
        })
    }
}

/// Current calendar month as a half-open window.
pub fn month_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let date = now.date();
    let start = date.with_day(1).expect("first of month is valid");
    let end = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .expect("first of next month is valid");
    (
        start.and_hms_opt(0, 0, 0).expect("midnight is valid"),
        end.and_hms_opt(0, 0, 0).expect("midnight is valid"),
    )
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn set_budget_thresholds(
        &self,
        user_id: &str,
        thresholds: Vec<ThresholdInput>,
    ) -> Result<Vec<BudgetThreshold>> {
        Self::validate_inputs(&thresholds)?;
        self.repository
            .replace_thresholds(user_id.to_string(), thresholds)
            .await
            .map_err(|e| e.for_operation("set budget thresholds"))
    }

    fn get_budget_thresholds(&self, user_id: &str) -> Result<Vec<BudgetThreshold>> {
        self.repository
            .get_thresholds(user_id)
            .map_err(|e| e.for_operation("load budget thresholds"))
    }

    fn check_category_alert(
        &self,
        user_id: &str,
        category: Category,
    ) -> Result<Option<BudgetAlert>> {
        let threshold = self
            .repository
            .get_threshold(user_id, category)
            .map_err(|e| e.for_operation("check budget"))?;
        let threshold = match threshold {
            Some(t) => t,
            // No threshold configured means no alert is possible.
            None => return Ok(None),
        };

        let (start, end) = month_window(Utc::now().naive_utc());
        let spend = self
            .expense_repository
            .get_category_spend(user_id, category, start, end)
            .map_err(|e| e.for_operation("check budget"))?;

        debug!(
            "Budget check for {} / {}: {:.2} of {:.2}",
            user_id, category, spend, threshold.monthly_limit
        );
        Ok(Self::alert_for(&threshold, spend))
    }

    fn check_budget_alerts(&self, user_id: &str) -> Result<Vec<BudgetAlert>> {
        let thresholds = self
            .repository
            .get_thresholds(user_id)
            .map_err(|e| e.for_operation("check budgets"))?;
        let (start, end) = month_window(Utc::now().naive_utc());

        let mut alerts = Vec::new();
        for threshold in &thresholds {
            let category = match threshold.category.parse::<Category>() {
                Ok(c) => c,
                Err(_) => continue,
            };
            let spend = self
                .expense_repository
                .get_category_spend(user_id, category, start, end)
                .map_err(|e| e.for_operation("check budgets"))?;
            if let Some(alert) = Self::alert_for(threshold, spend) {
                alerts.push(alert);
            }
        }
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::expenses::expenses_model::{Expense, ExpenseUpdate, NewExpense};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockBudgetRepository {
        thresholds: Vec<BudgetThreshold>,
    }

    #[async_trait]
    impl BudgetRepositoryTrait for MockBudgetRepository {
        fn get_thresholds(&self, user_id: &str) -> Result<Vec<BudgetThreshold>> {
            Ok(self
                .thresholds
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        }

        fn get_threshold(
            &self,
            user_id: &str,
            category: Category,
        ) -> Result<Option<BudgetThreshold>> {
            Ok(self
                .thresholds
                .iter()
                .find(|t| t.user_id == user_id && t.category == category.as_str())
                .cloned())
        }

        async fn replace_thresholds(
            &self,
            _user_id: String,
            _thresholds: Vec<ThresholdInput>,
        ) -> Result<Vec<BudgetThreshold>> {
            Err(Error::Unexpected("not implemented".to_string()))
        }
    }

    /// Expense repo stub: fixed category spends, everything else unused.
    struct SpendStub {
        spend_by_category: Mutex<HashMap<String, f64>>,
    }

    impl SpendStub {
        fn with(category: &str, spend: f64) -> Self {
            SpendStub {
                spend_by_category: Mutex::new(HashMap::from([(category.to_string(), spend)])),
            }
        }
    }

    #[async_trait]
    impl ExpenseRepositoryTrait for SpendStub {
        fn get_expense(&self, _expense_id: &str) -> Result<Option<Expense>> {
            Ok(None)
        }

        fn get_expenses_by_user(&self, _user_id: &str) -> Result<Vec<Expense>> {
            Ok(Vec::new())
        }

        fn get_expenses_by_date_range(
            &self,
            _user_id: &str,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<Expense>> {
            Ok(Vec::new())
        }

        fn get_expenses_by_category(
            &self,
            _user_id: &str,
            _category: Category,
        ) -> Result<Vec<Expense>> {
            Ok(Vec::new())
        }

        fn get_category_spend(
            &self,
            _user_id: &str,
            category: Category,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<f64> {
            Ok(*self
                .spend_by_category
                .lock()
                .unwrap()
                .get(category.as_str())
                .unwrap_or(&0.0))
        }

        async fn insert_new_expense(
            &self,
            _new_expense: NewExpense,
            _tags_json: String,
        ) -> Result<Expense> {
            Err(Error::Unexpected("not implemented".to_string()))
        }

        async fn update_expense(
            &self,
            _update: ExpenseUpdate,
            _tags_json: String,
        ) -> Result<Option<Expense>> {
            Err(Error::Unexpected("not implemented".to_string()))
        }

        async fn delete_expense(&self, _expense_id: &str) -> Result<bool> {
            Err(Error::Unexpected("not implemented".to_string()))
        }
    }

    fn food_threshold() -> BudgetThreshold {
        BudgetThreshold {
            id: "t-1".to_string(),
            user_id: "user-1".to_string(),
            category: "food".to_string(),
            monthly_limit: 500.0,
            warning_percentage: 80.0,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn service(spend: f64) -> BudgetService {
        BudgetService::new(
            Arc::new(MockBudgetRepository {
                thresholds: vec![food_threshold()],
            }),
            Arc::new(SpendStub::with("food", spend)),
        )
    }

    #[test]
    fn warning_at_84_percent() {
        let alert = service(420.0)
            .check_category_alert("user-1", Category::Food)
            .unwrap()
            .expect("alert expected");
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(alert.percentage, 84.0);
        assert_eq!(alert.current_spending, 420.0);
        assert_eq!(alert.limit, 500.0);
    }

    #[test]
    fn danger_at_92_percent() {
        let alert = service(460.0)
            .check_category_alert("user-1", Category::Food)
            .unwrap()
            .expect("alert expected");
        assert_eq!(alert.severity, AlertSeverity::Danger);
    }

    #[test]
    fn exceeded_at_limit() {
        let alert = service(500.0)
            .check_category_alert("user-1", Category::Food)
            .unwrap()
            .expect("alert expected");
        assert_eq!(alert.severity, AlertSeverity::Exceeded);
        assert_eq!(alert.percentage, 100.0);
    }

    #[test]
    fn quiet_below_warning_band() {
        let alert = service(100.0)
            .check_category_alert("user-1", Category::Food)
            .unwrap();
        assert!(alert.is_none());
    }

    #[test]
    fn no_threshold_means_no_alert() {
        let alert = service(10_000.0)
            .check_category_alert("user-1", Category::Transport)
            .unwrap();
        assert!(alert.is_none());
    }

    #[test]
    fn duplicate_categories_rejected() {
        let svc = service(0.0);
        let inputs = vec![
            ThresholdInput {
                category: "food".to_string(),
                monthly_limit: 500.0,
                warning_percentage: 80.0,
            },
            ThresholdInput {
                category: "food".to_string(),
                monthly_limit: 300.0,
                warning_percentage: 70.0,
            },
        ];
        let err = tokio_test::block_on(svc.set_budget_thresholds("user-1", inputs)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn month_window_spans_calendar_month() {
        let now = NaiveDate::from_ymd_opt(2025, 12, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let (start, end) = month_window(now);
        assert_eq!(start.date(), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end.date(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }
}
