use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::budget::budget_traits::BudgetServiceTrait;
use crate::constants::{MAX_EXPENSE_DESCRIPTION_LENGTH, MAX_TAGS_PER_EXPENSE, MAX_TAG_LENGTH};
use crate::errors::Result;
use crate::expenses::expenses_errors::ExpenseError;
use crate::expenses::expenses_model::{Expense, ExpenseUpdate, ExpenseWithAlert, NewExpense};
use crate::expenses::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use crate::models::{Category, RecurringPeriod};
use crate::validation::Validator;
use chrono::NaiveDateTime;

/// Service owning the expense ledger ("weed pulling")
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
    budget_service: Arc<dyn BudgetServiceTrait>,
}

impl ExpenseService {
    pub fn new(
        repository: Arc<dyn ExpenseRepositoryTrait>,
        budget_service: Arc<dyn BudgetServiceTrait>,
    ) -> Self {
        ExpenseService {
            repository,
            budget_service,
        }
    }

    fn validate_fields(
        amount: f64,
        category: &str,
        description: &str,
        is_recurring: bool,
        recurring_period: Option<&str>,
        tags: &[String],
    ) -> Result<Category> {
        let mut v = Validator::new();
        v.positive_amount("amount", amount);
        let parsed = v.closed_set::<Category>("category", category);
        v.required_text("description", description, MAX_EXPENSE_DESCRIPTION_LENGTH);
        v.recurring_pair(is_recurring, recurring_period);
        if let Some(period) = recurring_period {
            v.closed_set::<RecurringPeriod>("recurring_period", period);
        }
        if tags.len() > MAX_TAGS_PER_EXPENSE {
            v.violation("tags", format!("at most {} tags", MAX_TAGS_PER_EXPENSE));
        }
        for tag in tags {
            if tag.trim().is_empty() || tag.chars().count() > MAX_TAG_LENGTH {
                v.violation("tags", format!("invalid tag '{}'", tag));
            }
        }
        v.finish()?;
        Ok(parsed.expect("category parsed above"))
    }

    /// Tags behave as a set: order-preserving dedup before storage.
    fn tags_json(tags: &[String]) -> Result<String> {
        let mut seen = Vec::new();
        for tag in tags {
            if !seen.contains(tag) {
                seen.push(tag.clone());
            }
        }
        Ok(serde_json::to_string(&seen)?)
    }

    fn evaluate_alert(
        &self,
        user_id: &str,
        category: Category,
    ) -> Option<crate::budget::budget_model::BudgetAlert> {
        match self.budget_service.check_category_alert(user_id, category) {
            Ok(alert) => alert,
            Err(e) => {
                // Advisory path: a monitor failure never fails the write.
                warn!("Budget check failed for {} / {}: {}", user_id, category, e);
                None
            }
        }
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
        self.repository
            .get_expense(expense_id)
            .map_err(|e| e.for_operation("load expense"))
    }

    fn get_expenses_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
        self.repository
            .get_expenses_by_user(user_id)
            .map_err(|e| e.for_operation("load expenses"))
    }

    fn get_expenses_by_date_range(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        self.repository
            .get_expenses_by_date_range(user_id, start, end)
            .map_err(|e| e.for_operation("load expenses"))
    }

    fn get_expenses_by_category(&self, user_id: &str, category: Category) -> Result<Vec<Expense>> {
        self.repository
            .get_expenses_by_category(user_id, category)
            .map_err(|e| e.for_operation("load expenses"))
    }

    async fn log_expense(&self, new_expense: NewExpense) -> Result<ExpenseWithAlert> {
        let category = Self::validate_fields(
            new_expense.amount,
            &new_expense.category,
            &new_expense.description,
            new_expense.is_recurring,
            new_expense.recurring_period.as_deref(),
            &new_expense.tags,
        )?;
        let tags_json = Self::tags_json(&new_expense.tags)?;
        let user_id = new_expense.user_id.clone();

        let expense = self
            .repository
            .insert_new_expense(new_expense, tags_json)
            .await
            .map_err(|e| e.for_operation("log expense"))?;

        let alert = self.evaluate_alert(&user_id, category);
        Ok(ExpenseWithAlert { expense, alert })
    }

    async fn update_expense(&self, update: ExpenseUpdate) -> Result<Expense> {
        Self::validate_fields(
            update.amount,
            &update.category,
            &update.description,
            update.is_recurring,
            update.recurring_period.as_deref(),
            &update.tags,
        )?;
        let tags_json = Self::tags_json(&update.tags)?;
        let expense_id = update.id.clone();

        self.repository
            .update_expense(update, tags_json)
            .await
            .map_err(|e| e.for_operation("update expense"))?
            .ok_or_else(|| ExpenseError::NotFound(expense_id).into())
    }

    async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
        self.repository
            .delete_expense(expense_id)
            .await
            .map_err(|e| e.for_operation("delete expense"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::budget_model::{AlertSeverity, BudgetAlert, BudgetThreshold, ThresholdInput};
    use crate::errors::Error;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockExpenseRepository {
        expenses: Mutex<HashMap<String, Expense>>,
    }

    #[async_trait]
    impl ExpenseRepositoryTrait for MockExpenseRepository {
        fn get_expense(&self, expense_id: &str) -> Result<Option<Expense>> {
            Ok(self.expenses.lock().unwrap().get(expense_id).cloned())
        }

        fn get_expenses_by_user(&self, user_id: &str) -> Result<Vec<Expense>> {
            Ok(self
                .expenses
                .lock()
                .unwrap()
                .values()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect())
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
            _category: Category,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<f64> {
            Ok(0.0)
        }

        async fn insert_new_expense(
            &self,
            new_expense: NewExpense,
            tags_json: String,
        ) -> Result<Expense> {
            let now = Utc::now().naive_utc();
            let expense = Expense {
                id: "expense-1".to_string(),
                user_id: new_expense.user_id,
                amount: new_expense.amount,
                category: new_expense.category,
                description: new_expense.description,
                expense_date: new_expense.expense_date,
                receipt_image_ref: new_expense.receipt_image_ref,
                is_recurring: new_expense.is_recurring,
                recurring_period: new_expense.recurring_period,
                tags: tags_json,
                created_at: now,
                updated_at: now,
            };
            self.expenses
                .lock()
                .unwrap()
                .insert(expense.id.clone(), expense.clone());
            Ok(expense)
        }

        async fn update_expense(
            &self,
            update: ExpenseUpdate,
            tags_json: String,
        ) -> Result<Option<Expense>> {
            let mut expenses = self.expenses.lock().unwrap();
            match expenses.get_mut(&update.id) {
                Some(expense) => {
                    expense.amount = update.amount;
                    expense.tags = tags_json;
                    Ok(Some(expense.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete_expense(&self, expense_id: &str) -> Result<bool> {
            Ok(self.expenses.lock().unwrap().remove(expense_id).is_some())
        }
    }

    /// Budget monitor stub: either yields a fixed alert or fails.
    struct MockBudgetService {
        alert: Option<BudgetAlert>,
        fail: bool,
    }

    #[async_trait]
    impl BudgetServiceTrait for MockBudgetService {
        async fn set_budget_thresholds(
            &self,
            _user_id: &str,
            _thresholds: Vec<ThresholdInput>,
        ) -> Result<Vec<BudgetThreshold>> {
            Err(Error::Unexpected("not implemented".to_string()))
        }

        fn get_budget_thresholds(&self, _user_id: &str) -> Result<Vec<BudgetThreshold>> {
            Err(Error::Unexpected("not implemented".to_string()))
        }

        fn check_category_alert(
            &self,
            _user_id: &str,
            _category: Category,
        ) -> Result<Option<BudgetAlert>> {
            if self.fail {
                Err(Error::Unexpected("monitor down".to_string()))
            } else {
                Ok(self.alert.clone())
            }
        }

        fn check_budget_alerts(&self, _user_id: &str) -> Result<Vec<BudgetAlert>> {
            Ok(self.alert.clone().into_iter().collect())
        }
    }

    fn new_expense(tags: Vec<String>) -> NewExpense {
        NewExpense {
            user_id: "user-1".to_string(),
            amount: 25.0,
            category: "food".to_string(),
            description: "groceries".to_string(),
            expense_date: Utc::now().naive_utc(),
            receipt_image_ref: None,
            is_recurring: false,
            recurring_period: None,
            tags,
        }
    }

    fn sample_alert() -> BudgetAlert {
        BudgetAlert {
            category: "food".to_string(),
            current_spending: 420.0,
            limit: 500.0,
            percentage: 84.0,
            severity: AlertSeverity::Warning,
            message: "84% of the food budget used".to_string(),
        }
    }

    #[tokio::test]
    async fn logging_surfaces_budget_alert() {
        let service = ExpenseService::new(
            Arc::new(MockExpenseRepository::default()),
            Arc::new(MockBudgetService {
                alert: Some(sample_alert()),
                fail: false,
            }),
        );
        let logged = service.log_expense(new_expense(vec![])).await.unwrap();
        assert_eq!(logged.expense.amount, 25.0);
        let alert = logged.alert.expect("alert expected");
        assert_eq!(alert.severity, AlertSeverity::Warning);
    }

    #[tokio::test]
    async fn monitor_failure_does_not_block_write() {
        let service = ExpenseService::new(
            Arc::new(MockExpenseRepository::default()),
            Arc::new(MockBudgetService {
                alert: None,
                fail: true,
            }),
        );
        let logged = service.log_expense(new_expense(vec![])).await.unwrap();
        assert!(logged.alert.is_none());
    }

    #[tokio::test]
    async fn tags_are_deduplicated() {
        let service = ExpenseService::new(
            Arc::new(MockExpenseRepository::default()),
            Arc::new(MockBudgetService {
                alert: None,
                fail: false,
            }),
        );
        let logged = service
            .log_expense(new_expense(vec![
                "lunch".to_string(),
                "work".to_string(),
                "lunch".to_string(),
            ]))
            .await
            .unwrap();
        assert_eq!(logged.expense.tag_list(), vec!["lunch", "work"]);
    }

    #[tokio::test]
    async fn recurring_without_period_is_rejected() {
        let service = ExpenseService::new(
            Arc::new(MockExpenseRepository::default()),
            Arc::new(MockBudgetService {
                alert: None,
                fail: false,
            }),
        );
        let mut expense = new_expense(vec![]);
        expense.is_recurring = true;
        let err = service.log_expense(expense).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn updating_missing_expense_is_not_found() {
        let service = ExpenseService::new(
            Arc::new(MockExpenseRepository::default()),
            Arc::new(MockBudgetService {
                alert: None,
                fail: false,
            }),
        );
        let update = ExpenseUpdate {
            id: "nope".to_string(),
            amount: 10.0,
            category: "food".to_string(),
            description: "snack".to_string(),
            expense_date: Utc::now().naive_utc(),
            receipt_image_ref: None,
            is_recurring: false,
            recurring_period: None,
            tags: vec![],
        };
        let err = service.update_expense(update).await.unwrap_err();
        assert!(matches!(err, Error::Expense(ExpenseError::NotFound(_))));
    }
}
