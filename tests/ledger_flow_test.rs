use std::sync::Arc;

use chrono::{Duration, Utc};

use growfolio_core::budget::{
    BudgetRepository, BudgetService, BudgetServiceTrait, ThresholdInput,
};
use growfolio_core::expenses::{
    ExpenseRepository, ExpenseService, ExpenseServiceTrait, NewExpense,
};
use growfolio_core::goals::{GoalRepository, GoalService, GoalServiceTrait, GoalStatus, NewGoal};
use growfolio_core::income::{IncomeRepository, IncomeService, IncomeServiceTrait, NewIncome};
use growfolio_core::models::Category;

mod common;

fn new_goal(user_id: &str, target: f64) -> NewGoal {
    NewGoal {
        id: None,
        user_id: user_id.to_string(),
        title: "New telescope".to_string(),
        description: Some("Saving up for stargazing".to_string()),
        target_amount: target,
        deadline: Utc::now().naive_utc() + Duration::days(60),
        category: "savings".to_string(),
        crop_type: "sunflower".to_string(),
        is_recurring: false,
        recurring_period: None,
        created_at: None,
        updated_at: None,
    }
}

#[tokio::test]
async fn goal_progress_completes_against_real_store() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, writer) = common::setup_db(&dir);

    let service = GoalService::new(Arc::new(GoalRepository::new(pool, writer)));

    let goal = service.create_goal(new_goal("user-1", 100.0)).await.unwrap();
    assert_eq!(goal.current_amount, 0.0);
    assert_eq!(goal.goal_status(), Some(GoalStatus::Active));

    let goal = service.add_goal_progress(&goal.id, 40.0).await.unwrap();
    assert_eq!(goal.current_amount, 40.0);
    assert_eq!(goal.goal_status(), Some(GoalStatus::Active));

    let goal = service.add_goal_progress(&goal.id, 60.0).await.unwrap();
    assert_eq!(goal.goal_status(), Some(GoalStatus::Completed));

    // Terminal goal rejects further progress.
    assert!(service.add_goal_progress(&goal.id, 1.0).await.is_err());
}

#[tokio::test]
async fn streak_counts_up_across_logged_income() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, writer) = common::setup_db(&dir);

    let service = IncomeService::new(Arc::new(IncomeRepository::new(pool, writer)));

    let mut last_streak = 0;
    for day in 0..3 {
        let income = service
            .log_income(NewIncome {
                user_id: "user-1".to_string(),
                amount: 20.0,
                source: "job".to_string(),
                description: format!("day {} earnings", day),
                income_date: Utc::now().naive_utc() + Duration::days(day),
                is_recurring: false,
                recurring_period: None,
            })
            .await
            .unwrap();
        assert_eq!(income.streak_count, last_streak + 1);
        last_streak = income.streak_count;
    }
    assert_eq!(service.get_current_streak("user-1").unwrap(), 3);

    service.reset_streak("user-1").await.unwrap();
    assert_eq!(service.get_current_streak("user-1").unwrap(), 0);
}

#[tokio::test]
async fn expense_logging_triggers_budget_alert() {
    let dir = tempfile::tempdir().unwrap();
    let (pool, writer) = common::setup_db(&dir);

    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let budget_service = Arc::new(BudgetService::new(
        Arc::new(BudgetRepository::new(pool, writer)),
        expense_repository.clone(),
    ));
    let expense_service = ExpenseService::new(expense_repository, budget_service.clone());

    budget_service
        .set_budget_thresholds(
            "user-1",
            vec![ThresholdInput {
                category: "food".to_string(),
                monthly_limit: 500.0,
                warning_percentage: 80.0,
            }],
        )
        .await
        .unwrap();

    let quiet = expense_service
        .log_expense(NewExpense {
            user_id: "user-1".to_string(),
            amount: 100.0,
            category: "food".to_string(),
            description: "groceries".to_string(),
            expense_date: Utc::now().naive_utc(),
            receipt_image_ref: None,
            is_recurring: false,
            recurring_period: None,
            tags: vec!["weekly".to_string()],
        })
        .await
        .unwrap();
    assert!(quiet.alert.is_none());

    let alerted = expense_service
        .log_expense(NewExpense {
            user_id: "user-1".to_string(),
            amount: 320.0,
            category: "food".to_string(),
            description: "birthday dinner".to_string(),
            expense_date: Utc::now().naive_utc(),
            receipt_image_ref: None,
            is_recurring: false,
            recurring_period: None,
            tags: vec![],
        })
        .await
        .unwrap();

    let alert = alerted.alert.expect("threshold crossed");
    assert_eq!(alert.category, "food");
    assert_eq!(alert.percentage, 84.0);

    // Alerts are recomputed, not cached: the same question asked again
    // reflects the same ledger state.
    let again = budget_service
        .check_category_alert("user-1", Category::Food)
        .unwrap()
        .expect("still above the warning band");
    assert_eq!(again.current_spending, 420.0);
}
