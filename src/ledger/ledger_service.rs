use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Utc};
use log::error;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::{
    GOAL_AT_RISK_PROGRESS, GOAL_AT_RISK_WINDOW_DAYS, SPENDING_SWING_PERCENTAGE,
    STREAK_MOMENTUM_THRESHOLD,
};
use crate::errors::Result;
use crate::expenses::expenses_traits::ExpenseServiceTrait;
use crate::goals::goals_model::GoalStatus;
use crate::goals::goals_traits::GoalServiceTrait;
use crate::income::income_traits::IncomeServiceTrait;
use crate::ledger::ledger_model::{FinancialSummary, Insight, InsightKind};

/// Trait for cross-entity ledger aggregation
pub trait LedgerServiceTrait: Send + Sync {
    fn generate_financial_summary(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<FinancialSummary>;
    /// Advisory heuristics over recent ledger state. Degrades to an empty
    /// list when anything fails.
    fn generate_insights(&self, user_id: &str) -> Vec<Insight>;
}

pub struct LedgerService {
    income_service: Arc<dyn IncomeServiceTrait>,
    expense_service: Arc<dyn ExpenseServiceTrait>,
    goal_service: Arc<dyn GoalServiceTrait>,
}

impl LedgerService {
    pub fn new(
        income_service: Arc<dyn IncomeServiceTrait>,
        expense_service: Arc<dyn ExpenseServiceTrait>,
        goal_service: Arc<dyn GoalServiceTrait>,
    ) -> Self {
        LedgerService {
            income_service,
            expense_service,
            goal_service,
        }
    }

    fn try_insights(&self, user_id: &str) -> Result<Vec<Insight>> {
        let mut insights = Vec::new();
        let now = Utc::now().naive_utc();

        // Spending swing: this 30-day window against the previous one.
        let window = Duration::days(30);
        let current = self.sum_expenses(user_id, now - window, now)?;
        let prior = self.sum_expenses(user_id, now - window - window, now - window)?;
        if prior > Decimal::ZERO {
            let swing = (current - prior) / prior * dec!(100);
            if swing.abs() > SPENDING_SWING_PERCENTAGE {
                let direction = if swing > Decimal::ZERO { "up" } else { "down" };
                insights.push(Insight {
                    kind: InsightKind::SpendingSwing,
                    message: format!(
                        "Spending is {} {}% compared to the previous 30 days",
                        direction,
                        swing.abs().round_dp(0)
                    ),
                });
            }
        }

        let streak = self.income_service.get_current_streak(user_id)?;
        if streak >= STREAK_MOMENTUM_THRESHOLD {
            insights.push(Insight {
                kind: InsightKind::StreakMomentum,
                message: format!(
                    "{} days of logged income in a row; the fertilizer boost is working",
                    streak
                ),
            });
        }

        let active_goals = self
            .goal_service
            .get_goals_by_status(user_id, GoalStatus::Active)?;
        let risk_horizon = now + Duration::days(GOAL_AT_RISK_WINDOW_DAYS);
        for goal in &active_goals {
            let progress = Decimal::from_f64(goal.progress_percentage()).unwrap_or_default();
            if goal.deadline <= risk_horizon && progress < GOAL_AT_RISK_PROGRESS {
                insights.push(Insight {
                    kind: InsightKind::GoalAtRisk,
                    message: format!(
                        "'{}' is due soon at {}% of its target",
                        goal.title,
                        progress.round_dp(0)
                    ),
                });
            }
        }

        Ok(insights)
    }

    fn sum_expenses(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Decimal> {
        let expenses = self
            .expense_service
            .get_expenses_by_date_range(user_id, start, end)?;
        Ok(expenses
            .iter()
            .map(|e| Decimal::from_f64(e.amount).unwrap_or_default())
            .sum())
    }
}

impl LedgerServiceTrait for LedgerService {
    fn generate_financial_summary(
        &self,
        user_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<FinancialSummary> {
        let incomes = self
            .income_service
            .get_incomes_by_date_range(user_id, start, end)
            .map_err(|e| e.for_operation("generate financial summary"))?;
        let expenses = self
            .expense_service
            .get_expenses_by_date_range(user_id, start, end)
            .map_err(|e| e.for_operation("generate financial summary"))?;

        let mut total_income = Decimal::ZERO;
        let mut income_by_source: HashMap<String, Decimal> = HashMap::new();
        for income in &incomes {
            let boosted = income.boosted_amount();
            total_income += boosted;
            *income_by_source.entry(income.source.clone()).or_default() += boosted;
        }

        let mut total_expenses = Decimal::ZERO;
        let mut expenses_by_category: HashMap<String, Decimal> = HashMap::new();
        for expense in &expenses {
            let amount = Decimal::from_f64(expense.amount).unwrap_or_default();
            total_expenses += amount;
            *expenses_by_category
                .entry(expense.category.clone())
                .or_default() += amount;
        }

        let net = total_income - total_expenses;
        let savings_rate = if total_income > Decimal::ZERO {
            (net / total_income * dec!(100))
                .clamp(Decimal::ZERO, dec!(100))
                .round_dp(1)
        } else {
            Decimal::ZERO
        };

        let to_f64_map = |map: HashMap<String, Decimal>| -> HashMap<String, f64> {
            map.into_iter()
                .map(|(k, v)| (k, v.to_f64().unwrap_or(0.0)))
                .collect()
        };

        Ok(FinancialSummary {
            user_id: user_id.to_string(),
            period_start: start,
            period_end: end,
            total_income: total_income.to_f64().unwrap_or(0.0),
            total_expenses: total_expenses.to_f64().unwrap_or(0.0),
            net_amount: net.to_f64().unwrap_or(0.0),
            savings_rate: savings_rate.to_f64().unwrap_or(0.0),
            income_by_source: to_f64_map(income_by_source),
            expenses_by_category: to_f64_map(expenses_by_category),
        })
    }

    fn generate_insights(&self, user_id: &str) -> Vec<Insight> {
        match self.try_insights(user_id) {
            Ok(insights) => insights,
            Err(e) => {
                error!("Insight generation failed for {}: {}", user_id, e);
                Vec::new()
            }
        }
    }
}
