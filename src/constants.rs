use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Multiplier applied to income logged with no streak history.
pub const STREAK_BASE_MULTIPLIER: Decimal = dec!(1.0);

/// Multiplier gained per consecutive day of logged income.
pub const STREAK_STEP: Decimal = dec!(0.1);

/// Ceiling for the fertilizer multiplier, reached at a streak of 10.
pub const STREAK_MULTIPLIER_CAP: Decimal = dec!(2.0);

/// Spend percentage at which a budget alert escalates to danger.
pub const BUDGET_DANGER_PERCENTAGE: Decimal = dec!(90);

/// Spend percentage at which a budget is considered exceeded.
pub const BUDGET_EXCEEDED_PERCENTAGE: Decimal = dec!(100);

/// Month-over-month spending swing (percent) worth surfacing as an insight.
pub const SPENDING_SWING_PERCENTAGE: Decimal = dec!(10);

/// Streak length treated as a positive momentum signal.
pub const STREAK_MOMENTUM_THRESHOLD: i32 = 7;

/// Days before a goal deadline at which low progress becomes at-risk.
pub const GOAL_AT_RISK_WINDOW_DAYS: i64 = 7;

/// Progress percentage below which a near-deadline goal is at-risk.
pub const GOAL_AT_RISK_PROGRESS: Decimal = dec!(90);

/// Field length bounds shared by the validation layer
pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_EXPENSE_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_TAG_LENGTH: usize = 30;
pub const MAX_TAGS_PER_EXPENSE: usize = 10;
