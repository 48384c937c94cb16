use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spending/goal category. Stored as lowercase text in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Education,
    Clothing,
    Health,
    Savings,
    Gifts,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Entertainment => "entertainment",
            Category::Education => "education",
            Category::Clothing => "clothing",
            Category::Health => "health",
            Category::Savings => "savings",
            Category::Gifts => "gifts",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(Category::Food),
            "transport" => Ok(Category::Transport),
            "entertainment" => Ok(Category::Entertainment),
            "education" => Ok(Category::Education),
            "clothing" => Ok(Category::Clothing),
            "health" => Ok(Category::Health),
            "savings" => Ok(Category::Savings),
            "gifts" => Ok(Category::Gifts),
            "other" => Ok(Category::Other),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a piece of income came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    Allowance,
    Chore,
    Gift,
    Job,
    Other,
}

impl IncomeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeSource::Allowance => "allowance",
            IncomeSource::Chore => "chore",
            IncomeSource::Gift => "gift",
            IncomeSource::Job => "job",
            IncomeSource::Other => "other",
        }
    }
}

impl FromStr for IncomeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allowance" => Ok(IncomeSource::Allowance),
            "chore" => Ok(IncomeSource::Chore),
            "gift" => Ok(IncomeSource::Gift),
            "job" => Ok(IncomeSource::Job),
            "other" => Ok(IncomeSource::Other),
            _ => Err(format!("unknown income source: {}", s)),
        }
    }
}

impl fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cadence of a recurring record. Required whenever `is_recurring` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurringPeriod {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurringPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringPeriod::Daily => "daily",
            RecurringPeriod::Weekly => "weekly",
            RecurringPeriod::Biweekly => "biweekly",
            RecurringPeriod::Monthly => "monthly",
        }
    }

    /// Number of days until the next occurrence.
    pub fn days(&self) -> i64 {
        match self {
            RecurringPeriod::Daily => 1,
            RecurringPeriod::Weekly => 7,
            RecurringPeriod::Biweekly => 14,
            RecurringPeriod::Monthly => 30,
        }
    }
}

impl FromStr for RecurringPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurringPeriod::Daily),
            "weekly" => Ok(RecurringPeriod::Weekly),
            "biweekly" => Ok(RecurringPeriod::Biweekly),
            "monthly" => Ok(RecurringPeriod::Monthly),
            _ => Err(format!("unknown recurring period: {}", s)),
        }
    }
}

impl fmt::Display for RecurringPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
