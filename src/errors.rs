use diesel::result::Error as DieselError;
use log::error;
use std::fmt;
use thiserror::Error;

use crate::chores::chores_errors::ChoreError;
use crate::expenses::expenses_errors::ExpenseError;
use crate::goals::goals_errors::GoalError;
use crate::income::income_errors::IncomeError;
use crate::parental::parental_errors::ParentalError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger and policy engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    #[error("Expense error: {0}")]
    Expense(#[from] ExpenseError),

    #[error("Income error: {0}")]
    Income(#[from] IncomeError),

    #[error("Parental control error: {0}")]
    Parental(#[from] ParentalError),

    #[error("Chore error: {0}")]
    Chore(#[from] ChoreError),

    #[error("{0}")]
    Unexpected(String),
}

impl Error {
    /// Collapses infrastructure failures into one stable, operation-named
    /// message. Validation and domain errors pass through untouched so
    /// callers can still branch on them.
    pub fn for_operation(self, operation: &str) -> Error {
        match self {
            Error::Database(e) => {
                error!("{} failed: {}", operation, e);
                Error::Unexpected(format!("Failed to {}", operation))
            }
            Error::Unexpected(e) => {
                error!("{} failed: {}", operation, e);
                Error::Unexpected(format!("Failed to {}", operation))
            }
            other => other,
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    #[error("Database writer unavailable: {0}")]
    WriterUnavailable(String),
}

/// A single violated field, as collected by `validation::Validator`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{}", format_violations(.0))]
    Fields(Vec<FieldViolation>),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        Error::Database(DatabaseError::QueryFailed(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
