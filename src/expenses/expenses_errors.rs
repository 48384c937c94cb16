use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Expense {0} not found")]
    NotFound(String),
}
