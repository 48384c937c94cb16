use thiserror::Error;

#[derive(Debug, Error)]
pub enum IncomeError {
    #[error("Income {0} not found")]
    NotFound(String),
}
