use thiserror::Error;

/// Failures specific to chores and allowances
#[derive(Debug, Error)]
pub enum ChoreError {
    #[error("Chore {0} not found")]
    NotFound(String),

    #[error("Chore {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },

    #[error("Allowance {0} not found")]
    AllowanceNotFound(String),
}
