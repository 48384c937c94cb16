use thiserror::Error;

/// Failures specific to the savings-goal lifecycle
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Goal {0} not found")]
    NotFound(String),

    #[error("Goal {id} is {status}; progress can only be added to an active goal")]
    NotActive { id: String, status: String },

    #[error("Goal {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: String,
        to: String,
    },
}
