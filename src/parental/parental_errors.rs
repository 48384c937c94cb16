use thiserror::Error;

/// Failures specific to the parental policy engine
#[derive(Debug, Error)]
pub enum ParentalError {
    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Account {id} must be in {expected} mode")]
    ModeMismatch { id: String, expected: String },

    #[error("Child {0} already has an active parent link")]
    LinkAlreadyExists(String),

    #[error("Link {0} not found")]
    LinkNotFound(String),

    #[error("No active link between parent {parent_id} and child {child_id}")]
    NotLinked {
        parent_id: String,
        child_id: String,
    },

    #[error("Restriction {0} not found")]
    RestrictionNotFound(String),
}
