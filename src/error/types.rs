use std::collections::TryReserveError;

use thiserror::Error;

/// Unified result type for the gridbox crate.
pub type Result<T> = std::result::Result<T, GridboxError>;

/// Errors surfaced by the gridbox layout engine.
#[derive(Debug, Error)]
pub enum GridboxError {
    #[error("child `{0}` is not managed by this gridbox")]
    ChildNotFound(String),
    #[error("invalid constraint on child `{child}`: {reason}")]
    InvalidConstraint { child: String, reason: String },
    #[error("unable to reserve track buffers: {0}")]
    Allocation(#[from] TryReserveError),
    #[error(transparent)]
    Parse(#[from] ParseConstraintError),
}

/// Failure converting a configuration string into a constraint value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseConstraintError {
    #[error("unknown fill type `{0}`")]
    Fill(String),
    #[error("unknown gravity `{0}`")]
    Gravity(String),
    #[error("invalid grid position `{0}`")]
    Position(String),
}
