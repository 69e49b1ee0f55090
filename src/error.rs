//! Errors surfaced by board commands

use thiserror::Error;

use crate::state::{timer::TimerId, validator::ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The draft was refused; the message is meant for the user
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No active timer with id {0}")]
    NotFound(TimerId),

    /// Deleting needs an explicit yes
    #[error("Deleting timer {0} requires confirmation")]
    ConfirmationRequired(TimerId),
}
