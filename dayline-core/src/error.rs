//! Core error kinds.

use thiserror::Error;

use crate::goal::GoalId;

/// Errors raised by validation and goal-list operations.
///
/// The scheduler itself never fails on a validated config; these only come
/// out of the boundary (parsing drafts, editing config, looking up goals).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("goal {0} not found")]
    NotFound(GoalId),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
