//! The error kinds this crate surfaces

use thiserror::Error;

use crate::task::TaskId;

/// Every failure a [`TaskStore`](crate::traits::TaskStore) operation can report.
///
/// These never crash the interaction: the repository catches them at the point of the call,
/// surfaces a [`Notice`](crate::notify::Notice) and leaves its cached state unchanged, so that
/// the user can retry manually.
#[derive(Debug, Error)]
pub enum Error {
    /// The submitted fields were rejected before any remote call was attempted
    #[error("invalid task: {0}")]
    Validation(String),

    /// The mutation target no longer exists on the server
    #[error("no task with id {0}")]
    NotFound(TaskId),

    /// The network or the backend failed
    #[error("backend error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}
