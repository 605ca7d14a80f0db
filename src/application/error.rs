use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::lifecycle::PostAction;

use super::inflight::InFlightError;
use super::ports::{ApiError, AuthExchangeError, StorageError};

/// Failure categories surfaced to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    SessionExpired,
    Remote,
    Busy,
    Storage,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0}")]
    Authentication(String),
    #[error("your session has expired; sign in again")]
    SessionExpired,
    #[error("{0}")]
    Remote(String),
    #[error("{action} is already in progress")]
    Busy { action: PostAction },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(_) => ErrorKind::Validation,
            AppError::Authentication(_) => ErrorKind::Authentication,
            AppError::SessionExpired => ErrorKind::SessionExpired,
            AppError::Remote(_) => ErrorKind::Remote,
            AppError::Busy { .. } => ErrorKind::Busy,
            AppError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Dismissible message for the editor.
    pub fn notice(&self) -> String {
        self.to_string()
    }
}

/// Plain conversion without session side effects; prefer
/// [`SessionStore::screen`](super::session::SessionStore::screen) for calls
/// that carried the session token.
impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => AppError::SessionExpired,
            other => AppError::Remote(other.to_string()),
        }
    }
}

impl From<AuthExchangeError> for AppError {
    fn from(error: AuthExchangeError) -> Self {
        match error {
            AuthExchangeError::Rejected(message) => AppError::Authentication(message),
            other => AppError::Remote(other.to_string()),
        }
    }
}

impl From<InFlightError> for AppError {
    fn from(error: InFlightError) -> Self {
        match error {
            InFlightError::AlreadyRunning { action, .. } => AppError::Busy { action },
        }
    }
}
