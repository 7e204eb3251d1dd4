//! Service-layer error taxonomy.

use crate::db::repository::RepositoryError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the availability engine and the booking commands.
///
/// Authorization is enforced by the surrounding layer and has no variant
/// here.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing/malformed input, past dates, closed workflows.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown business/service/booking, or a record outside the caller's
    /// visibility.
    #[error("not found: {0}")]
    NotFound(String),

    /// A write was rejected because the slot is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage collaborator failed; the request may be retried.
    #[error("storage unavailable: {0}")]
    Unavailable(RepositoryError),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { ref message, .. } => {
                ServiceError::NotFound(message.clone())
            }
            RepositoryError::Conflict { ref message, .. } => {
                ServiceError::Conflict(message.clone())
            }
            RepositoryError::ValidationError { ref message, .. } => {
                ServiceError::InvalidRequest(message.clone())
            }
            other => ServiceError::Unavailable(other),
        }
    }
}
