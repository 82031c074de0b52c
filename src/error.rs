use thiserror::Error;

use crate::models::MediaId;

/// Failures of the server-side like counter.
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("media {0} not found")]
    NotFound(MediaId),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Why a like request failed, as seen by the client.
///
/// Every variant is handled the same way by the controller (rollback), the
/// split only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LikeError {
    #[error("request rejected: {0}")]
    Validation(String),
    #[error("media {0} not found")]
    NotFound(MediaId),
    #[error("transient failure: {0}")]
    Transient(String),
}
