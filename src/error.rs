//! Error types for the board engine.

use crate::types::{BoardId, ColumnId, GroupId, ItemId, TeamId};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations.
///
/// The `*NotFound` variants cover both an absent entity and an actor who
/// lacks read access to it — callers cannot distinguish the two, so an
/// unauthorized actor learns nothing about what exists.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Store not initialized at the given path.
    #[error("store not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Team not found (or actor is not a member).
    #[error("team not found: {id}")]
    TeamNotFound { id: TeamId },

    /// Board not found (or actor lacks access).
    #[error("board not found: {id}")]
    BoardNotFound { id: BoardId },

    /// Column not found (or actor lacks access).
    #[error("column not found: {id}")]
    ColumnNotFound { id: ColumnId },

    /// Group not found (or actor lacks access).
    #[error("group not found: {id}")]
    GroupNotFound { id: GroupId },

    /// Item not found (or actor lacks access).
    #[error("item not found: {id}")]
    ItemNotFound { id: ItemId },

    /// Malformed request: bad move target, out-of-range index, duplicate
    /// batch ids, cross-board or cross-column references.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Actor resolved the entity but lacks the required role.
    #[error("forbidden: {message}")]
    Forbidden { message: String },

    /// Lock is held by another operation.
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// Lock wait exceeded the allowed time.
    #[error("lock timeout after {elapsed_ms}ms")]
    LockTimeout { elapsed_ms: u64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Check if this error is worth retrying at the transport layer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoardError::ItemNotFound {
            id: ItemId::new(12),
        };
        assert_eq!(err.to_string(), "item not found: 12");
    }

    #[test]
    fn test_bad_request_helper() {
        let err = BoardError::bad_request("newColumnId 7 not on board 3");
        assert!(err.to_string().contains("newColumnId 7"));
    }

    #[test]
    fn test_retryable() {
        assert!(BoardError::LockBusy.is_retryable());
        assert!(!BoardError::bad_request("x").is_retryable());
    }
}
