use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error identifiers carried in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unavailable,
    ClusterOutOfRange,
    InvalidRequest,
    Internal,
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The cluster slot is empty or its current server is not active.
    #[error("server unavailable for cluster {cluster_id}")]
    Unavailable { cluster_id: i32 },

    #[error("cluster {cluster_id} out of range, expected 1..={cluster_count}")]
    ClusterOutOfRange { cluster_id: i32, cluster_count: usize },

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// An error response received from a remote coordinator.
    #[error("{code:?}: {message}")]
    Remote { code: ErrorCode, message: String },
}

impl CoordinatorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoordinatorError::Unavailable { .. } => ErrorCode::Unavailable,
            CoordinatorError::ClusterOutOfRange { .. } => ErrorCode::ClusterOutOfRange,
            CoordinatorError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            CoordinatorError::Remote { code, .. } => *code,
        }
    }
}
