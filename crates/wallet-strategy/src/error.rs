//! Error types for wallet-strategy.
//!
//! All errors are strongly typed and surface unmodified to the caller.
//! Token values are never included in error messages.

/// Strategy error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl StrategyError {
    /// Short stable label for the error kind, used by the CLI and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyError::InvalidArgument(_) => "invalid_argument",
            StrategyError::AlreadyExists(_) => "already_exists",
            StrategyError::NotFound(_) => "not_found",
            StrategyError::StorageFailure(_) => "storage_failure",
            StrategyError::Serialization(_) => "serialization",
            StrategyError::PermissionDenied(_) => "permission_denied",
        }
    }
}

impl From<rusqlite::Error> for StrategyError {
    fn from(err: rusqlite::Error) -> Self {
        StrategyError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for StrategyError {
    fn from(err: serde_json::Error) -> Self {
        StrategyError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StrategyError {
    fn from(err: std::io::Error) -> Self {
        StrategyError::StorageFailure(format!("IO error: {err}"))
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, StrategyError>;
