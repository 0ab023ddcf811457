//! Per-asset upload errors
//!
//! Every error here is captured in the outcome of the asset it belongs to and never aborts
//! sibling uploads. `kind()` groups variants into the categories callers usually branch on,
//! and `log_level()` picks how loudly the dispatcher reports them.

use assetflow_storage::BackendError;
use std::path::PathBuf;
use std::time::Duration;

/// Broad category of an upload error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input was rejected before any backend call
    Validation,
    /// Reading the file metadata or stream header failed
    Io,
    /// The backend call failed
    Transport,
    /// The upload ran past its time budget
    Timeout,
    /// The batch was cancelled before the upload finished
    Cancelled,
    /// The upload task itself failed (panicked)
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported asset type: '{extension}'")]
    UnsupportedType { extension: String },

    #[error("Max asset size exceeded: {size} bytes (max: {max} bytes)")]
    AssetTooLarge { size: u64, max: u64 },

    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Empty asset")]
    EmptyAsset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Upload timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Upload task failed: {0}")]
    TaskFailed(String),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::UnsupportedType { .. }
            | UploadError::AssetTooLarge { .. }
            | UploadError::NotAFile(_)
            | UploadError::EmptyAsset => ErrorKind::Validation,
            UploadError::Io(_) => ErrorKind::Io,
            UploadError::Backend(_) => ErrorKind::Transport,
            UploadError::Timeout(_) => ErrorKind::Timeout,
            UploadError::Cancelled => ErrorKind::Cancelled,
            UploadError::TaskFailed(_) => ErrorKind::Internal,
        }
    }

    /// Validation failures are expected traffic; task failures are bugs.
    pub fn log_level(&self) -> tracing::Level {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::Cancelled => tracing::Level::DEBUG,
            ErrorKind::Io | ErrorKind::Transport | ErrorKind::Timeout => tracing::Level::WARN,
            ErrorKind::Internal => tracing::Level::ERROR,
        }
    }

    /// Whether trying the same asset again could succeed. Nothing retries automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Transport | ErrorKind::Timeout | ErrorKind::Cancelled
        )
    }
}
