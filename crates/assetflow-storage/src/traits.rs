//! Asset backend abstraction trait
//!
//! This module defines the AssetBackend trait that all backends must implement.

use assetflow_core::{BackendKind, BoxedReader, DestroyResult, UploadParams, UploadResult};
use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::PathBuf;
use thiserror::Error;

/// Backend operation errors
///
/// These are transport-level failures: the request could not be made or its response could
/// not be understood. An error the backend reports inside a well-formed response is carried
/// in `UploadResult::error` instead.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Destroy failed: {0}")]
    DestroyFailed(String),

    #[error("Invalid public id: {0}")]
    InvalidKey(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Content of a single upload call.
pub enum UploadContent {
    /// A local file the backend reads itself.
    File(PathBuf),
    /// A byte stream, consumed until EOF.
    Stream(BoxedReader),
}

impl Debug for UploadContent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadContent::File(path) => f.debug_tuple("File").field(path).finish(),
            UploadContent::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Asset backend abstraction trait
///
/// The upload manager only ever talks to storage through this trait, so any backend (or a
/// test double) can sit behind it. Implementations must honour cancellation: dropping the
/// future of an in-flight call abandons the request.
#[async_trait]
pub trait AssetBackend: Send + Sync {
    /// Upload one asset. Exactly one remote call; no retries.
    async fn upload(
        &self,
        content: UploadContent,
        params: &UploadParams,
    ) -> BackendResult<UploadResult>;

    /// Delete an asset by its public id.
    async fn destroy(&self, public_id: &str) -> BackendResult<DestroyResult>;

    /// Build a delivery URL applying `transformation` (may be empty) to an image.
    fn delivery_url(&self, public_id: &str, transformation: &str) -> BackendResult<String>;

    /// Get the backend type
    fn backend_type(&self) -> BackendKind;
}
