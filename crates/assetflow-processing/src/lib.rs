//! Assetflow Processing Library
//!
//! This crate provides the upload orchestration: classifying assets into logical folders,
//! validating them, uploading one asset, and dispatching whole batches under a concurrency
//! ceiling with per-upload timeouts.

pub mod classifier;
pub mod error;
pub mod manager;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use classifier::{Classifier, ContentSniffer, NoopSniffer};
#[cfg(feature = "sniff")]
pub use classifier::InferSniffer;
pub use error::{ErrorKind, UploadError};
pub use manager::AssetUploadManager;
pub use upload::{AssetUploader, BatchDispatcher, BatchSummary, UploadOutcome};
pub use validator::AssetValidator;
