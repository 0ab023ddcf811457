//! Assetflow Core Library
//!
//! This crate provides the domain models, static extension tables, configuration and
//! configuration errors shared by the storage, processing and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BackendSettings, CloudinaryCredentials, UploadConfig};
pub use error::ConfigError;
pub use models::{
    BoxedReader, DestroyResult, InputSource, LogicalFolder, Metadata, UploadInput, UploadParams,
    UploadResult,
};
pub use storage_types::BackendKind;
