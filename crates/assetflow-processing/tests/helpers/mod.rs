//! Test helpers: an instrumented in-memory backend and file fixtures.
//!
//! Run from workspace root: `cargo test -p assetflow-processing`.

#![allow(dead_code)]

pub mod backend;
pub mod fixtures;

use assetflow_core::UploadConfig;
use assetflow_processing::AssetUploadManager;
use std::sync::Arc;
use std::time::Duration;

pub use backend::{Behavior, MockBackend, RecordedUpload};

/// Manager over a fresh mock backend with the given concurrency and a short timeout.
pub fn manager_with(backend: Arc<MockBackend>, concurrency: usize) -> AssetUploadManager {
    AssetUploadManager::with_backend(backend).with_config(UploadConfig {
        max_concurrent_uploads: concurrency,
        max_upload_timeout: Duration::from_secs(5),
        ..UploadConfig::default()
    })
}
