//! Upload manager
//!
//! Entry point for callers: owns the backend handle, the tunable `UploadConfig` and the
//! classifier, and builds a fresh uploader from a snapshot of the config for every call.

use assetflow_core::{
    BackendSettings, CloudinaryCredentials, ConfigError, DestroyResult, Metadata, UploadConfig,
    UploadInput, UploadResult,
};
use assetflow_storage::{create_backend, AssetBackend, BackendError, CloudinaryBackend};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::classifier::{Classifier, ContentSniffer};
use crate::error::UploadError;
use crate::upload::{AssetUploader, BatchDispatcher, UploadOutcome};

pub struct AssetUploadManager {
    backend: Arc<dyn AssetBackend>,
    classifier: Classifier,
    config: UploadConfig,
}

impl AssetUploadManager {
    /// Manager talking to Cloudinary with default limits.
    ///
    /// Fails when any credential is empty or the HTTP client cannot be built.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let credentials = CloudinaryCredentials::new(cloud_name, api_key, api_secret);
        credentials.validate()?;

        let backend = CloudinaryBackend::new(credentials)
            .map_err(|e| ConfigError::InvalidCredentials(e.to_string()))?;

        Ok(Self::with_backend(Arc::new(backend)))
    }

    pub fn with_backend(backend: Arc<dyn AssetBackend>) -> Self {
        Self {
            backend,
            classifier: Classifier::default(),
            config: UploadConfig::default(),
        }
    }

    /// Manager for whichever backend `settings` selects.
    pub async fn from_settings(settings: &BackendSettings) -> Result<Self, BackendError> {
        settings
            .validate()
            .map_err(|e| BackendError::ConfigError(e.to_string()))?;

        let backend = create_backend(settings).await?;
        tracing::debug!(backend = %backend.backend_type(), "Upload manager initialized");

        Ok(Self::with_backend(backend))
    }

    pub fn with_config(mut self, config: UploadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut UploadConfig {
        &mut self.config
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.config.metadata
    }

    /// Replace the content sniffer used to classify stream inputs.
    pub fn set_sniffer(&mut self, sniffer: Arc<dyn ContentSniffer>) {
        self.classifier = Classifier::new(sniffer);
    }

    pub fn backend(&self) -> &Arc<dyn AssetBackend> {
        &self.backend
    }

    fn uploader(&self) -> AssetUploader {
        AssetUploader::new(
            self.backend.clone(),
            self.classifier.clone(),
            Arc::new(self.config.clone()),
        )
    }

    /// Upload one asset under the per-upload timeout.
    pub async fn upload_single_file(
        &self,
        input: UploadInput,
    ) -> Result<UploadResult, UploadError> {
        let timeout = self.config.max_upload_timeout;
        match tokio::time::timeout(timeout, self.uploader().upload_one(input)).await {
            Ok(result) => result,
            Err(_) => Err(UploadError::Timeout(timeout)),
        }
    }

    /// Upload a batch; one outcome per input, in completion order.
    pub async fn upload_multiple_files(&self, inputs: Vec<UploadInput>) -> Vec<UploadOutcome> {
        self.upload_multiple_files_with_cancel(inputs, CancellationToken::new())
            .await
    }

    pub async fn upload_multiple_files_with_cancel(
        &self,
        inputs: Vec<UploadInput>,
        cancel: CancellationToken,
    ) -> Vec<UploadOutcome> {
        BatchDispatcher::new(self.uploader())
            .dispatch(inputs, cancel)
            .await
    }

    /// Delivery URL for an image with `transformation` applied.
    pub fn transform_image(
        &self,
        public_id: &str,
        transformation: &str,
    ) -> Result<String, BackendError> {
        self.backend.delivery_url(public_id, transformation)
    }

    pub async fn destroy_asset(&self, public_id: &str) -> Result<DestroyResult, BackendError> {
        let result = self.backend.destroy(public_id).await?;
        tracing::info!(public_id = %public_id, result = %result.result, "Asset destroyed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetflow_core::constants::DEFAULT_MAX_ASSET_SIZE_BYTES;
    use std::time::Duration;

    #[test]
    fn test_new_rejects_empty_credentials() {
        assert!(AssetUploadManager::new("", "key", "secret").is_err());
        assert!(AssetUploadManager::new("demo", "", "secret").is_err());
        assert!(AssetUploadManager::new("demo", "key", "").is_err());
    }

    #[test]
    fn test_new_applies_defaults() {
        let manager = AssetUploadManager::new("demo", "key", "secret").unwrap();
        let config = manager.config();
        assert_eq!(config.max_asset_size_bytes, DEFAULT_MAX_ASSET_SIZE_BYTES);
        assert_eq!(config.max_upload_timeout, Duration::from_secs(60));
        assert_eq!(config.max_concurrent_uploads, 1);
        assert!(config.metadata.is_empty());
        assert!(config.is_supported("png"));
    }

    #[test]
    fn test_config_is_mutable_between_calls() {
        let mut manager = AssetUploadManager::new("demo", "key", "secret").unwrap();
        manager.config_mut().max_concurrent_uploads = 8;
        manager.metadata_mut().add("Project", "launch");

        assert_eq!(manager.config().max_concurrent_uploads, 8);
        assert!(manager.config().metadata.contains_key("project"));
    }

    #[test]
    fn test_transform_image_uses_cloudinary_delivery_url() {
        let manager = AssetUploadManager::new("demo", "key", "secret").unwrap();
        let url = manager
            .transform_image("images/logo.png", "w_100,h_100,c_fill")
            .unwrap();
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/w_100,h_100,c_fill/images/logo.png"
        );
    }

    #[tokio::test]
    async fn test_from_settings_local() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BackendSettings::local(
            dir.path().to_string_lossy().to_string(),
            "http://localhost:8080/assets",
        );
        let manager = AssetUploadManager::from_settings(&settings).await.unwrap();
        assert_eq!(
            manager.backend().backend_type(),
            assetflow_core::BackendKind::Local
        );
    }
}
