#[cfg(feature = "backend-cloudinary")]
use crate::CloudinaryBackend;
#[cfg(feature = "backend-local")]
use crate::LocalBackend;
use crate::{AssetBackend, BackendError, BackendKind, BackendResult};
use assetflow_core::BackendSettings;
use std::sync::Arc;

/// Create an asset backend based on settings
pub async fn create_backend(settings: &BackendSettings) -> BackendResult<Arc<dyn AssetBackend>> {
    match settings.backend {
        #[cfg(feature = "backend-cloudinary")]
        BackendKind::Cloudinary => {
            let credentials = settings.cloudinary.clone().ok_or_else(|| {
                BackendError::ConfigError("Cloudinary credentials not configured".to_string())
            })?;

            let backend = CloudinaryBackend::new(credentials)?;
            Ok(Arc::new(backend))
        }

        #[cfg(not(feature = "backend-cloudinary"))]
        BackendKind::Cloudinary => Err(BackendError::ConfigError(
            "Cloudinary backend not available (backend-cloudinary feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "backend-local")]
        BackendKind::Local => {
            let base_path = settings.local_storage_path.clone().ok_or_else(|| {
                BackendError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = settings.local_storage_base_url.clone().ok_or_else(|| {
                BackendError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;

            let backend = LocalBackend::new(base_path, base_url).await?;
            Ok(Arc::new(backend))
        }

        #[cfg(not(feature = "backend-local"))]
        BackendKind::Local => Err(BackendError::ConfigError(
            "Local backend not available (backend-local feature not enabled)".to_string(),
        )),
    }
}
