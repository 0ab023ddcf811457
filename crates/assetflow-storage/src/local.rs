use crate::keys::{qualified_public_id, validate_public_id};
use crate::traits::{AssetBackend, BackendError, BackendResult, UploadContent};
use assetflow_core::{BackendKind, DestroyResult, UploadParams, UploadResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const METADATA_SUFFIX: &str = ".meta.json";

/// Local filesystem backend implementation
#[derive(Clone, Debug)]
pub struct LocalBackend {
    base_path: PathBuf,
    base_url: String,
}

impl LocalBackend {
    /// Create a new LocalBackend instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset storage (e.g., "/var/lib/assetflow")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8080/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> BackendResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            BackendError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBackend {
            base_path,
            base_url,
        })
    }

    /// Convert a public id to a filesystem path.
    ///
    /// `validate_public_id` rejects `..`, absolute ids and backslashes, so the joined path
    /// always stays under `base_path`.
    fn key_to_path(&self, public_id: &str) -> BackendResult<PathBuf> {
        validate_public_id(public_id)?;
        Ok(self.base_path.join(public_id))
    }

    fn metadata_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(METADATA_SUFFIX);
        PathBuf::from(name)
    }

    fn generate_url(&self, public_id: &str) -> String {
        let encoded = public_id
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> BackendResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssetBackend for LocalBackend {
    async fn upload(
        &self,
        content: UploadContent,
        params: &UploadParams,
    ) -> BackendResult<UploadResult> {
        let public_id = qualified_public_id(params.folder, &params.public_id);
        let path = self.key_to_path(&public_id)?;

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let size = match content {
            UploadContent::File(source) => fs::copy(&source, &path).await.map_err(|e| {
                BackendError::UploadFailed(format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    path.display(),
                    e
                ))
            })?,
            UploadContent::Stream(mut reader) => {
                let mut file = fs::File::create(&path).await.map_err(|e| {
                    BackendError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let written = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
                    BackendError::UploadFailed(format!(
                        "Failed to write file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                file.sync_all().await.map_err(|e| {
                    BackendError::UploadFailed(format!(
                        "Failed to sync file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                written
            }
        };

        if !params.metadata.is_empty() {
            let sidecar = serde_json::to_vec_pretty(&params.metadata)
                .map_err(|e| BackendError::UploadFailed(e.to_string()))?;
            let mut file = fs::File::create(Self::metadata_path(&path)).await?;
            file.write_all(&sidecar).await?;
        }

        let secure_url = self.generate_url(&public_id);

        tracing::info!(
            path = %path.display(),
            public_id = %public_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(UploadResult {
            public_id,
            secure_url,
            error: None,
        })
    }

    async fn destroy(&self, public_id: &str) -> BackendResult<DestroyResult> {
        let path = self.key_to_path(public_id)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(DestroyResult {
                result: "not found".to_string(),
            });
        }

        fs::remove_file(&path).await.map_err(|e| {
            BackendError::DestroyFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        let sidecar = Self::metadata_path(&path);
        if fs::try_exists(&sidecar).await.unwrap_or(false) {
            fs::remove_file(&sidecar).await?;
        }

        tracing::info!(path = %path.display(), public_id = %public_id, "Local destroy successful");

        Ok(DestroyResult {
            result: "ok".to_string(),
        })
    }

    fn delivery_url(&self, public_id: &str, transformation: &str) -> BackendResult<String> {
        self.key_to_path(public_id)?;
        let url = self.generate_url(public_id);
        let transformation = transformation.trim();
        if transformation.is_empty() {
            Ok(url)
        } else {
            // no server-side transforms; the descriptor is passed along for the serving layer
            Ok(format!("{}?tr={}", url, urlencoding::encode(transformation)))
        }
    }

    fn backend_type(&self) -> BackendKind {
        BackendKind::Local
    }
}
