use assetflow_core::constants::MAX_SNIFF_BYTES;
use assetflow_core::{BoxedReader, UploadConfig, UploadInput, UploadParams, UploadResult};
use assetflow_storage::{AssetBackend, UploadContent};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::error::UploadError;
use crate::validator::AssetValidator;

/// Uploads a single asset: validate, classify, hand to the backend.
///
/// Cloning is cheap; every clone shares the backend, the sniffer and the config snapshot.
#[derive(Clone)]
pub struct AssetUploader {
    backend: Arc<dyn AssetBackend>,
    classifier: Classifier,
    config: Arc<UploadConfig>,
}

impl AssetUploader {
    pub fn new(
        backend: Arc<dyn AssetBackend>,
        classifier: Classifier,
        config: Arc<UploadConfig>,
    ) -> Self {
        Self {
            backend,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Upload one asset.
    ///
    /// Validation failures return before any backend call. A response that carries a
    /// backend-level error is still `Ok`; check `UploadResult::error`.
    pub async fn upload_one(&self, input: UploadInput) -> Result<UploadResult, UploadError> {
        match input {
            UploadInput::Path(path) => self.upload_path(&path).await,
            UploadInput::Stream { name, reader } => {
                self.upload_stream(name.as_deref(), reader).await
            }
        }
    }

    async fn upload_path(&self, path: &Path) -> Result<UploadResult, UploadError> {
        let (extension, size) = AssetValidator::from_config(&self.config)
            .validate_path(path)
            .await?;

        let public_id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder = self.classifier.classify_extension(&extension);

        tracing::debug!(
            path = %path.display(),
            public_id = %public_id,
            folder = %folder,
            size = size,
            "Uploading file"
        );

        let params = UploadParams {
            public_id,
            folder,
            metadata: self.config.metadata.clone(),
        };

        let result = self
            .backend
            .upload(UploadContent::File(path.to_path_buf()), &params)
            .await?;

        Ok(result)
    }

    async fn upload_stream(
        &self,
        name: Option<&str>,
        mut reader: BoxedReader,
    ) -> Result<UploadResult, UploadError> {
        let mut header = Vec::with_capacity(MAX_SNIFF_BYTES);
        (&mut reader)
            .take(MAX_SNIFF_BYTES as u64)
            .read_to_end(&mut header)
            .await?;

        if header.is_empty() {
            return Err(UploadError::EmptyAsset);
        }

        let (sniffed, folder) = self.classifier.classify_header(&header);
        let public_id = Uuid::new_v4().to_string();

        tracing::debug!(
            stream = name.unwrap_or("<unnamed>"),
            public_id = %public_id,
            folder = %folder,
            sniffed = sniffed.as_deref().unwrap_or("unknown"),
            "Uploading stream"
        );

        let params = UploadParams {
            public_id,
            folder,
            metadata: self.config.metadata.clone(),
        };

        let content: BoxedReader = Box::pin(Cursor::new(header).chain(reader));
        let result = self
            .backend
            .upload(UploadContent::Stream(content), &params)
            .await?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetflow_core::{BackendKind, DestroyResult, LogicalFolder};
    use assetflow_storage::BackendResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what it was asked to upload and answers with a canned result.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<(UploadParams, Vec<u8>)>>,
    }

    #[async_trait]
    impl AssetBackend for RecordingBackend {
        async fn upload(
            &self,
            content: UploadContent,
            params: &UploadParams,
        ) -> BackendResult<UploadResult> {
            let bytes = match content {
                UploadContent::File(path) => tokio::fs::read(path).await?,
                UploadContent::Stream(mut reader) => {
                    let mut buf = Vec::new();
                    reader.read_to_end(&mut buf).await?;
                    buf
                }
            };
            self.calls.lock().unwrap().push((params.clone(), bytes));
            Ok(UploadResult {
                public_id: params.public_id.clone(),
                secure_url: format!("https://cdn.test/{}/{}", params.folder, params.public_id),
                error: None,
            })
        }

        async fn destroy(&self, _public_id: &str) -> BackendResult<DestroyResult> {
            Ok(DestroyResult {
                result: "ok".to_string(),
            })
        }

        fn delivery_url(&self, public_id: &str, _transformation: &str) -> BackendResult<String> {
            Ok(public_id.to_string())
        }

        fn backend_type(&self) -> BackendKind {
            BackendKind::Local
        }
    }

    fn uploader(backend: Arc<RecordingBackend>, config: UploadConfig) -> AssetUploader {
        AssetUploader::new(backend, Classifier::default(), Arc::new(config))
    }

    #[tokio::test]
    async fn test_path_upload_uses_file_name_and_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let backend = Arc::new(RecordingBackend::default());
        let mut config = UploadConfig::default();
        config.metadata.add("Owner", "team-a");

        let result = uploader(backend.clone(), config)
            .upload_one(UploadInput::from_path(&path))
            .await
            .unwrap();
        assert_eq!(result.public_id, "clip.mp4");

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.folder, LogicalFolder::Videos);
        assert!(calls[0].0.metadata.contains_key("owner"));
        assert_eq!(calls[0].1, b"not really a video");
    }

    #[tokio::test]
    async fn test_unsupported_path_never_reaches_backend() {
        let backend = Arc::new(RecordingBackend::default());
        let config = UploadConfig {
            supported_extensions: vec!["png".to_string()],
            ..UploadConfig::default()
        };

        let err = uploader(backend.clone(), config)
            .upload_one(UploadInput::from("c.unknownext"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stream_upload_keeps_sniffed_prefix() {
        // longer than the sniff window so the prefix and the rest both matter
        let mut data = b"%PDF-1.4\n".to_vec();
        data.extend((0..1000u32).map(|i| (i % 251) as u8));

        let backend = Arc::new(RecordingBackend::default());
        let result = uploader(backend.clone(), UploadConfig::default())
            .upload_one(UploadInput::from_bytes(data.clone()))
            .await
            .unwrap();

        assert!(Uuid::parse_str(&result.public_id).is_ok());
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].1, data);
        #[cfg(feature = "sniff")]
        assert_eq!(calls[0].0.folder, LogicalFolder::Documents);
    }

    #[tokio::test]
    async fn test_short_stream_is_uploaded_whole() {
        let backend = Arc::new(RecordingBackend::default());
        uploader(backend.clone(), UploadConfig::default())
            .upload_one(UploadInput::from_bytes(b"tiny".to_vec()))
            .await
            .unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].1, b"tiny");
        assert_eq!(calls[0].0.folder, LogicalFolder::Others);
    }

    #[tokio::test]
    async fn test_empty_stream_rejected() {
        let backend = Arc::new(RecordingBackend::default());
        let err = uploader(backend.clone(), UploadConfig::default())
            .upload_one(UploadInput::from_bytes(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::EmptyAsset));
        assert!(backend.calls.lock().unwrap().is_empty());
    }
}
