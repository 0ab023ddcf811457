use assetflow_core::UploadConfig;
use std::path::Path;

use crate::classifier::extension_of;
use crate::error::UploadError;

/// Asset validator for path inputs
///
/// Checks the allow-list and the size limit before anything is sent to the backend.
/// Stream inputs are not validated here: their type is only known after sniffing.
#[derive(Debug, Clone, Copy)]
pub struct AssetValidator<'a> {
    max_asset_size_bytes: u64,
    supported_extensions: &'a [String],
}

impl<'a> AssetValidator<'a> {
    pub fn new(max_asset_size_bytes: u64, supported_extensions: &'a [String]) -> Self {
        Self {
            max_asset_size_bytes,
            supported_extensions,
        }
    }

    pub fn from_config(config: &'a UploadConfig) -> Self {
        Self::new(config.max_asset_size_bytes, &config.supported_extensions)
    }

    /// True when the allow-list is empty or lists `extension` exactly.
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions.is_empty()
            || self.supported_extensions.iter().any(|e| e == extension)
    }

    /// Validate file extension
    pub fn validate_extension(&self, extension: &str) -> Result<(), UploadError> {
        if !self.is_supported(extension) {
            return Err(UploadError::UnsupportedType {
                extension: extension.to_string(),
            });
        }
        Ok(())
    }

    /// Validate asset size
    pub fn validate_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_asset_size_bytes {
            return Err(UploadError::AssetTooLarge {
                size,
                max: self.max_asset_size_bytes,
            });
        }
        Ok(())
    }

    /// Validate a path input: extension first, then file type and size.
    ///
    /// Returns the extension and the file size.
    pub async fn validate_path(&self, path: &Path) -> Result<(String, u64), UploadError> {
        let extension = extension_of(path);
        self.validate_extension(&extension)?;

        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(UploadError::NotAFile(path.to_path_buf()));
        }

        self.validate_size(metadata.len())?;

        Ok((extension, metadata.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec!["png".to_string(), "pdf".to_string()]
    }

    #[test]
    fn test_validate_extension_ok() {
        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(validator.validate_extension("png").is_ok());
        assert!(validator.validate_extension("pdf").is_ok());
    }

    #[test]
    fn test_validate_extension_invalid() {
        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(matches!(
            validator.validate_extension("unknownext"),
            Err(UploadError::UnsupportedType { extension }) if extension == "unknownext"
        ));
        // case sensitive
        assert!(validator.validate_extension("PNG").is_err());
    }

    #[test]
    fn test_empty_allow_list_accepts_everything() {
        let validator = AssetValidator::new(1024, &[]);
        assert!(validator.is_supported("anything"));
        assert!(validator.is_supported(""));
    }

    #[test]
    fn test_validate_size() {
        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(validator.validate_size(1024).is_ok());
        assert!(matches!(
            validator.validate_size(1025),
            Err(UploadError::AssetTooLarge {
                size: 1025,
                max: 1024
            })
        ));
    }

    #[tokio::test]
    async fn test_validate_path_rejects_oversized_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(matches!(
            validator.validate_path(&path).await,
            Err(UploadError::AssetTooLarge { size: 2048, .. })
        ));
    }

    #[tokio::test]
    async fn test_validate_path_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        let (extension, size) = validator.validate_path(&path).await.unwrap();
        assert_eq!(extension, "pdf");
        assert_eq!(size, 8);
    }

    #[tokio::test]
    async fn test_validate_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folder.png");
        std::fs::create_dir(&path).unwrap();

        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(matches!(
            validator.validate_path(&path).await,
            Err(UploadError::NotAFile(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_path_missing_file_is_io_error() {
        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        assert!(matches!(
            validator.validate_path(Path::new("/no/such/file.png")).await,
            Err(UploadError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_extension_checked_before_stat() {
        let extensions = allow_list();
        let validator = AssetValidator::new(1024, &extensions);
        // the file does not exist, yet the error is about the type
        assert!(matches!(
            validator.validate_path(Path::new("/no/such/file.exe")).await,
            Err(UploadError::UnsupportedType { .. })
        ));
    }
}
