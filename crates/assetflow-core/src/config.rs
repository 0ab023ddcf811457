//! Configuration module
//!
//! `UploadConfig` holds the tunables the upload manager reads (allow-list, size limit, timeout,
//! concurrency and metadata). `BackendSettings` describes which asset backend to build and
//! with what credentials. Both can be loaded from the environment (and a `.env` file).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    known_extensions, DEFAULT_MAX_ASSET_SIZE_BYTES, DEFAULT_MAX_CONCURRENT_UPLOADS,
    DEFAULT_UPLOAD_TIMEOUT,
};
use crate::error::ConfigError;
use crate::models::Metadata;
use crate::storage_types::BackendKind;

/// Upload tunables, owned by the manager and snapshotted per batch.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Extensions accepted for path inputs. Empty means every extension is accepted.
    pub supported_extensions: Vec<String>,
    pub max_asset_size_bytes: u64,
    pub max_upload_timeout: Duration,
    /// Values below 1 are treated as 1.
    pub max_concurrent_uploads: usize,
    pub metadata: Metadata,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            supported_extensions: known_extensions(),
            max_asset_size_bytes: DEFAULT_MAX_ASSET_SIZE_BYTES,
            max_upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
            metadata: Metadata::new(),
        }
    }
}

impl UploadConfig {
    /// Concurrency ceiling actually used by the dispatcher.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_uploads.max(1)
    }

    /// True when the allow-list is empty or contains `extension` (case-sensitive).
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_extensions.is_empty()
            || self.supported_extensions.iter().any(|e| e == extension)
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Overlay the defaults with whatever `lookup` provides. Unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(n) = parse_var::<usize>(&lookup, "ASSETFLOW_MAX_CONCURRENT_UPLOADS") {
            config.max_concurrent_uploads = n;
        }

        if let Some(mb) = parse_var::<u64>(&lookup, "ASSETFLOW_MAX_ASSET_SIZE_MB") {
            config.max_asset_size_bytes = mb.saturating_mul(1024 * 1024);
        }

        if let Some(secs) = parse_var::<u64>(&lookup, "ASSETFLOW_UPLOAD_TIMEOUT_SECS") {
            config.max_upload_timeout = Duration::from_secs(secs);
        }

        if let Some(list) = lookup("ASSETFLOW_SUPPORTED_EXTENSIONS") {
            config.supported_extensions = parse_extension_list(&list);
        }

        config
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name = name, value = %raw, "Ignoring unparseable setting, keeping default");
            None
        }
    }
}

/// Parse a comma separated extension list. `*` means allow all (empty list).
pub fn parse_extension_list(list: &str) -> Vec<String> {
    if list.trim() == "*" {
        return Vec::new();
    }
    list.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Cloudinary account credentials.
#[derive(Clone)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl CloudinaryCredentials {
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Parse `cloudinary://{api_key}:{api_secret}@{cloud_name}`.
    pub fn from_url(url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            name: "CLOUDINARY_URL",
            reason: reason.to_string(),
        };

        let rest = url
            .trim()
            .strip_prefix("cloudinary://")
            .ok_or_else(|| invalid("must start with cloudinary://"))?;
        let (auth, cloud_name) = rest
            .split_once('@')
            .ok_or_else(|| invalid("missing '@{cloud_name}'"))?;
        let (api_key, api_secret) = auth
            .split_once(':')
            .ok_or_else(|| invalid("missing '{api_key}:{api_secret}'"))?;

        let credentials = Self::new(cloud_name, api_key, api_secret);
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cloud_name.trim().is_empty() {
            return Err(ConfigError::InvalidCredentials(
                "cloud name must not be empty".to_string(),
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidCredentials(
                "API key must not be empty".to_string(),
            ));
        }
        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::InvalidCredentials(
                "API secret must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which backend to build, and the settings it needs.
#[derive(Clone, Debug)]
pub struct BackendSettings {
    pub backend: BackendKind,
    pub cloudinary: Option<CloudinaryCredentials>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl BackendSettings {
    pub fn cloudinary(credentials: CloudinaryCredentials) -> Self {
        Self {
            backend: BackendKind::Cloudinary,
            cloudinary: Some(credentials),
            local_storage_path: None,
            local_storage_base_url: None,
        }
    }

    pub fn local(path: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Local,
            cloudinary: None,
            local_storage_path: Some(path.into()),
            local_storage_base_url: Some(base_url.into()),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("ASSETFLOW_BACKEND") {
            Some(value) => value
                .parse::<BackendKind>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: "ASSETFLOW_BACKEND",
                    reason: e.to_string(),
                })?,
            None => BackendKind::Cloudinary,
        };

        let cloudinary = match lookup("CLOUDINARY_URL") {
            Some(url) => Some(CloudinaryCredentials::from_url(&url)?),
            None => match (
                lookup("CLOUDINARY_CLOUD_NAME"),
                lookup("CLOUDINARY_API_KEY"),
                lookup("CLOUDINARY_API_SECRET"),
            ) {
                (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(
                    CloudinaryCredentials::new(cloud_name, api_key, api_secret),
                ),
                _ => None,
            },
        };

        let settings = Self {
            backend,
            cloudinary,
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.backend {
            BackendKind::Cloudinary => match &self.cloudinary {
                Some(credentials) => credentials.validate(),
                None => Err(ConfigError::Missing(
                    "CLOUDINARY_URL or CLOUDINARY_CLOUD_NAME/CLOUDINARY_API_KEY/CLOUDINARY_API_SECRET",
                )),
            },
            BackendKind::Local => {
                if self.local_storage_path.is_none() {
                    return Err(ConfigError::Missing("LOCAL_STORAGE_PATH"));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(ConfigError::Missing("LOCAL_STORAGE_BASE_URL"));
                }
                Ok(())
            }
        }
    }
}
