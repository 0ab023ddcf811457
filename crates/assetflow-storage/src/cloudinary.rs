//! Cloudinary asset backend
//!
//! Talks to the Cloudinary upload API over HTTPS with signed requests. File and stream content
//! is streamed into the multipart body rather than buffered in memory.

use crate::keys::validate_public_id;
use crate::traits::{AssetBackend, BackendError, BackendResult, UploadContent};
use assetflow_core::{
    BackendKind, CloudinaryCredentials, DestroyResult, Metadata, UploadParams, UploadResult,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio_util::io::ReaderStream;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    public_id: Option<String>,
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

/// Cloudinary backend implementation
#[derive(Clone)]
pub struct CloudinaryBackend {
    http_client: reqwest::Client,
    credentials: CloudinaryCredentials,
    api_base: String,
    delivery_base: String,
}

impl Debug for CloudinaryBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryBackend")
            .field("cloud_name", &self.credentials.cloud_name)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudinaryBackend {
    /// Create a new CloudinaryBackend. Fails when any credential is empty.
    pub fn new(credentials: CloudinaryCredentials) -> BackendResult<Self> {
        credentials
            .validate()
            .map_err(|e| BackendError::ConfigError(e.to_string()))?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            BackendError::ConfigError(format!("Failed to create HTTP client for Cloudinary: {}", e))
        })?;

        Ok(Self {
            http_client,
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        })
    }

    /// Point the API calls somewhere else (proxies, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_delivery_base(mut self, delivery_base: impl Into<String>) -> Self {
        self.delivery_base = delivery_base.into();
        self
    }

    pub fn cloud_name(&self) -> &str {
        &self.credentials.cloud_name
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.credentials.cloud_name,
            resource_type,
            action
        )
    }

    /// Add `timestamp`, `api_key` and the signature to a set of request parameters.
    fn signed_params(&self, mut params: BTreeMap<&'static str, String>) -> Vec<(&'static str, String)> {
        params.insert("timestamp", unix_timestamp().to_string());
        let signature = sign_params(&params, &self.credentials.api_secret);

        let mut fields: Vec<(&'static str, String)> = params.into_iter().collect();
        fields.push(("api_key", self.credentials.api_key.clone()));
        fields.push(("signature", signature));
        fields.push(("signature_algorithm", "sha256".to_string()));
        fields
    }
}

/// SHA-256 request signature: sorted `key=value` pairs joined with `&`, then the secret.
/// Empty values are left out.
pub(crate) fn sign_params(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Encode metadata as `key=value|key=value`, escaping `=` and `|` in keys and values.
pub(crate) fn encode_metadata(metadata: &Metadata) -> String {
    metadata
        .iter()
        .map(|(key, value)| {
            let raw = match value {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}={}", escape_metadata(key), escape_metadata(&raw))
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn escape_metadata(raw: &str) -> String {
    raw.replace('=', "\\=").replace('|', "\\|")
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl AssetBackend for CloudinaryBackend {
    #[tracing::instrument(skip(self, content, params), fields(public_id = %params.public_id, folder = %params.folder))]
    async fn upload(
        &self,
        content: UploadContent,
        params: &UploadParams,
    ) -> BackendResult<UploadResult> {
        let start = Instant::now();

        let mut request_params = BTreeMap::new();
        request_params.insert("public_id", params.public_id.clone());
        request_params.insert("folder", params.folder.to_string());
        if !params.metadata.is_empty() {
            request_params.insert("metadata", encode_metadata(&params.metadata));
        }

        let file_part = match content {
            UploadContent::File(path) => {
                let file = tokio::fs::File::open(&path).await?;
                let length = file.metadata().await?.len();
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| params.public_id.clone());
                Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
                    .file_name(file_name)
            }
            UploadContent::Stream(reader) => {
                Part::stream(Body::wrap_stream(ReaderStream::new(reader)))
                    .file_name(params.public_id.clone())
            }
        };

        let mut form = Form::new().part("file", file_part);
        for (key, value) in self.signed_params(request_params) {
            form = form.text(key, value);
        }

        let response = self
            .http_client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let parsed: UploadResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                BackendError::InvalidResponse(format!("Failed to parse upload response: {}", e))
            } else {
                BackendError::UploadFailed(format!("HTTP {}: {}", status, truncate_body(&body)))
            }
        })?;

        if let Some(error) = parsed.error {
            tracing::warn!(
                status = status.as_u16(),
                error = %error.message,
                "Cloudinary reported an upload error"
            );
            return Ok(UploadResult {
                public_id: parsed.public_id.unwrap_or_default(),
                secure_url: parsed.secure_url.unwrap_or_default(),
                error: Some(error.message),
            });
        }

        let result = UploadResult {
            public_id: parsed.public_id.ok_or_else(|| {
                BackendError::InvalidResponse("upload response has no public_id".to_string())
            })?,
            secure_url: parsed.secure_url.unwrap_or_default(),
            error: None,
        };

        tracing::info!(
            public_id = %result.public_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    async fn destroy(&self, public_id: &str) -> BackendResult<DestroyResult> {
        validate_public_id(public_id)?;

        let mut request_params = BTreeMap::new();
        request_params.insert("public_id", public_id.to_string());

        let response = self
            .http_client
            .post(self.endpoint("image", "destroy"))
            .form(&self.signed_params(request_params))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        let parsed: DestroyResponse = serde_json::from_str(&body).map_err(|_| {
            BackendError::DestroyFailed(format!("HTTP {}: {}", status, truncate_body(&body)))
        })?;

        if let Some(error) = parsed.error {
            return Err(BackendError::DestroyFailed(error.message));
        }

        let result = parsed.result.ok_or_else(|| {
            BackendError::InvalidResponse("destroy response has no result".to_string())
        })?;

        tracing::info!(public_id = %public_id, result = %result, "Cloudinary destroy finished");

        Ok(DestroyResult { result })
    }

    fn delivery_url(&self, public_id: &str, transformation: &str) -> BackendResult<String> {
        validate_public_id(public_id)?;

        let encoded_id = public_id
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let transformation = transformation.trim().trim_matches('/');
        let transformation_segment = if transformation.is_empty() {
            String::new()
        } else {
            format!("{}/", transformation)
        };

        Ok(format!(
            "{}/{}/image/upload/{}{}",
            self.delivery_base.trim_end_matches('/'),
            self.credentials.cloud_name,
            transformation_segment,
            encoded_id
        ))
    }

    fn backend_type(&self) -> BackendKind {
        BackendKind::Cloudinary
    }
}
