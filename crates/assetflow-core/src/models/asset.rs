use serde::{Deserialize, Serialize};

use super::folder::LogicalFolder;
use super::metadata::Metadata;

/// Destination hints handed to the backend with every upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadParams {
    pub public_id: String,
    pub folder: LogicalFolder,
    pub metadata: Metadata,
}

/// What the backend reports for one upload.
///
/// A response can arrive successfully and still carry a backend-level `error`; callers must
/// check it in addition to any transport error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub public_id: String,
    #[serde(default)]
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// What the backend reports for a destroy call (`ok`, `not found`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyResult {
    pub result: String,
}

impl DestroyResult {
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}
