//! Shared public id generation for asset backends.
//!
//! Format: `{folder}/{public_id}`.

use crate::traits::{BackendError, BackendResult};
use assetflow_core::LogicalFolder;

/// Folder-qualified public id. All backends must use this format for consistency.
pub fn qualified_public_id(folder: LogicalFolder, public_id: &str) -> String {
    format!("{}/{}", folder, public_id)
}

/// Reject ids that are empty or could escape the backend's namespace.
pub fn validate_public_id(public_id: &str) -> BackendResult<()> {
    if public_id.trim().is_empty() {
        return Err(BackendError::InvalidKey("public id is empty".to_string()));
    }
    if public_id.contains("..") || public_id.starts_with('/') || public_id.contains('\\') {
        return Err(BackendError::InvalidKey(format!(
            "public id contains invalid characters: {}",
            public_id
        )));
    }
    Ok(())
}
