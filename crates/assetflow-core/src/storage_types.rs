use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Asset backend types
///
/// Defined in core because it's used by configuration as well as by the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Cloudinary,
    Local,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cloudinary" => Ok(BackendKind::Cloudinary),
            "local" => Ok(BackendKind::Local),
            _ => Err(anyhow::anyhow!("Invalid asset backend: {}", s)),
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BackendKind::Cloudinary => write!(f, "cloudinary"),
            BackendKind::Local => write!(f, "local"),
        }
    }
}
