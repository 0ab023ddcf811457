use serde::Serialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncRead;

/// Owned, sendable byte stream.
pub type BoxedReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

/// One asset to upload: either a filesystem path or a readable byte stream.
pub enum UploadInput {
    Path(PathBuf),
    Stream {
        /// Optional display label, used in logs and outcomes only.
        name: Option<String>,
        reader: BoxedReader,
    },
}

impl UploadInput {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        UploadInput::Path(path.into())
    }

    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        UploadInput::Stream {
            name: None,
            reader: Box::pin(reader),
        }
    }

    pub fn from_named_reader(
        name: impl Into<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        UploadInput::Stream {
            name: Some(name.into()),
            reader: Box::pin(reader),
        }
    }

    /// In-memory content, uploaded through the stream path.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::from_reader(std::io::Cursor::new(data.into()))
    }

    /// Cloneable description of this input, kept in the outcome after the input is consumed.
    pub fn source(&self) -> InputSource {
        match self {
            UploadInput::Path(path) => InputSource::Path(path.clone()),
            UploadInput::Stream { name, .. } => InputSource::Stream { name: name.clone() },
        }
    }
}

impl Debug for UploadInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadInput::Path(path) => f.debug_tuple("Path").field(path).finish(),
            UploadInput::Stream { name, .. } => {
                f.debug_struct("Stream").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

impl From<PathBuf> for UploadInput {
    fn from(path: PathBuf) -> Self {
        UploadInput::Path(path)
    }
}

impl From<&Path> for UploadInput {
    fn from(path: &Path) -> Self {
        UploadInput::Path(path.to_path_buf())
    }
}

impl From<&str> for UploadInput {
    fn from(path: &str) -> Self {
        UploadInput::Path(PathBuf::from(path))
    }
}

/// Reference to the input an outcome belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputSource {
    Path(PathBuf),
    Stream { name: Option<String> },
}

impl InputSource {
    /// Short human-readable label for logs and tables.
    pub fn label(&self) -> String {
        match self {
            InputSource::Path(path) => path.display().to_string(),
            InputSource::Stream { name: Some(name) } => format!("<stream:{}>", name),
            InputSource::Stream { name: None } => "<stream>".to_string(),
        }
    }
}
