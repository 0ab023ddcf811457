use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Destination bucket an asset is routed to.
///
/// Derived from the asset's extension (or sniffed content type), never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalFolder {
    Audio,
    Images,
    Videos,
    Documents,
    Others,
}

impl LogicalFolder {
    pub const ALL: [LogicalFolder; 5] = [
        LogicalFolder::Audio,
        LogicalFolder::Images,
        LogicalFolder::Videos,
        LogicalFolder::Documents,
        LogicalFolder::Others,
    ];

    /// Look an extension up in the static table. Case-sensitive, no leading dot.
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "mp3" | "wav" | "ogg" | "oga" | "m4a" => LogicalFolder::Audio,
            "jpg" | "jpeg" | "png" | "gif" | "svg" | "ico" => LogicalFolder::Images,
            "mp4" | "webm" | "ogv" | "avi" | "mov" => LogicalFolder::Videos,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "odf" | "ppt" | "pptx" | "txt" | "rtf"
            | "csv" | "odt" | "html" | "htm" | "xml" | "json" | "yaml" | "js" | "yml" | "md"
            | "markdown" | "tsv" | "css" | "less" | "scss" | "sass" | "styl" | "stylus" => {
                LogicalFolder::Documents
            }
            _ => LogicalFolder::Others,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalFolder::Audio => "audio",
            LogicalFolder::Images => "images",
            LogicalFolder::Videos => "videos",
            LogicalFolder::Documents => "documents",
            LogicalFolder::Others => "others",
        }
    }
}

impl Display for LogicalFolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalFolder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" => Ok(LogicalFolder::Audio),
            "images" => Ok(LogicalFolder::Images),
            "videos" => Ok(LogicalFolder::Videos),
            "documents" => Ok(LogicalFolder::Documents),
            "others" => Ok(LogicalFolder::Others),
            _ => Err(anyhow::anyhow!("Invalid logical folder: {}", s)),
        }
    }
}
