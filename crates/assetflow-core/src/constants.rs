//! Shared constants: default limits and the static extension tables.

use std::time::Duration;

/// Number of header bytes handed to the content sniffer for stream inputs.
pub const MAX_SNIFF_BYTES: usize = 261;

/// Default maximum asset size (4 MiB).
pub const DEFAULT_MAX_ASSET_SIZE_BYTES: u64 = 4 * 1024 * 1024;

/// Default per-upload timeout.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of uploads allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 1;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "oga", "m4a"];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "ico"];

// `ogg` is listed here for the default allow-list but routes to the audio folder.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "avi", "mov"];

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "odf", "ppt", "pptx", "txt", "rtf", "csv", "odt", "html",
    "htm", "xml", "json", "yaml", "js", "yml", "md", "markdown", "tsv", "css", "less", "scss",
    "sass", "styl", "stylus",
];

/// Every extension known to the classifier, deduplicated, in table order.
pub fn known_extensions() -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for ext in IMAGE_EXTENSIONS
        .iter()
        .chain(AUDIO_EXTENSIONS)
        .chain(VIDEO_EXTENSIONS)
        .chain(DOCUMENT_EXTENSIONS)
    {
        if !extensions.iter().any(|e| e == ext) {
            extensions.push((*ext).to_string());
        }
    }
    extensions
}
