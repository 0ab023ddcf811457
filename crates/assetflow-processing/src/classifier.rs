//! Asset classification
//!
//! Routes an asset to its logical folder, either from the extension of its file name or, for
//! streams, from an extension sniffed out of the first bytes of content.

use assetflow_core::LogicalFolder;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;
use std::sync::Arc;

/// Derives a file extension from a content header (magic numbers).
pub trait ContentSniffer: Send + Sync {
    /// Extension (no leading dot) for content starting with `header`, if recognised.
    fn sniff(&self, header: &[u8]) -> Option<String>;
}

/// Magic-number sniffer backed by the `infer` crate.
#[cfg(feature = "sniff")]
#[derive(Debug, Clone, Copy, Default)]
pub struct InferSniffer;

#[cfg(feature = "sniff")]
impl ContentSniffer for InferSniffer {
    fn sniff(&self, header: &[u8]) -> Option<String> {
        infer::get(header).map(|kind| kind.extension().to_string())
    }
}

/// Sniffer that never recognises anything; every stream lands in `others`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSniffer;

impl ContentSniffer for NoopSniffer {
    fn sniff(&self, _header: &[u8]) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct Classifier {
    sniffer: Arc<dyn ContentSniffer>,
}

impl Debug for Classifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        #[cfg(feature = "sniff")]
        let sniffer: Arc<dyn ContentSniffer> = Arc::new(InferSniffer);
        #[cfg(not(feature = "sniff"))]
        let sniffer: Arc<dyn ContentSniffer> = Arc::new(NoopSniffer);

        Self { sniffer }
    }
}

impl Classifier {
    pub fn new(sniffer: Arc<dyn ContentSniffer>) -> Self {
        Self { sniffer }
    }

    /// Folder for an extension, as given (case-sensitive, no leading dot).
    pub fn classify_extension(&self, extension: &str) -> LogicalFolder {
        LogicalFolder::from_extension(extension)
    }

    /// Sniff `header` and route it. Unrecognised content goes to `others`.
    pub fn classify_header(&self, header: &[u8]) -> (Option<String>, LogicalFolder) {
        match self.sniffer.sniff(header) {
            Some(extension) => {
                let folder = self.classify_extension(&extension);
                (Some(extension), folder)
            }
            None => (None, LogicalFolder::Others),
        }
    }
}

/// Extension of a path without the leading dot, case preserved. Empty when there is none.
///
/// A dotfile's whole name counts as its extension: `.env` gives `env`.
pub fn extension_of(path: &Path) -> String {
    if let Some(ext) = path.extension() {
        return ext.to_string_lossy().into_owned();
    }

    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.strip_prefix('.').map(str::to_string))
        .unwrap_or_default()
}
