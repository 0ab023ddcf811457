use assetflow_core::{InputSource, UploadResult};
use serde::Serialize;
use std::time::Duration;

use crate::error::UploadError;

/// Per-item record of one upload attempt.
///
/// `result` is set whenever the backend answered, even if the answer carries a backend-level
/// error. `error` is set when the attempt failed before or during the call. Both can be absent
/// only for an attempt that never produced anything, which the dispatcher never emits.
#[derive(Debug)]
pub struct UploadOutcome {
    /// Position of the input in the submitted batch.
    pub index: usize,
    pub source: InputSource,
    pub result: Option<UploadResult>,
    pub error: Option<UploadError>,
    /// Time from slot acquisition to completion. Zero when no slot was obtained.
    pub latency: Duration,
}

impl UploadOutcome {
    pub fn succeeded(
        index: usize,
        source: InputSource,
        result: UploadResult,
        latency: Duration,
    ) -> Self {
        Self {
            index,
            source,
            result: Some(result),
            error: None,
            latency,
        }
    }

    pub fn failed(index: usize, source: InputSource, error: UploadError, latency: Duration) -> Self {
        Self {
            index,
            source,
            result: None,
            error: Some(error),
            latency,
        }
    }

    /// No transport error and no error reported by the backend.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self
                .result
                .as_ref()
                .map(|result| !result.has_error())
                .unwrap_or(false)
    }

    /// Error message the backend put in an otherwise well-formed response.
    pub fn backend_error(&self) -> Option<&str> {
        self.result.as_ref().and_then(|result| result.error.as_deref())
    }

    /// Whatever went wrong, as one message.
    pub fn error_message(&self) -> Option<String> {
        match (&self.error, self.backend_error()) {
            (Some(error), _) => Some(error.to_string()),
            (None, Some(message)) => Some(message.to_string()),
            (None, None) => None,
        }
    }

    pub fn public_id(&self) -> Option<&str> {
        self.result
            .as_ref()
            .map(|result| result.public_id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn secure_url(&self) -> Option<&str> {
        self.result
            .as_ref()
            .map(|result| result.secure_url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// Aggregate view of a finished batch, used for the summary log line and CLI output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[UploadOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            if outcome.is_success() {
                summary.succeeded += 1;
                continue;
            }
            summary.failed += 1;
            match outcome.error {
                Some(UploadError::Timeout(_)) => summary.timed_out += 1,
                Some(UploadError::Cancelled) => summary.cancelled += 1,
                _ => {}
            }
        }

        summary
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
