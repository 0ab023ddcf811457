//! Helpers shared by the `assetflow` binary: tracing setup, argument parsing and output
//! rendering.

use assetflow_processing::{BatchSummary, ErrorKind, UploadOutcome};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Logs go to stderr so stdout stays machine readable.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Parse `key=value`. The value is taken as JSON when it parses, as a plain string otherwise.
pub fn parse_meta(s: &str) -> Result<(String, JsonValue), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no `=` found in `{}`", s))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid key=value: empty key in `{}`", s));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// One printable line per outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRow {
    pub index: usize,
    pub source: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl From<&UploadOutcome> for OutcomeRow {
    fn from(outcome: &UploadOutcome) -> Self {
        let status = match outcome.error.as_ref().map(|e| e.kind()) {
            None if outcome.is_success() => "ok",
            None => "rejected",
            Some(ErrorKind::Validation) => "invalid",
            Some(ErrorKind::Timeout) => "timeout",
            Some(ErrorKind::Cancelled) => "cancelled",
            Some(_) => "failed",
        };

        Self {
            index: outcome.index,
            source: outcome.source.label(),
            status,
            public_id: outcome.public_id().map(str::to_string),
            secure_url: outcome.secure_url().map(str::to_string),
            error: outcome.error_message(),
            latency_ms: outcome.latency.as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<OutcomeRow>,
}

impl BatchReport {
    /// Rows are sorted back into submission order.
    pub fn new(outcomes: &[UploadOutcome]) -> Self {
        let mut rows: Vec<OutcomeRow> = outcomes.iter().map(OutcomeRow::from).collect();
        rows.sort_by_key(|row| row.index);
        Self {
            summary: BatchSummary::from_outcomes(outcomes),
            outcomes: rows,
        }
    }

    pub fn render_table(&self) -> String {
        let mut out = format!(
            "{:<4} {:<32} {:<10} {:>8}  {}\n",
            "#", "Source", "Status", "ms", "Result"
        );
        out.push_str(&"-".repeat(100));
        out.push('\n');

        for row in &self.outcomes {
            let detail = row
                .error
                .as_deref()
                .or(row.secure_url.as_deref())
                .unwrap_or("");
            out.push_str(&format!(
                "{:<4} {:<32} {:<10} {:>8}  {}\n",
                row.index,
                truncate_string(&row.source, 32),
                row.status,
                row.latency_ms,
                detail
            ));
        }

        out.push_str(&format!(
            "\n{} total, {} succeeded, {} failed ({} timed out, {} cancelled)\n",
            self.summary.total,
            self.summary.succeeded,
            self.summary.failed,
            self.summary.timed_out,
            self.summary.cancelled
        ));
        out
    }
}

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
