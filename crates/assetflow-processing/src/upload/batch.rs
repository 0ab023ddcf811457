use assetflow_core::{InputSource, UploadInput};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::outcome::{BatchSummary, UploadOutcome};
use super::single::AssetUploader;
use crate::error::UploadError;

/// Runs a batch of uploads, at most `max_concurrent_uploads` at a time.
///
/// Every input gets exactly one outcome. Items never affect each other: a validation
/// failure, a backend error, a timeout or even a panic stays in the outcome of its item.
#[derive(Clone)]
pub struct BatchDispatcher {
    uploader: AssetUploader,
}

impl BatchDispatcher {
    pub fn new(uploader: AssetUploader) -> Self {
        Self { uploader }
    }

    /// Upload all `inputs` and return their outcomes in completion order.
    ///
    /// Cancelling `cancel` stops queued items from starting and abandons in-flight ones; both
    /// are reported as `Cancelled`.
    #[tracing::instrument(skip_all, fields(batch_size = inputs.len()))]
    pub async fn dispatch(
        &self,
        inputs: Vec<UploadInput>,
        cancel: CancellationToken,
    ) -> Vec<UploadOutcome> {
        if inputs.is_empty() {
            return Vec::new();
        }

        let config = self.uploader.config();
        if config.max_concurrent_uploads == 0 {
            tracing::warn!("max_concurrent_uploads is 0, running uploads one at a time");
        }
        // More slots than inputs are never used; tokio also caps the permit count.
        let concurrency = config
            .effective_concurrency()
            .min(inputs.len())
            .min(Semaphore::MAX_PERMITS);
        let timeout = config.max_upload_timeout;

        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut pending: Vec<Option<InputSource>> = Vec::with_capacity(inputs.len());
        let mut tasks = JoinSet::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let source = input.source();
            pending.push(Some(source.clone()));

            let uploader = self.uploader.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let task = run_one(uploader, semaphore, cancel, timeout, index, source.clone(), input);
                match AssertUnwindSafe(task).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(panic) => UploadOutcome::failed(
                        index,
                        source,
                        UploadError::TaskFailed(panic_message(panic.as_ref())),
                        Duration::ZERO,
                    ),
                }
            });
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    log_outcome(&outcome);
                    if let Some(slot) = pending.get_mut(outcome.index) {
                        *slot = None;
                    }
                    outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Upload task did not complete");
                }
            }
        }

        // Tasks that vanished without reporting (runtime shutdown) still owe an outcome.
        for (index, source) in pending.into_iter().enumerate() {
            if let Some(source) = source {
                let outcome = UploadOutcome::failed(
                    index,
                    source,
                    UploadError::TaskFailed("upload task did not complete".to_string()),
                    Duration::ZERO,
                );
                log_outcome(&outcome);
                outcomes.push(outcome);
            }
        }

        let summary = BatchSummary::from_outcomes(&outcomes);
        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            timed_out = summary.timed_out,
            cancelled = summary.cancelled,
            concurrency = concurrency,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch upload finished"
        );

        outcomes
    }
}

async fn run_one(
    uploader: AssetUploader,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    timeout: Duration,
    index: usize,
    source: InputSource,
    input: UploadInput,
) -> UploadOutcome {
    let permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return UploadOutcome::failed(index, source, UploadError::Cancelled, Duration::ZERO);
        }
        permit = semaphore.acquire_owned() => match permit {
            Ok(permit) => permit,
            Err(_) => {
                return UploadOutcome::failed(
                    index,
                    source,
                    UploadError::TaskFailed("admission semaphore closed".to_string()),
                    Duration::ZERO,
                );
            }
        },
    };

    let started = Instant::now();
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        res = tokio::time::timeout(timeout, uploader.upload_one(input)) => {
            res.unwrap_or(Err(UploadError::Timeout(timeout)))
        }
    };
    let latency = started.elapsed();
    drop(permit);

    match result {
        Ok(result) => UploadOutcome::succeeded(index, source, result, latency),
        Err(e) => UploadOutcome::failed(index, source, e, latency),
    }
}

fn log_outcome(outcome: &UploadOutcome) {
    let source = outcome.source.label();
    let latency_ms = outcome.latency.as_millis() as u64;

    if let Some(error) = &outcome.error {
        match error.log_level() {
            tracing::Level::ERROR => {
                tracing::error!(source = %source, index = outcome.index, error = %error, "Upload failed")
            }
            tracing::Level::WARN => {
                tracing::warn!(source = %source, index = outcome.index, latency_ms, error = %error, "Upload failed")
            }
            _ => {
                tracing::debug!(source = %source, index = outcome.index, error = %error, "Upload rejected")
            }
        }
        return;
    }

    match outcome.backend_error() {
        Some(message) => tracing::warn!(
            source = %source,
            index = outcome.index,
            latency_ms,
            error = message,
            "Backend rejected upload"
        ),
        None => tracing::info!(
            source = %source,
            public_id = outcome.public_id().unwrap_or_default(),
            latency_ms,
            "Asset uploaded"
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "upload task panicked".to_string()
    }
}
