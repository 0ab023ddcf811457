//! Mock backend that records calls and can misbehave per public id

use assetflow_core::{BackendKind, DestroyResult, UploadParams, UploadResult};
use assetflow_storage::{AssetBackend, BackendError, BackendResult, UploadContent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// What the mock does for a given public id.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Transport failure
    Fail(String),
    /// Well-formed response carrying a backend-level error
    Reject(String),
    /// Succeed after sleeping
    Delay(Duration),
    /// Never answer
    Hang,
    /// Panic inside the upload call
    Panic,
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub params: UploadParams,
    pub bytes: Vec<u8>,
}

/// In-memory backend double
pub struct MockBackend {
    behaviors: Mutex<HashMap<String, Behavior>>,
    default_delay: Duration,
    uploads: Mutex<Vec<RecordedUpload>>,
    destroyed: Mutex<Vec<String>>,
    in_flight: Arc<AtomicUsize>,
    high_water: AtomicUsize,
    calls: AtomicUsize,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            default_delay: Duration::ZERO,
            uploads: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
            high_water: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every upload without a specific behavior sleeps this long.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn set_behavior(&self, public_id: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(public_id.to_string(), behavior);
    }

    /// Uploads that reached the end of the call, in completion order.
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn upload_for(&self, public_id: &str) -> Option<RecordedUpload> {
        self.uploads()
            .into_iter()
            .find(|upload| upload.params.public_id == public_id)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    /// Number of upload calls started, including ones that failed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of uploads observed in flight at once.
    pub fn high_water_mark(&self) -> usize {
        self.high_water.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetBackend for MockBackend {
    async fn upload(
        &self,
        content: UploadContent,
        params: &UploadParams,
    ) -> BackendResult<UploadResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlightGuard(self.in_flight.clone());

        let bytes = match content {
            UploadContent::File(path) => tokio::fs::read(path).await?,
            UploadContent::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                buf
            }
        };

        let behavior = self.behaviors.lock().unwrap().get(&params.public_id).cloned();
        let mut error = None;
        match behavior {
            Some(Behavior::Fail(message)) => return Err(BackendError::UploadFailed(message)),
            Some(Behavior::Reject(message)) => error = Some(message),
            Some(Behavior::Delay(delay)) => tokio::time::sleep(delay).await,
            Some(Behavior::Hang) => futures::future::pending::<()>().await,
            Some(Behavior::Panic) => panic!("mock backend panicked on {}", params.public_id),
            None => {
                if !self.default_delay.is_zero() {
                    tokio::time::sleep(self.default_delay).await;
                }
            }
        }

        self.uploads.lock().unwrap().push(RecordedUpload {
            params: params.clone(),
            bytes,
        });

        Ok(UploadResult {
            public_id: format!("{}/{}", params.folder, params.public_id),
            secure_url: format!("https://cdn.test/{}/{}", params.folder, params.public_id),
            error,
        })
    }

    async fn destroy(&self, public_id: &str) -> BackendResult<DestroyResult> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(DestroyResult {
            result: "ok".to_string(),
        })
    }

    fn delivery_url(&self, public_id: &str, transformation: &str) -> BackendResult<String> {
        Ok(format!("https://cdn.test/{}/{}", transformation, public_id))
    }

    fn backend_type(&self) -> BackendKind {
        BackendKind::Local
    }
}
