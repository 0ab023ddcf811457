//! Upload execution
//!
//! `AssetUploader` performs exactly one upload; `BatchDispatcher` runs many of them under a
//! concurrency ceiling and turns each into an `UploadOutcome`.

mod batch;
mod outcome;
mod single;

pub use batch::BatchDispatcher;
pub use outcome::{BatchSummary, UploadOutcome};
pub use single::AssetUploader;
