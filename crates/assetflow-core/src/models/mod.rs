pub mod asset;
pub mod folder;
pub mod input;
pub mod metadata;

pub use asset::{DestroyResult, UploadParams, UploadResult};
pub use folder::LogicalFolder;
pub use input::{BoxedReader, InputSource, UploadInput};
pub use metadata::Metadata;
