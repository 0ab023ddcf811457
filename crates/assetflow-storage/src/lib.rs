//! Assetflow Storage Library
//!
//! This crate provides the asset backend abstraction and its implementations.
//! It includes the `AssetBackend` trait plus backends for Cloudinary and the local filesystem.
//!
//! # Public identifiers
//!
//! Backends address assets by a folder-qualified public id: `{folder}/{public_id}`, e.g.
//! `images/logo.png`. The id returned in an `UploadResult` is the one `destroy` and
//! `delivery_url` expect. Key generation lives in the `keys` module so backends stay consistent.

#[cfg(feature = "backend-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "backend-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use assetflow_core::BackendKind;
#[cfg(feature = "backend-cloudinary")]
pub use cloudinary::CloudinaryBackend;
pub use factory::create_backend;
#[cfg(feature = "backend-local")]
pub use local::LocalBackend;
pub use traits::{AssetBackend, BackendError, BackendResult, UploadContent};
