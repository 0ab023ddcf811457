//! Configuration errors
//!
//! Raised while loading settings or constructing a backend. These are the only errors that
//! escape the upload manager directly; everything that happens per asset is captured in that
//! asset's outcome instead.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}
