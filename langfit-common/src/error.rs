//! Common error types for LangFit

use thiserror::Error;

/// Common result type for LangFit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration, catalogs and template banks
///
/// The matching engine itself never fails once constructed; everything that
/// can go wrong happens at startup and surfaces through this type.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document could not be parsed into the expected shape
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Language catalog or question template bank failed validation
    #[error("Catalog error: {0}")]
    Catalog(String),
}
