//! Original image cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors that can occur while materializing originals on disk.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error on the cache directory or a cache file.
    #[error("IO error: {0}")]
    IoError(String),
    /// Network error while fetching an original.
    #[error("Network error: {0}")]
    NetworkError(String),
    /// The cache was created outside a Tokio runtime.
    #[error("No Tokio runtime to run downloads on: {0}")]
    RuntimeUnavailable(String),
}
