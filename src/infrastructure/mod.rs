//! Infrastructure layer with external service adapters.

/// Local original image cache.
pub mod cache;
/// Application configuration.
pub mod config;
/// Giphy search client.
pub mod giphy;
/// Shared HTTP helpers.
pub mod http;

pub use cache::{OriginalDownloaded, OriginalImageCache};
pub use config::{AppConfig, CacheConfig, CliArgs, Command, GiphyConfig, LogLevel, StorageManager};
pub use giphy::GiphySearchClient;
