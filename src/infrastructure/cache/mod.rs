//! Local storage of downloaded originals.

pub mod original_cache;

pub use original_cache::{CACHE_DIR_NAME, OriginalDownloaded, OriginalImageCache, default_cache_dir};
