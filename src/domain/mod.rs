//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageId, RemoteImage, ThumbnailSize};
pub use errors::{CacheError, SearchError};
pub use ports::{DownloadStart, ImageSearchPort, OriginalStorePort, SearchQuery};
