mod image_search_port;
mod original_store_port;

pub use image_search_port::{ImageSearchPort, SearchQuery};
pub use original_store_port::{DownloadStart, OriginalStorePort};

#[cfg(test)]
pub mod mocks {
    pub use super::image_search_port::mock::MockImageSearch;
    pub use super::original_store_port::mock::MockOriginalStore;
}
