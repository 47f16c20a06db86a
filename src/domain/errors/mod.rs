//! Domain error types.

mod cache_error;
mod search_error;

pub use cache_error::{CacheError, CacheResult};
pub use search_error::SearchError;
