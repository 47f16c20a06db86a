//! Application layer with services driving the search and cache ports.

/// Result feed and preview services.
pub mod services;

pub use services::{PreviewPrefetcher, ResultFeed};
