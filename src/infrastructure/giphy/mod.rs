//! Giphy search API client.

mod client;
mod dto;
pub mod query;

pub use client::GiphySearchClient;
pub use query::{GIPHY_SEARCH_ENDPOINT, search_url};
