mod preview_prefetcher;
mod result_feed;

pub use preview_prefetcher::PreviewPrefetcher;
pub use result_feed::ResultFeed;
