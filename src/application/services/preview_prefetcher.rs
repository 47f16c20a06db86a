//! Original prefetching around the previewed result.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::RemoteImage;
use crate::domain::ports::{DownloadStart, OriginalStorePort};

/// Keeps the originals next to the previewed one downloading, so paging
/// through previews usually finds the file already cached.
pub struct PreviewPrefetcher {
    store: Arc<dyn OriginalStorePort>,
}

impl PreviewPrefetcher {
    /// Creates a prefetcher backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn OriginalStorePort>) -> Self {
        Self { store }
    }

    /// Ensures the originals at `index - 1`, `index` and `index + 1` are
    /// cached or downloading. Returns how many downloads were started.
    pub fn prefetch_around(&self, results: &[Arc<RemoteImage>], index: usize) -> usize {
        if index >= results.len() {
            return 0;
        }

        let start = index.saturating_sub(1);
        let end = (index + 1).min(results.len() - 1);

        results[start..=end]
            .iter()
            .filter(|image| self.store.ensure_downloaded(image) == DownloadStart::Started)
            .inspect(|image| trace!(id = %image.id(), index, "Prefetching original"))
            .count()
    }

    /// Returns the local original for `image`, recording it on the record
    /// the first time it is found in the store.
    #[must_use]
    pub fn resolve(&self, image: &RemoteImage) -> Option<PathBuf> {
        if let Some(path) = image.local_original() {
            return Some(path.to_path_buf());
        }

        let path = self
            .store
            .cached_local_path(image.id(), image.original_url())?;
        image.set_local_original(path.clone());
        Some(path)
    }
}
