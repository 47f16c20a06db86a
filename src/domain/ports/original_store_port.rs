//! Port definition for the local store of original images.

use std::path::PathBuf;

use url::Url;

use crate::domain::entities::{ImageId, RemoteImage};
use crate::domain::errors::CacheResult;

/// Outcome of asking the store to materialize an original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStart {
    /// A new download was started; a completion event follows on success.
    Started,
    /// The original is already on disk. No event is sent.
    AlreadyCached,
    /// Another download for this identifier is running. No event is sent
    /// to this caller.
    AlreadyInFlight,
}

/// Port for caching full resolution originals on local storage.
/// Implementations must be thread-safe.
pub trait OriginalStorePort: Send + Sync {
    /// Returns the local path of a cached original, if present on disk.
    fn cached_local_path(&self, id: &ImageId, original_url: &Url) -> Option<PathBuf>;

    /// Starts downloading the original unless it is cached or in flight.
    fn ensure_downloaded(&self, image: &RemoteImage) -> DownloadStart;

    /// Removes every cached original.
    ///
    /// # Errors
    /// Returns error if the cache directory cannot be removed or recreated.
    fn evict_all(&self) -> CacheResult<()>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    use parking_lot::Mutex;

    /// In-memory store recording requested downloads.
    pub struct MockOriginalStore {
        root: PathBuf,
        cached: Mutex<HashSet<ImageId>>,
        requested: Mutex<Vec<ImageId>>,
    }

    impl MockOriginalStore {
        /// Creates an empty mock store rooted at `root`.
        pub fn new(root: impl AsRef<Path>) -> Self {
            Self {
                root: root.as_ref().to_path_buf(),
                cached: Mutex::new(HashSet::new()),
                requested: Mutex::new(Vec::new()),
            }
        }

        /// Marks an identifier as cached.
        pub fn insert_cached(&self, id: ImageId) {
            self.cached.lock().insert(id);
        }

        /// Returns every identifier passed to `ensure_downloaded`.
        pub fn requested(&self) -> Vec<ImageId> {
            self.requested.lock().clone()
        }
    }

    impl OriginalStorePort for MockOriginalStore {
        fn cached_local_path(&self, id: &ImageId, _original_url: &Url) -> Option<PathBuf> {
            self.cached
                .lock()
                .contains(id)
                .then(|| self.root.join(id.as_str()))
        }

        fn ensure_downloaded(&self, image: &RemoteImage) -> DownloadStart {
            self.requested.lock().push(image.id().clone());
            if self.cached.lock().contains(image.id()) {
                DownloadStart::AlreadyCached
            } else {
                DownloadStart::Started
            }
        }

        fn evict_all(&self) -> CacheResult<()> {
            self.cached.lock().clear();
            Ok(())
        }
    }
}
