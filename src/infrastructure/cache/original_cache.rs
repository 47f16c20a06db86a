//! Content-addressed disk cache for full resolution originals.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};
use url::Url;

use crate::domain::entities::{ImageId, RemoteImage};
use crate::domain::errors::{CacheError, CacheResult};
use crate::domain::ports::{DownloadStart, OriginalStorePort};
use crate::infrastructure::http;

/// Name of the cache directory created under the system temp directory.
pub const CACHE_DIR_NAME: &str = "CachedOriginals";

/// Message sent when an original finishes downloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalDownloaded {
    /// The image ID.
    pub id: ImageId,
    /// Path of the cached file.
    pub path: PathBuf,
}

type DownloadRegistry = Arc<Mutex<HashMap<ImageId, JoinHandle<()>>>>;

/// Disk cache of originals keyed by image identifier.
///
/// At most one download runs per identifier. Completed downloads are
/// reported on the event channel passed to [`OriginalImageCache::new`];
/// failed ones are only logged.
pub struct OriginalImageCache {
    root: PathBuf,
    http_client: Client,
    downloads: DownloadRegistry,
    event_tx: mpsc::UnboundedSender<OriginalDownloaded>,
    runtime: Handle,
}

impl std::fmt::Debug for OriginalImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OriginalImageCache")
            .field("root", &self.root)
            .field("in_flight", &self.in_flight_count())
            .finish_non_exhaustive()
    }
}

impl OriginalImageCache {
    /// Creates a cache rooted at `root`, creating the directory if needed.
    ///
    /// Downloads run on the Tokio runtime this is called from, so
    /// [`ensure_downloaded`](Self::ensure_downloaded) may later be called
    /// from any thread.
    ///
    /// # Errors
    /// Returns error if called outside a Tokio runtime, or if the cache
    /// directory or HTTP client cannot be created.
    pub fn new(
        root: PathBuf,
        timeout: Duration,
        event_tx: &mpsc::UnboundedSender<OriginalDownloaded>,
    ) -> CacheResult<Self> {
        let runtime =
            Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;

        std::fs::create_dir_all(&root)
            .map_err(|e| CacheError::IoError(format!("Failed to create cache dir: {e}")))?;

        let http_client = http::build_client(timeout)
            .map_err(|e| CacheError::NetworkError(format!("Failed to create HTTP client: {e}")))?;

        debug!(root = %root.display(), "Original cache ready");

        Ok(Self {
            root,
            http_client,
            downloads: Arc::new(Mutex::new(HashMap::new())),
            event_tx: event_tx.clone(),
            runtime,
        })
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path an original is stored under, cached or not.
    fn cache_path(&self, id: &ImageId, original_url: &Url) -> PathBuf {
        cache_path_in(&self.root, id, original_url)
    }

    /// Returns the path of a cached original if it exists on disk.
    #[must_use]
    pub fn cached_local_path(&self, id: &ImageId, original_url: &Url) -> Option<PathBuf> {
        let path = self.cache_path(id, original_url);
        if path.is_file() {
            trace!(id = %id, path = %path.display(), "Original cache hit");
            Some(path)
        } else {
            trace!(id = %id, "Original cache miss");
            None
        }
    }

    /// Starts downloading an original unless it is cached or already downloading.
    ///
    /// Only a [`DownloadStart::Started`] call produces a completion event, and
    /// only if the download succeeds. Failures are not retried.
    pub fn ensure_downloaded(&self, image: &RemoteImage) -> DownloadStart {
        let id = image.id();
        let mut downloads = self.downloads.lock();

        if downloads.contains_key(id) {
            trace!(id = %id, "Original already downloading");
            return DownloadStart::AlreadyInFlight;
        }

        if self.cached_local_path(id, image.original_url()).is_some() {
            return DownloadStart::AlreadyCached;
        }

        let job = DownloadJob {
            id: id.clone(),
            url: image.original_url().clone(),
            root: self.root.clone(),
            http_client: self.http_client.clone(),
            downloads: self.downloads.clone(),
            event_tx: self.event_tx.clone(),
        };

        debug!(id = %id, url = %image.original_url(), "Downloading original");
        downloads.insert(id.clone(), self.runtime.spawn(job.run()));

        DownloadStart::Started
    }

    /// Removes every cached original and recreates the empty cache directory.
    ///
    /// Running downloads are left alone and write into the new directory
    /// when they finish.
    ///
    /// # Errors
    /// Returns error if the directory cannot be removed or recreated.
    pub fn evict_all(&self) -> CacheResult<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(CacheError::IoError(format!(
                    "Failed to remove cache dir: {e}"
                )));
            }
        }

        std::fs::create_dir_all(&self.root)
            .map_err(|e| CacheError::IoError(format!("Failed to recreate cache dir: {e}")))?;

        info!(
            root = %self.root.display(),
            in_flight = self.in_flight_count(),
            "Cleared original cache"
        );
        Ok(())
    }

    /// Returns true if an original is currently downloading.
    #[must_use]
    pub fn is_downloading(&self, id: &ImageId) -> bool {
        self.downloads.lock().contains_key(id)
    }

    /// Returns the number of running downloads.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.downloads.lock().len()
    }
}

impl OriginalStorePort for OriginalImageCache {
    fn cached_local_path(&self, id: &ImageId, original_url: &Url) -> Option<PathBuf> {
        Self::cached_local_path(self, id, original_url)
    }

    fn ensure_downloaded(&self, image: &RemoteImage) -> DownloadStart {
        Self::ensure_downloaded(self, image)
    }

    fn evict_all(&self) -> CacheResult<()> {
        Self::evict_all(self)
    }
}

/// State moved into a spawned download task.
struct DownloadJob {
    id: ImageId,
    url: Url,
    root: PathBuf,
    http_client: Client,
    downloads: DownloadRegistry,
    event_tx: mpsc::UnboundedSender<OriginalDownloaded>,
}

impl DownloadJob {
    async fn run(self) {
        let result = self.fetch_and_store().await;

        self.downloads.lock().remove(&self.id);

        match result {
            Ok(path) => {
                debug!(id = %self.id, path = %path.display(), "Original cached");
                let event = OriginalDownloaded {
                    id: self.id.clone(),
                    path,
                };
                if self.event_tx.send(event).is_err() {
                    trace!(id = %self.id, "No listener for download events");
                }
            }
            Err(e) => {
                warn!(id = %self.id, url = %self.url, error = %e, "Failed to download original");
            }
        }
    }

    async fn fetch_and_store(&self) -> CacheResult<PathBuf> {
        let bytes = http::get_bytes(&self.http_client, self.url.clone())
            .await
            .map_err(|e| CacheError::NetworkError(e.to_string()))?;

        if bytes.is_empty() {
            return Err(CacheError::NetworkError("empty response body".into()));
        }

        let root = self.root.clone();
        let path = cache_path_in(&self.root, &self.id, &self.url);
        let size = bytes.len();

        let path = tokio::task::spawn_blocking(move || write_atomically(&root, path, &bytes))
            .await
            .map_err(|e| CacheError::IoError(format!("Write task panicked: {e}")))?
            .map_err(|e| CacheError::IoError(format!("Failed to write cache file: {e}")))?;

        trace!(id = %self.id, size, "Wrote original to disk");
        Ok(path)
    }
}

/// Writes to a temp file in `root` and renames it into place, so readers
/// never see a partial file under the final name.
fn write_atomically(root: &Path, path: PathBuf, bytes: &[u8]) -> io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(root)?;

    file.write_all(bytes)?;
    file.flush()?;
    file.persist(&path).map_err(|e| e.error)?;

    Ok(path)
}

/// `<root>/<id>.<ext>`, or `<root>/<id>` when the URL path has no usable extension.
fn cache_path_in(root: &Path, id: &ImageId, original_url: &Url) -> PathBuf {
    match path_extension(original_url) {
        Some(ext) => root.join(format!("{}.{ext}", id.as_str())),
        None => root.join(id.as_str()),
    }
}

fn path_extension(url: &Url) -> Option<&str> {
    let file_name = url.path_segments()?.next_back()?;
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Returns the default cache directory path.
#[must_use]
pub fn default_cache_dir() -> PathBuf {
    std::env::temp_dir().join(CACHE_DIR_NAME)
}
