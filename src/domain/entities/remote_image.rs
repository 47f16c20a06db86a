//! Remote image search result entity.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use url::Url;

/// Width in pixels of the small fixed-width thumbnails returned by Giphy.
pub const SMALL_FIXED_WIDTH: u32 = 100;

/// Provider-assigned image identifier, safe to use as a file name stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(String);

impl ImageId {
    /// Creates an identifier, rejecting values that are empty or could escape
    /// the cache directory when used as a file name.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();

        if value.is_empty() || value.starts_with('.') {
            return None;
        }

        if value
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':' | '\0') || c.is_control())
        {
            return None;
        }

        Some(Self(value))
    }

    /// Creates an identifier without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel dimensions reported by the provider for a rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ThumbnailSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ThumbnailSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A single search result: thumbnail and original renditions of one GIF.
///
/// Equality and hashing only consider [`RemoteImage::id`]. The local original
/// path is a set-once slot filled after the original has been cached.
#[derive(Debug, Clone)]
pub struct RemoteImage {
    id: ImageId,
    thumbnail_url: Url,
    thumbnail_size: ThumbnailSize,
    original_url: Url,
    title: String,
    local_original: OnceLock<PathBuf>,
}

impl RemoteImage {
    /// Creates a new remote image with no local original.
    #[must_use]
    pub fn new(
        id: ImageId,
        thumbnail_url: Url,
        thumbnail_size: ThumbnailSize,
        original_url: Url,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id,
            thumbnail_url,
            thumbnail_size,
            original_url,
            title: title.into(),
            local_original: OnceLock::new(),
        }
    }

    /// Returns the provider identifier.
    #[must_use]
    pub const fn id(&self) -> &ImageId {
        &self.id
    }

    /// Returns the thumbnail URL.
    #[must_use]
    pub const fn thumbnail_url(&self) -> &Url {
        &self.thumbnail_url
    }

    /// Returns the thumbnail dimensions.
    #[must_use]
    pub const fn thumbnail_size(&self) -> ThumbnailSize {
        self.thumbnail_size
    }

    /// Returns the full resolution URL.
    #[must_use]
    pub const fn original_url(&self) -> &Url {
        &self.original_url
    }

    /// Returns the title, possibly empty.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the local path of the original, if it has been materialized.
    #[must_use]
    pub fn local_original(&self) -> Option<&Path> {
        self.local_original.get().map(PathBuf::as_path)
    }

    /// Records the local path of the original.
    ///
    /// Returns false if a path was already recorded; the first one is kept.
    pub fn set_local_original(&self, path: PathBuf) -> bool {
        self.local_original.set(path).is_ok()
    }
}

impl PartialEq for RemoteImage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RemoteImage {}

impl Hash for RemoteImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
