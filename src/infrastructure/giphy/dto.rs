use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::entities::{ImageId, RemoteImage, ThumbnailSize};

/// Top-level search response. Entries stay untyped so one malformed
/// entry cannot fail the whole page.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Result objects in provider order.
    pub data: Vec<serde_json::Value>,
}

/// A single GIF object.
#[derive(Debug, Deserialize)]
pub struct GifObject {
    /// Provider identifier.
    pub id: String,
    /// Display title, may be empty.
    pub title: String,
    /// Available renditions.
    pub images: GifImages,
}

/// Renditions used by the client.
#[derive(Debug, Deserialize)]
pub struct GifImages {
    /// Fixed-width small rendition.
    pub fixed_width_small: SizedRendition,
    /// Full resolution rendition.
    pub original: OriginalRendition,
}

/// Rendition with dimensions encoded as numeric strings.
#[derive(Debug, Deserialize)]
pub struct SizedRendition {
    /// Rendition URL.
    pub url: String,
    /// Width in pixels.
    pub width: String,
    /// Height in pixels.
    pub height: String,
}

/// Original rendition.
#[derive(Debug, Deserialize)]
pub struct OriginalRendition {
    /// Rendition URL.
    pub url: String,
}

/// Reasons a result object is dropped.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum EntryError {
    #[error("missing or mistyped field: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("invalid identifier {0:?}")]
    Identifier(String),

    #[error("invalid {field} url: {source}")]
    Url {
        field: &'static str,
        source: url::ParseError,
    },

    #[error("invalid thumbnail {field} {value:?}")]
    Dimension { field: &'static str, value: String },
}

impl TryFrom<GifObject> for RemoteImage {
    type Error = EntryError;

    fn try_from(gif: GifObject) -> Result<Self, Self::Error> {
        let small = gif.images.fixed_width_small;

        let thumbnail_url = parse_url("thumbnail", &small.url)?;
        let width = parse_dimension("width", small.width)?;
        let height = parse_dimension("height", small.height)?;
        let original_url = parse_url("original", &gif.images.original.url)?;
        let id = ImageId::new(gif.id.clone()).ok_or(EntryError::Identifier(gif.id))?;

        Ok(Self::new(
            id,
            thumbnail_url,
            ThumbnailSize::new(width, height),
            original_url,
            gif.title,
        ))
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, EntryError> {
    Url::parse(value).map_err(|source| EntryError::Url { field, source })
}

fn parse_dimension(field: &'static str, value: String) -> Result<u32, EntryError> {
    value
        .trim()
        .parse()
        .map_err(|_| EntryError::Dimension { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn entry() -> serde_json::Value {
        json!({
            "id": "abc123",
            "title": "Cat GIF",
            "type": "gif",
            "images": {
                "fixed_width_small": {
                    "url": "https://media.giphy.com/media/abc123/100w.gif",
                    "width": "100",
                    "height": "73"
                },
                "original": {
                    "url": "https://media.giphy.com/media/abc123/giphy.gif",
                    "width": "480"
                }
            }
        })
    }

    fn convert(value: serde_json::Value) -> Result<RemoteImage, EntryError> {
        serde_json::from_value::<GifObject>(value)?.try_into()
    }

    #[test]
    fn test_valid_entry() {
        let image = convert(entry()).unwrap();

        assert_eq!(image.id().as_str(), "abc123");
        assert_eq!(image.title(), "Cat GIF");
        assert_eq!(image.thumbnail_size(), ThumbnailSize::new(100, 73));
        assert_eq!(
            image.original_url().as_str(),
            "https://media.giphy.com/media/abc123/giphy.gif"
        );
        assert!(image.local_original().is_none());
    }

    fn without(mut value: serde_json::Value, pointer: &str) -> serde_json::Value {
        let (parent, key) = pointer.rsplit_once('/').unwrap();
        value
            .pointer_mut(parent)
            .and_then(serde_json::Value::as_object_mut)
            .unwrap()
            .remove(key)
            .unwrap();
        value
    }

    #[test_case("/id" ; "id")]
    #[test_case("/title" ; "title")]
    #[test_case("/images" ; "images")]
    #[test_case("/images/fixed_width_small" ; "small_rendition")]
    #[test_case("/images/fixed_width_small/url" ; "small_url")]
    #[test_case("/images/fixed_width_small/width" ; "small_width")]
    #[test_case("/images/fixed_width_small/height" ; "small_height")]
    #[test_case("/images/original" ; "original_rendition")]
    #[test_case("/images/original/url" ; "original_url")]
    fn test_missing_field_is_shape_error(pointer: &str) {
        let value = without(entry(), pointer);
        assert!(matches!(convert(value), Err(EntryError::Shape(_))));
    }

    #[test]
    fn test_empty_title_is_kept() {
        let mut value = entry();
        value["title"] = json!("");
        assert_eq!(convert(value).unwrap().title(), "");
    }

    #[test]
    fn test_non_numeric_height_rejected() {
        let mut value = entry();
        value["images"]["fixed_width_small"]["height"] = json!("tall");
        assert!(matches!(
            convert(value),
            Err(EntryError::Dimension { field: "height", .. })
        ));
    }

    #[test]
    fn test_numeric_width_is_mistyped() {
        let mut value = entry();
        value["images"]["fixed_width_small"]["width"] = json!(100);
        assert!(matches!(convert(value), Err(EntryError::Shape(_))));
    }

    #[test]
    fn test_unparseable_original_url_rejected() {
        let mut value = entry();
        value["images"]["original"]["url"] = json!("not a url");
        assert!(matches!(
            convert(value),
            Err(EntryError::Url { field: "original", .. })
        ));
    }

    #[test]
    fn test_unsafe_identifier_rejected() {
        let mut value = entry();
        value["id"] = json!("../escape");
        assert!(matches!(convert(value), Err(EntryError::Identifier(_))));
    }
}
