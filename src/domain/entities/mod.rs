//! Domain entity definitions.

mod remote_image;

pub use remote_image::{ImageId, RemoteImage, SMALL_FIXED_WIDTH, ThumbnailSize};
