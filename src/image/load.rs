//! Image loading utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Load an image from disk as 8-bit RGB.
///
/// Alpha and grayscale sources are converted to RGB; the engine operates on
/// three-channel images only.
///
/// # Errors
///
/// Returns an error if the image cannot be read or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(img.to_rgb8())
}
