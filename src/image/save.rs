//! Image saving utilities.

use std::path::Path;

use image::RgbImage;

use crate::error::{Error, Result};

/// Save an RGB image to disk, with the format inferred from the extension.
///
/// # Arguments
///
/// * `image` - The image to save
/// * `path` - Output file path
/// * `quality` - JPEG quality (1-100), ignored for other formats
///
/// # Errors
///
/// Returns an error if `quality` is out of range or the image cannot be
/// written.
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    if !(1..=100).contains(&quality) {
        return Err(Error::InvalidParameter {
            name: "quality".to_string(),
            reason: "must be between 1 and 100".to_string(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let mut output = std::fs::File::create(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(source),
            })?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            image
                .write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            image.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_rejects_zero_quality() {
        let img = RgbImage::new(4, 4);
        let err = save_image(&img, "out.jpg", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }
}
