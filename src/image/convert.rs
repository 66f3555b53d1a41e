//! Conversions between 8-bit RGB images and float pixel grids.

use image::{imageops::FilterType, DynamicImage, RgbImage};
use ndarray::Array3;

use super::RGB_CHANNELS;

/// Convert an RGB image to a float pixel grid in (row, column, channel)
/// order. Channel values keep the [0, 255] range; blending happens in float
/// to avoid accumulating integer rounding error.
pub fn image_to_grid(image: &RgbImage) -> Array3<f32> {
    let (width, height) = image.dimensions();
    let mut grid = Array3::<f32>::zeros((height as usize, width as usize, RGB_CHANNELS));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..RGB_CHANNELS {
            grid[[y as usize, x as usize, c]] = f32::from(pixel[c]);
        }
    }

    grid
}

/// Convert a float pixel grid back to an 8-bit RGB image.
///
/// Channel values are rounded to nearest and clamped to [0, 255].
/// Round-to-nearest is the documented quantization mode; it keeps identity
/// reconstructions bit-stable across runs.
#[allow(clippy::cast_possible_truncation)]
pub fn grid_to_image(grid: &Array3<f32>) -> RgbImage {
    let (height, width, _) = grid.dim();

    // Safe: grid dimensions come from an image that already fit in u32
    let mut image = RgbImage::new(width as u32, height as u32);

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        for c in 0..RGB_CHANNELS {
            pixel[c] = quantize(grid[[y as usize, x as usize, c]]);
        }
    }

    image
}

/// Round a float channel value to the nearest 8-bit value, clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    value.round().clamp(0.0, 255.0) as u8
}

/// Downscale an image so its largest side is at most `max_dimension`,
/// preserving aspect ratio. Returns a clone if the image already fits.
///
/// Uses Lanczos3 for quality, matching the resampling used elsewhere in the
/// pipeline.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn downscale_to_fit(image: &RgbImage, max_dimension: u32) -> RgbImage {
    let largest = image.width().max(image.height());
    if largest <= max_dimension {
        return image.clone();
    }

    let scale = max_dimension as f32 / largest as f32;
    // Safe: scale < 1, so the products stay within the original u32 dims
    let new_w = ((image.width() as f32 * scale) as u32).max(1);
    let new_h = ((image.height() as f32 * scale) as u32).max(1);

    DynamicImage::ImageRgb8(image.clone())
        .resize_exact(new_w, new_h, FilterType::Lanczos3)
        .to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_quantize_rounds_to_nearest() {
        assert_eq!(quantize(127.4), 127);
        assert_eq!(quantize(127.5), 128);
        assert_eq!(quantize(0.49), 0);
    }

    #[test]
    fn test_quantize_clamps() {
        assert_eq!(quantize(-5.0), 0);
        assert_eq!(quantize(300.0), 255);
    }

    #[test]
    fn test_grid_round_trip() {
        let mut img = RgbImage::new(7, 5);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([x as u8 * 10, y as u8 * 20, 255 - x as u8]);
        }

        let grid = image_to_grid(&img);
        assert_eq!(grid.dim(), (5, 7, 3));
        assert_eq!(grid[[2, 3, 0]], 30.0);

        let back = grid_to_image(&grid);
        assert_eq!(back, img);
    }

    #[test]
    fn test_downscale_bounds_largest_side() {
        let img = RgbImage::new(3000, 1500);
        let scaled = downscale_to_fit(&img, 1500);
        assert_eq!((scaled.width(), scaled.height()), (1500, 750));
    }

    #[test]
    fn test_downscale_is_noop_when_within_bound() {
        let img = RgbImage::new(640, 480);
        let scaled = downscale_to_fit(&img, 1500);
        assert_eq!((scaled.width(), scaled.height()), (640, 480));
    }
}
