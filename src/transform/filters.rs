//! Built-in demo transforms.
//!
//! These stand in for a learned generator so the CLI can exercise the full
//! tile/blend path without shipping a model. Both operate per patch with no
//! knowledge of neighboring patches, exactly like real per-patch inference.

use imageproc::filter::gaussian_blur_f32;

use crate::error::{Error, Result};
use crate::image::{grid_to_image, image_to_grid};
use crate::tile::PatchTensor;

use super::PatchTransform;

/// Inverts every channel value.
pub struct Invert;

impl PatchTransform for Invert {
    fn transform(&mut self, batch: &[PatchTensor]) -> Result<Vec<PatchTensor>> {
        Ok(batch.iter().map(|patch| patch.mapv(|v| 255.0 - v)).collect())
    }
}

/// Gaussian-blurs each patch independently.
///
/// Without overlap-add blending the blurred patch borders would show up as a
/// visible grid in the output, which makes this a handy seam-suppression
/// check.
pub struct Blur {
    sigma: f32,
}

impl Blur {
    /// Create a blur transform with the given Gaussian sigma.
    ///
    /// # Errors
    ///
    /// Returns an error unless `sigma` is positive and finite.
    pub fn new(sigma: f32) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "sigma".to_string(),
                reason: "must be a positive finite number".to_string(),
            });
        }
        Ok(Self { sigma })
    }
}

impl PatchTransform for Blur {
    fn transform(&mut self, batch: &[PatchTensor]) -> Result<Vec<PatchTensor>> {
        Ok(batch
            .iter()
            .map(|patch| {
                let blurred = gaussian_blur_f32(&grid_to_image(patch), self.sigma);
                image_to_grid(&blurred)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_invert_flips_channels() {
        let patch = Array3::from_elem((4, 4, 3), 200.0);
        let out = Invert.transform(&[patch]).unwrap();
        assert_eq!(out[0][[2, 2, 1]], 55.0);
    }

    #[test]
    fn test_blur_rejects_non_positive_sigma() {
        assert!(matches!(
            Blur::new(0.0),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            Blur::new(-1.5),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_blur_preserves_constant_patch() {
        let patch = Array3::from_elem((8, 8, 3), 128.0);
        let out = Blur::new(2.0).unwrap().transform(&[patch]).unwrap();
        assert_eq!(out[0].dim(), (8, 8, 3));
        for &v in &out[0] {
            assert!((v - 128.0).abs() <= 1.0);
        }
    }
}
