//! Weighted overlap-add stitching and final cropping.

use ndarray::{s, Array2, Array3};

use crate::error::{Error, Result};
use crate::image::RGB_CHANNELS;

use super::PatchTensor;

/// Accumulates weighted patch contributions onto a padded canvas.
///
/// Both buffers are owned by one reconstruction and discarded after
/// normalization; nothing here is shared across invocations.
pub struct Accumulator {
    canvas: Array3<f32>,
    weight: Array2<f32>,
}

impl Accumulator {
    /// Create zeroed canvas and weight buffers for a padded image.
    #[must_use]
    pub fn new(padded_w: usize, padded_h: usize) -> Self {
        Self {
            canvas: Array3::zeros((padded_h, padded_w, RGB_CHANNELS)),
            weight: Array2::zeros((padded_h, padded_w)),
        }
    }

    /// Add one transformed patch at its origin, weighted by the blend mask.
    /// The mask broadcasts across the three channels.
    pub fn add(&mut self, patch: &PatchTensor, origin: (usize, usize), mask: &Array2<f32>) {
        let (y, x) = origin;
        let p = mask.nrows();
        debug_assert_eq!(patch.dim(), (p, p, RGB_CHANNELS));

        let mut canvas = self.canvas.slice_mut(s![y..y + p, x..x + p, ..]);
        let mut weight = self.weight.slice_mut(s![y..y + p, x..x + p]);

        for i in 0..p {
            for j in 0..p {
                let m = mask[[i, j]];
                for c in 0..RGB_CHANNELS {
                    canvas[[i, j, c]] += patch[[i, j, c]] * m;
                }
                weight[[i, j]] += m;
            }
        }
    }

    /// Divide accumulated contributions by accumulated weight, consuming the
    /// accumulator.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateCoverage` naming the first cell with zero weight.
    /// Every padded pixel is covered by at least one patch by construction,
    /// so this only fires when planner, extractor, and stitcher disagree.
    pub fn normalize(mut self) -> Result<Array3<f32>> {
        let (height, width) = self.weight.dim();

        for y in 0..height {
            for x in 0..width {
                let w = self.weight[[y, x]];
                if w <= 0.0 {
                    return Err(Error::DegenerateCoverage { x, y });
                }
                for c in 0..RGB_CHANNELS {
                    self.canvas[[y, x, c]] /= w;
                }
            }
        }

        Ok(self.canvas)
    }
}

/// Crop a stitched padded grid back to the original image dimensions.
/// Padding only ever extends the bottom-right, so this is a plain truncation;
/// an unpadded grid passes through untouched.
pub fn crop_to_original(stitched: Array3<f32>, width: usize, height: usize) -> Array3<f32> {
    let (h, w, _) = stitched.dim();
    if w == width && h == height {
        return stitched;
    }
    stitched.slice(s![..height, ..width, ..]).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::blend_mask;
    use ndarray::Array3;

    #[test]
    fn test_single_patch_normalizes_to_itself() {
        let mask = blend_mask(4);
        let patch = Array3::from_elem((4, 4, 3), 100.0);

        let mut acc = Accumulator::new(4, 4);
        acc.add(&patch, (0, 0), &mask);
        let out = acc.normalize().unwrap();

        for &v in &out {
            assert!((v - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_overlapping_constant_patches_stay_constant() {
        // Two patches overlapping by half; weights differ per cell but the
        // weighted mean of identical values is the value itself.
        let mask = blend_mask(4);
        let patch = Array3::from_elem((4, 4, 3), 60.0);

        let mut acc = Accumulator::new(6, 4);
        acc.add(&patch, (0, 0), &mask);
        acc.add(&patch, (0, 2), &mask);
        let out = acc.normalize().unwrap();

        assert_eq!(out.dim(), (4, 6, 3));
        for &v in &out {
            assert!((v - 60.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_grid_coverage_leaves_no_cell_unweighted() {
        use crate::tile::GridPlan;

        for (w, h, p, s) in [(300, 300, 256, 128), (40, 60, 16, 8), (5, 5, 4, 3)] {
            let plan = GridPlan::new(w, h, p, s).unwrap();
            let mask = blend_mask(p);
            let patch = Array3::from_elem((p, p, 3), 1.0);

            let mut acc = Accumulator::new(plan.padded_w, plan.padded_h);
            for origin in plan.origins() {
                acc.add(&patch, origin, &mask);
            }
            assert!(acc.normalize().is_ok(), "{w}x{h} patch {p} stride {s}");
        }
    }

    #[test]
    fn test_uncovered_cell_is_degenerate() {
        let acc = Accumulator::new(4, 4);
        let err = acc.normalize().unwrap_err();
        assert!(matches!(err, Error::DegenerateCoverage { x: 0, y: 0 }));
    }

    #[test]
    fn test_crop_truncates_bottom_right() {
        let mut grid = Array3::<f32>::zeros((4, 4, 3));
        grid[[0, 0, 0]] = 9.0;
        grid[[2, 1, 2]] = 3.0;

        let cropped = crop_to_original(grid, 2, 3);
        assert_eq!(cropped.dim(), (3, 2, 3));
        assert_eq!(cropped[[0, 0, 0]], 9.0);
        assert_eq!(cropped[[2, 1, 2]], 3.0);
    }

    #[test]
    fn test_crop_passes_unpadded_through() {
        let grid = Array3::<f32>::zeros((4, 5, 3));
        let cropped = crop_to_original(grid.clone(), 5, 4);
        assert_eq!(cropped, grid);
    }
}
