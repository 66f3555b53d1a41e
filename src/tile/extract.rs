//! Canvas padding and patch extraction.

use ndarray::{s, Array3};

use crate::error::{Error, Result};
use crate::image::RGB_CHANNELS;

use super::geometry::GridPlan;
use super::PatchTensor;

/// Extend a pixel grid to the planned padded dimensions with zero (black)
/// pixels on the right and bottom. The origin stays at (0, 0), so original
/// pixel coordinates are unchanged and the final crop is a plain truncation.
///
/// Returns the grid untouched when the plan needs no padding.
pub fn pad_to_grid(grid: Array3<f32>, plan: &GridPlan) -> Array3<f32> {
    if plan.pad_w == 0 && plan.pad_h == 0 {
        return grid;
    }

    let (height, width, _) = grid.dim();
    let mut padded = Array3::<f32>::zeros((plan.padded_h, plan.padded_w, RGB_CHANNELS));
    padded.slice_mut(s![..height, ..width, ..]).assign(&grid);
    padded
}

/// Slice the padded grid into patches with their `(y, x)` origins, row-major.
///
/// Patches are deep copies: the external transform may consume them in any
/// order, so none of them can alias the padded grid.
///
/// # Errors
///
/// Returns `PlanMismatch` if the emitted patch count disagrees with the
/// planner, which would mean the grid arithmetic is broken.
pub fn extract_patches(
    padded: &Array3<f32>,
    plan: &GridPlan,
) -> Result<(Vec<PatchTensor>, Vec<(usize, usize)>)> {
    let p = plan.patch_size;
    let mut patches = Vec::with_capacity(plan.patch_count());
    let mut origins = Vec::with_capacity(plan.patch_count());

    for (y, x) in plan.origins() {
        patches.push(padded.slice(s![y..y + p, x..x + p, ..]).to_owned());
        origins.push((y, x));
    }

    if patches.len() != plan.patch_count() {
        return Err(Error::PlanMismatch {
            expected: plan.patch_count(),
            actual: patches.len(),
        });
    }

    Ok((patches, origins))
}
