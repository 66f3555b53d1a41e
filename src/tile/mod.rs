//! The tiling, padding, and weighted-blend reconstruction engine.
//!
//! A large image is zero-padded on the right and bottom so that a grid of
//! fixed-size patches at a fixed stride covers it exactly, the patches are
//! extracted as independent copies, and after the external transform runs,
//! overlapping patch outputs are blended back together with a pyramidal
//! weight mask. Center-weighted overlap-add suppresses the seam artifacts a
//! hard tiling would expose, since per-patch inference has no awareness of
//! neighboring context.

mod extract;
mod geometry;
mod mask;
mod stitch;

pub use extract::{extract_patches, pad_to_grid};
pub use geometry::GridPlan;
pub use mask::blend_mask;
pub use stitch::{crop_to_original, Accumulator};

use ndarray::Array3;

/// A square RGB patch in (row, column, channel) order, channel values in the
/// [0, 255] float range. Patches are always owned copies, never views into
/// the source image.
pub type PatchTensor = Array3<f32>;
