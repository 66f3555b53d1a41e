//! The patch transform boundary.
//!
//! The engine never runs a model itself; it hands batches of patches to a
//! [`PatchTransform`] and stitches whatever comes back. Anything from an
//! identity map to a GAN generator session fits behind this trait, as long
//! as output patches match input patches in count and shape.

mod filters;

pub use filters::{Blur, Invert};

use crate::error::Result;
use crate::tile::PatchTensor;

/// A batched `Patch -> Patch` transform supplied by the caller.
pub trait PatchTransform {
    /// Transform a batch of patches.
    ///
    /// The returned batch must have the same length as the input and every
    /// output patch must have the same dimensions as its input; the engine
    /// checks both and surfaces violations as errors. Failures propagate
    /// unretried — the transform may be stateful and retrying behind the
    /// caller's back is unsafe.
    ///
    /// # Errors
    ///
    /// Implementations report failures via [`crate::Error::transform`] or
    /// any other error variant.
    fn transform(&mut self, batch: &[PatchTensor]) -> Result<Vec<PatchTensor>>;
}

/// Returns every patch unchanged. Useful for round-trip testing and for
/// exercising the tiling machinery in isolation.
pub struct Identity;

impl PatchTransform for Identity {
    fn transform(&mut self, batch: &[PatchTensor]) -> Result<Vec<PatchTensor>> {
        Ok(batch.to_vec())
    }
}
