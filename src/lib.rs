//! # patchblend
//!
//! A library for applying per-patch image transforms to arbitrarily large
//! RGB images without visible seams.
//!
//! Images are decomposed into fixed-size overlapping patches, each patch is
//! run through an opaque `Patch -> Patch` transform (typically a generator
//! network living behind the [`PatchTransform`] trait), and the outputs are
//! reassembled by weighted overlap-add blending before cropping back to the
//! original geometry.
//!
//! ## Example
//!
//! ```no_run
//! use patchblend::{image, reconstruct, Identity, Options};
//!
//! # fn main() -> patchblend::Result<()> {
//! let input = image::load_image("input.png")?;
//! let output = reconstruct(&input, &Options::default(), &mut Identity)?;
//! image::save_image(&output, "output.png", 95)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod image;
pub mod pipeline;
pub mod tile;
pub mod transform;

pub use error::{Error, Result};
pub use pipeline::{reconstruct, Options};
pub use tile::PatchTensor;
pub use transform::{Identity, PatchTransform};
