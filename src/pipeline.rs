//! Reconstruction pipeline: plan, pad, extract, transform, stitch, crop.

use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};
use crate::image::{downscale_to_fit, grid_to_image, image_to_grid};
use crate::tile::{
    blend_mask, crop_to_original, extract_patches, pad_to_grid, Accumulator, GridPlan, PatchTensor,
};
use crate::transform::PatchTransform;

/// Configuration for one reconstruction.
#[derive(Debug, Clone)]
pub struct Options {
    /// Patch edge length in pixels.
    pub patch_size: usize,

    /// Distance between consecutive patch origins. Values below the patch
    /// size produce overlap, which is what makes the blending worthwhile.
    pub stride: usize,

    /// Patches per transform call. Purely a throughput/memory knob; any
    /// value from 1 to the full patch count yields the same image.
    pub max_batch: usize,

    /// Inputs whose largest side exceeds this bound are downscaled before
    /// planning, to bound the total patch count. `None` disables the cap.
    pub max_dimension: Option<u32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            patch_size: 256,
            stride: 128,
            max_batch: 4,
            max_dimension: Some(1500),
        }
    }
}

impl Options {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.patch_size == 0 {
            return Err(Error::InvalidGeometry {
                reason: "patch size must be greater than 0".to_string(),
            });
        }

        if self.stride == 0 {
            return Err(Error::InvalidGeometry {
                reason: "stride must be greater than 0".to_string(),
            });
        }

        if self.stride > self.patch_size {
            return Err(Error::InvalidGeometry {
                reason: format!(
                    "stride ({}) must not exceed patch size ({})",
                    self.stride, self.patch_size
                ),
            });
        }

        if self.max_batch == 0 {
            return Err(Error::InvalidParameter {
                name: "max_batch".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Apply a patch transform to a whole image with seamless blending.
///
/// The image is padded so a fixed grid of overlapping patches covers it
/// exactly, every patch is run through `transform` in `max_batch`-sized
/// chunks, and the outputs are blended back together and cropped to the
/// working geometry. Deterministic given a deterministic transform; each
/// call owns its own buffers, so concurrent calls need no synchronization.
///
/// Inputs larger than `options.max_dimension` are downscaled first and the
/// result keeps the downscaled geometry.
///
/// # Errors
///
/// Returns an error for invalid options, transform failures or shape
/// mismatches, and internal coverage violations. No partial image is ever
/// returned.
pub fn reconstruct(
    image: &RgbImage,
    options: &Options,
    transform: &mut dyn PatchTransform,
) -> Result<RgbImage> {
    options.validate()?;

    let working = match options.max_dimension {
        Some(max) if image.width().max(image.height()) > max => {
            let scaled = downscale_to_fit(image, max);
            tracing::info!(
                "Downscaled input {}x{} -> {}x{} (max dimension {max})",
                image.width(),
                image.height(),
                scaled.width(),
                scaled.height(),
            );
            scaled
        }
        _ => image.clone(),
    };

    let width = working.width() as usize;
    let height = working.height() as usize;

    let plan = GridPlan::new(width, height, options.patch_size, options.stride)?;
    tracing::debug!(
        patches_x = plan.patches_x,
        patches_y = plan.patches_y,
        padded_w = plan.padded_w,
        padded_h = plan.padded_h,
        "Planned patch grid"
    );

    let padded = pad_to_grid(image_to_grid(&working), &plan);
    let (patches, origins) = extract_patches(&padded, &plan)?;
    drop(padded);

    tracing::info!("Transforming {} patches...", patches.len());
    let transformed = run_batches(&patches, options, transform)?;

    tracing::info!("Stitching...");
    let mask = blend_mask(options.patch_size);
    let mut accumulator = Accumulator::new(plan.padded_w, plan.padded_h);
    for (patch, &origin) in transformed.iter().zip(origins.iter()) {
        accumulator.add(patch, origin, &mask);
    }

    let stitched = accumulator.normalize()?;
    let cropped = crop_to_original(stitched, width, height);

    Ok(grid_to_image(&cropped))
}

/// Run the transform over `max_batch`-sized chunks, checking the shape
/// contract after every call.
fn run_batches(
    patches: &[PatchTensor],
    options: &Options,
    transform: &mut dyn PatchTransform,
) -> Result<Vec<PatchTensor>> {
    let batches = patches.len().div_ceil(options.max_batch);

    let pb = ProgressBar::new(batches as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Patches [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let mut transformed = Vec::with_capacity(patches.len());
    for batch in patches.chunks(options.max_batch) {
        let output = transform.transform(batch)?;
        check_batch_shape(batch, &output, options.patch_size)?;
        transformed.extend(output);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(transformed)
}

fn check_batch_shape(
    input: &[PatchTensor],
    output: &[PatchTensor],
    patch_size: usize,
) -> Result<()> {
    if output.len() != input.len() {
        return Err(Error::TransformShape {
            expected: format!("{} patches", input.len()),
            actual: format!("{} patches", output.len()),
        });
    }

    for patch in output {
        let dim = patch.dim();
        if dim != (patch_size, patch_size, 3) {
            return Err(Error::TransformShape {
                expected: format!("({patch_size}, {patch_size}, 3)"),
                actual: format!("{dim:?}"),
            });
        }
    }

    Ok(())
}
