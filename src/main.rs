//! patchblend CLI - apply a patch transform to an image with seamless blending.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patchblend::image::{load_image, save_image};
use patchblend::transform::{Blur, Identity, Invert, PatchTransform};
use patchblend::{reconstruct, Options};

/// Apply a per-patch transform to an image using overlapping tiles and
/// weighted blending.
#[derive(Parser, Debug)]
#[command(name = "patchblend")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output image path.
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Patch edge length in pixels.
    #[arg(long, default_value = "256", value_name = "INT")]
    patch_size: usize,

    /// Distance between patch origins. Values below the patch size overlap.
    #[arg(long, default_value = "128", value_name = "INT")]
    stride: usize,

    /// Patches per transform call. Throughput/memory only, never output.
    #[arg(long, default_value = "4", value_name = "INT")]
    batch: usize,

    /// Downscale inputs whose largest side exceeds this bound. 0 disables.
    #[arg(long, default_value = "1500", value_name = "INT")]
    max_dim: u32,

    /// Built-in patch transform to apply.
    #[arg(short, long, value_enum, default_value_t = TransformKind::Identity)]
    transform: TransformKind,

    /// Gaussian sigma for the blur transform.
    #[arg(long, default_value = "4.0", value_name = "FLOAT")]
    sigma: f32,

    /// Output JPEG quality (1-100).
    #[arg(short, long, default_value = "95", value_name = "INT")]
    quality: u8,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TransformKind {
    /// Pass patches through unchanged.
    Identity,
    /// Invert every channel.
    Invert,
    /// Gaussian-blur each patch independently.
    Blur,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("patchblend={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(args: &Args) -> Result<()> {
    // Validate input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    let options = Options {
        patch_size: args.patch_size,
        stride: args.stride,
        max_batch: args.batch,
        max_dimension: (args.max_dim > 0).then_some(args.max_dim),
    };

    let mut transform: Box<dyn PatchTransform> = match args.transform {
        TransformKind::Identity => Box::new(Identity),
        TransformKind::Invert => Box::new(Invert),
        TransformKind::Blur => Box::new(Blur::new(args.sigma)?),
    };

    let input = load_image(&args.input).context("Failed to load input image")?;

    let output = reconstruct(&input, &options, transform.as_mut())
        .context("Failed to reconstruct image")?;

    save_image(&output, &args.output, args.quality).context("Failed to save output image")?;

    println!(
        "Successfully processed {} -> {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}
