//! Custom error types for patchblend.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the patchblend library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Patch size and stride do not form a usable tiling.
    #[error("invalid patch geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The external patch transform failed.
    #[error("patch transform failed: {source}")]
    Transform {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The external patch transform returned a batch of the wrong shape.
    #[error("patch transform shape mismatch: expected {expected}, got {actual}")]
    TransformShape { expected: String, actual: String },

    /// The extractor emitted a patch count that disagrees with the planner.
    #[error("patch grid mismatch: planned {expected} patches, extracted {actual}")]
    PlanMismatch { expected: usize, actual: usize },

    /// A canvas cell accumulated zero blend weight. Coverage is guaranteed by
    /// construction, so this signals a planner/extractor/stitcher disagreement.
    #[error("zero blend weight at canvas cell ({x}, {y})")]
    DegenerateCoverage { x: usize, y: usize },
}

impl Error {
    /// Wrap an arbitrary failure from an external patch transform.
    pub fn transform(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transform {
            source: source.into(),
        }
    }
}

/// Result type alias for patchblend operations.
pub type Result<T> = std::result::Result<T, Error>;
