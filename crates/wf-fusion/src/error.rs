use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Pipeline stage, used to report where a deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Forward,
    Fuse,
    Inverse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward transform",
            Self::Fuse => "sub-band fusion",
            Self::Inverse => "inverse transform",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error("path not found")]
    NotFound,
    #[error("unreadable image: {0}")]
    Unreadable(String),
}

#[derive(Debug, Error)]
pub enum FusionError {
    #[error("failed to load image {}: {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: LoadFailure },

    #[error("invalid {role} image: {width}x{height} has no samples")]
    InvalidImage {
        role: &'static str,
        width: usize,
        height: usize,
    },

    #[error("unsupported fusion rule '{0}' (expected mean, min or max)")]
    UnsupportedFusionRule(String),

    #[error("wavelet transform failed: {0}")]
    Transform(#[from] wf_dwt::Error),

    #[error("coefficient shape error: {0}")]
    Shape(#[from] wf_core::Error),

    #[error("failed to write image {}: {reason}", path.display())]
    ImageWrite { path: PathBuf, reason: String },

    #[error("deadline exceeded during {stage} after {elapsed:?}")]
    Timeout { stage: Stage, elapsed: Duration },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FusionError>;

/// The reconstruction has no usable dynamic range, so min-max scaling would
/// divide by (nearly) zero. Handled inside the pipeline by a constant fill.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("reconstruction has no dynamic range (min {min}, max {max})")]
pub struct DegenerateReconstruction {
    pub min: f64,
    pub max: f64,
}
