use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use wf_core::ResizeFilter;
use wf_dwt::{BoundaryMode, Wavelet};

use crate::{FusionError, FusionRule};

/// Container format of the fused output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub(crate) fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Pipeline settings. Every field has a default, so a config file only needs
/// the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Wavelet family for both the forward and the inverse pass.
    pub wavelet: Wavelet,
    pub boundary: BoundaryMode,
    /// Rule used when the caller does not pass one explicitly.
    pub rule: FusionRule,
    /// Directory receiving generated output files.
    pub output_dir: PathBuf,
    /// Format used for generated names and for paths without a known
    /// extension.
    pub format: OutputFormat,
    /// Interpolation used to bring the second image to the first one's size.
    pub resize_filter: ResizeFilter,
    /// Sample value written when the reconstruction has no dynamic range.
    pub degenerate_fill: u8,
    /// Optional wall-clock budget for one fusion call, in milliseconds.
    pub deadline_ms: Option<u64>,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            wavelet: Wavelet::Db5,
            boundary: BoundaryMode::Periodization,
            rule: FusionRule::Mean,
            output_dir: PathBuf::from("demo"),
            format: OutputFormat::Jpeg,
            resize_filter: ResizeFilter::Bilinear,
            degenerate_fill: 128,
            deadline_ms: None,
        }
    }
}

impl FusionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, FusionError> {
        serde_json::from_str(json).map_err(|e| FusionError::Config(e.to_string()))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, FusionError> {
        let text = fs::read_to_string(path)
            .map_err(|e| FusionError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
