use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use wf_core::{Error, Image};
use wf_dwt::{SubBand, SubBandSet};

use crate::FusionError;

/// Element-wise combination applied to every pair of corresponding bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionRule {
    /// `(a + b) / 2`.
    #[default]
    Mean,
    /// `min(a, b)`.
    Min,
    /// `max(a, b)`.
    Max,
}

impl FusionRule {
    pub const ALL: [FusionRule; 3] = [FusionRule::Mean, FusionRule::Min, FusionRule::Max];

    pub fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    #[inline]
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Mean => (a + b) / 2.0,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        }
    }
}

impl fmt::Display for FusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FusionRule {
    type Err = FusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(FusionError::UnsupportedFusionRule(s.to_string())),
        }
    }
}

/// Combines two equally shaped coefficient arrays.
pub fn fuse_bands(a: &Image<f64>, b: &Image<f64>, rule: FusionRule) -> Result<Image<f64>, Error> {
    if a.dims() != b.dims() {
        return Err(Error::DimensionMismatch {
            expected: a.dims(),
            actual: b.dims(),
        });
    }

    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| rule.combine(x, y))
        .collect();
    Image::from_vec(a.width(), a.height(), data)
}

/// Applies `rule` to all four band pairs. Both sets must come from signals of
/// the same size.
pub fn fuse_subbands(
    first: &SubBandSet,
    second: &SubBandSet,
    rule: FusionRule,
) -> Result<SubBandSet, FusionError> {
    if first.source_dims() != second.source_dims() {
        return Err(Error::DimensionMismatch {
            expected: first.source_dims(),
            actual: second.source_dims(),
        }
        .into());
    }

    let [approximation, horizontal, vertical, diagonal] =
        SubBand::ALL.map(|band| fuse_bands(first.band(band), second.band(band), rule));

    Ok(SubBandSet::new(
        approximation?,
        horizontal?,
        vertical?,
        diagonal?,
        first.source_dims(),
    )?)
}
