use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use wf_core::BorderMode;

use crate::Error;

/// Signal extension used at array edges during the transform.
///
/// Only periodization is supported: the signal is treated as circular, odd
/// lengths are first padded by repeating the last sample, and every band has
/// exactly `ceil(n / 2)` coefficients per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    #[default]
    #[serde(alias = "per")]
    Periodization,
}

impl BoundaryMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Periodization => "periodization",
        }
    }

    pub(crate) fn border(self) -> BorderMode {
        match self {
            Self::Periodization => BorderMode::Periodic,
        }
    }

    /// Number of coefficients per axis produced for a signal of length `n`.
    pub fn band_len(self, n: usize) -> usize {
        match self {
            Self::Periodization => n.div_ceil(2),
        }
    }
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "periodization" | "per" => Ok(Self::Periodization),
            _ => Err(Error::UnknownBoundaryMode(s.to_string())),
        }
    }
}
