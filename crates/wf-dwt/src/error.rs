use core::fmt;

use crate::SubBand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    EmptyImage,
    BandShape {
        band: SubBand,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    UnknownWavelet(String),
    UnknownBoundaryMode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyImage => write!(f, "cannot transform an image with zero width or height"),
            Self::BandShape {
                band,
                expected,
                actual,
            } => write!(
                f,
                "{band} band is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::UnknownWavelet(name) => write!(f, "unknown wavelet family '{name}'"),
            Self::UnknownBoundaryMode(name) => write!(f, "unknown boundary mode '{name}'"),
        }
    }
}

impl std::error::Error for Error {}
