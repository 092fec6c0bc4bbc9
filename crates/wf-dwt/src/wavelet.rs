use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

const DB1_LO: [f64; 2] = [0.7071067811865476, 0.7071067811865476];

const DB2_LO: [f64; 4] = [
    -0.12940952255092145,
    0.22414386804185735,
    0.836516303737469,
    0.48296291314469025,
];

const DB3_LO: [f64; 6] = [
    0.035226291882100656,
    -0.08544127388224149,
    -0.13501102001039084,
    0.4598775021193313,
    0.8068915093133388,
    0.3326705529509569,
];

const DB4_LO: [f64; 8] = [
    -0.010597401784997278,
    0.032883011666982945,
    0.030841381835986965,
    -0.18703481171888114,
    -0.02798376941698385,
    0.6308807679295904,
    0.7148465705525415,
    0.23037781330885523,
];

const DB5_LO: [f64; 10] = [
    0.0033357252854737712,
    -0.012580751999081999,
    -0.006241490212798274,
    0.07757149384004572,
    -0.032244869584638375,
    -0.24229488706638203,
    0.13842814590132074,
    0.7243085284377729,
    0.6038292697971896,
    0.16010239797419293,
];

/// Orthogonal Daubechies wavelet families.
///
/// `Db1` is the Haar wavelet. Filters are stored as decomposition low-pass
/// taps in correlation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wavelet {
    #[serde(alias = "haar")]
    Db1,
    Db2,
    Db3,
    Db4,
    #[default]
    Db5,
}

impl Wavelet {
    pub const ALL: [Wavelet; 5] = [
        Wavelet::Db1,
        Wavelet::Db2,
        Wavelet::Db3,
        Wavelet::Db4,
        Wavelet::Db5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Db1 => "db1",
            Self::Db2 => "db2",
            Self::Db3 => "db3",
            Self::Db4 => "db4",
            Self::Db5 => "db5",
        }
    }

    /// Number of vanishing moments (the Daubechies order).
    pub fn order(self) -> usize {
        self.dec_lo().len() / 2
    }

    pub fn filter_len(self) -> usize {
        self.dec_lo().len()
    }

    pub fn dec_lo(self) -> &'static [f64] {
        match self {
            Self::Db1 => &DB1_LO,
            Self::Db2 => &DB2_LO,
            Self::Db3 => &DB3_LO,
            Self::Db4 => &DB4_LO,
            Self::Db5 => &DB5_LO,
        }
    }

    pub fn filter_bank(self) -> FilterBank {
        FilterBank::from_low_pass(self.dec_lo())
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Wavelet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "haar" | "db1" => Ok(Self::Db1),
            "db2" => Ok(Self::Db2),
            "db3" => Ok(Self::Db3),
            "db4" => Ok(Self::Db4),
            "db5" => Ok(Self::Db5),
            _ => Err(Error::UnknownWavelet(s.to_string())),
        }
    }
}

/// Analysis low-pass / high-pass pair of equal length.
///
/// The high-pass is the quadrature mirror of the low-pass:
/// `hi[k] = (-1)^(k+1) * lo[F-1-k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    pub lo: Vec<f64>,
    pub hi: Vec<f64>,
}

impl FilterBank {
    pub fn from_low_pass(lo: &[f64]) -> Self {
        assert!(
            !lo.is_empty() && lo.len().is_multiple_of(2),
            "orthogonal filters have even, non-zero length"
        );

        let f = lo.len();
        let hi = (0..f)
            .map(|k| {
                let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
                sign * lo[f - 1 - k]
            })
            .collect();

        Self { lo: lo.to_vec(), hi }
    }

    pub fn len(&self) -> usize {
        self.lo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lo.is_empty()
    }
}
