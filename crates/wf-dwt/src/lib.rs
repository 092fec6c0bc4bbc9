//! Single-level 2-D discrete wavelet transform with periodized boundaries.
//!
//! Conventions:
//! - Filters are orthogonal Daubechies banks (`db1` = Haar through `db5`).
//! - Analysis along one axis computes
//!   `a[o] = sum_j lo[j] * x[(2o + F/2 - j) mod n]` (same for `d` with the
//!   high-pass), so every band has `ceil(n / 2)` samples per axis.
//! - Odd lengths are padded by repeating the last sample before analysis;
//!   the inverse crops the pad away, so `inverse(forward(I))` has `I`'s shape.
//! - The 2-D pass runs along columns first, then rows.
//!
//! [`WaveletTransform`] is the seam callers inject; [`PeriodizedDwt`] is the
//! implementation shipped here.

mod boundary;
mod dwt1d;
mod dwt2d;
mod error;
mod wavelet;

pub use boundary::BoundaryMode;
pub use dwt1d::{analyze, synthesize};
pub use dwt2d::{SubBand, SubBandSet, forward, inverse};
pub use error::Error;
pub use wavelet::{FilterBank, Wavelet};

use wf_core::{Image, ImageView};

/// Forward / inverse single-level 2-D wavelet transform.
pub trait WaveletTransform {
    fn forward(
        &self,
        image: &ImageView<'_, f64>,
        wavelet: Wavelet,
        mode: BoundaryMode,
    ) -> Result<SubBandSet, Error>;

    fn inverse(
        &self,
        bands: &SubBandSet,
        wavelet: Wavelet,
        mode: BoundaryMode,
    ) -> Result<Image<f64>, Error>;
}

/// Separable filter-bank implementation of [`WaveletTransform`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PeriodizedDwt;

impl WaveletTransform for PeriodizedDwt {
    fn forward(
        &self,
        image: &ImageView<'_, f64>,
        wavelet: Wavelet,
        mode: BoundaryMode,
    ) -> Result<SubBandSet, Error> {
        forward(image, wavelet, mode)
    }

    fn inverse(
        &self,
        bands: &SubBandSet,
        wavelet: Wavelet,
        mode: BoundaryMode,
    ) -> Result<Image<f64>, Error> {
        Ok(inverse(bands, wavelet, mode))
    }
}
