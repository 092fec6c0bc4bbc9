//! Umbrella crate for the `wavefuse` workspace.
//!
//! Re-exports the image primitives, the wavelet transform and the fusion
//! pipeline so applications depend on a single crate.

pub use wf_core::*;
pub use wf_dwt::{
    BoundaryMode, FilterBank, PeriodizedDwt, SubBand, SubBandSet, Wavelet, WaveletTransform,
};
pub use wf_fusion::*;

/// Direct access to the 1-D and 2-D transform functions.
pub mod dwt {
    pub use wf_dwt::*;
}
