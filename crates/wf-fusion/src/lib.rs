//! Wavelet-domain fusion of two grayscale images.
//!
//! A [`FusionPipeline`] loads two images, resamples the second to the first
//! one's size, decomposes both with a single-level 2-D DWT, combines every
//! sub-band pair with a [`FusionRule`], reconstructs, stretches the result to
//! the full 8-bit range and writes it out.
//!
//! The transform and the codec are injected through
//! [`wf_dwt::WaveletTransform`] and [`ImageIo`]; [`FusionPipeline::new`] wires
//! in [`wf_dwt::PeriodizedDwt`] and [`FsImageIo`].

mod config;
mod error;
mod io;
mod normalize;
mod pipeline;
mod rule;

pub use config::{FusionConfig, OutputFormat};
pub use error::{DegenerateReconstruction, FusionError, LoadFailure, Result, Stage};
pub use io::{FsImageIo, ImageIo, unique_output_path};
pub use normalize::{normalize_to_u8, value_range};
pub use pipeline::{FusionOutcome, FusionPipeline, FusionReport};
pub use rule::{FusionRule, fuse_bands, fuse_subbands};
