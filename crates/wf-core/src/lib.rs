//! Image containers and sampling primitives shared by the wavefuse crates.
//!
//! ## Images and Views
//! [`Image`] owns a contiguous row-major buffer; [`ImageView`] borrows one
//! for read-only passes.
//!
//! ## Border Modes
//! Index mapping supports clamp and periodic (circular) extension.
//! Periodic extension is what the periodized wavelet transform relies on.
//!
//! ## Sampling Coordinates
//! Integer coordinates refer to pixel centers. Nearest-neighbor rounds to
//! the closest index; bilinear uses the floor-based 2x2 neighborhood.

mod border;
mod error;
mod image;
mod resize;
mod sample;

pub use border::{BorderMode, map_index};
pub use error::Error;
pub use image::{Image, ImageView, to_f64};
pub use resize::{ResizeFilter, resize};
pub use sample::{sample_bilinear, sample_nearest};
