use std::io;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageError};
use uuid::Uuid;
use wf_core::{Image, ResizeFilter, resize};

use crate::{FusionError, LoadFailure, OutputFormat};

/// Decode / resample / encode capability consumed by the pipeline.
pub trait ImageIo {
    /// Loads `path` as 8-bit single-channel luma. Multi-channel inputs are
    /// converted to grayscale.
    fn decode_grayscale(&self, path: &Path) -> Result<Image<u8>, FusionError>;

    fn resize(&self, image: &Image<u8>, width: usize, height: usize) -> Image<u8>;

    fn encode(&self, image: &Image<u8>, path: &Path, format: OutputFormat)
    -> Result<(), FusionError>;
}

/// [`ImageIo`] backed by the `image` crate and the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageIo {
    filter: ResizeFilter,
}

impl FsImageIo {
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl ImageIo for FsImageIo {
    fn decode_grayscale(&self, path: &Path) -> Result<Image<u8>, FusionError> {
        let load_error = |reason| FusionError::ImageLoad {
            path: path.to_path_buf(),
            reason,
        };

        let dyn_img = image::open(path).map_err(|e| match e {
            ImageError::IoError(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                load_error(LoadFailure::NotFound)
            }
            other => load_error(LoadFailure::Unreadable(other.to_string())),
        })?;

        let luma = dyn_img.to_luma8();
        let (w, h) = luma.dimensions();
        Image::from_vec(w as usize, h as usize, luma.into_raw())
            .map_err(|e| load_error(LoadFailure::Unreadable(e.to_string())))
    }

    fn resize(&self, image: &Image<u8>, width: usize, height: usize) -> Image<u8> {
        resize(&image.as_view(), width, height, self.filter)
    }

    fn encode(
        &self,
        image: &Image<u8>,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), FusionError> {
        let write_error = |reason: String| FusionError::ImageWrite {
            path: path.to_path_buf(),
            reason,
        };

        let width = u32::try_from(image.width()).map_err(|e| write_error(e.to_string()))?;
        let height = u32::try_from(image.height()).map_err(|e| write_error(e.to_string()))?;
        let gray = GrayImage::from_raw(width, height, image.data().to_vec())
            .ok_or_else(|| write_error("buffer does not match image dimensions".to_string()))?;

        gray.save_with_format(path, format.image_format())
            .map_err(|e| write_error(e.to_string()))
    }
}

/// Collision-free output name under `dir`: `fused-<uuid>.<ext>`.
pub fn unique_output_path(dir: &Path, format: OutputFormat) -> PathBuf {
    dir.join(format!(
        "fused-{}.{}",
        Uuid::new_v4().simple(),
        format.extension()
    ))
}
