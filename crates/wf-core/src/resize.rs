use serde::{Deserialize, Serialize};

use crate::border::BorderMode;
use crate::image::{Image, ImageView};
use crate::sample::{sample_bilinear, sample_nearest};

/// Interpolation used by [`resize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    /// Source pixel `floor(dst * src_len / dst_len)`.
    Nearest,
    /// Half-pixel-center bilinear with clamped borders, rounded to nearest.
    #[default]
    Bilinear,
}

/// Resamples `src` to exactly `width x height`.
///
/// Upsampling and downsampling share the same mapping: destination pixel
/// center `d + 0.5` lands on source coordinate `(d + 0.5) * scale - 0.5`.
/// An empty source yields an all-zero image of the requested size.
pub fn resize(
    src: &ImageView<'_, u8>,
    width: usize,
    height: usize,
    filter: ResizeFilter,
) -> Image<u8> {
    if src.width() == 0 || src.height() == 0 || width == 0 || height == 0 {
        return Image::new_fill(width, height, 0u8);
    }

    if src.width() == width && src.height() == height {
        return src.to_image();
    }

    let sx = src.width() as f64 / width as f64;
    let sy = src.height() as f64 / height as f64;
    let mut out = Image::new_fill(width, height, 0u8);

    for y in 0..height {
        let row = out.row_mut(y);
        match filter {
            ResizeFilter::Nearest => {
                let src_y = ((y as f64 * sy).floor()).min((src.height() - 1) as f64);
                for (x, px) in row.iter_mut().enumerate() {
                    let src_x = ((x as f64 * sx).floor()).min((src.width() - 1) as f64);
                    *px = sample_nearest(src, src_x, src_y, BorderMode::Clamp);
                }
            }
            ResizeFilter::Bilinear => {
                let src_y = (y as f64 + 0.5) * sy - 0.5;
                for (x, px) in row.iter_mut().enumerate() {
                    let src_x = (x as f64 + 0.5) * sx - 0.5;
                    let v = sample_bilinear(src, src_x, src_y, BorderMode::Clamp);
                    *px = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    out
}
