use wf_core::Image;

use crate::DegenerateReconstruction;

/// Ranges at or below this fraction of the sample magnitude are treated as
/// flat; they come from round-off in the transform, not from image content.
const RELATIVE_RANGE_EPS: f64 = 1e-9;

/// Returns `(min, max)` over all samples, or `None` for an empty image.
pub fn value_range(img: &Image<f64>) -> Option<(f64, f64)> {
    if img.data().is_empty() {
        return None;
    }

    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for &v in img.data() {
        if v < min_v {
            min_v = v;
        }
        if v > max_v {
            max_v = v;
        }
    }
    Some((min_v, max_v))
}

/// Min-max scales `img` onto `[0, 255]` and truncates to `u8`:
/// `out = (v - min) / (max - min) * 255`.
///
/// Fails with [`DegenerateReconstruction`] when the range is zero, negligible
/// relative to the sample magnitude, or not finite.
pub fn normalize_to_u8(img: &Image<f64>) -> Result<Image<u8>, DegenerateReconstruction> {
    let (min_v, max_v) = value_range(img).ok_or(DegenerateReconstruction {
        min: f64::NAN,
        max: f64::NAN,
    })?;

    let range = max_v - min_v;
    let magnitude = 1.0f64.max(min_v.abs()).max(max_v.abs());
    if !range.is_finite() || range <= RELATIVE_RANGE_EPS * magnitude {
        return Err(DegenerateReconstruction {
            min: min_v,
            max: max_v,
        });
    }

    Ok(img.map(|&v| ((v - min_v) / range * 255.0) as u8))
}
