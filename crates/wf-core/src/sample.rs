use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Rounds `(x, y)` to the closest pixel and reads it through `border`.
///
/// Panics on an empty image.
pub fn sample_nearest<T: Copy>(
    img: &ImageView<'_, T>,
    x: f64,
    y: f64,
    border: BorderMode,
) -> T {
    let (xi, yi) = map_xy(img, x.round() as isize, y.round() as isize, border);
    img.row(yi)[xi]
}

/// Bilinear blend of the floor-based 2x2 neighborhood around `(x, y)`.
///
/// Panics on an empty image.
pub fn sample_bilinear<T: Copy + Into<f64>>(
    img: &ImageView<'_, T>,
    x: f64,
    y: f64,
    border: BorderMode,
) -> f64 {
    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let dx = x - x0 as f64;
    let dy = y - y0 as f64;

    let at = |xi: isize, yi: isize| -> f64 {
        let (mx, my) = map_xy(img, xi, yi, border);
        img.row(my)[mx].into()
    };

    let top = at(x0, y0) * (1.0 - dx) + at(x0 + 1, y0) * dx;
    let bottom = at(x0, y0 + 1) * (1.0 - dx) + at(x0 + 1, y0 + 1) * dx;
    top * (1.0 - dy) + bottom * dy
}

fn map_xy<T>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: BorderMode,
) -> (usize, usize) {
    match (
        map_index(x, img.width(), &border),
        map_index(y, img.height(), &border),
    ) {
        (Some(mx), Some(my)) => (mx, my),
        _ => panic!("cannot sample an empty image"),
    }
}
