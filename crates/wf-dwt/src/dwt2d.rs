use core::fmt;

use wf_core::{Image, ImageView};

use crate::dwt1d::{analyze, synthesize};
use crate::{BoundaryMode, Error, Wavelet};

/// Identifies one of the four bands of a single-level 2-D transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubBand {
    /// Low-pass along both axes.
    Approximation,
    /// High-pass along columns, low-pass along rows (horizontal edges).
    Horizontal,
    /// Low-pass along columns, high-pass along rows (vertical edges).
    Vertical,
    /// High-pass along both axes.
    Diagonal,
}

impl SubBand {
    pub const ALL: [SubBand; 4] = [
        SubBand::Approximation,
        SubBand::Horizontal,
        SubBand::Vertical,
        SubBand::Diagonal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Approximation => "approximation",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for SubBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coefficients of one forward pass, plus the size of the signal they came
/// from so the inverse can restore odd dimensions.
///
/// All four bands share the shape `(ceil(w / 2), ceil(h / 2))`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubBandSet {
    approximation: Image<f64>,
    horizontal: Image<f64>,
    vertical: Image<f64>,
    diagonal: Image<f64>,
    source_width: usize,
    source_height: usize,
}

impl SubBandSet {
    /// Validates band shapes against `source_dims = (width, height)`.
    pub fn new(
        approximation: Image<f64>,
        horizontal: Image<f64>,
        vertical: Image<f64>,
        diagonal: Image<f64>,
        source_dims: (usize, usize),
    ) -> Result<Self, Error> {
        let (source_width, source_height) = source_dims;
        if source_width == 0 || source_height == 0 {
            return Err(Error::EmptyImage);
        }

        let mode = BoundaryMode::Periodization;
        let expected = (mode.band_len(source_width), mode.band_len(source_height));
        for (band, img) in [
            (SubBand::Approximation, &approximation),
            (SubBand::Horizontal, &horizontal),
            (SubBand::Vertical, &vertical),
            (SubBand::Diagonal, &diagonal),
        ] {
            if img.dims() != expected {
                return Err(Error::BandShape {
                    band,
                    expected,
                    actual: img.dims(),
                });
            }
        }

        Ok(Self {
            approximation,
            horizontal,
            vertical,
            diagonal,
            source_width,
            source_height,
        })
    }

    pub fn band(&self, band: SubBand) -> &Image<f64> {
        match band {
            SubBand::Approximation => &self.approximation,
            SubBand::Horizontal => &self.horizontal,
            SubBand::Vertical => &self.vertical,
            SubBand::Diagonal => &self.diagonal,
        }
    }

    pub fn approximation(&self) -> &Image<f64> {
        &self.approximation
    }

    pub fn horizontal(&self) -> &Image<f64> {
        &self.horizontal
    }

    pub fn vertical(&self) -> &Image<f64> {
        &self.vertical
    }

    pub fn diagonal(&self) -> &Image<f64> {
        &self.diagonal
    }

    /// `(width, height)` of every band.
    pub fn band_dims(&self) -> (usize, usize) {
        self.approximation.dims()
    }

    /// `(width, height)` of the signal the bands were computed from.
    pub fn source_dims(&self) -> (usize, usize) {
        (self.source_width, self.source_height)
    }
}

/// Single-level forward transform: columns first, then rows.
pub fn forward(
    src: &ImageView<'_, f64>,
    wavelet: Wavelet,
    mode: BoundaryMode,
) -> Result<SubBandSet, Error> {
    let (w, h) = (src.width(), src.height());
    if w == 0 || h == 0 {
        return Err(Error::EmptyImage);
    }

    let bank = wavelet.filter_bank();
    let border = mode.border();
    let ext = extend_to_even(src);
    let ext_w = ext.width();
    let (bw, bh) = (mode.band_len(w), mode.band_len(h));

    let mut col_lo = Image::new_fill(ext_w, bh, 0.0f64);
    let mut col_hi = Image::new_fill(ext_w, bh, 0.0f64);
    let mut column = vec![0.0f64; ext.height()];
    let mut lo = vec![0.0f64; bh];
    let mut hi = vec![0.0f64; bh];

    for x in 0..ext_w {
        for (y, v) in column.iter_mut().enumerate() {
            *v = ext.data()[y * ext_w + x];
        }
        analyze(&column, &bank, &border, &mut lo, &mut hi);
        for y in 0..bh {
            col_lo.data_mut()[y * ext_w + x] = lo[y];
            col_hi.data_mut()[y * ext_w + x] = hi[y];
        }
    }

    let mut approximation = Image::new_fill(bw, bh, 0.0f64);
    let mut horizontal = Image::new_fill(bw, bh, 0.0f64);
    let mut vertical = Image::new_fill(bw, bh, 0.0f64);
    let mut diagonal = Image::new_fill(bw, bh, 0.0f64);

    for y in 0..bh {
        analyze(
            col_lo.row(y),
            &bank,
            &border,
            approximation.row_mut(y),
            vertical.row_mut(y),
        );
        analyze(
            col_hi.row(y),
            &bank,
            &border,
            horizontal.row_mut(y),
            diagonal.row_mut(y),
        );
    }

    SubBandSet::new(approximation, horizontal, vertical, diagonal, (w, h))
}

/// Single-level inverse transform: rows first, then columns. The output is
/// cropped to [`SubBandSet::source_dims`].
pub fn inverse(bands: &SubBandSet, wavelet: Wavelet, mode: BoundaryMode) -> Image<f64> {
    let bank = wavelet.filter_bank();
    let border = mode.border();
    let (bw, bh) = bands.band_dims();
    let (ext_w, ext_h) = (2 * bw, 2 * bh);

    let mut col_lo = Image::new_fill(ext_w, bh, 0.0f64);
    let mut col_hi = Image::new_fill(ext_w, bh, 0.0f64);
    for y in 0..bh {
        synthesize(
            bands.approximation().row(y),
            bands.vertical().row(y),
            &bank,
            &border,
            col_lo.row_mut(y),
        );
        synthesize(
            bands.horizontal().row(y),
            bands.diagonal().row(y),
            &bank,
            &border,
            col_hi.row_mut(y),
        );
    }

    let mut ext = Image::new_fill(ext_w, ext_h, 0.0f64);
    let mut lo = vec![0.0f64; bh];
    let mut hi = vec![0.0f64; bh];
    let mut column = vec![0.0f64; ext_h];
    for x in 0..ext_w {
        for y in 0..bh {
            lo[y] = col_lo.data()[y * ext_w + x];
            hi[y] = col_hi.data()[y * ext_w + x];
        }
        synthesize(&lo, &hi, &bank, &border, &mut column);
        for (y, &v) in column.iter().enumerate() {
            ext.data_mut()[y * ext_w + x] = v;
        }
    }

    crop(&ext, bands.source_dims())
}

/// Pads odd dimensions by repeating the last column and/or row.
fn extend_to_even(src: &ImageView<'_, f64>) -> Image<f64> {
    let (w, h) = (src.width(), src.height());
    if w.is_multiple_of(2) && h.is_multiple_of(2) {
        return src.to_image();
    }

    let ext_w = w + w % 2;
    let ext_h = h + h % 2;
    let mut out = Image::new_fill(ext_w, ext_h, 0.0f64);
    for y in 0..ext_h {
        let src_row = src.row(y.min(h - 1));
        let dst_row = out.row_mut(y);
        dst_row[..w].copy_from_slice(src_row);
        if ext_w > w {
            dst_row[w] = src_row[w - 1];
        }
    }
    out
}

fn crop(src: &Image<f64>, dims: (usize, usize)) -> Image<f64> {
    let (w, h) = dims;
    if src.dims() == dims {
        return src.clone();
    }

    let mut out = Image::new_fill(w, h, 0.0f64);
    for y in 0..h {
        out.row_mut(y).copy_from_slice(&src.row(y)[..w]);
    }
    out
}
