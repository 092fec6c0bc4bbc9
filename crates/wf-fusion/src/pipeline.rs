use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use wf_core::{Image, to_f64};
use wf_dwt::{BoundaryMode, PeriodizedDwt, Wavelet, WaveletTransform};

use crate::io::unique_output_path;
use crate::normalize::normalize_to_u8;
use crate::rule::fuse_subbands;
use crate::{FsImageIo, FusionConfig, FusionError, FusionRule, ImageIo, OutputFormat, Stage};

/// In-memory result of fusing two decoded images.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    pub image: Image<u8>,
    /// The reconstruction had no dynamic range and was replaced by a
    /// constant fill.
    pub degenerate: bool,
    /// The second image had to be resampled to the first one's size.
    pub resized_second: bool,
}

/// Summary of one file-to-file fusion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionReport {
    pub first: PathBuf,
    pub second: PathBuf,
    pub output: PathBuf,
    pub rule: FusionRule,
    pub wavelet: Wavelet,
    pub boundary: BoundaryMode,
    pub width: usize,
    pub height: usize,
    pub second_original_size: [usize; 2],
    pub degenerate: bool,
    pub elapsed_ms: u128,
}

struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    fn check(&self, stage: Stage) -> Result<(), FusionError> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let elapsed = self.start.elapsed();
        if elapsed >= limit {
            return Err(FusionError::Timeout { stage, elapsed });
        }
        Ok(())
    }
}

/// Load, align, transform, fuse, reconstruct, normalize and persist.
///
/// The pipeline holds no mutable state; one instance may serve concurrent
/// calls when its collaborators allow it.
#[derive(Debug, Clone)]
pub struct FusionPipeline<W = PeriodizedDwt, I = FsImageIo> {
    transform: W,
    io: I,
    config: FusionConfig,
}

impl FusionPipeline {
    /// Pipeline over [`PeriodizedDwt`] and the filesystem.
    pub fn new(config: FusionConfig) -> Self {
        let io = FsImageIo::new(config.resize_filter);
        Self::with_parts(PeriodizedDwt, io, config)
    }
}

impl Default for FusionPipeline {
    fn default() -> Self {
        Self::new(FusionConfig::default())
    }
}

impl<W: WaveletTransform, I: ImageIo> FusionPipeline<W, I> {
    pub fn with_parts(transform: W, io: I, config: FusionConfig) -> Self {
        Self {
            transform,
            io,
            config,
        }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuses two image files and writes the result under
    /// [`FusionConfig::output_dir`] with a generated unique name.
    pub fn fuse(
        &self,
        first: &Path,
        second: &Path,
        rule: FusionRule,
    ) -> Result<PathBuf, FusionError> {
        self.fuse_with_report(first, second, rule, None)
            .map(|report| report.output)
    }

    /// Like [`fuse`](Self::fuse) but writes to the caller-supplied `output`.
    pub fn fuse_to(
        &self,
        first: &Path,
        second: &Path,
        rule: FusionRule,
        output: &Path,
    ) -> Result<PathBuf, FusionError> {
        self.fuse_with_report(first, second, rule, Some(output))
            .map(|report| report.output)
    }

    /// Parses `rule_name` before touching any file, then behaves like
    /// [`fuse`](Self::fuse).
    pub fn fuse_named(
        &self,
        first: &Path,
        second: &Path,
        rule_name: &str,
    ) -> Result<PathBuf, FusionError> {
        let rule = rule_name.parse::<FusionRule>()?;
        self.fuse(first, second, rule)
    }

    pub fn fuse_with_report(
        &self,
        first: &Path,
        second: &Path,
        rule: FusionRule,
        output: Option<&Path>,
    ) -> Result<FusionReport, FusionError> {
        let deadline = Deadline::new(self.config.deadline());
        let (output, format) = self.resolve_output(output)?;

        let img1 = self.io.decode_grayscale(first)?;
        let img2 = self.io.decode_grayscale(second)?;
        tracing::debug!(
            "loaded {} ({}x{}) and {} ({}x{})",
            first.display(),
            img1.width(),
            img1.height(),
            second.display(),
            img2.width(),
            img2.height()
        );

        let outcome = self.fuse_within(&img1, &img2, rule, &deadline)?;

        self.io.encode(&outcome.image, &output, format)?;

        let elapsed = deadline.start.elapsed();
        tracing::info!(
            "fused {} + {} -> {} ({}x{}, rule={}, wavelet={}) in {:.1} ms",
            first.display(),
            second.display(),
            output.display(),
            outcome.image.width(),
            outcome.image.height(),
            rule,
            self.config.wavelet,
            elapsed.as_secs_f64() * 1e3
        );

        Ok(FusionReport {
            first: first.to_path_buf(),
            second: second.to_path_buf(),
            output,
            rule,
            wavelet: self.config.wavelet,
            boundary: self.config.boundary,
            width: outcome.image.width(),
            height: outcome.image.height(),
            second_original_size: [img2.width(), img2.height()],
            degenerate: outcome.degenerate,
            elapsed_ms: elapsed.as_millis(),
        })
    }

    /// Picks the output path and its encoder. An explicit path without an
    /// extension gets the configured one; an extension no encoder handles is
    /// rejected before any image is read.
    fn resolve_output(
        &self,
        output: Option<&Path>,
    ) -> Result<(PathBuf, OutputFormat), FusionError> {
        let Some(path) = output else {
            let format = self.config.format;
            return Ok((unique_output_path(&self.config.output_dir, format), format));
        };

        match path.extension() {
            None => {
                let format = self.config.format;
                Ok((path.with_extension(format.extension()), format))
            }
            Some(ext) => match OutputFormat::from_path(path) {
                Some(format) => Ok((path.to_path_buf(), format)),
                None => Err(FusionError::ImageWrite {
                    path: path.to_path_buf(),
                    reason: format!(
                        "unsupported output extension '{}' (expected jpg, jpeg or png)",
                        ext.to_string_lossy()
                    ),
                }),
            },
        }
    }

    /// Fuses two decoded images. The output always has `first`'s dimensions.
    pub fn fuse_images(
        &self,
        first: &Image<u8>,
        second: &Image<u8>,
        rule: FusionRule,
    ) -> Result<FusionOutcome, FusionError> {
        self.fuse_within(first, second, rule, &Deadline::new(self.config.deadline()))
    }

    fn fuse_within(
        &self,
        first: &Image<u8>,
        second: &Image<u8>,
        rule: FusionRule,
        deadline: &Deadline,
    ) -> Result<FusionOutcome, FusionError> {
        if first.is_empty() {
            return Err(FusionError::InvalidImage {
                role: "first",
                width: first.width(),
                height: first.height(),
            });
        }
        if second.is_empty() {
            return Err(FusionError::InvalidImage {
                role: "second",
                width: second.width(),
                height: second.height(),
            });
        }

        let (w, h) = first.dims();
        let resized_second = second.dims() != (w, h);
        let aligned;
        let second = if resized_second {
            tracing::debug!(
                "resizing second image {}x{} -> {}x{}",
                second.width(),
                second.height(),
                w,
                h
            );
            aligned = self.io.resize(second, w, h);
            &aligned
        } else {
            second
        };

        let (wavelet, mode) = (self.config.wavelet, self.config.boundary);
        let bands1 = self
            .transform
            .forward(&to_f64(&first.as_view()).as_view(), wavelet, mode)?;
        let bands2 = self
            .transform
            .forward(&to_f64(&second.as_view()).as_view(), wavelet, mode)?;
        tracing::debug!(
            "forward {wavelet}/{mode}: bands {}x{}",
            bands1.band_dims().0,
            bands1.band_dims().1
        );
        deadline.check(Stage::Forward)?;

        let fused = fuse_subbands(&bands1, &bands2, rule)?;
        deadline.check(Stage::Fuse)?;

        let raw = self.transform.inverse(&fused, wavelet, mode)?;
        deadline.check(Stage::Inverse)?;

        if raw.dims() != (w, h) {
            return Err(wf_core::Error::DimensionMismatch {
                expected: (w, h),
                actual: raw.dims(),
            }
            .into());
        }

        let (image, degenerate) = match normalize_to_u8(&raw) {
            Ok(image) => (image, false),
            Err(flat) => {
                tracing::warn!(
                    "{flat}; writing constant {} instead",
                    self.config.degenerate_fill
                );
                (Image::new_fill(w, h, self.config.degenerate_fill), true)
            }
        };

        Ok(FusionOutcome {
            image,
            degenerate,
            resized_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use wf_core::{Image, ImageView};
    use wf_dwt::{BoundaryMode, Error as DwtError, SubBandSet, Wavelet, WaveletTransform};

    use super::FusionPipeline;
    use crate::{
        FsImageIo, FusionConfig, FusionError, FusionRule, ImageIo, LoadFailure, OutputFormat,
        Stage,
    };

    /// Approximation = every other sample, details = 0; the inverse repeats
    /// each approximation sample over a 2x2 block.
    struct BlockTransform;

    impl WaveletTransform for BlockTransform {
        fn forward(
            &self,
            image: &ImageView<'_, f64>,
            _wavelet: Wavelet,
            _mode: BoundaryMode,
        ) -> Result<SubBandSet, DwtError> {
            let (w, h) = (image.width(), image.height());
            let (bw, bh) = (w.div_ceil(2), h.div_ceil(2));
            let mut approx = Image::new_fill(bw, bh, 0.0f64);
            for y in 0..bh {
                for x in 0..bw {
                    approx.row_mut(y)[x] = image.row(2 * y)[2 * x];
                }
            }
            let zero = Image::new_fill(bw, bh, 0.0f64);
            SubBandSet::new(approx, zero.clone(), zero.clone(), zero, (w, h))
        }

        fn inverse(
            &self,
            bands: &SubBandSet,
            _wavelet: Wavelet,
            _mode: BoundaryMode,
        ) -> Result<Image<f64>, DwtError> {
            let (w, h) = bands.source_dims();
            let mut out = Image::new_fill(w, h, 0.0f64);
            for y in 0..h {
                for x in 0..w {
                    out.row_mut(y)[x] = bands.approximation().row(y / 2)[x / 2];
                }
            }
            Ok(out)
        }
    }

    #[derive(Default)]
    struct MemoryIo {
        inputs: HashMap<PathBuf, Image<u8>>,
        written: RefCell<Vec<(PathBuf, OutputFormat, Image<u8>)>>,
    }

    impl MemoryIo {
        fn with(mut self, path: &str, img: Image<u8>) -> Self {
            self.inputs.insert(PathBuf::from(path), img);
            self
        }
    }

    impl ImageIo for MemoryIo {
        fn decode_grayscale(&self, path: &Path) -> Result<Image<u8>, FusionError> {
            self.inputs
                .get(path)
                .cloned()
                .ok_or_else(|| FusionError::ImageLoad {
                    path: path.to_path_buf(),
                    reason: LoadFailure::NotFound,
                })
        }

        fn resize(&self, image: &Image<u8>, width: usize, height: usize) -> Image<u8> {
            wf_core::resize(&image.as_view(), width, height, Default::default())
        }

        fn encode(
            &self,
            image: &Image<u8>,
            path: &Path,
            format: OutputFormat,
        ) -> Result<(), FusionError> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), format, image.clone()));
            Ok(())
        }
    }

    fn split_image(width: usize, height: usize, left: u8, right: u8) -> Image<u8> {
        let mut img = Image::new_fill(width, height, left);
        for y in 0..height {
            img.row_mut(y)[width / 2..].fill(right);
        }
        img
    }

    #[test]
    fn stub_transform_drives_fusion_and_normalization() {
        let pipeline = FusionPipeline::with_parts(
            BlockTransform,
            MemoryIo::default(),
            FusionConfig::default(),
        );
        let first = split_image(4, 4, 0, 100);
        let second = Image::new_fill(4, 4, 50u8);

        let mean = pipeline
            .fuse_images(&first, &second, FusionRule::Mean)
            .expect("fusion");
        // Fused approximation is 25 | 75, stretched to 0 | 255.
        assert!(!mean.degenerate);
        assert_eq!(mean.image.row(0), &[0, 0, 255, 255]);

        let min = pipeline
            .fuse_images(&first, &second, FusionRule::Min)
            .expect("fusion");
        assert_eq!(min.image.row(3), &[0, 0, 255, 255]);

        let max = pipeline
            .fuse_images(&first, &second, FusionRule::Max)
            .expect("fusion");
        assert_eq!(max.image.row(1), &[0, 0, 255, 255]);
    }

    #[test]
    fn zero_and_full_white_mean_is_mid_gray() {
        let pipeline = FusionPipeline::new(FusionConfig::default());
        let black = Image::new_fill(256, 256, 0u8);
        let white = Image::new_fill(256, 256, 255u8);

        let out = pipeline
            .fuse_images(&black, &white, FusionRule::Mean)
            .expect("fusion");
        assert_eq!(out.image.dims(), (256, 256));
        assert!(out.image.data().iter().all(|&v| (120..=135).contains(&v)));
    }

    #[test]
    fn identical_constant_inputs_fall_back_to_fill() {
        let config = FusionConfig {
            degenerate_fill: 0,
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::new(config);
        let flat = Image::new_fill(31, 17, 90u8);

        for rule in FusionRule::ALL {
            let out = pipeline.fuse_images(&flat, &flat, rule).expect("fusion");
            assert!(out.degenerate, "{rule}");
            assert!(out.image.data().iter().all(|&v| v == 0), "{rule}");
        }
    }

    #[test]
    fn output_takes_first_image_dimensions() {
        let pipeline = FusionPipeline::new(FusionConfig::default());
        let data = (0..20 * 12).map(|i| (i % 200) as u8).collect();
        let first = Image::from_vec(20, 12, data).expect("valid image");

        for (w, h) in [(7, 9), (40, 3), (20, 12), (1, 1)] {
            let second = Image::new_fill(w, h, 30u8);
            let out = pipeline
                .fuse_images(&first, &second, FusionRule::Max)
                .expect("fusion");
            assert_eq!(out.image.dims(), (20, 12));
            assert_eq!(out.resized_second, (w, h) != (20, 12));
        }
    }

    #[test]
    fn real_content_spans_full_range() {
        let pipeline = FusionPipeline::new(FusionConfig::default());
        let first = split_image(33, 21, 10, 240);
        let second = Image::from_vec(
            33,
            21,
            (0..33 * 21).map(|i| ((i * 7) % 256) as u8).collect(),
        )
        .expect("valid image");

        let out = pipeline
            .fuse_images(&first, &second, FusionRule::Mean)
            .expect("fusion");
        assert!(!out.degenerate);
        assert_eq!(out.image.data().iter().copied().min(), Some(0));
        assert_eq!(out.image.data().iter().copied().max(), Some(255));
    }

    #[test]
    fn empty_first_image_is_invalid() {
        let pipeline = FusionPipeline::new(FusionConfig::default());
        let err = pipeline
            .fuse_images(
                &Image::new_fill(0, 5, 0u8),
                &Image::new_fill(4, 4, 0u8),
                FusionRule::Mean,
            )
            .expect_err("empty input");
        assert!(matches!(err, FusionError::InvalidImage { role: "first", .. }));
    }

    #[test]
    fn files_are_fused_to_generated_and_explicit_paths() {
        let io = MemoryIo::default()
            .with("a.png", split_image(8, 8, 0, 200))
            .with("b.png", Image::new_fill(5, 5, 60u8));
        let config = FusionConfig {
            output_dir: PathBuf::from("results"),
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::with_parts(BlockTransform, io, config);

        let generated = pipeline
            .fuse(Path::new("a.png"), Path::new("b.png"), FusionRule::Mean)
            .expect("fusion");
        assert_eq!(generated.parent(), Some(Path::new("results")));

        let explicit = pipeline
            .fuse_to(
                Path::new("a.png"),
                Path::new("b.png"),
                FusionRule::Max,
                Path::new("fixed/out.png"),
            )
            .expect("fusion");
        assert_eq!(explicit, PathBuf::from("fixed/out.png"));

        let written = pipeline.io.written.borrow();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].1, OutputFormat::Jpeg);
        assert_eq!(written[1].1, OutputFormat::Png);
        assert_eq!(written[1].2.dims(), (8, 8));
    }

    #[test]
    fn unsupported_output_extension_fails_before_decoding() {
        // Inputs are absent: a load error here would mean decoding ran first.
        let pipeline =
            FusionPipeline::with_parts(BlockTransform, MemoryIo::default(), FusionConfig::default());

        let err = pipeline
            .fuse_to(
                Path::new("a.png"),
                Path::new("b.png"),
                FusionRule::Mean,
                Path::new("out.bmp"),
            )
            .expect_err("unsupported extension");
        match err {
            FusionError::ImageWrite { path, reason } => {
                assert_eq!(path, PathBuf::from("out.bmp"));
                assert!(reason.contains("bmp"), "{reason}");
            }
            other => panic!("expected ImageWrite, got {other:?}"),
        }
        assert!(pipeline.io.written.borrow().is_empty());
    }

    #[test]
    fn extensionless_output_gets_configured_extension() {
        let io = MemoryIo::default()
            .with("a.png", split_image(4, 4, 0, 9))
            .with("b.png", Image::new_fill(4, 4, 3u8));
        let config = FusionConfig {
            format: OutputFormat::Png,
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::with_parts(BlockTransform, io, config);

        let out = pipeline
            .fuse_to(
                Path::new("a.png"),
                Path::new("b.png"),
                FusionRule::Min,
                Path::new("results/fused"),
            )
            .expect("fusion");
        assert_eq!(out, PathBuf::from("results/fused.png"));

        let written = pipeline.io.written.borrow();
        assert_eq!(written[0].0, out);
        assert_eq!(written[0].1, OutputFormat::Png);
    }

    #[test]
    fn unknown_rule_name_fails_before_any_io() {
        let io = MemoryIo::default()
            .with("a.png", Image::new_fill(4, 4, 1u8))
            .with("b.png", Image::new_fill(4, 4, 2u8));
        let pipeline = FusionPipeline::with_parts(BlockTransform, io, FusionConfig::default());

        let err = pipeline
            .fuse_named(Path::new("a.png"), Path::new("b.png"), "median")
            .expect_err("unsupported rule");
        assert!(matches!(err, FusionError::UnsupportedFusionRule(_)));
        assert!(pipeline.io.written.borrow().is_empty());
    }

    #[test]
    fn missing_input_aborts_without_output() {
        let io = MemoryIo::default().with("a.png", Image::new_fill(4, 4, 1u8));
        let pipeline = FusionPipeline::with_parts(BlockTransform, io, FusionConfig::default());

        let err = pipeline
            .fuse(Path::new("a.png"), Path::new("missing.png"), FusionRule::Mean)
            .expect_err("missing input");
        assert!(matches!(
            err,
            FusionError::ImageLoad {
                reason: LoadFailure::NotFound,
                ..
            }
        ));
        assert!(pipeline.io.written.borrow().is_empty());
    }

    #[test]
    fn expired_deadline_stops_after_forward_transform() {
        let io = MemoryIo::default()
            .with("a.png", Image::new_fill(4, 4, 1u8))
            .with("b.png", Image::new_fill(4, 4, 2u8));
        let config = FusionConfig {
            deadline_ms: Some(0),
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::with_parts(BlockTransform, io, config);

        let err = pipeline
            .fuse(Path::new("a.png"), Path::new("b.png"), FusionRule::Mean)
            .expect_err("deadline");
        assert!(matches!(
            err,
            FusionError::Timeout {
                stage: Stage::Forward,
                ..
            }
        ));
        assert!(pipeline.io.written.borrow().is_empty());
    }

    #[test]
    fn end_to_end_on_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let io = FsImageIo::default();
        io.encode(&Image::new_fill(64, 48, 0u8), &a, OutputFormat::Png)
            .expect("write fixture");
        io.encode(&Image::new_fill(30, 30, 255u8), &b, OutputFormat::Png)
            .expect("write fixture");

        let config = FusionConfig {
            output_dir: dir.path().to_path_buf(),
            format: OutputFormat::Png,
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::new(config);
        let report = pipeline
            .fuse_with_report(&a, &b, FusionRule::Mean, None)
            .expect("fusion");

        assert_eq!((report.width, report.height), (64, 48));
        assert_eq!(report.second_original_size, [30, 30]);
        assert!(report.degenerate);

        let fused = io.decode_grayscale(&report.output).expect("read output");
        assert_eq!(fused.dims(), (64, 48));
        assert!(fused.data().iter().all(|&v| (120..=135).contains(&v)));

        let files = fs::read_dir(dir.path()).expect("list dir").count();
        assert_eq!(files, 3);
    }

    #[test]
    fn bmp_output_is_rejected_and_nothing_is_written() {
        let dir = tempfile::tempdir().expect("temp dir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        let io = FsImageIo::default();
        io.encode(&split_image(16, 16, 0, 200), &a, OutputFormat::Png)
            .expect("write fixture");
        io.encode(&Image::new_fill(16, 16, 90u8), &b, OutputFormat::Png)
            .expect("write fixture");

        let pipeline = FusionPipeline::new(FusionConfig::default());
        let target = dir.path().join("out.bmp");
        let err = pipeline
            .fuse_to(&a, &b, FusionRule::Mean, &target)
            .expect_err("bmp is not an output format");
        assert!(matches!(err, FusionError::ImageWrite { .. }));
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 2);
    }

    #[test]
    fn unsupported_rule_writes_nothing_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = FusionConfig {
            output_dir: dir.path().to_path_buf(),
            ..FusionConfig::default()
        };
        let pipeline = FusionPipeline::new(config);
        let err = pipeline
            .fuse_named(
                &dir.path().join("a.png"),
                &dir.path().join("b.png"),
                "blend",
            )
            .expect_err("unsupported rule");
        assert!(matches!(err, FusionError::UnsupportedFusionRule(_)));
        assert_eq!(fs::read_dir(dir.path()).expect("list dir").count(), 0);
    }
}
