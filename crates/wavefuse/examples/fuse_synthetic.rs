//! Example: fuse two synthetic images that each carry half of a scene.
//!
//! The first image holds a horizontal gradient with vertical bars, the second
//! a vertical gradient with horizontal bars at a different size. Both are
//! written to a temporary directory, fused with every rule, and the output
//! paths plus value ranges are printed.
//!
//! Run from the workspace root:
//!   cargo run -p wavefuse --example fuse_synthetic
//!   RUST_LOG=debug cargo run -p wavefuse --example fuse_synthetic

use anyhow::{Context, Result};
use wavefuse::{
    FsImageIo, FusionConfig, FusionPipeline, FusionRule, Image, ImageIo, OutputFormat,
};

fn scene(width: usize, height: usize, vertical_bars: bool) -> Result<Image<u8>> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let (along, len) = if vertical_bars { (x, width) } else { (y, height) };
            let ramp = (along * 160 / len.max(1)) as u8;
            let bar = if (along / 16) % 2 == 0 { 80 } else { 0 };
            data.push(ramp.saturating_add(bar));
        }
    }
    Image::from_vec(width, height, data).context("building synthetic scene")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let dir = tempfile::tempdir().context("creating temp dir")?;
    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");

    let io = FsImageIo::default();
    io.encode(&scene(320, 240, true)?, &first, OutputFormat::Png)?;
    io.encode(&scene(200, 150, false)?, &second, OutputFormat::Png)?;

    let config = FusionConfig {
        output_dir: dir.path().to_path_buf(),
        format: OutputFormat::Png,
        ..FusionConfig::default()
    };
    let pipeline = FusionPipeline::new(config);

    for rule in FusionRule::ALL {
        let report = pipeline.fuse_with_report(&first, &second, rule, None)?;
        let fused = io.decode_grayscale(&report.output)?;
        let lo = fused.data().iter().copied().min().unwrap_or(0);
        let hi = fused.data().iter().copied().max().unwrap_or(0);
        println!(
            "{rule:<4} -> {} ({}x{}, values {lo}..={hi}, {} ms)",
            report.output.display(),
            report.width,
            report.height,
            report.elapsed_ms
        );
    }

    Ok(())
}
