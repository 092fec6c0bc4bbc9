use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use wf_dwt::Wavelet;
use wf_fusion::{FusionConfig, FusionPipeline, FusionRule, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "wavefuse")]
#[command(about = "Fuse two grayscale images in the wavelet domain")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuse two images and print the output path.
    #[command(name = "fuse")]
    Fuse(FuseArgs),
    /// List the supported wavelet families.
    #[command(name = "wavelets")]
    Wavelets(WaveletsArgs),
}

#[derive(Args, Debug, Clone)]
struct FuseArgs {
    /// First image; the output takes its dimensions.
    first: PathBuf,
    /// Second image; resampled to the first one's size when needed.
    second: PathBuf,
    /// mean, min or max.
    #[arg(long)]
    rule: Option<String>,
    /// Wavelet family (haar, db1 .. db5).
    #[arg(long)]
    wavelet: Option<Wavelet>,
    /// Directory for generated output names.
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Explicit output path; overrides --out-dir.
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// JSON file with `FusionConfig` fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write a JSON summary of the run to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct WaveletsArgs {
    /// Print the table as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    #[value(alias = "jpg")]
    Jpeg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WaveletDto {
    name: &'static str,
    vanishing_moments: usize,
    filter_len: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Fuse(args) => {
            let output = run_fuse(args)?;
            println!("{}", output.display());
        }
        Command::Wavelets(args) => println!("{}", wavelet_table(args.json)?),
    }
    Ok(())
}

/// Runs one fusion and returns the path of the written image.
fn run_fuse(args: FuseArgs) -> Result<PathBuf> {
    let config = build_config(&args)?;
    let rule = match &args.rule {
        Some(name) => name.parse::<FusionRule>()?,
        None => config.rule,
    };

    match &args.output {
        Some(output) => {
            let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
            if let Some(parent) = parent {
                create_dir(parent)?;
            }
        }
        None => create_dir(&config.output_dir)?,
    }

    let pipeline = FusionPipeline::new(config);
    let report = pipeline
        .fuse_with_report(&args.first, &args.second, rule, args.output.as_deref())
        .with_context(|| {
            format!(
                "fusing {} and {}",
                args.first.display(),
                args.second.display()
            )
        })?;

    if let Some(path) = &args.report {
        write_json(path, &report)?;
    }
    Ok(report.output)
}

fn build_config(args: &FuseArgs) -> Result<FusionConfig> {
    let mut config = match &args.config {
        Some(path) => FusionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FusionConfig::default(),
    };
    if let Some(wavelet) = args.wavelet {
        config.wavelet = wavelet;
    }
    if let Some(dir) = &args.out_dir {
        config.output_dir = dir.clone();
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }
    Ok(config)
}

fn wavelet_table(json: bool) -> Result<String> {
    let rows: Vec<WaveletDto> = Wavelet::ALL
        .iter()
        .map(|w| WaveletDto {
            name: w.name(),
            vanishing_moments: w.order(),
            filter_len: w.filter_len(),
        })
        .collect();
    if json {
        return serde_json::to_string_pretty(&rows).context("serializing json");
    }
    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{:<4} vanishing_moments={} filter_len={}",
                row.name, row.vanishing_moments, row.filter_len
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}
