//! Video Segmentation CLI
//!
//! Fits per-pixel density models over an image sequence and renders a
//! foreground mask for one frame, either to a PNG or as a terminal
//! preview.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::info;

use video_segmentation::{
    ColorSpace, ConfigError, DensityEngine, FitMethod, FrameSource, JobConfig, Mask, MaskMode,
    Sequence, SequenceStats, SourceError, SyntheticSource,
};

/// Per-pixel temporal density estimation for static-camera foreground
/// segmentation.
#[derive(Debug, Parser)]
#[command(name = "video-segmentation", version, about)]
struct Args {
    /// Directory of frames to segment (png/jpg/jpeg, replayed in
    /// alphabetical order). Omit to run the synthetic demo scene.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fit method: mle or kde.
    #[arg(long)]
    method: Option<FitMethod>,

    /// Color space: ycbcr or hsl.
    #[arg(long)]
    color_space: Option<ColorSpace>,

    /// Frame index to segment.
    #[arg(long)]
    frame: Option<usize>,

    /// Log of the selection threshold.
    #[arg(long)]
    log_threshold: Option<f32>,

    /// Log of the region-growing threshold; enables hysteresis
    /// segmentation.
    #[arg(long)]
    grow_log_threshold: Option<f32>,

    /// Mask rendering: binary or graded.
    #[arg(long)]
    mode: Option<MaskMode>,

    /// Write the mask as a grayscale PNG here.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frame count for the synthetic demo scene.
    #[arg(long, default_value_t = 48)]
    demo_frames: usize,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Video Segmentation v{}", video_segmentation::VERSION);

    let config = match merged_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let sequence = match load_sequence(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load frames: {}", e);
            process::exit(1);
        }
    };

    let stats = SequenceStats::analyze(&sequence);
    let active = stats.deviation_map().iter().filter(|&&d| d > 0.5).count();
    info!(
        "Loaded {} frames of {}x{} ({} strongly active pixels)",
        sequence.len(),
        sequence.width(),
        sequence.height(),
        active
    );

    let mut engine = DensityEngine::new(config.engine);
    if let Err(e) = engine.fit(&sequence) {
        eprintln!("Fit failed: {}", e);
        process::exit(1);
    }

    let segment = config.segment;
    let result = match segment.grow_threshold() {
        Some(grow) => engine.spread_regions(segment.frame, segment.threshold(), grow),
        None => engine.mask(segment.frame, segment.threshold(), segment.mode),
    };
    let mask = match result {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Segmentation failed: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Frame {}: {} foreground pixels ({:.1}% coverage)",
        segment.frame,
        mask.foreground_count(),
        mask.coverage() * 100.0
    );

    match &args.output {
        Some(path) => write_output(path, &mask),
        None => print_mask_preview(&mask),
    }
}

/// File config (if any) with command-line overrides applied on top.
fn merged_config(args: &Args) -> Result<JobConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => JobConfig::from_file(path)?,
        None => JobConfig::default(),
    };

    if let Some(method) = args.method {
        config.engine.method = method;
    }
    if let Some(space) = args.color_space {
        config.engine.color_space = space;
    }
    if let Some(frame) = args.frame {
        config.segment.frame = frame;
    }
    if let Some(t) = args.log_threshold {
        config.segment.log_threshold = t;
    }
    if let Some(t) = args.grow_log_threshold {
        config.segment.grow_log_threshold = Some(t);
    }
    if let Some(mode) = args.mode {
        config.segment.mode = mode;
    }

    config.segment.validate()?;
    Ok(config)
}

fn load_sequence(args: &Args) -> Result<Sequence, SourceError> {
    match &args.input {
        Some(dir) => load_from_directory(dir),
        None => {
            info!("No input directory; using the synthetic demo scene");
            SyntheticSource::new(64, 48, args.demo_frames).frames()
        }
    }
}

#[cfg(feature = "image-io")]
fn load_from_directory(dir: &Path) -> Result<Sequence, SourceError> {
    video_segmentation::DirectoryLoader::new(dir).frames()
}

#[cfg(not(feature = "image-io"))]
fn load_from_directory(_dir: &Path) -> Result<Sequence, SourceError> {
    eprintln!("This build cannot read image files; rebuild with --features image-io");
    process::exit(1)
}

#[cfg(feature = "image-io")]
fn write_output(path: &Path, mask: &Mask) {
    if let Err(e) = video_segmentation::write_mask(path, mask) {
        eprintln!("Failed to write mask: {}", e);
        process::exit(1);
    }
    info!("Mask written to {}", path.display());
}

#[cfg(not(feature = "image-io"))]
fn write_output(_path: &Path, _mask: &Mask) {
    eprintln!("This build cannot write image files; rebuild with --features image-io");
    process::exit(1)
}

/// Rough terminal rendering for runs without an output path.
fn print_mask_preview(mask: &Mask) {
    if mask.width() > 96 {
        info!("Mask too wide for a terminal preview; pass --output to save it");
        return;
    }

    let mut art = String::with_capacity((mask.width() + 1) * mask.height());
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let alpha = mask.alpha(x, y).unwrap_or(0);
            art.push(match alpha {
                0 => '.',
                1..=127 => '+',
                _ => '#',
            });
        }
        art.push('\n');
    }
    print!("{art}");
}
