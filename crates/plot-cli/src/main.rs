//! `plotctl`: plot an SVG file on a serial-attached pen plotter.
//!
//! ```text
//! plotctl drawing.svg --port /dev/ttyACM0 --speed 50
//! plotctl drawing.svg --config plotter.toml --scale 0.5 --y-offset 10
//! ```
//!
//! Board calibration (steps per mm, pen positions, protocol dialect) comes
//! from a TOML config file; command-line flags override the handful of
//! per-run options. Logging is controlled through `RUST_LOG`.

use anyhow::Context;
use clap::Parser;
use plot_driver_ebb::{BoundsMode, EbbClient, EbbConfig, MotionPlanner, PenActuator};
use plot_engine::{PlotOptions, PlotOrchestrator};
use plot_svg::{extract_job, SvgError};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plotctl", about = "Plot an SVG file on a pen plotter", version)]
struct Args {
    /// SVG file to plot (text already converted to paths).
    svg: PathBuf,

    /// Board configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial port; overrides the config file.
    #[arg(long)]
    port: Option<String>,

    /// Pen-down drawing speed in mm/s. Travel moves run at twice this.
    #[arg(long, default_value_t = 50.0)]
    speed: f64,

    /// Uniform scale from SVG units to millimetres.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// X offset in millimetres, applied after scaling.
    #[arg(long, default_value_t = 0.0)]
    x_offset: f64,

    /// Y offset in millimetres, applied after scaling.
    #[arg(long, default_value_t = 0.0)]
    y_offset: f64,

    /// Canvas height for Y-axis inversion; overrides the SVG's viewBox.
    #[arg(long)]
    canvas_height: Option<f64>,

    /// Refuse moves outside the plotting area instead of warning.
    #[arg(long)]
    strict_bounds: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<EbbConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EbbConfig::default(),
    };
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.strict_bounds {
        config.bounds_mode = BoundsMode::Strict;
    }
    config.validate()?;

    let svg = std::fs::read_to_string(&args.svg)
        .with_context(|| format!("reading {}", args.svg.display()))?;
    let job = match extract_job(&svg, args.canvas_height) {
        Ok(job) => job,
        Err(SvgError::EmptyDrawing) => {
            warn!(file = %args.svg.display(), "nothing to plot");
            return Ok(());
        }
        Err(err) => return Err(err).context("extracting paths"),
    };
    info!(
        paths = job.paths().len(),
        bounds = %job.bounds(),
        "loaded drawing"
    );

    let client = EbbClient::connect(&config).await?;
    let motion = MotionPlanner::new(client.clone(), &config);
    let pen = PenActuator::new(client.clone(), &config);
    let options = PlotOptions {
        speed: args.speed,
        scale: args.scale,
        x_offset: args.x_offset,
        y_offset: args.y_offset,
    };

    let mut orchestrator = PlotOrchestrator::new(motion, pen, options)?;
    let result = orchestrator.run(&job).await;
    client.disconnect().await;

    let summary = result?;
    info!(
        paths = summary.paths_total,
        failed = summary.paths_failed,
        segments = summary.segments_drawn,
        "plot finished"
    );
    if summary.paths_failed > 0 {
        warn!(
            "{} of {} paths failed; see warnings above for the commands involved",
            summary.paths_failed, summary.paths_total
        );
    }
    Ok(())
}
