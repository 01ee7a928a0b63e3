use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use counterscan::detection::{DetectionOverlay, PredictionsFile, ReplayDetector};
use counterscan::editor::{EditorState, PointSetName};
use counterscan::render::{
    BoundingBoxLayer, annotation_pipeline, detection_pipeline_with, render_annotations,
};
use counterscan::{Config, RasterCanvas, Session, load_image, measure};

#[derive(Parser)]
#[command(name = "counterscan")]
#[command(about = "Measure countertops and spot kitchen fixtures in photos")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file (detection rules, display width, font)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Font for canvas labels (overrides the config file)
    #[arg(long, value_name = "FONT", global = true)]
    font: Option<PathBuf>,

    /// Save a snapshot after every render layer to directory (must be empty)
    #[arg(long, value_name = "DIR", global = true)]
    debug_out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay recorded outline edits on an image and render the measurements
    Annotate {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Recorded editor events
        #[arg(long, value_name = "JSON")]
        session: PathBuf,

        /// Where to write the rendered canvas
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,
    },
    /// Run the detector on an image and report fixture flags
    Detect {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Predictions exported from the detection model
        #[arg(long, value_name = "JSON")]
        predictions: PathBuf,

        /// Where to write the rendered canvas
        #[arg(short, long, value_name = "PNG")]
        output: PathBuf,

        /// Canvas width for detection (overrides the config file)
        #[arg(long)]
        display_width: Option<u32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let font_path = args.font.clone().or_else(|| config.font.clone());
    let font = font_path
        .as_deref()
        .map(RasterCanvas::load_font)
        .transpose()?;

    match args.command {
        Command::Annotate {
            image_path,
            session,
            output,
        } => {
            let image = Arc::new(load_image(&image_path)?);
            let session = Session::load(&session)?;
            let initial = EditorState::new().load_image(image.clone());
            let outcome = session.replay(initial)?;

            for (idx, err) in &outcome.rejected {
                eprintln!("Warning: event {} ignored: {}", idx + 1, err);
            }

            let state = outcome.state;
            let mut pipeline = annotation_pipeline();
            if let Some(dir) = args.debug_out {
                pipeline = pipeline.with_debug(dir)?;
            }

            let mut canvas = RasterCanvas::for_image(&image).with_font(font);
            render_annotations(&pipeline, &state, &mut canvas)?;
            save_canvas(canvas, &output)?;

            println!("\n=== Measurements ===");
            for (set, points) in state.points().iter() {
                print_outline(set, points);
            }
        }
        Command::Detect {
            image_path,
            predictions,
            output,
            display_width,
        } => {
            let mut overlay = DetectionOverlay::<ReplayDetector>::new(config.rules.clone())
                .with_display_width(display_width.or(config.display_width));
            overlay.load(&PredictionsFile::new(&predictions)).await;

            let image = load_image(&image_path)?;
            let report = overlay.upload(&image).await?;

            let mut pipeline = detection_pipeline_with(BoundingBoxLayer::from_config(&config));
            if let Some(dir) = args.debug_out {
                pipeline = pipeline.with_debug(dir)?;
            }
            let mut canvas = RasterCanvas::for_image(&report.canvas_image).with_font(font);
            pipeline.run(&mut canvas, &report)?;
            save_canvas(canvas, &output)?;

            println!("\n=== Detection Results ===");
            for flag in &report.flags {
                println!("{}: {}", flag.flag, flag.detected);
            }

            if args.verbose {
                println!("\nPredictions ({}):", report.predictions.len());
                for p in &report.predictions {
                    let [x, y, w, h] = p.bbox;
                    println!("  {} at ({:.0}, {:.0}) {:.0}x{:.0}", p.label(), x, y, w, h);
                }
            }
        }
    }

    Ok(())
}

fn save_canvas(canvas: RasterCanvas, output: &Path) -> anyhow::Result<()> {
    canvas
        .into_image()
        .save(output)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!("Saved {}", output.display());
    Ok(())
}

fn print_outline(set: PointSetName, points: &[counterscan::Point]) {
    println!("{} ({} points)", set, points.len());
    for (i, segment) in measure::segments(points).iter().enumerate() {
        let kind = if segment.closing { " (closing)" } else { "" };
        println!("  Segment {}: {}{}", i + 1, segment.label(), kind);
    }
}
