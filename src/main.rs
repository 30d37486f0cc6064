use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use phenotyper::annotate::{annotate, Overlay};
use phenotyper::storage::{ReportRecord, ReportStore};
use phenotyper::{config, history, render, ImageDimensions, LandmarkSet, MeasurementReport, Pipeline};

#[derive(Parser)]
#[command(name = "phenotyper")]
#[command(version, about = "Facial phenotype measurement from face mesh landmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect a face in a photo and measure it
    Analyze {
        /// Photo to analyse (JPEG, PNG, WebP, ...)
        image: PathBuf,
        /// Subject the report belongs to (defaults to current user)
        #[arg(short, long)]
        subject: Option<String>,
        /// Append the report to the subject's history
        #[arg(long)]
        save: bool,
        /// Write the photo with landmarks drawn on it to this path
        #[arg(long, value_name = "PATH")]
        annotate: Option<PathBuf>,
        /// Only draw the landmarks the measurements use
        #[arg(long, requires = "annotate")]
        measured_only: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Measure a landmark set read from a JSON file
    Measure {
        /// JSON array of normalized points, `{"x":..,"y":..}` or `[x, y(, z)]`
        landmarks: PathBuf,
        /// Width in pixels of the frame the landmarks were detected on
        #[arg(long)]
        width: u32,
        /// Height in pixels of the frame the landmarks were detected on
        #[arg(long)]
        height: u32,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a subject's saved reports
    History {
        /// Subject to summarize (defaults to current user)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Remove all saved reports for a subject
    Purge {
        /// Subject to purge (defaults to current user)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(None)?;
    let store = ReportStore::default();

    let default_subject = env::var("SUDO_USER")
        .or_else(|_| env::var("USER"))
        .unwrap_or_else(|_| "default".to_string());

    match cli.command {
        Commands::Analyze {
            image,
            subject,
            save,
            annotate,
            measured_only,
            json,
        } => {
            let subject = subject.unwrap_or(default_subject);
            let overlay = if measured_only {
                Overlay::Measured
            } else {
                Overlay::All
            };
            analyze(
                &cfg,
                &store,
                &image,
                save.then_some(subject.as_str()),
                annotate.as_deref().map(|path| (path, overlay)),
                json,
            )
        }
        Commands::Measure {
            landmarks,
            width,
            height,
            json,
        } => measure(&cfg, &landmarks, ImageDimensions::new(width, height), json),
        Commands::History { subject } => {
            let subject = subject.unwrap_or(default_subject);
            show_history(&cfg, &store, &subject)
        }
        Commands::Purge { subject } => {
            let subject = subject.unwrap_or(default_subject);
            purge(&store, &subject)
        }
        Commands::Config => open_config(),
    }
}

fn print_report(cfg: &config::Config, report: &MeasurementReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", render::render_report(report, cfg.locale));
    }
    Ok(())
}

fn analyze(
    cfg: &config::Config,
    store: &ReportStore,
    image: &Path,
    save_as: Option<&str>,
    annotate_to: Option<(&Path, Overlay)>,
    json: bool,
) -> Result<()> {
    info!("Analysing {}", image.display());

    let bytes = std::fs::read(image).with_context(|| format!("reading {}", image.display()))?;

    let mut pipeline = Pipeline::with_face_mesh(&cfg.mesh_model, cfg.min_face_confidence)
        .context("Failed to initialize face measurement pipeline")?
        .with_max_dimension(cfg.max_image_dimension);

    let analysis = pipeline.analyze_bytes(&bytes)?;

    if let Some((path, overlay)) = annotate_to {
        match &analysis.landmarks {
            Some(landmarks) => {
                annotate(&analysis.image, landmarks, overlay, cfg.annotation_radius)
                    .save(path)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!("Annotated image written to {}", path.display());
            }
            None => warn!("No face detected, skipping annotation"),
        }
    }

    print_report(cfg, &analysis.report, json)?;

    if let Some(subject) = save_as {
        let record = ReportRecord::new(image.display().to_string(), analysis.report);
        store
            .save_record(subject, record)
            .context("Failed to save report")?;
        info!("✓ Report saved for subject: {}", subject);
    }

    Ok(())
}

fn measure(cfg: &config::Config, path: &Path, dims: ImageDimensions, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let landmarks: LandmarkSet = serde_json::from_str(&raw)
        .with_context(|| format!("parsing landmarks {}", path.display()))?;

    info!(
        "Measuring {} landmarks on a {}x{} frame",
        landmarks.len(),
        dims.width,
        dims.height
    );

    let report = MeasurementReport::from_detection(Some(&landmarks), dims);
    print_report(cfg, &report, json)
}

fn show_history(cfg: &config::Config, store: &ReportStore, subject: &str) -> Result<()> {
    info!("History for subject: {}", subject);

    let records = store
        .load_records(subject)
        .context("Failed to load reports")?;
    let summary = history::summarize(&records);
    println!("{}", render::render_summary(&summary, cfg.locale));
    Ok(())
}

fn purge(store: &ReportStore, subject: &str) -> Result<()> {
    info!("Purging saved reports for subject: {}", subject);

    store.purge(subject).context("Failed to purge reports")?;

    info!("✓ All reports purged for subject: {}", subject);
    Ok(())
}

fn open_config() -> Result<()> {
    let config_path = config::CONFIG_PATH.as_os_str();
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
