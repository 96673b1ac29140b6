//! motfix: an editing engine for multi-object-tracking annotations.
//!
//! A dataset is a set of tracks (identity, class label, display color) and
//! per-frame detections bound to them. motfix corrects such datasets by
//! merging falsely-split tracks, splitting falsely-merged ones and
//! relabeling tracks, while keeping every detection bound to an existing
//! track.
//!
//! # Modules
//!
//! - [`model`]: Tracks, detections, documents and their JSON/YAML encodings
//! - [`validation`]: The import gate and the dataset audit
//! - [`edit`]: Merge, split, relabel, selection and label suggestions
//! - [`store`]: The state container every edit goes through
//! - [`sample`]: The bundled demo dataset
//! - [`error`]: Error types for motfix operations

pub mod edit;
pub mod error;
pub mod model;
pub mod sample;
pub mod store;
pub mod validation;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::MotfixError;
pub use store::{Store, StoreOptions};

use edit::Edit;
use model::{DocumentFormat, TrackId};
use store::DEFAULT_TOTAL_FRAMES;

/// The motfix CLI application.
#[derive(Parser)]
#[command(name = "motfix")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Number of frames in the sequence.
    #[arg(
        long,
        global = true,
        env = "MOTFIX_TOTAL_FRAMES",
        default_value_t = DEFAULT_TOTAL_FRAMES,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    total_frames: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check a dataset document and audit it for errors and warnings.
    Validate(ValidateArgs),
    /// Write the bundled demo dataset.
    Sample(SampleArgs),
    /// List tracks, or the detections on one frame.
    Tracks(TracksArgs),
    /// Merge tracks into the lexicographically smallest one.
    Merge(MergeArgs),
    /// Move a track's detections from a frame onwards to a new track.
    Split(SplitArgs),
    /// Set the label of a track and all of its detections.
    Relabel(RelabelArgs),
    /// Suggest existing labels matching some text.
    Suggest(SuggestArgs),
    /// Apply a JSON edit script.
    Apply(ApplyArgs),
}

/// Where to read a document from.
#[derive(clap::Args)]
struct InputArgs {
    /// Input dataset document.
    input: PathBuf,

    /// Input format ('json' or 'yaml'); defaults to the file extension.
    #[arg(long)]
    format: Option<String>,
}

/// Where to write a document to.
#[derive(clap::Args)]
struct OutputArgs {
    /// Output dataset document.
    #[arg(short, long)]
    output: PathBuf,

    /// Output format ('json' or 'yaml'); defaults to the file extension.
    #[arg(long)]
    output_format: Option<String>,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(clap::Args)]
struct SampleArgs {
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args)]
struct TracksArgs {
    #[command(flatten)]
    input: InputArgs,

    /// List the detections on this frame instead of the tracks.
    #[arg(long)]
    frame: Option<u32>,
}

#[derive(clap::Args)]
struct MergeArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Tracks to merge.
    #[arg(required = true, num_args = 1..)]
    tracks: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args)]
struct SplitArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Track to split.
    track: String,

    /// First frame that moves to the new track.
    #[arg(long)]
    frame: u32,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args)]
struct RelabelArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Track to relabel.
    track: String,

    /// New label (surrounding whitespace is trimmed).
    label: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(clap::Args)]
struct SuggestArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Text typed so far.
    text: String,
}

#[derive(clap::Args)]
struct ApplyArgs {
    #[command(flatten)]
    input: InputArgs,

    /// JSON array of edits, e.g. [{"op": "toggle", "track": "T2"}, {"op": "merge"}].
    #[arg(long)]
    script: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

/// Run the motfix CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), MotfixError> {
    let cli = Cli::parse();
    let options = StoreOptions {
        total_frames: cli.total_frames,
        ..Default::default()
    };

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args, options),
        Some(Commands::Sample(args)) => run_sample(args, options),
        Some(Commands::Tracks(args)) => run_tracks(args, options),
        Some(Commands::Merge(args)) => run_merge(args, options),
        Some(Commands::Split(args)) => run_split(args, options),
        Some(Commands::Relabel(args)) => run_relabel(args, options),
        Some(Commands::Suggest(args)) => run_suggest(args, options),
        Some(Commands::Apply(args)) => run_apply(args, options),
        None => {
            println!("motfix {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Merge, split and relabel tracks in MOT annotation datasets.");
            println!();
            println!("Run 'motfix --help' for usage information.");
            Ok(())
        }
    }
}

/// Reads, validates and loads a document into a fresh store.
fn load_store(input: &InputArgs, options: StoreOptions) -> Result<Store, MotfixError> {
    let format = DocumentFormat::resolve(input.format.as_deref(), &input.input)?;
    let document = model::read_document_value(&input.input, format)?;

    let mut store = Store::new(options);
    store.load_document(&document)?;
    Ok(store)
}

fn save_store(store: &Store, output: &OutputArgs) -> Result<(), MotfixError> {
    let format = DocumentFormat::resolve(output.output_format.as_deref(), &output.output)?;
    model::write_document(&output.output, &store.export_document(), format)?;
    log::info!("Wrote {}", output.output.display());
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let total_frames = options.total_frames;
    let store = load_store(&args.input, options)?;

    let opts = validation::AuditOptions {
        strict: args.strict,
        total_frames: Some(total_frames),
    };
    let report = validation::audit_dataset(store.dataset(), &opts);

    match args.output.as_str() {
        "json" => {
            let summary = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            let rendered =
                serde_json::to_string_pretty(&summary).map_err(MotfixError::ReportRender)?;
            println!("{}", rendered);
        }
        _ => {
            print!("{}", report);
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(MotfixError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn run_sample(args: SampleArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let store = Store::new(options);
    save_store(&store, &args.output)?;
    println!(
        "Wrote sample dataset with {} track(s) and {} detection(s) to {}",
        store.tracks().len(),
        store.detections().len(),
        args.output.output.display()
    );
    Ok(())
}

fn run_tracks(args: TracksArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let store = load_store(&args.input, options)?;

    match args.frame {
        Some(frame) => {
            for detection in store.detections_for_frame(frame) {
                let b = &detection.bbox;
                println!(
                    "{}\t{}\t{}\tx={:.1} y={:.1} w={:.1} h={:.1}",
                    detection.id, detection.track_id, detection.label, b.x, b.y, b.w, b.h
                );
            }
        }
        None => {
            for entry in store.track_listing() {
                println!(
                    "{}\t{}\t{}\t{} detection(s)",
                    entry.track.id, entry.track.label, entry.track.color, entry.detection_count
                );
            }
        }
    }
    Ok(())
}

fn run_merge(args: MergeArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let mut store = load_store(&args.input, options)?;

    for track in &args.tracks {
        if !store.selection().contains(track) {
            store.toggle_selection(track.as_str());
        }
    }
    let selected: Vec<TrackId> = store.selection().ids().to_vec();
    let target = store.merge_selected()?;
    save_store(&store, &args.output)?;

    let merged: Vec<&str> = selected
        .iter()
        .filter(|id| **id != target)
        .map(TrackId::as_str)
        .collect();
    println!("Tracks {} merged into {}.", merged.join(", "), target);
    Ok(())
}

fn run_split(args: SplitArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let mut store = load_store(&args.input, options)?;
    if args.frame >= store.total_frames() {
        return Err(MotfixError::FrameOutOfRange {
            frame: args.frame,
            total_frames: store.total_frames(),
        });
    }

    store.set_frame(args.frame);
    store.toggle_selection(args.track.as_str());
    let new_track = store.split_selected()?;
    save_store(&store, &args.output)?;

    println!(
        "Track {} split. Detections from frame {} onwards moved to new track {}.",
        args.track, args.frame, new_track
    );
    Ok(())
}

fn run_relabel(args: RelabelArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let mut store = load_store(&args.input, options)?;
    store.relabel(&args.track, &args.label)?;
    save_store(&store, &args.output)?;

    println!("Track {} relabeled as '{}'.", args.track, args.label.trim());
    Ok(())
}

fn run_suggest(args: SuggestArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let store = load_store(&args.input, options)?;
    for label in store.suggest_labels(&args.text) {
        println!("{}", label);
    }
    Ok(())
}

fn run_apply(args: ApplyArgs, options: StoreOptions) -> Result<(), MotfixError> {
    let file = File::open(&args.script)?;
    let edits: Vec<Edit> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| MotfixError::EditScript {
            path: args.script.clone(),
            source,
        })?;

    let mut store = load_store(&args.input, options)?;
    for (index, edit) in edits.iter().enumerate() {
        log::debug!("Applying edit {}: {:?}", index, edit);
        store.apply(edit)?;
    }
    save_store(&store, &args.output)?;

    println!("Applied {} edit(s).", edits.len());
    Ok(())
}
