// vidmark-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Vidmark: Video activity and emotion annotation tool",
    long_about = "Fuses remote activity annotations and per-frame face/emotion \
                  observations into a re-rendered video with burned-in overlays, \
                  via the vidmark-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotates a video with activity text and face/emotion overlays
    Annotate(AnnotateArgs),
    // Add other subcommands here later (e.g., report-only)
}

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Input video file
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_FILE")]
    pub input_path: PathBuf,

    /// Optional: Annotated output video path (defaults to <input stem>_annotated.mp4)
    #[arg(short = 'o', long = "output", value_name = "OUTPUT_FILE")]
    pub output_path: Option<PathBuf>,

    /// Optional: Text report path (defaults to <input stem>_report.txt)
    #[arg(short = 'r', long = "report", value_name = "REPORT_FILE")]
    pub report_path: Option<PathBuf>,

    /// Base URL of the activity-annotation service
    #[arg(
        long,
        value_name = "URL",
        env = "VIDMARK_ANNOTATION_ENDPOINT",
        required = true
    )]
    pub annotation_endpoint: String,

    /// Base URL of the face/emotion inference service
    #[arg(
        long,
        value_name = "URL",
        env = "VIDMARK_INFERENCE_ENDPOINT",
        required = true
    )]
    pub inference_endpoint: String,

    /// Optional: Credential file for the annotation service (bearer token)
    #[arg(
        long,
        value_name = "FILE",
        env = "GOOGLE_APPLICATION_CREDENTIALS"
    )]
    pub credentials: Option<PathBuf>,

    /// Bounded wait for the annotation service, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Minimum confidence for retained activity segments (0.0-1.0)
    #[arg(long, value_name = "CONF")]
    pub min_confidence: Option<f32>,

    /// Downscale denominator for the face-detection pass (1 disables)
    #[arg(long, value_name = "N")]
    pub detection_downscale: Option<u32>,

    /// Optional: Font file for burned-in overlay text
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Optional: Directory for log files (defaults to console-only logging)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
