// vidmark-cli/src/main.rs
//
// Entry point for the Vidmark video annotation tool.
//
// Responsibilities include:
// - Parsing user-provided arguments (see cli.rs).
// - Setting up logging to console and optional log file.
// - Invoking the core annotation pipeline (`vidmark_core::process_video`).
// - Handling results and errors from the core library.
// - Managing process exit codes based on success or failure.

use std::process;

use clap::Parser;
use owo_colors::OwoColorize;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Annotate(args) => {
            match logging::setup_logging(args.log_dir.as_deref()) {
                Ok(Some(path)) => log::info!("Logging to {}", path.display()),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("{} failed to initialize logging: {e}", "Error:".red().bold());
                    process::exit(1);
                }
            }
            commands::run_annotate(&args)
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("{} {e}", "Error:".red().bold());
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_annotate_basic_args() {
        let args = vec![
            "vidmark",
            "annotate",
            "-i",
            "clip.mp4",
            "--annotation-endpoint",
            "https://annotation.example.com",
            "--inference-endpoint",
            "http://localhost:8500",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Annotate(annotate_args) => {
                assert_eq!(annotate_args.input_path, PathBuf::from("clip.mp4"));
                assert!(annotate_args.output_path.is_none());
                assert!(annotate_args.report_path.is_none());
                assert!(annotate_args.credentials.is_none());
                assert!(annotate_args.timeout.is_none());
                assert!(annotate_args.min_confidence.is_none());
                assert!(annotate_args.detection_downscale.is_none());
                assert!(!annotate_args.no_progress);
            }
        }
    }

    #[test]
    fn test_parse_annotate_full_args() {
        let args = vec![
            "vidmark",
            "annotate",
            "--input",
            "clip.mp4",
            "--output",
            "out.mp4",
            "--report",
            "report.txt",
            "--annotation-endpoint",
            "https://annotation.example.com",
            "--inference-endpoint",
            "http://localhost:8500",
            "--credentials",
            "creds.json",
            "--timeout",
            "120",
            "--min-confidence",
            "0.7",
            "--detection-downscale",
            "2",
            "--no-progress",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Annotate(annotate_args) => {
                assert_eq!(annotate_args.output_path, Some(PathBuf::from("out.mp4")));
                assert_eq!(annotate_args.report_path, Some(PathBuf::from("report.txt")));
                assert_eq!(annotate_args.credentials, Some(PathBuf::from("creds.json")));
                assert_eq!(annotate_args.timeout, Some(120));
                assert_eq!(annotate_args.min_confidence, Some(0.7));
                assert_eq!(annotate_args.detection_downscale, Some(2));
                assert!(annotate_args.no_progress);
            }
        }
    }
}
