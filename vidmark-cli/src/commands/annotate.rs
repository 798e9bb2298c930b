// ============================================================================
// vidmark-cli/src/commands/annotate.rs
// ============================================================================
//
// ANNOTATE COMMAND: One Full Annotation Run from the CLI
//
// Builds a CoreConfig from the parsed arguments (filling in the default
// output and report paths next to the input), constructs the two remote
// service clients, and drives vidmark-core's process_video with a progress
// bar fed by the per-frame callback. Prints a colored summary on success.
//
// AI-ASSISTANT-INFO: Implementation of the annotate subcommand

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use vidmark_core::external::{InferenceServiceClient, VideoAnnotationClient};
use vidmark_core::{format_duration, process_video, CoreConfig, CoreError, VideoReport};

use crate::cli::AnnotateArgs;

/// Derives "<stem>_<suffix>.<ext>" next to the input file.
fn sibling_path(input: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().into_owned());
    input.with_file_name(format!("{stem}_{suffix}.{ext}"))
}

fn build_config(args: &AnnotateArgs) -> CoreConfig {
    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| sibling_path(&args.input_path, "annotated", "mp4"));
    let report_path = args
        .report_path
        .clone()
        .unwrap_or_else(|| sibling_path(&args.input_path, "report", "txt"));

    let mut config = CoreConfig::new(args.input_path.clone(), output_path, report_path);
    config.annotation_endpoint = args.annotation_endpoint.clone();
    config.inference_endpoint = args.inference_endpoint.clone();
    config.credentials_path = args.credentials.clone();
    if let Some(timeout) = args.timeout {
        config.annotation_timeout_secs = timeout;
    }
    if let Some(conf) = args.min_confidence {
        config.min_segment_confidence = conf;
    }
    if let Some(downscale) = args.detection_downscale {
        config.detection_downscale = downscale;
    }
    config.font_path = args.font.clone();
    config
}

fn make_progress_bar(total_frames: Option<u64>) -> ProgressBar {
    let bar = match total_frames {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} frames ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} [{elapsed_precise}] {pos} frames")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn print_summary(config: &CoreConfig, report: &VideoReport) {
    let outcome = &report.outcome;
    println!();
    println!("{}", "Annotation complete".green().bold());
    println!(
        "  {} {}",
        "Output video:".bold(),
        config.output_path.display()
    );
    println!(
        "  {} {}",
        "Report:".bold(),
        config.report_path.display()
    );
    println!(
        "  {} {} frames in {}",
        "Processed:".bold(),
        outcome.frames_processed,
        format_duration(outcome.elapsed)
    );
    println!(
        "  {} {} segments, {} faces",
        "Detected:".bold(),
        report.timeline.len(),
        outcome.faces_detected
    );
    if outcome.detection_failures > 0 || outcome.classification_failures > 0 {
        println!(
            "  {} {} detection, {} classification",
            "Contained failures:".yellow().bold(),
            outcome.detection_failures,
            outcome.classification_failures
        );
    }
    if !outcome.emotions.is_empty() {
        println!("  {}", "Emotions:".bold());
        for (emotion, count) in outcome.emotions.snapshot() {
            println!("    {emotion}: {count}");
        }
    }
}

/// Runs the annotate subcommand. Returns an error for `main` to report.
pub fn run_annotate(args: &AnnotateArgs) -> Result<(), CoreError> {
    let config = build_config(args);

    log::info!("Annotating {}", config.input_path.display());

    let annotation = VideoAnnotationClient::new(
        &config.annotation_endpoint,
        config.credentials_path.as_ref(),
        Duration::from_secs(config.annotation_timeout_secs),
    )?;
    let inference = InferenceServiceClient::new(&config.inference_endpoint)?;

    // Probe up front only to size the progress bar; process_video re-probes
    // as part of its own fatal-error sequencing.
    let progress = if args.no_progress {
        None
    } else {
        let total = vidmark_core::external::probe_video_properties(&config.input_path)
            .ok()
            .and_then(|p| p.total_frames);
        Some(make_progress_bar(total))
    };

    let mut on_frame = progress.as_ref().map(|bar| {
        let bar = bar.clone();
        move |written: u64| bar.set_position(written)
    });
    let callback: Option<&mut dyn FnMut(u64)> = match on_frame.as_mut() {
        Some(cb) => Some(cb),
        None => None,
    };

    let result = process_video(&config, &annotation, &inference, &inference, callback);

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let report = result?;
    print_summary(&config, &report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_path_derives_next_to_input() {
        let input = Path::new("/videos/clip.mp4");
        assert_eq!(
            sibling_path(input, "annotated", "mp4"),
            PathBuf::from("/videos/clip_annotated.mp4")
        );
        assert_eq!(
            sibling_path(input, "report", "txt"),
            PathBuf::from("/videos/clip_report.txt")
        );
    }

    #[test]
    fn sibling_path_handles_missing_stem() {
        assert_eq!(
            sibling_path(Path::new(".."), "annotated", "mp4"),
            PathBuf::from("../video_annotated.mp4")
        );
    }
}
