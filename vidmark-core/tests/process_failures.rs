//! Fatal-error contract tests for the top-level orchestration: a run that
//! fails before streaming must leave no output video and no report behind.

mod common;

use std::path::Path;

use common::{FailingDetector, SequenceLocator, StaticClassifier};
use vidmark_core::{process_video, CoreConfig, Emotion};

fn config_in(dir: &Path, input_name: &str) -> CoreConfig {
    let mut config = CoreConfig::new(
        dir.join(input_name),
        dir.join("out_annotated.mp4"),
        dir.join("out_report.txt"),
    );
    config.annotation_endpoint = "http://localhost:1".to_string();
    config.inference_endpoint = "http://localhost:1".to_string();
    config
}

#[test]
fn missing_input_fails_without_creating_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), "does_not_exist.mp4");

    let result = process_video(
        &config,
        &FailingDetector,
        SequenceLocator::new(vec![]),
        StaticClassifier(Emotion::Happy),
        None,
    );

    assert!(result.is_err());
    assert!(!config.output_path.exists());
    assert!(!config.report_path.exists());
}

#[test]
fn unavailable_timeline_fails_without_creating_outputs() {
    // Needs real ffmpeg to synthesize a valid input; skipped where absent.
    if vidmark_core::external::check_dependency("ffmpeg").is_err()
        || vidmark_core::external::check_dependency("ffprobe").is_err()
    {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.mp4");
    let status = std::process::Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=1:size=64x64:rate=10",
            "-pix_fmt",
            "yuv420p",
        ])
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());

    let config = config_in(dir.path(), "tiny.mp4");
    let result = process_video(
        &config,
        &FailingDetector,
        SequenceLocator::new(vec![]),
        StaticClassifier(Emotion::Happy),
        None,
    );

    // The detector failed after probing but before any output was opened.
    assert!(matches!(
        result,
        Err(vidmark_core::CoreError::TimelineUnavailable(_))
    ));
    assert!(!config.output_path.exists());
    assert!(!config.report_path.exists());
}

#[test]
fn unreadable_input_fails_without_creating_outputs() {
    let dir = tempfile::tempdir().unwrap();
    // A file that exists but is not a video: fatal at or before probing,
    // depending on which external tool is installed. Either way, nothing
    // may be written.
    std::fs::write(dir.path().join("garbage.mp4"), b"not a video").unwrap();
    let config = config_in(dir.path(), "garbage.mp4");

    let result = process_video(
        &config,
        &FailingDetector,
        SequenceLocator::new(vec![]),
        StaticClassifier(Emotion::Happy),
        None,
    );

    assert!(result.is_err());
    assert!(!config.output_path.exists());
    assert!(!config.report_path.exists());
}
