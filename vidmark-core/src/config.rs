//! Configuration structures and constants for the vidmark-core library.
//!
//! This module provides the configuration system for the annotation pipeline:
//! input/output paths, remote service endpoints and credentials, and the
//! tunable fusion parameters (segment confidence threshold and face-detection
//! downscale factor) with their documented defaults.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

// Default constants

/// Default minimum confidence for a detected activity segment to be retained
/// in the timeline. Segments at or below this confidence are discarded during
/// timeline construction.
pub const DEFAULT_MIN_SEGMENT_CONFIDENCE: f32 = 0.5;

/// Default downscale denominator applied to frames before face detection.
/// A value of 4 means detection runs on a 0.25x-per-dimension frame (~16x
/// fewer pixels) and detected coordinates are multiplied by 4 to map back to
/// full resolution. Kept integral so the rescale is exact.
pub const DEFAULT_DETECTION_DOWNSCALE: u32 = 4;

/// Default bounded wait, in seconds, for the activity-detection service to
/// return a result. Exceeding this is fatal to the whole run.
pub const DEFAULT_ANNOTATION_TIMEOUT_SECS: u64 = 300;

/// Main configuration structure for the vidmark-core library.
///
/// This structure holds all the parameters required for one annotation run,
/// including paths, service endpoints, and fusion parameters. It is typically
/// created by the consumer of the library (e.g., vidmark-cli) and passed to
/// the `process_video` function.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Path to the input video file.
    pub input_path: PathBuf,

    /// Path where the annotated output video will be written.
    pub output_path: PathBuf,

    /// Path where the plain-text activity/emotion report will be written.
    pub report_path: PathBuf,

    /// Base URL of the activity-detection (video annotation) service.
    pub annotation_endpoint: String,

    /// Path to the credential file for the annotation service. The file's
    /// contents are sent as a bearer token.
    pub credentials_path: Option<PathBuf>,

    /// Bounded wait for the annotation service, in seconds.
    pub annotation_timeout_secs: u64,

    /// Base URL of the face/emotion inference service.
    pub inference_endpoint: String,

    /// Minimum confidence for retained activity segments (exclusive bound).
    pub min_segment_confidence: f32,

    /// Downscale denominator for the face-detection pass.
    pub detection_downscale: u32,

    /// Optional font file for burned-in overlay text. When `None`, a short
    /// list of common system font locations is probed; if none exists the
    /// overlays degrade to geometry only.
    pub font_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("video.mp4"),
            output_path: PathBuf::from("video_annotated.mp4"),
            report_path: PathBuf::from("video_report.txt"),
            annotation_endpoint: String::new(),
            credentials_path: None,
            annotation_timeout_secs: DEFAULT_ANNOTATION_TIMEOUT_SECS,
            inference_endpoint: String::new(),
            min_segment_confidence: DEFAULT_MIN_SEGMENT_CONFIDENCE,
            detection_downscale: DEFAULT_DETECTION_DOWNSCALE,
            font_path: None,
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with the given paths and default parameters.
    pub fn new(input_path: PathBuf, output_path: PathBuf, report_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            report_path,
            ..Default::default()
        }
    }

    /// Validates the configuration, returning `CoreError::Config` on the
    /// first problem found.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_path.is_file() {
            return Err(CoreError::Config(format!(
                "input path is not a file: {}",
                self.input_path.display()
            )));
        }
        if self.detection_downscale == 0 {
            return Err(CoreError::Config(
                "detection downscale must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_segment_confidence) {
            return Err(CoreError::Config(format!(
                "segment confidence threshold must be within [0, 1], got {}",
                self.min_segment_confidence
            )));
        }
        if self.annotation_timeout_secs == 0 {
            return Err(CoreError::Config(
                "annotation timeout must be nonzero".to_string(),
            ));
        }
        if let Some(creds) = &self.credentials_path {
            if !creds.is_file() {
                return Err(CoreError::Config(format!(
                    "credential file not found: {}",
                    creds.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_match_documented_constants() {
        let config = CoreConfig::default();
        assert_eq!(config.min_segment_confidence, 0.5);
        assert_eq!(config.detection_downscale, 4);
        assert_eq!(config.annotation_timeout_secs, 300);
    }

    #[test]
    fn validate_rejects_missing_input() {
        let config = CoreConfig::new(
            PathBuf::from("/nonexistent/input.mp4"),
            PathBuf::from("out.mp4"),
            PathBuf::from("report.txt"),
        );
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_downscale() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = CoreConfig::new(
            file.path().to_path_buf(),
            PathBuf::from("out.mp4"),
            PathBuf::from("report.txt"),
        );
        config.detection_downscale = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn validate_accepts_sane_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = CoreConfig::new(
            file.path().to_path_buf(),
            PathBuf::from("out.mp4"),
            PathBuf::from("report.txt"),
        );
        assert!(config.validate().is_ok());
    }
}
