//! Core library for fusing activity and emotion annotations onto video.
//!
//! This crate ingests a video file, obtains a coarse activity timeline from a
//! remote annotation service and per-frame face/emotion observations from a
//! remote inference service, and re-renders the video with burned-in
//! overlays plus aggregate emotion statistics and a text report.
//!
//! The fusion pipeline is a strict single pass: frames are decoded, matched
//! against the timeline by timestamp, annotated with face boxes and emotion
//! labels, and written out in order, one in one out. Per-frame and per-face
//! failures are contained to their unit; only an unreadable input or an
//! unavailable timeline aborts a run.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use vidmark_core::{process_video, CoreConfig};
//! use vidmark_core::external::{InferenceServiceClient, VideoAnnotationClient};
//! use std::time::Duration;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("video.mp4"),
//!     PathBuf::from("video_annotated.mp4"),
//!     PathBuf::from("video_report.txt"),
//! );
//! config.annotation_endpoint = "https://annotation.example.com".to_string();
//! config.inference_endpoint = "http://localhost:8500".to_string();
//!
//! let annotation = VideoAnnotationClient::new(
//!     &config.annotation_endpoint,
//!     config.credentials_path.as_ref(),
//!     Duration::from_secs(config.annotation_timeout_secs),
//! ).unwrap();
//! let inference = InferenceServiceClient::new(&config.inference_endpoint).unwrap();
//!
//! let report = process_video(&config, &annotation, &inference, &inference, None).unwrap();
//! println!("{} frames annotated", report.outcome.frames_processed);
//! ```

pub mod config;
pub mod detection;
pub mod emotion;
pub mod error;
pub mod external;
pub mod overlay;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod stats;
pub mod timeline;
pub mod utils;

// Re-exports for public API
pub use config::CoreConfig;
pub use detection::{BoundingBox, FaceDetector, FaceLocator};
pub use emotion::{Emotion, EmotionAnalyzer, EmotionClassifier, EmotionOutcome, FaceObservation};
pub use error::{CoreError, CoreResult};
pub use overlay::OverlayRenderer;
pub use pipeline::{annotate_stream, FrameSink, FrameSource, PipelineOutcome, VideoFrame};
pub use processing::{process_video, VideoReport};
pub use report::{format_report, write_report};
pub use stats::EmotionTally;
pub use timeline::{ActivityDetector, Segment, SegmentTimeline};
pub use utils::format_duration;
