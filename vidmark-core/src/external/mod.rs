// ============================================================================
// vidmark-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL COLLABORATORS: CLI Tools and Remote Services
//
// This module encapsulates everything the core pipeline treats as an outside
// collaborator: the ffmpeg/ffprobe binaries used for decode/probe/encode, the
// remote video-annotation service that produces the activity timeline, and
// the remote inference service that locates faces and classifies emotions.
//
// KEY COMPONENTS:
// - Dependency checking for required external binaries
// - FfmpegFrameSource / FfmpegFrameSink (FrameSource/FrameSink over ffmpeg)
// - probe_video_properties (ffprobe-based up-front metadata)
// - VideoAnnotationClient (ActivityDetector over HTTP)
// - InferenceServiceClient (FaceLocator + EmotionClassifier over HTTP)
//
// DESIGN PHILOSOPHY:
// The pipeline consumes these through the trait seams defined next to the
// core logic (ActivityDetector, FaceLocator, EmotionClassifier, FrameSource,
// FrameSink), so tests can substitute scripted implementations without any
// external process or network.
//
// AI-ASSISTANT-INFO: External tool and service adapters for vidmark-core

use std::io;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// SUBMODULES
// ============================================================================

/// HTTP client for the activity-detection (video annotation) service
pub mod annotation;

/// Frame decoding via an ffmpeg child process
pub mod decoder;

/// Frame encoding via an ffmpeg child process
pub mod encoder;

/// Up-front media property probing via ffprobe
pub mod ffprobe_executor;

/// HTTP client for the face/emotion inference service
pub mod inference;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use annotation::VideoAnnotationClient;
pub use decoder::FfmpegFrameSource;
pub use encoder::FfmpegFrameSink;
pub use ffprobe_executor::{probe_video_properties, VideoProperties};
pub use inference::InferenceServiceClient;

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output; used at startup
/// for ffmpeg and ffprobe so a missing binary fails fast instead of midway
/// through a run.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(crate::error::command_start_error(cmd_name, e))
        }
    }
}
