// ============================================================================
// vidmark-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Core Error Types for the Vidmark Library
//
// This module defines the error taxonomy for the annotation pipeline. Errors
// here are the *fatal* ones: failures that make it impossible to produce any
// correct output (unreadable input, unavailable timeline, broken encoder).
// Per-frame face-detection failures and per-face classification failures are
// deliberately NOT represented as `CoreError`s at the pipeline level; they
// are contained, logged, and counted in the `PipelineOutcome`.
//
// AI-ASSISTANT-INFO: Error types and helper constructors for vidmark-core

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias used throughout vidmark-core.
pub type CoreResult<T> = Result<T, CoreError>;

/// Fatal error types for the Vidmark annotation pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input video cannot be opened or probed for frame extraction.
    /// Terminal: no output files are produced.
    #[error("Unreadable input: {0}")]
    UnreadableInput(String),

    /// The activity-detection collaborator failed or timed out, so no
    /// segment timeline can be built. Terminal: no overlay pass is attempted.
    #[error("Activity timeline unavailable: {0}")]
    TimelineUnavailable(String),

    /// A required external tool (ffmpeg/ffprobe) is not installed.
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    /// An external command could not be started.
    #[error("Failed to start command '{cmd}': {source}")]
    CommandStart {
        cmd: String,
        #[source]
        source: io::Error,
    },

    /// An external command ran but exited unsuccessfully.
    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Waiting on an external command failed.
    #[error("Failed waiting for command '{cmd}': {source}")]
    CommandWait {
        cmd: String,
        #[source]
        source: io::Error,
    },

    /// ffprobe produced output we could not interpret.
    #[error("ffprobe parse error: {0}")]
    FfprobeParse(String),

    /// A remote service returned a response we could not interpret.
    #[error("Service response error: {0}")]
    ServiceResponse(String),

    /// Invalid configuration supplied by the caller.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Creates a `CoreError::CommandStart` for the given command.
pub fn command_start_error(cmd: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart {
        cmd: cmd.into(),
        source,
    }
}

/// Creates a `CoreError::CommandFailed` for the given command.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Creates a `CoreError::CommandWait` for the given command.
pub fn command_wait_error(cmd: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandWait {
        cmd: cmd.into(),
        source,
    }
}
