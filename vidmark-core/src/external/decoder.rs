// ============================================================================
// vidmark-core/src/external/decoder.rs
// ============================================================================
//
// FFMPEG DECODER: FrameSource Implementation over ffmpeg-sidecar
//
// Spawns an ffmpeg child that decodes the input into raw rgb24 frames on
// stdout and exposes them one at a time through the `FrameSource` trait. The
// event iterator is drained lazily: only the current frame is ever held in
// memory, matching the pipeline's O(1) memory contract.
//
// AI-ASSISTANT-INFO: ffmpeg-backed frame source (decode side)

use std::path::Path;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use ffmpeg_sidecar::iter::FfmpegIterator;
use image::RgbImage;

use crate::error::{command_start_error, CoreError, CoreResult};
use crate::pipeline::{FrameSource, VideoFrame};

/// Sequential rgb24 frame source backed by an ffmpeg child process.
pub struct FfmpegFrameSource {
    child: FfmpegChild,
    events: FfmpegIterator,
    next_index: u64,
    last_error: Option<String>,
    finished: bool,
}

impl FfmpegFrameSource {
    /// Spawns ffmpeg decoding `input_path` to raw rgb24 frames.
    pub fn open(input_path: &Path) -> CoreResult<Self> {
        let mut child = FfmpegCommand::new()
            .hide_banner()
            .input(input_path.to_string_lossy().as_ref())
            .rawvideo()
            .spawn()
            .map_err(|e| command_start_error("ffmpeg (decode)", e))?;

        let events = child.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {e}");
            command_start_error("ffmpeg (decode)", std::io::Error::other(e.to_string()))
        })?;

        Ok(Self {
            child,
            events,
            next_index: 0,
            last_error: None,
            finished: false,
        })
    }

    fn convert(&mut self, raw: OutputVideoFrame) -> CoreResult<VideoFrame> {
        let index = self.next_index;
        self.next_index += 1;
        let (width, height) = (raw.width, raw.height);
        let image = RgbImage::from_raw(width, height, raw.data).ok_or_else(|| {
            CoreError::UnreadableInput(format!(
                "decoded frame {index} has a malformed {width}x{height} rgb24 buffer"
            ))
        })?;
        Ok(VideoFrame { index, image })
    }
}

impl FrameSource for FfmpegFrameSource {
    fn next_frame(&mut self) -> CoreResult<Option<VideoFrame>> {
        if self.finished {
            return Ok(None);
        }

        for event in self.events.by_ref() {
            match event {
                FfmpegEvent::OutputFrame(raw) => return self.convert(raw).map(Some),
                FfmpegEvent::Error(msg) | FfmpegEvent::Log(LogLevel::Error, msg) => {
                    // Remember the most recent error line; whether it was
                    // fatal shows up in the exit status below.
                    log::debug!("ffmpeg (decode): {msg}");
                    self.last_error = Some(msg);
                }
                _ => {}
            }
        }

        // Stream drained: the child has exited (or is about to).
        self.finished = true;
        let status = self
            .child
            .wait()
            .map_err(|e| crate::error::command_wait_error("ffmpeg (decode)", e))?;
        if !status.success() {
            let detail = self.last_error.take().unwrap_or_default();
            return Err(CoreError::UnreadableInput(format!(
                "ffmpeg decode exited with {status}: {detail}"
            )));
        }
        Ok(None)
    }
}
