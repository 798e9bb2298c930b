// ============================================================================
// vidmark-core/src/external/encoder.rs
// ============================================================================
//
// FFMPEG ENCODER: FrameSink Implementation over ffmpeg-sidecar
//
// Spawns an ffmpeg child that reads raw rgb24 frames on stdin at the input's
// resolution and frame rate and encodes them to the output file. Frames are
// written incrementally, one in one out, in the order received. The child's
// stderr is drained on a background thread so a chatty encoder can never
// block the pipe; its tail is kept for error reporting.
//
// A run that aborts mid-stream must not leave an incomplete output video
// behind: the sink owns its output path and removes the file whenever the
// stream does not reach a successful `finish` (failed encoder exit, or drop
// without finish).
//
// AI-ASSISTANT-INFO: ffmpeg-backed frame sink (encode side)

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ChildStdin;
use std::thread::JoinHandle;

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;

use crate::error::{
    command_failed_error, command_start_error, command_wait_error, CoreError, CoreResult,
};
use crate::pipeline::{FrameSink, VideoFrame};

/// Number of trailing stderr lines kept for error messages.
const STDERR_TAIL_LINES: usize = 12;

/// Ordered rgb24 frame sink backed by an ffmpeg child process.
pub struct FfmpegFrameSink {
    child: FfmpegChild,
    stdin: Option<ChildStdin>,
    stderr_tail: Option<JoinHandle<String>>,
    output_path: PathBuf,
    width: u32,
    height: u32,
    frames_written: u64,
    finished: bool,
}

impl FfmpegFrameSink {
    /// Spawns ffmpeg encoding rgb24 stdin input to `output_path` at the
    /// given geometry and frame rate.
    pub fn create(output_path: &Path, width: u32, height: u32, fps: f64) -> CoreResult<Self> {
        let mut child = FfmpegCommand::new()
            .hide_banner()
            .format("rawvideo")
            .pix_fmt("rgb24")
            .size(width, height)
            .rate(fps as f32)
            .input("-")
            .codec_video("libx264")
            .pix_fmt("yuv420p")
            .overwrite()
            .output(output_path.to_string_lossy().as_ref())
            .spawn()
            .map_err(|e| command_start_error("ffmpeg (encode)", e))?;

        let stdin = child.take_stdin().ok_or_else(|| {
            command_start_error(
                "ffmpeg (encode)",
                std::io::Error::other("could not attach to encoder stdin"),
            )
        })?;

        let stderr_tail = child.take_stderr().map(|stderr| {
            std::thread::spawn(move || {
                let mut tail: Vec<String> = Vec::new();
                for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                    log::trace!("ffmpeg (encode): {line}");
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
                tail.join("\n")
            })
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr_tail,
            output_path: output_path.to_path_buf(),
            width,
            height,
            frames_written: 0,
            finished: false,
        })
    }

    /// Best-effort removal of an incomplete output file.
    fn remove_partial_output(&self) {
        if std::fs::remove_file(&self.output_path).is_ok() {
            log::debug!(
                "Removed incomplete output {}",
                self.output_path.display()
            );
        }
    }

    fn stderr_tail(&mut self) -> String {
        self.stderr_tail
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default()
    }
}

impl FrameSink for FfmpegFrameSink {
    fn write_frame(&mut self, frame: &VideoFrame) -> CoreResult<()> {
        let (w, h) = (frame.image.width(), frame.image.height());
        if (w, h) != (self.width, self.height) {
            return Err(CoreError::Config(format!(
                "frame {} is {w}x{h}, encoder expects {}x{}",
                frame.index, self.width, self.height
            )));
        }
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            CoreError::Config("write_frame called after finish".to_string())
        })?;
        stdin.write_all(frame.image.as_raw())?;
        self.frames_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        // Closing stdin tells ffmpeg the stream is over.
        drop(self.stdin.take());

        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => {
                self.remove_partial_output();
                return Err(command_wait_error("ffmpeg (encode)", e));
            }
        };
        let tail = self.stderr_tail();
        if !status.success() {
            self.remove_partial_output();
            return Err(command_failed_error("ffmpeg (encode)", status, tail));
        }
        log::debug!("Encoder finished after {} frames", self.frames_written);
        Ok(())
    }
}

impl Drop for FfmpegFrameSink {
    fn drop(&mut self) {
        if !self.finished {
            // Best effort: close the pipe, reap the child so an aborted run
            // does not leak a zombie ffmpeg, and remove the incomplete file.
            drop(self.stdin.take());
            let _ = self.child.wait();
            let _ = self.stderr_tail.take().map(|h| h.join());
            self.remove_partial_output();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn ffmpeg_available() -> bool {
        crate::external::check_dependency("ffmpeg").is_ok()
    }

    fn gray_frame(index: u64) -> VideoFrame {
        VideoFrame {
            index,
            image: RgbImage::from_pixel(64, 64, image::Rgb([40, 40, 40])),
        }
    }

    #[test]
    fn aborted_sink_removes_partial_output() {
        if !ffmpeg_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.mp4");
        {
            let mut sink = FfmpegFrameSink::create(&path, 64, 64, 10.0).unwrap();
            sink.write_frame(&gray_frame(0)).unwrap();
            // Dropped without finish, as happens when the run aborts
            // mid-stream.
        }
        assert!(!path.exists());
    }

    #[test]
    fn finished_sink_keeps_output() {
        if !ffmpeg_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complete.mp4");
        let mut sink = FfmpegFrameSink::create(&path, 64, 64, 10.0).unwrap();
        for i in 0..5 {
            sink.write_frame(&gray_frame(i)).unwrap();
        }
        sink.finish().unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
