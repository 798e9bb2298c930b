//! FFprobe integration for up-front media analysis.
//!
//! The pipeline needs the input's dimensions, frame rate, and (when the
//! container knows it) total frame count before the frame loop starts: the
//! encoder is opened at the same resolution/rate, and the frame count drives
//! progress display. A failed probe means the input is unreadable, which is
//! fatal before any output file is created.

use std::path::Path;

use ffprobe::{ffprobe, FfProbeError};

use crate::error::{command_start_error, CoreError, CoreResult};

/// Properties of the input video obtained up front via ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    /// Width of the video stream in pixels.
    pub width: u32,
    /// Height of the video stream in pixels.
    pub height: u32,
    /// Frames per second.
    pub fps: f64,
    /// Total number of frames, when the container reports it.
    pub total_frames: Option<u64>,
    /// Duration in seconds.
    pub duration_secs: f64,
}

/// Probes `input_path` for the properties the pipeline needs.
pub fn probe_video_properties(input_path: &Path) -> CoreResult<VideoProperties> {
    log::debug!(
        "Running ffprobe (via crate) for video properties on: {}",
        input_path.display()
    );
    let metadata = match ffprobe(input_path) {
        Ok(metadata) => metadata,
        Err(err) => {
            log::error!(
                "ffprobe failed for video properties on {}: {err:?}",
                input_path.display()
            );
            return Err(map_ffprobe_error(err, input_path));
        }
    };

    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::UnreadableInput(format!(
                "no video stream found in {}",
                input_path.display()
            ))
        })?;

    let width = video_stream.width.ok_or_else(|| {
        CoreError::FfprobeParse(format!(
            "video stream missing width in {}",
            input_path.display()
        ))
    })?;
    let height = video_stream.height.ok_or_else(|| {
        CoreError::FfprobeParse(format!(
            "video stream missing height in {}",
            input_path.display()
        ))
    })?;
    if width <= 0 || height <= 0 {
        return Err(CoreError::FfprobeParse(format!(
            "invalid dimensions in {}: {width}x{height}",
            input_path.display()
        )));
    }

    // avg_frame_rate is the decoded average; r_frame_rate is the container's
    // nominal rate. Prefer the former, fall back to the latter.
    let fps = parse_frame_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
        .ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "could not determine frame rate for {} (avg '{}', r '{}')",
                input_path.display(),
                video_stream.avg_frame_rate,
                video_stream.r_frame_rate
            ))
        })?;

    let duration_secs = metadata
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let total_frames = video_stream
        .nb_frames
        .as_deref()
        .and_then(|f| f.parse::<u64>().ok())
        .or_else(|| {
            // Some containers omit nb_frames; estimate from duration.
            (duration_secs > 0.0).then(|| (duration_secs * fps).round() as u64)
        });

    Ok(VideoProperties {
        width: width as u32,
        height: height as u32,
        fps,
        total_frames,
        duration_secs,
    })
}

/// Parses an ffprobe rational frame rate ("30/1", "30000/1001") into f64.
/// Returns None for malformed or zero rates ("0/0").
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num = num.trim().parse::<f64>().ok()?;
    let den = den.trim().parse::<f64>().ok()?;
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            CoreError::DependencyNotFound("ffprobe".to_string())
        }
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => CoreError::UnreadableInput(format!(
            "ffprobe could not read {}: {}",
            input_path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("ffprobe output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("unknown ffprobe error: {err:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integral_and_rational_rates() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn rejects_malformed_and_zero_rates() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("30"), None);
        assert_eq!(parse_frame_rate("abc/def"), None);
        assert_eq!(parse_frame_rate(""), None);
    }
}
