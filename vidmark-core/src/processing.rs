// ============================================================================
// vidmark-core/src/processing.rs
// ============================================================================
//
// PROCESSING ORCHESTRATION: One Complete Annotation Run
//
// Sequences a full run in the order that guarantees the fatal-error
// contract: everything that can fail fatally (dependency checks, probing,
// the bounded-wait annotation request) happens before any output file is
// created, so a failed run leaves no partial outputs behind.
//
// AI-ASSISTANT-INFO: Top-level process_video orchestration

use crate::config::CoreConfig;
use crate::detection::{FaceDetector, FaceLocator};
use crate::emotion::{EmotionAnalyzer, EmotionClassifier};
use crate::error::CoreResult;
use crate::external::{self, FfmpegFrameSink, FfmpegFrameSource, VideoProperties};
use crate::overlay::OverlayRenderer;
use crate::pipeline::{annotate_stream, FrameSink, PipelineOutcome, VideoFrame};
use crate::report::write_report;
use crate::timeline::{ActivityDetector, SegmentTimeline};

/// Everything a caller needs to know about a finished run.
#[derive(Debug)]
pub struct VideoReport {
    /// Input properties probed before the run.
    pub properties: VideoProperties,
    /// The accepted activity timeline.
    pub timeline: SegmentTimeline,
    /// Streaming statistics and the final emotion tally.
    pub outcome: PipelineOutcome,
}

/// Runs one complete annotation pass over `config.input_path`.
///
/// Order matters here:
/// 1. check ffmpeg/ffprobe, validate the configuration,
/// 2. probe the input (fatal `UnreadableInput` on failure),
/// 3. request activities and build the timeline (fatal
///    `TimelineUnavailable` on failure or timeout) — still no output files,
/// 4. open decoder and encoder, stream every frame through the pipeline
///    (a mid-stream failure drops the sink, which removes the partially
///    written output video),
/// 5. write the text report.
///
/// `on_frame`, when given, is invoked after each frame is written with the
/// number of frames written so far; the CLI uses it for progress display.
pub fn process_video<D, L, C>(
    config: &CoreConfig,
    detector: &D,
    locator: L,
    classifier: C,
    on_frame: Option<&mut dyn FnMut(u64)>,
) -> CoreResult<VideoReport>
where
    D: ActivityDetector + ?Sized,
    L: FaceLocator,
    C: EmotionClassifier,
{
    external::check_dependency("ffmpeg")?;
    external::check_dependency("ffprobe")?;
    config.validate()?;

    let properties = external::probe_video_properties(&config.input_path)?;
    log::info!(
        "Input {}: {}x{} @ {:.3} fps, {} frames",
        config.input_path.display(),
        properties.width,
        properties.height,
        properties.fps,
        properties
            .total_frames
            .map_or_else(|| "?".to_string(), |n| n.to_string())
    );

    // Bounded wait; fatal on failure. No output exists yet.
    log::info!("Requesting activity annotations (bounded wait)...");
    let raw_segments = detector.detect_activities(&config.input_path)?;
    let timeline = SegmentTimeline::build(raw_segments, config.min_segment_confidence);
    log::info!("Timeline built with {} accepted segments", timeline.len());

    let renderer = OverlayRenderer::discover(config.font_path.as_deref())?;
    let face_detector = FaceDetector::new(locator, config.detection_downscale);
    let analyzer = EmotionAnalyzer::new(classifier);

    let mut source = FfmpegFrameSource::open(&config.input_path)?;
    let encoder = FfmpegFrameSink::create(
        &config.output_path,
        properties.width,
        properties.height,
        properties.fps,
    )?;
    let mut sink = CountingSink {
        inner: encoder,
        written: 0,
        on_frame,
    };

    let outcome = annotate_stream(
        &mut source,
        &mut sink,
        &timeline,
        &face_detector,
        &analyzer,
        &renderer,
        properties.fps,
    )?;

    write_report(&config.report_path, &timeline, &outcome.emotions)?;

    Ok(VideoReport {
        properties,
        timeline,
        outcome,
    })
}

/// Sink decorator that reports progress to the caller after every frame.
struct CountingSink<'a, K> {
    inner: K,
    written: u64,
    on_frame: Option<&'a mut dyn FnMut(u64)>,
}

impl<K: FrameSink> FrameSink for CountingSink<'_, K> {
    fn write_frame(&mut self, frame: &VideoFrame) -> CoreResult<()> {
        self.inner.write_frame(frame)?;
        self.written += 1;
        if let Some(cb) = self.on_frame.as_mut() {
            cb(self.written);
        }
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<()> {
        self.inner.finish()
    }
}
