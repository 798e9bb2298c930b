// ============================================================================
// vidmark-core/src/pipeline.rs
// ============================================================================
//
// PIPELINE DRIVER: Frame-By-Frame Fusion of Timeline and Face Annotations
//
// The driver is a strict left-to-right single pass: Init (the caller opens
// and validates source/sink) -> Streaming (this module) -> Finalized (sink
// flushed, outcome returned). Per frame it:
//
//   1. computes the timestamp `t = frame_number / fps`,
//   2. queries the segment timeline at `t`,
//   3. runs the face-detection adapter, containing locator failures to this
//      frame (treated as zero faces, logged, counted),
//   4. runs the emotion adapter per box (failures isolated per face),
//   5. records classified labels into the tally,
//   6. renders overlays and writes the frame to the sink.
//
// No frame is skipped, reordered, or processed twice; output is 1:1 with
// input. Memory is O(1) in video length: only the current frame is held.
// Source errors mid-stream are fatal and propagate; end-of-stream is not an
// error.
//
// AI-ASSISTANT-INFO: Single-pass pipeline driver and its source/sink seams

use std::time::{Duration, Instant};

use image::RgbImage;

use crate::detection::{FaceDetector, FaceLocator};
use crate::emotion::{EmotionAnalyzer, EmotionClassifier, EmotionOutcome};
use crate::error::{CoreError, CoreResult};
use crate::overlay::OverlayRenderer;
use crate::stats::EmotionTally;
use crate::timeline::SegmentTimeline;

/// One decoded frame: a full-resolution pixel buffer plus its sequential
/// index. Transient; exists only for one loop iteration.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub index: u64,
    pub image: RgbImage,
}

impl VideoFrame {
    /// Presentation timestamp in seconds at the given frame rate.
    pub fn timestamp(&self, fps: f64) -> f64 {
        self.index as f64 / fps
    }
}

/// A sequential source of decoded frames.
///
/// `Ok(None)` signals a clean end of stream. An `Err` mid-stream means the
/// input became unreadable and is fatal to the run.
pub trait FrameSource {
    fn next_frame(&mut self) -> CoreResult<Option<VideoFrame>>;
}

/// An ordered sink for annotated frames.
///
/// Frames must be written in the order received; `finish` flushes and closes
/// the underlying writer and must be called exactly once after the last
/// frame.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &VideoFrame) -> CoreResult<()>;
    fn finish(&mut self) -> CoreResult<()>;
}

/// Statistics accumulated over one streaming pass.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Frames read, annotated, and written (always 1:1).
    pub frames_processed: u64,
    /// Total face boxes produced by the detector across all frames.
    pub faces_detected: u64,
    /// Frames whose face-detection call itself failed (treated as zero
    /// faces; the frame was still emitted).
    pub detection_failures: u64,
    /// Individual faces whose emotion classification failed (box-only
    /// overlay, no tally update).
    pub classification_failures: u64,
    /// Final per-label emotion counts.
    pub emotions: EmotionTally,
    /// Wall-clock time spent streaming.
    pub elapsed: Duration,
}

/// Streams every frame from `source` through the fusion pipeline into
/// `sink`, returning the final statistics.
///
/// The timeline must already be built; the caller owns the Init state
/// (probing the input, building the timeline, opening source and sink) so
/// that fatal setup errors occur before any output file exists.
pub fn annotate_stream<S, K, L, C>(
    source: &mut S,
    sink: &mut K,
    timeline: &SegmentTimeline,
    detector: &FaceDetector<L>,
    analyzer: &EmotionAnalyzer<C>,
    renderer: &OverlayRenderer,
    fps: f64,
) -> CoreResult<PipelineOutcome>
where
    S: FrameSource,
    K: FrameSink,
    L: FaceLocator,
    C: EmotionClassifier,
{
    if !(fps.is_finite() && fps > 0.0) {
        return Err(CoreError::Config(format!("invalid frame rate: {fps}")));
    }

    let start = Instant::now();
    let mut tally = EmotionTally::new();
    let mut frame_number: u64 = 0;
    let mut faces_detected: u64 = 0;
    let mut detection_failures: u64 = 0;
    let mut classification_failures: u64 = 0;

    // Streaming state: one frame in flight at a time.
    while let Some(mut frame) = source.next_frame()? {
        let t = frame_number as f64 / fps;
        let matched = timeline.query(t);

        // A locator failure degrades this frame to "zero faces detected";
        // the frame is still emitted with activity text, if any.
        let boxes = match detector.locate(&frame.image) {
            Ok(boxes) => boxes,
            Err(e) => {
                log::warn!("Face detection failed on frame {frame_number}: {e}");
                detection_failures += 1;
                Vec::new()
            }
        };
        faces_detected += boxes.len() as u64;

        let mut observations = Vec::with_capacity(boxes.len());
        for b in boxes {
            let observation = analyzer.analyze(&frame.image, b);
            match observation.emotion {
                EmotionOutcome::Classified(label) => tally.record(label),
                EmotionOutcome::Failed(_) => classification_failures += 1,
            }
            observations.push(observation);
        }

        renderer.render(&mut frame.image, &matched, &observations);
        sink.write_frame(&frame)?;
        frame_number += 1;
    }

    // Finalized: release the output before reporting.
    sink.finish()?;

    log::info!(
        "Annotated {frame_number} frames ({faces_detected} faces, {} classified)",
        tally.total()
    );

    Ok(PipelineOutcome {
        frames_processed: frame_number,
        faces_detected,
        detection_failures,
        classification_failures,
        emotions: tally,
        elapsed: start.elapsed(),
    })
}
