//! Shared in-memory doubles for pipeline integration tests.
//!
//! These stand in for the ffmpeg source/sink and the remote collaborators so
//! the streaming driver can be exercised end to end without external tools
//! or network access.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use image::{Rgb, RgbImage};

use vidmark_core::error::{CoreError, CoreResult};
use vidmark_core::{
    ActivityDetector, BoundingBox, Emotion, EmotionClassifier, FaceLocator, FrameSink,
    FrameSource, Segment, VideoFrame,
};

/// Frame source backed by a queue of prepared frames, optionally failing
/// mid-stream at a given frame index.
pub struct InMemorySource {
    frames: VecDeque<VideoFrame>,
    fail_at: Option<u64>,
}

impl InMemorySource {
    pub fn new(frames: Vec<VideoFrame>) -> Self {
        Self {
            frames: frames.into(),
            fail_at: None,
        }
    }

    /// Produces `count` uniform gray frames of the given dimensions.
    pub fn uniform(count: u64, width: u32, height: u32) -> Self {
        let frames = (0..count)
            .map(|index| VideoFrame {
                index,
                image: RgbImage::from_pixel(width, height, Rgb([40, 40, 40])),
            })
            .collect();
        Self::new(frames)
    }

    /// Makes `next_frame` return an error instead of the frame at `index`.
    pub fn failing_at(mut self, index: u64) -> Self {
        self.fail_at = Some(index);
        self
    }
}

impl FrameSource for InMemorySource {
    fn next_frame(&mut self) -> CoreResult<Option<VideoFrame>> {
        match self.frames.pop_front() {
            Some(frame) => {
                if self.fail_at == Some(frame.index) {
                    return Err(CoreError::UnreadableInput(format!(
                        "decode error at frame {}",
                        frame.index
                    )));
                }
                Ok(Some(frame))
            }
            None => Ok(None),
        }
    }
}

/// Frame sink that records everything written to it.
#[derive(Default)]
pub struct InMemorySink {
    pub frames: Vec<VideoFrame>,
    pub finished: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for InMemorySink {
    fn write_frame(&mut self, frame: &VideoFrame) -> CoreResult<()> {
        assert!(!self.finished, "write after finish");
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> CoreResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Locator scripted with one result per call, in order. Calls past the end
/// of the script return no faces.
pub struct SequenceLocator {
    script: RefCell<VecDeque<CoreResult<Vec<BoundingBox>>>>,
}

impl SequenceLocator {
    pub fn new(script: Vec<CoreResult<Vec<BoundingBox>>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
        }
    }
}

impl FaceLocator for SequenceLocator {
    fn locate_faces(&self, _image: &RgbImage) -> CoreResult<Vec<BoundingBox>> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Locator that reports `boxes` for every call whose index falls inside
/// `range` (zero-based call counter), and nothing otherwise.
pub struct WindowedLocator {
    boxes: Vec<BoundingBox>,
    range: std::ops::RangeInclusive<u64>,
    calls: RefCell<u64>,
}

impl WindowedLocator {
    pub fn new(boxes: Vec<BoundingBox>, range: std::ops::RangeInclusive<u64>) -> Self {
        Self {
            boxes,
            range,
            calls: RefCell::new(0),
        }
    }
}

impl FaceLocator for WindowedLocator {
    fn locate_faces(&self, _image: &RgbImage) -> CoreResult<Vec<BoundingBox>> {
        let mut calls = self.calls.borrow_mut();
        let index = *calls;
        *calls += 1;
        if self.range.contains(&index) {
            Ok(self.boxes.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

/// Classifier that always returns the same label.
pub struct StaticClassifier(pub Emotion);

impl EmotionClassifier for StaticClassifier {
    fn classify_emotion(&self, _face: &RgbImage) -> CoreResult<Emotion> {
        Ok(self.0)
    }
}

/// Classifier scripted with one result per call, in order. Calls past the
/// end of the script fail.
pub struct SequenceClassifier {
    script: RefCell<VecDeque<CoreResult<Emotion>>>,
}

impl SequenceClassifier {
    pub fn new(script: Vec<CoreResult<Emotion>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
        }
    }
}

impl EmotionClassifier for SequenceClassifier {
    fn classify_emotion(&self, _face: &RgbImage) -> CoreResult<Emotion> {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::ServiceResponse("script exhausted".to_string())))
    }
}

/// Detector that returns a fixed set of segments for any input path.
pub struct StaticDetector(pub Vec<Segment>);

impl ActivityDetector for StaticDetector {
    fn detect_activities(&self, _video: &Path) -> CoreResult<Vec<Segment>> {
        Ok(self.0.clone())
    }
}

/// Detector whose service is unreachable.
pub struct FailingDetector;

impl ActivityDetector for FailingDetector {
    fn detect_activities(&self, _video: &Path) -> CoreResult<Vec<Segment>> {
        Err(CoreError::TimelineUnavailable(
            "annotation service timed out".to_string(),
        ))
    }
}

pub fn segment(description: &str, start: f64, end: f64, confidence: f32) -> Segment {
    Segment {
        description: description.to_string(),
        start_time: start,
        end_time: end,
        confidence,
    }
}

pub fn face_box(left: u32, top: u32, right: u32, bottom: u32) -> BoundingBox {
    BoundingBox {
        top,
        right,
        bottom,
        left,
    }
}
