//! Segment timeline: the coarse activity annotations for one video.
//!
//! The timeline is built once, before the frame loop starts, from the raw
//! segments returned by the activity-detection collaborator. After
//! construction it is immutable; the pipeline driver queries it by timestamp
//! for every frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// A labeled, time-bounded activity annotation with a confidence score.
///
/// Times are in seconds from the start of the video. Invariant (enforced at
/// timeline build time): `start_time <= end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Human-readable activity description (e.g., "running").
    pub description: String,
    /// Segment start, seconds.
    pub start_time: f64,
    /// Segment end, seconds.
    pub end_time: f64,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
}

impl Segment {
    /// Whether the given timestamp falls inside this segment, inclusive on
    /// both endpoints.
    pub fn contains(&self, t: f64) -> bool {
        self.start_time <= t && t <= self.end_time
    }
}

/// The collaborator that produces raw activity segments for a video.
///
/// Implementations are expected to perform one bounded-wait request; failure
/// or timeout must surface as `CoreError::TimelineUnavailable`, which is
/// fatal to the whole run.
pub trait ActivityDetector {
    /// Submits the video for label detection and returns raw segments with
    /// time offsets converted to seconds.
    fn detect_activities(&self, video: &Path) -> CoreResult<Vec<Segment>>;
}

/// Immutable ordered collection of accepted activity segments.
///
/// Segment order is the detector's output order; it is irrelevant for query
/// correctness but kept stable for reporting and for joining descriptions in
/// overlays.
#[derive(Debug, Clone, Default)]
pub struct SegmentTimeline {
    segments: Vec<Segment>,
}

impl SegmentTimeline {
    /// Builds a timeline from raw detector output.
    ///
    /// Only segments with `confidence > min_confidence` are retained. Raw
    /// segments violating `start_time <= end_time` are dropped with a
    /// warning; they indicate a malformed detector response, not a caller
    /// error. A resulting empty timeline is valid: frames simply carry no
    /// activity text.
    pub fn build(raw: Vec<Segment>, min_confidence: f32) -> Self {
        let mut segments = Vec::with_capacity(raw.len());
        for segment in raw {
            if segment.start_time > segment.end_time {
                log::warn!(
                    "Dropping segment '{}' with inverted interval [{}, {}]",
                    segment.description,
                    segment.start_time,
                    segment.end_time
                );
                continue;
            }
            if segment.confidence > min_confidence {
                segments.push(segment);
            } else {
                log::debug!(
                    "Dropping low-confidence segment '{}' ({:.3} <= {:.3})",
                    segment.description,
                    segment.confidence,
                    min_confidence
                );
            }
        }
        Self { segments }
    }

    /// Returns every stored segment whose `[start_time, end_time]` interval
    /// contains `t`, inclusive at both endpoints, in storage order. Multiple
    /// overlapping segments are all returned; no deduplication.
    pub fn query(&self, t: f64) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.contains(t)).collect()
    }

    /// All stored segments in storage order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of stored segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the timeline holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
