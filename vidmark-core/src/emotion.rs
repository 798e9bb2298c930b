// ============================================================================
// vidmark-core/src/emotion.rs
// ============================================================================
//
// EMOTION CLASSIFIER ADAPTER: Per-Face Classification with Failure Isolation
//
// The adapter crops the frame to a detected face box and asks the classifier
// for a dominant emotion. Classification runs in lenient mode: the box
// already came from a face detector, so the classifier must not refuse the
// crop merely because its own internal face re-check disagrees.
//
// Every failure for a single box (classifier error, unknown label, empty
// region after clamping) is isolated to that one face: it becomes
// `EmotionOutcome::Failed`, is logged at warn, adds nothing to the tally, and
// leaves the rest of the frame's faces untouched. The adapter never returns
// an `Err`.
//
// AI-ASSISTANT-INFO: Emotion labels, classifier trait, per-face adapter

use std::fmt;
use std::str::FromStr;

use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

use crate::detection::BoundingBox;
use crate::error::CoreResult;

/// Dominant emotion labels understood by the system.
///
/// Mirrors the closed label set of the upstream emotion models. A service
/// response outside this set is treated as a classification failure for that
/// face rather than silently inventing a new category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// The lowercase label used in reports and overlays.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "angry" => Ok(Emotion::Angry),
            "disgust" => Ok(Emotion::Disgust),
            "fear" => Ok(Emotion::Fear),
            "happy" => Ok(Emotion::Happy),
            "sad" => Ok(Emotion::Sad),
            "surprise" => Ok(Emotion::Surprise),
            "neutral" => Ok(Emotion::Neutral),
            other => Err(format!("unknown emotion label '{other}'")),
        }
    }
}

/// The collaborator that infers a dominant emotion from a face crop.
///
/// Implementations must operate leniently: the crop is already known to come
/// from a face detector, so an internal face re-check failing is not grounds
/// for an error.
pub trait EmotionClassifier {
    fn classify_emotion(&self, face: &RgbImage) -> CoreResult<Emotion>;
}

impl<T: EmotionClassifier + ?Sized> EmotionClassifier for &T {
    fn classify_emotion(&self, face: &RgbImage) -> CoreResult<Emotion> {
        (**self).classify_emotion(face)
    }
}

/// Outcome of attempting emotion classification on one face box.
///
/// The single tagged variant consumed uniformly by the overlay renderer (draw
/// label or box only) and the aggregator (record or skip).
#[derive(Debug, Clone, PartialEq)]
pub enum EmotionOutcome {
    /// Classification succeeded with a dominant emotion.
    Classified(Emotion),
    /// Classification failed for this face only; the reason is diagnostic.
    Failed(String),
}

/// One detected face with its (clamped) region and classification outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceObservation {
    pub region: BoundingBox,
    pub emotion: EmotionOutcome,
}

impl FaceObservation {
    /// The classified emotion, if any.
    pub fn label(&self) -> Option<Emotion> {
        match self.emotion {
            EmotionOutcome::Classified(e) => Some(e),
            EmotionOutcome::Failed(_) => None,
        }
    }
}

/// Per-face emotion adapter: clamp, crop, classify, isolate failures.
pub struct EmotionAnalyzer<C> {
    classifier: C,
}

impl<C: EmotionClassifier> EmotionAnalyzer<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Classifies the face at `region` in `frame`.
    ///
    /// Always returns an observation: any failure is folded into
    /// `EmotionOutcome::Failed` with a warning log. The returned region is
    /// the clamped box, ready for drawing.
    pub fn analyze(&self, frame: &RgbImage, region: BoundingBox) -> FaceObservation {
        let clamped = region.clamped(frame.width(), frame.height());

        if clamped.is_empty() {
            log::warn!(
                "Face region {:?} is empty after clamping to {}x{}; skipping classification",
                region,
                frame.width(),
                frame.height()
            );
            return FaceObservation {
                region: clamped,
                emotion: EmotionOutcome::Failed("empty region after clamping".to_string()),
            };
        }

        let crop = imageops::crop_imm(
            frame,
            clamped.left,
            clamped.top,
            clamped.width(),
            clamped.height(),
        )
        .to_image();

        match self.classifier.classify_emotion(&crop) {
            Ok(emotion) => FaceObservation {
                region: clamped,
                emotion: EmotionOutcome::Classified(emotion),
            },
            Err(e) => {
                log::warn!("Emotion classification failed for face {clamped:?}: {e}");
                FaceObservation {
                    region: clamped,
                    emotion: EmotionOutcome::Failed(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::cell::RefCell;

    struct AlwaysHappy;

    impl EmotionClassifier for AlwaysHappy {
        fn classify_emotion(&self, _face: &RgbImage) -> CoreResult<Emotion> {
            Ok(Emotion::Happy)
        }
    }

    struct AlwaysFails;

    impl EmotionClassifier for AlwaysFails {
        fn classify_emotion(&self, _face: &RgbImage) -> CoreResult<Emotion> {
            Err(CoreError::ServiceResponse("model exploded".to_string()))
        }
    }

    /// Records the crop dimensions it was handed.
    struct CropProbe(RefCell<Vec<(u32, u32)>>);

    impl EmotionClassifier for CropProbe {
        fn classify_emotion(&self, face: &RgbImage) -> CoreResult<Emotion> {
            self.0.borrow_mut().push((face.width(), face.height()));
            Ok(Emotion::Neutral)
        }
    }

    fn frame() -> RgbImage {
        RgbImage::new(100, 80)
    }

    #[test]
    fn successful_classification_yields_label() {
        let analyzer = EmotionAnalyzer::new(AlwaysHappy);
        let obs = analyzer.analyze(
            &frame(),
            BoundingBox {
                top: 10,
                right: 50,
                bottom: 40,
                left: 20,
            },
        );
        assert_eq!(obs.label(), Some(Emotion::Happy));
    }

    #[test]
    fn classifier_error_becomes_failed_outcome_not_err() {
        let analyzer = EmotionAnalyzer::new(AlwaysFails);
        let obs = analyzer.analyze(
            &frame(),
            BoundingBox {
                top: 0,
                right: 30,
                bottom: 30,
                left: 0,
            },
        );
        assert!(matches!(obs.emotion, EmotionOutcome::Failed(_)));
        assert_eq!(obs.label(), None);
    }

    #[test]
    fn empty_region_after_clamp_fails_without_calling_classifier() {
        let analyzer = EmotionAnalyzer::new(AlwaysFails); // would error if called
        let obs = analyzer.analyze(
            &frame(),
            BoundingBox {
                top: 200,
                right: 300,
                bottom: 250,
                left: 250,
            },
        );
        assert!(matches!(obs.emotion, EmotionOutcome::Failed(ref r) if r.contains("empty")));
    }

    #[test]
    fn crop_is_clamped_to_frame_bounds() {
        let probe = CropProbe(RefCell::new(Vec::new()));
        let analyzer = EmotionAnalyzer::new(&probe);
        let obs = analyzer.analyze(
            &frame(),
            BoundingBox {
                top: 40,
                right: 150, // extends past the 100px frame width
                bottom: 120, // extends past the 80px frame height
                left: 60,
            },
        );
        assert_eq!(probe.0.borrow().as_slice(), &[(40, 40)]);
        assert_eq!(obs.region.right, 100);
        assert_eq!(obs.region.bottom, 80);
    }

    #[test]
    fn emotion_labels_round_trip_from_str() {
        for e in [
            Emotion::Angry,
            Emotion::Disgust,
            Emotion::Fear,
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Surprise,
            Emotion::Neutral,
        ] {
            assert_eq!(e.as_str().parse::<Emotion>().unwrap(), e);
        }
        assert!("confused".parse::<Emotion>().is_err());
    }
}
