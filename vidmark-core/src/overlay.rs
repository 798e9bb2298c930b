// ============================================================================
// vidmark-core/src/overlay.rs
// ============================================================================
//
// OVERLAY RENDERER: Burned-In Activity Text and Face/Emotion Annotations
//
// Two independent overlay concerns are composed onto the same frame buffer:
//
// 1. Activity text: the joined descriptions of every segment matching the
//    frame's timestamp, drawn once at a fixed top-left anchor.
// 2. Per-face overlay: a rectangle at each (clamped) face box, plus a filled
//    label strip and emotion text when classification succeeded for that
//    face. A face whose classification failed gets the rectangle only.
//
// Rendering is deterministic given identical inputs: no randomness, no
// frame-to-frame state, no mutation outside the overlays themselves.
//
// Fonts are not bundled with the library. The renderer loads one from a
// configured path or from a short list of common system locations; when none
// is available it still draws all box geometry and omits only the text runs.
//
// AI-ASSISTANT-INFO: Frame overlay drawing (rectangles, label strips, text)

use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::emotion::{EmotionOutcome, FaceObservation};
use crate::error::{CoreError, CoreResult};
use crate::timeline::Segment;

// Drawing constants

/// Top-left anchor of the activity text run.
const ACTIVITY_TEXT_POS: (i32, i32) = (10, 10);
/// Pixel scale of the activity text.
const ACTIVITY_TEXT_SCALE: f32 = 28.0;
/// Activity text color (yellow).
const ACTIVITY_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
/// Separator between overlapping segment descriptions.
const ACTIVITY_SEPARATOR: &str = ", ";

/// Face box outline and label strip color (blue).
const FACE_BOX_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
/// Face box outline thickness in pixels.
const FACE_BOX_THICKNESS: u32 = 2;
/// Height of the filled label strip at the bottom of a classified face box.
const LABEL_STRIP_HEIGHT: u32 = 35;
/// Pixel scale of the emotion label text.
const LABEL_TEXT_SCALE: f32 = 24.0;
/// Emotion label text color (white).
const LABEL_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
/// Horizontal/vertical inset of the label text within its strip.
const LABEL_TEXT_INSET: i32 = 6;

/// Common system font locations probed when no font path is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
];

/// Returns the first font file from the built-in search list that exists.
pub fn find_system_font() -> Option<PathBuf> {
    FONT_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Draws activity text and face/emotion overlays onto frames.
pub struct OverlayRenderer {
    font: Option<FontArc>,
}

impl OverlayRenderer {
    /// Creates a renderer with the given font.
    pub fn with_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    /// Creates a renderer that draws geometry only. Logged once here rather
    /// than per frame.
    pub fn without_font() -> Self {
        log::warn!("No usable overlay font; activity and emotion text will be omitted");
        Self { font: None }
    }

    /// Loads a font from `path` and creates a renderer with it.
    pub fn from_font_path(path: &Path) -> CoreResult<Self> {
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes).map_err(|e| {
            CoreError::Config(format!("failed to load font {}: {e}", path.display()))
        })?;
        Ok(Self::with_font(font))
    }

    /// Creates a renderer from an optional configured font path, falling back
    /// to the system search list and then to geometry-only rendering.
    ///
    /// A configured path that fails to load is an error (the user asked for
    /// it explicitly); a missing system font is not.
    pub fn discover(font_path: Option<&Path>) -> CoreResult<Self> {
        match font_path {
            Some(path) => Self::from_font_path(path),
            None => match find_system_font() {
                Some(found) => {
                    log::debug!("Using system font {}", found.display());
                    Self::from_font_path(&found)
                }
                None => Ok(Self::without_font()),
            },
        }
    }

    /// Whether this renderer can draw text runs.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Composes both overlay concerns onto `image`.
    ///
    /// `activities` are the timeline segments matching the frame's timestamp,
    /// in timeline storage order; `observations` are the frame's (already
    /// clamped) face observations. No other pixels are mutated.
    pub fn render(
        &self,
        image: &mut RgbImage,
        activities: &[&Segment],
        observations: &[FaceObservation],
    ) {
        if !activities.is_empty() {
            let text = activities
                .iter()
                .map(|s| s.description.as_str())
                .collect::<Vec<_>>()
                .join(ACTIVITY_SEPARATOR);
            self.draw_text(
                image,
                ACTIVITY_TEXT_COLOR,
                ACTIVITY_TEXT_POS.0,
                ACTIVITY_TEXT_POS.1,
                ACTIVITY_TEXT_SCALE,
                &text,
            );
        }

        for observation in observations {
            self.draw_face(image, observation);
        }
    }

    fn draw_face(&self, image: &mut RgbImage, observation: &FaceObservation) {
        let b = observation.region.clamped(image.width(), image.height());
        if b.is_empty() {
            return;
        }

        // Outline, inset ring by ring for the configured thickness.
        for t in 0..FACE_BOX_THICKNESS {
            let w = b.width().saturating_sub(2 * t);
            let h = b.height().saturating_sub(2 * t);
            if w == 0 || h == 0 {
                break;
            }
            draw_hollow_rect_mut(
                image,
                Rect::at((b.left + t) as i32, (b.top + t) as i32).of_size(w, h),
                FACE_BOX_COLOR,
            );
        }

        // Label strip and emotion text only for classified faces.
        if let EmotionOutcome::Classified(emotion) = observation.emotion {
            let strip_height = LABEL_STRIP_HEIGHT.min(b.height());
            let strip_top = b.bottom - strip_height;
            draw_filled_rect_mut(
                image,
                Rect::at(b.left as i32, strip_top as i32).of_size(b.width(), strip_height),
                FACE_BOX_COLOR,
            );
            self.draw_text(
                image,
                LABEL_TEXT_COLOR,
                b.left as i32 + LABEL_TEXT_INSET,
                strip_top as i32 + LABEL_TEXT_INSET,
                LABEL_TEXT_SCALE,
                emotion.as_str(),
            );
        }
    }

    fn draw_text(
        &self,
        image: &mut RgbImage,
        color: Rgb<u8>,
        x: i32,
        y: i32,
        scale: f32,
        text: &str,
    ) {
        if let Some(font) = &self.font {
            draw_text_mut(image, color, x, y, PxScale::from(scale), font, text);
        }
    }
}
