// ============================================================================
// vidmark-core/src/detection.rs
// ============================================================================
//
// FACE DETECTION ADAPTER: Downscaled Localization with Coordinate Rescaling
//
// Face localization cost scales with pixel count, so the adapter runs the
// locator on a frame downscaled by a fixed integral denominator (default 4,
// i.e. 0.25x per dimension, ~16x fewer pixels) and multiplies every returned
// coordinate by the same denominator to map back to full resolution. Face
// geometry is coarse enough that detection at this scale remains usable for
// typical face sizes.
//
// The locator itself sits behind the `FaceLocator` trait so the pipeline can
// be exercised with scripted implementations in tests, following the
// dependency-injection pattern used throughout the external module.
//
// AI-ASSISTANT-INFO: Bounding boxes, FaceLocator trait, downscaling adapter

use image::{imageops, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Pixel-space rectangle locating a detected face.
///
/// Edges follow the (top, right, bottom, left) convention of the upstream
/// face locators. Coordinates are unsigned full-resolution pixels once they
/// leave `FaceDetector::locate`; they must still be clamped to the actual
/// frame bounds before being used to crop or draw (see `clamped`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl BoundingBox {
    /// Multiplies every edge by `factor`. Used to map coordinates detected on
    /// a downscaled frame back to the original frame's coordinate space.
    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            top: self.top * factor,
            right: self.right * factor,
            bottom: self.bottom * factor,
            left: self.left * factor,
        }
    }

    /// Clamps the box to a `width` x `height` frame. The result is guaranteed
    /// to satisfy `left <= right <= width` and `top <= bottom <= height`, so
    /// it is always safe to crop with.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let right = self.right.min(width);
        let bottom = self.bottom.min(height);
        Self {
            top: self.top.min(bottom),
            right,
            bottom,
            left: self.left.min(right),
        }
    }

    /// Box width in pixels. Zero for degenerate boxes.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Box height in pixels. Zero for degenerate boxes.
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether the box encloses no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// The collaborator that locates faces in an image.
///
/// Returned boxes are in the coordinate space of the image that was passed
/// in. An empty list is a valid "no faces" result, not a failure; an `Err`
/// means the locator itself broke for this image.
pub trait FaceLocator {
    fn locate_faces(&self, image: &RgbImage) -> CoreResult<Vec<BoundingBox>>;
}

impl<T: FaceLocator + ?Sized> FaceLocator for &T {
    fn locate_faces(&self, image: &RgbImage) -> CoreResult<Vec<BoundingBox>> {
        (**self).locate_faces(image)
    }
}

/// Per-frame face detection adapter: downscale, locate, rescale.
pub struct FaceDetector<L> {
    locator: L,
    downscale: u32,
}

impl<L: FaceLocator> FaceDetector<L> {
    /// Creates an adapter that detects on a `1/downscale`-per-dimension frame.
    /// A `downscale` of 1 disables the optimization.
    pub fn new(locator: L, downscale: u32) -> Self {
        debug_assert!(downscale >= 1);
        Self { locator, downscale }
    }

    /// Locates faces in `frame`, returning boxes in full-resolution
    /// coordinates.
    ///
    /// Locator errors propagate: the caller (the pipeline driver) decides
    /// how to contain them. Absence of faces is `Ok(vec![])`.
    pub fn locate(&self, frame: &RgbImage) -> CoreResult<Vec<BoundingBox>> {
        if self.downscale == 1 {
            return self.locator.locate_faces(frame);
        }

        let small_w = (frame.width() / self.downscale).max(1);
        let small_h = (frame.height() / self.downscale).max(1);
        let small = imageops::resize(frame, small_w, small_h, imageops::FilterType::Triangle);

        let boxes = self.locator.locate_faces(&small)?;
        Ok(boxes.iter().map(|b| b.scaled(self.downscale)).collect())
    }
}
