//! Raw text-recognition input
//!
//! Types produced by the external recognition engine, one set per captured
//! frame, plus the region-of-interest filter applied before any extraction.

use serde::{Deserialize, Serialize};

use crate::config::RoiConfig;

/// Rectangle in normalized image coordinates.
///
/// All values are in [0, 1]. The origin is the bottom-left corner of the
/// frame and `y` increases upward, matching the recognition engine's
/// coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl NormalizedRect {
    /// Create a rectangle from its bottom-left corner and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal center
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// A unit of recognized text with position and confidence.
///
/// Produced once per frame by the recognition engine; no ordering is
/// guaranteed by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Recognized text content
    pub text: String,
    /// Recognition confidence (0.0 - 1.0)
    pub confidence: f32,
    /// Bounding box in normalized coordinates
    pub bounds: NormalizedRect,
}

impl TextObservation {
    /// Create an observation
    pub fn new(text: impl Into<String>, confidence: f32, bounds: NormalizedRect) -> Self {
        Self {
            text: text.into(),
            confidence,
            bounds,
        }
    }
}

/// Keep only observations whose center falls inside the scan region.
///
/// Applied to raw observations before any extraction step; text near the
/// frame edges is usually neighboring books or background clutter.
pub fn filter_region_of_interest(
    observations: &[TextObservation],
    roi: &RoiConfig,
) -> Vec<TextObservation> {
    observations
        .iter()
        .filter(|obs| {
            let cx = obs.bounds.center_x();
            let cy = obs.bounds.center_y();
            cx >= roi.x_min && cx <= roi.x_max && cy >= roi.y_min && cy <= roi.y_max
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(text: &str, cx: f32, cy: f32) -> TextObservation {
        TextObservation::new(text, 0.9, NormalizedRect::new(cx - 0.05, cy - 0.02, 0.1, 0.04))
    }

    #[test]
    fn test_rect_center() {
        let rect = NormalizedRect::new(0.2, 0.4, 0.2, 0.2);
        assert!((rect.center_x() - 0.3).abs() < 1e-6);
        assert!((rect.center_y() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_roi_keeps_centered_text() {
        let roi = RoiConfig::default();
        let kept = filter_region_of_interest(&[obs("title", 0.5, 0.5)], &roi);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_roi_drops_edge_text() {
        let roi = RoiConfig::default();
        let observations = vec![
            obs("neighbor spine", 0.05, 0.5),
            obs("price sticker", 0.5, 0.05),
            obs("title", 0.5, 0.6),
        ];
        let kept = filter_region_of_interest(&observations, &roi);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "title");
    }
}
