//! Per-image calibration state.
//!
//! A [`SpriteCalibration`] records the guide positions and scaling intent
//! for one source image. It is a plain struct: the host binds it to editable
//! fields however it likes and passes it by reference into the pure
//! detection, solving and compositing functions.
//!
//! # Invariants
//!
//! - `0 <= guide_left < guide_right <= source_w`
//! - `0 <= guide_center <= source_w` (the center may sit outside the
//!   left/right bracket for asymmetric sprites)
//! - `0 <= baseline_y <= source_h`
//!
//! [`SpriteCalibration::clamp_to_bounds`] re-establishes these after
//! external edits.

use serde::{Deserialize, Serialize};

use crate::detect::Guides;
use crate::DEFAULT_TARGET_SPAN;

/// Footprint preset mapping to a fixed target span, or `Custom` for a
/// user-entered span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FitMode {
    #[serde(rename = "1x1")]
    OneByOne,
    #[serde(rename = "1x2")]
    OneByTwo,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[default]
    #[serde(rename = "full_2x2")]
    FullTwoByTwo,
    #[serde(rename = "2x3")]
    TwoByThree,
    #[serde(rename = "3x2")]
    ThreeByTwo,
    #[serde(rename = "custom")]
    Custom,
}

/// Preset table: (mode, target span in output pixels).
const FIT_MODE_PRESETS: &[(FitMode, f64)] = &[
    (FitMode::OneByOne, 538.0),
    (FitMode::OneByTwo, 810.0),
    (FitMode::TwoByOne, 810.0),
    (FitMode::FullTwoByTwo, DEFAULT_TARGET_SPAN),
    (FitMode::TwoByThree, 1350.0),
    (FitMode::ThreeByTwo, 1350.0),
];

impl FitMode {
    /// Fixed target span for this preset, or `None` for `Custom`.
    pub fn preset_span(self) -> Option<f64> {
        FIT_MODE_PRESETS
            .iter()
            .find(|(mode, _)| *mode == self)
            .map(|(_, span)| *span)
    }

    /// Footprint tile counts `(tiles_x, tiles_y)` implied by this preset.
    pub fn tiles(self) -> Option<(u32, u32)> {
        match self {
            FitMode::OneByOne => Some((1, 1)),
            FitMode::OneByTwo => Some((1, 2)),
            FitMode::TwoByOne => Some((2, 1)),
            FitMode::FullTwoByTwo => Some((2, 2)),
            FitMode::TwoByThree => Some((2, 3)),
            FitMode::ThreeByTwo => Some((3, 2)),
            FitMode::Custom => None,
        }
    }
}

/// Calibration guides and scaling intent for one source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteCalibration {
    /// Source image width in pixels.
    pub source_w: u32,
    /// Source image height in pixels.
    pub source_h: u32,
    /// Left guide, pixel x in source space.
    pub guide_left: f64,
    /// Center guide, pixel x in source space.
    pub guide_center: f64,
    /// Right guide, pixel x in source space.
    pub guide_right: f64,
    /// Baseline, pixel y in source space.
    pub baseline_y: f64,
    /// Footprint preset controlling the target span.
    pub fit_mode: FitMode,
    /// Target span in output pixels; authoritative only when `fit_mode` is
    /// `Custom`.
    pub target_span: f64,
    /// Manual horizontal nudge applied by the host at placement time.
    pub offset_x: f64,
    /// Manual vertical nudge applied by the host at placement time.
    pub offset_y: f64,
}

impl SpriteCalibration {
    /// Ingestion defaults for an image of the given dimensions: guides
    /// bracket a centered span of `min(DEFAULT_TARGET_SPAN, width)` and the
    /// baseline sits on the bottom edge.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let w = width as f64;
        let center = w * 0.5;
        let span = DEFAULT_TARGET_SPAN.min(w);
        Self {
            source_w: width,
            source_h: height,
            guide_left: (center - span * 0.5).max(0.0),
            guide_center: center,
            guide_right: (center + span * 0.5).min(w),
            baseline_y: height as f64,
            fit_mode: FitMode::default(),
            target_span: DEFAULT_TARGET_SPAN,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Pixel width the guides currently bracket, floored at 1.
    pub fn measured_span(&self) -> f64 {
        (self.guide_right - self.guide_left).max(1.0)
    }

    /// Target span from the fit-mode preset, or the custom span floored
    /// at 1.
    pub fn effective_target_span(&self) -> f64 {
        self.fit_mode
            .preset_span()
            .unwrap_or_else(|| self.target_span.max(1.0))
    }

    /// Nominal (pre-solve) scale factor from measured to target span.
    pub fn scale_factor(&self) -> f64 {
        self.effective_target_span() / self.measured_span()
    }

    /// Adopt auto-aligned guides, leaving scaling intent untouched.
    pub fn apply_guides(&mut self, guides: &Guides) {
        self.guide_left = guides.left;
        self.guide_center = guides.center;
        self.guide_right = guides.right;
        self.baseline_y = guides.baseline_y;
    }

    /// Clamp all fields back into range after external edits.
    pub fn clamp_to_bounds(&mut self) {
        let w = self.source_w as f64;
        let h = self.source_h as f64;
        self.guide_left = self.guide_left.clamp(0.0, w);
        self.guide_center = self.guide_center.clamp(0.0, w);
        self.guide_right = self.guide_right.max(self.guide_left + 1.0).min(w);
        self.baseline_y = self.baseline_y.clamp(0.0, h);
        self.target_span = self.target_span.max(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_defaults_wide_image() {
        let calib = SpriteCalibration::from_dimensions(2000, 1200);
        assert_eq!(calib.guide_center, 1000.0);
        assert_eq!(calib.guide_left, 460.0);
        assert_eq!(calib.guide_right, 1540.0);
        assert_eq!(calib.baseline_y, 1200.0);
        assert_eq!(calib.measured_span(), 1080.0);
    }

    #[test]
    fn test_ingestion_defaults_narrow_image() {
        // Span is capped at the image width, so the guides hit the edges.
        let calib = SpriteCalibration::from_dimensions(400, 300);
        assert_eq!(calib.guide_left, 0.0);
        assert_eq!(calib.guide_right, 400.0);
        assert_eq!(calib.guide_center, 200.0);
    }

    #[test]
    fn test_preset_spans() {
        assert_eq!(FitMode::OneByOne.preset_span(), Some(538.0));
        assert_eq!(FitMode::OneByTwo.preset_span(), Some(810.0));
        assert_eq!(FitMode::TwoByOne.preset_span(), Some(810.0));
        assert_eq!(FitMode::FullTwoByTwo.preset_span(), Some(1080.0));
        assert_eq!(FitMode::TwoByThree.preset_span(), Some(1350.0));
        assert_eq!(FitMode::ThreeByTwo.preset_span(), Some(1350.0));
        assert_eq!(FitMode::Custom.preset_span(), None);
    }

    #[test]
    fn test_preset_tiles() {
        assert_eq!(FitMode::FullTwoByTwo.tiles(), Some((2, 2)));
        assert_eq!(FitMode::TwoByThree.tiles(), Some((2, 3)));
        assert_eq!(FitMode::Custom.tiles(), None);
    }

    #[test]
    fn test_effective_target_span_prefers_preset() {
        let mut calib = SpriteCalibration::from_dimensions(100, 100);
        calib.fit_mode = FitMode::OneByOne;
        calib.target_span = 999.0;
        assert_eq!(calib.effective_target_span(), 538.0);

        calib.fit_mode = FitMode::Custom;
        assert_eq!(calib.effective_target_span(), 999.0);
    }

    #[test]
    fn test_custom_span_floored_at_one() {
        let mut calib = SpriteCalibration::from_dimensions(100, 100);
        calib.fit_mode = FitMode::Custom;
        calib.target_span = 0.0;
        assert_eq!(calib.effective_target_span(), 1.0);
    }

    #[test]
    fn test_measured_span_floor() {
        let mut calib = SpriteCalibration::from_dimensions(100, 100);
        calib.guide_left = 50.0;
        calib.guide_right = 50.0;
        assert_eq!(calib.measured_span(), 1.0);
    }

    #[test]
    fn test_clamp_to_bounds() {
        let mut calib = SpriteCalibration::from_dimensions(100, 80);
        calib.guide_left = -5.0;
        calib.guide_center = 200.0;
        calib.guide_right = -1.0;
        calib.baseline_y = 500.0;
        calib.target_span = 0.25;
        calib.clamp_to_bounds();

        assert_eq!(calib.guide_left, 0.0);
        assert_eq!(calib.guide_center, 100.0);
        assert_eq!(calib.guide_right, 1.0);
        assert_eq!(calib.baseline_y, 80.0);
        assert_eq!(calib.target_span, 1.0);
        assert!(calib.guide_left < calib.guide_right);
    }

    #[test]
    fn test_apply_guides() {
        let mut calib = SpriteCalibration::from_dimensions(100, 100);
        calib.fit_mode = FitMode::TwoByThree;
        calib.apply_guides(&Guides {
            left: 10.0,
            center: 42.0,
            right: 90.0,
            baseline_y: 100.0,
        });
        assert_eq!(calib.guide_left, 10.0);
        assert_eq!(calib.guide_center, 42.0);
        assert_eq!(calib.guide_right, 90.0);
        // Scaling intent survives auto-alignment.
        assert_eq!(calib.fit_mode, FitMode::TwoByThree);
    }

    #[test]
    fn test_fit_mode_serde_names() {
        let json = serde_json::to_string(&FitMode::FullTwoByTwo).unwrap();
        assert_eq!(json, "\"full_2x2\"");
        let mode: FitMode = serde_json::from_str("\"2x3\"").unwrap();
        assert_eq!(mode, FitMode::TwoByThree);
    }
}
