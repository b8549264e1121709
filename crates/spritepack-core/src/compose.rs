//! Export compositing.
//!
//! Given a solved output width, the compositor resizes the source with a
//! smooth filter, measures the alpha-trimmed silhouette, derives the output
//! canvas under the fixed padding rules, and pastes the resized sprite onto
//! a transparent canvas so that the center guide lands on an exact pixel
//! column and the silhouette touches the bottom edge.
//!
//! # Padding rules
//!
//! - Horizontal: the output width is `2 * ceil(half_width)` where
//!   `half_width` is the larger center-to-silhouette distance plus
//!   [`FIXED_PADDING_PX`](crate::FIXED_PADDING_PX), forced even so the
//!   center guide cannot wobble by a pixel between export runs.
//! - Vertical: fixed 32px top padding, 0px bottom padding.

use image::{imageops, RgbaImage};
use thiserror::Error;

use crate::alpha::AlphaPlane;
use crate::calibration::SpriteCalibration;
use crate::solve::round_half_away;
use crate::{EXPORT_BOUNDS_ALPHA_THRESHOLD, FIXED_PADDING_PX};

/// Errors that can occur during export compositing.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Source bitmap or solved width has a zero dimension.
    #[error("Invalid geometry: source {width}x{height}, solved width {solved_width}")]
    InvalidGeometry {
        width: u32,
        height: u32,
        solved_width: u32,
    },
}

/// Resize `source` to the solved width and composite it onto a transparent
/// canvas sized and positioned by the padding rules.
///
/// The alpha bounding box is measured at the stricter
/// [`EXPORT_BOUNDS_ALPHA_THRESHOLD`](crate::EXPORT_BOUNDS_ALPHA_THRESHOLD)
/// so antialiasing fringe does not inflate the silhouette; a fully
/// transparent resize falls back to the full canvas rectangle.
pub fn compose(
    source: &RgbaImage,
    calibration: &SpriteCalibration,
    solved_width: u32,
) -> Result<RgbaImage, ComposeError> {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 || solved_width == 0 {
        return Err(ComposeError::InvalidGeometry {
            width: src_w,
            height: src_h,
            solved_width,
        });
    }

    let scale = solved_width as f64 / src_w as f64;
    let scaled_h = round_half_away(src_h as f64 * scale).max(1) as u32;
    let scaled = imageops::resize(
        source,
        solved_width,
        scaled_h,
        imageops::FilterType::CatmullRom,
    );

    let (bbox_left, bbox_top, bbox_right, bbox_bottom) =
        match AlphaPlane::new(&scaled).bounding_box(EXPORT_BOUNDS_ALPHA_THRESHOLD) {
            Some((l, t, r, b)) => (l as f64, t as f64, r as f64, b as f64),
            None => (0.0, 0.0, solved_width as f64, scaled_h as f64),
        };

    let padding = FIXED_PADDING_PX as f64;
    let center_scaled = calibration.guide_center * scale;
    let dist_left = (center_scaled - bbox_left).max(0.0);
    let dist_right = (bbox_right - center_scaled).max(0.0);
    let half_width = dist_left.max(dist_right) + padding;
    let mut out_w = ((half_width * 2.0).ceil() as u32).max(1);
    if out_w % 2 != 0 {
        out_w += 1;
    }

    let silhouette_h = (bbox_bottom - bbox_top).max(1.0);
    let out_h = ((silhouette_h + padding).ceil() as u32).max(1);

    let paste_x = round_half_away(out_w as f64 * 0.5 - center_scaled);
    let paste_y = round_half_away(out_h as f64 - bbox_bottom);

    // Destination starts fully transparent, so alpha-over reduces to a
    // straight paste preserving source alpha; offsets may be negative and
    // are clipped by the canvas.
    let mut canvas = RgbaImage::new(out_w, out_h);
    imageops::overlay(&mut canvas, &scaled, paste_x, paste_y);
    Ok(canvas)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
