//! Guide auto-alignment from the alpha channel.
//!
//! Detection runs in two passes. The first pass finds the bottom-most
//! opaque row and takes its opaque extent as the raw left/right bounds and
//! the center. The second pass refines each side by looking for a genuine
//! structural vertical edge: a column where several consecutive rows share
//! the same opaque bound *and* the column just outside it stays transparent
//! for a confirmed run of rows. The refinement distinguishes a sprite's
//! flat side wall from irregular silhouette noise; when no such edge
//! exists, the raw bottom-row bounds stand.

use crate::alpha::AlphaPlane;
use crate::{AUTO_EDGE_OPAQUE_RUN_PX, AUTO_SIDE_TRANSPARENCY_PX};

/// Auto-aligned calibration guides, in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guides {
    /// Left guide column.
    pub left: f64,
    /// Center guide column, derived from the bottom-row extent.
    pub center: f64,
    /// Right guide column.
    pub right: f64,
    /// Baseline row; always the image height.
    pub baseline_y: f64,
}

/// Detect guides from the alpha channel.
///
/// Returns `None` when no pixel reaches `threshold` (a fully transparent
/// image); callers leave the existing calibration untouched in that case.
pub fn detect(plane: &AlphaPlane<'_>, threshold: u8) -> Option<Guides> {
    let width = plane.width();
    let height = plane.height();
    if width == 0 || height == 0 {
        return None;
    }

    let bottom_y = plane.bottom_opaque_row(threshold)?;

    // Guarded fallback; bottom_opaque_row already proved the row has an
    // opaque pixel.
    let (left_bottom, right_bottom, center) = match plane.row_span(bottom_y, threshold) {
        Some((l, r)) => (l, r, (l + r + 1) as f64 * 0.5),
        None => (0, width - 1, width as f64 * 0.5),
    };

    let row_bounds: Vec<Option<(u32, u32)>> =
        (0..height).map(|y| plane.row_span(y, threshold)).collect();

    let side_left = find_vertical_side_edge(plane, &row_bounds, bottom_y, threshold, Side::Left);
    let side_right = find_vertical_side_edge(plane, &row_bounds, bottom_y, threshold, Side::Right);

    let mut left = side_left.unwrap_or(left_bottom as f64);
    let mut right = side_right.unwrap_or(right_bottom as f64);
    if right <= left {
        left = left_bottom as f64;
        right = right_bottom.max(left_bottom + 1) as f64;
    }

    Some(Guides {
        left,
        center,
        right,
        baseline_y: height as f64,
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Side {
    Left,
    Right,
}

/// Scan upward from the bottom-most opaque row for a structural vertical
/// edge on the given side. Returns the bottom-most accepted edge column.
fn find_vertical_side_edge(
    plane: &AlphaPlane<'_>,
    row_bounds: &[Option<(u32, u32)>],
    bottom_y: u32,
    threshold: u8,
    side: Side,
) -> Option<f64> {
    let run = AUTO_EDGE_OPAQUE_RUN_PX;
    let min_y = run - 1;
    if bottom_y < min_y {
        return None;
    }

    'rows: for y in (min_y..=bottom_y).rev() {
        let mut bounds_sum: u64 = 0;
        let mut bounds_min = u32::MAX;
        let mut bounds_max = 0u32;
        for k in 0..run {
            let bound = match row_bounds[(y - k) as usize] {
                Some((l, r)) => match side {
                    Side::Left => l,
                    Side::Right => r,
                },
                None => continue 'rows,
            };
            bounds_sum += bound as u64;
            bounds_min = bounds_min.min(bound);
            bounds_max = bounds_max.max(bound);
        }
        if bounds_max - bounds_min > 1 {
            continue;
        }
        let edge = (bounds_sum as f64 / run as f64).round() as i64;
        let outside = match side {
            Side::Left => edge - 1,
            Side::Right => edge + 1,
        };
        if plane.transparent_run_down(outside, y, threshold) >= AUTO_SIDE_TRANSPARENCY_PX {
            return Some(edge as f64);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn rect_image(w: u32, h: u32, l: u32, t: u32, r: u32, b: u32) -> RgbaImage {
        let mut img = RgbaImage::new(w, h);
        for y in t..b {
            for x in l..r {
                img.put_pixel(x, y, Rgba([200, 200, 200, 255]));
            }
        }
        img
    }

    #[test]
    fn test_flat_bottomed_rectangle_exact_edges() {
        // 40px tall rectangle from x=20..=59 with wide transparent margins:
        // both side walls qualify as structural edges.
        let img = rect_image(100, 60, 20, 20, 60, 60);
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();

        assert_eq!(guides.left, 20.0);
        assert_eq!(guides.right, 59.0);
        assert_eq!(guides.center, 40.0);
        assert_eq!(guides.baseline_y, 60.0);
    }

    #[test]
    fn test_fully_transparent_returns_none() {
        let img = RgbaImage::new(50, 50);
        let plane = AlphaPlane::new(&img);
        assert!(detect(&plane, 12).is_none());
    }

    #[test]
    fn test_center_from_bottom_row() {
        // Bottom row spans x=10..=29: center = (10 + 29 + 1) / 2 = 20.
        let img = rect_image(60, 40, 10, 10, 30, 40);
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        assert_eq!(guides.center, 20.0);
    }

    #[test]
    fn test_short_sprite_falls_back_to_bottom_bounds() {
        // Only 5 opaque rows: no 10-row run exists, so refinement fails and
        // the raw bottom-row bounds stand.
        let img = rect_image(60, 40, 15, 35, 45, 40);
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        assert_eq!(guides.left, 15.0);
        assert_eq!(guides.right, 44.0);
    }

    #[test]
    fn test_ragged_side_rejected() {
        // Left bound drifts by 3px across rows; no consistent run, so the
        // left guide falls back to the bottom-row bound.
        let mut img = RgbaImage::new(60, 40);
        for y in 10..40 {
            let l = 15 + (y % 4);
            for x in l..45 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        // Bottom row is y=39: left bound 15 + 39 % 4 = 18.
        assert_eq!(guides.left, 18.0);
        assert_eq!(guides.right, 44.0);
    }

    #[test]
    fn test_edge_needs_transparent_margin() {
        // Rectangle flush against the left image edge: the column outside
        // the candidate is off-image and counts as transparent, so the edge
        // is still accepted.
        let img = rect_image(60, 40, 0, 0, 30, 40);
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        assert_eq!(guides.left, 0.0);
        assert_eq!(guides.right, 29.0);
    }

    #[test]
    fn test_insufficient_margin_rejects_candidate() {
        // A second opaque block 5px outside the left wall breaks the
        // required 15-row transparent run beside the candidate edge.
        let mut img = rect_image(60, 40, 20, 0, 50, 40);
        for y in 0..40 {
            for x in 10..16 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        // The combined silhouette's left wall at x=10 wins instead: rows
        // agree there and column 9 is fully transparent.
        assert_eq!(guides.left, 10.0);
    }

    #[test]
    fn test_threshold_respected() {
        let mut img = RgbaImage::new(30, 30);
        for y in 0..30 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 20]));
            }
        }
        let plane = AlphaPlane::new(&img);
        assert!(detect(&plane, 32).is_none());
        assert!(detect(&plane, 12).is_some());
    }

    #[test]
    fn test_bottom_most_candidate_wins() {
        // Two tiers: a wide base (x=10..=49) up to y=39 and a narrow tower
        // (x=25..=34) above. The bottom-most accepted edge comes from the
        // base, not the tower.
        let mut img = RgbaImage::new(60, 60);
        for y in 30..60 {
            for x in 10..50 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        for y in 0..30 {
            for x in 25..35 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let plane = AlphaPlane::new(&img);
        let guides = detect(&plane, 12).unwrap();
        assert_eq!(guides.left, 10.0);
        assert_eq!(guides.right, 49.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
