//! Read-only alpha-channel view over a decoded RGBA bitmap.
//!
//! All detection and trimming logic works through [`AlphaPlane`] rather
//! than touching pixel buffers directly. The plane borrows the bitmap for
//! the duration of a detection or compositing call and is never mutated.

use image::RgbaImage;

/// Borrowed view exposing per-pixel alpha queries and opaque-run scans.
#[derive(Debug, Clone, Copy)]
pub struct AlphaPlane<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> AlphaPlane<'a> {
    /// Wrap a decoded RGBA bitmap.
    pub fn new(image: &'a RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw(),
        }
    }

    /// Plane width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Plane height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha value at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.data[((y * self.width + x) * 4 + 3) as usize]
    }

    /// Leftmost and rightmost x with alpha >= `threshold` on row `y`,
    /// or `None` when the row is fully transparent.
    pub fn row_span(&self, y: u32, threshold: u8) -> Option<(u32, u32)> {
        let left = (0..self.width).find(|&x| self.alpha(x, y) >= threshold)?;
        let right = (left..self.width)
            .rev()
            .find(|&x| self.alpha(x, y) >= threshold)?;
        Some((left, right))
    }

    /// Bottom-most row containing any pixel with alpha >= `threshold`.
    pub fn bottom_opaque_row(&self, threshold: u8) -> Option<u32> {
        (0..self.height)
            .rev()
            .find(|&y| self.row_span(y, threshold).is_some())
    }

    /// Count consecutive below-threshold rows at column `x`, walking down
    /// from `start_y`. Columns outside the image are treated as transparent
    /// all the way to the bottom.
    pub fn transparent_run_down(&self, x: i64, start_y: u32, threshold: u8) -> u32 {
        if x < 0 || x >= self.width as i64 {
            return self.height.saturating_sub(start_y);
        }
        let x = x as u32;
        let mut run = 0;
        for y in start_y..self.height {
            if self.alpha(x, y) >= threshold {
                break;
            }
            run += 1;
        }
        run
    }

    /// Alpha-trimmed bounding box `(left, top, right, bottom)` with
    /// exclusive right/bottom edges, or `None` when no pixel reaches the
    /// threshold.
    pub fn bounding_box(&self, threshold: u8) -> Option<(u32, u32, u32, u32)> {
        let mut left = self.width;
        let mut top = self.height;
        let mut right = 0;
        let mut bottom = 0;
        for y in 0..self.height {
            if let Some((l, r)) = self.row_span(y, threshold) {
                left = left.min(l);
                right = right.max(r + 1);
                top = top.min(y);
                bottom = y + 1;
            }
        }
        if bottom == 0 {
            None
        } else {
            Some((left, top, right, bottom))
        }
    }
}
