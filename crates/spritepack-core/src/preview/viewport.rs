//! Viewport transform between canvas and image space.
//!
//! The preview canvas shows the source image centered, then offset by a
//! pan and scaled by a zoom. All coordinate mapping between the two spaces
//! goes through [`ViewportTransform`] so the render worker, hit testing
//! and zoom handling agree on the same math.

/// Smallest allowed preview zoom.
pub const PREVIEW_MIN_ZOOM: f64 = 0.08;
/// Largest allowed preview zoom.
pub const PREVIEW_MAX_ZOOM: f64 = 64.0;

/// Zoom and pan state for the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Scale from image pixels to canvas pixels.
    pub zoom: f64,
    /// Horizontal pan in canvas pixels, relative to the centered position.
    pub pan_x: f64,
    /// Vertical pan in canvas pixels, relative to the centered position.
    pub pan_y: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 0.55,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewportTransform {
    /// Clamp a requested zoom into the allowed range.
    pub fn clamp_zoom(zoom: f64) -> f64 {
        zoom.clamp(PREVIEW_MIN_ZOOM, PREVIEW_MAX_ZOOM)
    }

    /// Set the zoom, clamped.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = Self::clamp_zoom(zoom);
    }

    /// Displayed image size in canvas pixels, floored at 1x1.
    pub fn display_size(&self, image_w: u32, image_h: u32) -> (u32, u32) {
        let w = (image_w as f64 * self.zoom).round().max(1.0) as u32;
        let h = (image_h as f64 * self.zoom).round().max(1.0) as u32;
        (w, h)
    }

    /// Canvas position of the image's top-left corner: centered, then
    /// panned.
    pub fn draw_origin(
        &self,
        image_w: u32,
        image_h: u32,
        canvas_w: u32,
        canvas_h: u32,
    ) -> (f64, f64) {
        let (disp_w, disp_h) = self.display_size(image_w, image_h);
        let ox = (canvas_w.max(1) as f64 - disp_w as f64) * 0.5 + self.pan_x;
        let oy = (canvas_h.max(1) as f64 - disp_h as f64) * 0.5 + self.pan_y;
        (ox, oy)
    }

    /// Map a canvas point into image space.
    pub fn canvas_to_image(
        &self,
        canvas_x: f64,
        canvas_y: f64,
        image_w: u32,
        image_h: u32,
        canvas_w: u32,
        canvas_h: u32,
    ) -> (f64, f64) {
        let (ox, oy) = self.draw_origin(image_w, image_h, canvas_w, canvas_h);
        ((canvas_x - ox) / self.zoom, (canvas_y - oy) / self.zoom)
    }

    /// Map an image point into canvas space.
    pub fn image_to_canvas(
        &self,
        image_x: f64,
        image_y: f64,
        image_w: u32,
        image_h: u32,
        canvas_w: u32,
        canvas_h: u32,
    ) -> (f64, f64) {
        let (ox, oy) = self.draw_origin(image_w, image_h, canvas_w, canvas_h);
        (ox + image_x * self.zoom, oy + image_y * self.zoom)
    }

    /// Change the zoom while keeping the image point under the given
    /// canvas position stationary, adjusting the pan to compensate.
    pub fn zoom_about(
        &mut self,
        new_zoom: f64,
        canvas_x: f64,
        canvas_y: f64,
        image_w: u32,
        image_h: u32,
        canvas_w: u32,
        canvas_h: u32,
    ) {
        let new_zoom = Self::clamp_zoom(new_zoom);
        let old_zoom = self.zoom;
        if old_zoom <= 0.0 {
            self.zoom = new_zoom;
            return;
        }

        let cw = canvas_w.max(1) as f64;
        let ch = canvas_h.max(1) as f64;
        let old_ox = (cw - image_w as f64 * old_zoom) * 0.5 + self.pan_x;
        let old_oy = (ch - image_h as f64 * old_zoom) * 0.5 + self.pan_y;

        // Image-space point currently under the cursor.
        let ix = (canvas_x - old_ox) / old_zoom;
        let iy = (canvas_y - old_oy) / old_zoom;

        self.pan_x = canvas_x - ix * new_zoom - (cw - image_w as f64 * new_zoom) * 0.5;
        self.pan_y = canvas_y - iy * new_zoom - (ch - image_h as f64 * new_zoom) * 0.5;
        self.zoom = new_zoom;
    }

    /// Shift the pan by a canvas-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}
