//! Background preview renderer with job coalescing.
//!
//! Interactive zoom and pan generate render requests far faster than large
//! sources can be resampled. The pipeline keeps a single pending-job slot:
//! submitting overwrites whatever is waiting, the worker always picks up
//! the newest request, and intermediate frames are silently dropped. A
//! monotonically increasing job id gates result application so a stale
//! frame can never overwrite a newer one.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::{imageops, RgbaImage};

use crate::calibration::SpriteCalibration;
use crate::preview::viewport::ViewportTransform;

/// Snapshot of everything one preview frame needs. Guides are copied out
/// of the calibration at submit time so later edits cannot tear a frame.
#[derive(Debug, Clone)]
pub struct PreviewJob {
    pub job_id: u64,
    pub source: Arc<RgbaImage>,
    pub viewport: ViewportTransform,
    pub canvas_w: u32,
    pub canvas_h: u32,
    pub guide_left: f64,
    pub guide_center: f64,
    pub guide_right: f64,
    pub baseline_y: f64,
}

/// A rendered preview frame.
#[derive(Debug, Clone)]
pub struct PreviewResult {
    pub job_id: u64,
    /// Resampled tile covering the visible part of the source.
    pub tile: RgbaImage,
    /// Canvas position to draw the tile at.
    pub draw_x: f64,
    pub draw_y: f64,
    /// Canvas position of the full image's top-left corner.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Full displayed image size in canvas pixels.
    pub display_w: u32,
    pub display_h: u32,
    /// Guide overlay positions in canvas x.
    pub guide_left_x: f64,
    pub guide_center_x: f64,
    pub guide_right_x: f64,
    /// Wall-clock time spent rendering the frame.
    pub render_time: Duration,
}

struct Shared {
    next_job: Option<PreviewJob>,
    latest: Option<PreviewResult>,
    shutdown: bool,
}

/// Handle to the background preview renderer.
///
/// Dropping the pipeline signals the worker and joins it.
pub struct PreviewPipeline {
    shared: Arc<(Mutex<Shared>, Condvar)>,
    worker: Option<JoinHandle<()>>,
    next_job_id: u64,
    last_applied: u64,
}

impl PreviewPipeline {
    /// Spawn the render worker.
    pub fn new() -> Self {
        let shared = Arc::new((
            Mutex::new(Shared {
                next_job: None,
                latest: None,
                shutdown: false,
            }),
            Condvar::new(),
        ));
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("preview-render".to_string())
            .spawn(move || worker_loop(&worker_shared))
            .ok();
        if worker.is_none() {
            log::error!("preview: failed to spawn render worker");
        }
        Self {
            shared,
            worker,
            next_job_id: 0,
            last_applied: 0,
        }
    }

    /// Queue a preview frame, replacing any not-yet-started request.
    /// Returns the job id the eventual frame will carry.
    pub fn submit(
        &mut self,
        source: Arc<RgbaImage>,
        viewport: ViewportTransform,
        canvas_w: u32,
        canvas_h: u32,
        calibration: &SpriteCalibration,
    ) -> u64 {
        self.next_job_id += 1;
        let job = PreviewJob {
            job_id: self.next_job_id,
            source,
            viewport,
            canvas_w,
            canvas_h,
            guide_left: calibration.guide_left,
            guide_center: calibration.guide_center,
            guide_right: calibration.guide_right,
            baseline_y: calibration.baseline_y,
        };

        let (lock, cvar) = &*self.shared;
        match lock.lock() {
            Ok(mut state) => {
                state.next_job = Some(job);
                cvar.notify_one();
            }
            Err(_) => log::error!("preview: state poisoned, dropping job"),
        }
        self.next_job_id
    }

    /// Take the newest finished frame, if it is newer than the last one
    /// applied. Intended to be called from the host's frame tick.
    pub fn poll(&mut self) -> Option<PreviewResult> {
        let (lock, _) = &*self.shared;
        let mut state = lock.lock().ok()?;
        let newer = state
            .latest
            .as_ref()
            .is_some_and(|result| result.job_id > self.last_applied);
        if !newer {
            return None;
        }
        let result = state.latest.take()?;
        self.last_applied = result.job_id;
        Some(result)
    }

    /// Id of the most recently applied frame.
    pub fn last_applied(&self) -> u64 {
        self.last_applied
    }
}

impl Default for PreviewPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.shared;
        if let Ok(mut state) = lock.lock() {
            state.shutdown = true;
        }
        cvar.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("preview: render worker panicked");
            }
        }
    }
}

fn worker_loop(shared: &(Mutex<Shared>, Condvar)) {
    let (lock, cvar) = shared;
    loop {
        let job = {
            let mut state = match lock.lock() {
                Ok(state) => state,
                Err(_) => {
                    log::error!("preview: state poisoned, worker exiting");
                    return;
                }
            };
            loop {
                if state.shutdown {
                    return;
                }
                if let Some(job) = state.next_job.take() {
                    break job;
                }
                state = match cvar.wait(state) {
                    Ok(state) => state,
                    Err(_) => {
                        log::error!("preview: state poisoned, worker exiting");
                        return;
                    }
                };
            }
        };

        let result = render_job(&job);
        match lock.lock() {
            Ok(mut state) => state.latest = Some(result),
            Err(_) => {
                log::error!("preview: state poisoned, worker exiting");
                return;
            }
        }
    }
}

/// Render one frame: crop the visible source region, resample it to
/// display scale, and compute overlay positions.
fn render_job(job: &PreviewJob) -> PreviewResult {
    let start = Instant::now();
    let zoom = job.viewport.zoom;
    let (src_w, src_h) = job.source.dimensions();
    let (disp_w, disp_h) = job.viewport.display_size(src_w, src_h);
    let (ox, oy) = job
        .viewport
        .draw_origin(src_w, src_h, job.canvas_w, job.canvas_h);

    // Visible source rectangle in image space.
    let src_x0 = (-ox / zoom).max(0.0);
    let src_y0 = (-oy / zoom).max(0.0);
    let src_x1 = ((job.canvas_w as f64 - ox) / zoom).min(src_w as f64);
    let src_y1 = ((job.canvas_h as f64 - oy) / zoom).min(src_h as f64);

    let (tile, draw_x, draw_y) = if src_x1 <= src_x0 || src_y1 <= src_y0 {
        (RgbaImage::new(1, 1), 0.0, 0.0)
    } else {
        let crop_l = (src_x0.floor() as u32).min(src_w);
        let crop_t = (src_y0.floor() as u32).min(src_h);
        let crop_r = (src_x1.ceil() as u32).clamp(crop_l + 1, src_w);
        let crop_b = (src_y1.ceil() as u32).clamp(crop_t + 1, src_h);

        let crop = imageops::crop_imm(&*job.source, crop_l, crop_t, crop_r - crop_l, crop_b - crop_t)
            .to_image();
        let target_w = (((crop_r - crop_l) as f64 * zoom).round() as u32).max(1);
        let target_h = (((crop_b - crop_t) as f64 * zoom).round() as u32).max(1);
        // Pixel-precise when zoomed in, smooth downsample when zoomed out.
        let filter = if zoom >= 1.0 {
            imageops::FilterType::Nearest
        } else {
            imageops::FilterType::Triangle
        };
        let tile = imageops::resize(&crop, target_w, target_h, filter);
        (tile, ox + crop_l as f64 * zoom, oy + crop_t as f64 * zoom)
    };

    PreviewResult {
        job_id: job.job_id,
        tile,
        draw_x,
        draw_y,
        origin_x: ox,
        origin_y: oy,
        display_w: disp_w,
        display_h: disp_h,
        guide_left_x: ox + job.guide_left * zoom,
        guide_center_x: ox + job.guide_center * zoom,
        guide_right_x: ox + job.guide_right * zoom,
        render_time: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn opaque_source(w: u32, h: u32) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(w, h, Rgba([60, 70, 80, 255])))
    }

    fn test_viewport(zoom: f64) -> ViewportTransform {
        ViewportTransform {
            zoom,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    fn job_for(source: Arc<RgbaImage>, zoom: f64, canvas_w: u32, canvas_h: u32) -> PreviewJob {
        PreviewJob {
            job_id: 1,
            source,
            viewport: test_viewport(zoom),
            canvas_w,
            canvas_h,
            guide_left: 10.0,
            guide_center: 50.0,
            guide_right: 90.0,
            baseline_y: 100.0,
        }
    }

    fn poll_until(pipeline: &mut PreviewPipeline, timeout: Duration) -> Option<PreviewResult> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if let Some(result) = pipeline.poll() {
                return Some(result);
            }
            thread::sleep(Duration::from_millis(2));
        }
        None
    }

    #[test]
    fn test_render_fully_visible_image() {
        let job = job_for(opaque_source(100, 100), 1.0, 400, 300);
        let result = render_job(&job);

        assert_eq!(result.display_w, 100);
        assert_eq!(result.display_h, 100);
        // Centered: origin (150, 100), tile covers the whole image.
        assert_eq!(result.origin_x, 150.0);
        assert_eq!(result.origin_y, 100.0);
        assert_eq!(result.tile.dimensions(), (100, 100));
        assert_eq!(result.draw_x, 150.0);
        assert_eq!(result.guide_center_x, 200.0);
    }

    #[test]
    fn test_render_crops_to_viewport_when_zoomed_in() {
        // 1000px image at 4x on a 200px canvas: only ~50 source columns
        // are visible, so the tile is far smaller than the full display.
        let job = job_for(opaque_source(1000, 1000), 4.0, 200, 200);
        let result = render_job(&job);

        assert_eq!(result.display_w, 4000);
        assert!(result.tile.width() < 300);
        assert!(result.tile.height() < 300);
    }

    #[test]
    fn test_render_offscreen_gives_unit_tile() {
        let mut job = job_for(opaque_source(50, 50), 1.0, 200, 200);
        job.viewport.pan_x = 10_000.0;
        let result = render_job(&job);

        assert_eq!(result.tile.dimensions(), (1, 1));
        assert_eq!(result.tile.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_render_zoomed_out_display_floor() {
        let job = job_for(opaque_source(4, 4), 0.08, 100, 100);
        let result = render_job(&job);
        assert_eq!(result.display_w, 1);
        assert_eq!(result.display_h, 1);
    }

    #[test]
    fn test_submit_and_poll() {
        let mut pipeline = PreviewPipeline::new();
        let calib = SpriteCalibration::from_dimensions(64, 64);
        let id = pipeline.submit(opaque_source(64, 64), test_viewport(1.0), 128, 128, &calib);
        assert_eq!(id, 1);

        let result = poll_until(&mut pipeline, Duration::from_secs(5)).expect("frame");
        assert_eq!(result.job_id, 1);
        assert_eq!(result.display_w, 64);
        assert_eq!(pipeline.last_applied(), 1);

        // The applied-id gate keeps the same frame from being applied twice.
        assert!(pipeline.poll().is_none());
    }

    #[test]
    fn test_rapid_submissions_latest_wins() {
        let mut pipeline = PreviewPipeline::new();
        let calib = SpriteCalibration::from_dimensions(32, 32);
        let source = opaque_source(32, 32);

        let mut last_id = 0;
        for i in 0..20 {
            let zoom = 0.5 + i as f64 * 0.1;
            last_id = pipeline.submit(Arc::clone(&source), test_viewport(zoom), 64, 64, &calib);
        }

        // Ids only ever move forward, and the final submission is always
        // rendered eventually.
        let start = Instant::now();
        let mut seen = 0;
        while seen < last_id && start.elapsed() < Duration::from_secs(5) {
            if let Some(result) = pipeline.poll() {
                assert!(result.job_id > seen);
                seen = result.job_id;
            } else {
                thread::sleep(Duration::from_millis(2));
            }
        }
        assert_eq!(seen, last_id);
    }

    #[test]
    fn test_drop_joins_worker() {
        let mut pipeline = PreviewPipeline::new();
        let calib = SpriteCalibration::from_dimensions(16, 16);
        pipeline.submit(opaque_source(16, 16), test_viewport(1.0), 32, 32, &calib);
        drop(pipeline);
    }
}
