//! Export driver: solve, composite, encode.
//!
//! The export path is deliberately pure with respect to the filesystem.
//! Callers receive encoded bytes plus the final geometry and decide where
//! the files land.

use image::{imageops, RgbaImage};
use thiserror::Error;

use crate::calibration::SpriteCalibration;
use crate::compose::{compose, ComposeError};
use crate::encode::{encode_png, encode_webp, EncodeError, WebpOptions};
use crate::solve::solve_output_width;

/// Delivery format for an exported sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Webp,
    Png,
}

impl ExportFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Webp => "webp",
            ExportFormat::Png => "png",
        }
    }
}

/// Options applied to every sprite in an export run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// WebP encoder settings; unused for PNG.
    pub webp: WebpOptions,
}

/// One exported sprite: encoded bytes plus the geometry that produced them.
#[derive(Debug, Clone)]
pub struct EncodedSprite {
    pub bytes: Vec<u8>,
    /// Final canvas width, always even.
    pub width: u32,
    /// Final canvas height.
    pub height: u32,
    /// Solved intermediate width the source was resized to.
    pub solved_width: u32,
}

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Geometry(#[from] ComposeError),

    #[error(transparent)]
    Encoding(#[from] EncodeError),
}

/// Export one sprite: solve the integer output width from the calibration,
/// composite onto the padded canvas, and encode.
pub fn export_sprite(
    source: &RgbaImage,
    calibration: &SpriteCalibration,
    options: &ExportOptions,
) -> Result<EncodedSprite, ExportError> {
    let solved_width = solve_output_width(
        source.width(),
        calibration.measured_span(),
        calibration.effective_target_span(),
    );
    log::debug!(
        "export: source {}x{}, span {:.2} -> {:.2}, solved width {}",
        source.width(),
        source.height(),
        calibration.measured_span(),
        calibration.effective_target_span(),
        solved_width
    );

    let canvas = compose(source, calibration, solved_width)?;
    let bytes = match options.format {
        ExportFormat::Webp => encode_webp(&canvas, options.webp)?,
        ExportFormat::Png => encode_png(&canvas)?,
    };
    Ok(EncodedSprite {
        width: canvas.width(),
        height: canvas.height(),
        bytes,
        solved_width,
    })
}

/// Export a batch of sprites. Failures are per-item; one bad sprite never
/// aborts the rest of the run.
pub fn export_batch(
    items: &[(&RgbaImage, &SpriteCalibration)],
    options: &ExportOptions,
) -> Vec<Result<EncodedSprite, ExportError>> {
    items
        .iter()
        .enumerate()
        .map(|(index, (source, calibration))| {
            let result = export_sprite(source, calibration, options);
            if let Err(err) = &result {
                log::warn!("export: item {} failed: {}", index, err);
            }
            result
        })
        .collect()
}

/// Render a contain-fit thumbnail of `source` within `max_w` x `max_h`,
/// preserving aspect ratio. Sources already inside the box pass through
/// unscaled.
pub fn render_pack_thumbnail(source: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = source.dimensions();
    if w == 0 || h == 0 || max_w == 0 || max_h == 0 {
        return RgbaImage::new(1, 1);
    }
    if w <= max_w && h <= max_h {
        return source.clone();
    }

    let scale = (max_w as f64 / w as f64).min(max_h as f64 / h as f64);
    let thumb_w = ((w as f64 * scale).round() as u32).max(1);
    let thumb_h = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(source, thumb_w, thumb_h, imageops::FilterType::Lanczos3)
}
