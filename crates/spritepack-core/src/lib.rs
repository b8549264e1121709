//! Spritepack Core - Sprite preparation library
//!
//! This crate provides the core processing functionality for Spritepack,
//! including alpha-aware guide detection, integer scale solving, export
//! compositing, and the asynchronous preview render pipeline.
//!
//! The host application supplies decoded RGBA bitmaps and a calibration
//! record per image; this crate turns them into aligned, encoded export
//! bitmaps plus a pack metadata record. Windowing, file pickers and archive
//! packaging live in the host, not here.

pub mod alpha;
pub mod calibration;
pub mod compose;
pub mod detect;
pub mod encode;
pub mod export;
pub mod metadata;
pub mod preview;
pub mod solve;

pub use alpha::AlphaPlane;
pub use calibration::{FitMode, SpriteCalibration};
pub use compose::{compose, ComposeError};
pub use detect::{detect, Guides};
pub use encode::{encode_png, encode_webp, EncodeError, WebpOptions};
pub use export::{
    export_batch, export_sprite, render_pack_thumbnail, EncodedSprite, ExportError, ExportFormat,
    ExportOptions,
};
pub use metadata::{normalize_category, normalize_id, PackMetadata};
pub use preview::{
    PreviewJob, PreviewPipeline, PreviewResult, ViewportTransform, PREVIEW_MAX_ZOOM,
    PREVIEW_MIN_ZOOM,
};
pub use solve::solve_output_width;

/// Fixed padding applied around the composited sprite: 32px on the left,
/// right and top edges. The bottom edge gets no padding so the silhouette
/// sits exactly on it.
pub const FIXED_PADDING_PX: u32 = 32;

/// Default target span in output pixels (the full 2x2 footprint preset).
pub const DEFAULT_TARGET_SPAN: f64 = 1080.0;

/// Alpha threshold for general trimming and guide auto-alignment.
pub const ALPHA_TRIM_THRESHOLD: u8 = 12;

/// Stricter alpha threshold used when measuring export bounds, so faint
/// antialiasing fringe does not inflate the measured silhouette.
pub const EXPORT_BOUNDS_ALPHA_THRESHOLD: u8 = 32;

/// Rows of confirmed transparency required beside a candidate vertical edge
/// before auto-alignment accepts it as a structural side wall.
pub const AUTO_SIDE_TRANSPARENCY_PX: u32 = 15;

/// Consecutive rows whose opaque bounds must agree (spread <= 1px) for a
/// candidate vertical edge during auto-alignment.
pub const AUTO_EDGE_OPAQUE_RUN_PX: u32 = 10;
