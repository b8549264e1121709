//! Interactive preview rendering.
//!
//! Split between the pure viewport math ([`viewport`]) and the coalescing
//! background renderer ([`worker`]). Hosts own a [`PreviewPipeline`],
//! submit a job on every zoom/pan/guide change, and poll for the newest
//! finished frame on their UI tick.

mod viewport;
mod worker;

pub use viewport::{ViewportTransform, PREVIEW_MAX_ZOOM, PREVIEW_MIN_ZOOM};
pub use worker::{PreviewJob, PreviewPipeline, PreviewResult};
