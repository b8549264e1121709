//! Image encoding to delivery formats.
//!
//! Composited sprites are encoded to WebP by default (alpha-exact, high
//! quality lossy) or PNG. Both encoders consume an in-memory RGBA bitmap
//! and return the encoded bytes; file placement is the caller's concern.

use thiserror::Error;

mod png;
mod webp;

pub use png::encode_png;
pub use webp::{encode_webp, WebpOptions};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Bitmap has a zero dimension.
    #[error("Invalid dimensions for encoding: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec rejected the bitmap.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
