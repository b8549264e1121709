//! WebP encoding.
//!
//! Sprites carry meaningful RGB in transparent regions (antialiasing
//! fringe), so the encoder runs with `exact` set to keep those values
//! instead of letting the codec zero them out.

use image::RgbaImage;
use webp::{Encoder, WebPConfig};

use super::EncodeError;

/// Slowest, best-compressing effort level.
const WEBP_METHOD: i32 = 6;

/// WebP encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebpOptions {
    /// Lossy quality, clamped to 1..=100. Ignored when `lossless` is set.
    pub quality: u8,
    /// Encode losslessly instead of high-quality lossy.
    pub lossless: bool,
}

impl Default for WebpOptions {
    fn default() -> Self {
        Self {
            quality: 95,
            lossless: false,
        }
    }
}

/// Encode an RGBA bitmap as WebP with lossless alpha.
pub fn encode_webp(image: &RgbaImage, options: WebpOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut config = WebPConfig::new()
        .map_err(|_| EncodeError::EncodingFailed("WebP config init failed".to_string()))?;
    config.lossless = if options.lossless { 1 } else { 0 };
    config.quality = options.quality.clamp(1, 100) as f32;
    config.method = WEBP_METHOD;
    config.alpha_quality = 100;
    config.exact = 1;

    let encoder = Encoder::from_rgba(image.as_raw(), width, height);
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| EncodeError::EncodingFailed(format!("{:?}", e)))?;
    Ok(memory.to_vec())
}
