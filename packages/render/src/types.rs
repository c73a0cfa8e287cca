//! Core types for the render boundary

use crate::Result;
use reportkit_blocks::{BlockId, BlockType};
use serde::{Deserialize, Serialize};

/// Axis-aligned region in renderer pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A block rendered on screen by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualHandle {
    pub block_id: BlockId,
    pub block_type: BlockType,

    /// On-screen region occupied by the block
    pub bounds: Rect,
}

/// Decoded RGBA8 pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,

    /// Row-major RGBA, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl Bitmap {
    /// Decode PNG/JPEG/... bytes
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
        })
    }

    /// Uniformly filled bitmap
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        Self {
            width,
            height,
            rgba: color.repeat(pixels),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Height over width
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        self.height as f64 / self.width as f64
    }

    /// Flatten onto a white background as packed RGB
    pub fn to_rgb_over_white(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.rgba.len() / 4 * 3);
        for px in self.rgba.chunks_exact(4) {
            let alpha = px[3] as u32;
            for &channel in &px[..3] {
                let blended = (channel as u32 * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }
        rgb
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            Some(out)
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            Some([channel(0)?, channel(2)?, channel(4)?])
        }
        _ => None,
    }
}
