//! # Reportkit Render
//!
//! Boundary between the report engine and whatever draws blocks on screen.
//!
//! The engine never draws metric, chart or table visuals itself. A host
//! renderer implements [`RenderDispatch`]: it renders a block inline and can
//! capture that on-screen region as a [`Bitmap`]. Images are fetched through
//! an [`ImageLoader`]: [`LocalImageLoader`] for inline and filesystem
//! sources, [`RemoteImageLoader`] on top of it for `http(s)://` URLs.
//!
//! ## Capture sequence
//!
//! ```text
//! render_inline(block) ─▶ VisualHandle
//!        before_capture(handle)      hide editor chrome
//!        rasterize(handle) ─▶ Bitmap
//!        after_capture(handle)       restore editor chrome (always)
//! ```
//!
//! ## Renderers
//!
//! - [`PlaceholderDispatch`]: host-less, flat-colour bitmaps per block type
//! - `ChromeDispatch` (feature `chrome`): captures `[data-block-id]` regions
//!   of a live canvas page in headless Chrome
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reportkit_render::{capture_block, PlaceholderDispatch};
//!
//! let dispatch = PlaceholderDispatch::new();
//! let bitmap = capture_block(&dispatch, &block).await?;
//! println!("{}x{}", bitmap.width, bitmap.height);
//! ```

mod dispatch;
mod loader;
mod placeholder;
mod types;

#[cfg(feature = "chrome")]
mod chrome;
#[cfg(feature = "chrome")]
mod server;

pub use dispatch::{capture_block, RenderDispatch};
pub use loader::{ImageLoader, LocalImageLoader, RemoteImageLoader};
pub use placeholder::PlaceholderDispatch;
pub use types::{parse_hex_color, Bitmap, Rect, VisualHandle};

#[cfg(feature = "chrome")]
pub use chrome::ChromeDispatch;
#[cfg(feature = "chrome")]
pub use server::{start_disposable_server, RenderServer};

use reportkit_blocks::BlockId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Block region not found: {0}")]
    NotFound(BlockId),

    #[error("Block region is zero-sized: {0}")]
    ZeroSized(BlockId),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
