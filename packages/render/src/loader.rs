//! Image source loading
//!
//! Supported sources for [`LocalImageLoader`]:
//! - `data:<mime>;base64,<payload>`
//! - `file:///abs/path.png`
//! - plain paths, resolved against the loader's base directory
//!
//! Other `scheme://` URLs are reported as
//! [`RenderError::UnsupportedSource`]. [`RemoteImageLoader`] fetches
//! `http://` and `https://` and hands everything else to a local loader.

use crate::{Bitmap, RenderError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetch and decode an image source
    async fn load(&self, src: &str) -> Result<Bitmap>;
}

/// Loads inline and filesystem images
#[derive(Debug, Clone)]
pub struct LocalImageLoader {
    base_dir: PathBuf,
}

impl LocalImageLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn decode_data_uri(src: &str) -> Result<Vec<u8>> {
        let rest = &src["data:".len()..];
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| RenderError::Decode("data URI without payload".to_string()))?;

        if !header.ends_with(";base64") {
            return Err(RenderError::UnsupportedSource(format!(
                "data URI must be base64 encoded ({})",
                header
            )));
        }

        STANDARD
            .decode(payload.trim())
            .map_err(|e| RenderError::Decode(e.to_string()))
    }

    fn resolve_path(&self, src: &str) -> PathBuf {
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for LocalImageLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl ImageLoader for LocalImageLoader {
    async fn load(&self, src: &str) -> Result<Bitmap> {
        let src = src.trim();

        let bytes = if src.starts_with("data:") {
            Self::decode_data_uri(src)?
        } else if let Some(path) = src.strip_prefix("file://") {
            tokio::fs::read(path).await?
        } else if src.contains("://") {
            return Err(RenderError::UnsupportedSource(src.to_string()));
        } else {
            let path = self.resolve_path(src);
            debug!(path = %path.display(), "Loading image from disk");
            tokio::fs::read(&path).await?
        };

        Bitmap::from_encoded(&bytes)
    }
}

/// Fetches `http(s)://` sources, delegates the rest to a [`LocalImageLoader`]
#[derive(Debug, Clone)]
pub struct RemoteImageLoader {
    client: reqwest::Client,
    local: LocalImageLoader,
}

impl RemoteImageLoader {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(local: LocalImageLoader) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()?;
        Ok(Self { client, local })
    }

    pub fn local(&self) -> &LocalImageLoader {
        &self.local
    }

    fn is_remote(src: &str) -> bool {
        src.starts_with("http://") || src.starts_with("https://")
    }
}

#[async_trait]
impl ImageLoader for RemoteImageLoader {
    async fn load(&self, src: &str) -> Result<Bitmap> {
        let src = src.trim();
        if !Self::is_remote(src) {
            return self.local.load(src).await;
        }

        debug!(url = src, "Fetching remote image");
        let response = self.client.get(src).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        Bitmap::from_encoded(&bytes)
    }
}
