//! Block capture using headless Chrome
//!
//! The canvas page marks each rendered block with `data-block-id` and each
//! piece of editor-only UI (hover toolbars, drag handles) with
//! `data-editor-chrome`. Capture clips a screenshot to the block's
//! bounding box with the chrome hidden.

use crate::server::start_disposable_server;
use crate::{Bitmap, Rect, RenderDispatch, RenderError, Result, VisualHandle};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::{CaptureScreenshotFormatOption, Viewport};
use headless_chrome::{Browser, LaunchOptions, Tab};
use reportkit_blocks::{Block, BlockId};
use std::sync::Arc;
use tracing::{debug, info};

const HIDE_CHROME_STYLE_ID: &str = "reportkit-capture-style";

/// Renderer backed by a live canvas page
pub struct ChromeDispatch {
    // Keeps the browser process alive for `tab`
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDispatch {
    /// Launch headless Chrome and open the canvas at `url`
    pub fn connect(url: &str) -> Result<Self> {
        let browser = Browser::new(LaunchOptions {
            headless: true,
            window_size: Some((1280, 1024)),
            ..Default::default()
        })
        .map_err(|e| RenderError::Browser(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        tab.navigate_to(url)
            .map_err(|e| RenderError::Browser(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| RenderError::Browser(e.to_string()))?;

        info!(url, "Connected to canvas");

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    /// Serve an HTML snapshot of the canvas and open it
    pub fn from_html(html: String) -> Result<Self> {
        let (url, server_handle) = start_disposable_server(html)?;
        let dispatch = Self::connect(&url)?;

        // Wait for server thread
        let _ = server_handle.join();

        Ok(dispatch)
    }

    async fn with_tab<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tab) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || f(&tab))
            .await
            .map_err(|e| RenderError::Browser(e.to_string()))?
    }
}

/// Scroll the block into view and read its bounding box
fn locate(tab: &Tab, id: &BlockId) -> Result<Option<Rect>> {
    let id_literal =
        serde_json::to_string(id.as_str()).map_err(|e| RenderError::Capture(e.to_string()))?;

    let script = format!(
        r#"(() => {{
            const el = document.querySelector('[data-block-id="' + CSS.escape({id}) + '"]');
            if (!el) return null;
            el.scrollIntoView({{ block: 'start' }});
            const rect = el.getBoundingClientRect();
            return JSON.stringify({{
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height
            }});
        }})()"#,
        id = id_literal
    );

    let value = tab
        .evaluate(&script, false)
        .map_err(|e| RenderError::Capture(e.to_string()))?
        .value;

    let Some(json) = value.as_ref().and_then(|v| v.as_str()) else {
        return Ok(None);
    };

    let rect: Rect = serde_json::from_str(json).map_err(|e| RenderError::Capture(e.to_string()))?;
    Ok(Some(rect))
}

fn set_chrome_hidden(tab: &Tab, hidden: bool) -> Result<()> {
    let script = if hidden {
        format!(
            r#"(() => {{
                if (!document.getElementById('{id}')) {{
                    const style = document.createElement('style');
                    style.id = '{id}';
                    style.textContent = '[data-editor-chrome] {{ visibility: hidden !important; }}';
                    document.head.appendChild(style);
                }}
                return true;
            }})()"#,
            id = HIDE_CHROME_STYLE_ID
        )
    } else {
        format!(
            r#"(() => {{
                const style = document.getElementById('{id}');
                if (style) style.remove();
                return true;
            }})()"#,
            id = HIDE_CHROME_STYLE_ID
        )
    };

    tab.evaluate(&script, false)
        .map_err(|e| RenderError::Capture(e.to_string()))?;
    Ok(())
}

#[async_trait]
impl RenderDispatch for ChromeDispatch {
    async fn render_inline(&self, block: &Block) -> Result<VisualHandle> {
        let id = block.id.clone();
        let block_type = block.block_type();

        let bounds = self
            .with_tab(move |tab| locate(tab, &id)?.ok_or(RenderError::NotFound(id)))
            .await?;

        Ok(VisualHandle {
            block_id: block.id.clone(),
            block_type,
            bounds,
        })
    }

    async fn rasterize(&self, handle: &VisualHandle) -> Result<Bitmap> {
        let id = handle.block_id.clone();

        let png = self
            .with_tab(move |tab| {
                // Bounds may have shifted once chrome was hidden
                let rect = locate(tab, &id)?.ok_or_else(|| RenderError::NotFound(id.clone()))?;
                if rect.is_empty() {
                    return Err(RenderError::ZeroSized(id));
                }

                debug!(block_id = %id, ?rect, "Capturing region");

                tab.capture_screenshot(
                    CaptureScreenshotFormatOption::Png,
                    None,
                    Some(Viewport {
                        x: rect.x,
                        y: rect.y,
                        width: rect.width,
                        height: rect.height,
                        scale: 1.0,
                    }),
                    true,
                )
                .map_err(|e| RenderError::Capture(e.to_string()))
            })
            .await?;

        Bitmap::from_encoded(&png)
    }

    async fn before_capture(&self, _handle: &VisualHandle) -> Result<()> {
        self.with_tab(|tab| set_chrome_hidden(tab, true)).await
    }

    async fn after_capture(&self, _handle: &VisualHandle) -> Result<()> {
        self.with_tab(|tab| set_chrome_hidden(tab, false)).await
    }
}
