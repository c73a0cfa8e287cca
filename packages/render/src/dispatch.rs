//! Render capability interface

use crate::{Bitmap, Result, VisualHandle};
use async_trait::async_trait;
use reportkit_blocks::Block;
use tracing::{debug, warn};

/// Host renderer capabilities, keyed by block type
#[async_trait]
pub trait RenderDispatch: Send + Sync {
    /// Render a block on screen and return a handle to its region
    async fn render_inline(&self, block: &Block) -> Result<VisualHandle>;

    /// Capture a rendered region
    ///
    /// Fails with `ZeroSized` for an empty region and `NotFound` when the
    /// region cannot be located.
    async fn rasterize(&self, handle: &VisualHandle) -> Result<Bitmap>;

    /// Hide editor-only chrome around the region before capture
    async fn before_capture(&self, _handle: &VisualHandle) -> Result<()> {
        Ok(())
    }

    /// Restore what `before_capture` hid
    async fn after_capture(&self, _handle: &VisualHandle) -> Result<()> {
        Ok(())
    }
}

/// Render, hide chrome, rasterize, restore chrome
///
/// `after_capture` runs whenever `before_capture` succeeded, even if the
/// capture itself failed.
pub async fn capture_block(dispatch: &dyn RenderDispatch, block: &Block) -> Result<Bitmap> {
    let handle = dispatch.render_inline(block).await?;
    dispatch.before_capture(&handle).await?;

    let captured = dispatch.rasterize(&handle).await;

    if let Err(e) = dispatch.after_capture(&handle).await {
        warn!(block_id = %handle.block_id, error = %e, "Failed to restore editor chrome");
    }

    let bitmap = captured?;
    debug!(
        block_id = %handle.block_id,
        width = bitmap.width,
        height = bitmap.height,
        "Captured block"
    );
    Ok(bitmap)
}
