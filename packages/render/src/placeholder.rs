//! Host-less renderer
//!
//! Stands in for a live canvas: every block "renders" to a flat-colour
//! region whose shape depends on the block type, so pagination can be
//! exercised without a browser.

use crate::{Bitmap, Rect, RenderDispatch, RenderError, Result, VisualHandle};
use async_trait::async_trait;
use reportkit_blocks::{Block, BlockId, BlockKind, BlockType, GroupDirection};
use std::collections::HashSet;

const DEFAULT_WIDTH: u32 = 600;
const TABLE_HEADER_HEIGHT: f64 = 40.0;
const TABLE_ROW_HEIGHT: f64 = 28.0;

#[derive(Debug, Clone)]
pub struct PlaceholderDispatch {
    width: u32,
    missing: HashSet<BlockId>,
}

impl PlaceholderDispatch {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            missing: HashSet::new(),
        }
    }

    /// Render every region at this pixel width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        self
    }

    /// Pretend this block is absent from the canvas
    pub fn with_missing(mut self, id: impl Into<BlockId>) -> Self {
        self.missing.insert(id.into());
        self
    }

    fn region_height(&self, block: &Block) -> f64 {
        let width = self.width as f64;
        match &block.kind {
            BlockKind::Metric(_) => width / 4.0,
            BlockKind::Chart(_) | BlockKind::Image(_) => width / 2.0,
            BlockKind::Text(_) => width / 8.0,
            BlockKind::Table(table) => {
                TABLE_HEADER_HEIGHT + TABLE_ROW_HEIGHT * table.rows.len().max(1) as f64
            }
            BlockKind::Group(group) => match group.direction {
                GroupDirection::Row => width / 4.0,
                GroupDirection::Column => width / 4.0 * group.children.len().max(1) as f64,
            },
            BlockKind::PageBreak(_) => 0.0,
        }
    }

    fn fill(block_type: BlockType) -> [u8; 4] {
        match block_type {
            BlockType::Metric => [219, 234, 254, 255],
            BlockType::Chart => [220, 252, 231, 255],
            BlockType::Text => [243, 244, 246, 255],
            BlockType::Image => [254, 243, 199, 255],
            BlockType::Table => [237, 233, 254, 255],
            BlockType::Group => [229, 231, 235, 255],
            BlockType::PageBreak => [255, 255, 255, 0],
        }
    }
}

impl Default for PlaceholderDispatch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RenderDispatch for PlaceholderDispatch {
    async fn render_inline(&self, block: &Block) -> Result<VisualHandle> {
        if self.missing.contains(&block.id) {
            return Err(RenderError::NotFound(block.id.clone()));
        }

        let height = self.region_height(block);
        let width = if height > 0.0 { self.width as f64 } else { 0.0 };

        Ok(VisualHandle {
            block_id: block.id.clone(),
            block_type: block.block_type(),
            bounds: Rect::new(0.0, 0.0, width, height),
        })
    }

    async fn rasterize(&self, handle: &VisualHandle) -> Result<Bitmap> {
        if self.missing.contains(&handle.block_id) {
            return Err(RenderError::NotFound(handle.block_id.clone()));
        }
        if handle.bounds.is_empty() {
            return Err(RenderError::ZeroSized(handle.block_id.clone()));
        }

        Ok(Bitmap::solid(
            handle.bounds.width.round() as u32,
            handle.bounds.height.round() as u32,
            Self::fill(handle.block_type),
        ))
    }
}
