//! Export output: placed items per page, plus warnings

use crate::typography::{Alignment, FontWeight};
use crate::PageGeometry;
use reportkit_blocks::{BlockId, BlockType};
use reportkit_render::Bitmap;
use serde::{Deserialize, Serialize};

/// Paginated document ready for encoding
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,

    /// RFC 3339 timestamp
    pub generated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<PlacedItem>,
}

#[derive(Debug, Clone)]
pub enum PlacedItem {
    Text(PlacedText),
    Image(PlacedImage),
}

/// Native vector text block
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub block_id: BlockId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub size: f64,
    pub weight: FontWeight,
    pub color: [u8; 3],
    pub alignment: Alignment,
    pub lines: Vec<String>,
}

impl PlacedText {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * crate::typography::line_height(self.size)
    }
}

/// Where embedded pixels came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageOrigin {
    /// The image block's own source
    Native,

    /// Captured from the renderer
    Raster,
}

#[derive(Debug, Clone)]
pub struct PlacedImage {
    pub block_id: BlockId,
    pub block_type: BlockType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub origin: ImageOrigin,
    pub bitmap: Bitmap,
}

impl PlacedItem {
    pub fn block_id(&self) -> &BlockId {
        match self {
            PlacedItem::Text(text) => &text.block_id,
            PlacedItem::Image(image) => &image.block_id,
        }
    }

    /// Top edge
    pub fn y(&self) -> f64 {
        match self {
            PlacedItem::Text(text) => text.y,
            PlacedItem::Image(image) => image.y,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            PlacedItem::Text(text) => text.height(),
            PlacedItem::Image(image) => image.height,
        }
    }
}

impl ExportArtifact {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page index holding the given block, if it was placed
    pub fn page_of(&self, id: &BlockId) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.items.iter().any(|item| item.block_id() == id))
    }

    /// Pixel-free description of the layout
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            geometry: self.geometry,
            generated_at: self.generated_at.clone(),
            pages: self
                .pages
                .iter()
                .map(|page| {
                    page.items
                        .iter()
                        .map(|item| match item {
                            PlacedItem::Text(text) => ItemSummary {
                                block_id: text.block_id.clone(),
                                kind: ItemKind::Text,
                                x: text.x,
                                y: text.y,
                                width: text.width,
                                height: text.height(),
                            },
                            PlacedItem::Image(image) => ItemSummary {
                                block_id: image.block_id.clone(),
                                kind: match image.origin {
                                    ImageOrigin::Native => ItemKind::Image,
                                    ImageOrigin::Raster => ItemKind::Raster,
                                },
                                x: image.x,
                                y: image.y,
                                width: image.width,
                                height: image.height,
                            },
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub geometry: PageGeometry,
    pub generated_at: String,
    pub pages: Vec<Vec<ItemSummary>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Text,
    Image,
    Raster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub block_id: BlockId,
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Recoverable per-block problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// Image source failed to load; the on-screen region was captured instead
    ImageFallback,

    /// Block could not be captured and is absent from the output
    Skipped,

    /// Text taller than a whole page lost its trailing lines
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportWarning {
    pub block_id: BlockId,
    pub block_type: BlockType,
    pub kind: WarningKind,
    pub message: String,
}

impl std::fmt::Display for ExportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.block_id, self.block_type, self.message)
    }
}
