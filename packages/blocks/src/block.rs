//! # Block Definitions
//!
//! The closed set of report blocks and their JSON interchange shape.
//!
//! Every block carries the shared attributes (id, optional title and
//! description, style tokens) plus exactly one variant payload. The
//! variant is selected by the `type` tag:
//!
//! ```text
//! { "id": "9f1c2e4a-1", "type": "text", "content": "Hello", "size": "lg" }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique block identifier, unique across the whole document tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Type tag of a block variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Metric,
    Chart,
    Text,
    Image,
    Table,
    Group,
    PageBreak,
}

impl BlockType {
    pub const ALL: [BlockType; 7] = [
        BlockType::Metric,
        BlockType::Chart,
        BlockType::Text,
        BlockType::Image,
        BlockType::Table,
        BlockType::Group,
        BlockType::PageBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Metric => "metric",
            BlockType::Chart => "chart",
            BlockType::Text => "text",
            BlockType::Image => "image",
            BlockType::Table => "table",
            BlockType::Group => "group",
            BlockType::PageBreak => "page-break",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout and appearance tokens shared by every block
///
/// Values are design tokens (e.g. `"full"`, `"md"`, `"#1f2937"`), interpreted
/// by the renderer. The exporter only reads `alignment` and `text_color`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<String>,
}

/// A report block: shared attributes plus one variant payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: BlockId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub style: BlockStyle,

    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind) -> Self {
        Self {
            id,
            title: None,
            description: None,
            style: BlockStyle::default(),
            kind,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Children of a group block, `None` for every other variant
    pub fn children(&self) -> Option<&[Block]> {
        match &self.kind {
            BlockKind::Group(group) => Some(&group.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        match &mut self.kind {
            BlockKind::Group(group) => Some(&mut group.children),
            _ => None,
        }
    }

    /// Ids of this block and its whole subtree, in document order
    pub fn subtree_ids(&self) -> Vec<BlockId> {
        let mut ids = vec![self.id.clone()];
        if let Some(children) = self.children() {
            for child in children {
                ids.extend(child.subtree_ids());
            }
        }
        ids
    }
}

/// Variant payload, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
    Metric(MetricBlock),
    Chart(ChartBlock),
    Text(TextBlock),
    Image(ImageBlock),
    Table(TableBlock),
    Group(GroupBlock),
    PageBreak(PageBreakBlock),
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Metric(_) => BlockType::Metric,
            BlockKind::Chart(_) => BlockType::Chart,
            BlockKind::Text(_) => BlockType::Text,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::Table(_) => BlockType::Table,
            BlockKind::Group(_) => BlockType::Group,
            BlockKind::PageBreak(_) => BlockType::PageBreak,
        }
    }
}

/// Dashboard metric a KPI card reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Revenue,
    Appointments,
    Patients,
    AverageTicket,
    ReturnRate,
    Cancellations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBlock {
    #[serde(default)]
    pub metric: Option<MetricKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default)]
    pub currency: bool,

    /// Period-over-period change in percent, e.g. `-3.5`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_change: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFilter {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBlock {
    pub chart: ChartKind,

    #[serde(default)]
    pub data_keys: Vec<String>,

    #[serde(default)]
    pub x_axis_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axis_key: Option<String>,

    #[serde(default)]
    pub colors: Vec<String>,

    #[serde(default)]
    pub show_legend: bool,

    #[serde(default)]
    pub show_tooltip: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<ChartFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default)]
    pub content: String,

    /// Semantic size token (`sm`, `base`, `xl`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Semantic weight token (`normal`, `bold`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    #[serde(default)]
    pub src: String,

    #[serde(default)]
    pub alt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<ImageFit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnFormat {
    Text,
    Number,
    Currency,
    Percent,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub header: String,
    pub accessor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ColumnFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    #[serde(default)]
    pub columns: Vec<TableColumn>,

    /// Row records keyed by column accessor
    #[serde(default)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBlock {
    #[serde(default)]
    pub children: Vec<Block>,

    pub direction: GroupDirection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
}

/// Marker block, no payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageBreakBlock {}
