//! Deterministic seed values for newly added blocks.

use crate::block::*;

pub const DEFAULT_TEXT: &str = "Click to edit this text";
pub const DEFAULT_IMAGE_SRC: &str = "https://placehold.co/600x300/png";
pub const DEFAULT_CHART_COLORS: [&str; 3] = ["#2563eb", "#16a34a", "#f59e0b"];

/// Build the default block of the given type
///
/// The same type always yields the same block apart from `id`.
pub fn construct_default(block_type: BlockType, id: BlockId) -> Block {
    let (title, kind) = match block_type {
        BlockType::Metric => (
            Some("Revenue"),
            BlockKind::Metric(MetricBlock {
                metric: Some(MetricKey::Revenue),
                unit: None,
                currency: true,
                percentage_change: None,
                accent_color: Some("#2563eb".to_string()),
                icon: Some("trending-up".to_string()),
            }),
        ),
        BlockType::Chart => (
            Some("Chart"),
            BlockKind::Chart(ChartBlock {
                chart: ChartKind::Bar,
                data_keys: vec!["value".to_string()],
                x_axis_key: "label".to_string(),
                y_axis_key: None,
                colors: DEFAULT_CHART_COLORS.iter().map(|c| c.to_string()).collect(),
                show_legend: true,
                show_tooltip: true,
                filter: None,
            }),
        ),
        BlockType::Text => (
            None,
            BlockKind::Text(TextBlock {
                content: DEFAULT_TEXT.to_string(),
                size: Some("base".to_string()),
                weight: Some("normal".to_string()),
            }),
        ),
        BlockType::Image => (
            None,
            BlockKind::Image(ImageBlock {
                src: DEFAULT_IMAGE_SRC.to_string(),
                alt: "Placeholder image".to_string(),
                fit: Some(ImageFit::Contain),
            }),
        ),
        BlockType::Table => (
            Some("Table"),
            BlockKind::Table(TableBlock {
                columns: vec![
                    TableColumn {
                        header: "Name".to_string(),
                        accessor: "name".to_string(),
                        format: Some(ColumnFormat::Text),
                    },
                    TableColumn {
                        header: "Value".to_string(),
                        accessor: "value".to_string(),
                        format: Some(ColumnFormat::Number),
                    },
                ],
                rows: Vec::new(),
            }),
        ),
        BlockType::Group => (
            None,
            BlockKind::Group(GroupBlock {
                children: Vec::new(),
                direction: GroupDirection::Row,
                gap: Some("md".to_string()),
            }),
        ),
        BlockType::PageBreak => (None, BlockKind::PageBreak(PageBreakBlock {})),
    };

    let mut block = Block::new(id, kind);
    block.title = title.map(str::to_string);
    if block_type != BlockType::PageBreak {
        block.style.width = Some("full".to_string());
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    #[test]
    fn test_every_default_is_valid() {
        for block_type in BlockType::ALL {
            let block = construct_default(block_type, BlockId::from("x-1"));
            assert_eq!(block.block_type(), block_type);
            assert!(validate(&block).is_ok(), "default {} should validate", block_type);
        }
    }

    #[test]
    fn test_defaults_are_deterministic() {
        for block_type in BlockType::ALL {
            let a = construct_default(block_type, BlockId::from("same"));
            let b = construct_default(block_type, BlockId::from("same"));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_text_default_has_placeholder_content() {
        let block = construct_default(BlockType::Text, BlockId::from("t"));
        match block.kind {
            BlockKind::Text(text) => assert_eq!(text.content, DEFAULT_TEXT),
            other => panic!("expected text, got {:?}", other),
        }
    }
}
