//! Structural validation of blocks.
//!
//! Validation is pure: it never touches a document and is run before any
//! construct or update is committed.

use crate::block::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Block id must not be empty")]
    EmptyId,

    #[error("{block_type} block {id} is missing required field `{field}`")]
    MissingField {
        id: BlockId,
        block_type: BlockType,
        field: &'static str,
    },

    #[error("Group {group} cannot contain a {child_type} block")]
    InvalidGroupChild {
        group: BlockId,
        child_type: BlockType,
    },

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Field `{0}` cannot be changed by a patch")]
    ImmutableField(&'static str),

    #[error("Patch must be a JSON object")]
    PatchNotObject,

    #[error("Malformed block: {0}")]
    Malformed(String),
}

/// Validate a block and its subtree
pub fn validate(block: &Block) -> Result<(), ValidationError> {
    validate_fields(block)?;

    if let BlockKind::Group(group) = &block.kind {
        for child in &group.children {
            // One level of nesting only
            match child.block_type() {
                BlockType::Group | BlockType::PageBreak => {
                    return Err(ValidationError::InvalidGroupChild {
                        group: block.id.clone(),
                        child_type: child.block_type(),
                    });
                }
                _ => validate_fields(child)?,
            }
        }
    }

    ensure_unique_ids(std::iter::once(block))
}

/// Ensure no id appears twice across the given blocks and their subtrees
pub fn ensure_unique_ids<'a>(
    blocks: impl IntoIterator<Item = &'a Block>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for block in blocks {
        for id in block.subtree_ids() {
            if !seen.insert(id.clone()) {
                return Err(ValidationError::DuplicateId(id));
            }
        }
    }
    Ok(())
}

fn validate_fields(block: &Block) -> Result<(), ValidationError> {
    if block.id.is_empty() {
        return Err(ValidationError::EmptyId);
    }

    let missing = |field: &'static str| ValidationError::MissingField {
        id: block.id.clone(),
        block_type: block.block_type(),
        field,
    };

    match &block.kind {
        BlockKind::Metric(metric) => {
            if metric.metric.is_none() {
                return Err(missing("metric"));
            }
        }
        BlockKind::Chart(chart) => {
            if chart.data_keys.iter().all(|k| k.trim().is_empty()) {
                return Err(missing("dataKeys"));
            }
            if chart.x_axis_key.trim().is_empty() {
                return Err(missing("xAxisKey"));
            }
        }
        BlockKind::Image(image) => {
            if image.src.trim().is_empty() {
                return Err(missing("src"));
            }
        }
        BlockKind::Table(table) => {
            if table.columns.is_empty() {
                return Err(missing("columns"));
            }
            if table.columns.iter().any(|c| c.accessor.trim().is_empty()) {
                return Err(missing("accessor"));
            }
        }
        BlockKind::Text(_) | BlockKind::Group(_) | BlockKind::PageBreak(_) => {}
    }

    Ok(())
}
