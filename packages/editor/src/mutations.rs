//! # Block Mutations
//!
//! Editing commands on a document's block tree.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one editor command
//! 2. **Validated**: nothing is committed unless the result validates
//! 3. **Invertible**: every applied mutation yields its concrete inverse
//!
//! ## Mutation Semantics
//!
//! ### AddBlock / DuplicateBlock
//! - Mint fresh ids that are unused anywhere in the tree
//! - Duplicates land immediately after the source, in the same list
//!
//! ### UpdateBlock
//! - JSON merge patch, validated before it replaces the block
//! - `id` and `type` are immutable
//!
//! ### RemoveBlock
//! - Removes the block and its subtree
//!
//! ### MoveUp / MoveDown / Reorder
//! - Stay within one list; boundary or out-of-range moves are no-ops

use crate::tree::{BlockTree, Location};
use reportkit_blocks::{
    apply_patch, construct_default, validate, Block, BlockId, BlockType, IdGenerator,
    ValidationError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Editor commands (serializable for hosts and undo history)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    /// Append a default block of `block_type` to the root list or a group
    AddBlock {
        block_type: BlockType,
        parent: Option<BlockId>,
    },

    /// Insert a fully specified block at `index`
    InsertBlock {
        parent: Option<BlockId>,
        index: usize,
        block: Block,
    },

    /// Merge a JSON patch into a block
    UpdateBlock { block_id: BlockId, patch: serde_json::Value },

    /// Replace the block with the same id wholesale
    ReplaceBlock { block: Block },

    /// Deep-clone a block with fresh ids, inserted right after it
    DuplicateBlock { block_id: BlockId },

    /// Remove a block and its subtree
    RemoveBlock { block_id: BlockId },

    /// Swap with the previous sibling
    MoveUp { block_id: BlockId },

    /// Swap with the next sibling
    MoveDown { block_id: BlockId },

    /// Array-move within one list
    Reorder {
        parent: Option<BlockId>,
        from: usize,
        to: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    NotFound(BlockId),

    #[error("Parent group not found: {0}")]
    ParentNotFound(BlockId),

    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Outcome of a successfully applied mutation
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// Mutation that undoes this one
    pub inverse: Mutation,

    /// Id of the block this mutation created, if any
    pub created: Option<BlockId>,

    /// False for no-op moves
    pub changed: bool,
}

impl Applied {
    fn changed(inverse: Mutation) -> Self {
        Self {
            inverse,
            created: None,
            changed: true,
        }
    }

    fn created(id: BlockId) -> Self {
        Self {
            inverse: Mutation::RemoveBlock {
                block_id: id.clone(),
            },
            created: Some(id),
            changed: true,
        }
    }

    fn unchanged(parent: Option<BlockId>) -> Self {
        Self {
            inverse: Mutation::Reorder {
                parent,
                from: 0,
                to: 0,
            },
            created: None,
            changed: false,
        }
    }
}

impl Mutation {
    /// Debug name for logs and undo descriptions
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddBlock { .. } => "add",
            Mutation::InsertBlock { .. } => "insert",
            Mutation::UpdateBlock { .. } => "update",
            Mutation::ReplaceBlock { .. } => "replace",
            Mutation::DuplicateBlock { .. } => "duplicate",
            Mutation::RemoveBlock { .. } => "delete",
            Mutation::MoveUp { .. } => "move-up",
            Mutation::MoveDown { .. } => "move-down",
            Mutation::Reorder { .. } => "reorder",
        }
    }

    /// Apply mutation to the tree, returning its inverse
    ///
    /// On error the tree is left exactly as it was.
    pub fn apply(&self, tree: &mut BlockTree, ids: &mut IdGenerator) -> Result<Applied, MutationError> {
        debug!(mutation = self.name(), "Applying mutation");

        match self {
            Mutation::AddBlock { block_type, parent } => {
                Self::apply_add(tree, ids, *block_type, parent.as_ref())
            }

            Mutation::InsertBlock { parent, index, block } => {
                Self::apply_insert(tree, parent.as_ref(), *index, block.clone())
            }

            Mutation::UpdateBlock { block_id, patch } => {
                let current = tree
                    .find(block_id)
                    .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;
                let patched = apply_patch(current, patch)?;
                Self::apply_replace(tree, patched)
            }

            Mutation::ReplaceBlock { block } => Self::apply_replace(tree, block.clone()),

            Mutation::DuplicateBlock { block_id } => Self::apply_duplicate(tree, ids, block_id),

            Mutation::RemoveBlock { block_id } => Self::apply_remove(tree, block_id),

            Mutation::MoveUp { block_id } => match tree.locate(block_id) {
                Some(Location { parent, index }) if index > 0 => {
                    Self::apply_reorder(tree, parent, index, index - 1)
                }
                Some(Location { parent, .. }) => Ok(Applied::unchanged(parent)),
                None => Ok(Applied::unchanged(None)),
            },

            Mutation::MoveDown { block_id } => match tree.locate(block_id) {
                Some(Location { parent, index }) => {
                    let len = tree.list(parent.as_ref()).map(|l| l.len()).unwrap_or(0);
                    if index + 1 < len {
                        Self::apply_reorder(tree, parent, index, index + 1)
                    } else {
                        Ok(Applied::unchanged(parent))
                    }
                }
                None => Ok(Applied::unchanged(None)),
            },

            Mutation::Reorder { parent, from, to } => {
                Self::apply_reorder(tree, parent.clone(), *from, *to)
            }
        }
    }

    fn apply_add(
        tree: &mut BlockTree,
        ids: &mut IdGenerator,
        block_type: BlockType,
        parent: Option<&BlockId>,
    ) -> Result<Applied, MutationError> {
        if let Some(group_id) = parent {
            Self::check_group_child(tree, group_id, block_type)?;
        }

        let id = ids.new_unique_id(|candidate| tree.contains(candidate));
        let block = construct_default(block_type, id.clone());
        validate(&block)?;

        let list = tree
            .list_mut(parent)
            .ok_or_else(|| Self::parent_error(parent))?;
        list.push(block);

        Ok(Applied::created(id))
    }

    fn apply_insert(
        tree: &mut BlockTree,
        parent: Option<&BlockId>,
        index: usize,
        block: Block,
    ) -> Result<Applied, MutationError> {
        validate(&block)?;
        if let Some(group_id) = parent {
            Self::check_group_child(tree, group_id, block.block_type())?;
        }
        Self::check_ids_free(tree, &block, &[])?;

        let list = tree
            .list_mut(parent)
            .ok_or_else(|| Self::parent_error(parent))?;
        if index > list.len() {
            return Err(MutationError::IndexOutOfRange {
                index,
                len: list.len(),
            });
        }

        let id = block.id.clone();
        list.insert(index, block);

        Ok(Applied::changed(Mutation::RemoveBlock { block_id: id }))
    }

    fn apply_replace(tree: &mut BlockTree, block: Block) -> Result<Applied, MutationError> {
        let location = tree
            .locate(&block.id)
            .ok_or_else(|| MutationError::NotFound(block.id.clone()))?;

        validate(&block)?;
        if let Some(group_id) = &location.parent {
            Self::check_group_child(tree, group_id, block.block_type())?;
        }

        let existing = tree
            .find(&block.id)
            .ok_or_else(|| MutationError::NotFound(block.id.clone()))?;
        Self::check_ids_free(tree, &block, &existing.subtree_ids())?;

        let slot = tree
            .find_mut(&block.id)
            .ok_or_else(|| MutationError::NotFound(block.id.clone()))?;
        let previous = std::mem::replace(slot, block);

        Ok(Applied::changed(Mutation::ReplaceBlock { block: previous }))
    }

    fn apply_duplicate(
        tree: &mut BlockTree,
        ids: &mut IdGenerator,
        block_id: &BlockId,
    ) -> Result<Applied, MutationError> {
        let location = tree
            .locate(block_id)
            .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;
        let mut copy = tree
            .find(block_id)
            .cloned()
            .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;

        assign_fresh_ids(&mut copy, ids, tree);
        let new_id = copy.id.clone();

        let list = tree
            .list_mut(location.parent.as_ref())
            .ok_or_else(|| Self::parent_error(location.parent.as_ref()))?;
        list.insert(location.index + 1, copy);

        Ok(Applied::created(new_id))
    }

    fn apply_remove(tree: &mut BlockTree, block_id: &BlockId) -> Result<Applied, MutationError> {
        let Location { parent, index } = tree
            .locate(block_id)
            .ok_or_else(|| MutationError::NotFound(block_id.clone()))?;

        let list = tree
            .list_mut(parent.as_ref())
            .ok_or_else(|| Self::parent_error(parent.as_ref()))?;
        let removed = list.remove(index);

        Ok(Applied::changed(Mutation::InsertBlock {
            parent,
            index,
            block: removed,
        }))
    }

    fn apply_reorder(
        tree: &mut BlockTree,
        parent: Option<BlockId>,
        from: usize,
        to: usize,
    ) -> Result<Applied, MutationError> {
        let list = tree
            .list_mut(parent.as_ref())
            .ok_or_else(|| Self::parent_error(parent.as_ref()))?;

        if from == to || from >= list.len() || to >= list.len() {
            return Ok(Applied::unchanged(parent));
        }

        let moved = list.remove(from);
        list.insert(to, moved);

        Ok(Applied::changed(Mutation::Reorder {
            parent,
            from: to,
            to: from,
        }))
    }

    /// Only root-level groups take children, and never groups or page breaks
    fn check_group_child(
        tree: &BlockTree,
        group_id: &BlockId,
        child_type: BlockType,
    ) -> Result<(), MutationError> {
        let is_root_group = tree
            .list(None)
            .map(|root| root.iter().any(|b| &b.id == group_id && b.children().is_some()))
            .unwrap_or(false);
        if !is_root_group {
            return Err(MutationError::ParentNotFound(group_id.clone()));
        }

        match child_type {
            BlockType::Group | BlockType::PageBreak => Err(ValidationError::InvalidGroupChild {
                group: group_id.clone(),
                child_type,
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// Ids of `block` must not already be used, except by `replacing`
    fn check_ids_free(
        tree: &BlockTree,
        block: &Block,
        replacing: &[BlockId],
    ) -> Result<(), MutationError> {
        for id in block.subtree_ids() {
            if !replacing.contains(&id) && tree.contains(&id) {
                return Err(ValidationError::DuplicateId(id).into());
            }
        }
        Ok(())
    }

    fn parent_error(parent: Option<&BlockId>) -> MutationError {
        // The root list always resolves, so only group lookups land here
        MutationError::ParentNotFound(parent.cloned().unwrap_or_else(|| BlockId::from("<root>")))
    }
}

/// Re-id a detached block and its subtree with ids unused in `tree`
fn assign_fresh_ids(block: &mut Block, ids: &mut IdGenerator, tree: &BlockTree) {
    block.id = ids.new_unique_id(|candidate| tree.contains(candidate));
    if let Some(children) = block.children_mut() {
        for child in children {
            assign_fresh_ids(child, ids, tree);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn setup() -> (BlockTree, IdGenerator) {
        (BlockTree::new(), IdGenerator::from_seed("doc".to_string()))
    }

    fn add(tree: &mut BlockTree, ids: &mut IdGenerator, block_type: BlockType) -> BlockId {
        Mutation::AddBlock {
            block_type,
            parent: None,
        }
        .apply(tree, ids)
        .unwrap()
        .created
        .unwrap()
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::UpdateBlock {
            block_id: BlockId::from("doc-1"),
            patch: json!({"content": "Hello World"}),
        };

        let json = serde_json::to_string(&mutation).unwrap();
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_add_appends_with_fresh_id() {
        let (mut tree, mut ids) = setup();
        let a = add(&mut tree, &mut ids, BlockType::Text);
        let b = add(&mut tree, &mut ids, BlockType::Chart);

        assert_ne!(a, b);
        assert_eq!(tree.blocks()[1].id, b);
        assert_eq!(tree.blocks()[1].block_type(), BlockType::Chart);
    }

    #[test]
    fn test_add_group_inside_group_rejected() {
        let (mut tree, mut ids) = setup();
        let group = add(&mut tree, &mut ids, BlockType::Group);

        let result = Mutation::AddBlock {
            block_type: BlockType::Group,
            parent: Some(group),
        }
        .apply(&mut tree, &mut ids);

        assert!(matches!(
            result,
            Err(MutationError::Validation(ValidationError::InvalidGroupChild { .. }))
        ));
        assert_eq!(tree.all_ids().len(), 1);
    }

    #[test]
    fn test_update_missing_block_is_not_found() {
        let (mut tree, mut ids) = setup();
        let result = Mutation::UpdateBlock {
            block_id: BlockId::from("nope"),
            patch: json!({}),
        }
        .apply(&mut tree, &mut ids);

        assert_eq!(result.unwrap_err(), MutationError::NotFound(BlockId::from("nope")));
    }

    #[test]
    fn test_invalid_update_does_not_mutate() {
        let (mut tree, mut ids) = setup();
        let image = add(&mut tree, &mut ids, BlockType::Image);
        let before = tree.clone();

        let result = Mutation::UpdateBlock {
            block_id: image,
            patch: json!({"src": ""}),
        }
        .apply(&mut tree, &mut ids);

        assert!(result.is_err());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_inverse_restores_position() {
        let (mut tree, mut ids) = setup();
        add(&mut tree, &mut ids, BlockType::Text);
        let middle = add(&mut tree, &mut ids, BlockType::Metric);
        add(&mut tree, &mut ids, BlockType::Chart);
        let before = tree.clone();

        let applied = Mutation::RemoveBlock { block_id: middle }
            .apply(&mut tree, &mut ids)
            .unwrap();
        applied.inverse.apply(&mut tree, &mut ids).unwrap();

        assert_eq!(tree, before);
    }

    #[test]
    fn test_duplicate_group_refreshes_child_ids() {
        let (mut tree, mut ids) = setup();
        let group = add(&mut tree, &mut ids, BlockType::Group);
        Mutation::AddBlock {
            block_type: BlockType::Metric,
            parent: Some(group.clone()),
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        let copy = Mutation::DuplicateBlock { block_id: group }
            .apply(&mut tree, &mut ids)
            .unwrap()
            .created
            .unwrap();

        assert_eq!(tree.blocks()[1].id, copy);
        let all = tree.all_ids();
        let mut unique = all.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(all.len(), 4);
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let (mut tree, mut ids) = setup();
        add(&mut tree, &mut ids, BlockType::Text);

        let applied = Mutation::Reorder {
            parent: None,
            from: 0,
            to: 5,
        }
        .apply(&mut tree, &mut ids)
        .unwrap();

        assert!(!applied.changed);
    }
}
