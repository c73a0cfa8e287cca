//! # Document Store
//!
//! A report document: the ordered block tree, its id generator and a
//! version counter. The document is the sole owner of its blocks; every
//! change goes through [`Document::apply`].
//!
//! ## Lifecycle
//!
//! ```text
//! new / from_json → add / update / duplicate / delete / move → snapshot → export
//! ```

use crate::tree::{BlockTree, Location};
use crate::{EditorError, Mutation};
use reportkit_blocks::{ensure_unique_ids, validate, Block, BlockId, BlockType, IdGenerator};

/// Editable report document
#[derive(Debug, Clone)]
pub struct Document {
    /// Document name (seeds block ids)
    pub name: String,

    /// Current version number (increments on each effective mutation)
    pub version: u64,

    tree: BlockTree,
    ids: IdGenerator,
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// Version after the mutation
    pub version: u64,

    /// Mutation that reverts this one
    pub inverse: Mutation,

    /// Block created by the mutation, if any
    pub created: Option<BlockId>,

    /// False when the command was a no-op (e.g. move at a boundary)
    pub changed: bool,
}

impl Document {
    /// Create an empty document
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ids: IdGenerator::new(&name),
            name,
            version: 0,
            tree: BlockTree::new(),
        }
    }

    /// Create a document from an existing block list, validating the whole tree
    pub fn from_blocks(name: impl Into<String>, blocks: Vec<Block>) -> Result<Self, EditorError> {
        for block in &blocks {
            validate(block)?;
        }
        ensure_unique_ids(blocks.iter())?;

        let mut doc = Self::new(name);
        doc.tree = BlockTree::from_blocks(blocks);
        Ok(doc)
    }

    /// Parse a JSON array of block definitions
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self, EditorError> {
        let blocks: Vec<Block> = serde_json::from_str(json)?;
        Self::from_blocks(name, blocks)
    }

    /// Serialize the root list as a JSON array of block definitions
    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self.tree.blocks())?)
    }

    pub fn blocks(&self) -> &[Block] {
        self.tree.blocks()
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        self.tree.find(id)
    }

    pub fn locate(&self, id: &BlockId) -> Option<Location> {
        self.tree.locate(id)
    }

    /// Index of a root-level block
    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks().iter().position(|b| &b.id == id)
    }

    /// Deep copy of the root list, detached from this document
    pub fn snapshot(&self) -> Vec<Block> {
        self.tree.blocks().to_vec()
    }

    /// Apply a mutation
    ///
    /// Failed mutations leave both the tree and the version untouched.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let applied = mutation.apply(&mut self.tree, &mut self.ids)?;

        if applied.changed {
            self.version += 1;
        }

        Ok(MutationResult {
            version: self.version,
            inverse: applied.inverse,
            created: applied.created,
            changed: applied.changed,
        })
    }

    /// Append a default block to the root list
    pub fn add(&mut self, block_type: BlockType) -> Result<BlockId, EditorError> {
        self.add_created(Mutation::AddBlock {
            block_type,
            parent: None,
        })
    }

    /// Append a default block to a root-level group
    pub fn add_to_group(&mut self, group_id: &BlockId, block_type: BlockType) -> Result<BlockId, EditorError> {
        self.add_created(Mutation::AddBlock {
            block_type,
            parent: Some(group_id.clone()),
        })
    }

    pub fn update(&mut self, id: &BlockId, patch: serde_json::Value) -> Result<(), EditorError> {
        self.apply(Mutation::UpdateBlock {
            block_id: id.clone(),
            patch,
        })?;
        Ok(())
    }

    /// Duplicate a block, returning the copy's id
    pub fn duplicate(&mut self, id: &BlockId) -> Result<BlockId, EditorError> {
        self.add_created(Mutation::DuplicateBlock {
            block_id: id.clone(),
        })
    }

    pub fn delete(&mut self, id: &BlockId) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveBlock {
            block_id: id.clone(),
        })?;
        Ok(())
    }

    /// Returns whether the block moved
    pub fn move_up(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::MoveUp {
                block_id: id.clone(),
            })?
            .changed)
    }

    /// Returns whether the block moved
    pub fn move_down(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::MoveDown {
                block_id: id.clone(),
            })?
            .changed)
    }

    /// Array-move within the root list
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, EditorError> {
        self.reorder_in(None, from, to)
    }

    /// Array-move within the root list (`None`) or a group's children
    pub fn reorder_in(&mut self, parent: Option<&BlockId>, from: usize, to: usize) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::Reorder {
                parent: parent.cloned(),
                from,
                to,
            })?
            .changed)
    }

    fn add_created(&mut self, mutation: Mutation) -> Result<BlockId, EditorError> {
        let result = self.apply(mutation)?;
        // AddBlock and DuplicateBlock always report the created id
        result.created.ok_or_else(|| {
            EditorError::Mutation(crate::MutationError::NotFound(BlockId::from("<created>")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_empty_document() {
        let doc = Document::new("quarterly");
        assert_eq!(doc.version, 0);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_version_increments_only_on_change() {
        let mut doc = Document::new("quarterly");
        let id = doc.add(BlockType::Text).unwrap();
        assert_eq!(doc.version, 1);

        // Boundary move is a no-op
        assert!(!doc.move_up(&id).unwrap());
        assert_eq!(doc.version, 1);

        // Failing command leaves version alone
        assert!(doc.update(&BlockId::from("missing"), json!({})).is_err());
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let mut doc = Document::new("quarterly");
        doc.add(BlockType::Text).unwrap();
        doc.add(BlockType::PageBreak).unwrap();
        doc.add(BlockType::Metric).unwrap();

        let json = doc.to_json().unwrap();
        let loaded = Document::from_json("quarterly", &json).unwrap();

        assert_eq!(loaded.blocks(), doc.blocks());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"[
            {"id": "a", "type": "text", "content": "one"},
            {"id": "a", "type": "text", "content": "two"}
        ]"#;

        assert!(matches!(
            Document::from_json("dup", json),
            Err(EditorError::Validation(_))
        ));
    }

    #[test]
    fn test_loaded_document_mints_unused_ids() {
        let mut doc = Document::new("quarterly");
        let first = doc.add(BlockType::Text).unwrap();

        let mut reloaded = Document::from_json("quarterly", &doc.to_json().unwrap()).unwrap();
        let second = reloaded.add(BlockType::Text).unwrap();

        assert_ne!(first, second);
    }
}
