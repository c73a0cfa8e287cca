//! # Block Tree
//!
//! The ordered block lists of a document: the root list plus the children
//! list of each root-level group. Commands address exactly these lists.

use reportkit_blocks::{Block, BlockId};
use serde::{Deserialize, Serialize};

/// Position of a block: its containing list and index within it
///
/// `parent` is `None` for the root list, otherwise the owning group's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub parent: Option<BlockId>,
    pub index: usize,
}

impl Location {
    pub fn same_list(&self, other: &Location) -> bool {
        self.parent == other.parent
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockTree {
    blocks: Vec<Block>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing list without checks (callers validate first)
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Find a block in the root list or in a root-level group
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        let location = self.locate(id)?;
        self.list(location.parent.as_ref())?.get(location.index)
    }

    pub fn find_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        let location = self.locate(id)?;
        self.list_mut(location.parent.as_ref())?
            .get_mut(location.index)
    }

    pub fn locate(&self, id: &BlockId) -> Option<Location> {
        for (index, block) in self.blocks.iter().enumerate() {
            if &block.id == id {
                return Some(Location { parent: None, index });
            }
            if let Some(children) = block.children() {
                if let Some(child_index) = children.iter().position(|c| &c.id == id) {
                    return Some(Location {
                        parent: Some(block.id.clone()),
                        index: child_index,
                    });
                }
            }
        }
        None
    }

    /// The root list (`None`) or the children of a root-level group
    pub fn list(&self, parent: Option<&BlockId>) -> Option<&Vec<Block>> {
        match parent {
            None => Some(&self.blocks),
            Some(group_id) => self
                .blocks
                .iter()
                .find(|b| &b.id == group_id)
                .and_then(|b| match &b.kind {
                    reportkit_blocks::BlockKind::Group(group) => Some(&group.children),
                    _ => None,
                }),
        }
    }

    pub fn list_mut(&mut self, parent: Option<&BlockId>) -> Option<&mut Vec<Block>> {
        match parent {
            None => Some(&mut self.blocks),
            Some(group_id) => self
                .blocks
                .iter_mut()
                .find(|b| &b.id == group_id)
                .and_then(|b| b.children_mut()),
        }
    }

    /// Whether `id` is used anywhere in the tree, at any depth
    pub fn contains(&self, id: &BlockId) -> bool {
        self.blocks
            .iter()
            .any(|block| block.subtree_ids().iter().any(|existing| existing == id))
    }

    /// Every id in document order, including group children
    pub fn all_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().flat_map(|b| b.subtree_ids()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportkit_blocks::{construct_default, BlockType};

    fn tree() -> BlockTree {
        let mut group = construct_default(BlockType::Group, BlockId::from("g"));
        group
            .children_mut()
            .unwrap()
            .push(construct_default(BlockType::Metric, BlockId::from("m")));

        BlockTree::from_blocks(vec![
            construct_default(BlockType::Text, BlockId::from("t")),
            group,
        ])
    }

    #[test]
    fn test_locate_root_and_group_child() {
        let tree = tree();

        assert_eq!(
            tree.locate(&BlockId::from("g")),
            Some(Location { parent: None, index: 1 })
        );
        assert_eq!(
            tree.locate(&BlockId::from("m")),
            Some(Location {
                parent: Some(BlockId::from("g")),
                index: 0
            })
        );
        assert_eq!(tree.locate(&BlockId::from("missing")), None);
    }

    #[test]
    fn test_list_of_non_group_is_none() {
        let tree = tree();
        assert!(tree.list(Some(&BlockId::from("t"))).is_none());
        assert_eq!(tree.list(Some(&BlockId::from("g"))).map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_all_ids_in_document_order() {
        let ids: Vec<String> = tree().all_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["t", "g", "m"]);
    }
}
