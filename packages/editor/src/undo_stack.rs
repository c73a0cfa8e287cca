//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Applying a mutation records the inverse the document returned
//! - Undo applies the recorded inverses and keeps *their* inverses for redo
//! - Redo applies those and records the resulting inverses for undo again
//! - New mutations clear the redo stack
//! - Supports batched operations (group multiple mutations as one undo step)
//!
//! Because inverses carry concrete blocks, ids survive undo/redo: a block
//! removed and restored comes back with the same id.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut doc = Document::new("quarterly");
//!
//! stack.apply(Mutation::AddBlock { block_type: BlockType::Text, parent: None }, &mut doc)?;
//! stack.undo(&mut doc)?;
//! stack.redo(&mut doc)?;
//! ```

use crate::{Document, EditorError, Mutation, MutationResult};
use tracing::warn;

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// The inverse mutations (in reverse order for undo)
    pub inverses: Vec<Mutation>,

    /// Optional description of this batch
    pub description: Option<String>,
}

impl MutationBatch {
    /// Create a single-mutation batch
    pub fn single(mutation: Mutation, inverse: Mutation) -> Self {
        Self {
            mutations: vec![mutation],
            inverses: vec![inverse],
            description: None,
        }
    }

    /// Add a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn empty() -> Self {
        Self {
            mutations: Vec::new(),
            inverses: Vec::new(),
            description: None,
        }
    }
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied mutations (most recent last)
    undo_stack: Vec<MutationBatch>,

    /// Stack of undone mutations (most recent last)
    redo_stack: Vec<MutationBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<MutationBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply a mutation and record it for undo
    ///
    /// No-op mutations (boundary moves) are not recorded.
    pub fn apply(&mut self, mutation: Mutation, doc: &mut Document) -> Result<MutationResult, EditorError> {
        let result = doc.apply(mutation.clone())?;
        if !result.changed {
            return Ok(result);
        }

        if let Some(batch) = &mut self.current_batch {
            batch.mutations.push(mutation);
            batch.inverses.insert(0, result.inverse.clone()); // Inverses go in reverse order
        } else {
            let batch = MutationBatch::single(mutation, result.inverse.clone());
            self.push_batch(batch);
        }

        Ok(result)
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(MutationBatch::empty());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.mutations.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push(batch);

        // Trim if exceeded max levels
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent mutation/batch
    pub fn undo(&mut self, doc: &mut Document) -> Result<bool, EditorError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(false); // Nothing to undo
        };

        match Self::replay(&batch.inverses, doc) {
            Ok(redo_inverses) => {
                self.redo_stack.push(MutationBatch {
                    mutations: batch.inverses,
                    inverses: redo_inverses,
                    description: batch.description,
                });
                Ok(true)
            }
            Err(e) => {
                self.undo_stack.push(batch);
                Err(e)
            }
        }
    }

    /// Redo the most recently undone mutation/batch
    pub fn redo(&mut self, doc: &mut Document) -> Result<bool, EditorError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false); // Nothing to redo
        };

        match Self::replay(&batch.inverses, doc) {
            Ok(undo_inverses) => {
                self.undo_stack.push(MutationBatch {
                    mutations: batch.inverses,
                    inverses: undo_inverses,
                    description: batch.description,
                });
                Ok(true)
            }
            Err(e) => {
                self.redo_stack.push(batch);
                Err(e)
            }
        }
    }

    /// Apply mutations in order, returning their inverses in reverse order
    ///
    /// If one fails, already-applied steps are rolled back.
    fn replay(mutations: &[Mutation], doc: &mut Document) -> Result<Vec<Mutation>, EditorError> {
        let mut inverses: Vec<Mutation> = Vec::with_capacity(mutations.len());

        for mutation in mutations {
            match doc.apply(mutation.clone()) {
                Ok(result) => inverses.insert(0, result.inverse),
                Err(e) => {
                    for inverse in &inverses {
                        if let Err(rollback) = doc.apply(inverse.clone()) {
                            warn!(
                                mutation = inverse.name(),
                                error = %rollback,
                                "Rollback step failed, document partially restored"
                            );
                        }
                    }
                    return Err(e);
                }
            }
        }

        Ok(inverses)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Get description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    /// Get description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportkit_blocks::{BlockId, BlockKind, BlockType};
    use serde_json::json;

    fn add(block_type: BlockType) -> Mutation {
        Mutation::AddBlock {
            block_type,
            parent: None,
        }
    }

    #[test]
    fn test_failed_replay_rolls_back_applied_steps() {
        let mut doc = Document::new("rollback");
        let before = doc.blocks().to_vec();

        let err = UndoStack::replay(
            &[
                add(BlockType::Text),
                add(BlockType::Chart),
                Mutation::RemoveBlock {
                    block_id: BlockId::from("missing"),
                },
            ],
            &mut doc,
        )
        .unwrap_err();

        assert!(matches!(err, EditorError::Mutation(_)));
        assert_eq!(doc.blocks(), before.as_slice());
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_apply_and_undo_update() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::new();

        let id = stack.apply(add(BlockType::Text), &mut doc).unwrap().created.unwrap();
        stack
            .apply(
                Mutation::UpdateBlock {
                    block_id: id.clone(),
                    patch: json!({"content": "World"}),
                },
                &mut doc,
            )
            .unwrap();

        assert_eq!(stack.undo_levels(), 2);

        let undone = stack.undo(&mut doc).unwrap();
        assert!(undone);
        match &doc.find(&id).unwrap().kind {
            BlockKind::Text(text) => assert_eq!(text.content, reportkit_blocks::DEFAULT_TEXT),
            other => panic!("expected text, got {:?}", other),
        }

        let redone = stack.redo(&mut doc).unwrap();
        assert!(redone);
        match &doc.find(&id).unwrap().kind {
            BlockKind::Text(text) => assert_eq!(text.content, "World"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_redo_keeps_ids_stable() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::new();

        let id = stack.apply(add(BlockType::Metric), &mut doc).unwrap().created.unwrap();
        stack.undo(&mut doc).unwrap();
        assert!(doc.is_empty());

        stack.redo(&mut doc).unwrap();
        assert_eq!(doc.blocks()[0].id, id);
    }

    #[test]
    fn test_batched_mutations() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::new();

        stack.begin_batch();
        stack.set_batch_description("Add header");
        stack.apply(add(BlockType::Text), &mut doc).unwrap();
        stack.apply(add(BlockType::Metric), &mut doc).unwrap();
        stack.end_batch();

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_description(), Some("Add header"));

        // Undo should revert both
        stack.undo(&mut doc).unwrap();
        assert!(doc.is_empty());
        assert_eq!(stack.redo_description(), Some("Add header"));
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::new();

        stack.apply(add(BlockType::Text), &mut doc).unwrap();
        stack.undo(&mut doc).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        stack.apply(add(BlockType::Chart), &mut doc).unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_noop_moves_are_not_recorded() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::new();

        let id = stack.apply(add(BlockType::Text), &mut doc).unwrap().created.unwrap();
        stack.apply(Mutation::MoveUp { block_id: id }, &mut doc).unwrap();

        assert_eq!(stack.undo_levels(), 1);
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut doc = Document::new("undo");
        let mut stack = UndoStack::with_max_levels(2);

        for _ in 0..3 {
            stack.apply(add(BlockType::Text), &mut doc).unwrap();
        }

        assert_eq!(stack.undo_levels(), 2);
    }
}
