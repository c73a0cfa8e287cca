//! # Reorder Protocol
//!
//! Translates drag interactions into document commands.
//!
//! ```text
//! Idle ──start──▶ Dragging(source) ──drop_on──▶ Idle   (maybe one command)
//!                        │ ─drop_outside─▶ Idle        (no command)
//!                        └─────cancel────▶ Idle        (no command)
//! ```
//!
//! Input technology stays outside: pointers call `start`/`drop_on`, the
//! keyboard path (`pick_up` → `step` → `commit`) resolves to the very same
//! `drop_on` call targeting the focused sibling, so both produce identical
//! commands for the same logical move.

use crate::{Document, EditorError, Mutation, MutationResult};
use reportkit_blocks::{BlockId, BlockType};
use thiserror::Error;
use tracing::debug;

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A block type from the library, not yet in the document
    Template(BlockType),

    /// A block already in the document
    Existing(BlockId),
}

/// Where a drag ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas itself (outside any block)
    Canvas,

    /// On top of a block
    Block(BlockId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging(DragSource),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Result of finishing a drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Added(BlockId),
    Moved {
        parent: Option<BlockId>,
        from: usize,
        to: usize,
    },
    Unchanged,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    #[error("A drag is already in progress")]
    AlreadyDragging,

    #[error("No drag in progress")]
    NotDragging,

    #[error("No keyboard drag in progress")]
    NotPickedUp,

    #[error("Block not found: {0}")]
    NotFound(BlockId),
}

/// Sibling index the keyboard drag currently points at
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyboardFocus {
    parent: Option<BlockId>,
    index: usize,
}

/// Drag/keyboard reorder state machine (one active drag at a time)
#[derive(Debug, Default)]
pub struct ReorderProtocol {
    dragging: Option<DragSource>,
    focus: Option<KeyboardFocus>,
}

impl ReorderProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        match &self.dragging {
            Some(source) => DragState::Dragging(source.clone()),
            None => DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Begin a drag
    pub fn start(&mut self, source: DragSource) -> Result<(), ReorderError> {
        if self.dragging.is_some() {
            return Err(ReorderError::AlreadyDragging);
        }
        debug!(?source, "Drag started");
        self.dragging = Some(source);
        Ok(())
    }

    /// End the drag on a target and resolve the command it implies
    ///
    /// Always returns to Idle. `None` means the drop changes nothing.
    pub fn resolve_drop(
        &mut self,
        target: &DropTarget,
        doc: &Document,
    ) -> Result<Option<Mutation>, ReorderError> {
        let source = self.dragging.take().ok_or(ReorderError::NotDragging)?;
        self.focus = None;

        let mutation = match (source, target) {
            // Library templates land at the end of the canvas wherever they drop
            (DragSource::Template(block_type), _) => Some(Mutation::AddBlock {
                block_type,
                parent: None,
            }),

            (DragSource::Existing(_), DropTarget::Canvas) => None,

            (DragSource::Existing(source_id), DropTarget::Block(target_id)) => {
                match (doc.locate(&source_id), doc.locate(target_id)) {
                    (Some(from), Some(to)) if from.same_list(&to) && from.index != to.index => {
                        Some(Mutation::Reorder {
                            parent: from.parent,
                            from: from.index,
                            to: to.index,
                        })
                    }
                    _ => None,
                }
            }
        };

        debug!(?target, ?mutation, "Drop resolved");
        Ok(mutation)
    }

    /// End the drag on a target and apply the resulting command to `doc`
    pub fn drop_on(&mut self, target: DropTarget, doc: &mut Document) -> Result<DropOutcome, EditorError> {
        match self.resolve_drop(&target, doc)? {
            Some(mutation) => {
                let result = doc.apply(mutation.clone())?;
                Ok(Self::outcome(&mutation, &result))
            }
            None => Ok(DropOutcome::Unchanged),
        }
    }

    /// Drop outside any valid target: no command
    pub fn drop_outside(&mut self) -> Result<DropOutcome, ReorderError> {
        self.dragging.take().ok_or(ReorderError::NotDragging)?;
        self.focus = None;
        Ok(DropOutcome::Unchanged)
    }

    /// Abort the drag: no command. Cancelling while idle is harmless.
    pub fn cancel(&mut self) {
        if self.dragging.take().is_some() {
            debug!("Drag cancelled");
        }
        self.focus = None;
    }

    /// Keyboard: lift a block, focusing its own position
    pub fn pick_up(&mut self, id: &BlockId, doc: &Document) -> Result<(), ReorderError> {
        let location = doc
            .locate(id)
            .ok_or_else(|| ReorderError::NotFound(id.clone()))?;
        self.start(DragSource::Existing(id.clone()))?;
        self.focus = Some(KeyboardFocus {
            parent: location.parent,
            index: location.index,
        });
        Ok(())
    }

    /// Keyboard: move the focus one sibling, clamped to the list; returns the focused index
    pub fn step(&mut self, direction: Direction, doc: &Document) -> Result<usize, ReorderError> {
        let focus = self.focus.as_mut().ok_or(ReorderError::NotPickedUp)?;
        let len = doc
            .tree()
            .list(focus.parent.as_ref())
            .map(|l| l.len())
            .unwrap_or(0);

        focus.index = match direction {
            Direction::Up => focus.index.saturating_sub(1),
            Direction::Down => (focus.index + 1).min(len.saturating_sub(1)),
        };
        Ok(focus.index)
    }

    /// Keyboard: drop on the focused sibling
    pub fn commit_target(&self, doc: &Document) -> Result<DropTarget, ReorderError> {
        let focus = self.focus.as_ref().ok_or(ReorderError::NotPickedUp)?;
        let target = doc
            .tree()
            .list(focus.parent.as_ref())
            .and_then(|list| list.get(focus.index))
            .map(|block| DropTarget::Block(block.id.clone()))
            .unwrap_or(DropTarget::Canvas);
        Ok(target)
    }

    /// Keyboard: drop on the focused sibling and apply the command
    pub fn commit(&mut self, doc: &mut Document) -> Result<DropOutcome, EditorError> {
        let target = self.commit_target(doc)?;
        self.drop_on(target, doc)
    }

    /// Keyboard shorthand: pick up, step once, commit
    pub fn keyboard_move(
        &mut self,
        id: &BlockId,
        direction: Direction,
        doc: &mut Document,
    ) -> Result<DropOutcome, EditorError> {
        self.pick_up(id, doc)?;
        if let Err(e) = self.step(direction, doc) {
            self.cancel();
            return Err(e.into());
        }
        self.commit(doc)
    }

    pub(crate) fn outcome(mutation: &Mutation, result: &MutationResult) -> DropOutcome {
        if !result.changed {
            return DropOutcome::Unchanged;
        }
        match (mutation, &result.created) {
            (_, Some(id)) => DropOutcome::Added(id.clone()),
            (Mutation::Reorder { parent, from, to }, None) => DropOutcome::Moved {
                parent: parent.clone(),
                from: *from,
                to: *to,
            },
            _ => DropOutcome::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(types: &[BlockType]) -> (Document, Vec<BlockId>) {
        let mut doc = Document::new("reorder");
        let ids = types.iter().map(|t| doc.add(*t).unwrap()).collect();
        (doc, ids)
    }

    #[test]
    fn test_only_one_drag_at_a_time() {
        let mut protocol = ReorderProtocol::new();
        protocol.start(DragSource::Template(BlockType::Text)).unwrap();

        assert_eq!(
            protocol.start(DragSource::Template(BlockType::Chart)),
            Err(ReorderError::AlreadyDragging)
        );
    }

    #[test]
    fn test_template_drop_adds_at_end() {
        let (mut doc, ids) = doc_with(&[BlockType::Text, BlockType::Metric]);
        let mut protocol = ReorderProtocol::new();

        protocol.start(DragSource::Template(BlockType::Chart)).unwrap();
        let outcome = protocol
            .drop_on(DropTarget::Block(ids[0].clone()), &mut doc)
            .unwrap();

        let DropOutcome::Added(new_id) = outcome else {
            panic!("expected add, got {:?}", outcome);
        };
        assert_eq!(doc.blocks()[2].id, new_id);
        assert_eq!(protocol.state(), DragState::Idle);
    }

    #[test]
    fn test_cancel_and_outside_drop_do_nothing() {
        let (mut doc, ids) = doc_with(&[BlockType::Text, BlockType::Metric]);
        let before = doc.snapshot();
        let mut protocol = ReorderProtocol::new();

        protocol.start(DragSource::Existing(ids[0].clone())).unwrap();
        protocol.cancel();
        protocol.start(DragSource::Existing(ids[0].clone())).unwrap();
        assert_eq!(protocol.drop_outside().unwrap(), DropOutcome::Unchanged);
        protocol.start(DragSource::Existing(ids[0].clone())).unwrap();
        assert_eq!(
            protocol.drop_on(DropTarget::Canvas, &mut doc).unwrap(),
            DropOutcome::Unchanged
        );

        assert_eq!(doc.snapshot(), before);
        assert_eq!(protocol.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_without_drag_fails() {
        let (mut doc, _) = doc_with(&[BlockType::Text]);
        let mut protocol = ReorderProtocol::new();

        assert!(matches!(
            protocol.drop_on(DropTarget::Canvas, &mut doc),
            Err(EditorError::Reorder(ReorderError::NotDragging))
        ));
    }

    #[test]
    fn test_step_clamps_to_list() {
        let (doc, ids) = doc_with(&[BlockType::Text, BlockType::Metric]);
        let mut protocol = ReorderProtocol::new();

        protocol.pick_up(&ids[1], &doc).unwrap();
        assert_eq!(protocol.step(Direction::Down, &doc).unwrap(), 1);
        assert_eq!(protocol.step(Direction::Up, &doc).unwrap(), 0);
        assert_eq!(protocol.step(Direction::Up, &doc).unwrap(), 0);
    }
}
