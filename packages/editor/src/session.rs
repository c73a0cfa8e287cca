//! # Report Session
//!
//! One operator's editing session over a report document: the document,
//! its undo history, the reorder protocol and the export gate.
//!
//! Export is the only long-running operation. While an [`ExportTicket`] is
//! alive every editing command, drag and undo/redo is refused with
//! [`EditorError::ExportInProgress`], and so is a second export.

use crate::reorder::{Direction, DragSource, DropOutcome, DropTarget, ReorderProtocol};
use crate::{Document, EditorError, Mutation, MutationResult, UndoStack};
use reportkit_blocks::{Block, BlockId, BlockType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Single editing session
pub struct ReportSession {
    /// Unique session identifier
    pub id: String,

    document: Document,
    history: UndoStack,
    reorder: ReorderProtocol,
    exporting: Arc<AtomicBool>,
}

/// Snapshot handed to the exporter; editing stays locked until it drops
#[derive(Debug)]
pub struct ExportTicket {
    /// Deep copy of the root list at export time
    pub blocks: Vec<Block>,

    /// Document version the snapshot was taken at
    pub version: u64,

    _guard: ExportGuard,
}

#[derive(Debug)]
struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
        debug!("Export gate released");
    }
}

impl ReportSession {
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
            history: UndoStack::new(),
            reorder: ReorderProtocol::new(),
            exporting: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn reorder_protocol(&self) -> &ReorderProtocol {
        &self.reorder
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Lock editing and take a snapshot for export
    pub fn begin_export(&mut self) -> Result<ExportTicket, EditorError> {
        if self
            .exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EditorError::ExportInProgress);
        }

        // An in-flight drag would otherwise drop into a frozen list
        self.reorder.cancel();

        info!(
            session = %self.id,
            version = self.document.version,
            blocks = self.document.len(),
            "Export started; editing locked"
        );

        Ok(ExportTicket {
            blocks: self.document.snapshot(),
            version: self.document.version,
            _guard: ExportGuard(Arc::clone(&self.exporting)),
        })
    }

    fn ensure_editable(&self) -> Result<(), EditorError> {
        if self.is_exporting() {
            return Err(EditorError::ExportInProgress);
        }
        Ok(())
    }

    /// Apply a mutation with undo support
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.ensure_editable()?;
        self.history.apply(mutation, &mut self.document)
    }

    pub fn add(&mut self, block_type: BlockType) -> Result<BlockId, EditorError> {
        self.apply_created(Mutation::AddBlock {
            block_type,
            parent: None,
        })
    }

    pub fn add_to_group(&mut self, group_id: &BlockId, block_type: BlockType) -> Result<BlockId, EditorError> {
        self.apply_created(Mutation::AddBlock {
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

    pub fn duplicate(&mut self, id: &BlockId) -> Result<BlockId, EditorError> {
        self.apply_created(Mutation::DuplicateBlock {
            block_id: id.clone(),
        })
    }

    pub fn delete(&mut self, id: &BlockId) -> Result<(), EditorError> {
        self.apply(Mutation::RemoveBlock {
            block_id: id.clone(),
        })?;
        Ok(())
    }

    pub fn move_up(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::MoveUp {
                block_id: id.clone(),
            })?
            .changed)
    }

    pub fn move_down(&mut self, id: &BlockId) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::MoveDown {
                block_id: id.clone(),
            })?
            .changed)
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, EditorError> {
        Ok(self
            .apply(Mutation::Reorder {
                parent: None,
                from,
                to,
            })?
            .changed)
    }

    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        self.history.undo(&mut self.document)
    }

    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_editable()?;
        self.history.redo(&mut self.document)
    }

    pub fn start_drag(&mut self, source: DragSource) -> Result<(), EditorError> {
        self.ensure_editable()?;
        Ok(self.reorder.start(source)?)
    }

    /// Finish the active drag on a target, recording the command for undo
    pub fn drop_on(&mut self, target: DropTarget) -> Result<DropOutcome, EditorError> {
        self.ensure_editable()?;
        match self.reorder.resolve_drop(&target, &self.document)? {
            Some(mutation) => {
                let result = self.history.apply(mutation.clone(), &mut self.document)?;
                Ok(ReorderProtocol::outcome(&mutation, &result))
            }
            None => Ok(DropOutcome::Unchanged),
        }
    }

    pub fn drop_outside(&mut self) -> Result<DropOutcome, EditorError> {
        Ok(self.reorder.drop_outside()?)
    }

    pub fn cancel_drag(&mut self) {
        self.reorder.cancel();
    }

    pub fn pick_up(&mut self, id: &BlockId) -> Result<(), EditorError> {
        self.ensure_editable()?;
        Ok(self.reorder.pick_up(id, &self.document)?)
    }

    pub fn step(&mut self, direction: Direction) -> Result<usize, EditorError> {
        Ok(self.reorder.step(direction, &self.document)?)
    }

    /// Keyboard drop: same path as a pointer drop on the focused sibling
    pub fn commit(&mut self) -> Result<DropOutcome, EditorError> {
        let target = self.reorder.commit_target(&self.document)?;
        self.drop_on(target)
    }

    pub fn keyboard_move(&mut self, id: &BlockId, direction: Direction) -> Result<DropOutcome, EditorError> {
        self.pick_up(id)?;
        if let Err(e) = self.step(direction) {
            self.cancel_drag();
            return Err(e);
        }
        self.commit()
    }

    fn apply_created(&mut self, mutation: Mutation) -> Result<BlockId, EditorError> {
        let result = self.apply(mutation)?;
        // AddBlock and DuplicateBlock always report the created id
        result.created.ok_or_else(|| {
            EditorError::Mutation(crate::MutationError::NotFound(BlockId::from("<created>")))
        })
    }
}
