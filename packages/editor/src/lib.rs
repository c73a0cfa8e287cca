//! # Reportkit Editor
//!
//! Document store and editing engine for report composition.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ blocks: block model, defaults, validation   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + mutations                │
//! │  - add / update / duplicate / delete / move │
//! │  - undo/redo history                        │
//! │  - drag & keyboard reorder protocol         │
//! │  - export gate (editing locked on export)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ export: snapshot → paginated artifact       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Document owns blocks**: every change goes through a [`Mutation`]
//! 2. **Ids are unique tree-wide**, group children included
//! 3. **Failed commands change nothing**
//! 4. **Groups nest one level**
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reportkit_editor::{Document, ReportSession};
//! use reportkit_blocks::BlockType;
//!
//! let mut session = ReportSession::new("operator", Document::new("quarterly"));
//! let title = session.add(BlockType::Text)?;
//! session.update(&title, serde_json::json!({"content": "Q3 results", "size": "2xl"}))?;
//! session.add(BlockType::Metric)?;
//!
//! let ticket = session.begin_export()?;   // editing locked until `ticket` drops
//! ```

mod document;
mod errors;
mod mutations;
pub mod reorder;
mod session;
mod tree;
mod undo_stack;

pub use document::{Document, MutationResult};
pub use errors::EditorError;
pub use mutations::{Applied, Mutation, MutationError};
pub use reorder::{Direction, DragSource, DragState, DropOutcome, DropTarget, ReorderError, ReorderProtocol};
pub use session::{ExportTicket, ReportSession};
pub use tree::{BlockTree, Location};
pub use undo_stack::{MutationBatch, UndoStack};
