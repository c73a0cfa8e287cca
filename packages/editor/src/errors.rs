//! Error types for the editor

use crate::mutations::MutationError;
use crate::reorder::ReorderError;
use reportkit_blocks::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("An export is in progress; editing is disabled until it finishes")]
    ExportInProgress,
}

impl EditorError {
    /// True when the command failed only because its target id is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditorError::Mutation(MutationError::NotFound(_)))
    }
}
