//! # Reportkit Blocks
//!
//! The closed block model for report composition.
//!
//! A report is an ordered list of [`Block`]s. Each block is one variant of
//! [`BlockKind`]: metrics, charts, text, images, tables, groups and page
//! breaks. This crate only describes blocks. It has no document state:
//!
//! - [`construct_default`] seeds a new block of a given type
//! - [`validate`] checks the required fields of a block and its subtree
//! - [`apply_patch`] merges a JSON patch into a copy of a block
//! - [`IdGenerator`] mints document-scoped block ids
//!
//! Groups nest exactly one level: a group's children may not be groups or
//! page breaks.

mod block;
mod defaults;
mod id_generator;
mod patch;
mod validate;

pub use block::*;
pub use defaults::{construct_default, DEFAULT_CHART_COLORS, DEFAULT_IMAGE_SRC, DEFAULT_TEXT};
pub use id_generator::{get_document_seed, IdGenerator};
pub use patch::{apply_patch, merge};
pub use validate::{ensure_unique_ids, validate, ValidationError};
