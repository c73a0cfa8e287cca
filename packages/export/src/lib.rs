//! # Reportkit Export
//!
//! Turns a snapshot of a report's block list into fixed-size pages.
//!
//! ## Core Principles
//!
//! - Blocks are placed strictly in document order, one at a time
//! - A block never straddles two pages
//! - Text stays vector text; everything else that is not an image is
//!   captured from the renderer
//! - One broken block never sinks the export: it is skipped with a warning
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reportkit_export::{encode_pdf, PageGeometry, PaginationExporter};
//! use reportkit_render::{LocalImageLoader, PlaceholderDispatch};
//!
//! let exporter = PaginationExporter::new(PageGeometry::a4());
//! let outcome = exporter
//!     .export(&ticket.blocks, &PlaceholderDispatch::new(), &LocalImageLoader::new("."))
//!     .await?;
//!
//! for warning in &outcome.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! std::fs::write("report.pdf", encode_pdf(&outcome.artifact, "Quarterly")?)?;
//! ```

mod artifact;
mod exporter;
mod geometry;
mod paginator;
mod pdf;
pub mod typography;

pub use artifact::{
    ArtifactSummary, ExportArtifact, ExportWarning, ImageOrigin, ItemKind, ItemSummary, Page,
    PlacedImage, PlacedItem, PlacedText, WarningKind,
};
pub use exporter::{ExportOutcome, PaginationExporter};
pub use geometry::{PageGeometry, PageSize, DEFAULT_BLOCK_GAP, DEFAULT_MARGIN};
pub use paginator::Paginator;
pub use pdf::encode_pdf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
