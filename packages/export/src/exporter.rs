//! # Pagination Exporter
//!
//! Walks the top-level block list once, in order, and places every block on
//! fixed-size pages.
//!
//! ```text
//! PageBreak ──────────────▶ new page, no space used
//! Text ───wrap────────────▶ native vector text
//! Image ──load──ok────────▶ native image
//!            └──fail──┐
//! Metric/Chart/Table/Group ─▶ capture region ─▶ raster image
//!                                  └──fail──▶ skip + warning
//! ```
//!
//! Each image load and each capture is awaited before the next block is
//! looked at; the page cursor only ever moves forward.

use crate::artifact::{ExportWarning, PlacedImage, PlacedText, WarningKind};
use crate::paginator::Paginator;
use crate::typography;
use crate::{ExportArtifact, ImageOrigin, PageGeometry, PlacedItem, Result};
use reportkit_blocks::{Block, BlockKind, TextBlock};
use reportkit_render::{capture_block, parse_hex_color, Bitmap, ImageLoader, RenderDispatch};
use tracing::{debug, info, instrument, warn};

/// Export result: the artifact plus everything that was degraded or dropped
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub artifact: ExportArtifact,
    pub warnings: Vec<ExportWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct PaginationExporter {
    geometry: PageGeometry,
}

impl PaginationExporter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Paginate `blocks` (a snapshot of the document's root list)
    ///
    /// Only invalid geometry fails the export; per-block problems become
    /// warnings.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub async fn export(
        &self,
        blocks: &[Block],
        dispatch: &dyn RenderDispatch,
        loader: &dyn ImageLoader,
    ) -> Result<ExportOutcome> {
        self.geometry.validate()?;
        info!(
            width = self.geometry.width,
            height = self.geometry.height,
            "Export started"
        );

        let mut paginator = Paginator::new(self.geometry);
        let mut warnings = Vec::new();

        for block in blocks {
            match &block.kind {
                BlockKind::PageBreak(_) => {
                    paginator.page_break();
                    debug!(block_id = %block.id, page = paginator.page_index(), "Page break");
                }

                BlockKind::Text(text) => self.place_text(block, text, &mut paginator, &mut warnings),

                BlockKind::Image(image) => {
                    self.place_image(block, &image.src, dispatch, loader, &mut paginator, &mut warnings)
                        .await;
                }

                BlockKind::Metric(_) | BlockKind::Chart(_) | BlockKind::Table(_) | BlockKind::Group(_) => {
                    self.place_capture(block, dispatch, &mut paginator, &mut warnings).await;
                }
            }
        }

        let artifact = ExportArtifact {
            geometry: self.geometry,
            pages: paginator.finish(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        };

        info!(
            pages = artifact.page_count(),
            warnings = warnings.len(),
            "Export finished"
        );

        Ok(ExportOutcome { artifact, warnings })
    }

    fn place_text(
        &self,
        block: &Block,
        text: &TextBlock,
        paginator: &mut Paginator,
        warnings: &mut Vec<ExportWarning>,
    ) {
        let geometry = &self.geometry;
        let size = typography::font_size(text.size.as_deref());
        let line_height = typography::line_height(size);
        let mut lines = typography::wrap(&text.content, size, geometry.content_width());

        let max_lines = ((geometry.content_height() / line_height).floor() as usize).max(1);
        if lines.len() > max_lines {
            let dropped = lines.len() - max_lines;
            lines.truncate(max_lines);
            warn!(block_id = %block.id, dropped, "Text taller than a page, truncated");
            warnings.push(ExportWarning {
                block_id: block.id.clone(),
                block_type: block.block_type(),
                kind: WarningKind::Truncated,
                message: format!("{} line(s) did not fit on one page", dropped),
            });
        }

        let height = lines.len() as f64 * line_height;
        let y = paginator.reserve(height);

        paginator.place(PlacedItem::Text(PlacedText {
            block_id: block.id.clone(),
            x: geometry.content_left(),
            y,
            width: geometry.content_width(),
            size,
            weight: typography::font_weight(text.weight.as_deref()),
            color: block
                .style
                .text_color
                .as_deref()
                .and_then(parse_hex_color)
                .unwrap_or([0, 0, 0]),
            alignment: typography::alignment(block.style.alignment.as_deref()),
            lines,
        }));
    }

    /// Scale to content width, or down to content height when taller than a page
    fn place_bitmap(&self, block: &Block, bitmap: Bitmap, origin: ImageOrigin, paginator: &mut Paginator) {
        let geometry = &self.geometry;
        let aspect = bitmap.aspect_ratio();

        let mut width = geometry.content_width();
        let mut height = width * aspect;
        if height > geometry.content_height() {
            height = geometry.content_height();
            width = height / aspect;
        }

        let y = paginator.reserve(height);
        let x = geometry.content_left() + (geometry.content_width() - width) / 2.0;

        debug!(
            block_id = %block.id,
            page = paginator.page_index(),
            y,
            height,
            ?origin,
            "Placed image"
        );

        paginator.place(PlacedItem::Image(PlacedImage {
            block_id: block.id.clone(),
            block_type: block.block_type(),
            x,
            y,
            width,
            height,
            origin,
            bitmap,
        }));
    }

    /// Native image when the source loads, otherwise a capture of the
    /// rendered region; one warning at most either way
    async fn place_image(
        &self,
        block: &Block,
        src: &str,
        dispatch: &dyn RenderDispatch,
        loader: &dyn ImageLoader,
        paginator: &mut Paginator,
        warnings: &mut Vec<ExportWarning>,
    ) {
        let load_failure = match loader.load(src).await {
            Ok(bitmap) if !bitmap.is_empty() => {
                self.place_bitmap(block, bitmap, ImageOrigin::Native, paginator);
                return;
            }
            Ok(_) => "image source is empty".to_string(),
            Err(e) => e.to_string(),
        };

        match self.capture(block, dispatch).await {
            Ok(bitmap) => {
                warn!(block_id = %block.id, reason = %load_failure, "Image load failed, captured rendered region");
                warnings.push(ExportWarning {
                    block_id: block.id.clone(),
                    block_type: block.block_type(),
                    kind: WarningKind::ImageFallback,
                    message: format!("image load failed: {}", load_failure),
                });
                self.place_bitmap(block, bitmap, ImageOrigin::Raster, paginator);
            }
            Err(capture_failure) => self.skip(
                block,
                &format!(
                    "image load failed: {}; capture failed: {}",
                    load_failure, capture_failure
                ),
                warnings,
            ),
        }
    }

    async fn place_capture(
        &self,
        block: &Block,
        dispatch: &dyn RenderDispatch,
        paginator: &mut Paginator,
        warnings: &mut Vec<ExportWarning>,
    ) {
        match self.capture(block, dispatch).await {
            Ok(bitmap) => self.place_bitmap(block, bitmap, ImageOrigin::Raster, paginator),
            Err(reason) => self.skip(block, &reason, warnings),
        }
    }

    async fn capture(&self, block: &Block, dispatch: &dyn RenderDispatch) -> std::result::Result<Bitmap, String> {
        match capture_block(dispatch, block).await {
            Ok(bitmap) if !bitmap.is_empty() => Ok(bitmap),
            Ok(_) => Err("captured region is empty".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn skip(&self, block: &Block, reason: &str, warnings: &mut Vec<ExportWarning>) {
        warn!(block_id = %block.id, block_type = %block.block_type(), reason, "Skipping block");
        warnings.push(ExportWarning {
            block_id: block.id.clone(),
            block_type: block.block_type(),
            kind: WarningKind::Skipped,
            message: reason.to_string(),
        });
    }
}
