//! Page cursor
//!
//! Tracks `(page_index, cursor_y)` while blocks are placed top to bottom.
//! A block is never split: if it does not fit below the cursor it moves
//! wholesale to a fresh page. An empty page always accepts the next block,
//! so nothing is ever pushed off a page that has nothing on it.

use crate::{Page, PageGeometry, PlacedItem};

#[derive(Debug)]
pub struct Paginator {
    geometry: PageGeometry,
    pages: Vec<Page>,
    cursor_y: f64,
}

impl Paginator {
    /// Start with one empty page
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            cursor_y: geometry.content_top(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn cursor_y(&self) -> f64 {
        self.cursor_y
    }

    /// Space left between the cursor and the content bottom
    pub fn remaining_height(&self) -> f64 {
        (self.geometry.content_bottom() - self.cursor_y).max(0.0)
    }

    pub fn is_page_empty(&self) -> bool {
        self.pages.last().map_or(true, |page| page.items.is_empty())
    }

    /// Would a block of `height` need a new page first
    pub fn needs_break(&self, height: f64) -> bool {
        !self.is_page_empty() && self.cursor_y + height > self.geometry.content_bottom()
    }

    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.geometry.content_top();
    }

    /// Close the current page unconditionally
    pub fn page_break(&mut self) {
        self.new_page();
    }

    /// Make room for a block of `height`; returns its top edge
    pub fn reserve(&mut self, height: f64) -> f64 {
        if self.needs_break(height) {
            self.new_page();
        }
        self.cursor_y
    }

    /// Add a reserved item and advance past it plus the block gap
    pub fn place(&mut self, item: PlacedItem) {
        self.cursor_y += item.height() + self.geometry.block_gap;
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageOrigin, PlacedImage};
    use reportkit_blocks::{BlockId, BlockType};
    use reportkit_render::Bitmap;

    fn image(id: &str, y: f64, height: f64) -> PlacedItem {
        PlacedItem::Image(PlacedImage {
            block_id: BlockId::from(id),
            block_type: BlockType::Chart,
            x: 0.0,
            y,
            width: 100.0,
            height,
            origin: ImageOrigin::Raster,
            bitmap: Bitmap::solid(1, 1, [0, 0, 0, 255]),
        })
    }

    /// 700pt of content, no margin, no gap
    fn geometry() -> PageGeometry {
        PageGeometry::new(500.0, 700.0, 0.0).with_block_gap(0.0)
    }

    #[test]
    fn test_block_that_does_not_fit_moves_wholesale() {
        let mut paginator = Paginator::new(geometry());
        let y = paginator.reserve(650.0);
        paginator.place(image("a", y, 650.0));
        assert_eq!(paginator.cursor_y(), 650.0);

        let y = paginator.reserve(100.0);

        assert_eq!(paginator.page_index(), 1);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        let mut paginator = Paginator::new(geometry());
        let y = paginator.reserve(600.0);
        paginator.place(image("a", y, 600.0));

        paginator.reserve(100.0);
        assert_eq!(paginator.page_index(), 0);
    }

    #[test]
    fn test_empty_page_accepts_oversized_block() {
        let mut paginator = Paginator::new(geometry());
        let y = paginator.reserve(900.0);

        assert_eq!(paginator.page_index(), 0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_page_break_always_adds_page() {
        let mut paginator = Paginator::new(geometry());
        paginator.page_break();
        paginator.page_break();

        assert_eq!(paginator.finish().len(), 3);
    }
}
