//! Page geometry
//!
//! All measurements are PDF points (1/72 inch), measured from the top-left
//! corner of the page.
//!
//! ```text
//! ┌──────────────── width ────────────────┐
//! │            margin                     │
//! │   ┌── content_width ──┐  ← content_top│
//! │   │                   │               │
//! │   │  content_height   │               │
//! │   │                   │               │
//! │   └───────────────────┘  ← content_bottom
//! │                                       │
//! └───────────────────────────────────────┘
//! ```

use crate::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_MARGIN: f64 = 40.0;
pub const DEFAULT_BLOCK_GAP: f64 = 12.0;

/// Named page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// (width, height) in points
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(ExportError::InvalidGeometry(format!("unknown page size '{}'", other))),
        }
    }
}

/// Fixed page size, margin and inter-block gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub block_gap: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
            block_gap: DEFAULT_BLOCK_GAP,
        }
    }

    pub fn from_size(size: PageSize) -> Self {
        let (width, height) = size.dimensions();
        Self::new(width, height, DEFAULT_MARGIN)
    }

    pub fn a4() -> Self {
        Self::from_size(PageSize::A4)
    }

    pub fn letter() -> Self {
        Self::from_size(PageSize::Letter)
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_block_gap(mut self, gap: f64) -> Self {
        self.block_gap = gap;
        self
    }

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    pub fn content_left(&self) -> f64 {
        self.margin
    }

    pub fn content_top(&self) -> f64 {
        self.margin
    }

    pub fn content_bottom(&self) -> f64 {
        self.height - self.margin
    }

    /// Reject geometry that leaves no room for content
    pub fn validate(&self) -> Result<()> {
        let finite = [self.width, self.height, self.margin, self.block_gap]
            .iter()
            .all(|v| v.is_finite());

        if !finite || self.margin < 0.0 || self.block_gap < 0.0 {
            return Err(ExportError::InvalidGeometry(format!("{:?}", self)));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(ExportError::InvalidGeometry(format!(
                "margin {} leaves no content area on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_content_area() {
        let geometry = PageGeometry::a4();
        assert!((geometry.content_width() - 515.28).abs() < 1e-9);
        assert!((geometry.content_height() - 761.89).abs() < 1e-9);
        assert_eq!(geometry.content_top(), 40.0);
    }

    #[test]
    fn test_page_size_parse() {
        assert_eq!("Letter".parse::<PageSize>().unwrap(), PageSize::Letter);
        assert!("tabloid".parse::<PageSize>().is_err());
    }

    #[test]
    fn test_oversized_margin_rejected() {
        let geometry = PageGeometry::letter().with_margin(400.0);
        assert!(matches!(geometry.validate(), Err(ExportError::InvalidGeometry(_))));
    }
}
