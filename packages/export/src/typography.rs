//! Text measurement for native vector text
//!
//! Size tokens (pt):
//!
//! | token | xs | sm | base | lg | xl | 2xl | 3xl |
//! |-------|----|----|------|----|----|-----|-----|
//! | size  | 9  | 10 | 12   | 14 | 18 | 22  | 28  |
//!
//! Unknown or missing tokens use `base`. Measurement assumes an average
//! glyph width of half the point size.

use serde::{Deserialize, Serialize};

pub const BASE_SIZE: f64 = 12.0;
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
pub const GLYPH_WIDTH_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

pub fn font_size(token: Option<&str>) -> f64 {
    match token.map(str::trim) {
        Some("xs") => 9.0,
        Some("sm") => 10.0,
        Some("base") => 12.0,
        Some("lg") => 14.0,
        Some("xl") => 18.0,
        Some("2xl") => 22.0,
        Some("3xl") => 28.0,
        _ => BASE_SIZE,
    }
}

pub fn font_weight(token: Option<&str>) -> FontWeight {
    match token.map(str::trim) {
        Some("semibold") | Some("bold") | Some("extrabold") => FontWeight::Bold,
        _ => FontWeight::Regular,
    }
}

pub fn alignment(token: Option<&str>) -> Alignment {
    match token.map(str::trim) {
        Some("center") => Alignment::Center,
        Some("right") => Alignment::Right,
        _ => Alignment::Left,
    }
}

pub fn line_height(size: f64) -> f64 {
    size * LINE_HEIGHT_FACTOR
}

/// Estimated rendered width of a line
pub fn text_width(line: &str, size: f64) -> f64 {
    line.chars().count() as f64 * size * GLYPH_WIDTH_FACTOR
}

/// Horizontal offset of a line inside a box of `width`
pub fn line_offset(line: &str, size: f64, width: f64, align: Alignment) -> f64 {
    let slack = (width - text_width(line, size)).max(0.0);
    match align {
        Alignment::Left => 0.0,
        Alignment::Center => slack / 2.0,
        Alignment::Right => slack,
    }
}

/// Greedy word wrap
///
/// Explicit newlines always start a new line; a word longer than a whole
/// line is broken at the line width.
pub fn wrap(text: &str, size: f64, max_width: f64) -> Vec<String> {
    let max_chars = ((max_width / (size * GLYPH_WIDTH_FACTOR)).floor() as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            if chars.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                }
                while chars.len() > max_chars {
                    let rest = chars.split_off(max_chars);
                    lines.push(chars.into_iter().collect());
                    chars = rest;
                }
                current = chars.iter().collect();
                current_len = chars.len();
                continue;
            }

            if current_len == 0 {
                current.push_str(word);
                current_len = chars.len();
            } else if current_len + 1 + chars.len() <= max_chars {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + chars.len();
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = chars.len();
            }
        }

        lines.push(current);
    }

    lines
}
