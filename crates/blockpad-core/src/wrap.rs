//! Greedy soft wrap of a block's text into visual lines.
//!
//! A [`LineLayout`] maps every cursor index of a block (`0..=len`) to the
//! visual line and x-offset the caret would be drawn at, and answers the two
//! inverse queries the editor needs: the index nearest an x-offset on a given
//! line (vertical navigation) and the index nearest a pointer position
//! (hit-testing).

use blockpad_config::EditorConfig;

use crate::buffer::TextBuffer;
use crate::metrics::TextMetrics;

/// Gap added after every visible character. Forced breaks get none.
const CHAR_SPACING: f32 = 1.0;

/// Inputs of the wrap algorithm besides the text itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapSettings {
    pub max_width: f32,
    pub font_size: f32,
}

impl From<&EditorConfig> for WrapSettings {
    fn from(config: &EditorConfig) -> Self {
        Self {
            max_width: config.wrap_width,
            font_size: config.font_size,
        }
    }
}

/// Visual position of the caret in front of a character.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualPos {
    /// 0-indexed visual line within the block.
    pub line: usize,
    /// Offset from the left edge of the text column.
    pub x: f32,
}

/// Precomputed wrap geometry of one block.
#[derive(Debug, Clone)]
pub struct LineLayout {
    /// `positions[i]` is the caret position before char `i`; one extra entry for the end.
    positions: Vec<VisualPos>,
}

impl LineLayout {
    /// Runs the greedy wrap over `text`.
    ///
    /// A character whose width would push the line past `max_width` (strictly)
    /// starts a new visual line; a newline is a forced break of zero width.
    pub fn compute<M>(text: &TextBuffer, settings: &WrapSettings, metrics: &M) -> Self
    where
        M: TextMetrics + ?Sized,
    {
        let mut positions = Vec::with_capacity(text.len_chars() + 1);
        let mut pos = VisualPos::default();

        for ch in text.chars() {
            positions.push(pos);
            if ch == '\n' {
                pos.line += 1;
                pos.x = 0.0;
                continue;
            }
            let w = metrics.width(ch, settings.font_size);
            if pos.x + w > settings.max_width {
                pos.line += 1;
                pos.x = 0.0;
            }
            pos.x += w + CHAR_SPACING;
        }
        positions.push(pos);

        Self { positions }
    }

    /// Number of characters in the wrapped text.
    pub fn text_len(&self) -> usize {
        self.positions.len() - 1
    }

    /// Number of visual lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.last_line() + 1
    }

    /// Index of the last visual line.
    pub fn last_line(&self) -> usize {
        self.positions.last().map_or(0, |p| p.line)
    }

    /// Caret position before char `index`, clamped to the end of the text.
    pub fn position(&self, index: usize) -> VisualPos {
        self.positions[index.min(self.text_len())]
    }

    /// All caret positions, `text_len() + 1` entries.
    pub fn positions(&self) -> &[VisualPos] {
        &self.positions
    }

    /// Returns the index on `line` whose x-offset is closest to `desired_x`.
    ///
    /// Ties resolve to the leftmost index. A line past the last one resolves to
    /// the end of the text.
    pub fn locate(&self, line: usize, desired_x: f32) -> usize {
        let mut best = None;
        let mut best_dist = f32::INFINITY;

        for (i, pos) in self.positions.iter().enumerate() {
            if pos.line > line {
                break;
            }
            if pos.line == line {
                let dist = (desired_x - pos.x).abs();
                if dist < best_dist {
                    best_dist = dist;
                    best = Some(i);
                }
            }
        }

        best.unwrap_or_else(|| self.text_len())
    }

    /// Returns the index nearest a pointer at block-local coordinates.
    ///
    /// `local_y` selects the row (anything below the last row snaps to the end
    /// of the text). A negative `local_x` is the left margin and snaps to the
    /// start of the row.
    pub fn hit_test(&self, local_x: f32, local_y: f32, line_height: f32) -> usize {
        let end = self.text_len();
        let in_margin = local_x < 0.0;
        let mut best = 0;
        let mut best_dist = f32::INFINITY;

        for (i, pos) in self.positions.iter().enumerate() {
            let top = pos.line as f32 * line_height;
            let bottom = top + line_height;
            let on_row = (local_y >= top && local_y < bottom) || (i == end && local_y >= bottom);
            if !on_row {
                continue;
            }
            if in_margin && pos.x == 0.0 {
                return i;
            }
            let dist = (local_x - pos.x).abs();
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }

        best
    }
}
