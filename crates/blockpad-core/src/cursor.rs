//! Caret movement within and across blocks.
//!
//! Horizontal movement stays inside the focused block. Vertical movement walks
//! visual lines and crosses into the neighbouring block at the first or last
//! line, keeping the caret's x-offset as close as the target line allows.

use crate::document::{BlockRef, Document};
use crate::error::Result;
use crate::metrics::TextMetrics;
use crate::wrap::{LineLayout, WrapSettings};

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Moves the caret of `block` one step in `direction` and returns the block
/// that holds the caret afterwards.
///
/// # Errors
///
/// Fails if `block` is not a live block of `doc`.
pub fn move_cursor<M>(
    doc: &mut Document,
    block: BlockRef,
    direction: Direction,
    settings: &WrapSettings,
    metrics: &M,
) -> Result<BlockRef>
where
    M: TextMetrics + ?Sized,
{
    match direction {
        Direction::Left => move_horizontal(doc, block, false),
        Direction::Right => move_horizontal(doc, block, true),
        Direction::Up => move_vertical(doc, block, false, settings, metrics),
        Direction::Down => move_vertical(doc, block, true, settings, metrics),
    }
}

/// Steps the caret one char left or right, clamped to the block.
pub fn move_horizontal(doc: &mut Document, block: BlockRef, forward: bool) -> Result<BlockRef> {
    let b = doc.live_mut(block)?;
    let index = b.cursor_index();
    let target = if forward {
        index + 1
    } else {
        index.saturating_sub(1)
    };
    b.set_cursor_index(target);
    Ok(block)
}

/// Moves the caret one visual line up or down, entering the neighbouring
/// block when the caret is on the block's first or last line.
pub fn move_vertical<M>(
    doc: &mut Document,
    block: BlockRef,
    down: bool,
    settings: &WrapSettings,
    metrics: &M,
) -> Result<BlockRef>
where
    M: TextMetrics + ?Sized,
{
    let current = doc.live(block)?;
    let layout = LineLayout::compute(current.text(), settings, metrics);
    let pos = layout.position(current.cursor_index());

    let (target_block, target_line) = if down {
        if pos.line < layout.last_line() {
            (block, pos.line + 1)
        } else {
            match doc.next(block) {
                Some(next) => (next, 0),
                None => (block, layout.last_line()),
            }
        }
    } else if pos.line > 0 {
        (block, pos.line - 1)
    } else {
        match doc.prev(block) {
            Some(prev) => {
                let text = doc.live(prev)?.text();
                (prev, LineLayout::compute(text, settings, metrics).last_line())
            }
            None => (block, 0),
        }
    };

    let index = if target_block == block {
        layout.locate(target_line, pos.x)
    } else {
        let text = doc.live(target_block)?.text();
        LineLayout::compute(text, settings, metrics).locate(target_line, pos.x)
    };
    doc.live_mut(target_block)?.set_cursor_index(index);
    Ok(target_block)
}
