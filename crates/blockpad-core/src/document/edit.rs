//! Block-level edits: typing, deletion, merge and split.
//!
//! Every operation leaves the chain linked and the touched blocks' cursor and
//! selection within bounds. Selection-first semantics and anchor handling are
//! layered on top by the editing session.

use crate::error::Result;
use crate::selection::selected_span;

use super::{BlockRef, Document};

impl Document {
    /// Inserts `ch` at the block's cursor and advances the cursor past it.
    pub fn insert_char(&mut self, block: BlockRef, ch: char) -> Result<()> {
        let b = self.live_mut(block)?;
        b.text.insert_char(b.cursor_index, ch)?;
        b.cursor_index += 1;
        b.clamp_to_text();
        Ok(())
    }

    /// Removes the char before the cursor; at the start of a block, merges it
    /// into its predecessor.
    ///
    /// Returns the block holding the cursor afterwards, or `None` when nothing
    /// changed (cursor at the start of the first block).
    pub fn delete_backward(&mut self, block: BlockRef) -> Result<Option<BlockRef>> {
        let b = self.live_mut(block)?;
        if b.cursor_index > 0 {
            let at = b.cursor_index;
            b.text.remove(at - 1, at)?;
            b.cursor_index = at - 1;
            b.clamp_to_text();
            return Ok(Some(block));
        }
        self.merge_into_previous(block)
    }

    /// Removes the char at the cursor. Returns false at the end of the block.
    pub fn delete_forward(&mut self, block: BlockRef) -> Result<bool> {
        let b = self.live_mut(block)?;
        let at = b.cursor_index;
        if at >= b.len_chars() {
            return Ok(false);
        }
        b.text.remove(at, at + 1)?;
        b.clamp_to_text();
        Ok(true)
    }

    /// Appends the block's text to its predecessor and removes the block.
    ///
    /// The predecessor's cursor lands at the join. Returns the predecessor, or
    /// `None` if `block` is the first block.
    pub fn merge_into_previous(&mut self, block: BlockRef) -> Result<Option<BlockRef>> {
        self.live(block)?;
        let Some(prev) = self.prev(block) else {
            return Ok(None);
        };

        let removed = self.remove_block(block)?;
        let p = self.live_mut(prev)?;
        let join = p.len_chars();
        p.text.append(removed.into_text());
        p.cursor_index = join;
        p.clamp_to_text();
        tracing::debug!(from = %block, into = %prev, "merged block into predecessor");
        Ok(Some(prev))
    }

    /// Splits the block at its cursor: `[cursor, end)` moves into a new
    /// successor block, which gets the cursor at 0.
    ///
    /// # Errors
    ///
    /// Fails with `OutOfMemory` before touching the text if no block can be allocated.
    pub fn split_block(&mut self, block: BlockRef) -> Result<BlockRef> {
        self.live(block)?;
        self.reserve_block()?;

        let b = self.live_mut(block)?;
        let tail = b.text.split_off(b.cursor_index)?;
        b.clamp_to_text();

        let successor = self.insert_buffer_after(Some(block), tail)?;
        if let Some(s) = self.block_mut(successor) {
            s.cursor_index = 0;
        }
        tracing::debug!(block = %block, successor = %successor, "split block");
        Ok(successor)
    }

    /// Deletes the selected text and returns the block that survives it.
    ///
    /// Within one block the range is cut out and the cursor moves to its start.
    /// Across blocks, the first block keeps its text up to the selection start,
    /// receives the last block's text after the selection end, and every block
    /// after it up to and including the last is removed. Returns `None` if
    /// nothing is selected.
    pub fn delete_selected_text(&mut self) -> Result<Option<BlockRef>> {
        let Some((first, last)) = selected_span(self) else {
            return Ok(None);
        };

        if first == last {
            let b = self.live_mut(first)?;
            let Some(selection) = b.selection.take() else {
                return Ok(None);
            };
            let len = b.len_chars();
            let start = selection.start.min(len);
            let end = selection.end().min(len);
            b.text.remove(start, end)?;
            b.cursor_index = start;
            return Ok(Some(first));
        }

        let tail = {
            let b = self.live_mut(last)?;
            let from = b.selection.map_or(0, |s| s.end()).min(b.len_chars());
            b.text.split_off(from)?
        };

        let mut removed = 0;
        while let Some(next) = self.next(first) {
            self.remove_block(next)?;
            removed += 1;
            if next == last {
                break;
            }
        }

        let b = self.live_mut(first)?;
        let start = b.selection.map_or(0, |s| s.start).min(b.len_chars());
        b.text.truncate(start)?;
        b.text.append(tail);
        b.cursor_index = start;
        b.selection = None;
        tracing::debug!(block = %first, removed, "deleted selection spanning blocks");
        Ok(Some(first))
    }
}
