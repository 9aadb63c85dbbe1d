//! Anchor-based selection spanning one or more blocks.
//!
//! The selection is never accumulated: every update clears all blocks and
//! recomputes the per-block ranges from the anchor (where the gesture began)
//! and the focus (the live cursor).

use crate::document::{BlockRef, Document};
use crate::error::{EditorError, Result};

/// Selected char range of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub len: usize,
}

impl Selection {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Exclusive end of the range.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Restricts the range to a text of `text_len` chars.
    pub(crate) fn clamped(self, text_len: usize) -> Self {
        let start = self.start.min(text_len);
        Self {
            start,
            len: self.len.min(text_len - start),
        }
    }
}

/// Fixed endpoint of an in-progress selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub block: BlockRef,
    pub index: usize,
}

/// Recomputes every block's selection for the range between `anchor` and
/// (`focus`, `focus_index`).
///
/// # Errors
///
/// Returns [`EditorError::InvalidReference`] if either endpoint is not a live
/// block; no selection is touched in that case.
pub fn update_range(
    doc: &mut Document,
    anchor: Anchor,
    focus: BlockRef,
    focus_index: usize,
) -> Result<()> {
    for block in [anchor.block, focus] {
        if !doc.contains(block) {
            tracing::warn!(block = %block, "selection endpoint is not in the document");
            return Err(EditorError::InvalidReference(block));
        }
    }

    doc.clear_selections();

    let ((start_block, start_index), (end_block, end_index)) = if anchor.block == focus {
        let lo = anchor.index.min(focus_index);
        let hi = anchor.index.max(focus_index);
        ((focus, lo), (focus, hi))
    } else {
        let focus_first = doc
            .iter()
            .map(|(r, _)| r)
            .find(|r| *r == anchor.block || *r == focus)
            == Some(focus);
        if focus_first {
            ((focus, focus_index), (anchor.block, anchor.index))
        } else {
            ((anchor.block, anchor.index), (focus, focus_index))
        }
    };

    let mut cursor = Some(start_block);
    while let Some(r) = cursor {
        let block = doc.live_mut(r)?;
        let len = block.len_chars();
        let range = if r == start_block && r == end_block {
            Selection::new(start_index, end_index - start_index)
        } else if r == start_block {
            let start = start_index.min(len);
            Selection::new(start, len - start)
        } else if r == end_block {
            Selection::new(0, end_index)
        } else {
            Selection::new(0, len)
        };
        block.set_selection(Some(range));

        if r == end_block {
            break;
        }
        cursor = doc.next(r);
    }

    Ok(())
}

/// First and last block of the current selection, if it covers anything.
///
/// A single block whose range is empty is a cursor, not a selection. Two or
/// more blocks always count, even with empty ranges: they select the break
/// between the blocks.
pub fn selected_span(doc: &Document) -> Option<(BlockRef, BlockRef)> {
    let mut first = None;
    let mut last = None;
    let mut non_empty = false;

    for (r, block) in doc.iter() {
        if let Some(selection) = block.selection() {
            if first.is_none() {
                first = Some(r);
            }
            last = Some(r);
            non_empty |= !selection.is_empty();
        }
    }

    let (first, last) = (first?, last?);
    if first == last && !non_empty {
        return None;
    }
    Some((first, last))
}

/// Returns true if some text (or a block break) is selected.
pub fn has_selection(doc: &Document) -> bool {
    selected_span(doc).is_some()
}

/// Returns the selected text, blocks joined with `\n`.
pub fn selected_text(doc: &Document) -> Option<String> {
    selected_span(doc)?;

    let parts: Vec<String> = doc
        .iter()
        .filter_map(|(_, block)| {
            let selection = block.selection()?;
            block
                .text()
                .slice(selection.start, selection.end())
                .ok()
                .map(|s| s.to_string())
        })
        .collect();
    Some(parts.join("\n"))
}
