//! Document model: an ordered chain of text blocks.
//!
//! Blocks live in an arena of slots addressed by [`BlockRef`] handles. Every
//! block records the slot of its predecessor and successor, so splicing a
//! block in or out is O(1) and freed slots are reused. Block-level editing
//! (typing, deletion, merge, split) lives in the `edit` submodule.

mod edit;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::TextBuffer;
use crate::error::{EditorError, Result};
use crate::selection::Selection;

/// Unique, immutable identifier of a block within its document.
pub type BlockId = u64;

/// Source of process-unique document ids.
static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to a block of a [`Document`].
///
/// A handle stays valid until its block is removed. Slots are reused, so the
/// handle also carries the block id to detect stale references, and the id of
/// its document so it is never accepted by another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef {
    doc: u64,
    slot: usize,
    id: BlockId,
}

impl BlockRef {
    /// The id of the referenced block.
    pub fn id(&self) -> BlockId {
        self.id
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// One paragraph of text with its own cursor and selection.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    text: TextBuffer,
    cursor_index: usize,
    selection: Option<Selection>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Block {
    fn new(id: BlockId, text: TextBuffer) -> Self {
        let cursor_index = text.len_chars();
        Self {
            id,
            text,
            cursor_index,
            selection: None,
            prev: None,
            next: None,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    /// Consumes the block, returning its text.
    pub fn into_text(self) -> TextBuffer {
        self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    /// Char offset of the cursor, `0..=len_chars()`.
    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Moves the cursor, clamped to the end of the text.
    pub fn set_cursor_index(&mut self, index: usize) {
        self.cursor_index = index.min(self.len_chars());
    }

    pub(crate) fn set_selection(&mut self, selection: Option<Selection>) {
        let len = self.len_chars();
        self.selection = selection.map(|s| s.clamped(len));
    }

    /// Re-establishes cursor and selection bounds after the text changed.
    fn clamp_to_text(&mut self) {
        self.set_cursor_index(self.cursor_index);
        self.set_selection(self.selection);
    }

    fn is_consistent(&self) -> bool {
        let len = self.len_chars();
        self.cursor_index <= len && self.selection.is_none_or(|s| s.end() <= len)
    }
}

/// The ordered blocks of one editable text.
#[derive(Debug)]
pub struct Document {
    id: u64,
    slots: Vec<Option<Block>>,
    free: Vec<usize>,
    first: Option<usize>,
    last: Option<usize>,
    id_counter: BlockId,
    len: usize,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            first: None,
            last: None,
            id_counter: 0,
            len: 0,
        }
    }

    /// Number of live blocks.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<BlockRef> {
        self.first.and_then(|slot| self.handle(slot))
    }

    pub fn last(&self) -> Option<BlockRef> {
        self.last.and_then(|slot| self.handle(slot))
    }

    /// The block following `block`, if any.
    pub fn next(&self, block: BlockRef) -> Option<BlockRef> {
        self.block(block)?.next.and_then(|slot| self.handle(slot))
    }

    /// The block preceding `block`, if any.
    pub fn prev(&self, block: BlockRef) -> Option<BlockRef> {
        self.block(block)?.prev.and_then(|slot| self.handle(slot))
    }

    /// Returns true if `block` refers to a live block of this document.
    pub fn contains(&self, block: BlockRef) -> bool {
        self.block(block).is_some()
    }

    pub fn block(&self, block: BlockRef) -> Option<&Block> {
        if block.doc != self.id {
            return None;
        }
        self.node(block.slot).filter(|b| b.id == block.id)
    }

    pub fn block_mut(&mut self, block: BlockRef) -> Option<&mut Block> {
        if block.doc != self.id {
            return None;
        }
        self.node_mut(block.slot).filter(|b| b.id == block.id)
    }

    /// Iterates over the blocks in document order.
    pub fn iter(&self) -> Blocks<'_> {
        Blocks {
            doc: self,
            cursor: self.first,
        }
    }

    /// The text of every block, in document order.
    pub fn texts(&self) -> Vec<String> {
        self.iter().map(|(_, b)| b.text.to_string()).collect()
    }

    /// Appends a block holding `text` at the end of the document.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OutOfMemory`] if the block arena cannot grow.
    pub fn add_block(&mut self, text: &str) -> Result<BlockRef> {
        let after = self.last();
        self.insert_buffer_after(after, TextBuffer::from(text))
    }

    /// Inserts a block holding `text` right after `after`, or at the head when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidReference`] if `after` is not a live block
    /// and [`EditorError::OutOfMemory`] if the block arena cannot grow.
    pub fn insert_block_after(&mut self, after: Option<BlockRef>, text: &str) -> Result<BlockRef> {
        self.insert_buffer_after(after, TextBuffer::from(text))
    }

    /// Splices `block` out of the chain and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidReference`] if `block` is not live; the
    /// document is left unchanged.
    pub fn remove_block(&mut self, block: BlockRef) -> Result<Block> {
        let slot = self.slot_of(block)?;
        let Some(mut removed) = self.slots[slot].take() else {
            return Err(EditorError::InvalidReference(block));
        };

        match removed.prev.and_then(|p| self.node_mut(p)) {
            Some(prev) => prev.next = removed.next,
            None => self.first = removed.next,
        }
        match removed.next.and_then(|n| self.node_mut(n)) {
            Some(next) => next.prev = removed.prev,
            None => self.last = removed.prev,
        }

        removed.prev = None;
        removed.next = None;
        self.free.push(slot);
        self.len -= 1;
        tracing::debug!(block = %block, remaining = self.len, "removed block");
        Ok(removed)
    }

    /// Clears the selection of every block.
    pub fn clear_selections(&mut self) {
        for block in self.slots.iter_mut().flatten() {
            block.selection = None;
        }
    }

    /// Checks the chain structure and the cursor/selection bounds of every block.
    pub fn is_consistent(&self) -> bool {
        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.first;

        while let Some(slot) = cursor {
            if count >= self.len {
                return false;
            }
            let Some(block) = self.node(slot) else {
                return false;
            };
            if block.prev != prev || !block.is_consistent() {
                return false;
            }
            prev = Some(slot);
            cursor = block.next;
            count += 1;
        }

        let live = self.slots.iter().filter(|s| s.is_some()).count();
        count == self.len && live == self.len && self.last == prev
    }

    /// Makes sure one more block can be allocated without failing.
    pub(crate) fn reserve_block(&mut self) -> Result<()> {
        if self.free.is_empty() {
            self.slots.try_reserve(1).map_err(|_| EditorError::OutOfMemory)?;
        }
        Ok(())
    }

    pub(crate) fn insert_buffer_after(
        &mut self,
        after: Option<BlockRef>,
        text: TextBuffer,
    ) -> Result<BlockRef> {
        let after_slot = after.map(|r| self.slot_of(r)).transpose()?;
        let slot = self.allocate(text)?;

        let next = match after_slot {
            Some(a) => self.node(a).and_then(|b| b.next),
            None => self.first,
        };
        if let Some(block) = self.node_mut(slot) {
            block.prev = after_slot;
            block.next = next;
        }
        match after_slot.and_then(|a| self.node_mut(a)) {
            Some(prev) => prev.next = Some(slot),
            None => self.first = Some(slot),
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next) => next.prev = Some(slot),
            None => self.last = Some(slot),
        }
        self.len += 1;

        let block = BlockRef {
            doc: self.id,
            slot,
            id: self.id_counter,
        };
        tracing::debug!(block = %block, blocks = self.len, "inserted block");
        Ok(block)
    }

    /// Resolves `block` to its slot, or reports it as an invalid reference.
    pub(crate) fn slot_of(&self, block: BlockRef) -> Result<usize> {
        if self.contains(block) {
            Ok(block.slot)
        } else {
            tracing::warn!(block = %block, "reference to a block that is not in the document");
            Err(EditorError::InvalidReference(block))
        }
    }

    pub(crate) fn live(&self, block: BlockRef) -> Result<&Block> {
        let slot = self.slot_of(block)?;
        self.node(slot).ok_or(EditorError::InvalidReference(block))
    }

    pub(crate) fn live_mut(&mut self, block: BlockRef) -> Result<&mut Block> {
        let slot = self.slot_of(block)?;
        self.node_mut(slot).ok_or(EditorError::InvalidReference(block))
    }

    fn allocate(&mut self, text: TextBuffer) -> Result<usize> {
        self.reserve_block()?;
        self.id_counter += 1;
        let block = Block::new(self.id_counter, text);
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(block);
                Ok(slot)
            }
            None => {
                self.slots.push(Some(block));
                Ok(self.slots.len() - 1)
            }
        }
    }

    fn handle(&self, slot: usize) -> Option<BlockRef> {
        self.node(slot).map(|b| BlockRef {
            doc: self.id,
            slot,
            id: b.id,
        })
    }

    fn node(&self, slot: usize) -> Option<&Block> {
        self.slots.get(slot)?.as_ref()
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Block> {
        self.slots.get_mut(slot)?.as_mut()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the blocks of a document in order, see [`Document::iter`].
pub struct Blocks<'a> {
    doc: &'a Document,
    cursor: Option<usize>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = (BlockRef, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.cursor?;
        let block = self.doc.node(slot)?;
        self.cursor = block.next;
        let handle = BlockRef {
            doc: self.doc.id,
            slot,
            id: block.id,
        };
        Some((handle, block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(texts: &[&str]) -> (Document, Vec<BlockRef>) {
        let mut doc = Document::new();
        let refs = texts.iter().map(|t| doc.add_block(t).unwrap()).collect();
        (doc, refs)
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.first(), None);
        assert_eq!(doc.last(), None);
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_add_block_appends() {
        let (doc, refs) = doc(&["one", "two", "three"]);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.texts(), vec!["one", "two", "three"]);
        assert_eq!(doc.first(), Some(refs[0]));
        assert_eq!(doc.last(), Some(refs[2]));
        assert_eq!(doc.next(refs[0]), Some(refs[1]));
        assert_eq!(doc.prev(refs[0]), None);
        assert_eq!(doc.next(refs[2]), None);
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_new_block_state() {
        let (doc, refs) = doc(&["hello"]);
        let block = doc.block(refs[0]).unwrap();
        assert_eq!(block.id(), 1);
        assert_eq!(block.cursor_index(), 5);
        assert_eq!(block.selection(), None);
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let (mut doc, refs) = doc(&["a", "b"]);
        doc.remove_block(refs[1]).unwrap();
        let c = doc.add_block("c").unwrap();
        assert_eq!(refs[0].id(), 1);
        assert_eq!(refs[1].id(), 2);
        assert_eq!(c.id(), 3);
    }

    // ── insert_block_after ───────────────────────────────────────────

    #[test]
    fn test_insert_after_middle() {
        let (mut doc, refs) = doc(&["a", "c"]);
        let b = doc.insert_block_after(Some(refs[0]), "b").unwrap();
        assert_eq!(doc.texts(), vec!["a", "b", "c"]);
        assert_eq!(doc.prev(refs[1]), Some(b));
        assert_eq!(doc.last(), Some(refs[1]));
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_insert_after_last_updates_last() {
        let (mut doc, refs) = doc(&["a"]);
        let b = doc.insert_block_after(Some(refs[0]), "b").unwrap();
        assert_eq!(doc.last(), Some(b));
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_insert_at_head() {
        let (mut doc, refs) = doc(&["b"]);
        let a = doc.insert_block_after(None, "a").unwrap();
        assert_eq!(doc.first(), Some(a));
        assert_eq!(doc.last(), Some(refs[0]));
        assert_eq!(doc.texts(), vec!["a", "b"]);
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_insert_at_head_of_empty_document() {
        let mut doc = Document::new();
        let a = doc.insert_block_after(None, "a").unwrap();
        assert_eq!(doc.first(), Some(a));
        assert_eq!(doc.last(), Some(a));
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_insert_after_stale_reference_fails() {
        let (mut doc, refs) = doc(&["a", "b"]);
        doc.remove_block(refs[1]).unwrap();
        let err = doc.insert_block_after(Some(refs[1]), "x").unwrap_err();
        assert!(matches!(err, EditorError::InvalidReference(r) if r == refs[1]));
        assert_eq!(doc.texts(), vec!["a"]);
        assert!(doc.is_consistent());
    }

    // ── remove_block ─────────────────────────────────────────────────

    #[test]
    fn test_remove_middle_reconnects_neighbours() {
        let (mut doc, refs) = doc(&["a", "b", "c"]);
        let removed = doc.remove_block(refs[1]).unwrap();
        assert_eq!(removed.text().to_string(), "b");
        assert_eq!(doc.next(refs[0]), Some(refs[2]));
        assert_eq!(doc.prev(refs[2]), Some(refs[0]));
        assert!(!doc.contains(refs[1]));
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_remove_first_and_last() {
        let (mut doc, refs) = doc(&["a", "b", "c"]);
        doc.remove_block(refs[0]).unwrap();
        assert_eq!(doc.first(), Some(refs[1]));
        doc.remove_block(refs[2]).unwrap();
        assert_eq!(doc.last(), Some(refs[1]));
        assert_eq!(doc.first(), Some(refs[1]));
        assert!(doc.is_consistent());

        doc.remove_block(refs[1]).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.first(), None);
        assert_eq!(doc.last(), None);
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_remove_twice_is_invalid_reference() {
        let (mut doc, refs) = doc(&["a", "b"]);
        doc.remove_block(refs[0]).unwrap();
        assert!(matches!(
            doc.remove_block(refs[0]),
            Err(EditorError::InvalidReference(_))
        ));
        assert_eq!(doc.len(), 1);
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_reused_slot_does_not_revive_stale_handle() {
        let (mut doc, refs) = doc(&["a", "b"]);
        doc.remove_block(refs[1]).unwrap();
        let c = doc.add_block("c").unwrap();
        assert!(doc.contains(c));
        assert!(!doc.contains(refs[1]));
        assert!(doc.block(refs[1]).is_none());
        assert_eq!(doc.texts(), vec!["a", "c"]);
    }

    #[test]
    fn test_reference_from_other_document_is_rejected() {
        let (other, other_refs) = doc(&["x"]);
        let (mut doc, refs) = doc(&["a", "b"]);
        // Same slot and block id as the first block of `doc`
        let foreign = other_refs[0];
        assert_eq!(foreign.id(), refs[0].id());
        assert!(other.contains(foreign));

        assert!(!doc.contains(foreign));
        assert!(doc.block(foreign).is_none());
        assert!(matches!(
            doc.remove_block(foreign),
            Err(EditorError::InvalidReference(r)) if r == foreign
        ));
        assert!(doc.insert_block_after(Some(foreign), "x").is_err());
        assert_eq!(doc.texts(), vec!["a", "b"]);
        assert!(doc.is_consistent());
    }

    // ── Iteration & selections ───────────────────────────────────────

    #[test]
    fn test_iter_in_document_order() {
        let (mut doc, refs) = doc(&["a", "b", "c"]);
        let ids: Vec<BlockId> = doc.iter().map(|(_, b)| b.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        doc.remove_block(refs[0]).unwrap();
        let handles: Vec<BlockRef> = doc.iter().map(|(r, _)| r).collect();
        assert_eq!(handles, vec![refs[1], refs[2]]);
    }

    #[test]
    fn test_clear_selections() {
        let (mut doc, refs) = doc(&["abc", "def"]);
        for r in &refs {
            doc.block_mut(*r)
                .unwrap()
                .set_selection(Some(Selection::new(0, 2)));
        }
        doc.clear_selections();
        assert!(doc.iter().all(|(_, b)| b.selection().is_none()));
    }

    #[test]
    fn test_cursor_and_selection_are_clamped() {
        let (mut doc, refs) = doc(&["abc"]);
        let block = doc.block_mut(refs[0]).unwrap();
        block.set_cursor_index(99);
        assert_eq!(block.cursor_index(), 3);
        block.set_selection(Some(Selection::new(2, 10)));
        assert_eq!(block.selection(), Some(Selection::new(2, 1)));
        assert!(doc.is_consistent());
    }

    #[test]
    fn test_block_ref_display() {
        let (_, refs) = doc(&["a", "b"]);
        assert_eq!(refs[1].to_string(), "#2");
    }
}
