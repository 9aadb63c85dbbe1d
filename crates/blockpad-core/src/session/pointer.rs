//! Pointer press and drag, and mapping window coordinates to blocks.

use crate::document::BlockRef;
use crate::error::Result;
use crate::metrics::TextMetrics;
use crate::selection::{self, Anchor};
use crate::wrap::LineLayout;

use super::{EditOutcome, EditSession};

/// A pointer position resolved to a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub block: BlockRef,
    /// Offset from the text column; negative in the left margin.
    pub local_x: f32,
    /// Offset from the top of the block's first text line.
    pub local_y: f32,
}

impl<M: TextMetrics> EditSession<M> {
    /// Finds the block under the window point `(x, y)`.
    ///
    /// Blocks are stacked from `top_margin` down, each `block_height` tall plus
    /// `block_gap`; the gap below a block counts as part of it.
    pub fn block_at(&self, x: f32, y: f32) -> Option<PointerHit> {
        let config = &self.config;
        let mut top = config.top_margin;

        for (block, b) in self.document.iter() {
            let lines = LineLayout::compute(b.text(), &self.wrap, &self.metrics).line_count();
            let height = config.block_height(lines) + config.block_gap;
            if y >= top && y < top + height {
                return Some(PointerHit {
                    block,
                    local_x: x - config.text_left,
                    local_y: y - top - config.block_padding,
                });
            }
            top += height;
        }
        None
    }

    /// Starts a pointer gesture: focuses `block`, places the caret at the hit
    /// index and anchors the selection there.
    pub fn pointer_down(
        &mut self,
        block: BlockRef,
        local_x: f32,
        local_y: f32,
    ) -> Result<EditOutcome> {
        let index = self.char_index_nearest(block, local_x, local_y)?;
        self.document.live_mut(block)?.set_cursor_index(index);

        let anchor = Anchor { block, index };
        selection::update_range(&mut self.document, anchor, block, index)?;
        self.focus = Some(block);
        self.anchor = Some(anchor);
        tracing::debug!(block = %block, index, "pointer press");
        Ok(EditOutcome::Applied)
    }

    /// Extends the pointer gesture to the hit index in `block`, which takes
    /// the focus. Does nothing without an anchor.
    pub fn pointer_drag(
        &mut self,
        block: BlockRef,
        local_x: f32,
        local_y: f32,
    ) -> Result<EditOutcome> {
        let Some(anchor) = self.anchor else {
            return Ok(EditOutcome::NoOp);
        };
        let index = self.char_index_nearest(block, local_x, local_y)?;
        self.document.live_mut(block)?.set_cursor_index(index);
        selection::update_range(&mut self.document, anchor, block, index)?;
        self.focus = Some(block);
        Ok(EditOutcome::Applied)
    }
}
