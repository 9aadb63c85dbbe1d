//! Editing session: the document plus the state an interactive editor keeps
//! around it.
//!
//! [`EditSession`] owns the focus (the block holding the live caret), the
//! selection anchor, the text metrics and configuration, the key-repeat timers
//! and the last-activity timestamp used for caret blinking. Edits are in
//! `edit`, pointer handling in `pointer` and per-frame input dispatch in
//! `input`.

mod edit;
mod input;
mod pointer;

pub use input::{is_typeable, FrameInput, KeyInput, PointerInput};
pub use pointer::PointerHit;

use blockpad_config::EditorConfig;

use crate::cursor::{self, Direction};
use crate::document::{Block, BlockRef, Document};
use crate::error::{EditorError, Result};
use crate::metrics::{MonospaceMetrics, TextMetrics};
use crate::repeat::RepeatTimers;
use crate::selection::{self, Anchor};
use crate::wrap::{LineLayout, WrapSettings};

/// Whether an operation changed the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    /// Nothing to do: no focus, or a boundary such as backspace at the very start.
    NoOp,
}

impl EditOutcome {
    pub fn is_applied(self) -> bool {
        self == EditOutcome::Applied
    }
}

impl From<bool> for EditOutcome {
    fn from(applied: bool) -> Self {
        if applied {
            EditOutcome::Applied
        } else {
            EditOutcome::NoOp
        }
    }
}

/// An interactive editing session over one document.
#[derive(Debug)]
pub struct EditSession<M = MonospaceMetrics> {
    document: Document,
    focus: Option<BlockRef>,
    anchor: Option<Anchor>,
    metrics: M,
    config: EditorConfig,
    wrap: WrapSettings,
    repeat: RepeatTimers,
    last_activity: f64,
}

impl<M: TextMetrics> EditSession<M> {
    /// Starts a session on a document holding the placeholder block, with no focus.
    pub fn new(config: EditorConfig, metrics: M) -> Result<Self> {
        let mut document = Document::new();
        document.add_block(&config.placeholder_text)?;
        Ok(Self::with_document(document, config, metrics))
    }

    /// Starts a session on an existing document, with no focus.
    pub fn with_document(document: Document, config: EditorConfig, metrics: M) -> Self {
        let wrap = WrapSettings::from(&config);
        let repeat = RepeatTimers::from(&config);
        Self {
            document,
            focus: None,
            anchor: None,
            metrics,
            config,
            wrap,
            repeat,
            last_activity: 0.0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn focus(&self) -> Option<BlockRef> {
        self.focus
    }

    /// The block holding the caret, if any.
    pub fn focused_block(&self) -> Option<&Block> {
        self.focus.and_then(|f| self.document.block(f))
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Moves the caret to `block` (or drops it), ending any selection gesture.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidReference`] if `block` is not live.
    pub fn set_focus(&mut self, block: Option<BlockRef>) -> Result<()> {
        if let Some(b) = block {
            if !self.document.contains(b) {
                tracing::warn!(block = %b, "cannot focus a block outside the document");
                return Err(EditorError::InvalidReference(b));
            }
        }
        self.focus = block;
        self.clear_selection();
        Ok(())
    }

    /// Wrap geometry of `block` under the session's settings.
    pub fn layout(&self, block: BlockRef) -> Result<LineLayout> {
        let b = self.document.live(block)?;
        Ok(LineLayout::compute(b.text(), &self.wrap, &self.metrics))
    }

    /// Cursor index nearest a point given relative to the block's text origin.
    pub fn char_index_nearest(
        &self,
        block: BlockRef,
        local_x: f32,
        local_y: f32,
    ) -> Result<usize> {
        Ok(self
            .layout(block)?
            .hit_test(local_x, local_y, self.config.line_height))
    }

    /// Moves the caret one step. With `extend`, the selection grows from the
    /// anchor (set at the pre-move caret if absent) to the new caret; without
    /// it, any selection is dropped.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) -> Result<EditOutcome> {
        let Some(focus) = self.focus else {
            return Ok(EditOutcome::NoOp);
        };

        if extend {
            if self.anchor.is_none() {
                let index = self.document.live(focus)?.cursor_index();
                self.anchor = Some(Anchor {
                    block: focus,
                    index,
                });
            }
        } else {
            self.clear_selection();
        }

        let focus = cursor::move_cursor(
            &mut self.document,
            focus,
            direction,
            &self.wrap,
            &self.metrics,
        )?;
        self.focus = Some(focus);

        if let Some(anchor) = self.anchor.filter(|_| extend) {
            let index = self.document.live(focus)?.cursor_index();
            selection::update_range(&mut self.document, anchor, focus, index)?;
        }
        Ok(EditOutcome::Applied)
    }

    /// Drops the anchor and every block's selection.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
        self.document.clear_selections();
    }

    pub fn has_selection(&self) -> bool {
        selection::has_selection(&self.document)
    }

    pub fn selected_text(&self) -> Option<String> {
        selection::selected_text(&self.document)
    }

    /// Records user activity at `now`, keeping the caret solid for a while.
    pub fn mark_activity(&mut self, now: f64) {
        self.last_activity = now;
    }

    pub fn last_activity(&self) -> f64 {
        self.last_activity
    }

    /// Whether the caret is drawn at `now`: solid right after activity, then
    /// blinking on for every even half second.
    pub fn caret_visible(&self, now: f64) -> bool {
        now - self.last_activity < self.config.caret_solid_secs
            || ((now * 2.0).floor() as i64).rem_euclid(2) == 0
    }

    /// Checks the document and that focus and anchor refer to live blocks.
    pub fn is_consistent(&self) -> bool {
        self.document.is_consistent()
            && self.focus.is_none_or(|f| self.document.contains(f))
            && self.anchor.is_none_or(|a| self.document.contains(a.block))
    }

    fn finish_edit(&mut self, focus: BlockRef) {
        self.focus = Some(focus);
        self.clear_selection();
    }
}
