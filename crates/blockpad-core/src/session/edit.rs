//! Text edits through the session: every one deletes an active selection
//! first and ends with no anchor and no selection.

use crate::error::Result;
use crate::metrics::TextMetrics;

use super::{EditOutcome, EditSession};

impl<M: TextMetrics> EditSession<M> {
    /// Types `ch` at the caret, replacing the selection if there is one.
    pub fn insert_char(&mut self, ch: char) -> Result<EditOutcome> {
        let Some(focus) = self.focus else {
            return Ok(EditOutcome::NoOp);
        };
        let focus = self.document.delete_selected_text()?.unwrap_or(focus);
        self.document.insert_char(focus, ch)?;
        self.finish_edit(focus);
        Ok(EditOutcome::Applied)
    }

    /// Inserts a line break inside the focused block (Shift+Enter).
    pub fn insert_soft_break(&mut self) -> Result<EditOutcome> {
        self.insert_char('\n')
    }

    /// Deletes the selected text, moving the caret to where it was.
    pub fn delete_selection(&mut self) -> Result<EditOutcome> {
        match self.document.delete_selected_text()? {
            Some(survivor) => {
                self.finish_edit(survivor);
                Ok(EditOutcome::Applied)
            }
            None => Ok(EditOutcome::NoOp),
        }
    }

    /// Deletes the selection, or the char before the caret, or merges the
    /// focused block into its predecessor.
    pub fn backspace(&mut self) -> Result<EditOutcome> {
        let Some(focus) = self.focus else {
            return Ok(EditOutcome::NoOp);
        };
        if self.delete_selection()?.is_applied() {
            return Ok(EditOutcome::Applied);
        }

        let result = self.document.delete_backward(focus)?;
        self.finish_edit(result.unwrap_or(focus));
        Ok(EditOutcome::from(result.is_some()))
    }

    /// Deletes the selection, or the char after the caret. Never merges.
    pub fn delete_forward(&mut self) -> Result<EditOutcome> {
        let Some(focus) = self.focus else {
            return Ok(EditOutcome::NoOp);
        };
        if self.delete_selection()?.is_applied() {
            return Ok(EditOutcome::Applied);
        }

        let deleted = self.document.delete_forward(focus)?;
        self.finish_edit(focus);
        Ok(EditOutcome::from(deleted))
    }

    /// Splits the focused block at the caret (Enter), replacing the selection
    /// first. The caret moves to the start of the new block.
    pub fn split_block(&mut self) -> Result<EditOutcome> {
        let Some(focus) = self.focus else {
            return Ok(EditOutcome::NoOp);
        };
        let focus = self.document.delete_selected_text()?.unwrap_or(focus);
        let successor = self.document.split_block(focus)?;
        self.finish_edit(successor);
        Ok(EditOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use blockpad_config::EditorConfig;

    use crate::document::{BlockRef, Document};
    use crate::metrics::MonospaceMetrics;
    use crate::session::{EditOutcome, EditSession};
    use crate::Direction;

    fn session(texts: &[&str]) -> (EditSession, Vec<BlockRef>) {
        let mut doc = Document::new();
        let refs = texts.iter().map(|t| doc.add_block(t).unwrap()).collect();
        let session = EditSession::with_document(
            doc,
            EditorConfig::default(),
            MonospaceMetrics::default(),
        );
        (session, refs)
    }

    fn cursor(session: &EditSession) -> usize {
        session.focused_block().unwrap().cursor_index()
    }

    /// Selects `count` chars left of the caret of the focused block.
    fn select_left(session: &mut EditSession, count: usize) {
        for _ in 0..count {
            session.move_cursor(Direction::Left, true).unwrap();
        }
    }

    #[test]
    fn test_edits_without_focus_are_noops() {
        let (mut session, _) = session(&["abc"]);
        assert_eq!(session.insert_char('x').unwrap(), EditOutcome::NoOp);
        assert_eq!(session.backspace().unwrap(), EditOutcome::NoOp);
        assert_eq!(session.delete_forward().unwrap(), EditOutcome::NoOp);
        assert_eq!(session.split_block().unwrap(), EditOutcome::NoOp);
        assert_eq!(session.document().texts(), vec!["abc"]);
    }

    // ── Typing ───────────────────────────────────────────────────────

    #[test]
    fn test_type_at_end() {
        let (mut session, refs) = session(&["hello"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.insert_char('!').unwrap();
        assert_eq!(session.document().texts(), vec!["hello!"]);
        assert_eq!(cursor(&session), 6);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let (mut session, refs) = session(&["hello world"]);
        session.set_focus(Some(refs[0])).unwrap();
        select_left(&mut session, 5);
        session.insert_char('X').unwrap();
        assert_eq!(session.document().texts(), vec!["hello X"]);
        assert_eq!(cursor(&session), 7);
        assert_eq!(session.anchor(), None);
        assert!(!session.has_selection());
    }

    #[test]
    fn test_soft_break_stays_in_block() {
        let (mut session, refs) = session(&["ab"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        session.insert_soft_break().unwrap();
        assert_eq!(session.document().texts(), vec!["a\nb"]);
        assert_eq!(session.document().len(), 1);
        assert_eq!(cursor(&session), 2);
    }

    // ── Deletion ─────────────────────────────────────────────────────

    #[test]
    fn test_backspace_deletes_selection_only() {
        let (mut session, refs) = session(&["abcdefgh"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        select_left(&mut session, 2);
        assert_eq!(session.selected_text().as_deref(), Some("fg"));
        assert_eq!(session.backspace().unwrap(), EditOutcome::Applied);
        assert_eq!(session.document().texts(), vec!["abcdeh"]);
        assert_eq!(cursor(&session), 5);
    }

    #[test]
    fn test_backspace_merges_and_moves_focus() {
        let (mut session, refs) = session(&["ab", "cd"]);
        session.set_focus(Some(refs[1])).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        session.backspace().unwrap();
        assert_eq!(session.document().texts(), vec!["abcd"]);
        assert_eq!(session.focus(), Some(refs[0]));
        assert_eq!(cursor(&session), 2);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let (mut session, refs) = session(&["a"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.backspace().unwrap();
        assert_eq!(session.backspace().unwrap(), EditOutcome::NoOp);
        assert_eq!(session.document().texts(), vec![""]);
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let (mut session, refs) = session(&["ab", "cd"]);
        session.set_focus(Some(refs[0])).unwrap();
        assert_eq!(session.delete_forward().unwrap(), EditOutcome::NoOp);
        assert_eq!(session.document().texts(), vec!["ab", "cd"]);
    }

    #[test]
    fn test_delete_forward_with_selection() {
        let (mut session, refs) = session(&["abc", "def"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        session.move_cursor(Direction::Down, true).unwrap();
        assert_eq!(session.delete_forward().unwrap(), EditOutcome::Applied);
        assert_eq!(session.document().texts(), vec!["abf"]);
        assert_eq!(session.focus(), Some(refs[0]));
        assert_eq!(cursor(&session), 2);
    }

    // ── Split ────────────────────────────────────────────────────────

    #[test]
    fn test_enter_splits_and_focuses_new_block() {
        let (mut session, refs) = session(&["hello world"]);
        session.set_focus(Some(refs[0])).unwrap();
        for _ in 0..6 {
            session.move_cursor(Direction::Left, false).unwrap();
        }
        session.split_block().unwrap();
        assert_eq!(session.document().texts(), vec!["hello", " world"]);
        assert_ne!(session.focus(), Some(refs[0]));
        assert_eq!(cursor(&session), 0);
    }

    #[test]
    fn test_enter_replaces_selection() {
        let (mut session, refs) = session(&["abcdef"]);
        session.set_focus(Some(refs[0])).unwrap();
        session.move_cursor(Direction::Left, false).unwrap();
        select_left(&mut session, 2);
        session.split_block().unwrap();
        assert_eq!(session.document().texts(), vec!["abc", "f"]);
        assert!(!session.has_selection());
    }

    #[test]
    fn test_enter_then_backspace_restores_block() {
        let (mut session, refs) = session(&["abcdef"]);
        session.set_focus(Some(refs[0])).unwrap();
        for _ in 0..3 {
            session.move_cursor(Direction::Left, false).unwrap();
        }
        session.split_block().unwrap();
        session.backspace().unwrap();
        assert_eq!(session.document().texts(), vec!["abcdef"]);
        assert_eq!(session.focus(), Some(refs[0]));
        assert_eq!(cursor(&session), 3);
    }
}
