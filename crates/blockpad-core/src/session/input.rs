//! One frame of raw input and its dispatch onto session operations.

use crate::cursor::Direction;
use crate::error::Result;
use crate::metrics::TextMetrics;

use super::{EditOutcome, EditSession};

/// State of one key during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Went down this frame.
    pub pressed: bool,
    /// Is held (true on the press frame too).
    pub down: bool,
}

impl KeyInput {
    /// A key that went down this frame.
    pub fn press() -> Self {
        Self {
            pressed: true,
            down: true,
        }
    }

    /// A key held since an earlier frame.
    pub fn held() -> Self {
        Self {
            pressed: false,
            down: true,
        }
    }
}

/// Primary pointer button and position, in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    pub pressed: bool,
    pub down: bool,
}

/// Everything the editor reads from the input devices in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub left: KeyInput,
    pub right: KeyInput,
    pub up: KeyInput,
    pub down: KeyInput,
    pub backspace: KeyInput,
    pub delete: KeyInput,
    pub enter: KeyInput,
    /// Either shift key is held.
    pub shift: bool,
    /// Characters typed this frame, in order.
    pub typed: Vec<char>,
    pub pointer: Option<PointerInput>,
}

impl FrameInput {
    fn any_editing_key_down(&self) -> bool {
        [
            self.left,
            self.right,
            self.up,
            self.down,
            self.backspace,
            self.delete,
            self.enter,
        ]
        .iter()
        .any(|k| k.down)
    }
}

/// Printable ASCII the editor accepts from typing: space through `}`.
pub fn is_typeable(ch: char) -> bool {
    (' '..='}').contains(&ch)
}

impl<M: TextMetrics> EditSession<M> {
    /// Applies one frame of input at time `now` (seconds).
    ///
    /// Keyboard input only acts with a focused block. The order is fixed:
    /// horizontal moves, typing, soft break, deletion, vertical moves, hard
    /// Enter, then the pointer.
    pub fn process_frame(&mut self, input: &FrameInput, now: f64) -> Result<EditOutcome> {
        let mut applied = false;

        if self.focus.is_some() {
            applied |= self.process_keys(input, now)?.is_applied();
            if input.enter.pressed && !input.shift {
                applied |= self.split_block()?.is_applied();
                self.mark_activity(now);
            }
        }

        if let Some(pointer) = input.pointer {
            applied |= self.process_pointer(pointer, now)?.is_applied();
        }

        Ok(EditOutcome::from(applied))
    }

    fn process_keys(&mut self, input: &FrameInput, now: f64) -> Result<EditOutcome> {
        let shift = input.shift;
        let mut applied = false;

        if input.any_editing_key_down() {
            self.mark_activity(now);
        }

        let timer = &mut self.repeat.horizontal;
        let right = timer.poll(input.right.pressed, input.right.down, now);
        let left = timer.poll(input.left.pressed, input.left.down, now);
        if right {
            applied |= self.move_cursor(Direction::Right, shift)?.is_applied();
        }
        if left {
            applied |= self.move_cursor(Direction::Left, shift)?.is_applied();
        }

        for &ch in input.typed.iter().filter(|c| is_typeable(**c)) {
            applied |= self.insert_char(ch)?.is_applied();
            self.mark_activity(now);
        }

        if input.enter.pressed && shift {
            applied |= self.insert_soft_break()?.is_applied();
        }

        let timer = &mut self.repeat.delete;
        let back = timer.poll(input.backspace.pressed, input.backspace.down, now);
        let del = timer.poll(input.delete.pressed, input.delete.down, now);
        if back || del {
            if self.delete_selection()?.is_applied() {
                self.mark_activity(now);
                return Ok(EditOutcome::Applied);
            }
            if back {
                applied |= self.backspace()?.is_applied();
            }
            if del {
                applied |= self.delete_forward()?.is_applied();
            }
        }

        let timer = &mut self.repeat.vertical;
        let up = timer.poll(input.up.pressed, input.up.down, now);
        let down = timer.poll(input.down.pressed, input.down.down, now);
        let vertical = if down {
            Some(Direction::Down)
        } else if up {
            Some(Direction::Up)
        } else {
            None
        };
        if let Some(direction) = vertical {
            applied |= self.move_cursor(direction, shift)?.is_applied();
            self.mark_activity(now);
        }

        Ok(EditOutcome::from(applied))
    }

    fn process_pointer(&mut self, pointer: PointerInput, now: f64) -> Result<EditOutcome> {
        let Some(hit) = self.block_at(pointer.x, pointer.y) else {
            return Ok(EditOutcome::NoOp);
        };
        if pointer.pressed {
            self.mark_activity(now);
            self.pointer_down(hit.block, hit.local_x, hit.local_y)
        } else if pointer.down {
            self.pointer_drag(hit.block, hit.local_x, hit.local_y)
        } else {
            Ok(EditOutcome::NoOp)
        }
    }
}
