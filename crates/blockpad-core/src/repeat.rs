//! Auto-repeat of held keys.

use blockpad_config::{EditorConfig, RepeatTiming};

/// Repeat state of one key (or a group of keys sharing a timer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyRepeat {
    timing: RepeatTiming,
    next_fire: f64,
}

impl KeyRepeat {
    pub fn new(timing: RepeatTiming) -> Self {
        Self {
            timing,
            next_fire: 0.0,
        }
    }

    /// Returns true if the key should act this frame.
    ///
    /// A fresh press always fires and arms the initial delay. A held key fires
    /// once `now` is past the scheduled time, then rearms with the interval.
    pub fn poll(&mut self, pressed: bool, down: bool, now: f64) -> bool {
        if pressed {
            self.next_fire = now + self.timing.initial_delay;
            true
        } else if down && now > self.next_fire {
            self.next_fire = now + self.timing.interval;
            true
        } else {
            false
        }
    }
}

/// One timer per input axis.
///
/// Left/right share the horizontal timer, up/down the vertical one, and
/// backspace/delete the delete timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepeatTimers {
    pub horizontal: KeyRepeat,
    pub vertical: KeyRepeat,
    pub delete: KeyRepeat,
}

impl From<&EditorConfig> for RepeatTimers {
    fn from(config: &EditorConfig) -> Self {
        Self {
            horizontal: KeyRepeat::new(config.horizontal_repeat),
            vertical: KeyRepeat::new(config.vertical_repeat),
            delete: KeyRepeat::new(config.delete_repeat),
        }
    }
}
