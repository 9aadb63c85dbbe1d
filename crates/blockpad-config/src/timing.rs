//! Key-repeat timing: how long a held key waits before repeating, and how often.

use serde::{Deserialize, Serialize};

/// Delay before the first repeat of a held navigation key, in seconds.
pub const NAVIGATION_INITIAL_DELAY: f64 = 0.4;
/// Interval between repeats of a held navigation key, in seconds.
pub const NAVIGATION_INTERVAL: f64 = 0.04;
/// Delay before the first repeat of a held backspace/delete key, in seconds.
pub const DELETION_INITIAL_DELAY: f64 = 0.5;
/// Interval between repeats of a held backspace/delete key, in seconds.
pub const DELETION_INTERVAL: f64 = 0.05;

/// Repeat timing for one input axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepeatTiming {
    pub initial_delay: f64,
    pub interval: f64,
}

impl RepeatTiming {
    /// Timing for the arrow keys.
    pub const fn navigation() -> Self {
        Self {
            initial_delay: NAVIGATION_INITIAL_DELAY,
            interval: NAVIGATION_INTERVAL,
        }
    }

    /// Timing for backspace and delete.
    pub const fn deletion() -> Self {
        Self {
            initial_delay: DELETION_INITIAL_DELAY,
            interval: DELETION_INTERVAL,
        }
    }

    /// Replaces negative or non-finite fields with the matching field of `fallback`.
    pub fn sanitize(&mut self, fallback: RepeatTiming) {
        if !self.initial_delay.is_finite() || self.initial_delay < 0.0 {
            self.initial_delay = fallback.initial_delay;
        }
        if !self.interval.is_finite() || self.interval < 0.0 {
            self.interval = fallback.interval;
        }
    }
}

impl Default for RepeatTiming {
    fn default() -> Self {
        Self::navigation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let nav = RepeatTiming::navigation();
        assert!((nav.initial_delay - 0.4).abs() < f64::EPSILON);
        assert!((nav.interval - 0.04).abs() < f64::EPSILON);

        let del = RepeatTiming::deletion();
        assert!((del.initial_delay - 0.5).abs() < f64::EPSILON);
        assert!((del.interval - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sanitize_keeps_each_valid_field() {
        let mut timing = RepeatTiming {
            initial_delay: 0.25,
            interval: f64::NAN,
        };
        timing.sanitize(RepeatTiming::deletion());
        assert!((timing.initial_delay - 0.25).abs() < f64::EPSILON);
        assert!((timing.interval - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_interval_is_valid() {
        let mut timing = RepeatTiming {
            initial_delay: 0.0,
            interval: 0.0,
        };
        timing.sanitize(RepeatTiming::navigation());
        assert_eq!(timing.initial_delay, 0.0);
        assert_eq!(timing.interval, 0.0);
    }
}
