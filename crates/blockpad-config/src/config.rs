//! Editor configuration: load, save, and sanitize.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::timing::RepeatTiming;

/// Top-level editor configuration.
///
/// Geometry values are in the same units the text metrics report glyph widths in
/// (pixels for a typical renderer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub font_size: f32,
    /// Maximum accumulated width of a visual line before the greedy wrap breaks it.
    pub wrap_width: f32,
    pub line_height: f32,
    /// Horizontal offset of the text column; pointer x left of it is the margin.
    pub text_left: f32,
    /// Vertical offset of the first block.
    pub top_margin: f32,
    /// Padding above and below the text of every block.
    pub block_padding: f32,
    /// Vertical space between consecutive blocks.
    pub block_gap: f32,
    /// Seconds the caret stays solid after activity before it starts blinking.
    pub caret_solid_secs: f64,
    /// Text of the single block a fresh session starts with.
    pub placeholder_text: String,
    pub horizontal_repeat: RepeatTiming,
    pub vertical_repeat: RepeatTiming,
    pub delete_repeat: RepeatTiming,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            wrap_width: 680.0,
            line_height: 24.0,
            text_left: 60.0,
            top_margin: 20.0,
            block_padding: 4.0,
            block_gap: 2.0,
            caret_solid_secs: 0.6,
            placeholder_text: "click here to edit...".to_string(),
            horizontal_repeat: RepeatTiming::navigation(),
            vertical_repeat: RepeatTiming::navigation(),
            delete_repeat: RepeatTiming::deletion(),
        }
    }
}

impl EditorConfig {
    /// Returns the config file path: exe directory + `blockpad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("blockpad.json")))
            .unwrap_or_else(|| PathBuf::from("blockpad.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &std::path::Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<EditorConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left untouched
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Resets non-finite or non-positive geometry to defaults and repairs repeat timings.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();

        positive_or(&mut self.font_size, defaults.font_size);
        positive_or(&mut self.wrap_width, defaults.wrap_width);
        positive_or(&mut self.line_height, defaults.line_height);
        non_negative_or(&mut self.text_left, defaults.text_left);
        non_negative_or(&mut self.top_margin, defaults.top_margin);
        non_negative_or(&mut self.block_padding, defaults.block_padding);
        non_negative_or(&mut self.block_gap, defaults.block_gap);
        if !self.caret_solid_secs.is_finite() || self.caret_solid_secs < 0.0 {
            self.caret_solid_secs = defaults.caret_solid_secs;
        }

        self.horizontal_repeat.sanitize(defaults.horizontal_repeat);
        self.vertical_repeat.sanitize(defaults.vertical_repeat);
        self.delete_repeat.sanitize(defaults.delete_repeat);
    }

    /// Height of a block with `visual_lines` wrapped lines, padding included.
    pub fn block_height(&self, visual_lines: usize) -> f32 {
        visual_lines as f32 * self.line_height + self.block_padding * 2.0
    }
}

fn positive_or(value: &mut f32, fallback: f32) {
    if !value.is_finite() || *value <= 0.0 {
        *value = fallback;
    }
}

fn non_negative_or(value: &mut f32, fallback: f32) {
    if !value.is_finite() || *value < 0.0 {
        *value = fallback;
    }
}
