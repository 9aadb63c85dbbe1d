//! Glyph-width measurement supplied by the rendering layer.

/// Measures the advance width of a single character at a font size.
///
/// Implementations must be pure: the wrap index, vertical navigation and
/// pointer hit-testing all call it and must agree on the geometry.
pub trait TextMetrics {
    fn width(&self, ch: char, font_size: f32) -> f32;
}

impl<F> TextMetrics for F
where
    F: Fn(char, f32) -> f32,
{
    fn width(&self, ch: char, font_size: f32) -> f32 {
        self(ch, font_size)
    }
}

/// Every character has the same advance, scaled with the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    /// Advance as a fraction of the font size.
    pub advance_ratio: f32,
}

impl MonospaceMetrics {
    /// Metrics where every glyph is `advance_ratio * font_size` wide.
    pub fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.5 }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn width(&self, _ch: char, font_size: f32) -> f32 {
        self.advance_ratio * font_size
    }
}
