//! Text buffer wrapping `ropey::Rope`, owned by exactly one block.

use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// The growable text of a single block.
///
/// All indices are char offsets. The editor only produces printable ASCII and
/// `\n`, so a char offset is also a byte offset in practice.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl PartialEq<&str> for TextBuffer {
    fn eq(&self, other: &&str) -> bool {
        self.rope == *other
    }
}

impl TextBuffer {
    /// Creates an empty text buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Iterates over the characters of the buffer.
    pub fn chars(&self) -> ropey::iter::Chars<'_> {
        self.rope.chars()
    }

    /// Inserts a single character at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert_char(&mut self, char_idx: usize, ch: char) -> Result<()> {
        self.check_position(char_idx, "insert position")?;
        self.rope.insert_char(char_idx, ch);
        Ok(())
    }

    /// Removes the character range [start..end) from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        Ok(())
    }

    /// Returns the text in the given char range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn slice(&self, start: usize, end: usize) -> Result<ropey::RopeSlice<'_>> {
        self.check_range(start, end)?;
        Ok(self.rope.slice(start..end))
    }

    /// Splits the buffer at `char_idx`, keeping `[0, char_idx)` and returning the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn split_off(&mut self, char_idx: usize) -> Result<TextBuffer> {
        self.check_position(char_idx, "split position")?;
        Ok(Self {
            rope: self.rope.split_off(char_idx),
        })
    }

    /// Moves the contents of `other` onto the end of this buffer.
    pub fn append(&mut self, other: TextBuffer) {
        self.rope.append(other.rope);
    }

    /// Drops everything from `char_idx` onwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn truncate(&mut self, char_idx: usize) -> Result<()> {
        let len = self.rope.len_chars();
        self.remove(char_idx, len)
    }

    fn check_position(&self, char_idx: usize, what: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "{} {} out of bounds (buffer has {} chars)",
                what,
                char_idx,
                self.rope.len_chars()
            );
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        if end > self.rope.len_chars() {
            anyhow::bail!(
                "range end {} out of bounds (buffer has {} chars)",
                end,
                self.rope.len_chars()
            );
        }
        Ok(())
    }
}
