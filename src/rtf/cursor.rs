//! Character cursor over RTF input.
//!
//! The parser needs at most one character of lookahead and one character of
//! rollback, so the cursor exposes exactly that: [`peek`](Cursor::peek),
//! [`advance`](Cursor::advance) and [`rewind`](Cursor::rewind).

use super::error::{RtfError, RtfResult};

/// Cursor over the characters of an RTF document.
#[derive(Debug, Clone)]
pub struct Cursor {
    /// Source characters
    chars: Vec<char>,
    /// Index of the next character to read
    pos: usize,
}

impl Cursor {
    /// Create a cursor positioned at the start of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Look at the next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume and return the next character.
    #[inline]
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    /// Consume the next character, failing if the input is exhausted.
    #[inline]
    pub fn next_or_truncated(&mut self, context: &'static str) -> RtfResult<char> {
        self.advance().ok_or(RtfError::TruncatedInput {
            position: self.pos,
            context,
        })
    }

    /// Step back over the most recently consumed character.
    #[inline]
    pub fn rewind(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Consume the next character if it satisfies `pred`.
    #[inline]
    pub fn advance_if(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => self.advance(),
            _ => None,
        }
    }

    /// Number of characters consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether every character has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }
}
