//! Logical selection range.
//!
//! # Invariants
//! - Direction is preserved: `anchor` may be after `focus`.
//! - Ranges handed out by the engine are clamped to the document length.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Range;

/// Zero-based character position in the flattened document.
pub type LogicalOffset = usize;

/// Selection expressed as two logical offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: LogicalOffset,
    pub focus: LogicalOffset,
}

impl SelectionRange {
    pub fn new(anchor: LogicalOffset, focus: LogicalOffset) -> Self {
        Self { anchor, focus }
    }

    /// Collapsed range (caret) at `offset`.
    pub fn caret(offset: LogicalOffset) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// True when the focus precedes the anchor.
    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    pub fn start(&self) -> LogicalOffset {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> LogicalOffset {
        self.anchor.max(self.focus)
    }

    /// Direction-free half-open range.
    pub fn as_range(&self) -> Range<LogicalOffset> {
        self.start()..self.end()
    }

    /// Returns a copy with both endpoints clamped to `length`.
    pub fn clamped(self, length: usize) -> Self {
        Self::new(self.anchor.min(length), self.focus.min(length))
    }
}

impl Display for SelectionRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.anchor, self.focus)
    }
}
