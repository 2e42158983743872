//! Text buffer: the flat logical content of a compose area.
//!
//! # Responsibility
//! - Own the ordered run sequence and its cached logical length.
//! - Provide the single mutation primitive (`splice`) used by the edit engine.
//!
//! # Invariants
//! - Canonical form: no empty text run, no two consecutive text runs.
//! - `len()` always equals the sum of run lengths.
//! - A failed `splice` leaves the buffer untouched.
//! - The buffer never talks to the host surface.

use crate::error::{ComposeError, ComposeResult};
use crate::model::object::ObjectId;
use crate::model::run::{byte_index, Run};
use std::ops::Range;

/// Default stand-in for atomic objects in serialized text (U+FFFC).
pub const OBJECT_PLACEHOLDER: char = '\u{FFFC}';

/// Ordered run sequence with a cached length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    runs: Vec<Run>,
    len: usize,
    placeholder: char,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::with_placeholder(OBJECT_PLACEHOLDER)
    }

    /// Creates an empty buffer serializing objects as `placeholder`.
    pub fn with_placeholder(placeholder: char) -> Self {
        Self {
            runs: Vec::new(),
            len: 0,
            placeholder,
        }
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Logical document length.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ids of every object currently referenced, in document order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.runs.iter().filter_map(Run::object_id)
    }

    /// Flat text with one placeholder character per object.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.len);
        for run in &self.runs {
            match run {
                Run::Text { content } => out.push_str(content),
                Run::Object { .. } => out.push(self.placeholder),
            }
        }
        out
    }

    /// Serialized text of `range`.
    ///
    /// # Errors
    /// - `ComposeError::Range` when the range is reversed or past the end.
    pub fn slice(&self, range: Range<usize>) -> ComposeResult<String> {
        self.check_range(&range)?;
        Ok(self
            .serialize()
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect())
    }

    /// Replaces `range` with `replacement` and returns the removed runs.
    ///
    /// Partially covered text runs are split; objects are removed whole.
    /// Replacement runs land at `range.start`, then adjacent text runs merge.
    ///
    /// # Errors
    /// - `ComposeError::Range` when `start > end` or `end > len()`.
    pub fn splice(
        &mut self,
        range: Range<usize>,
        replacement: impl IntoIterator<Item = Run>,
    ) -> ComposeResult<Vec<Run>> {
        self.check_range(&range)?;
        let Range { start, end } = range;

        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut removed = Vec::new();
        let mut run_start = 0;

        for run in std::mem::take(&mut self.runs) {
            let run_len = run.len();
            let run_end = run_start + run_len;

            if run_end <= start {
                before.push(run);
            } else if run_start >= end {
                after.push(run);
            } else {
                match run {
                    Run::Text { content } => {
                        let cut_from = start.saturating_sub(run_start).min(run_len);
                        let cut_to = end.saturating_sub(run_start).min(run_len);
                        let from_byte = byte_index(&content, cut_from);
                        let to_byte = byte_index(&content, cut_to);
                        before.push(Run::text(&content[..from_byte]));
                        if to_byte > from_byte {
                            removed.push(Run::text(&content[from_byte..to_byte]));
                        }
                        after.push(Run::text(&content[to_byte..]));
                    }
                    object @ Run::Object { .. } => removed.push(object),
                }
            }
            run_start = run_end;
        }

        before.extend(replacement);
        before.extend(after);
        self.runs = normalize(before);
        self.len = self.runs.iter().map(Run::len).sum();
        Ok(normalize(removed))
    }

    /// Removes every run.
    pub fn clear(&mut self) -> Vec<Run> {
        self.len = 0;
        std::mem::take(&mut self.runs)
    }

    fn check_range(&self, range: &Range<usize>) -> ComposeResult<()> {
        if range.start > range.end || range.end > self.len {
            return Err(ComposeError::Range {
                start: range.start,
                end: range.end,
                length: self.len,
            });
        }
        Ok(())
    }
}

/// Drops empty text runs and merges neighbouring text runs.
fn normalize(runs: Vec<Run>) -> Vec<Run> {
    let mut out: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match run {
            Run::Text { content } if content.is_empty() => {}
            Run::Text { content } => match out.last_mut() {
                Some(Run::Text { content: previous }) => previous.push_str(&content),
                _ => out.push(Run::Text { content }),
            },
            object @ Run::Object { .. } => out.push(object),
        }
    }
    out
}
