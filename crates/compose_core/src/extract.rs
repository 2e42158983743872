//! Human-readable text extraction.
//!
//! # Responsibility
//! - Produce the text a user would copy out of the compose area: objects
//!   become their alt text, line breaks stay `\n`.
//!
//! # Invariants
//! - Extraction never mutates the buffer or the registry.
//! - Unlike `TextBuffer::serialize`, output offsets do not correspond to
//!   logical offsets.

use crate::buffer::TextBuffer;
use crate::error::ComposeResult;
use crate::model::run::Run;
use crate::registry::ObjectRegistry;
use once_cell::sync::Lazy;
use regex::Regex;

static LINE_ENDING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("valid line ending regex"));

/// Extracts display text, trimming surrounding whitespace when `trim` is set.
///
/// # Errors
/// - `ComposeError::NotFound` when an object run has no registry entry.
pub fn extract_text(
    buffer: &TextBuffer,
    registry: &ObjectRegistry,
    trim: bool,
) -> ComposeResult<String> {
    let mut out = String::with_capacity(buffer.len());
    for run in buffer.runs() {
        match run {
            Run::Text { content } => out.push_str(content),
            Run::Object { id } => out.push_str(&registry.resolve(*id)?.alt_text),
        }
    }
    if trim {
        Ok(out.trim().to_string())
    } else {
        Ok(out)
    }
}

/// Rewrites `\r\n` and lone `\r` as `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    LINE_ENDING_RE.replace_all(text, "\n").into_owned()
}
