//! Run model: the tagged spans that make up a document.
//!
//! # Invariants
//! - A `Run::Text` inside a buffer is never empty.
//! - `Run::Object` always has logical length [`OBJECT_LEN`].

use crate::model::object::{ObjectId, OBJECT_LEN};
use serde::{Deserialize, Serialize};

/// One contiguous span of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Run {
    /// Plain characters, including `\n` line breaks.
    Text { content: String },
    /// Reference to one registered atomic object.
    Object { id: ObjectId },
}

impl Run {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    pub fn object(id: ObjectId) -> Self {
        Self::Object { id }
    }

    /// Logical length in characters.
    pub fn len(&self) -> usize {
        match self {
            Self::Text { content } => content.chars().count(),
            Self::Object { .. } => OBJECT_LEN,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text { content } => content.is_empty(),
            Self::Object { .. } => false,
        }
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Object { id } => Some(*id),
            Self::Text { .. } => None,
        }
    }
}

/// Returns the byte index of the `char_offset`-th character of `text`.
///
/// Offsets at or past the end map to `text.len()`.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
