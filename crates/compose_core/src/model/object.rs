//! Atomic inline object model.
//!
//! # Responsibility
//! - Describe inline non-text elements (emoji images and similar).
//!
//! # Invariants
//! - Every object occupies exactly one logical offset slot.
//! - `id` is unique within one document and never reused.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one atomic object.
pub type ObjectId = Uuid;

/// Logical length of every atomic object.
pub const OBJECT_LEN: usize = 1;

/// Metadata for one inline non-text element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicObject {
    pub id: ObjectId,
    /// Image source or other host-resolvable reference.
    pub source: String,
    /// Human-readable stand-in, used by text extraction.
    pub alt_text: String,
    /// Free-form tag such as `emoji`.
    pub category: String,
}

impl AtomicObject {
    /// Creates an object with a freshly generated id.
    pub fn new(
        source: impl Into<String>,
        alt_text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            alt_text: alt_text.into(),
            category: category.into(),
        }
    }

    /// Debug markup matching how hosts typically render the object.
    pub fn html(&self) -> String {
        format!(
            r#"<img src="{}" alt="{}" class="{}">"#,
            escape_attr(&self.source),
            escape_attr(&self.alt_text),
            escape_attr(&self.category)
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
