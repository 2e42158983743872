//! Engine error taxonomy.
//!
//! # Responsibility
//! - Give every fallible engine operation one explicit error type.
//! - Keep caller mistakes (`Range`, `OutOfRange`, `NotFound`) distinct from
//!   transient host state (`CompositionInProgress`).
//!
//! # Invariants
//! - Returning an error never leaves the text buffer partially mutated.
//! - Drift between the model and the host surface is not an error; the
//!   offset mapper recovers from it silently.

use crate::model::object::ObjectId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors surfaced by the compose engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    /// Range arithmetic is invalid (`start > end` or `end > length`).
    Range {
        start: usize,
        end: usize,
        length: usize,
    },
    /// Object id is not referenced by any run.
    NotFound(ObjectId),
    /// Offset passed to the mapper exceeds the document length.
    OutOfRange { offset: usize, length: usize },
    /// A platform composition session is active; retry after it ends.
    CompositionInProgress,
    /// The mount point already has an engine bound to it.
    AlreadyBound(String),
    /// The mount point identifier is blank or malformed.
    InvalidMountPoint(String),
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Range { start, end, length } => write!(
                f,
                "invalid range [{start}, {end}) for document of length {length}"
            ),
            Self::NotFound(id) => write!(f, "atomic object not found: {id}"),
            Self::OutOfRange { offset, length } => write!(
                f,
                "offset {offset} is out of range for document of length {length}"
            ),
            Self::CompositionInProgress => {
                write!(f, "composition in progress; retry after it ends")
            }
            Self::AlreadyBound(mount) => write!(f, "mount point already bound: {mount}"),
            Self::InvalidMountPoint(mount) => write!(f, "invalid mount point: `{mount}`"),
        }
    }
}

impl Error for ComposeError {}

impl ComposeError {
    /// Stable snake_case code used in log events and FFI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range_error",
            Self::NotFound(_) => "not_found",
            Self::OutOfRange { .. } => "out_of_range",
            Self::CompositionInProgress => "composition_in_progress",
            Self::AlreadyBound(_) => "already_bound",
            Self::InvalidMountPoint(_) => "invalid_mount_point",
        }
    }

    /// Returns whether the caller may retry the same call later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::CompositionInProgress)
    }
}
