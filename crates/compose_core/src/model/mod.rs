//! Document data model.
//!
//! # Responsibility
//! - Define runs, atomic objects and logical selections.
//! - Keep the model free of any host-surface types.
//!
//! # Invariants
//! - Logical length of a document equals the sum of its run lengths.
//! - Atomic objects always count as exactly one character.

pub mod object;
pub mod run;
pub mod selection;
