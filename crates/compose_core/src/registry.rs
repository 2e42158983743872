//! Atomic object registry.
//!
//! # Responsibility
//! - Own metadata for every atomic object referenced by the text buffer.
//! - Allocate fresh object ids.
//!
//! # Invariants
//! - An id resolves only while an object run references it.
//! - `release` is idempotent.

use crate::error::{ComposeError, ComposeResult};
use crate::model::object::{AtomicObject, ObjectId};
use log::debug;
use std::collections::HashMap;

/// In-memory registry keyed by object id.
#[derive(Debug, Default, Clone)]
pub struct ObjectRegistry {
    objects: HashMap<ObjectId, AtomicObject>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one object and returns its fresh id.
    pub fn register(
        &mut self,
        source: impl Into<String>,
        alt_text: impl Into<String>,
        category: impl Into<String>,
    ) -> ObjectId {
        let object = AtomicObject::new(source, alt_text, category);
        let id = object.id;
        debug!(
            "event=object_register module=registry status=ok object_id={} category={}",
            id, object.category
        );
        self.objects.insert(id, object);
        id
    }

    /// Looks up a live object.
    ///
    /// # Errors
    /// - `ComposeError::NotFound` when the id was never registered or has
    ///   been released.
    pub fn resolve(&self, id: ObjectId) -> ComposeResult<&AtomicObject> {
        self.objects.get(&id).ok_or(ComposeError::NotFound(id))
    }

    /// Drops one object. Unknown ids are ignored.
    pub fn release(&mut self, id: ObjectId) {
        if self.objects.remove(&id).is_some() {
            debug!("event=object_release module=registry status=ok object_id={id}");
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectRegistry;
    use crate::error::ComposeError;

    #[test]
    fn register_then_resolve() {
        let mut registry = ObjectRegistry::new();
        let id = registry.register("x.png", "😀", "emoji");
        let object = registry.resolve(id).expect("registered object");
        assert_eq!(object.source, "x.png");
        assert_eq!(object.alt_text, "😀");
        assert_eq!(object.category, "emoji");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn release_is_idempotent() {
        let mut registry = ObjectRegistry::new();
        let id = registry.register("x.png", "😀", "emoji");
        registry.release(id);
        registry.release(id);
        assert!(registry.is_empty());
        assert_eq!(
            registry.resolve(id).expect_err("released id"),
            ComposeError::NotFound(id)
        );
    }
}
