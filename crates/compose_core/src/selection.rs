//! Selection tracker.
//!
//! # Responsibility
//! - Capture the host's native selection as logical offsets (`store`).
//! - Hand out the last stored selection without touching the host (`fetch`).
//! - Push the stored selection back onto the host (`restore`).
//!
//! # Invariants
//! - A store with no native selection keeps the previous value.
//! - Structural addresses are converted immediately and never kept.
//! - Stored endpoints are always within the mapper's document length.

use crate::error::ComposeResult;
use crate::mapper::OffsetMapper;
use crate::model::selection::{LogicalOffset, SelectionRange};
use crate::surface::{NativeSelection, SurfaceAdapter};
use log::debug;

/// Last known logical selection of one compose area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    stored: SelectionRange,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the native selection and overwrites the stored range.
    ///
    /// Returns whether the stored range was updated.
    pub fn store(&mut self, surface: &impl SurfaceAdapter, mapper: &OffsetMapper) -> bool {
        let Some(report) = surface.query_selection() else {
            debug!("event=selection_store module=selection status=skipped reason=no_selection");
            return false;
        };

        let anchor = mapper.to_logical_in(&report.selection.anchor, &report.live_children);
        let focus = mapper.to_logical_in(&report.selection.focus, &report.live_children);
        self.stored = SelectionRange::new(anchor, focus);
        debug!(
            "event=selection_store module=selection status=ok anchor={} focus={}",
            anchor, focus
        );
        true
    }

    /// Last stored range. Does not query the host.
    pub fn fetch(&self) -> SelectionRange {
        self.stored
    }

    /// Applies the stored range to the host as a native selection.
    ///
    /// # Errors
    /// - `ComposeError::OutOfRange` if the stored range no longer fits the
    ///   mapper's layout; callers clamp before restoring.
    pub fn restore(
        &self,
        surface: &mut impl SurfaceAdapter,
        mapper: &OffsetMapper,
    ) -> ComposeResult<NativeSelection> {
        let selection = NativeSelection::new(
            mapper.to_structural(self.stored.anchor)?,
            mapper.to_structural(self.stored.focus)?,
        );
        surface.apply_selection(&selection);
        debug!(
            "event=selection_restore module=selection status=ok range={}",
            self.stored
        );
        Ok(selection)
    }

    /// Overwrites the stored range, clamped to `length`.
    pub fn set(&mut self, range: SelectionRange, length: usize) {
        self.stored = range.clamped(length);
    }

    /// Collapses the stored range to a caret at `offset`.
    pub fn collapse_to(&mut self, offset: LogicalOffset) {
        self.stored = SelectionRange::caret(offset);
    }

    /// Clamps the stored endpoints after the document shrank.
    pub fn clamp_to(&mut self, length: usize) {
        self.stored = self.stored.clamped(length);
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionTracker;
    use crate::buffer::TextBuffer;
    use crate::config::LineBreakMode;
    use crate::mapper::OffsetMapper;
    use crate::model::run::Run;
    use crate::model::selection::SelectionRange;
    use crate::registry::ObjectRegistry;
    use crate::surface::mirror::MirrorSurface;
    use crate::surface::{NativeSelection, StructuralAddress, SurfaceAdapter};

    fn rendered(text: &str) -> (OffsetMapper, MirrorSurface) {
        let mut buffer = TextBuffer::new();
        buffer.splice(0..0, [Run::text(text)]).expect("seed");
        let mut mapper = OffsetMapper::new(LineBreakMode::Element);
        let tree = mapper
            .rebuild(&buffer, &ObjectRegistry::new())
            .expect("render");
        let mut surface = MirrorSurface::new();
        surface.render(&tree);
        (mapper, surface)
    }

    #[test]
    fn store_converts_native_selection_and_keeps_direction() {
        let (mapper, mut surface) = rendered("abcd");
        let node = surface.child_id(0).expect("text node");
        surface.set_native_selection(NativeSelection::new(
            StructuralAddress::offset(node, 3),
            StructuralAddress::offset(node, 1),
        ));

        let mut tracker = SelectionTracker::new();
        assert!(tracker.store(&surface, &mapper));
        assert_eq!(tracker.fetch(), SelectionRange::new(3, 1));
    }

    #[test]
    fn store_without_native_selection_keeps_previous_value() {
        let (mapper, surface) = rendered("abcd");
        let mut tracker = SelectionTracker::new();
        tracker.set(SelectionRange::new(1, 2), mapper.len());

        assert!(!tracker.store(&surface, &mapper));
        assert_eq!(tracker.fetch(), SelectionRange::new(1, 2));
    }

    #[test]
    fn restore_applies_structural_addresses() {
        let (mapper, mut surface) = rendered("abcd");
        let mut tracker = SelectionTracker::new();
        tracker.set(SelectionRange::new(0, 4), mapper.len());

        let applied = tracker.restore(&mut surface, &mapper).expect("restore");
        let node = surface.child_id(0).expect("text node");
        assert_eq!(applied.anchor, StructuralAddress::offset(node, 0));
        assert_eq!(applied.focus, StructuralAddress::offset(node, 4));
        assert_eq!(surface.native_selection(), Some(&applied));
    }

    #[test]
    fn set_clamps_to_document_length() {
        let mut tracker = SelectionTracker::new();
        tracker.set(SelectionRange::new(10, 2), 4);
        assert_eq!(tracker.fetch(), SelectionRange::new(4, 2));
        tracker.clamp_to(1);
        assert_eq!(tracker.fetch(), SelectionRange::new(1, 1));
    }
}
