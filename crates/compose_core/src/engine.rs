//! Edit engine.
//!
//! # Responsibility
//! - Own the document state (buffer, registry, mapper, tracker) and the host
//!   surface of one compose area.
//! - Implement insert/delete operations with selection-replacement semantics.
//! - Guard programmatic edits against an active platform composition.
//!
//! # Invariants
//! - Mutations are all-or-nothing: splice, render, registry release and
//!   selection collapse happen together or not at all.
//! - Every successful mutation re-renders the surface and restores the
//!   collapsed caret onto it.
//! - While `Composing`, every mutation fails with `CompositionInProgress`.

use crate::buffer::TextBuffer;
use crate::config::ComposeConfig;
use crate::error::{ComposeError, ComposeResult};
use crate::extract::{extract_text, normalize_line_endings};
use crate::mapper::OffsetMapper;
use crate::model::object::{ObjectId, OBJECT_LEN};
use crate::model::run::Run;
use crate::model::selection::SelectionRange;
use crate::registry::ObjectRegistry;
use crate::selection::SelectionTracker;
use crate::surface::SurfaceAdapter;
use log::{debug, info, warn};
use std::ops::Range;

/// Input state of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    /// A platform composition (IME) session is open.
    Composing,
}

/// Document/selection engine bound to one surface.
pub struct EditEngine<S: SurfaceAdapter> {
    config: ComposeConfig,
    buffer: TextBuffer,
    registry: ObjectRegistry,
    mapper: OffsetMapper,
    tracker: SelectionTracker,
    surface: S,
    state: EngineState,
}

impl<S: SurfaceAdapter> EditEngine<S> {
    /// Creates an engine with an empty document and renders it.
    pub fn new(surface: S, config: ComposeConfig) -> ComposeResult<Self> {
        let mut engine = Self {
            buffer: TextBuffer::with_placeholder(config.placeholder),
            registry: ObjectRegistry::new(),
            mapper: OffsetMapper::new(config.line_breaks),
            tracker: SelectionTracker::new(),
            surface,
            state: EngineState::Idle,
            config,
        };
        let tree = engine.mapper.rebuild(&engine.buffer, &engine.registry)?;
        engine.surface.render(&tree);
        Ok(engine)
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &OffsetMapper {
        &self.mapper
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable surface access for hosts that drive it directly.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        self.state == EngineState::Composing
    }

    /// Serialized document, one placeholder per object.
    pub fn get_text(&self) -> String {
        self.buffer.serialize()
    }

    /// Display text with objects replaced by alt text.
    pub fn extract_text(&self, trim: bool) -> ComposeResult<String> {
        extract_text(&self.buffer, &self.registry, trim)
    }

    /// Captures the host's native selection. See [`SelectionTracker::store`].
    pub fn store_selection(&mut self) -> bool {
        self.tracker.store(&self.surface, &self.mapper)
    }

    /// Last stored selection.
    pub fn fetch_selection(&self) -> SelectionRange {
        self.tracker.fetch()
    }

    /// Re-applies the stored selection to the host.
    pub fn restore_selection(&mut self) -> ComposeResult<()> {
        self.tracker.clamp_to(self.buffer.len());
        self.tracker.restore(&mut self.surface, &self.mapper)?;
        Ok(())
    }

    /// Stores `range` (clamped) without reading the host, then restores it.
    pub fn set_selection(&mut self, range: SelectionRange) -> ComposeResult<()> {
        self.tracker.set(range, self.buffer.len());
        self.tracker.restore(&mut self.surface, &self.mapper)?;
        Ok(())
    }

    /// Replaces the stored selection with `text` and places the caret after it.
    ///
    /// `\r\n` and `\r` are stored as `\n`.
    ///
    /// # Errors
    /// - `ComposeError::CompositionInProgress` while composing.
    pub fn insert_text(&mut self, text: &str) -> ComposeResult<()> {
        self.ensure_idle("insert_text")?;
        let text = normalize_line_endings(text);
        let range = self.selection_range();
        let caret = range.start + text.chars().count();
        self.apply(range, vec![Run::text(text)], caret)?;
        info!(
            "event=insert_text module=engine status=ok caret={} length={}",
            caret,
            self.buffer.len()
        );
        Ok(())
    }

    /// Replaces the stored selection with a new atomic object.
    ///
    /// # Errors
    /// - `ComposeError::CompositionInProgress` while composing.
    pub fn insert_object(
        &mut self,
        source: &str,
        alt_text: &str,
        category: &str,
    ) -> ComposeResult<ObjectId> {
        self.ensure_idle("insert_object")?;
        let range = self.selection_range();
        let caret = range.start + OBJECT_LEN;
        let id = self.registry.register(source, alt_text, category);
        if let Err(err) = self.apply(range, vec![Run::object(id)], caret) {
            self.registry.release(id);
            return Err(err);
        }
        info!(
            "event=insert_object module=engine status=ok object_id={} caret={}",
            id, caret
        );
        Ok(id)
    }

    /// Removes `range` and collapses the selection to its start.
    ///
    /// # Errors
    /// - `ComposeError::Range` for reversed or overlong ranges.
    /// - `ComposeError::CompositionInProgress` while composing.
    pub fn delete_range(&mut self, range: Range<usize>) -> ComposeResult<()> {
        self.ensure_idle("delete_range")?;
        let caret = range.start;
        let removed = range.end.saturating_sub(range.start);
        self.apply(range, Vec::new(), caret)?;
        info!(
            "event=delete_range module=engine status=ok removed={} caret={}",
            removed, caret
        );
        Ok(())
    }

    /// Deletes the stored selection if it is a range.
    ///
    /// Returns `false` (and changes nothing) for a collapsed selection.
    pub fn delete_selection(&mut self) -> ComposeResult<bool> {
        let range = self.selection_range();
        if range.is_empty() {
            return Ok(false);
        }
        self.delete_range(range)?;
        Ok(true)
    }

    /// Marks the start of a platform composition session.
    pub fn begin_composition(&mut self) {
        if self.state == EngineState::Composing {
            return;
        }
        self.state = EngineState::Composing;
        debug!("event=composition_start module=engine status=ok");
    }

    /// Ends the composition session and inserts the committed text, if any.
    pub fn end_composition(&mut self, committed: Option<&str>) -> ComposeResult<()> {
        self.state = EngineState::Idle;
        debug!("event=composition_end module=engine status=ok");
        match committed {
            Some(text) if !text.is_empty() => self.insert_text(text),
            _ => Ok(()),
        }
    }

    /// Drops the whole document and starts over with an empty one.
    ///
    /// # Errors
    /// - `ComposeError::CompositionInProgress` while composing.
    pub fn reset(&mut self) -> ComposeResult<()> {
        self.ensure_idle("reset")?;
        let removed = self.buffer.clear();
        self.registry.clear();
        // An empty buffer references no objects, so this rebuild cannot fail.
        let tree = self.mapper.rebuild(&self.buffer, &self.registry)?;
        self.surface.render(&tree);
        self.tracker.collapse_to(0);
        self.tracker.restore(&mut self.surface, &self.mapper)?;
        info!(
            "event=document_reset module=engine status=ok removed_runs={}",
            removed.len()
        );
        Ok(())
    }

    fn selection_range(&self) -> Range<usize> {
        self.tracker.fetch().clamped(self.buffer.len()).as_range()
    }

    fn ensure_idle(&self, operation: &str) -> ComposeResult<()> {
        if self.state == EngineState::Composing {
            warn!(
                "event={} module=engine status=rejected error_code=composition_in_progress",
                operation
            );
            return Err(ComposeError::CompositionInProgress);
        }
        Ok(())
    }

    /// Splices a copy of the buffer and commits it only once it rendered.
    fn apply(
        &mut self,
        range: Range<usize>,
        replacement: Vec<Run>,
        caret: usize,
    ) -> ComposeResult<()> {
        let mut next = self.buffer.clone();
        let removed = next.splice(range, replacement)?;
        let tree = self.mapper.rebuild(&next, &self.registry)?;

        self.buffer = next;
        for id in removed.iter().filter_map(Run::object_id) {
            self.registry.release(id);
        }
        self.surface.render(&tree);
        self.tracker.collapse_to(caret);
        self.tracker.restore(&mut self.surface, &self.mapper)?;
        Ok(())
    }
}
