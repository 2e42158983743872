//! Mount-point binding: the entry point hosts use.
//!
//! # Responsibility
//! - Bind one engine to one mount point and hand back its handle.
//! - Expose the host-facing operations of a compose area.
//!
//! # Invariants
//! - At most one live handle per mount identifier in a process.
//! - Dropping a handle releases its mount identifier.
//! - Mount identifiers are trimmed and must look like element ids.

use crate::config::ComposeConfig;
use crate::engine::EditEngine;
use crate::error::{ComposeError, ComposeResult};
use crate::model::object::ObjectId;
use crate::model::selection::SelectionRange;
use crate::surface::SurfaceAdapter;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::{Mutex, MutexGuard};

static MOUNT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:.\-]*$").expect("valid mount id regex"));
static BOUND_MOUNTS: Lazy<Mutex<BTreeSet<String>>> = Lazy::new(|| Mutex::new(BTreeSet::new()));

/// Binds an engine to `mount_point` using env-derived configuration.
///
/// # Errors
/// - `ComposeError::InvalidMountPoint` for blank or malformed identifiers.
/// - `ComposeError::AlreadyBound` when another live handle owns the mount.
pub fn bind<S: SurfaceAdapter>(mount_point: &str, surface: S) -> ComposeResult<ComposeArea<S>> {
    bind_with_config(mount_point, surface, ComposeConfig::from_env())
}

/// Binds an engine to `mount_point` with an explicit configuration.
pub fn bind_with_config<S: SurfaceAdapter>(
    mount_point: &str,
    surface: S,
    config: ComposeConfig,
) -> ComposeResult<ComposeArea<S>> {
    let mount_point = normalize_mount_point(mount_point)?;
    {
        let mut bound = bound_mounts();
        if !bound.insert(mount_point.clone()) {
            return Err(ComposeError::AlreadyBound(mount_point));
        }
    }

    let line_breaks = config.line_breaks;
    let engine = match EditEngine::new(surface, config) {
        Ok(engine) => engine,
        Err(err) => {
            bound_mounts().remove(&mount_point);
            return Err(err);
        }
    };

    info!(
        "event=engine_bind module=binding status=ok mount={} line_breaks={}",
        mount_point,
        line_breaks.as_str()
    );
    Ok(ComposeArea {
        mount_point,
        engine,
    })
}

/// Returns whether `mount_point` currently has a live handle.
pub fn is_bound(mount_point: &str) -> bool {
    bound_mounts().contains(mount_point.trim())
}

fn bound_mounts() -> MutexGuard<'static, BTreeSet<String>> {
    // A panic while holding the lock cannot leave the set half-updated.
    BOUND_MOUNTS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn normalize_mount_point(value: &str) -> ComposeResult<String> {
    let trimmed = value.trim();
    if !MOUNT_ID_RE.is_match(trimmed) {
        return Err(ComposeError::InvalidMountPoint(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Handle to one bound compose area.
pub struct ComposeArea<S: SurfaceAdapter> {
    mount_point: String,
    engine: EditEngine<S>,
}

impl<S: SurfaceAdapter> ComposeArea<S> {
    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    pub fn engine(&self) -> &EditEngine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EditEngine<S> {
        &mut self.engine
    }

    pub fn surface(&self) -> &S {
        self.engine.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.engine.surface_mut()
    }

    /// Serialized document text.
    pub fn get_text(&self) -> String {
        self.engine.get_text()
    }

    /// Display text using the configured trimming.
    pub fn extract_text(&self) -> ComposeResult<String> {
        self.engine.extract_text(self.engine.config().trim_extracted_text)
    }

    /// Display text, trimmed unless `no_trim` is set.
    pub fn extract_text_with(&self, no_trim: bool) -> ComposeResult<String> {
        self.engine.extract_text(!no_trim)
    }

    /// Captures the host's native selection; returns whether it changed.
    pub fn store_selection_range(&mut self) -> bool {
        self.engine.store_selection()
    }

    pub fn fetch_range(&self) -> SelectionRange {
        self.engine.fetch_selection()
    }

    /// Places the selection programmatically and pushes it to the host.
    pub fn set_selection_range(&mut self, anchor: usize, focus: usize) -> ComposeResult<()> {
        self.engine.set_selection(SelectionRange::new(anchor, focus))
    }

    pub fn restore_selection(&mut self) -> ComposeResult<()> {
        self.engine.restore_selection()
    }

    pub fn insert_text(&mut self, text: &str) -> ComposeResult<()> {
        self.engine.insert_text(text)
    }

    pub fn insert_image(
        &mut self,
        source: &str,
        alt_text: &str,
        category: &str,
    ) -> ComposeResult<ObjectId> {
        self.engine.insert_object(source, alt_text, category)
    }

    pub fn delete_range(&mut self, range: Range<usize>) -> ComposeResult<()> {
        self.engine.delete_range(range)
    }

    pub fn delete_selection(&mut self) -> ComposeResult<bool> {
        self.engine.delete_selection()
    }

    pub fn composition_start(&mut self) {
        self.engine.begin_composition();
    }

    pub fn composition_end(&mut self, committed: Option<&str>) -> ComposeResult<()> {
        self.engine.end_composition(committed)
    }

    pub fn reset(&mut self) -> ComposeResult<()> {
        self.engine.reset()
    }

    /// Releases the mount point. Equivalent to dropping the handle.
    pub fn unbind(self) {}
}

impl<S: SurfaceAdapter> Drop for ComposeArea<S> {
    fn drop(&mut self) {
        bound_mounts().remove(&self.mount_point);
        info!(
            "event=engine_unbind module=binding status=ok mount={}",
            self.mount_point
        );
    }
}
