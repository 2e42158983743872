//! FFI use-case API for Flutter-facing compose areas.
//!
//! # Responsibility
//! - Expose mount-keyed compose operations to Dart via FRB.
//! - Own the bound areas on behalf of the host, one per mount id.
//! - Translate host-native selections (node id + offset) into engine calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every failure is reported in the response envelope, never thrown.
//! - Offsets crossing the boundary are logical character offsets.

use compose_core::{
    bind, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, ComposeArea, MirrorSurface, NativeSelection, NodeId, RenderedContent,
    SelectionRange, StructuralAddress,
};
use log::warn;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, OnceLock};

type AreaMap = BTreeMap<String, ComposeArea<MirrorSurface>>;

static AREAS: OnceLock<Mutex<AreaMap>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Stable error code on failure (`range|not_found|...`).
    pub error_code: Option<String>,
    /// Optional inserted object ID.
    pub object_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ComposeActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            error_code: None,
            object_id: None,
            message: message.into(),
        }
    }

    fn failure(failure: Failure) -> Self {
        Self {
            ok: false,
            error_code: failure.code,
            object_id: None,
            message: failure.message,
        }
    }
}

/// Text response envelope for `get_text` and `extract_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeTextResponse {
    pub ok: bool,
    pub text: String,
    pub message: String,
}

/// Logical selection response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeSelectionResponse {
    pub ok: bool,
    pub anchor: u32,
    pub focus: u32,
    /// Whether a store call captured a new native selection.
    pub changed: bool,
    pub message: String,
}

/// One rendered child of the mount root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeNodeItem {
    pub node_id: u64,
    /// Node kind (`text|object|line_break`).
    pub kind: String,
    /// Text content for text nodes; alt text for objects.
    pub text: String,
    pub html: String,
}

/// Render snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRenderResponse {
    pub ok: bool,
    pub nodes: Vec<ComposeNodeItem>,
    pub message: String,
}

struct Failure {
    code: Option<String>,
    message: String,
}

impl Failure {
    fn compose(op: &str, err: compose_core::ComposeError) -> Self {
        Self {
            code: Some(err.code().to_string()),
            message: format!("{op} failed: {err}"),
        }
    }

    fn unbound(op: &str, mount_id: &str) -> Self {
        Self {
            code: Some("not_bound".to_string()),
            message: format!("{op} failed: no compose area bound to `{}`", mount_id.trim()),
        }
    }
}

/// Binds a new compose area to `mount_id`.
///
/// # FFI contract
/// - Sync call, in-memory.
/// - Fails when the mount id is malformed or already bound.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_bind(mount_id: String) -> ComposeActionResponse {
    match bind(&mount_id, MirrorSurface::new()) {
        Ok(area) => {
            let key = area.mount_point().to_string();
            areas().insert(key.clone(), area);
            ComposeActionResponse::success(format!("Bound `{key}`."))
        }
        Err(err) => ComposeActionResponse::failure(Failure::compose("compose_bind", err)),
    }
}

/// Releases the compose area bound to `mount_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_unbind(mount_id: String) -> ComposeActionResponse {
    match areas().remove(mount_id.trim()) {
        Some(area) => {
            area.unbind();
            ComposeActionResponse::success("Unbound.")
        }
        None => ComposeActionResponse::failure(Failure::unbound("compose_unbind", &mount_id)),
    }
}

/// Serialized document text; objects appear as the placeholder character.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_get_text(mount_id: String) -> ComposeTextResponse {
    text_response(with_area(&mount_id, "compose_get_text", |area| {
        Ok(area.get_text())
    }))
}

/// Display text; objects appear as their alt text.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_extract_text(mount_id: String, no_trim: bool) -> ComposeTextResponse {
    text_response(with_area(&mount_id, "compose_extract_text", |area| {
        area.extract_text_with(no_trim)
            .map_err(|err| Failure::compose("compose_extract_text", err))
    }))
}

/// Inserts text at the stored selection, replacing it when non-collapsed.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_insert_text(mount_id: String, text: String) -> ComposeActionResponse {
    action_response(
        with_area(&mount_id, "compose_insert_text", |area| {
            area.insert_text(&text)
                .map_err(|err| Failure::compose("compose_insert_text", err))
        }),
        "Text inserted.",
    )
}

/// Inserts an image object at the stored selection.
///
/// Returns the new object's id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_insert_image(
    mount_id: String,
    source: String,
    alt_text: String,
    category: String,
) -> ComposeActionResponse {
    let result = with_area(&mount_id, "compose_insert_image", |area| {
        area.insert_image(&source, &alt_text, &category)
            .map_err(|err| Failure::compose("compose_insert_image", err))
    });
    match result {
        Ok(object_id) => ComposeActionResponse {
            object_id: Some(object_id.to_string()),
            ..ComposeActionResponse::success("Image inserted.")
        },
        Err(failure) => ComposeActionResponse::failure(failure),
    }
}

/// Deletes the stored selection; a collapsed selection is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_delete_selection(mount_id: String) -> ComposeActionResponse {
    let result = with_area(&mount_id, "compose_delete_selection", |area| {
        area.delete_selection()
            .map_err(|err| Failure::compose("compose_delete_selection", err))
    });
    match result {
        Ok(true) => ComposeActionResponse::success("Selection deleted."),
        Ok(false) => ComposeActionResponse::success("Nothing to delete."),
        Err(failure) => ComposeActionResponse::failure(failure),
    }
}

/// Records the host's native selection on the area's surface mirror.
///
/// `*_node` is a node id from the latest render (`0` for the mount root),
/// `*_offset` counts characters in text nodes and children elsewhere.
///
/// `live_children` is the mount root's current child order, including nodes
/// the host created natively. Empty means the order of the latest render.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_report_native_selection(
    mount_id: String,
    anchor_node: u64,
    anchor_offset: u32,
    focus_node: u64,
    focus_offset: u32,
    live_children: Vec<u64>,
) -> ComposeActionResponse {
    action_response(
        with_area(&mount_id, "compose_report_native_selection", |area| {
            let surface = area.surface_mut();
            surface.set_native_selection(NativeSelection::new(
                StructuralAddress::offset(NodeId(anchor_node), anchor_offset as usize),
                StructuralAddress::offset(NodeId(focus_node), focus_offset as usize),
            ));
            if live_children.is_empty() {
                surface.clear_live_children();
            } else {
                surface.set_live_children(live_children.into_iter().map(NodeId).collect());
            }
            Ok(())
        }),
        "Native selection recorded.",
    )
}

/// Drops the host's native selection (surface lost focus).
#[flutter_rust_bridge::frb(sync)]
pub fn compose_clear_native_selection(mount_id: String) -> ComposeActionResponse {
    action_response(
        with_area(&mount_id, "compose_clear_native_selection", |area| {
            area.surface_mut().clear_native_selection();
            Ok(())
        }),
        "Native selection cleared.",
    )
}

/// Captures the native selection as logical offsets.
///
/// `changed=false` means no native selection existed and the previous
/// stored range is returned unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_store_selection(mount_id: String) -> ComposeSelectionResponse {
    selection_response(with_area(&mount_id, "compose_store_selection", |area| {
        let changed = area.store_selection_range();
        Ok((area.fetch_range(), changed))
    }))
}

/// Last stored logical selection. Does not query the host.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_fetch_range(mount_id: String) -> ComposeSelectionResponse {
    selection_response(with_area(&mount_id, "compose_fetch_range", |area| {
        Ok((area.fetch_range(), false))
    }))
}

/// Places the selection programmatically; endpoints clamp to the document.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_set_selection(mount_id: String, anchor: u32, focus: u32) -> ComposeSelectionResponse {
    selection_response(with_area(&mount_id, "compose_set_selection", |area| {
        area.set_selection_range(anchor as usize, focus as usize)
            .map_err(|err| Failure::compose("compose_set_selection", err))?;
        Ok((area.fetch_range(), true))
    }))
}

/// Marks the start of a platform composition session.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_composition_start(mount_id: String) -> ComposeActionResponse {
    action_response(
        with_area(&mount_id, "compose_composition_start", |area| {
            area.composition_start();
            Ok(())
        }),
        "Composition started.",
    )
}

/// Ends a composition session, committing `committed` when present.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_composition_end(
    mount_id: String,
    committed: Option<String>,
) -> ComposeActionResponse {
    action_response(
        with_area(&mount_id, "compose_composition_end", |area| {
            area.composition_end(committed.as_deref())
                .map_err(|err| Failure::compose("compose_composition_end", err))
        }),
        "Composition ended.",
    )
}

/// Snapshot of the latest render, for hosts that paint it themselves.
#[flutter_rust_bridge::frb(sync)]
pub fn compose_rendered_nodes(mount_id: String) -> ComposeRenderResponse {
    let result = with_area(&mount_id, "compose_rendered_nodes", |area| {
        Ok(area
            .surface()
            .tree()
            .nodes
            .iter()
            .map(|node| {
                let (kind, text) = match &node.content {
                    RenderedContent::Text { content } => ("text", content.clone()),
                    RenderedContent::Object { object } => ("object", object.alt_text.clone()),
                    RenderedContent::LineBreak => ("line_break", "\n".to_string()),
                };
                ComposeNodeItem {
                    node_id: node.id.0,
                    kind: kind.to_string(),
                    text,
                    html: node.html(),
                }
            })
            .collect::<Vec<_>>())
    });
    match result {
        Ok(nodes) => ComposeRenderResponse {
            message: format!("{} node(s).", nodes.len()),
            ok: true,
            nodes,
        },
        Err(failure) => ComposeRenderResponse {
            ok: false,
            nodes: Vec::new(),
            message: failure.message,
        },
    }
}

fn areas() -> MutexGuard<'static, AreaMap> {
    AREAS
        .get_or_init(|| Mutex::new(BTreeMap::new()))
        .lock()
        .unwrap_or_else(|poisoned| {
            warn!("event=ffi_lock_recovered module=ffi status=warn");
            poisoned.into_inner()
        })
}

fn with_area<T>(
    mount_id: &str,
    op: &str,
    f: impl FnOnce(&mut ComposeArea<MirrorSurface>) -> Result<T, Failure>,
) -> Result<T, Failure> {
    let mut areas = areas();
    let area = areas
        .get_mut(mount_id.trim())
        .ok_or_else(|| Failure::unbound(op, mount_id))?;
    f(area)
}

fn action_response(result: Result<(), Failure>, message: &str) -> ComposeActionResponse {
    match result {
        Ok(()) => ComposeActionResponse::success(message),
        Err(failure) => ComposeActionResponse::failure(failure),
    }
}

fn text_response(result: Result<String, Failure>) -> ComposeTextResponse {
    match result {
        Ok(text) => ComposeTextResponse {
            ok: true,
            text,
            message: String::new(),
        },
        Err(failure) => ComposeTextResponse {
            ok: false,
            text: String::new(),
            message: failure.message,
        },
    }
}

fn selection_response(result: Result<(SelectionRange, bool), Failure>) -> ComposeSelectionResponse {
    match result {
        Ok((range, changed)) => ComposeSelectionResponse {
            ok: true,
            anchor: to_ffi_offset(range.anchor),
            focus: to_ffi_offset(range.focus),
            changed,
            message: String::new(),
        },
        Err(failure) => ComposeSelectionResponse {
            ok: false,
            anchor: 0,
            focus: 0,
            changed: false,
            message: failure.message,
        },
    }
}

fn to_ffi_offset(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}
