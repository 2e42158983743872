//! Document and selection engine for rich-text compose areas.
//! Text interleaved with atomic inline objects, kept in sync with a host
//! editable surface through logical-offset <-> structural-address mapping.

pub mod binding;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod logging;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod selection;
pub mod surface;

pub use binding::{bind, bind_with_config, is_bound, ComposeArea};
pub use buffer::{TextBuffer, OBJECT_PLACEHOLDER};
pub use config::{ComposeConfig, ConfigError, LineBreakMode};
pub use engine::{EditEngine, EngineState};
pub use error::{ComposeError, ComposeResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use mapper::{LayoutNode, NodeKind, OffsetMapper};
pub use model::object::{AtomicObject, ObjectId};
pub use model::run::Run;
pub use model::selection::{LogicalOffset, SelectionRange};
pub use registry::ObjectRegistry;
pub use selection::SelectionTracker;
pub use surface::mirror::MirrorSurface;
pub use surface::{
    NativeSelection, NodeId, RenderTree, RenderedContent, RenderedNode, SelectionReport,
    StructuralAddress, SurfaceAdapter,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
