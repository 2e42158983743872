//! Headless surface that mirrors host state in process.
//!
//! # Responsibility
//! - Keep the last rendered tree and the host-reported native selection.
//! - Let hosts (and tests) push selections in and read renders out.
//! - Simulate native edits that the engine does not know about.
//! - Carry the host-reported child order of the mount root when the host
//!   edited natively since the last render.
//!
//! # Invariants
//! - Foreign node ids are allocated from the top of the id space, so they
//!   never collide with ids the engine allocates.
//! - A render discards any host-reported child order.

use super::{
    NativeSelection, NodeId, RenderTree, RenderedContent, RenderedNode, SelectionReport,
    SurfaceAdapter,
};

/// In-process [`SurfaceAdapter`] backed by plain state.
#[derive(Debug, Clone)]
pub struct MirrorSurface {
    tree: RenderTree,
    selection: Option<NativeSelection>,
    live_children: Option<Vec<NodeId>>,
    render_count: usize,
    next_foreign_id: u64,
}

impl Default for MirrorSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorSurface {
    pub fn new() -> Self {
        Self {
            tree: RenderTree::default(),
            selection: None,
            live_children: None,
            render_count: 0,
            next_foreign_id: u64::MAX,
        }
    }

    /// Live children of the mount root, foreign nodes included.
    pub fn tree(&self) -> &RenderTree {
        &self.tree
    }

    /// Id of the root child at `index`.
    pub fn child_id(&self, index: usize) -> Option<NodeId> {
        self.tree.get(index).map(|node| node.id)
    }

    /// Number of renders received so far.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn native_selection(&self) -> Option<&NativeSelection> {
        self.selection.as_ref()
    }

    /// Records a selection made natively by the user.
    pub fn set_native_selection(&mut self, selection: NativeSelection) {
        self.selection = Some(selection);
    }

    /// Drops the native selection, as when the surface loses focus.
    pub fn clear_native_selection(&mut self) {
        self.selection = None;
    }

    /// Records the mount root's child order as the host sees it.
    ///
    /// Reported selections are resolved against this order until the next
    /// render.
    pub fn set_live_children(&mut self, children: Vec<NodeId>) {
        self.live_children = Some(children);
    }

    /// Falls back to the child order of the latest render.
    pub fn clear_live_children(&mut self) {
        self.live_children = None;
    }

    /// Child order handed to the engine with a selection report.
    pub fn live_children(&self) -> Vec<NodeId> {
        match &self.live_children {
            Some(children) => children.clone(),
            None => self.tree.ids(),
        }
    }

    /// Inserts a text node the engine did not render, at root child `index`.
    ///
    /// Returns the foreign node's id.
    pub fn insert_foreign_text(&mut self, index: usize, content: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_foreign_id);
        self.next_foreign_id -= 1;
        let index = index.min(self.tree.nodes.len());
        self.tree.nodes.insert(
            index,
            RenderedNode {
                id,
                content: RenderedContent::Text {
                    content: content.into(),
                },
            },
        );
        id
    }
}

impl SurfaceAdapter for MirrorSurface {
    fn query_selection(&self) -> Option<SelectionReport> {
        self.selection.map(|selection| SelectionReport {
            selection,
            live_children: self.live_children(),
        })
    }

    fn render(&mut self, tree: &RenderTree) {
        self.tree = tree.clone();
        self.live_children = None;
        self.render_count += 1;
    }

    fn apply_selection(&mut self, selection: &NativeSelection) {
        self.selection = Some(*selection);
    }
}
