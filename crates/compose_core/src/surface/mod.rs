//! Host surface boundary.
//!
//! # Responsibility
//! - Define the structural vocabulary shared with the host (node ids,
//!   structural addresses, the rendered tree).
//! - Define [`SurfaceAdapter`], the only outward calls the engine makes.
//!
//! # Invariants
//! - Node ids are allocated fresh on every render; they identify nodes of one
//!   render only and must never be kept across renders.
//! - [`NodeId::ROOT`] always denotes the mount root. Offsets inside the root
//!   count children, offsets inside a text node count characters.

use crate::model::object::AtomicObject;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod mirror;

/// Identity of one rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The mount root element.
    pub const ROOT: NodeId = NodeId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host-native locator: a node plus a position relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralAddress {
    /// In-node offset: characters for text nodes, children for elements.
    Offset { node: NodeId, offset: usize },
    /// Immediately before a node.
    Before { node: NodeId },
    /// Immediately after a node.
    After { node: NodeId },
}

impl StructuralAddress {
    pub fn offset(node: NodeId, offset: usize) -> Self {
        Self::Offset { node, offset }
    }

    pub fn before(node: NodeId) -> Self {
        Self::Before { node }
    }

    pub fn after(node: NodeId) -> Self {
        Self::After { node }
    }

    /// Child boundary `index` of the mount root.
    pub fn root(index: usize) -> Self {
        Self::Offset {
            node: NodeId::ROOT,
            offset: index,
        }
    }

    pub fn node(&self) -> NodeId {
        match self {
            Self::Offset { node, .. } | Self::Before { node } | Self::After { node } => *node,
        }
    }
}

impl Display for StructuralAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offset { node, offset } => write!(f, "{node}:{offset}"),
            Self::Before { node } => write!(f, "before {node}"),
            Self::After { node } => write!(f, "after {node}"),
        }
    }
}

/// Native selection as a pair of structural addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeSelection {
    pub anchor: StructuralAddress,
    pub focus: StructuralAddress,
}

impl NativeSelection {
    pub fn new(anchor: StructuralAddress, focus: StructuralAddress) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: StructuralAddress) -> Self {
        Self::new(at, at)
    }
}

/// Native selection together with the mount root's live child order.
///
/// The child order lets the engine place addresses that point at nodes it
/// did not render (native edits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub selection: NativeSelection,
    pub live_children: Vec<NodeId>,
}

/// Content of one rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedContent {
    Text { content: String },
    Object { object: AtomicObject },
    LineBreak,
}

/// One direct child of the mount root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNode {
    pub id: NodeId,
    pub content: RenderedContent,
}

impl RenderedNode {
    /// Debug markup for this node.
    pub fn html(&self) -> String {
        match &self.content {
            RenderedContent::Text { content } => escape_text(content),
            RenderedContent::Object { object } => object.html(),
            RenderedContent::LineBreak => "<br>".to_string(),
        }
    }
}

/// Flat list of the mount root's children, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTree {
    pub nodes: Vec<RenderedNode>,
}

impl RenderTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id).collect()
    }

    pub fn get(&self, index: usize) -> Option<&RenderedNode> {
        self.nodes.get(index)
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Debug markup for the whole tree, like an element's inner HTML.
    pub fn html(&self) -> String {
        self.nodes.iter().map(RenderedNode::html).collect()
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Host editable-region API.
///
/// Every call is synchronous from the engine's point of view.
pub trait SurfaceAdapter {
    /// Current native selection, or `None` when the surface has none
    /// (e.g. focus is elsewhere).
    fn query_selection(&self) -> Option<SelectionReport>;

    /// Replaces the surface content with `tree`.
    fn render(&mut self, tree: &RenderTree);

    /// Applies `selection` as the new native selection.
    fn apply_selection(&mut self, selection: &NativeSelection);
}

#[cfg(test)]
mod tests {
    use super::{NodeId, RenderTree, RenderedContent, RenderedNode, StructuralAddress};
    use crate::model::object::AtomicObject;

    #[test]
    fn root_address_is_an_offset_into_root() {
        let address = StructuralAddress::root(2);
        assert_eq!(address.node(), NodeId::ROOT);
        assert_eq!(address.to_string(), "#0:2");
    }

    #[test]
    fn html_renders_text_objects_and_breaks() {
        let object = AtomicObject::new("img.jpg", "😀", "em");
        let tree = RenderTree {
            nodes: vec![
                RenderedNode {
                    id: NodeId(1),
                    content: RenderedContent::Text {
                        content: "a<b".to_string(),
                    },
                },
                RenderedNode {
                    id: NodeId(2),
                    content: RenderedContent::Object { object },
                },
                RenderedNode {
                    id: NodeId(3),
                    content: RenderedContent::LineBreak,
                },
            ],
        };
        assert_eq!(
            tree.html(),
            r#"a&lt;b<img src="img.jpg" alt="😀" class="em"><br>"#
        );
        assert_eq!(tree.position(NodeId(3)), Some(2));
    }
}
