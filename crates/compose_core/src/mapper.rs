//! Offset mapper: logical offsets <-> structural addresses.
//!
//! # Responsibility
//! - Derive the rendered tree from the run sequence and remember its layout
//!   (node id, logical start, logical length) for the latest render.
//! - Translate offsets to addresses and back against that layout.
//! - Recover from host drift by clamping to the closest known node boundary.
//!
//! # Invariants
//! - An object boundary wins over a text boundary: the offset at an object's
//!   start maps to `Before(object)`, the offset right after it maps to
//!   `After(object)`. Between two objects, `Before(next)` wins.
//! - `to_logical(to_structural(o)) == o` for every `o` in `[0, len]`.
//! - `to_logical*` never fails and never returns more than `len`.
//! - The layout is replaced only when a rebuild fully succeeds.

use crate::buffer::TextBuffer;
use crate::config::LineBreakMode;
use crate::error::{ComposeError, ComposeResult};
use crate::model::object::OBJECT_LEN;
use crate::model::run::Run;
use crate::model::selection::LogicalOffset;
use crate::registry::ObjectRegistry;
use crate::surface::{NodeId, RenderTree, RenderedContent, RenderedNode, StructuralAddress};
use log::warn;

/// Structural role of one laid-out node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Object,
    LineBreak,
}

/// Logical span covered by one rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub start: LogicalOffset,
    pub len: usize,
}

impl LayoutNode {
    pub fn end(&self) -> LogicalOffset {
        self.start + self.len
    }
}

/// Translation layer bound to the latest render.
#[derive(Debug, Clone)]
pub struct OffsetMapper {
    line_breaks: LineBreakMode,
    layout: Vec<LayoutNode>,
    len: usize,
    next_node_id: u64,
}

impl OffsetMapper {
    pub fn new(line_breaks: LineBreakMode) -> Self {
        Self {
            line_breaks,
            layout: Vec::new(),
            len: 0,
            next_node_id: NodeId::ROOT.0 + 1,
        }
    }

    /// Document length of the current layout.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nodes of the latest render, in document order.
    pub fn layout(&self) -> &[LayoutNode] {
        &self.layout
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.layout.iter().find(|node| node.id == id)
    }

    /// Renders `buffer` with fresh node ids and adopts the resulting layout.
    ///
    /// # Errors
    /// - `ComposeError::NotFound` when an object run has no registry entry.
    ///   The previous layout is kept in that case.
    pub fn rebuild(
        &mut self,
        buffer: &TextBuffer,
        registry: &ObjectRegistry,
    ) -> ComposeResult<RenderTree> {
        let mut next_id = self.next_node_id;
        let mut alloc = || {
            let id = NodeId(next_id);
            next_id += 1;
            id
        };

        let mut layout = Vec::new();
        let mut nodes = Vec::new();
        let mut cursor = 0;

        for run in buffer.runs() {
            match run {
                Run::Text { content } => match self.line_breaks {
                    LineBreakMode::Inline => {
                        let id = alloc();
                        let len = content.chars().count();
                        layout.push(LayoutNode {
                            id,
                            kind: NodeKind::Text,
                            start: cursor,
                            len,
                        });
                        nodes.push(RenderedNode {
                            id,
                            content: RenderedContent::Text {
                                content: content.clone(),
                            },
                        });
                        cursor += len;
                    }
                    LineBreakMode::Element => {
                        let mut segments = content.split('\n').peekable();
                        while let Some(segment) = segments.next() {
                            if !segment.is_empty() {
                                let id = alloc();
                                let len = segment.chars().count();
                                layout.push(LayoutNode {
                                    id,
                                    kind: NodeKind::Text,
                                    start: cursor,
                                    len,
                                });
                                nodes.push(RenderedNode {
                                    id,
                                    content: RenderedContent::Text {
                                        content: segment.to_string(),
                                    },
                                });
                                cursor += len;
                            }
                            if segments.peek().is_some() {
                                let id = alloc();
                                layout.push(LayoutNode {
                                    id,
                                    kind: NodeKind::LineBreak,
                                    start: cursor,
                                    len: 1,
                                });
                                nodes.push(RenderedNode {
                                    id,
                                    content: RenderedContent::LineBreak,
                                });
                                cursor += 1;
                            }
                        }
                    }
                },
                Run::Object { id: object_id } => {
                    let object = registry.resolve(*object_id)?.clone();
                    let id = alloc();
                    layout.push(LayoutNode {
                        id,
                        kind: NodeKind::Object,
                        start: cursor,
                        len: OBJECT_LEN,
                    });
                    nodes.push(RenderedNode {
                        id,
                        content: RenderedContent::Object { object },
                    });
                    cursor += OBJECT_LEN;
                }
            }
        }

        self.next_node_id = next_id;
        self.layout = layout;
        self.len = cursor;
        Ok(RenderTree { nodes })
    }

    /// Maps a logical offset onto the latest render.
    ///
    /// # Errors
    /// - `ComposeError::OutOfRange` when `offset > len()`.
    pub fn to_structural(&self, offset: LogicalOffset) -> ComposeResult<StructuralAddress> {
        if offset > self.len {
            return Err(ComposeError::OutOfRange {
                offset,
                length: self.len,
            });
        }

        let objects = || self.layout.iter().filter(|n| n.kind == NodeKind::Object);
        if let Some(node) = objects().find(|n| n.start == offset) {
            return Ok(StructuralAddress::before(node.id));
        }
        if let Some(node) = objects().find(|n| n.end() == offset) {
            return Ok(StructuralAddress::after(node.id));
        }
        if let Some(node) = self
            .layout
            .iter()
            .find(|n| n.kind == NodeKind::Text && n.start <= offset && offset <= n.end())
        {
            return Ok(StructuralAddress::offset(node.id, offset - node.start));
        }

        let index = self
            .layout
            .iter()
            .position(|n| n.start >= offset)
            .unwrap_or(self.layout.len());
        Ok(StructuralAddress::root(index))
    }

    /// Maps an address from the latest render back to a logical offset.
    ///
    /// Uses the render's own child order for drift recovery.
    pub fn to_logical(&self, address: &StructuralAddress) -> LogicalOffset {
        let ids: Vec<NodeId> = self.layout.iter().map(|n| n.id).collect();
        self.to_logical_in(address, &ids)
    }

    /// Maps a host-reported address back to a logical offset.
    ///
    /// `live_children` is the mount root's child order as the host sees it
    /// now; it may contain nodes the engine never rendered.
    pub fn to_logical_in(
        &self,
        address: &StructuralAddress,
        live_children: &[NodeId],
    ) -> LogicalOffset {
        let offset = match *address {
            StructuralAddress::Offset { node, offset } if node.is_root() => {
                self.root_boundary(offset, live_children)
            }
            StructuralAddress::Offset { node, offset } => match self.node(node) {
                Some(known) if known.kind == NodeKind::Text => {
                    if offset > known.len {
                        warn!(
                            "event=drift_recovered module=mapper status=clamped node={} offset={} node_len={}",
                            node, offset, known.len
                        );
                    }
                    known.start + offset.min(known.len)
                }
                Some(known) if offset == 0 => known.start,
                Some(known) => known.end(),
                None => self.recover_unknown(node, live_children),
            },
            StructuralAddress::Before { node } => match self.node(node) {
                Some(known) => known.start,
                None => self.recover_unknown(node, live_children),
            },
            StructuralAddress::After { node } => match self.node(node) {
                Some(known) => known.end(),
                None => self.recover_unknown(node, live_children),
            },
        };
        offset.min(self.len)
    }

    /// Offset of the boundary before root child `index`.
    fn root_boundary(&self, index: usize, live_children: &[NodeId]) -> LogicalOffset {
        let split = index.min(live_children.len());
        let (before, after) = live_children.split_at(split);
        if let Some(end) = self.nearest_known_end(before) {
            return end;
        }
        if let Some(start) = self.nearest_known_start(after) {
            return start;
        }
        if index == 0 {
            0
        } else {
            self.len
        }
    }

    fn recover_unknown(&self, node: NodeId, live_children: &[NodeId]) -> LogicalOffset {
        let recovered = match live_children.iter().position(|id| *id == node) {
            Some(index) => {
                let (before, rest) = live_children.split_at(index);
                self.nearest_known_end(before)
                    .or_else(|| self.nearest_known_start(&rest[1..]))
                    .unwrap_or(0)
            }
            None => self.len,
        };
        warn!(
            "event=drift_recovered module=mapper status=clamped node={} offset={}",
            node, recovered
        );
        recovered
    }

    fn nearest_known_end(&self, children: &[NodeId]) -> Option<LogicalOffset> {
        children
            .iter()
            .rev()
            .find_map(|id| self.node(*id))
            .map(LayoutNode::end)
    }

    fn nearest_known_start(&self, children: &[NodeId]) -> Option<LogicalOffset> {
        children
            .iter()
            .find_map(|id| self.node(*id))
            .map(|node| node.start)
    }
}
