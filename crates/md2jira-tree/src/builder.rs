//! Incremental tree construction.

use crate::document::{Document, NodeData, NodeId};
use crate::kind::NodeKind;

/// Builds a [`Document`] by appending nodes below a stack of open containers.
///
/// The builder starts with the document root open. [`open`](Self::open)
/// appends a container and descends into it, [`leaf`](Self::leaf) appends a
/// node without descending, and [`close`](Self::close) returns to the parent.
///
/// ```
/// use md2jira_tree::{NodeKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new();
/// builder.open(NodeKind::Blockquote);
/// builder.leaf(NodeKind::ThematicBreak);
/// builder.close();
/// let document = builder.finish();
/// assert_eq!(document.len(), 3);
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
            open: vec![NodeId::ROOT],
        }
    }

    /// Innermost open container.
    #[must_use]
    pub fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// Kind of the innermost open container.
    #[must_use]
    pub fn current_kind(&self) -> &NodeKind {
        &self.nodes[self.current().0].kind
    }

    /// Number of open containers below the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len() - 1
    }

    /// Append a container node and make it current.
    pub fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.append(kind);
        self.open.push(id);
        id
    }

    /// Append a node under the current container.
    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.append(kind)
    }

    /// Close the current container. The root is never closed.
    pub fn close(&mut self) -> NodeId {
        if self.open.len() > 1 {
            self.open.pop().unwrap_or(NodeId::ROOT)
        } else {
            NodeId::ROOT
        }
    }

    /// Last child appended to the current container.
    #[must_use]
    pub fn last_child(&self) -> Option<NodeId> {
        self.nodes[self.current().0].last_child
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Mutable access to a node's kind, for attributes that are only known
    /// after the node was appended (code lines, line break flags).
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    /// Close every open container and return the finished tree.
    #[must_use]
    pub fn finish(self) -> Document {
        Document::from_nodes(self.nodes)
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.current();
        let mut data = NodeData::new(kind);
        data.parent = Some(parent);
        data.prev_sibling = self.nodes[parent.0].last_child;
        self.nodes.push(data);

        if let Some(prev) = self.nodes[parent.0].last_child {
            self.nodes[prev.0].next_sibling = Some(id);
        } else {
            self.nodes[parent.0].first_child = Some(id);
        }
        self.nodes[parent.0].last_child = Some(id);
        id
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
