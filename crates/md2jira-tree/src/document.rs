//! Arena-backed document tree and borrowed node views.

use crate::kind::NodeKind;

/// Index of a node inside its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The document root.
    pub const ROOT: Self = Self(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl NodeData {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Immutable parsed document.
///
/// Node 0 is always the root and has kind [`NodeKind::Document`].
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    pub(crate) fn from_nodes(nodes: Vec<NodeData>) -> Self {
        debug_assert!(matches!(
            nodes.first().map(|n| &n.kind),
            Some(NodeKind::Document)
        ));
        Self { nodes }
    }

    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            document: self,
            id: NodeId::ROOT,
        }
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        (id.0 < self.nodes.len()).then_some(Node { document: self, id })
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A document always holds its root, so this is never true.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

/// Borrowed view of one node and its links.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    document: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(self) -> &'a NodeKind {
        &self.document.data(self.id).kind
    }

    #[must_use]
    pub fn parent(self) -> Option<Self> {
        self.link(|d| d.parent)
    }

    #[must_use]
    pub fn first_child(self) -> Option<Self> {
        self.link(|d| d.first_child)
    }

    #[must_use]
    pub fn last_child(self) -> Option<Self> {
        self.link(|d| d.last_child)
    }

    #[must_use]
    pub fn next_sibling(self) -> Option<Self> {
        self.link(|d| d.next_sibling)
    }

    #[must_use]
    pub fn prev_sibling(self) -> Option<Self> {
        self.link(|d| d.prev_sibling)
    }

    #[must_use]
    pub fn has_children(self) -> bool {
        self.document.data(self.id).first_child.is_some()
    }

    /// Iterate over direct children in document order.
    #[must_use]
    pub fn children(self) -> Children<'a> {
        Children {
            next: self.first_child(),
        }
    }

    fn link(self, select: impl FnOnce(&NodeData) -> Option<NodeId>) -> Option<Self> {
        select(self.document.data(self.id)).map(|id| Node {
            document: self.document,
            id,
        })
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("kind", self.kind())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.document, other.document) && self.id == other.id
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}
