//! Depth-first document traversal.

use md2jira_tree::Node;

/// Receives the two visitation events of every node.
///
/// Both phases are required: a node that emits an opening fragment on
/// [`enter`](Self::enter) usually owes a closing one on [`exit`](Self::exit).
pub trait Visitor {
    type Error;

    /// Called before the node's children are visited.
    fn enter(&mut self, node: Node<'_>) -> Result<(), Self::Error>;

    /// Called after all of the node's children were visited.
    fn exit(&mut self, node: Node<'_>) -> Result<(), Self::Error>;
}

/// Walk the subtree rooted at `start` in document order.
///
/// Every node, leaves included, receives `enter` then `exit`. The first error
/// returned by the visitor stops the walk and is returned unchanged.
///
/// The walk follows sibling and parent links instead of recursing, so deeply
/// nested documents cannot overflow the stack.
pub fn walk<V: Visitor>(start: Node<'_>, visitor: &mut V) -> Result<(), V::Error> {
    let mut node = start;
    visitor.enter(node)?;
    loop {
        if let Some(child) = node.first_child() {
            visitor.enter(child)?;
            node = child;
            continue;
        }

        loop {
            visitor.exit(node)?;
            if node == start {
                return Ok(());
            }
            if let Some(next) = node.next_sibling() {
                visitor.enter(next)?;
                node = next;
                break;
            }
            match node.parent() {
                Some(parent) => node = parent,
                None => return Ok(()),
            }
        }
    }
}
