//! The tree capability the dispatch engine needs from its host.
//!
//! Seam never creates or owns nodes. Any tree can be driven by the engine as
//! long as its node handle implements [`Node`].

/// A handle to one node of a host tree.
///
/// Handles are expected to be cheap to clone (reference-counted or
/// index-based). The engine clones handles while gathering the traversal
/// order and passes them to plugin methods by reference.
pub trait Node: Clone {
    /// Returns `true` when this node can act as an apply root and carry
    /// attributes (an element, as opposed to text or a detached value).
    fn is_element(&self) -> bool;

    /// Snapshot of this node's attributes as `(name, value)` pairs, in the
    /// host's attribute order.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Child nodes in document order.
    fn children(&self) -> Vec<Self>;
}

/// Collects `root` and all of its descendants in document order.
///
/// A node is visited before its children; siblings keep their natural order.
/// The result is a static snapshot: mutations made while the caller works
/// through it are not reflected.
pub fn document_order<N: Node>(root: &N) -> Vec<N> {
    let mut nodes = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        let children = node.children();
        // Reverse so the first child is popped first.
        stack.extend(children.into_iter().rev());
        nodes.push(node);
    }

    nodes
}
