use std::fmt;

use serde::{Deserialize, Serialize};
use vdom_types::PropValue;

use crate::error::HostResult;

/// Opaque handle to a node owned by a [`HostTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What kind of node a handle refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Element,
    Text,
}

/// A mutable host tree the reconciler can drive.
///
/// Implementations must satisfy these invariants:
/// - `child_nodes` returns a snapshot; later mutations do not change it.
/// - `set_property` may reflect the value to the attribute of the same name;
///   `delete_property` and `remove_attribute` are independent.
/// - `append_child` moves a node that already has a parent.
/// - `replace_with` and `remove` on a parentless node do nothing.
/// - Element-only primitives on a text node fail with `NotAnElement`.
pub trait HostTree {
    /// Create a detached element node.
    fn create_element(&mut self, tag: &str) -> HostResult<NodeId>;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> HostResult<NodeId>;

    fn kind(&self, node: NodeId) -> HostResult<NodeKind>;

    /// The parent of `node`, or `None` when detached.
    fn parent(&self, node: NodeId) -> HostResult<Option<NodeId>>;

    /// Read a property. `Ok(None)` if it was never set or has been deleted.
    fn property(&self, node: NodeId, name: &str) -> HostResult<Option<PropValue>>;

    fn set_property(&mut self, node: NodeId, name: &str, value: &PropValue) -> HostResult<()>;

    fn delete_property(&mut self, node: NodeId, name: &str) -> HostResult<()>;

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> HostResult<()>;

    /// Detach every child of `node` in one operation.
    fn clear_children(&mut self, node: NodeId) -> HostResult<()>;

    /// Snapshot of the direct children of `node`, in order.
    fn child_nodes(&self, node: NodeId) -> HostResult<Vec<NodeId>>;

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()>;

    /// Put `new` where `old` is in `old`'s parent, detaching `old`.
    fn replace_with(&mut self, old: NodeId, new: NodeId) -> HostResult<()>;

    /// Detach `node` from its parent.
    fn remove(&mut self, node: NodeId) -> HostResult<()>;

    /// Returns `true` if `node` is a text node.
    fn is_text(&self, node: NodeId) -> HostResult<bool> {
        Ok(self.kind(node)? == NodeKind::Text)
    }
}
