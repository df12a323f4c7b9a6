//! Side table of the vnode each host node last reflected.

use std::collections::HashMap;

use vdom_host::NodeId;
use vdom_types::VNode;

/// Maps host nodes to the vnode that most recently produced or patched them.
///
/// The reconciler reads an entry only when the caller omits the previous
/// vnode, and writes one only in that same situation (or when a node is
/// created with the cache attached). Entries of removed or replaced subtrees
/// are dropped.
#[derive(Clone, Debug, Default)]
pub struct VNodeCache {
    entries: HashMap<NodeId, VNode>,
}

impl VNodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&VNode> {
        self.entries.get(&node)
    }

    pub fn insert(&mut self, node: NodeId, vnode: VNode) {
        self.entries.insert(node, vnode);
    }

    /// Remove and return the entry for `node`.
    pub fn remove(&mut self, node: NodeId) -> Option<VNode> {
        self.entries.remove(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
