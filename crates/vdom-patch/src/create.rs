//! Building fresh host subtrees from vnodes.

use vdom_host::{HostTree, NodeId};
use vdom_types::VNode;

use crate::cache::VNodeCache;
use crate::error::PatchResult;

/// Build a detached host subtree for `vnode`.
///
/// Every prop is assigned and every child is created and appended in order,
/// so the result depends on nothing but `vnode`. With `attach_cache` the
/// vnode is recorded for the returned root (never for its descendants), which
/// lets a later [`Reconciler::patch`](crate::Reconciler::patch) without an
/// explicit previous vnode diff against it.
pub fn create_element(
    host: &mut dyn HostTree,
    cache: &mut VNodeCache,
    vnode: &VNode,
    attach_cache: bool,
) -> PatchResult<NodeId> {
    let node = build(host, vnode)?;
    if attach_cache {
        cache.insert(node, vnode.clone());
    }
    Ok(node)
}

fn build(host: &mut dyn HostTree, vnode: &VNode) -> PatchResult<NodeId> {
    match vnode {
        VNode::Text(text) => Ok(host.create_text(text)?),
        VNode::Element(el) => {
            let node = host.create_element(&el.tag)?;
            for (name, value) in el.props.iter().flatten() {
                host.set_property(node, name, value)?;
            }
            for child in el.children.iter().flatten() {
                let child_node = build(host, child)?;
                host.append_child(node, child_node)?;
            }
            Ok(node)
        }
    }
}
