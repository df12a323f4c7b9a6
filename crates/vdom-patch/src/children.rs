//! Positional children diff.

use tracing::debug;
use vdom_host::{HostTree, NodeId};
use vdom_types::VNode;

use crate::create::create_element;
use crate::error::{PatchError, PatchResult};
use crate::patch::Reconciler;

impl Reconciler {
    /// Patch the children of `el` from `old` to `new`, matching by index.
    ///
    /// An absent or empty `new` clears every child in one host call. Otherwise
    /// each index of `old` is patched against the host child snapshotted at
    /// the same index (an index past the end of `new` removes that child), and
    /// every vnode of `new` beyond `old` is created and appended in order.
    pub fn patch_children(
        &mut self,
        host: &mut dyn HostTree,
        el: NodeId,
        old: Option<&[VNode]>,
        new: Option<&[VNode]>,
    ) -> PatchResult<()> {
        let child_nodes = host.child_nodes(el)?;

        let new = match new {
            Some(new) if !new.is_empty() => new,
            _ => {
                debug!(%el, count = child_nodes.len(), "clearing children");
                host.clear_children(el)?;
                for child in child_nodes {
                    self.forget(host, child)?;
                }
                return Ok(());
            }
        };

        let old = old.unwrap_or_default();
        for (index, old_child) in old.iter().enumerate() {
            let child = *child_nodes
                .get(index)
                .ok_or(PatchError::MissingChild { parent: el, index })?;
            self.patch(host, child, new.get(index), Some(old_child))?;
        }

        for vnode in new.iter().skip(old.len()) {
            let child = create_element(host, &mut self.cache, vnode, false)?;
            host.append_child(el, child)?;
            debug!(%el, %child, "appended child");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vdom_host::{HostTree, InMemoryHost, Mutation, NodeId};
    use vdom_types::{VElement, VNode};

    use crate::config::PatchConfig;
    use crate::error::PatchError;
    use crate::patch::Reconciler;

    fn texts(list: &[&str]) -> Vec<VNode> {
        list.iter().map(|s| VNode::text(*s)).collect()
    }

    fn mounted(host: &mut InMemoryHost, rec: &mut Reconciler, children: &[&str]) -> NodeId {
        let root = host.create_element("body").unwrap();
        let vnode: VNode = VElement::new("ul").with_children(texts(children)).into();
        let el = rec.mount(host, root, &vnode).unwrap();
        host.take_mutations();
        el
    }

    #[test]
    fn appends_beyond_old_length() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::default();
        let el = mounted(&mut host, &mut rec, &["a"]);
        let first = host.child_nodes(el).unwrap()[0];

        rec.patch_children(&mut host, el, Some(&texts(&["a"])[..]), Some(&texts(&["a", "b"])[..]))
            .unwrap();

        let children = host.child_nodes(el).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0], first);
        assert_eq!(host.text(children[1]).unwrap(), Some("b"));
        // The appended child does not get a cache entry.
        assert!(!rec.cache().contains(children[1]));
    }

    #[test]
    fn removes_beyond_new_length() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::default();
        let el = mounted(&mut host, &mut rec, &["a", "b"]);
        let second = host.child_nodes(el).unwrap()[1];

        rec.patch_children(&mut host, el, Some(&texts(&["a", "b"])[..]), Some(&texts(&["a"])[..]))
            .unwrap();

        assert_eq!(host.child_nodes(el).unwrap().len(), 1);
        assert_eq!(host.parent(second).unwrap(), None);
        assert_eq!(host.mutations(), &[Mutation::Remove { node: second }]);
    }

    #[test]
    fn absent_or_empty_new_clears_in_one_call() {
        for new in [None, Some(Vec::new())] {
            let mut host = InMemoryHost::new();
            let mut rec = Reconciler::default();
            let el = mounted(&mut host, &mut rec, &["a", "b", "c"]);

            rec.patch_children(&mut host, el, Some(&texts(&["a", "b", "c"])[..]), new.as_deref())
                .unwrap();

            assert!(host.child_nodes(el).unwrap().is_empty());
            assert_eq!(host.mutations(), &[Mutation::ClearChildren { node: el }]);
        }
    }

    #[test]
    fn clearing_forgets_grandchildren() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::default();
        let el = mounted(&mut host, &mut rec, &[]);
        let li = VElement::new("li").text("deep");
        let item = rec.mount(&mut host, el, &li.into()).unwrap();
        let deep = rec.mount(&mut host, item, &VNode::text("more")).unwrap();
        assert_eq!(rec.cache().len(), 3);

        rec.patch_children(&mut host, el, None, None).unwrap();
        assert!(!rec.cache().contains(item));
        assert!(!rec.cache().contains(deep));
        assert!(rec.cache().contains(el));
    }

    #[test]
    fn absent_old_appends_everything() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::default();
        let el = host.create_element("ul").unwrap();

        rec.patch_children(&mut host, el, None, Some(&texts(&["x", "y"])[..]))
            .unwrap();
        assert_eq!(host.to_html(el).unwrap(), "<ul>xy</ul>");
    }

    #[test]
    fn positional_replacement_instead_of_move() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::default();
        let el = mounted(&mut host, &mut rec, &["a", "b"]);

        let (old, new) = (texts(&["a", "b"]), texts(&["b", "a"]));
        rec.patch_children(&mut host, el, Some(&old[..]), Some(&new[..])).unwrap();

        assert_eq!(host.to_html(el).unwrap(), "<ul>ba</ul>");
        let replaced = host
            .mutations()
            .iter()
            .filter(|m| matches!(m, Mutation::ReplaceWith { .. }))
            .count();
        assert_eq!(replaced, 2);
    }

    #[test]
    fn host_out_of_sync_reports_missing_child() {
        let mut host = InMemoryHost::new();
        let mut rec = Reconciler::new(PatchConfig::default());
        let el = host.create_element("ul").unwrap();

        let err = rec
            .patch_children(&mut host, el, Some(&texts(&["a"])[..]), Some(&texts(&["b"])[..]))
            .unwrap_err();
        assert_eq!(err, PatchError::MissingChild { parent: el, index: 0 });
    }
}
