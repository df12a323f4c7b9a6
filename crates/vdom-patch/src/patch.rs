//! Top-level reconciliation: patch in place or replace.
//!
//! [`Reconciler::patch`] is the entry point and the recursive target of
//! [`Reconciler::patch_children`]. For every node it decides between:
//!
//! - removal (no new vnode),
//! - replacement by a freshly created subtree (text changes, text/element
//!   transitions, identity changes),
//! - in-place prop and children patching,
//! - leaving the node alone.
//!
//! # Cache contract
//!
//! When the caller omits the previous vnode, the entry in the reconciler's
//! [`VNodeCache`] is used instead, and afterwards replaced by the new vnode.
//! When the caller supplies it, the cache is neither read nor (by default)
//! written. Removing, replacing or clearing a subtree drops the entries of
//! every node in it.

use tracing::debug;
use vdom_host::{HostTree, NodeId};
use vdom_types::{VElement, VNode};

use crate::cache::VNodeCache;
use crate::config::{DiffMode, PatchConfig};
use crate::create::create_element;
use crate::error::PatchResult;
use crate::props::patch_props;

/// Reconciles host trees against virtual node trees.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    config: PatchConfig,
    pub(crate) cache: VNodeCache,
}

impl Reconciler {
    pub fn new(config: PatchConfig) -> Self {
        Self {
            config,
            cache: VNodeCache::new(),
        }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    pub fn cache(&self) -> &VNodeCache {
        &self.cache
    }

    /// Forget the cached vnodes of `node` and every descendant, e.g. after
    /// the host tree was mutated outside the reconciler.
    pub fn forget(&mut self, host: &dyn HostTree, node: NodeId) -> PatchResult<()> {
        if self.cache.is_empty() {
            return Ok(());
        }
        self.cache.remove(node);
        for child in host.child_nodes(node)? {
            self.forget(host, child)?;
        }
        Ok(())
    }

    /// Build a detached subtree for `vnode` with its cache entry attached.
    pub fn create(&mut self, host: &mut dyn HostTree, vnode: &VNode) -> PatchResult<NodeId> {
        create_element(host, &mut self.cache, vnode, true)
    }

    /// Build a subtree for `vnode` and append it to `parent`.
    ///
    /// The new node carries a cache entry, so it can later be patched
    /// without passing the previous vnode.
    pub fn mount(
        &mut self,
        host: &mut dyn HostTree,
        parent: NodeId,
        vnode: &VNode,
    ) -> PatchResult<NodeId> {
        let node = self.create(host, vnode)?;
        host.append_child(parent, node)?;
        debug!(%parent, %node, nodes = vnode.node_count(), "mounted subtree");
        Ok(node)
    }

    /// Bring `node` in line with `new`.
    ///
    /// `prev` is what `node` currently reflects; when `None` the cached vnode
    /// of `node` is used. Returns the node that now reflects `new`: `node`
    /// itself unless it was replaced. With `new == None` the node is removed
    /// from its parent and returned.
    pub fn patch(
        &mut self,
        host: &mut dyn HostTree,
        node: NodeId,
        new: Option<&VNode>,
        prev: Option<&VNode>,
    ) -> PatchResult<NodeId> {
        let Some(new) = new else {
            debug!(%node, "removing node");
            host.remove(node)?;
            self.forget(host, node)?;
            return Ok(node);
        };

        // Cloned so that a pass failing half way leaves the entry in place.
        let cached = match prev {
            None => self.cache.get(node).cloned(),
            Some(_) => None,
        };
        let old = prev.or(cached.as_ref());

        let has_text = new.is_text() || old.is_some_and(VNode::is_text);
        if has_text {
            if old != Some(new) {
                return self.replace(host, node, new);
            }
        } else if let VNode::Element(new_el) = new {
            let old_el = old.and_then(VNode::as_element);
            let replaced = match self.config.mode {
                DiffMode::Exact => self.patch_element_exact(host, node, old_el, new_el, new)?,
                DiffMode::Compat => self.patch_element_compat(host, node, old_el, new_el, new)?,
            };
            if let Some(replacement) = replaced {
                return Ok(replacement);
            }
        }

        if prev.is_none() || self.config.cache_explicit_prev {
            self.cache.insert(node, new.clone());
        }
        Ok(node)
    }

    /// Same key (or none on both sides) and same tag patch in place;
    /// anything else is rebuilt.
    fn patch_element_exact(
        &mut self,
        host: &mut dyn HostTree,
        node: NodeId,
        old_el: Option<&VElement>,
        new_el: &VElement,
        new: &VNode,
    ) -> PatchResult<Option<NodeId>> {
        let Some(old_el) = old_el else {
            return self.replace(host, node, new).map(Some);
        };
        if old_el.declared_key() != new_el.declared_key()
            || old_el.tag != new_el.tag
            || host.is_text(node)?
        {
            return self.replace(host, node, new).map(Some);
        }

        patch_props(
            host,
            node,
            old_el.props.as_ref(),
            new_el.props.as_ref(),
            DiffMode::Exact,
        )?;
        self.patch_children(
            host,
            node,
            old_el.children.as_deref(),
            new_el.children.as_deref(),
        )?;
        Ok(None)
    }

    /// The historical rules: patch when both keys are missing or the keys
    /// differ, skip when both sides carry the same key. A tag change only
    /// forces a rebuild when the new element is bare.
    fn patch_element_compat(
        &mut self,
        host: &mut dyn HostTree,
        node: NodeId,
        old_el: Option<&VElement>,
        new_el: &VElement,
        new: &VNode,
    ) -> PatchResult<Option<NodeId>> {
        let old_key = old_el.and_then(VElement::declared_key);
        let new_key = new_el.declared_key();
        let proceed = (old_key.is_none() && new_key.is_none()) || old_key != new_key;
        if !proceed {
            debug!(%node, key = ?new_key, "same key, skipping");
            return Ok(None);
        }

        if old_el.map(|el| el.tag.as_str()) != Some(new_el.tag.as_str()) && new_el.is_bare() {
            return self.replace(host, node, new).map(Some);
        }

        if let Some(old_el) = old_el {
            if !host.is_text(node)? {
                patch_props(
                    host,
                    node,
                    old_el.props.as_ref(),
                    new_el.props.as_ref(),
                    DiffMode::Compat,
                )?;
                self.patch_children(
                    host,
                    node,
                    old_el.children.as_deref(),
                    new_el.children.as_deref(),
                )?;
            }
        }
        Ok(None)
    }

    fn replace(
        &mut self,
        host: &mut dyn HostTree,
        node: NodeId,
        new: &VNode,
    ) -> PatchResult<NodeId> {
        let fresh = create_element(host, &mut self.cache, new, true)?;
        host.replace_with(node, fresh)?;
        self.forget(host, node)?;
        debug!(old = %node, new = %fresh, "replaced node");
        Ok(fresh)
    }
}
