use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::trace;
use vdom_types::{PropValue, Props};

use crate::error::{HostError, HostResult};
use crate::mutation::Mutation;
use crate::traits::{HostTree, NodeId, NodeKind};

/// Arena-backed in-memory DOM.
///
/// Nodes are never freed: a detached node keeps its handle, content and
/// children. Every primitive applied through [`HostTree`] is appended to a
/// mutation log that callers can inspect or drain.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    nodes: Vec<Node>,
    mutations: Vec<Mutation>,
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    data: NodeData,
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        properties: Props,
        attributes: BTreeMap<String, String>,
        children: Vec<NodeId>,
    },
    Text(String),
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node was ever created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutations recorded since creation or the last [`take_mutations`].
    ///
    /// [`take_mutations`]: InMemoryHost::take_mutations
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drain the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Tag name of an element.
    pub fn tag(&self, node: NodeId) -> HostResult<&str> {
        match &self.node(node)?.data {
            NodeData::Element { tag, .. } => Ok(tag.as_str()),
            NodeData::Text(_) => Err(HostError::NotAnElement(node)),
        }
    }

    /// Content of a text node, or `None` for elements.
    pub fn text(&self, node: NodeId) -> HostResult<Option<&str>> {
        match &self.node(node)?.data {
            NodeData::Text(text) => Ok(Some(text.as_str())),
            NodeData::Element { .. } => Ok(None),
        }
    }

    /// Read an attribute of an element.
    pub fn attribute(&self, node: NodeId, name: &str) -> HostResult<Option<&str>> {
        let (_, _, attributes, _) = self.element(node)?;
        Ok(attributes.get(name).map(String::as_str))
    }

    /// All attributes of an element, sorted by name.
    pub fn attributes(&self, node: NodeId) -> HostResult<&BTreeMap<String, String>> {
        let (_, _, attributes, _) = self.element(node)?;
        Ok(attributes)
    }

    /// Concatenated text of the subtree, like `textContent`.
    pub fn text_content(&self, node: NodeId) -> HostResult<String> {
        let mut out = String::new();
        self.collect_text(node, &mut out)?;
        Ok(out)
    }

    /// Serialize the subtree rooted at `node` to HTML.
    ///
    /// Attributes are written in name order, so two structurally equal trees
    /// always serialize identically.
    pub fn to_html(&self, node: NodeId) -> HostResult<String> {
        let mut out = String::new();
        self.write_html(node, &mut out)?;
        Ok(out)
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> HostResult<bool> {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            cursor = self.node(current)?.parent;
        }
        Ok(false)
    }

    fn node(&self, id: NodeId) -> HostResult<&Node> {
        self.nodes
            .get(id.raw() as usize)
            .ok_or(HostError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> HostResult<&mut Node> {
        self.nodes
            .get_mut(id.raw() as usize)
            .ok_or(HostError::NodeNotFound(id))
    }

    #[allow(clippy::type_complexity)]
    fn element(
        &self,
        id: NodeId,
    ) -> HostResult<(&str, &Props, &BTreeMap<String, String>, &[NodeId])> {
        match &self.node(id)?.data {
            NodeData::Element {
                tag,
                properties,
                attributes,
                children,
            } => Ok((tag.as_str(), properties, attributes, children.as_slice())),
            NodeData::Text(_) => Err(HostError::NotAnElement(id)),
        }
    }

    fn properties_mut(&mut self, id: NodeId) -> HostResult<&mut Props> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element { properties, .. } => Ok(properties),
            NodeData::Text(_) => Err(HostError::NotAnElement(id)),
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> HostResult<&mut BTreeMap<String, String>> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element { attributes, .. } => Ok(attributes),
            NodeData::Text(_) => Err(HostError::NotAnElement(id)),
        }
    }

    fn children_mut(&mut self, id: NodeId) -> HostResult<&mut Vec<NodeId>> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element { children, .. } => Ok(children),
            NodeData::Text(_) => Err(HostError::NotAnElement(id)),
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node { parent: None, data });
        id
    }

    /// Unlink `node` from its parent's child list, if it has a parent.
    fn detach(&mut self, node: NodeId) -> HostResult<()> {
        if let Some(parent) = self.node(node)?.parent {
            self.children_mut(parent)?.retain(|c| *c != node);
            self.node_mut(node)?.parent = None;
        }
        Ok(())
    }

    fn collect_text(&self, node: NodeId, out: &mut String) -> HostResult<()> {
        match &self.node(node)?.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { children, .. } => {
                for child in children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    fn write_html(&self, node: NodeId, out: &mut String) -> HostResult<()> {
        match &self.node(node)?.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element {
                tag,
                attributes,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attribute(value));
                }
                out.push('>');
                for child in children {
                    self.write_html(*child, out)?;
                }
                let _ = write!(out, "</{tag}>");
            }
        }
        Ok(())
    }
}

impl HostTree for InMemoryHost {
    fn create_element(&mut self, tag: &str) -> HostResult<NodeId> {
        let node = self.push(NodeData::Element {
            tag: tag.to_owned(),
            properties: Props::new(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        });
        self.mutations.push(Mutation::CreateElement {
            node,
            tag: tag.to_owned(),
        });
        Ok(node)
    }

    fn create_text(&mut self, text: &str) -> HostResult<NodeId> {
        let node = self.push(NodeData::Text(text.to_owned()));
        self.mutations.push(Mutation::CreateText {
            node,
            text: text.to_owned(),
        });
        Ok(node)
    }

    fn kind(&self, node: NodeId) -> HostResult<NodeKind> {
        Ok(match self.node(node)?.data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        })
    }

    fn parent(&self, node: NodeId) -> HostResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    fn property(&self, node: NodeId, name: &str) -> HostResult<Option<PropValue>> {
        let (_, properties, _, _) = self.element(node)?;
        Ok(properties.get(name).cloned())
    }

    fn set_property(&mut self, node: NodeId, name: &str, value: &PropValue) -> HostResult<()> {
        trace!(%node, name, %value, "set property");
        self.properties_mut(node)?
            .insert(name.to_owned(), value.clone());
        self.attributes_mut(node)?
            .insert(name.to_owned(), value.to_attribute_value());
        self.mutations.push(Mutation::SetProperty {
            node,
            name: name.to_owned(),
            value: value.clone(),
        });
        Ok(())
    }

    fn delete_property(&mut self, node: NodeId, name: &str) -> HostResult<()> {
        trace!(%node, name, "delete property");
        self.properties_mut(node)?.remove(name);
        self.mutations.push(Mutation::DeleteProperty {
            node,
            name: name.to_owned(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> HostResult<()> {
        self.attributes_mut(node)?.remove(name);
        self.mutations.push(Mutation::RemoveAttribute {
            node,
            name: name.to_owned(),
        });
        Ok(())
    }

    fn clear_children(&mut self, node: NodeId) -> HostResult<()> {
        let children = std::mem::take(self.children_mut(node)?);
        for child in children {
            self.node_mut(child)?.parent = None;
        }
        self.mutations.push(Mutation::ClearChildren { node });
        Ok(())
    }

    fn child_nodes(&self, node: NodeId) -> HostResult<Vec<NodeId>> {
        match &self.node(node)?.data {
            NodeData::Element { children, .. } => Ok(children.clone()),
            NodeData::Text(_) => Ok(Vec::new()),
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.element(parent)?;
        if self.is_inclusive_ancestor(child, parent)? {
            return Err(HostError::CyclicInsert { parent, child });
        }
        self.detach(child)?;
        self.children_mut(parent)?.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.mutations.push(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn replace_with(&mut self, old: NodeId, new: NodeId) -> HostResult<()> {
        self.node(new)?;
        let Some(parent) = self.node(old)?.parent else {
            return Ok(());
        };
        if old == new {
            return Ok(());
        }
        if self.is_inclusive_ancestor(new, parent)? {
            return Err(HostError::CyclicInsert { parent, child: new });
        }
        self.detach(new)?;
        let children = self.children_mut(parent)?;
        if let Some(slot) = children.iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        self.node_mut(old)?.parent = None;
        self.node_mut(new)?.parent = Some(parent);
        self.mutations.push(Mutation::ReplaceWith { old, new });
        Ok(())
    }

    fn remove(&mut self, node: NodeId) -> HostResult<()> {
        if self.node(node)?.parent.is_none() {
            return Ok(());
        }
        self.detach(node)?;
        self.mutations.push(Mutation::Remove { node });
        Ok(())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div_with_text(host: &mut InMemoryHost, text: &str) -> (NodeId, NodeId) {
        let div = host.create_element("div").unwrap();
        let t = host.create_text(text).unwrap();
        host.append_child(div, t).unwrap();
        (div, t)
    }

    // -----------------------------------------------------------------------
    // Construction and serialization
    // -----------------------------------------------------------------------

    #[test]
    fn build_and_serialize() {
        let mut host = InMemoryHost::new();
        let (div, _) = div_with_text(&mut host, "a < b");
        host.set_property(div, "id", &"main".into()).unwrap();
        host.set_property(div, "title", &"say \"hi\"".into()).unwrap();

        assert_eq!(
            host.to_html(div).unwrap(),
            "<div id=\"main\" title=\"say &quot;hi&quot;\">a &lt; b</div>"
        );
        assert_eq!(host.text_content(div).unwrap(), "a < b");
        assert_eq!(host.len(), 2);
    }

    #[test]
    fn property_reflects_to_attribute() {
        let mut host = InMemoryHost::new();
        let div = host.create_element("div").unwrap();
        host.set_property(div, "tabIndex", &PropValue::from(2)).unwrap();

        assert_eq!(host.property(div, "tabIndex").unwrap(), Some(PropValue::from(2)));
        assert_eq!(host.attribute(div, "tabIndex").unwrap(), Some("2"));

        host.delete_property(div, "tabIndex").unwrap();
        assert_eq!(host.property(div, "tabIndex").unwrap(), None);
        assert_eq!(host.attribute(div, "tabIndex").unwrap(), Some("2"));

        host.remove_attribute(div, "tabIndex").unwrap();
        assert!(host.attributes(div).unwrap().is_empty());
    }

    #[test]
    fn element_primitives_reject_text_nodes() {
        let mut host = InMemoryHost::new();
        let t = host.create_text("x").unwrap();
        assert_eq!(
            host.set_property(t, "id", &"x".into()),
            Err(HostError::NotAnElement(t))
        );
        assert_eq!(host.tag(t), Err(HostError::NotAnElement(t)));
        assert!(host.is_text(t).unwrap());
        assert!(host.child_nodes(t).unwrap().is_empty());
    }

    #[test]
    fn unknown_handle() {
        let host = InMemoryHost::new();
        let ghost = NodeId::new(42);
        assert_eq!(host.kind(ghost), Err(HostError::NodeNotFound(ghost)));
    }

    // -----------------------------------------------------------------------
    // Tree surgery
    // -----------------------------------------------------------------------

    #[test]
    fn replace_keeps_position() {
        let mut host = InMemoryHost::new();
        let ul = host.create_element("ul").unwrap();
        let a = host.create_text("a").unwrap();
        let b = host.create_text("b").unwrap();
        let c = host.create_text("c").unwrap();
        host.append_child(ul, a).unwrap();
        host.append_child(ul, b).unwrap();

        host.replace_with(a, c).unwrap();
        assert_eq!(host.child_nodes(ul).unwrap(), vec![c, b]);
        assert_eq!(host.parent(a).unwrap(), None);
        assert_eq!(host.parent(c).unwrap(), Some(ul));
    }

    #[test]
    fn replace_and_remove_without_parent_are_noops() {
        let mut host = InMemoryHost::new();
        let a = host.create_text("a").unwrap();
        let b = host.create_text("b").unwrap();
        host.take_mutations();

        host.replace_with(a, b).unwrap();
        host.remove(a).unwrap();
        assert!(host.mutations().is_empty());
    }

    #[test]
    fn append_moves_existing_child() {
        let mut host = InMemoryHost::new();
        let (first, t) = div_with_text(&mut host, "x");
        let second = host.create_element("div").unwrap();

        host.append_child(second, t).unwrap();
        assert!(host.child_nodes(first).unwrap().is_empty());
        assert_eq!(host.child_nodes(second).unwrap(), vec![t]);
    }

    #[test]
    fn append_rejects_cycles() {
        let mut host = InMemoryHost::new();
        let outer = host.create_element("div").unwrap();
        let inner = host.create_element("div").unwrap();
        host.append_child(outer, inner).unwrap();

        assert_eq!(
            host.append_child(inner, outer),
            Err(HostError::CyclicInsert { parent: inner, child: outer })
        );
    }

    #[test]
    fn clear_children_detaches_all() {
        let mut host = InMemoryHost::new();
        let (div, t) = div_with_text(&mut host, "x");
        let span = host.create_element("span").unwrap();
        host.append_child(div, span).unwrap();

        host.clear_children(div).unwrap();
        assert!(host.child_nodes(div).unwrap().is_empty());
        assert_eq!(host.parent(t).unwrap(), None);
        assert_eq!(host.parent(span).unwrap(), None);
        assert_eq!(host.to_html(div).unwrap(), "<div></div>");
    }

    #[test]
    fn child_nodes_is_a_snapshot() {
        let mut host = InMemoryHost::new();
        let (div, t) = div_with_text(&mut host, "x");
        let snapshot = host.child_nodes(div).unwrap();
        let extra = host.create_text("y").unwrap();
        host.append_child(div, extra).unwrap();
        assert_eq!(snapshot, vec![t]);
    }

    #[test]
    fn mutation_log_records_in_order() {
        let mut host = InMemoryHost::new();
        let (div, t) = div_with_text(&mut host, "x");
        host.remove(t).unwrap();

        let log = host.take_mutations();
        let ops: Vec<_> = log.iter().map(Mutation::op).collect();
        assert_eq!(ops, vec!["create_element", "create_text", "append_child", "remove"]);
        assert_eq!(log[2], Mutation::AppendChild { parent: div, child: t });
        assert!(host.mutations().is_empty());
    }
}
