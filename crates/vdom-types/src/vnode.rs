//! The virtual node tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::props::{PropValue, Props};

/// Identity hint attached to an element.
///
/// Keys are only compared for equality by the reconciler; they never drive
/// reordering. An empty key is treated as no key at all.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(String);

impl Key {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty key, which counts as undeclared.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:?})", self.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A virtual node: either raw text or an element.
///
/// The JSON form is untagged: a JSON string is text, a JSON object is an
/// element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VNode {
    Text(String),
    Element(VElement),
}

impl VNode {
    /// Create a text vnode.
    pub fn text(text: impl Into<String>) -> Self {
        VNode::Text(text.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(s) => Some(s),
            VNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Element(el) => Some(el),
            VNode::Text(_) => None,
        }
    }

    /// Number of vnodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            VNode::Text(_) => 1,
            VNode::Element(el) => {
                1 + el
                    .children
                    .iter()
                    .flatten()
                    .map(VNode::node_count)
                    .sum::<usize>()
            }
        }
    }

    /// Check structural rules serde cannot express (non-empty tags).
    pub fn validate(&self) -> TypeResult<()> {
        match self {
            VNode::Text(_) => Ok(()),
            VNode::Element(el) => {
                if el.tag.is_empty() {
                    return Err(TypeError::EmptyTag);
                }
                el.children.iter().flatten().try_for_each(VNode::validate)
            }
        }
    }

    /// Parse and validate a vnode from its JSON form.
    pub fn from_json(json: &str) -> TypeResult<Self> {
        let node: VNode =
            serde_json::from_str(json).map_err(|e| TypeError::Json(e.to_string()))?;
        node.validate()?;
        Ok(node)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> TypeResult<String> {
        serde_json::to_string(self).map_err(|e| TypeError::Json(e.to_string()))
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        VNode::Text(s.to_owned())
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        VNode::Text(s)
    }
}

impl From<VElement> for VNode {
    fn from(el: VElement) -> Self {
        VNode::Element(el)
    }
}

/// An element vnode.
///
/// `props` and `children` distinguish "not specified" (`None`) from empty.
/// The reconciler relies on that: an element that declares neither may be
/// replaced wholesale instead of being stripped in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Props>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<VNode>>,
}

impl VElement {
    /// A bare element with no key, props or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            props: None,
            children: None,
        }
    }

    /// The key, unless it is absent or empty.
    pub fn declared_key(&self) -> Option<&Key> {
        self.key.as_ref().filter(|k| !k.is_empty())
    }

    /// Returns `true` if neither props nor children were specified.
    pub fn is_bare(&self) -> bool {
        self.props.is_none() && self.children.is_none()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(Key::new(key));
        self
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(name.into(), value.into());
        self
    }

    /// Declare an empty prop map, distinct from leaving props unspecified.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }

    pub fn child(mut self, child: impl Into<VNode>) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child.into());
        self
    }

    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(VNode::Text(text.into()))
    }
}
