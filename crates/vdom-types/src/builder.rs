//! Shorthand constructor for element vnodes.

use crate::props::Props;
use crate::vnode::{VElement, VNode};

/// Build an element vnode from its parts.
///
/// ```
/// use vdom_types::{m, Props, VNode};
///
/// let mut props = Props::new();
/// props.insert("id".into(), "app".into());
/// let node = m("div", Some(props), Some(vec![VNode::text("hello")]));
/// assert_eq!(node.as_element().unwrap().tag, "div");
/// ```
pub fn m(tag: &str, props: Option<Props>, children: Option<Vec<VNode>>) -> VNode {
    VNode::Element(VElement {
        tag: tag.to_owned(),
        key: None,
        props,
        children,
    })
}
