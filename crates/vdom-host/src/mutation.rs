//! Record of host primitives applied by a reconciliation pass.

use serde::{Deserialize, Serialize};
use vdom_types::PropValue;

use crate::traits::NodeId;

/// A single host mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    CreateElement { node: NodeId, tag: String },
    CreateText { node: NodeId, text: String },
    SetProperty { node: NodeId, name: String, value: PropValue },
    DeleteProperty { node: NodeId, name: String },
    RemoveAttribute { node: NodeId, name: String },
    ClearChildren { node: NodeId },
    AppendChild { parent: NodeId, child: NodeId },
    ReplaceWith { old: NodeId, new: NodeId },
    Remove { node: NodeId },
}

impl Mutation {
    /// Returns `true` for node construction, as opposed to edits of
    /// existing nodes.
    pub fn is_creation(&self) -> bool {
        matches!(self, Mutation::CreateElement { .. } | Mutation::CreateText { .. })
    }

    /// Short operation name, matching the serialized `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            Mutation::CreateElement { .. } => "create_element",
            Mutation::CreateText { .. } => "create_text",
            Mutation::SetProperty { .. } => "set_property",
            Mutation::DeleteProperty { .. } => "delete_property",
            Mutation::RemoveAttribute { .. } => "remove_attribute",
            Mutation::ClearChildren { .. } => "clear_children",
            Mutation::AppendChild { .. } => "append_child",
            Mutation::ReplaceWith { .. } => "replace_with",
            Mutation::Remove { .. } => "remove",
        }
    }
}
