use crate::traits::NodeId;

/// Errors from host tree primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The handle does not refer to a node of this host.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// An element-only primitive was applied to a text node.
    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    /// Inserting `child` under `parent` would make a node its own ancestor.
    #[error("cannot insert {child} under its own descendant {parent}")]
    CyclicInsert { parent: NodeId, child: NodeId },
}

/// Result alias for host operations.
pub type HostResult<T> = Result<T, HostError>;
