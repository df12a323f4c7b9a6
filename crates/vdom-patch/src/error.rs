//! Error types for the patch crate.

use vdom_host::{HostError, NodeId};

/// Errors that can occur while reconciling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// A host primitive failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// The host element has fewer children than the previous vnode listed.
    #[error("{parent} has no child at index {index} to patch")]
    MissingChild { parent: NodeId, index: usize },
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
