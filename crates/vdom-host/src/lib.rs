//! Host tree abstraction for the vdom reconciler.
//!
//! The reconciler never owns real nodes. It drives a [`HostTree`] through a
//! small set of primitives (create, set/delete property, remove attribute,
//! clear, enumerate children, append, replace, remove) and refers to nodes by
//! opaque [`NodeId`] handles.
//!
//! # Backends
//!
//! - [`InMemoryHost`] -- arena-backed DOM for tests, tooling and embedding.
//!   Records every primitive as a [`Mutation`] and serializes subtrees to HTML.
//!
//! # Design Rules
//!
//! 1. Node handles stay valid after a node is detached; detached nodes can be
//!    re-attached or inspected.
//! 2. Replacing or removing a parentless node is a no-op, as in the DOM.
//! 3. Every primitive either succeeds or returns a [`HostError`]; nothing is
//!    silently ignored.

pub mod error;
pub mod memory;
pub mod mutation;
pub mod traits;

pub use error::{HostError, HostResult};
pub use memory::InMemoryHost;
pub use mutation::Mutation;
pub use traits::{HostTree, NodeId, NodeKind};
