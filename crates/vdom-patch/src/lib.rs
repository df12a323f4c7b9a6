//! Diff/patch engine for the vdom reconciler.
//!
//! Brings a host tree in line with a new virtual node tree, given the
//! previous one, by mutating nodes in place where it can and replacing
//! subtrees where it must.
//!
//! # Key Types
//!
//! - [`Reconciler`] -- entry point: [`Reconciler::patch`], [`Reconciler::mount`]
//! - [`patch_props`] -- prop diff applied to one element
//! - [`create_element`] -- builds a fresh host subtree from a vnode
//! - [`VNodeCache`] -- side table of the last vnode each host node reflected
//! - [`PatchConfig`] / [`DiffMode`] -- exact (default) or compat heuristics
//!
//! Children are matched by position only. Keys gate in-place patching but
//! never reorder nodes.

pub mod cache;
pub mod children;
pub mod config;
pub mod create;
pub mod error;
pub mod patch;
pub mod props;

pub use cache::VNodeCache;
pub use config::{DiffMode, PatchConfig};
pub use create::create_element;
pub use error::{PatchError, PatchResult};
pub use patch::Reconciler;
pub use props::patch_props;
