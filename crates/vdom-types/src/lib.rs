//! Virtual node types for the vdom reconciler.
//!
//! A virtual node is an immutable, throwaway description of what a host tree
//! should look like. It is either a run of text or a tagged element with
//! props and children. Every other vdom crate depends on `vdom-types`.
//!
//! # Key Types
//!
//! - [`VNode`] -- text or element
//! - [`VElement`] -- tag, optional key, optional props, optional children
//! - [`Key`] -- identity hint compared by the reconciler
//! - [`PropValue`] / [`Props`] -- property values and the map holding them
//! - [`m`] -- shorthand constructor for elements

pub mod builder;
pub mod error;
pub mod props;
pub mod vnode;

pub use builder::m;
pub use error::{TypeError, TypeResult};
pub use props::{PropValue, Props};
pub use vnode::{Key, VElement, VNode};
