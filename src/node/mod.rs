//! Node model
//!
//! - [`NodeType`]: bit flags describing what a node is
//! - [`Node`]: immutable snapshot of one cursor event
//! - [`NodeBuilder`]: validating constructor for nodes
//! - [`PathTracker`]: sibling positions and path strings

pub mod builder;
pub mod kind;
#[allow(clippy::module_inception)]
pub mod node;
pub mod path;

pub use builder::NodeBuilder;
pub use kind::NodeType;
pub use node::{Namespace, Node};
pub use path::PathTracker;
