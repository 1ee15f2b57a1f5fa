//! vslc_ast: Abstract Syntax Tree definitions for VSL.
//!
//! Defines the node arena, the handle types that link nodes to binder
//! output, a builder for constructing trees, and the nested JSON form used to
//! exchange trees with the parser.

pub mod builder;
pub mod node;
pub mod raw;
pub mod types;

// Re-export key types
pub use builder::TreeBuilder;
pub use node::*;
pub use raw::RawNode;
pub use types::*;
