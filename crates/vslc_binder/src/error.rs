//! Errors that stop the binding phase.
//!
//! Problems in the user's program (unknown names, duplicates) are not
//! errors here; they are diagnostics. A `BindError` means the phase could not
//! do its job at all, or that its output must not reach code generation.

use thiserror::Error;
use vslc_ast::node::SyntaxTree;
use vslc_ast::types::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("symbol tables were already created for this compilation unit")]
    AlreadyBound,

    #[error("symbol tables have not been created for this compilation unit")]
    NotBound,

    /// The tree does not have the shape the parser guarantees.
    #[error("malformed {kind} node {node:?}: {reason}")]
    MalformedNode {
        node: NodeId,
        kind: &'static str,
        reason: &'static str,
    },

    /// Binding ran to completion but reported errors.
    #[error("binding failed with {errors} error(s)")]
    Failed { errors: usize },
}

impl BindError {
    pub(crate) fn malformed(tree: &SyntaxTree, node: NodeId, reason: &'static str) -> Self {
        BindError::MalformedNode {
            node,
            kind: tree.node(node).kind.label(),
            reason,
        }
    }
}
