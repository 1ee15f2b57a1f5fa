//! Nested interchange form of the AST.
//!
//! An external parser can hand over a program as JSON in this shape instead
//! of linking against [`TreeBuilder`]:
//!
//! ```json
//! { "kind": "Program", "children": [
//!     { "kind": "GlobalDeclaration", "children": [ { "kind": { "Identifier": "x" } } ] }
//! ] }
//! ```
//!
//! `range` and `children` may be omitted.

use crate::builder::TreeBuilder;
use crate::node::{NodeKind, SyntaxTree};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use vslc_core::text::TextRange;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub kind: NodeKind,
    #[serde(default)]
    pub range: TextRange,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(kind: NodeKind, children: Vec<RawNode>) -> Self {
        Self {
            kind,
            range: TextRange::default(),
            children,
        }
    }

    /// Flatten into an arena tree.
    pub fn into_tree(self) -> SyntaxTree {
        let mut builder = TreeBuilder::new();
        let root = self.lower(&mut builder);
        builder.finish(root)
    }

    fn lower(self, builder: &mut TreeBuilder) -> NodeId {
        let children = self
            .children
            .into_iter()
            .map(|child| child.lower(builder))
            .collect();
        builder.push(self.kind, self.range, children)
    }

    /// Rebuild the nested form of the subtree rooted at `id`.
    pub fn from_tree(tree: &SyntaxTree, id: NodeId) -> Self {
        let node = tree.node(id);
        Self {
            kind: node.kind.clone(),
            range: node.range,
            children: node
                .children
                .iter()
                .map(|&child| RawNode::from_tree(tree, child))
                .collect(),
        }
    }
}

impl From<RawNode> for SyntaxTree {
    fn from(raw: RawNode) -> Self {
        raw.into_tree()
    }
}
