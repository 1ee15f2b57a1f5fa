//! AST node definitions for VSL.
//!
//! The tree is an arena: [`SyntaxTree`] owns every [`Node`], and nodes refer
//! to their children by [`NodeId`]. The parser produces the tree; the binder
//! mutates it in place (attaching [`Binding`]s and rewriting string literals
//! into pool references).

use crate::types::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vslc_core::string_pool::StringIndex;
use vslc_core::text::TextRange;

/// The kind of a node together with its payload.
///
/// The payload lives inside the variant so that a rewrite such as
/// `StringLiteral(text)` -> `StringRef(index)` changes both in one assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root. Children: `GlobalDeclaration` and `Function` nodes.
    Program,
    /// `var a, b[10]` at the top level. Children: `Identifier` or `ArrayIndexing`.
    GlobalDeclaration,
    /// Children: `[Identifier name, ParameterList, body]`.
    Function,
    /// Children: `Identifier` per formal parameter.
    ParameterList,
    /// A `begin ... end` block; opens a scope.
    Block,
    /// `var` inside a function body. Children: `Identifier` or `ArrayIndexing`.
    LocalDeclaration,
    /// `name[expr]`. Children: `[Identifier, expr]`.
    ArrayIndexing,
    AssignmentStatement,
    PrintStatement,
    ReturnStatement,
    BreakStatement,
    IfStatement,
    WhileStatement,
    /// Children: `[Identifier callee, ArgumentList]`.
    FunctionCall,
    ArgumentList,
    Relation(RelationOp),
    Expression(Operator),
    Identifier(String),
    NumberLiteral(i64),
    /// Literal text, quotes included, as the lexer saw it.
    StringLiteral(String),
    /// A string literal after it was moved into the string pool.
    StringRef(StringIndex),
}

impl NodeKind {
    /// Upper-case label used by the tree dump.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::GlobalDeclaration => "GLOBAL_DECLARATION",
            NodeKind::Function => "FUNCTION",
            NodeKind::ParameterList => "PARAMETER_LIST",
            NodeKind::Block => "BLOCK",
            NodeKind::LocalDeclaration => "LOCAL_DECLARATION",
            NodeKind::ArrayIndexing => "ARRAY_INDEXING",
            NodeKind::AssignmentStatement => "ASSIGNMENT_STATEMENT",
            NodeKind::PrintStatement => "PRINT_STATEMENT",
            NodeKind::ReturnStatement => "RETURN_STATEMENT",
            NodeKind::BreakStatement => "BREAK_STATEMENT",
            NodeKind::IfStatement => "IF_STATEMENT",
            NodeKind::WhileStatement => "WHILE_STATEMENT",
            NodeKind::FunctionCall => "FUNCTION_CALL",
            NodeKind::ArgumentList => "ARGUMENT_LIST",
            NodeKind::Relation(_) => "RELATION",
            NodeKind::Expression(_) => "EXPRESSION",
            NodeKind::Identifier(_) => "IDENTIFIER",
            NodeKind::NumberLiteral(_) => "NUMBER_LITERAL",
            NodeKind::StringLiteral(_) => "STRING_LITERAL",
            NodeKind::StringRef(_) => "STRING_LIST_REFERENCE",
        }
    }

    pub fn is_declaration_list(&self) -> bool {
        matches!(self, NodeKind::GlobalDeclaration | NodeKind::LocalDeclaration)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub range: TextRange,
    pub children: Vec<NodeId>,
    /// Set during binding only.
    pub binding: Option<Binding>,
}

impl Node {
    pub fn new(kind: NodeKind, range: TextRange, children: Vec<NodeId>) -> Self {
        Self {
            kind,
            range,
            children,
            binding: None,
        }
    }

    /// The identifier text, for `Identifier` nodes.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<SymbolRef> {
        match self.binding {
            Some(Binding::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn function_scope(&self) -> Option<FunctionId> {
        match self.binding {
            Some(Binding::Scope(function)) => Some(function),
            _ => None,
        }
    }

    pub fn string_index(&self) -> Option<StringIndex> {
        match self.kind {
            NodeKind::StringRef(index) => Some(index),
            _ => None,
        }
    }
}

/// A whole parsed program.
///
/// Deserializing checks the arena (see [`TreeError`]), so every id handed to
/// [`SyntaxTree::node`] by a walk from the root is in range.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TreeParts")]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

/// The serialized fields of a [`SyntaxTree`], before they are checked.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeParts {
    pub nodes: Vec<Node>,
    pub root: NodeId,
}

/// Why an arena does not form a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("root {root:?} is outside an arena of {len} node(s)")]
    RootOutOfRange { root: NodeId, len: usize },

    #[error("node {parent:?} has child {child:?} outside an arena of {len} node(s)")]
    ChildOutOfRange {
        parent: NodeId,
        child: NodeId,
        len: usize,
    },

    /// A node listed as a child twice, or the root listed as a child.
    #[error("node {child:?} has more than one parent")]
    SharedChild { child: NodeId },
}

impl TryFrom<TreeParts> for SyntaxTree {
    type Error = TreeError;

    fn try_from(parts: TreeParts) -> Result<Self, TreeError> {
        let TreeParts { nodes, root } = parts;
        let len = nodes.len();
        if root.index() >= len {
            return Err(TreeError::RootOutOfRange { root, len });
        }
        // With one parent per node and a parentless root, no walk from the
        // root can revisit a node.
        let mut has_parent = vec![false; len];
        has_parent[root.index()] = true;
        for (i, node) in nodes.iter().enumerate() {
            for &child in &node.children {
                let Some(seen) = has_parent.get_mut(child.index()) else {
                    return Err(TreeError::ChildOutOfRange {
                        parent: NodeId(i as u32),
                        child,
                        len,
                    });
                };
                if std::mem::replace(seen, true) {
                    return Err(TreeError::SharedChild { child });
                }
            }
        }
        Ok(Self { nodes, root })
    }
}

impl SyntaxTree {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        debug_assert!(root.index() < nodes.len());
        Self { nodes, root }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// The `n`th child of `id`, if present.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).get(n).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Node ids reachable from the root, in pre-order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// All `Identifier` nodes reachable from the root, in pre-order.
    pub fn identifiers(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| matches!(self.node(id).kind, NodeKind::Identifier(_)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;

    fn parse(json: &str) -> Result<SyntaxTree, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_serialized_tree_reloads() {
        let mut b = TreeBuilder::new();
        let x = b.identifier("x");
        let decl = b.node(NodeKind::GlobalDeclaration, [x]);
        let root = b.program([decl]);
        let tree = b.finish(root);

        let json = serde_json::to_string(&tree).unwrap();
        let reloaded = parse(&json).unwrap();
        assert_eq!(reloaded.root(), tree.root());
        assert_eq!(reloaded.identifiers(), tree.identifiers());
    }

    #[test]
    fn test_rejects_dangling_child() {
        let json = r#"{
            "nodes": [
                { "kind": "Program", "range": { "pos": 0, "end": 0 }, "children": [5] }
            ],
            "root": 0
        }"#;
        let err = parse(json).unwrap_err();
        assert!(err.to_string().contains("outside an arena of 1 node(s)"));
    }

    #[test]
    fn test_rejects_dangling_root() {
        let json = r#"{ "nodes": [], "root": 0 }"#;
        assert!(parse(json).unwrap_err().to_string().contains("root"));
    }

    #[test]
    fn test_rejects_cycle() {
        let json = r#"{
            "nodes": [
                { "kind": "Program", "range": { "pos": 0, "end": 0 }, "children": [1] },
                { "kind": "Block", "range": { "pos": 0, "end": 0 }, "children": [0] }
            ],
            "root": 0
        }"#;
        assert!(parse(json).unwrap_err().to_string().contains("more than one parent"));
    }

    #[test]
    fn test_tree_error_variants() {
        let program = Node::new(
            NodeKind::Program,
            TextRange::default(),
            vec![NodeId(1), NodeId(1)],
        );
        let block = Node::new(NodeKind::Block, TextRange::default(), vec![]);
        let parts = TreeParts {
            nodes: vec![program, block],
            root: NodeId(0),
        };
        assert_eq!(
            SyntaxTree::try_from(parts).unwrap_err(),
            TreeError::SharedChild { child: NodeId(1) }
        );
    }
}
