//! Programmatic tree construction.
//!
//! The parser (and tests) build trees bottom-up: children first, then the
//! parent that lists them, then [`TreeBuilder::finish`] with the root.

use crate::node::{Node, NodeKind, SyntaxTree};
use crate::types::{NodeId, Operator};
use vslc_core::index::next_index;
use vslc_core::text::TextRange;

#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node with an explicit range.
    pub fn push(&mut self, kind: NodeKind, range: TextRange, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(next_index(self.nodes.len()));
        self.nodes.push(Node::new(kind, range, children));
        id
    }

    /// Add an interior node; its range covers its children's ranges.
    pub fn node(&mut self, kind: NodeKind, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        let children: Vec<NodeId> = children.into_iter().collect();
        let range = children
            .iter()
            .map(|&c| self.nodes[c.index()].range)
            .reduce(|a, b| a.cover(b))
            .unwrap_or_default();
        self.push(kind, range, children)
    }

    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.push(kind, TextRange::default(), Vec::new())
    }

    pub fn identifier(&mut self, name: &str) -> NodeId {
        self.leaf(NodeKind::Identifier(name.to_string()))
    }

    pub fn number(&mut self, value: i64) -> NodeId {
        self.leaf(NodeKind::NumberLiteral(value))
    }

    pub fn string(&mut self, text: &str) -> NodeId {
        self.leaf(NodeKind::StringLiteral(text.to_string()))
    }

    pub fn set_range(&mut self, id: NodeId, range: TextRange) -> NodeId {
        self.nodes[id.index()].range = range;
        id
    }

    // -- Shorthands for common shapes --

    pub fn block(&mut self, statements: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.node(NodeKind::Block, statements)
    }

    /// `var a, b` inside a function body.
    pub fn local_vars(&mut self, names: &[&str]) -> NodeId {
        let ids: Vec<NodeId> = names.iter().map(|n| self.identifier(n)).collect();
        self.node(NodeKind::LocalDeclaration, ids)
    }

    /// `var a, b` at the top level.
    pub fn global_vars(&mut self, names: &[&str]) -> NodeId {
        let ids: Vec<NodeId> = names.iter().map(|n| self.identifier(n)).collect();
        self.node(NodeKind::GlobalDeclaration, ids)
    }

    /// `name[size]`, as used in array declarations.
    pub fn array(&mut self, name: &str, size: i64) -> NodeId {
        let ident = self.identifier(name);
        let size = self.number(size);
        self.node(NodeKind::ArrayIndexing, [ident, size])
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::AssignmentStatement, [target, value])
    }

    pub fn binary(&mut self, op: Operator, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.node(NodeKind::Expression(op), [lhs, rhs])
    }

    pub fn call(&mut self, callee: &str, arguments: impl IntoIterator<Item = NodeId>) -> NodeId {
        let callee = self.identifier(callee);
        let arguments = self.node(NodeKind::ArgumentList, arguments);
        self.node(NodeKind::FunctionCall, [callee, arguments])
    }

    pub fn print(&mut self, items: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.node(NodeKind::PrintStatement, items)
    }

    /// `func name(params) body`.
    pub fn function(&mut self, name: &str, params: &[&str], body: NodeId) -> NodeId {
        let name = self.identifier(name);
        let params: Vec<NodeId> = params.iter().map(|p| self.identifier(p)).collect();
        let params = self.node(NodeKind::ParameterList, params);
        self.node(NodeKind::Function, [name, params, body])
    }

    pub fn program(&mut self, items: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.node(NodeKind::Program, items)
    }

    pub fn finish(self, root: NodeId) -> SyntaxTree {
        SyntaxTree::from_parts(self.nodes, root)
    }
}
