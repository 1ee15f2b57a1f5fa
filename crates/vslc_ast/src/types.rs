//! Handle types shared by the AST and the binder.
//!
//! AST nodes never hold references into symbol tables. They hold these
//! small copyable handles instead, so the tree and the tables can be dropped
//! in any order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node ID for referencing AST nodes by index.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies the scope arena of one function, in top-level declaration order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

impl FunctionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a frame inside one function's scope arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The function-root frame, holding the parameters.
    pub const ROOT: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The table that owns a symbol.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TableRef {
    Global,
    Local { function: FunctionId, scope: ScopeId },
}

/// A symbol, addressed by its owning table and its position in that table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SymbolRef {
    pub table: TableRef,
    pub index: u32,
}

impl SymbolRef {
    pub fn global(index: u32) -> Self {
        Self {
            table: TableRef::Global,
            index,
        }
    }

    pub fn local(function: FunctionId, scope: ScopeId, index: u32) -> Self {
        Self {
            table: TableRef::Local { function, scope },
            index,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self.table, TableRef::Global)
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table {
            TableRef::Global => write!(f, "global#{}", self.index),
            TableRef::Local { function, scope } => {
                write!(f, "fn{}/scope{}#{}", function.0, scope.0, self.index)
            }
        }
    }
}

/// What the binder attached to a node. The node does not own the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// On identifier nodes: the symbol the name denotes.
    Symbol(SymbolRef),
    /// On function nodes: the function's scope arena.
    Scope(FunctionId),
}

/// Binary and unary arithmetic operators.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Neg,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Neg => "-",
        }
    }
}

/// Comparison operators in `if`/`while` conditions.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum RelationOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl RelationOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RelationOp::Eq => "=",
            RelationOp::Ne => "!=",
            RelationOp::Lt => "<",
            RelationOp::Gt => ">",
            RelationOp::Le => "<=",
            RelationOp::Ge => ">=",
        }
    }
}
