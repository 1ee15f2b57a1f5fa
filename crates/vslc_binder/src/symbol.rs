//! Symbol definitions.

use std::any::Any;
use std::fmt;
use vslc_ast::types::{FunctionId, NodeId};
use vslc_core::intern::InternedString;

/// What kind of entity a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    GlobalVariable,
    GlobalArray,
    Function,
    Parameter,
    LocalVariable,
}

impl SymbolKind {
    /// Name used in table dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::GlobalVariable => "GLOBAL_VAR",
            SymbolKind::GlobalArray => "GLOBAL_ARRAY",
            SymbolKind::Function => "FUNCTION",
            SymbolKind::Parameter => "PARAMETER",
            SymbolKind::LocalVariable => "LOCAL_VAR",
        }
    }

    pub fn is_global(self) -> bool {
        matches!(
            self,
            SymbolKind::GlobalVariable | SymbolKind::GlobalArray | SymbolKind::Function
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared name. Owned by exactly one [`SymbolTable`](crate::SymbolTable).
pub struct Symbol {
    pub name: InternedString,
    pub kind: SymbolKind,
    /// The node that introduced the name: the naming identifier for
    /// variables and parameters, the `Function` node for functions.
    pub node: NodeId,
    /// Position in the owning table, assigned on insertion.
    pub sequence_number: usize,
    /// For function symbols, the function's scope arena.
    pub function: Option<FunctionId>,
    /// Filled in by frame layout; 0 until then.
    pub stack_offset: i32,
    /// Free slot for later phases.
    pub data: Option<Box<dyn Any>>,
}

impl Symbol {
    pub fn new(name: InternedString, kind: SymbolKind, node: NodeId) -> Self {
        Self {
            name,
            kind,
            node,
            sequence_number: 0,
            function: None,
            stack_offset: 0,
            data: None,
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Symbol")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("node", &self.node)
            .field("sequence_number", &self.sequence_number)
            .field("function", &self.function)
            .field("stack_offset", &self.stack_offset)
            .field("data", &self.data.as_ref().map(|_| ".."))
            .finish()
    }
}
