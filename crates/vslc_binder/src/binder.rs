//! The binder implementation.
//!
//! Walks one function body in pre-order and:
//! - opens a scope frame for every block and closes it afterwards
//! - enters local declarations into the current frame
//! - resolves every other identifier through the scope chain, then globals
//! - moves string literals into the string pool

use crate::collector::report_duplicate;
use crate::error::BindError;
use crate::scope::{ScopeArena, SymbolTable};
use crate::symbol::{Symbol, SymbolKind};
use tracing::{debug, debug_span, trace};
use vslc_ast::node::{NodeKind, SyntaxTree};
use vslc_ast::types::{Binding, FunctionId, NodeId, ScopeId, SymbolRef};
use vslc_core::intern::StringInterner;
use vslc_core::string_pool::StringPool;
use vslc_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use vslc_options::DuplicatePolicy;

/// What the walk does at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Block,
    Declaration,
    Identifier,
    StringLiteral,
    /// Only valid at the top level.
    TopLevel,
    Children,
}

impl Visit {
    fn of(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Block => Visit::Block,
            NodeKind::LocalDeclaration => Visit::Declaration,
            NodeKind::Identifier(_) => Visit::Identifier,
            NodeKind::StringLiteral(_) => Visit::StringLiteral,
            NodeKind::Program
            | NodeKind::GlobalDeclaration
            | NodeKind::Function
            | NodeKind::ParameterList => Visit::TopLevel,
            _ => Visit::Children,
        }
    }
}

/// Binds the body of one function.
pub struct Binder<'u> {
    function: FunctionId,
    tree: &'u mut SyntaxTree,
    interner: &'u mut StringInterner,
    globals: &'u SymbolTable,
    scopes: &'u mut ScopeArena,
    pool: &'u mut StringPool,
    diagnostics: &'u mut DiagnosticCollection,
    policy: DuplicatePolicy,
    /// The innermost open frame.
    current_scope: ScopeId,
    /// Nesting depth for scope tracking.
    scope_depth: u32,
    resolved: usize,
    unresolved: usize,
}

impl<'u> Binder<'u> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        function: FunctionId,
        tree: &'u mut SyntaxTree,
        interner: &'u mut StringInterner,
        globals: &'u SymbolTable,
        scopes: &'u mut ScopeArena,
        pool: &'u mut StringPool,
        diagnostics: &'u mut DiagnosticCollection,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            function,
            tree,
            interner,
            globals,
            scopes,
            pool,
            diagnostics,
            policy,
            current_scope: ScopeId::ROOT,
            scope_depth: 0,
            resolved: 0,
            unresolved: 0,
        }
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current_scope
    }

    pub fn scope_depth(&self) -> u32 {
        self.scope_depth
    }

    /// Bind the function body, returning the scope current after it.
    ///
    /// Blocks are balanced, so that is always the function root.
    pub fn bind_function(&mut self) -> Result<ScopeId, BindError> {
        let function = self.scopes.function_node();
        let _span = debug_span!("bind_function", function = self.function.0).entered();

        let Some(body) = self.tree.child(function, 2) else {
            return Err(BindError::malformed(self.tree, function, "function without a body"));
        };
        self.current_scope = ScopeId::ROOT;
        self.bind_node(body)?;

        debug_assert_eq!(self.current_scope, ScopeId::ROOT);
        debug!(
            frames = self.scopes.frame_count(),
            symbols = self.scopes.symbol_count(),
            resolved = self.resolved,
            unresolved = self.unresolved,
            "function bound"
        );
        Ok(self.current_scope)
    }

    // ========================================================================
    // Walk
    // ========================================================================

    fn bind_node(&mut self, id: NodeId) -> Result<(), BindError> {
        match Visit::of(&self.tree.node(id).kind) {
            Visit::Block => {
                self.push_block_scope();
                self.bind_children(id)?;
                self.pop_scope();
            }
            Visit::Declaration => self.bind_local_declaration(id)?,
            Visit::Identifier => self.resolve_identifier(id),
            Visit::StringLiteral => self.hoist_string(id),
            Visit::TopLevel => {
                return Err(BindError::malformed(
                    self.tree,
                    id,
                    "only allowed at the top level",
                ))
            }
            Visit::Children => self.bind_children(id)?,
        }
        Ok(())
    }

    fn bind_children(&mut self, id: NodeId) -> Result<(), BindError> {
        for i in 0..self.tree.children(id).len() {
            let child = self.tree.children(id)[i];
            self.bind_node(child)?;
        }
        Ok(())
    }

    // ========================================================================
    // Scopes
    // ========================================================================

    fn push_block_scope(&mut self) {
        let scope = self.scopes.open_scope(self.current_scope);
        trace!(parent = self.current_scope.0, scope = scope.0, "open scope");
        self.current_scope = scope;
        self.scope_depth += 1;
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes.close_scope(self.current_scope) {
            trace!(scope = self.current_scope.0, parent = parent.0, "close scope");
            self.current_scope = parent;
            self.scope_depth = self.scope_depth.saturating_sub(1);
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn bind_local_declaration(&mut self, declaration: NodeId) -> Result<(), BindError> {
        for i in 0..self.tree.children(declaration).len() {
            let entry = self.tree.children(declaration)[i];
            match self.tree.node(entry).kind {
                NodeKind::Identifier(_) => self.declare_local(entry)?,
                NodeKind::ArrayIndexing => {
                    let name = self
                        .tree
                        .child(entry, 0)
                        .filter(|&id| matches!(self.tree.node(id).kind, NodeKind::Identifier(_)));
                    let Some(name) = name else {
                        return Err(BindError::malformed(
                            self.tree,
                            entry,
                            "array declaration without a name",
                        ));
                    };
                    self.declare_local(name)?;
                    // The size expression is an ordinary use.
                    for j in 1..self.tree.children(entry).len() {
                        let size = self.tree.children(entry)[j];
                        self.bind_node(size)?;
                    }
                }
                _ => {
                    return Err(BindError::malformed(
                        self.tree,
                        entry,
                        "expected an identifier or an array declaration",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Enter a local variable named by the identifier `name` into the current frame.
    fn declare_local(&mut self, name: NodeId) -> Result<(), BindError> {
        let Some(text) = self.tree.node(name).name() else {
            return Err(BindError::malformed(self.tree, name, "expected an identifier"));
        };
        let symbol = Symbol::new(self.interner.intern(text), SymbolKind::LocalVariable, name);
        let scope = self.current_scope;
        let frame = self.scopes.frame_mut(scope);
        let insertion = frame.insert(symbol);
        if let Some(previous) = insertion.replaced {
            let previous = frame.symbol(previous).map(|s| s.node);
            report_duplicate(self.tree, self.diagnostics, self.policy, name, previous);
        }
        trace!(scope = scope.0, index = insertion.index, "declare local");
        self.tree.node_mut(name).binding = Some(Binding::Symbol(SymbolRef::local(
            self.function,
            scope,
            insertion.index,
        )));
        Ok(())
    }

    // ========================================================================
    // Uses
    // ========================================================================

    /// Bind a used identifier to the innermost declaration of its name.
    ///
    /// Local frames are searched from the current one outwards, then the
    /// global table. Names that are found nowhere are reported and left
    /// unbound.
    fn resolve_identifier(&mut self, id: NodeId) {
        let node = self.tree.node(id);
        let Some(text) = node.name() else {
            return;
        };
        let function = self.function;
        // A name that was never interned cannot have been declared.
        let resolved = self.interner.get(text).and_then(|name| {
            self.scopes
                .lookup(self.current_scope, &name)
                .map(|(scope, index)| SymbolRef::local(function, scope, index))
                .or_else(|| self.globals.get(&name).map(SymbolRef::global))
        });

        match resolved {
            Some(symbol) => {
                trace!(name = text, %symbol, "resolved");
                self.resolved += 1;
                self.tree.node_mut(id).binding = Some(Binding::Symbol(symbol));
            }
            None => {
                debug!(name = text, pos = node.range.pos, "unresolved identifier");
                self.unresolved += 1;
                self.diagnostics.add(Diagnostic::with_range(
                    node.range,
                    &messages::CANNOT_FIND_NAME_0,
                    &[text],
                ));
            }
        }
    }

    /// Move a string literal's text into the pool and turn the node into a reference.
    fn hoist_string(&mut self, id: NodeId) {
        let node = self.tree.node_mut(id);
        if let NodeKind::StringLiteral(text) = &mut node.kind {
            let index = self.pool.intern(std::mem::take(text));
            trace!(%index, "string hoisted");
            node.kind = NodeKind::StringRef(index);
        }
    }
}
