//! The compilation unit: one tree plus everything binding produces for it.

use crate::binder::Binder;
use crate::collector::GlobalCollector;
use crate::error::BindError;
use crate::scope::{ScopeArena, SymbolTable, TeardownStats};
use crate::symbol::Symbol;
use tracing::{debug, debug_span, warn};
use vslc_ast::node::SyntaxTree;
use vslc_ast::types::{FunctionId, NodeId, SymbolRef, TableRef};
use vslc_core::intern::StringInterner;
use vslc_core::string_pool::StringPool;
use vslc_diagnostics::DiagnosticCollection;
use vslc_options::BindOptions;

/// Owns a syntax tree and the tables built from it.
///
/// The tree's bindings are handles into this unit's tables, so the two are
/// kept together until [`CompilationUnit::destroy_tables`] splits them.
#[derive(Debug)]
pub struct CompilationUnit {
    tree: SyntaxTree,
    interner: StringInterner,
    globals: SymbolTable,
    functions: Vec<ScopeArena>,
    pool: StringPool,
    diagnostics: DiagnosticCollection,
    options: BindOptions,
    state: BindState,
}

/// Where a unit is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BindState {
    Unbound,
    Bound,
    /// A pass stopped partway; the tables are incomplete.
    Failed(BindError),
}

impl CompilationUnit {
    pub fn new(tree: SyntaxTree, options: BindOptions) -> Self {
        let pool = match options.string_pool_capacity {
            Some(capacity) => StringPool::with_capacity(capacity),
            None => StringPool::new(),
        };
        Self {
            tree,
            interner: StringInterner::new(),
            globals: SymbolTable::new(),
            functions: Vec::new(),
            pool,
            diagnostics: DiagnosticCollection::new(),
            options,
            state: BindState::Unbound,
        }
    }

    /// Build the global table, every function's scopes, and the string pool.
    ///
    /// Unresolved names and duplicates are reported as diagnostics; only a
    /// tree of the wrong shape makes this fail. Use [`Self::ensure_bound`] to
    /// check that the result may go on to code generation.
    ///
    /// A failed call leaves the unit unusable for code generation:
    /// [`Self::ensure_bound`] keeps returning the error.
    pub fn create_tables(&mut self) -> Result<(), BindError> {
        if self.state != BindState::Unbound {
            return Err(BindError::AlreadyBound);
        }
        match self.run_passes() {
            Ok(()) => {
                self.state = BindState::Bound;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "binding stopped");
                self.state = BindState::Failed(err.clone());
                Err(err)
            }
        }
    }

    fn run_passes(&mut self) -> Result<(), BindError> {
        let _span = debug_span!("create_tables", nodes = self.tree.len()).entered();
        let policy = self.options.duplicate_declarations;

        GlobalCollector::new(
            &mut self.tree,
            &mut self.interner,
            &mut self.globals,
            &mut self.functions,
            &mut self.diagnostics,
            policy,
        )
        .collect()?;

        for (i, scopes) in self.functions.iter_mut().enumerate() {
            Binder::new(
                FunctionId(i as u32),
                &mut self.tree,
                &mut self.interner,
                &self.globals,
                scopes,
                &mut self.pool,
                &mut self.diagnostics,
                policy,
            )
            .bind_function()?;
        }

        debug!(
            globals = self.globals.len(),
            functions = self.functions.len(),
            strings = self.pool.len(),
            errors = self.diagnostics.error_count(),
            "tables created"
        );
        Ok(())
    }

    /// Fails unless tables exist and binding reported no errors.
    pub fn ensure_bound(&self) -> Result<(), BindError> {
        match &self.state {
            BindState::Unbound => return Err(BindError::NotBound),
            BindState::Failed(err) => return Err(err.clone()),
            BindState::Bound => {}
        }
        match self.diagnostics.error_count() {
            0 => Ok(()),
            errors => Err(BindError::Failed { errors }),
        }
    }

    /// True once [`Self::create_tables`] has completed successfully.
    pub fn is_bound(&self) -> bool {
        self.state == BindState::Bound
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn globals(&self) -> &SymbolTable {
        &self.globals
    }

    /// Scope arenas, indexed by [`FunctionId`].
    pub fn functions(&self) -> &[ScopeArena] {
        &self.functions
    }

    pub fn function_scopes(&self, function: FunctionId) -> Option<&ScopeArena> {
        self.functions.get(function.index())
    }

    /// The scope arena attached to a `Function` node.
    pub fn scopes_of(&self, function_node: NodeId) -> Option<&ScopeArena> {
        self.tree
            .get(function_node)?
            .function_scope()
            .and_then(|id| self.function_scopes(id))
    }

    pub fn string_pool(&self) -> &StringPool {
        &self.pool
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    fn table(&self, table: TableRef) -> Option<&SymbolTable> {
        match table {
            TableRef::Global => Some(&self.globals),
            TableRef::Local { function, scope } => self.function_scopes(function)?.get(scope),
        }
    }

    pub fn symbol(&self, symbol: SymbolRef) -> Option<&Symbol> {
        self.table(symbol.table)?.symbol(symbol.index)
    }

    /// Mutable access for later phases, e.g. to assign stack offsets.
    pub fn symbol_mut(&mut self, symbol: SymbolRef) -> Option<&mut Symbol> {
        let table = match symbol.table {
            TableRef::Global => &mut self.globals,
            TableRef::Local { function, scope } => {
                let scopes = self.functions.get_mut(function.index())?;
                if scope.index() >= scopes.frame_count() {
                    return None;
                }
                scopes.frame_mut(scope)
            }
        };
        table.symbol_mut(symbol.index)
    }

    /// The symbol an identifier node was bound to.
    pub fn resolved_symbol(&self, node: NodeId) -> Option<&Symbol> {
        self.symbol(self.tree.get(node)?.symbol()?)
    }

    pub fn symbol_name(&self, symbol: &Symbol) -> &str {
        self.interner.resolve(symbol.name)
    }

    pub fn lookup_global(&self, name: &str) -> Option<SymbolRef> {
        let name = self.interner.get(name)?;
        self.globals.get(&name).map(SymbolRef::global)
    }

    /// Free every symbol table, every symbol, and the string pool.
    ///
    /// Returns the tree, whose bindings no longer refer to anything, and
    /// counts of what was released.
    pub fn destroy_tables(self) -> (SyntaxTree, TeardownStats) {
        let CompilationUnit {
            tree,
            interner,
            globals,
            functions,
            pool,
            ..
        } = self;

        let mut stats = TeardownStats {
            tables: 1,
            symbols: globals.destroy(),
            strings: 0,
        };
        for scopes in functions {
            stats += scopes.destroy_all();
        }
        stats.strings = pool.destroy();
        drop(interner);

        debug!(
            tables = stats.tables,
            symbols = stats.symbols,
            strings = stats.strings,
            "tables destroyed"
        );
        (tree, stats)
    }
}
