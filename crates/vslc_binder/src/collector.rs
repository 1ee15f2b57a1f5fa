//! Global collection: the first pass over the top level.
//!
//! Enters every global variable, global array and function into the global
//! table before any body is bound, so function bodies can refer to globals
//! and functions declared after them. Each function also gets its scope
//! arena here, with the parameters already entered into its root frame.

use crate::error::BindError;
use crate::scope::{Insertion, ScopeArena, SymbolTable};
use crate::symbol::{Symbol, SymbolKind};
use tracing::{debug, trace};
use vslc_ast::node::{NodeKind, SyntaxTree};
use vslc_ast::types::{Binding, FunctionId, NodeId, ScopeId, SymbolRef};
use vslc_core::intern::StringInterner;
use vslc_core::index::next_index;
use vslc_core::text::TextRange;
use vslc_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use vslc_options::DuplicatePolicy;

pub(crate) struct GlobalCollector<'u> {
    tree: &'u mut SyntaxTree,
    interner: &'u mut StringInterner,
    globals: &'u mut SymbolTable,
    functions: &'u mut Vec<ScopeArena>,
    diagnostics: &'u mut DiagnosticCollection,
    policy: DuplicatePolicy,
}

impl<'u> GlobalCollector<'u> {
    pub(crate) fn new(
        tree: &'u mut SyntaxTree,
        interner: &'u mut StringInterner,
        globals: &'u mut SymbolTable,
        functions: &'u mut Vec<ScopeArena>,
        diagnostics: &'u mut DiagnosticCollection,
        policy: DuplicatePolicy,
    ) -> Self {
        Self {
            tree,
            interner,
            globals,
            functions,
            diagnostics,
            policy,
        }
    }

    pub(crate) fn collect(mut self) -> Result<(), BindError> {
        let root = self.tree.root();
        if !matches!(self.tree.node(root).kind, NodeKind::Program) {
            return Err(BindError::malformed(self.tree, root, "expected the program root"));
        }

        for i in 0..self.tree.children(root).len() {
            let item = self.tree.children(root)[i];
            match self.tree.node(item).kind {
                NodeKind::GlobalDeclaration => self.collect_global_declaration(item)?,
                NodeKind::Function => self.collect_function(item)?,
                _ => {
                    return Err(BindError::malformed(
                        self.tree,
                        item,
                        "expected a global declaration or a function",
                    ))
                }
            }
        }

        debug!(
            globals = self.globals.len(),
            functions = self.functions.len(),
            "collected globals"
        );
        Ok(())
    }

    fn collect_global_declaration(&mut self, declaration: NodeId) -> Result<(), BindError> {
        for i in 0..self.tree.children(declaration).len() {
            let entry = self.tree.children(declaration)[i];
            match self.tree.node(entry).kind {
                NodeKind::Identifier(_) => {
                    self.declare_global(entry, entry, SymbolKind::GlobalVariable)?;
                }
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
                    // Global storage is sized before any code runs.
                    let size = self.tree.child(entry, 1);
                    if self.tree.children(entry).len() != 2
                        || !size.is_some_and(|id| {
                            matches!(self.tree.node(id).kind, NodeKind::NumberLiteral(_))
                        })
                    {
                        return Err(BindError::malformed(
                            self.tree,
                            entry,
                            "global array size must be a number",
                        ));
                    }
                    self.declare_global(name, name, SymbolKind::GlobalArray)?;
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

    fn collect_function(&mut self, function: NodeId) -> Result<(), BindError> {
        let children = self.tree.children(function);
        let (name, parameters) = match children {
            [name, parameters, _body] => (*name, *parameters),
            _ => {
                return Err(BindError::malformed(
                    self.tree,
                    function,
                    "expected a name, a parameter list and a body",
                ))
            }
        };
        if !matches!(self.tree.node(name).kind, NodeKind::Identifier(_)) {
            return Err(BindError::malformed(self.tree, name, "expected the function name"));
        }
        if !matches!(self.tree.node(parameters).kind, NodeKind::ParameterList) {
            return Err(BindError::malformed(self.tree, parameters, "expected a parameter list"));
        }

        let id = FunctionId(next_index(self.functions.len()));
        let index = self.declare_global(name, function, SymbolKind::Function)?;
        if let Some(symbol) = self.globals.symbol_mut(index) {
            symbol.function = Some(id);
        }

        let mut scopes = ScopeArena::new(function);
        for i in 0..self.tree.children(parameters).len() {
            let parameter = self.tree.children(parameters)[i];
            let Some(text) = self.tree.node(parameter).name() else {
                return Err(BindError::malformed(self.tree, parameter, "expected a parameter name"));
            };
            let symbol = Symbol::new(self.interner.intern(text), SymbolKind::Parameter, parameter);
            let insertion = scopes.root_mut().insert(symbol);
            if let Some(previous) = insertion.replaced {
                let previous = scopes.root().symbol(previous).map(|s| s.node);
                report_duplicate(self.tree, self.diagnostics, self.policy, parameter, previous);
            }
            self.tree.node_mut(parameter).binding =
                Some(Binding::Symbol(SymbolRef::local(id, ScopeId::ROOT, insertion.index)));
        }

        trace!(function = id.0, parameters = scopes.root().len(), "function scope created");
        self.functions.push(scopes);
        self.tree.node_mut(function).binding = Some(Binding::Scope(id));
        Ok(())
    }

    /// Enter a global symbol named by `name` and bind `name` to it.
    fn declare_global(
        &mut self,
        name: NodeId,
        declaration: NodeId,
        kind: SymbolKind,
    ) -> Result<u32, BindError> {
        let Some(text) = self.tree.node(name).name() else {
            return Err(BindError::malformed(self.tree, name, "expected an identifier"));
        };
        let symbol = Symbol::new(self.interner.intern(text), kind, declaration);
        let Insertion { index, replaced } = self.globals.insert(symbol);
        if let Some(previous) = replaced {
            let previous = self.globals.symbol(previous).map(|s| s.node);
            report_duplicate(self.tree, self.diagnostics, self.policy, name, previous);
        }
        self.tree.node_mut(name).binding = Some(Binding::Symbol(SymbolRef::global(index)));
        Ok(index)
    }
}

/// Report a same-frame redeclaration of the identifier `name` according to `policy`.
///
/// `previous` is the declaring node of the replaced symbol.
pub(crate) fn report_duplicate(
    tree: &SyntaxTree,
    diagnostics: &mut DiagnosticCollection,
    policy: DuplicatePolicy,
    name: NodeId,
    previous: Option<NodeId>,
) {
    let message = match policy {
        DuplicatePolicy::Shadow => return,
        DuplicatePolicy::Warn => &messages::DUPLICATE_DECLARATION_0_SHADOWS_EARLIER,
        DuplicatePolicy::Error => &messages::DUPLICATE_DECLARATION_0,
    };
    let node = tree.node(name);
    let text = node.name().unwrap_or_default();
    let mut diagnostic = Diagnostic::with_range(node.range, message, &[text]);
    if let Some(previous) = previous {
        let range: TextRange = tree.node(previous).range;
        diagnostic = diagnostic.with_related(Diagnostic::with_range(
            range,
            &messages::_0_WAS_ALSO_DECLARED_HERE,
            &[text],
        ));
    }
    debug!(name = text, ?policy, "duplicate declaration");
    diagnostics.add(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslc_ast::builder::TreeBuilder;

    struct Collected {
        tree: SyntaxTree,
        interner: StringInterner,
        globals: SymbolTable,
        functions: Vec<ScopeArena>,
        diagnostics: DiagnosticCollection,
    }

    fn collect(mut tree: SyntaxTree, policy: DuplicatePolicy) -> Result<Collected, BindError> {
        let mut interner = StringInterner::new();
        let mut globals = SymbolTable::new();
        let mut functions = Vec::new();
        let mut diagnostics = DiagnosticCollection::new();
        GlobalCollector::new(
            &mut tree,
            &mut interner,
            &mut globals,
            &mut functions,
            &mut diagnostics,
            policy,
        )
        .collect()?;
        Ok(Collected {
            tree,
            interner,
            globals,
            functions,
            diagnostics,
        })
    }

    #[test]
    fn test_collects_globals_in_order() {
        let mut b = TreeBuilder::new();
        let x = b.identifier("x");
        let arr = b.array("arr", 10);
        let decl = b.node(NodeKind::GlobalDeclaration, [x, arr]);
        let body = b.block([]);
        let f = b.function("f", &["a", "b"], body);
        let root = b.program([decl, f]);
        let c = collect(b.finish(root), DuplicatePolicy::Shadow).unwrap();

        let kinds: Vec<_> = c.globals.visible().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SymbolKind::GlobalVariable, SymbolKind::GlobalArray, SymbolKind::Function]
        );
        let f_symbol = c.globals.lookup(&c.interner.get("f").unwrap()).unwrap();
        assert_eq!(f_symbol.node, f);
        assert_eq!(f_symbol.function, Some(FunctionId(0)));
        assert_eq!(c.tree.node(f).binding, Some(Binding::Scope(FunctionId(0))));
        assert_eq!(c.tree.node(x).symbol(), Some(SymbolRef::global(0)));
    }

    #[test]
    fn test_parameters_enter_function_root() {
        let mut b = TreeBuilder::new();
        let body = b.block([]);
        let f = b.function("f", &["a", "b"], body);
        let root = b.program([f]);
        let c = collect(b.finish(root), DuplicatePolicy::Shadow).unwrap();

        assert_eq!(c.functions.len(), 1);
        let params: Vec<_> = c.functions[0]
            .root()
            .visible()
            .map(|s| (c.interner.resolve(s.name).to_string(), s.kind, s.sequence_number))
            .collect();
        assert_eq!(
            params,
            vec![
                ("a".to_string(), SymbolKind::Parameter, 0),
                ("b".to_string(), SymbolKind::Parameter, 1),
            ]
        );
        let a = c.tree.child(c.tree.child(f, 1).unwrap(), 0).unwrap();
        assert_eq!(
            c.tree.node(a).symbol(),
            Some(SymbolRef::local(FunctionId(0), ScopeId::ROOT, 0))
        );
    }

    #[test]
    fn test_duplicate_global_policies() {
        for (policy, codes) in [
            (DuplicatePolicy::Shadow, vec![]),
            (DuplicatePolicy::Warn, vec![3002]),
            (DuplicatePolicy::Error, vec![3003]),
        ] {
            let mut b = TreeBuilder::new();
            let first = b.global_vars(&["g"]);
            let second = b.global_vars(&["g"]);
            let root = b.program([first, second]);
            let c = collect(b.finish(root), policy).unwrap();

            let reported: Vec<_> = c.diagnostics.diagnostics().iter().map(|d| d.code).collect();
            assert_eq!(reported, codes, "{policy:?}");
            // The later declaration wins regardless of policy.
            assert_eq!(c.globals.len(), 1);
            assert_eq!(c.globals.get(&c.interner.get("g").unwrap()), Some(1));
        }
    }

    #[test]
    fn test_duplicate_points_at_earlier_declaration() {
        let mut b = TreeBuilder::new();
        let first = b.identifier("g");
        b.set_range(first, TextRange::new(4, 5));
        let first = b.node(NodeKind::GlobalDeclaration, [first]);
        let second = b.identifier("g");
        b.set_range(second, TextRange::new(14, 15));
        let second = b.node(NodeKind::GlobalDeclaration, [second]);
        let root = b.program([first, second]);
        let c = collect(b.finish(root), DuplicatePolicy::Warn).unwrap();

        let diagnostic = &c.diagnostics.diagnostics()[0];
        assert_eq!(diagnostic.range, Some(TextRange::new(14, 15)));
        assert_eq!(diagnostic.related_information[0].range, Some(TextRange::new(4, 5)));
        assert_eq!(diagnostic.related_information[0].code, 3004);
    }

    #[test]
    fn test_rejects_statement_at_top_level() {
        let mut b = TreeBuilder::new();
        let x = b.identifier("x");
        let one = b.number(1);
        let assign = b.assign(x, one);
        let root = b.program([assign]);
        let err = collect(b.finish(root), DuplicatePolicy::Shadow).err().unwrap();
        assert_eq!(
            err,
            BindError::MalformedNode {
                node: assign,
                kind: "ASSIGNMENT_STATEMENT",
                reason: "expected a global declaration or a function",
            }
        );
    }

    #[test]
    fn test_rejects_global_array_sized_by_name() {
        let mut b = TreeBuilder::new();
        let n = b.global_vars(&["n"]);
        let name = b.identifier("buf");
        let size = b.identifier("n");
        let arr = b.node(NodeKind::ArrayIndexing, [name, size]);
        let decl = b.node(NodeKind::GlobalDeclaration, [arr]);
        let root = b.program([n, decl]);
        let err = collect(b.finish(root), DuplicatePolicy::Shadow).err().unwrap();
        assert_eq!(
            err,
            BindError::MalformedNode {
                node: arr,
                kind: "ARRAY_INDEXING",
                reason: "global array size must be a number",
            }
        );
    }

    #[test]
    fn test_rejects_global_array_without_size() {
        let mut b = TreeBuilder::new();
        let name = b.identifier("buf");
        let arr = b.node(NodeKind::ArrayIndexing, [name]);
        let decl = b.node(NodeKind::GlobalDeclaration, [arr]);
        let root = b.program([decl]);
        let err = collect(b.finish(root), DuplicatePolicy::Shadow).err().unwrap();
        assert!(matches!(err, BindError::MalformedNode { node, .. } if node == arr));
    }

    #[test]
    fn test_rejects_function_without_body() {
        let mut b = TreeBuilder::new();
        let name = b.identifier("f");
        let params = b.node(NodeKind::ParameterList, []);
        let f = b.node(NodeKind::Function, [name, params]);
        let root = b.program([f]);
        let err = collect(b.finish(root), DuplicatePolicy::Shadow).err().unwrap();
        assert!(matches!(err, BindError::MalformedNode { node, .. } if node == f));
    }
}
