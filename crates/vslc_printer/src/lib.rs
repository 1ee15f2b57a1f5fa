//! vslc_printer: Text dumps of a bound compilation unit.
//!
//! Dumps are for people reading compiler output, not for later phases:
//! the global symbol table with each function's frames nested under it, the
//! string pool, and the syntax tree annotated with what the binder attached.

use vslc_ast::node::NodeKind;
use vslc_ast::types::{Binding, NodeId, ScopeId};
use vslc_binder::{CompilationUnit, ScopeArena, SymbolTable};

bitflags::bitflags! {
    /// Which parts of a unit [`print_tables`] writes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DumpSections: u8 {
        const SYMBOLS     = 1 << 0;
        const STRINGS     = 1 << 1;
        const SYNTAX_TREE = 1 << 2;
        const ALL = Self::SYMBOLS.bits() | Self::STRINGS.bits() | Self::SYNTAX_TREE.bits();
    }
}

/// Options for the printer.
pub struct PrinterOptions {
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
        }
    }
}

/// Writes dumps of one compilation unit.
pub struct Printer<'u> {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
    unit: &'u CompilationUnit,
}

impl<'u> Printer<'u> {
    pub fn new(unit: &'u CompilationUnit) -> Self {
        Self::with_options(unit, PrinterOptions::default())
    }

    pub fn with_options(unit: &'u CompilationUnit, options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(1024),
            indent_level: 0,
            options,
            unit,
        }
    }

    /// Print the selected sections, separated by a header line each.
    pub fn print_tables(&mut self, sections: DumpSections) -> String {
        let unit = self.unit;
        self.output.clear();
        if sections.contains(DumpSections::SYMBOLS) {
            self.write_line("== Symbol table ==");
            self.write_table(unit.globals());
        }
        if sections.contains(DumpSections::STRINGS) {
            self.write_line("== String list ==");
            self.write_strings();
        }
        if sections.contains(DumpSections::SYNTAX_TREE) {
            self.write_line("== Bound syntax tree ==");
            self.write_node(unit.tree().root());
        }
        std::mem::take(&mut self.output)
    }

    /// `"{seq}: {KIND}({name})"` per global; each function's frames follow
    /// its symbol, one indentation level deeper per nesting level.
    pub fn print_symbol_table(&mut self) -> String {
        let unit = self.unit;
        self.output.clear();
        self.write_table(unit.globals());
        std::mem::take(&mut self.output)
    }

    /// `"{i}: {text}"` per pooled string.
    pub fn print_string_list(&mut self) -> String {
        self.output.clear();
        self.write_strings();
        std::mem::take(&mut self.output)
    }

    /// One node per line with its payload and binding.
    pub fn print_syntax_tree(&mut self) -> String {
        let unit = self.unit;
        self.output.clear();
        self.write_node(unit.tree().root());
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Symbol tables
    // ========================================================================

    fn write_table(&mut self, table: &SymbolTable) {
        let unit = self.unit;
        for symbol in table.symbols() {
            self.write_line(&format!(
                "{}: {}({})",
                symbol.sequence_number,
                symbol.kind,
                unit.symbol_name(symbol)
            ));
            if let Some(scopes) = symbol.function.and_then(|f| unit.function_scopes(f)) {
                let nesting = FrameNesting::new(scopes);
                self.increase_indent();
                self.write_frame(scopes, &nesting, ScopeId::ROOT);
                self.decrease_indent();
            }
        }
    }

    fn write_frame(&mut self, scopes: &ScopeArena, nesting: &FrameNesting, scope: ScopeId) {
        self.write_table(scopes.frame(scope));
        for &child in nesting.children(scope) {
            self.increase_indent();
            self.write_frame(scopes, nesting, child);
            self.decrease_indent();
        }
    }

    // ========================================================================
    // String list
    // ========================================================================

    fn write_strings(&mut self) {
        let unit = self.unit;
        for (index, text) in unit.string_pool().iter() {
            self.write_line(&format!("{index}: {text}"));
        }
    }

    // ========================================================================
    // Syntax tree
    // ========================================================================

    fn write_node(&mut self, id: NodeId) {
        let unit = self.unit;
        let node = unit.tree().node(id);
        let mut line = node.kind.label().to_string();
        match &node.kind {
            NodeKind::Identifier(name) => line.push_str(&format!(" ({name})")),
            NodeKind::NumberLiteral(value) => line.push_str(&format!(" ({value})")),
            NodeKind::StringLiteral(text) => line.push_str(&format!(" ({text})")),
            NodeKind::StringRef(index) => line.push_str(&format!(" ({index})")),
            NodeKind::Expression(op) => line.push_str(&format!(" ({})", op.as_str())),
            NodeKind::Relation(op) => line.push_str(&format!(" ({})", op.as_str())),
            _ => {}
        }
        match node.binding {
            Some(Binding::Symbol(symbol)) => match unit.symbol(symbol) {
                Some(target) => line.push_str(&format!(" -> {} {symbol}", target.kind)),
                None => line.push_str(&format!(" -> {symbol}")),
            },
            Some(Binding::Scope(function)) => line.push_str(&format!(" [scope fn{}]", function.0)),
            None => {}
        }
        self.write_line(&line);

        self.increase_indent();
        for &child in &node.children {
            self.write_node(child);
        }
        self.decrease_indent();
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    fn write_line(&mut self, s: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
        self.output.push_str(s);
        self.output.push_str(&self.options.new_line);
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// Child frames of every frame in one arena, in opening order.
struct FrameNesting {
    children: Vec<Vec<ScopeId>>,
}

impl FrameNesting {
    fn new(scopes: &ScopeArena) -> Self {
        let mut children = vec![Vec::new(); scopes.frame_count()];
        for (id, frame) in scopes.frames() {
            if let Some(parent) = frame.parent() {
                children[parent.index()].push(id);
            }
        }
        Self { children }
    }

    fn children(&self, scope: ScopeId) -> &[ScopeId] {
        &self.children[scope.index()]
    }
}

/// Dump the global table and every function's frames.
pub fn print_symbol_table(unit: &CompilationUnit) -> String {
    Printer::new(unit).print_symbol_table()
}

/// Dump the string pool.
pub fn print_string_list(unit: &CompilationUnit) -> String {
    Printer::new(unit).print_string_list()
}

/// Dump the (bound) syntax tree.
pub fn print_syntax_tree(unit: &CompilationUnit) -> String {
    Printer::new(unit).print_syntax_tree()
}

pub fn print_tables(unit: &CompilationUnit, sections: DumpSections) -> String {
    Printer::new(unit).print_tables(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vslc_ast::types::Operator;
    use vslc_ast::TreeBuilder;
    use vslc_options::BindOptions;

    fn bound_unit() -> CompilationUnit {
        // var x; func f(a) { var y; { var z; print "hi", z } x = a + y }
        let mut b = TreeBuilder::new();
        let globals = b.global_vars(&["x"]);
        let decl = b.local_vars(&["y"]);
        let inner_decl = b.local_vars(&["z"]);
        let text = b.string("\"hi\"");
        let z = b.identifier("z");
        let print = b.print([text, z]);
        let inner = b.block([inner_decl, print]);
        let x = b.identifier("x");
        let a = b.identifier("a");
        let y = b.identifier("y");
        let sum = b.binary(Operator::Add, a, y);
        let assign = b.assign(x, sum);
        let body = b.block([decl, inner, assign]);
        let f = b.function("f", &["a"], body);
        let root = b.program([globals, f]);

        let mut unit = CompilationUnit::new(b.finish(root), BindOptions::default());
        unit.create_tables().unwrap();
        unit
    }

    #[test]
    fn test_print_symbol_table() {
        let unit = bound_unit();
        assert_eq!(
            print_symbol_table(&unit),
            "0: GLOBAL_VAR(x)\n\
             1: FUNCTION(f)\n\
             \x20   0: PARAMETER(a)\n\
             \x20       0: LOCAL_VAR(y)\n\
             \x20           0: LOCAL_VAR(z)\n"
        );
    }

    #[test]
    fn test_print_string_list() {
        let unit = bound_unit();
        assert_eq!(print_string_list(&unit), "0: \"hi\"\n");
    }

    #[test]
    fn test_print_syntax_tree_shows_bindings() {
        let unit = bound_unit();
        let dump = print_syntax_tree(&unit);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "PROGRAM");
        assert_eq!(lines[1], "    GLOBAL_DECLARATION");
        assert_eq!(lines[2], "        IDENTIFIER (x) -> GLOBAL_VAR global#0");
        assert_eq!(lines[3], "    FUNCTION [scope fn0]");
        assert!(dump.contains("STRING_LIST_REFERENCE (0)"));
        assert!(dump.contains("IDENTIFIER (z) -> LOCAL_VAR fn0/scope2#0"));
        assert!(dump.contains("EXPRESSION (+)"));
    }

    #[test]
    fn test_print_tables_sections() {
        let unit = bound_unit();
        let strings_only = print_tables(&unit, DumpSections::STRINGS);
        assert_eq!(strings_only, "== String list ==\n0: \"hi\"\n");

        let all = print_tables(&unit, DumpSections::ALL);
        assert!(all.starts_with("== Symbol table ==\n0: GLOBAL_VAR(x)\n"));
        assert!(all.contains("== String list ==\n"));
        assert!(all.contains("== Bound syntax tree ==\nPROGRAM\n"));
    }

    #[test]
    fn test_sibling_frames_print_at_same_depth() {
        let mut b = TreeBuilder::new();
        let first_decl = b.local_vars(&["p"]);
        let first = b.block([first_decl]);
        let second_decl = b.local_vars(&["q"]);
        let second = b.block([second_decl]);
        let body = b.block([first, second]);
        let f = b.function("g", &[], body);
        let root = b.program([f]);
        let mut unit = CompilationUnit::new(b.finish(root), BindOptions::default());
        unit.create_tables().unwrap();

        assert_eq!(
            print_symbol_table(&unit),
            "0: FUNCTION(g)\n\
             \x20           0: LOCAL_VAR(p)\n\
             \x20           0: LOCAL_VAR(q)\n"
        );
    }

    #[test]
    fn test_custom_indent_and_newline() {
        let unit = bound_unit();
        let options = PrinterOptions {
            indent_str: "\t".to_string(),
            new_line: "\r\n".to_string(),
        };
        let dump = Printer::with_options(&unit, options).print_symbol_table();
        assert_eq!(
            dump,
            "0: GLOBAL_VAR(x)\r\n\
             1: FUNCTION(f)\r\n\
             \t0: PARAMETER(a)\r\n\
             \t\t0: LOCAL_VAR(y)\r\n\
             \t\t\t0: LOCAL_VAR(z)\r\n"
        );
    }

    #[test]
    fn test_deep_nesting_prints_each_frame_once() {
        let mut b = TreeBuilder::new();
        let mut block = b.block([]);
        for depth in (0..50).rev() {
            let name = format!("v{depth}");
            let decl = b.local_vars(&[name.as_str()]);
            block = b.block([decl, block]);
        }
        let f = b.function("f", &[], block);
        let root = b.program([f]);
        let mut unit = CompilationUnit::new(b.finish(root), BindOptions::default());
        unit.create_tables().unwrap();

        let dump = print_symbol_table(&unit);
        assert_eq!(dump.lines().filter(|l| l.contains("LOCAL_VAR(v")).count(), 50);
        let last = dump.lines().find(|l| l.ends_with("LOCAL_VAR(v49)")).unwrap();
        // Root frame at depth 1, first block at depth 2.
        assert!(last.starts_with(&"    ".repeat(51)));
    }

    #[test]
    fn test_unbound_tree_prints_literals() {
        let mut b = TreeBuilder::new();
        let text = b.string("\"raw\"");
        let print = b.print([text]);
        let body = b.block([print]);
        let f = b.function("f", &[], body);
        let root = b.program([f]);
        let unit = CompilationUnit::new(b.finish(root), BindOptions::default());
        assert!(print_syntax_tree(&unit).contains("STRING_LITERAL (\"raw\")"));
        assert_eq!(print_string_list(&unit), "");
    }
}
