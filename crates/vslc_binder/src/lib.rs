//! vslc_binder: Symbol table construction and name resolution for VSL.
//!
//! Binding runs in two passes over a parsed [`SyntaxTree`](vslc_ast::SyntaxTree):
//! global collection enters every top-level name, then each function body
//! is walked to build its block scopes, bind identifiers to symbols and move
//! string literals into the string pool. [`CompilationUnit`] drives both.

mod binder;
mod collector;
mod error;
mod scope;
mod symbol;
mod unit;

pub use binder::Binder;
pub use error::BindError;
pub use scope::{Insertion, ScopeArena, SymbolTable, TeardownStats};
pub use symbol::{Symbol, SymbolKind};
pub use unit::CompilationUnit;
