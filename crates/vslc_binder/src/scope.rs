//! Symbol tables and per-function scope arenas.
//!
//! A [`SymbolTable`] is one scope frame. The global table is a lone frame;
//! each function gets a [`ScopeArena`] whose frame 0 holds the parameters and
//! whose later frames are the blocks of the body, linked to their enclosing
//! frame by `parent`. Frames are never removed when a block closes, only
//! when the whole arena is destroyed.

use crate::symbol::Symbol;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::ops::AddAssign;
use vslc_ast::types::{NodeId, ScopeId};
use vslc_core::index::next_index;
use vslc_core::intern::InternedString;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Result of [`SymbolTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    /// Index of the inserted symbol in its table.
    pub index: u32,
    /// The symbol that held the same name in this frame before, if any.
    pub replaced: Option<u32>,
}

/// A scope frame mapping names to the symbols it owns.
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// Every symbol ever inserted, in insertion order. Replaced symbols stay
    /// here so handles to them remain valid.
    symbols: Vec<Symbol>,
    /// Visible names, in first-declaration order.
    names: FxIndexMap<InternedString, u32>,
    /// The enclosing frame in the same arena (None for roots and globals).
    parent: Option<ScopeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: ScopeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// Insert `symbol` under its name in this frame only.
    ///
    /// A name already present in this frame is rebound to the new symbol.
    pub fn insert(&mut self, mut symbol: Symbol) -> Insertion {
        let index = next_index(self.symbols.len());
        symbol.sequence_number = index as usize;
        let replaced = self.names.insert(symbol.name, index);
        self.symbols.push(symbol);
        Insertion { index, replaced }
    }

    /// Index of the symbol visible under `name` in this frame.
    pub fn get(&self, name: &InternedString) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn contains(&self, name: &InternedString) -> bool {
        self.names.contains_key(name)
    }

    pub fn lookup(&self, name: &InternedString) -> Option<&Symbol> {
        self.get(name).and_then(|index| self.symbol(index))
    }

    pub fn symbol(&self, index: u32) -> Option<&Symbol> {
        self.symbols.get(index as usize)
    }

    pub fn symbol_mut(&mut self, index: u32) -> Option<&mut Symbol> {
        self.symbols.get_mut(index as usize)
    }

    /// Every owned symbol, including replaced ones, by sequence number.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Symbols reachable by name, in first-declaration order.
    pub fn visible(&self) -> impl Iterator<Item = &Symbol> {
        self.names.values().map(move |&index| &self.symbols[index as usize])
    }

    /// Number of visible names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of owned symbols, replaced ones included.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Free this frame and its symbols, returning how many symbols were released.
    pub fn destroy(self) -> usize {
        let Self { symbols, names, .. } = self;
        drop(names);
        let mut released = 0;
        for symbol in symbols {
            drop(symbol);
            released += 1;
        }
        released
    }
}

/// Counts of what a teardown released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TeardownStats {
    pub tables: usize,
    pub symbols: usize,
    pub strings: usize,
}

impl AddAssign for TeardownStats {
    fn add_assign(&mut self, other: Self) {
        self.tables += other.tables;
        self.symbols += other.symbols;
        self.strings += other.strings;
    }
}

/// All scope frames of one function.
#[derive(Debug)]
pub struct ScopeArena {
    function_node: NodeId,
    frames: Vec<SymbolTable>,
}

impl ScopeArena {
    /// A new arena containing only an empty root frame.
    pub fn new(function_node: NodeId) -> Self {
        Self {
            function_node,
            frames: vec![SymbolTable::new()],
        }
    }

    /// The `Function` node this arena belongs to.
    pub fn function_node(&self) -> NodeId {
        self.function_node
    }

    pub fn root(&self) -> &SymbolTable {
        &self.frames[ScopeId::ROOT.index()]
    }

    pub fn root_mut(&mut self) -> &mut SymbolTable {
        &mut self.frames[ScopeId::ROOT.index()]
    }

    #[inline]
    pub fn frame(&self, scope: ScopeId) -> &SymbolTable {
        &self.frames[scope.index()]
    }

    #[inline]
    pub fn frame_mut(&mut self, scope: ScopeId) -> &mut SymbolTable {
        &mut self.frames[scope.index()]
    }

    pub fn get(&self, scope: ScopeId) -> Option<&SymbolTable> {
        self.frames.get(scope.index())
    }

    pub fn frames(&self) -> impl Iterator<Item = (ScopeId, &SymbolTable)> {
        self.frames
            .iter()
            .enumerate()
            .map(|(i, frame)| (ScopeId(i as u32), frame))
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total symbols owned by all frames.
    pub fn symbol_count(&self) -> usize {
        self.frames.iter().map(SymbolTable::symbol_count).sum()
    }

    /// Create an empty frame enclosed by `current` and return it.
    pub fn open_scope(&mut self, current: ScopeId) -> ScopeId {
        debug_assert!(current.index() < self.frames.len());
        let scope = ScopeId(next_index(self.frames.len()));
        self.frames.push(SymbolTable::with_parent(current));
        scope
    }

    /// The frame enclosing `scope`; `None` for the root.
    ///
    /// The closed frame stays in the arena.
    pub fn close_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.frame(scope).parent()
    }

    /// Resolve `name` starting at `scope` and walking outwards.
    pub fn lookup(&self, scope: ScopeId, name: &InternedString) -> Option<(ScopeId, u32)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = self.frame(id);
            if let Some(index) = frame.get(name) {
                return Some((id, index));
            }
            // Parents are always created before their children.
            debug_assert!(frame.parent().map_or(true, |p| p < id));
            current = frame.parent();
        }
        None
    }

    /// Number of frames between `scope` and the root.
    pub fn depth(&self, scope: ScopeId) -> usize {
        let mut depth = 0;
        let mut current = self.frame(scope).parent();
        while let Some(id) = current {
            depth += 1;
            current = self.frame(id).parent();
        }
        depth
    }

    /// Free every frame and every symbol they own.
    pub fn destroy_all(self) -> TeardownStats {
        let mut stats = TeardownStats::default();
        for frame in self.frames {
            stats.tables += 1;
            stats.symbols += frame.destroy();
        }
        stats
    }
}
