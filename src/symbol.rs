//! Symbol interning for context-free grammars.
//!
//! Grammar symbols are string identifiers (§3 "Symbol"), but hashing and comparing item sets by
//! string would make the LR(1) closure computation far more expensive than it needs to be. This
//! module interns every symbol name to a small [`SymbolId`] once, up front, and classifies each id
//! as terminal or nonterminal from the rule set — rather than consulting a scattered predicate on
//! every lookup (§9 "Global mutable `terminal` predicate").
//!
//! The public API of the crate still speaks in symbol names; interning is an internal
//! implementation detail of the table-building pipeline.

use std::collections::HashMap;
use std::fmt;

/// The end-of-input sentinel terminal, `$`.
pub const END_MARKER: &str = "$";

/// An interned symbol: a small index into a [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interner mapping symbol names to [`SymbolId`]s and back.
///
/// `$` is always interned first, as id 0, so every table built from a [`SymbolTable`] can treat it
/// as a known constant (see [`SymbolTable::end_marker`]).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Creates a fresh table with only the `$` sentinel interned.
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::new(),
            ids: HashMap::new(),
        };
        let end = table.intern(END_MARKER);
        debug_assert_eq!(end, SymbolId::new(0));
        table
    }

    /// Returns the id for `name`, interning it if this is the first time it is seen.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = SymbolId::new(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Looks up the id for `name`, without interning it.
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    /// Returns the display name for `id`.
    ///
    /// Panics if `id` was not produced by this table — an internal invariant violation (§7).
    pub fn name(&self, id: SymbolId) -> &str {
        &self.names[id.index()]
    }

    /// The interned id of the `$` end-of-input sentinel.
    pub fn end_marker(&self) -> SymbolId {
        SymbolId::new(0)
    }

    /// Number of distinct symbols interned so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All interned ids, in interning order.
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.names.len()).map(SymbolId::new)
    }
}

/// Per-symbol terminal/nonterminal classification, computed once from a rule set (§9).
///
/// A symbol is a nonterminal iff it appears as the left-hand side of some production; every other
/// interned symbol (including `$`) is a terminal.
#[derive(Debug, Clone)]
pub struct Classification {
    is_nonterminal: Vec<bool>,
}

impl Classification {
    /// Builds a classification table sized to `table`, marking every id in `nonterminals` as a
    /// nonterminal and everything else as a terminal.
    pub fn new(table: &SymbolTable, nonterminals: impl IntoIterator<Item = SymbolId>) -> Self {
        let mut is_nonterminal = vec![false; table.len()];
        for id in nonterminals {
            is_nonterminal[id.index()] = true;
        }
        Self { is_nonterminal }
    }

    pub fn is_nonterminal(&self, id: SymbolId) -> bool {
        self.is_nonterminal[id.index()]
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        !self.is_nonterminal(id)
    }
}
