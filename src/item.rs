//! LR(1) items and item sets (§3 "LR(1) item", "Item set"; §4.C).
//!
//! An item is keyed by `(production index, dot position)` — equivalent to `(lhs, rhs, dot)` since
//! a production index already determines both (§9 "Interned symbols") — paired with its lookahead
//! set. Representing an [`ItemSet`] as a sorted map from that key to its lookahead set gives
//! canonical ordering for free (§9 "Hashable item sets") and makes "union this lookahead into the
//! existing item with the same key" (§3 invariant I3) a single map operation instead of a linear
//! scan, which is how the teacher's `slr1.rs` `Item`/`ItemSet` (a `HashSet<Item>`) had to do it for
//! LR(0).

use crate::grammar::Grammar;
use crate::sets::{first_of_sequence, FirstSets, Nullable};
use crate::symbol::SymbolId;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// `(production index, dot position)` — the part of an LR(1) item that does not vary with
/// lookahead merging.
pub type ItemKey = (usize, usize);

/// A canonically ordered, hashable set of LR(1) items (§3 "Item set").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ItemSet(BTreeMap<ItemKey, BTreeSet<SymbolId>>);

impl ItemSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Unions `lookahead` into the item keyed by `key`, creating it if absent.
    ///
    /// Returns `true` if the item's lookahead set grew (or the item was newly created).
    pub fn union_lookahead(
        &mut self,
        key: ItemKey,
        lookahead: impl IntoIterator<Item = SymbolId>,
    ) -> bool {
        let entry = self.0.entry(key).or_default();
        let before = entry.len();
        entry.extend(lookahead);
        entry.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &BTreeSet<SymbolId>)> {
        self.0.iter().map(|(&k, v)| (k, v))
    }

    pub fn lookahead_of(&self, key: ItemKey) -> Option<&BTreeSet<SymbolId>> {
        self.0.get(&key)
    }
}

/// Returns the symbol immediately to the right of the dot, or `None` if the dot is at the end
/// (a reduce item).
pub fn symbol_after_dot(grammar: &Grammar, (production, dot): ItemKey) -> Option<SymbolId> {
    grammar.production(production).rhs.get(dot).copied()
}

pub fn is_reduce_item(grammar: &Grammar, (production, dot): ItemKey) -> bool {
    dot >= grammar.production(production).rhs.len()
}

/// Closes `kernel` under prediction and lookahead propagation (§4.C "Closure").
///
/// Iterates to a fixpoint: each pass adds the dot-0 item for every production of every
/// nonterminal found immediately after a dot, with lookahead `FIRST(βL)`, and unions that
/// lookahead into any pre-existing item with the same key (I3). Items added in the same pass can
/// themselves expose new nonterminals-after-dot, and an item's own lookahead can still be growing
/// when a later item depends on it (§9 "Depends-on edges") — both are handled by simply repeating
/// the full pass until nothing changes, rather than tracking an explicit dependency graph.
pub fn closure(
    grammar: &Grammar,
    nullable: &Nullable,
    first: &FirstSets,
    mut set: ItemSet,
) -> ItemSet {
    let mut pass = 0;
    loop {
        pass += 1;
        let mut changed = false;
        let snapshot: Vec<(ItemKey, BTreeSet<SymbolId>)> =
            set.iter().map(|(k, la)| (k, la.clone())).collect();

        for (key, lookahead) in snapshot {
            let Some(sym) = symbol_after_dot(grammar, key) else {
                continue;
            };
            if !grammar.classification().is_nonterminal(sym) {
                continue;
            }
            let (production, dot) = key;
            let beta = &grammar.production(production).rhs[dot + 1..];
            let mut propagated = first_of_sequence(beta, nullable, first);
            if beta.iter().all(|s| nullable.contains(s)) {
                propagated.extend(lookahead.iter().copied());
            }
            for &predicted in grammar.production_indices_of(sym) {
                if set.union_lookahead((predicted, 0), propagated.iter().copied()) {
                    trace!(pass, predicted_production = predicted, after = %sym, "closure predicted item grew");
                    changed = true;
                }
            }
        }

        trace!(pass, items = set.len(), changed, "closure pass complete");
        if !changed {
            return set;
        }
    }
}

/// Computes the (unclosed) kernel of `goto(set, x)`: every item in `set` with `x` after the dot,
/// shifted one position, carrying its lookahead unchanged (§4.C invariant I4).
pub fn goto_kernel(grammar: &Grammar, set: &ItemSet, x: SymbolId) -> ItemSet {
    let mut kernel = ItemSet::new();
    for (key, lookahead) in set.iter() {
        if symbol_after_dot(grammar, key) == Some(x) {
            let (production, dot) = key;
            kernel.union_lookahead((production, dot + 1), lookahead.iter().copied());
        }
    }
    kernel
}

/// All distinct symbols immediately after a dot in `set` — the candidates for a `goto` transition.
pub fn transition_symbols(grammar: &Grammar, set: &ItemSet) -> BTreeSet<SymbolId> {
    set.iter()
        .filter_map(|(key, _)| symbol_after_dot(grammar, key))
        .collect()
}
