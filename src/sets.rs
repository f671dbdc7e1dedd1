//! Nullable and FIRST set computation (§4.B).
//!
//! Both are least fixpoints over the rule set, computed by repeated full sweeps until a sweep
//! adds nothing — the same shape as the teacher's FIRST/FOLLOW fixpoint loop, but generalized to
//! interned symbols and with FOLLOW dropped (the canonical LR(1) core propagates lookaheads
//! per-item during closure instead; see SPEC_FULL.md §9 Open Question (b)).

use crate::grammar::Grammar;
use crate::symbol::SymbolId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// The set of nonterminals that can derive the empty string (§3 invariant I2).
pub type Nullable = HashSet<SymbolId>;

/// FIRST(A) for every interned symbol `A`: terminals map to the singleton `{A}`, nonterminals to
/// the fixpoint computed below. FIRST sets never contain anything but terminals.
pub type FirstSets = HashMap<SymbolId, HashSet<SymbolId>>;

/// Computes the nullable set: the least fixpoint of "some production's rhs is all-nullable".
pub fn compute_nullable(grammar: &Grammar) -> Nullable {
    let mut nullable = Nullable::new();
    let mut changed = true;
    let mut sweep = 0;
    while changed {
        sweep += 1;
        changed = false;
        for production in grammar.all_productions() {
            if nullable.contains(&production.lhs) {
                continue;
            }
            if production.rhs.iter().all(|s| nullable.contains(s)) {
                trace!(lhs = %production.lhs, sweep, "nullable production found");
                nullable.insert(production.lhs);
                changed = true;
            }
        }
    }
    debug!(sweeps = sweep, nullable = nullable.len(), "nullable fixpoint converged");
    nullable
}

/// Computes FIRST(A) for every symbol in the grammar (terminals and nonterminals alike).
pub fn compute_first_sets(grammar: &Grammar, nullable: &Nullable) -> FirstSets {
    let mut first: FirstSets = HashMap::new();
    for id in grammar.symbols().ids() {
        let seed = if grammar.classification().is_terminal(id) {
            HashSet::from([id])
        } else {
            HashSet::new()
        };
        first.insert(id, seed);
    }

    let mut changed = true;
    let mut sweep = 0;
    while changed {
        sweep += 1;
        changed = false;
        for production in grammar.all_productions() {
            let rhs_first = first_of_sequence(&production.rhs, nullable, &first);
            let entry = first.get_mut(&production.lhs).unwrap();
            let before = entry.len();
            entry.extend(rhs_first);
            if entry.len() != before {
                trace!(lhs = %production.lhs, sweep, grew_to = entry.len(), "FIRST set grew");
                changed = true;
            }
        }
    }
    debug!(sweeps = sweep, symbols = first.len(), "FIRST fixpoint converged");
    first
}

/// FIRST of a symbol sequence: union FIRST of each symbol left to right, stopping at the first
/// non-nullable symbol (§4.C closure step 2).
pub fn first_of_sequence(seq: &[SymbolId], nullable: &Nullable, first: &FirstSets) -> HashSet<SymbolId> {
    let mut result = HashSet::new();
    for &sym in seq {
        if let Some(f) = first.get(&sym) {
            result.extend(f.iter().copied());
        }
        if !nullable.contains(&sym) {
            return result;
        }
    }
    result
}
