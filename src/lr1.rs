//! Canonical LR(1) automaton construction (§4.C).
//!
//! Builds the state store: the canonical collection of closed LR(1) item sets, reachable from the
//! augmentation root by the worklist in `build`, together with each state's shift/goto/reduce/accept
//! entries. Conflicts are detected here, at construction time, rather than deferred to table
//! flattening (§4.D) — the same point the teacher's `slr1.rs` `build_tables` assigns a reduce
//! action and checks for a clash, generalized from FOLLOW-set-driven SLR(1) reduction to per-item
//! LR(1) lookaheads.

use crate::error::{ConflictKind, Result, ToolkitError};
use crate::grammar::Grammar;
use crate::item::{self, ItemSet};
use crate::sets::{FirstSets, Nullable};
use crate::symbol::SymbolId;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// An index into [`StateStore::states`].
pub type StateId = usize;

/// One state of the LR(1) automaton: its item set plus the transitions and actions derived from it.
#[derive(Debug, Clone)]
pub struct State {
    pub items: ItemSet,
    /// Shift transitions, keyed by terminal.
    pub shift: HashMap<SymbolId, StateId>,
    /// Goto transitions, keyed by nonterminal.
    pub goto: HashMap<SymbolId, StateId>,
    /// Reduce actions, keyed by lookahead terminal, to a production index.
    pub reduce: HashMap<SymbolId, usize>,
    /// Terminals on which this state accepts.
    pub accept: std::collections::HashSet<SymbolId>,
}

impl State {
    fn empty(items: ItemSet) -> Self {
        Self {
            items,
            shift: HashMap::new(),
            goto: HashMap::new(),
            reduce: HashMap::new(),
            accept: std::collections::HashSet::new(),
        }
    }
}

/// The canonical collection of LR(1) states, keyed by contiguous state ids starting at 0 (the
/// initial state; §3 "State store").
#[derive(Debug, Clone)]
pub struct StateStore {
    pub states: Vec<State>,
}

/// Builds the canonical LR(1) automaton for `grammar`, rooted at `root` with initial lookahead
/// `root_follow` (typically `{$}`).
///
/// Reductions and accepts are assigned as each state's items are classified, so a shift/reduce,
/// reduce/reduce, accept/shift, or accept/reduce clash on the same terminal is reported
/// immediately as a [`ToolkitError::ConflictError`] (§3 invariant I5) instead of being silently
/// overwritten.
pub fn build(
    grammar: &Grammar,
    nullable: &Nullable,
    first: &FirstSets,
    root: SymbolId,
    root_follow: &std::collections::BTreeSet<SymbolId>,
) -> Result<StateStore> {
    let mut start_kernel = ItemSet::new();
    for &prod in grammar.production_indices_of(root) {
        start_kernel.union_lookahead((prod, 0), root_follow.iter().copied());
    }
    let start_state = item::closure(grammar, nullable, first, start_kernel);

    let mut states = vec![State::empty(start_state.clone())];
    let mut seen: HashMap<ItemSet, StateId> = HashMap::new();
    seen.insert(start_state, 0);
    let mut worklist: std::collections::VecDeque<StateId> = std::collections::VecDeque::new();
    worklist.push_back(0);

    while let Some(state_id) = worklist.pop_front() {
        trace!(state_id, worklist_remaining = worklist.len(), "visiting state");
        let items = states[state_id].items.clone();
        let symbols = item::transition_symbols(grammar, &items);

        for symbol in symbols {
            let kernel = item::goto_kernel(grammar, &items, symbol);
            if kernel.is_empty() {
                continue;
            }
            let closed = item::closure(grammar, nullable, first, kernel);
            let target = match seen.get(&closed) {
                Some(&id) => id,
                None => {
                    let id = states.len();
                    trace!(from = state_id, to = id, symbol = %symbol, "new state discovered");
                    states.push(State::empty(closed.clone()));
                    seen.insert(closed, id);
                    worklist.push_back(id);
                    id
                }
            };

            if grammar.classification().is_nonterminal(symbol) {
                states[state_id].goto.insert(symbol, target);
            } else {
                record_shift(&mut states[state_id], symbol, target);
            }
        }

        record_reductions(grammar, &mut states[state_id], state_id, root)?;
    }

    debug!(states = states.len(), "canonical LR(1) automaton built");
    Ok(StateStore { states })
}

/// Records a shift transition on `symbol`. `build`'s per-state loop always finishes every shift
/// before calling [`record_reductions`] for the same state, so `state.reduce`/`state.accept` are
/// still empty here — the shift/reduce and accept/shift checks for this overlap live entirely in
/// `record_reductions`, which runs second and can see both sides.
fn record_shift(state: &mut State, symbol: SymbolId, target: StateId) {
    debug_assert!(!state.reduce.contains_key(&symbol));
    debug_assert!(!state.accept.contains(&symbol));
    state.shift.insert(symbol, target);
}

fn record_reductions(
    grammar: &Grammar,
    state: &mut State,
    state_id: StateId,
    root: SymbolId,
) -> Result<()> {
    let reduce_items: Vec<((usize, usize), Vec<SymbolId>)> = state
        .items
        .iter()
        .filter(|(key, _)| item::is_reduce_item(grammar, *key))
        .map(|(key, lookahead)| (key, lookahead.iter().copied().collect()))
        .collect();

    for ((production, _dot), lookahead) in reduce_items {
        let is_accept = grammar.production(production).lhs == root;
        for terminal in lookahead {
            if is_accept {
                if state.shift.contains_key(&terminal) {
                    return Err(conflict(grammar, state_id, terminal, ConflictKind::AcceptShift));
                }
                if state.reduce.contains_key(&terminal) {
                    return Err(conflict(grammar, state_id, terminal, ConflictKind::AcceptReduce));
                }
                state.accept.insert(terminal);
            } else {
                if state.shift.contains_key(&terminal) {
                    return Err(conflict(grammar, state_id, terminal, ConflictKind::ShiftReduce));
                }
                if state.accept.contains(&terminal) {
                    return Err(conflict(grammar, state_id, terminal, ConflictKind::AcceptReduce));
                }
                match state.reduce.get(&terminal) {
                    Some(&existing) if existing != production => {
                        return Err(conflict(grammar, state_id, terminal, ConflictKind::ReduceReduce));
                    }
                    _ => {
                        state.reduce.insert(terminal, production);
                    }
                }
            }
        }
    }
    Ok(())
}

fn conflict(grammar: &Grammar, state: StateId, symbol: SymbolId, kind: ConflictKind) -> ToolkitError {
    let symbol = grammar.symbols().name(symbol).to_string();
    warn!(state, %symbol, %kind, "conflict detected while building action table");
    ToolkitError::ConflictError { state, symbol, kind }
}
