//! Action table compiler (§4.D).
//!
//! Flattens the [`StateStore`] built by [`crate::lr1::build`] into a dense, indexed `ActionTable` —
//! the shape the driver (§4.F) actually consults. Shifts and gotos are stored in the same
//! per-state map (gotos simply use a nonterminal key), matching the teacher's `slr1.rs`
//! `Action`/table split, generalized from separate shift/goto `HashMap`s to one `Action` enum per
//! `(state, symbol)` entry.

use crate::error::{ConflictKind, Result, ToolkitError};
use crate::grammar::Grammar;
use crate::lr1::StateStore;
use crate::symbol::SymbolId;
use std::collections::HashMap;
use tracing::info;

/// One entry of the action/goto table (§3 "Action table").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce { arity: usize, lhs: SymbolId },
    Accept,
}

/// A dense, per-state `symbol -> Action` table (§4.D).
#[derive(Debug, Clone)]
pub struct ActionTable {
    rows: Vec<HashMap<SymbolId, Action>>,
}

impl ActionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, state: usize, symbol: SymbolId) -> Option<&Action> {
        self.rows.get(state).and_then(|row| row.get(&symbol))
    }
}

/// Compiles `store` into a dense [`ActionTable`].
///
/// Overlap among shifts, reductions, and accepts on the same `(state, symbol)` key is impossible
/// given [`crate::lr1::build`]'s conflict detection (§3 invariant I5); this function asserts
/// disjointness defensively rather than silently picking a winner, matching §7's treatment of
/// invariant violations as programmer errors.
pub fn compile(grammar: &Grammar, store: &StateStore) -> Result<ActionTable> {
    let mut rows = Vec::with_capacity(store.states.len());

    for (state_id, state) in store.states.iter().enumerate() {
        let mut row: HashMap<SymbolId, Action> = HashMap::new();

        for (&symbol, &target) in &state.shift {
            insert_once(&mut row, symbol, Action::Shift(target), grammar, state_id)?;
        }
        for (&symbol, &target) in &state.goto {
            insert_once(&mut row, symbol, Action::Shift(target), grammar, state_id)?;
        }
        for (&symbol, &production) in &state.reduce {
            let prod = grammar.production(production);
            let action = Action::Reduce {
                arity: prod.rhs.len(),
                lhs: prod.lhs,
            };
            insert_once(&mut row, symbol, action, grammar, state_id)?;
        }
        for &symbol in &state.accept {
            insert_once(&mut row, symbol, Action::Accept, grammar, state_id)?;
        }

        rows.push(row);
    }

    info!(states = rows.len(), "action table compiled");
    Ok(ActionTable { rows })
}

fn insert_once(
    row: &mut HashMap<SymbolId, Action>,
    symbol: SymbolId,
    action: Action,
    grammar: &Grammar,
    state_id: usize,
) -> Result<()> {
    if let Some(existing) = row.get(&symbol) {
        if *existing != action {
            return Err(ToolkitError::ConflictError {
                state: state_id,
                symbol: grammar.symbols().name(symbol).to_string(),
                kind: ConflictKind::ShiftReduce,
            });
        }
        return Ok(());
    }
    row.insert(symbol, action);
    Ok(())
}
