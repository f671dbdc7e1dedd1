//! LR shift/reduce driver and parse forest (§4.F, §6.3, §6.4).
//!
//! A stack machine: a state-id stack mirrors the automaton's current path, and a parallel forest
//! stack carries one [`ForestNode`] per symbol presently on the state stack. Reductions pop both
//! stacks in lockstep, build an interior node, and push it back before performing the goto —
//! exactly the shape the teacher's `slr1.rs` `parse` loop drives, generalized from a `bool` result
//! to a forest and from SLR(1)'s single-symbol reduce lookup to the dense [`ActionTable`].

use crate::error::{Result, ToolkitError};
use crate::grammar::Grammar;
use crate::symbol::SymbolId;
use crate::table::{Action, ActionTable};
use crate::tokenizer::Token;

/// A node of the parse forest (§3 "Parse forest node", §6.4).
///
/// Terminal nodes carry the matched token text; nonterminal nodes are labeled `":"+lhs` and list
/// their children in rhs order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestNode {
    Leaf(String),
    Node(String, Vec<ForestNode>),
}

/// Drives `table` over `tokens`, returning the accepted forest root or the first [`ToolkitError`]
/// encountered (§6.3).
///
/// `tokens` must be terminated by a `$`-classed token (the tokenizer always appends one). Each
/// token is consumed only once a `Shift` or `Accept` action is taken on it; `Reduce` actions loop
/// without advancing the input, matching §4.F's termination argument.
pub fn parse(grammar: &Grammar, table: &ActionTable, tokens: &[Token]) -> Result<ForestNode> {
    let mut state_stack: Vec<usize> = vec![0];
    let mut forest_stack: Vec<ForestNode> = Vec::new();

    let mut index = 0;
    loop {
        let token = &tokens[index];
        let symbol = grammar.symbols().get(&token.class).ok_or_else(|| {
            ToolkitError::SyntaxError {
                state: *state_stack.last().unwrap(),
                symbol: token.class.clone(),
                line: token.start.line,
                column: token.start.column,
            }
        })?;

        let top = *state_stack.last().unwrap();
        let action = table.get(top, symbol).cloned().ok_or_else(|| {
            ToolkitError::SyntaxError {
                state: top,
                symbol: token.class.clone(),
                line: token.start.line,
                column: token.start.column,
            }
        })?;

        match action {
            Action::Shift(next) => {
                state_stack.push(next);
                forest_stack.push(ForestNode::Leaf(token.text.clone()));
                index += 1;
            }
            Action::Reduce { arity, lhs } => {
                reduce(grammar, table, &mut state_stack, &mut forest_stack, arity, lhs)?;
            }
            Action::Accept => {
                return Ok(forest_stack
                    .pop()
                    .expect("accept only fires with exactly one forest node remaining"));
            }
        }
    }
}

fn reduce(
    grammar: &Grammar,
    table: &ActionTable,
    state_stack: &mut Vec<usize>,
    forest_stack: &mut Vec<ForestNode>,
    arity: usize,
    lhs: SymbolId,
) -> Result<()> {
    let split = forest_stack.len() - arity;
    let children: Vec<ForestNode> = forest_stack.split_off(split);
    state_stack.truncate(state_stack.len() - arity);

    let label = format!(":{}", grammar.symbols().name(lhs));
    forest_stack.push(ForestNode::Node(label, children));

    let top = *state_stack.last().unwrap();
    match table.get(top, lhs) {
        Some(Action::Shift(next)) => {
            state_stack.push(*next);
            Ok(())
        }
        _ => Err(ToolkitError::SyntaxError {
            state: top,
            symbol: grammar.symbols().name(lhs).to_string(),
            line: 0,
            column: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::lr1;
    use crate::sets::{compute_first_sets, compute_nullable};
    use crate::table;
    use crate::tokenizer;
    use std::collections::BTreeSet;

    const EXPR_GRAMMAR: &str = "
        Start  = Add
        Add    = Add + Factor
        Add    = Factor
        Factor = Factor * Term
        Factor = Term
        Term   = ( Add )
        Term   = name
        Term   = int
        name  := abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_ abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_0123456789
        int   := 0123456789 0123456789
    ";

    fn build_pipeline(text: &str, root: &str) -> (Grammar, ActionTable) {
        let grammar = Grammar::parse(text, root).unwrap();
        let nullable = compute_nullable(&grammar);
        let first = compute_first_sets(&grammar, &nullable);
        let root_id = grammar.start_symbol();
        let end = BTreeSet::from([grammar.symbols().end_marker()]);
        let store = lr1::build(&grammar, &nullable, &first, root_id, &end).unwrap();
        let table = table::compile(&grammar, &store).unwrap();
        (grammar, table)
    }

    fn run(grammar: &Grammar, table: &ActionTable, input: &str) -> Result<ForestNode> {
        let classes = tokenizer::build_token_classes(grammar).unwrap();
        let tokens = tokenizer::tokenize(&classes, input).unwrap();
        parse(grammar, table, &tokens)
    }

    fn leaf(s: &str) -> ForestNode {
        ForestNode::Leaf(s.to_string())
    }

    fn node(label: &str, children: Vec<ForestNode>) -> ForestNode {
        ForestNode::Node(label.to_string(), children)
    }

    #[test]
    fn parses_single_term_s2() {
        let (grammar, table) = build_pipeline(EXPR_GRAMMAR, "Start");
        let forest = run(&grammar, &table, "x").unwrap();
        let expected = node(":Add", vec![node(":Factor", vec![node(":Term", vec![leaf("x")])])]);
        assert_eq!(forest, expected);
    }

    #[test]
    fn parses_addition_s1() {
        let (grammar, table) = build_pipeline(EXPR_GRAMMAR, "Start");
        let forest = run(&grammar, &table, "x+y").unwrap();
        let expected = node(
            ":Add",
            vec![
                node(":Add", vec![node(":Factor", vec![node(":Term", vec![leaf("x")])])]),
                leaf("+"),
                node(":Factor", vec![node(":Term", vec![leaf("y")])]),
            ],
        );
        assert_eq!(forest, expected);
    }

    #[test]
    fn whitespace_does_not_change_the_forest_s4() {
        let (grammar, table) = build_pipeline(EXPR_GRAMMAR, "Start");
        let a = run(&grammar, &table, "x+y").unwrap();
        let b = run(&grammar, &table, "x+ y\n").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unclosed_paren_is_a_syntax_error_at_end_of_input_s5() {
        let (grammar, table) = build_pipeline(EXPR_GRAMMAR, "Start");
        let err = run(&grammar, &table, "(").unwrap_err();
        match err {
            ToolkitError::SyntaxError { line, column, .. } => {
                assert_eq!((line, column), (1, 2));
            }
            other => panic!("expected SyntaxError, got {other:?}"),
        }
    }
}
