//! End-to-end tests driving the full pipeline — grammar text in, parse forest out — against the
//! scenarios from §8 of the specification, using the §6.1 expression grammar.

use lr1_toolkit::{build, parse, GeneratedTables, GeneratorConfig};
use lr1_toolkit::driver::ForestNode;
use lr1_toolkit::error::ToolkitError;
use lr1_toolkit::tokenizer;
use pretty_assertions::assert_eq;

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

fn generate() -> GeneratedTables {
    build(EXPR_GRAMMAR, &GeneratorConfig::default()).unwrap()
}

fn run(generated: &GeneratedTables, input: &str) -> ForestNode {
    let tokens = tokenizer::tokenize(&generated.token_classes, input).unwrap();
    parse(&generated.grammar, &generated.action_table, &tokens).unwrap()
}

fn leaf(s: &str) -> ForestNode {
    ForestNode::Leaf(s.to_string())
}

fn node(label: &str, children: Vec<ForestNode>) -> ForestNode {
    ForestNode::Node(label.to_string(), children)
}

/// S1. `x+y` ⇒ `[":Add", [":Add", [":Factor", [":Term", "x"]]], "+", [":Factor", [":Term", "y"]]]`.
#[test]
fn s1_simple_addition() {
    let generated = generate();
    let forest = run(&generated, "x+y");
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

/// S2. `x` ⇒ `[":Add", [":Factor", [":Term", "x"]]]`.
#[test]
fn s2_single_term() {
    let generated = generate();
    let forest = run(&generated, "x");
    let expected = node(":Add", vec![node(":Factor", vec![node(":Term", vec![leaf("x")])])]);
    assert_eq!(forest, expected);
}

/// S3. `n * (4+5)*3 + somename` — nested parenthesization, two precedence levels, multi-char
/// `name`/`int` tokens.
#[test]
fn s3_nested_precedence_and_parens() {
    let generated = generate();
    let forest = run(&generated, "n * (4+5)*3 + somename");

    let inner_add = node(
        ":Add",
        vec![
            node(":Add", vec![node(":Factor", vec![node(":Term", vec![leaf("4")])])]),
            leaf("+"),
            node(":Factor", vec![node(":Term", vec![leaf("5")])]),
        ],
    );
    let paren_term = node(":Term", vec![leaf("("), inner_add, leaf(")")]);
    let times_paren = node(
        ":Factor",
        vec![node(":Factor", vec![node(":Term", vec![leaf("n")])]), leaf("*"), paren_term],
    );
    let times_three = node(":Factor", vec![times_paren, leaf("*"), node(":Term", vec![leaf("3")])]);
    let expected = node(
        ":Add",
        vec![
            node(":Add", vec![times_three]),
            leaf("+"),
            node(":Factor", vec![node(":Term", vec![leaf("somename")])]),
        ],
    );
    assert_eq!(forest, expected);
}

/// S4. Whitespace between tokens never changes the forest (P5).
#[test]
fn s4_whitespace_idempotence() {
    let generated = generate();
    assert_eq!(run(&generated, "x+y"), run(&generated, "x+ y\n"));
}

/// S5. `(` alone fails with a syntax error on the synthetic `$` at the position right after it.
#[test]
fn s5_unclosed_paren_is_a_syntax_error() {
    let generated = generate();
    let tokens = tokenizer::tokenize(&generated.token_classes, "(").unwrap();
    let err = parse(&generated.grammar, &generated.action_table, &tokens).unwrap_err();
    match err {
        ToolkitError::SyntaxError { symbol, line, column, .. } => {
            assert_eq!(symbol, "$");
            assert_eq!((line, column), (1, 2));
        }
        other => panic!("expected SyntaxError, got {other:?}"),
    }
}

/// S6 (first half). `A = a | A a` is left-recursive but unambiguous: it must build without
/// conflict and parse a run of `a`s, associating to the left.
#[test]
fn s6_left_recursive_unambiguous_grammar_builds_and_parses() {
    let generated = build("Start = A\nA = a\nA = A a", &GeneratorConfig::default()).unwrap();
    let forest = run(&generated, "a a a");
    let expected = node(
        ":A",
        vec![
            node(":A", vec![node(":A", vec![leaf("a")]), leaf("a")]),
            leaf("a"),
        ],
    );
    assert_eq!(forest, expected);
}

/// S6 (second half). `A -> a B`, `A -> a C`, `B -> b`, `C -> b` is truly ambiguous under one
/// token of lookahead: after `a b` nothing distinguishes a reduction to `B` from one to `C`.
#[test]
fn s6_truly_ambiguous_grammar_is_rejected() {
    let err = build(
        "Start = A\nA = a B\nA = a C\nB = b\nC = b",
        &GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ToolkitError::ConflictError { .. }));
}

/// Two builds of the same grammar produce action tables with the same number of states and the
/// same shift/reduce/accept shape (P6: determinism, up to state numbering, which is stable here
/// because state IDs are assigned by worklist order from a fixed starting kernel).
#[test]
fn p6_repeated_builds_are_deterministic() {
    let first = generate();
    let second = generate();
    assert_eq!(first.action_table.len(), second.action_table.len());
    for state in 0..first.action_table.len() {
        for name in ["+", "*", "(", ")", "name", "int", "$"] {
            let symbol = first.grammar.symbols().get(name).unwrap();
            assert_eq!(
                first.action_table.get(state, symbol).is_some(),
                second.action_table.get(state, symbol).is_some(),
            );
        }
    }
}
