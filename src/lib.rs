//! Canonical LR(1) parser generator and driver.
//!
//! A self-contained toolkit: load a declarative context-free grammar, compute nullable/FIRST sets,
//! build the canonical LR(1) automaton, flatten it into a dense action table, and drive a
//! char-tokenized input string through it to produce a parse forest.
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod grammar;
pub mod item;
pub mod lr1;
pub mod sets;
pub mod symbol;
pub mod table;
pub mod tokenizer;

pub use config::GeneratorConfig;
pub use driver::{parse, ForestNode};
pub use error::{ConflictKind, Result, ToolkitError};
pub use grammar::{Grammar, Production};
pub use table::{Action, ActionTable};
pub use tokenizer::{Position, Token, TokenClass};

/// Everything the generator produces from a grammar source (§6.2): the grammar itself (needed by
/// the driver to resolve symbol names), its compiled action table, and its runtime token classes.
pub struct GeneratedTables {
    pub grammar: Grammar,
    pub action_table: ActionTable,
    pub token_classes: Vec<TokenClass>,
}

/// Runs the full build pipeline — load, nullable/FIRST, canonical LR(1) automaton, action table,
/// token classes — per §6.2's `build(grammar_text, root, end_lookahead)` entry point.
pub fn build(grammar_text: &str, config: &GeneratorConfig) -> Result<GeneratedTables> {
    let grammar = Grammar::parse(grammar_text, &config.root)?;

    let nullable = sets::compute_nullable(&grammar);
    let first = sets::compute_first_sets(&grammar, &nullable);

    let mut end_lookahead = std::collections::BTreeSet::new();
    for name in &config.end_lookahead {
        let id = grammar
            .symbols()
            .get(name)
            .ok_or_else(|| ToolkitError::UndefinedSymbol(name.clone()))?;
        end_lookahead.insert(id);
    }

    let root = grammar.start_symbol();
    let store = lr1::build(&grammar, &nullable, &first, root, &end_lookahead)?;
    let action_table = table::compile(&grammar, &store)?;
    let token_classes = tokenizer::build_token_classes(&grammar)?;

    Ok(GeneratedTables {
        grammar,
        action_table,
        token_classes,
    })
}
