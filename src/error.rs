//! Error types for the LR(1) parser toolkit.

use thiserror::Error;

/// The kind of conflict a state/symbol overlap represents (§4.C invariant I5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
    AcceptShift,
    AcceptReduce,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
            ConflictKind::AcceptShift => "accept/shift",
            ConflictKind::AcceptReduce => "accept/reduce",
        };
        write!(f, "{s}")
    }
}

/// Errors that can occur while loading a grammar, building its LR(1) tables, tokenizing input,
/// or driving a parse.
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Invalid grammar format: {0}")]
    InvalidFormat(String),

    #[error("Invalid production: {0}")]
    InvalidProduction(String),

    #[error("Invalid token class declaration: {0}")]
    InvalidTokenClass(String),

    #[error("Empty grammar input")]
    EmptyInput,

    #[error("Undefined symbol: {0}")]
    UndefinedSymbol(String),

    #[error("{kind} conflict at state {state}, symbol '{symbol}'")]
    ConflictError {
        state: usize,
        symbol: String,
        kind: ConflictKind,
    },

    #[error("Tokenizer ambiguity on character '{ch}': matches classes {classes:?}")]
    TokenizerAmbiguity { ch: char, classes: Vec<String> },

    #[error("No token class matches character '{ch}' at line {line}, column {column}")]
    TokenizerNoMatch { ch: char, line: usize, column: usize },

    #[error("Syntax error: unexpected '{symbol}' in state {state} at line {line}, column {column}")]
    SyntaxError {
        state: usize,
        symbol: String,
        line: usize,
        column: usize,
    },

    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, ToolkitError>;
