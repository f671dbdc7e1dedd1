//! Character-driven tokenizer (§4.E).
//!
//! Consumes input one character at a time against the grammar's declared token classes — named
//! classes from `NAME := first remainder` declarations, plus an implicit single-character literal
//! class for every terminal symbol that appears bare in a production's rhs. Whitespace is never a
//! declared class; it is the tokenizer's one built-in "null" transition (§4.E), flushing whatever
//! token was in progress and otherwise producing nothing.

use crate::error::{Result, ToolkitError};
use crate::grammar::Grammar;
use std::collections::HashSet;
use std::fmt;

/// A 1-based line/column position in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// A runtime char-set token class, resolved from either a named declaration or an implicit
/// single-character literal (§4.A, §4.E).
#[derive(Debug, Clone)]
pub struct TokenClass {
    pub name: String,
    pub first: HashSet<char>,
    pub remainder: HashSet<char>,
}

/// A lexeme produced by the tokenizer: its class name, matched text, and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: String,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

/// Builds the runtime token-class list for `grammar`: its declared classes, verbatim, plus one
/// implicit class per bare single-character terminal.
///
/// Grammar loading already rejected any rhs symbol that is neither a nonterminal, a named token,
/// the end marker, nor a single character (§3 invariant I1), so every terminal here resolves to
/// exactly one class. Declared `charset_first` overlaps are still checked here and rejected as
/// [`ToolkitError::TokenizerAmbiguity`], since §4.E requires no two classes share a first-char.
pub fn build_token_classes(grammar: &Grammar) -> Result<Vec<TokenClass>> {
    let mut classes: Vec<TokenClass> = grammar
        .token_classes()
        .iter()
        .map(|spec| TokenClass {
            name: spec.name.clone(),
            first: spec.first.iter().copied().collect(),
            remainder: spec.remainder.iter().copied().collect(),
        })
        .collect();

    let named: HashSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
    let end_marker = grammar.symbols().end_marker();

    for id in grammar.symbols().ids() {
        if id == end_marker || !grammar.classification().is_terminal(id) {
            continue;
        }
        let name = grammar.symbols().name(id);
        if named.contains(name) {
            continue;
        }
        let ch = name.chars().next().expect("terminal names are non-empty");
        classes.push(TokenClass {
            name: name.to_string(),
            first: HashSet::from([ch]),
            remainder: HashSet::from([ch]),
        });
    }

    for (i, a) in classes.iter().enumerate() {
        for b in &classes[i + 1..] {
            if let Some(&ch) = a.first.intersection(&b.first).next() {
                return Err(ToolkitError::TokenizerAmbiguity {
                    ch,
                    classes: vec![a.name.clone(), b.name.clone()],
                });
            }
        }
    }

    Ok(classes)
}

fn find_class(classes: &[TokenClass], ch: char, pos: Position) -> Result<usize> {
    let mut matches = classes
        .iter()
        .enumerate()
        .filter(|(_, c)| c.first.contains(&ch));
    let (first_idx, first) = matches.next().ok_or(ToolkitError::TokenizerNoMatch {
        ch,
        line: pos.line,
        column: pos.column,
    })?;
    if let Some((_, second)) = matches.next() {
        return Err(ToolkitError::TokenizerAmbiguity {
            ch,
            classes: vec![first.name.clone(), second.name.clone()],
        });
    }
    Ok(first_idx)
}

/// Tokenizes `input` against `classes`, one character at a time (§4.E), terminated by a
/// synthetic `$` token. No lookahead beyond the single character that triggers a class
/// transition is used.
pub fn tokenize(classes: &[TokenClass], input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut pos = Position::start();
    let mut current: Option<(usize, String, Position)> = None;

    for ch in input.chars() {
        let here = pos;
        match &mut current {
            Some((idx, buffer, start)) if classes[*idx].remainder.contains(&ch) => {
                buffer.push(ch);
                pos.advance(ch);
                let _ = start;
            }
            Some((idx, buffer, start)) => {
                tokens.push(Token {
                    class: classes[*idx].name.clone(),
                    text: std::mem::take(buffer),
                    start: *start,
                    end: here,
                });
                current = None;
                if !ch.is_whitespace() {
                    let class_idx = find_class(classes, ch, here)?;
                    current = Some((class_idx, ch.to_string(), here));
                }
                pos.advance(ch);
            }
            None => {
                if !ch.is_whitespace() {
                    let class_idx = find_class(classes, ch, here)?;
                    current = Some((class_idx, ch.to_string(), here));
                }
                pos.advance(ch);
            }
        }
    }

    if let Some((idx, buffer, start)) = current {
        tokens.push(Token {
            class: classes[idx].name.clone(),
            text: buffer,
            start,
            end: pos,
        });
    }

    tokens.push(Token {
        class: crate::symbol::END_MARKER.to_string(),
        text: String::new(),
        start: pos,
        end: pos,
    });

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

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

    #[test]
    fn builds_implicit_classes_for_bare_literals() {
        let grammar = Grammar::parse(EXPR_GRAMMAR, "Start").unwrap();
        let classes = build_token_classes(&grammar).unwrap();
        let names: HashSet<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains("+"));
        assert!(names.contains("*"));
        assert!(names.contains("("));
        assert!(names.contains(")"));
        assert!(names.contains("name"));
        assert!(names.contains("int"));
    }

    #[test]
    fn tokenizes_simple_expression_with_whitespace() {
        let grammar = Grammar::parse(EXPR_GRAMMAR, "Start").unwrap();
        let classes = build_token_classes(&grammar).unwrap();
        let tokens = tokenize(&classes, "x+ y\n").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["x", "+", "y", ""]);
        assert_eq!(tokens.last().unwrap().class, "$");
    }

    #[test]
    fn tokenizes_multichar_number_and_name_classes() {
        let grammar = Grammar::parse(EXPR_GRAMMAR, "Start").unwrap();
        let classes = build_token_classes(&grammar).unwrap();
        let tokens = tokenize(&classes, "n * (4+5)*3 + somename").unwrap();
        let classified: Vec<(&str, &str)> =
            tokens.iter().map(|t| (t.class.as_str(), t.text.as_str())).collect();
        assert!(classified.contains(&("name", "n")));
        assert!(classified.contains(&("int", "4")));
        assert!(classified.contains(&("name", "somename")));
    }

    #[test]
    fn reports_position_of_unmatched_character() {
        let grammar = Grammar::parse("Start = a", "Start").unwrap();
        let classes = build_token_classes(&grammar).unwrap();
        let err = tokenize(&classes, "a\n#").unwrap_err();
        match err {
            ToolkitError::TokenizerNoMatch { ch, line, column } => {
                assert_eq!(ch, '#');
                assert_eq!(line, 2);
                assert_eq!(column, 1);
            }
            other => panic!("expected TokenizerNoMatch, got {other:?}"),
        }
    }

    #[test]
    fn declared_classes_with_overlapping_first_sets_are_rejected() {
        let grammar = Grammar::parse("Start = a\na := ab ab\nb := bc bc", "Start").unwrap();
        let err = build_token_classes(&grammar).unwrap_err();
        assert!(matches!(err, ToolkitError::TokenizerAmbiguity { .. }));
    }
}
