//! Grammar loader and rule-set model for context-free grammars (§3, §4.A, §6.1).
//!
//! Parses the `.grm` declarative text format into productions and named token classes, then
//! builds the in-memory [`Grammar`] (the rule set plus interned symbols and their terminal /
//! nonterminal classification) that the rest of the toolkit builds on.

use crate::error::{Result, ToolkitError};
use crate::symbol::{Classification, SymbolId, SymbolTable};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A production rule in a context-free grammar: `lhs -> rhs` (§3 "Production").
///
/// `rhs` may be empty, representing `lhs -> ε`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: SymbolId,
    pub rhs: Vec<SymbolId>,
}

impl Production {
    pub fn new(lhs: SymbolId, rhs: Vec<SymbolId>) -> Self {
        Self { lhs, rhs }
    }

    /// Wraps this production with a [`SymbolTable`] so it can be formatted with symbol names.
    pub fn display<'a>(&'a self, table: &'a SymbolTable) -> DisplayProduction<'a> {
        DisplayProduction {
            production: self,
            table,
        }
    }
}

/// Displays a [`Production`] as `lhs -> s1 s2 …` (or `lhs -> ε` when the rhs is empty).
pub struct DisplayProduction<'a> {
    production: &'a Production,
    table: &'a SymbolTable,
}

impl fmt::Display for DisplayProduction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.table.name(self.production.lhs))?;
        if self.production.rhs.is_empty() {
            write!(f, " ε")
        } else {
            for sym in &self.production.rhs {
                write!(f, " {}", self.table.name(*sym))?;
            }
            Ok(())
        }
    }
}

/// A named token class declaration, as produced by the grammar loader (§4.A, §4.E).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClassSpec {
    pub name: String,
    pub first: Vec<char>,
    pub remainder: Vec<char>,
}

/// Raw output of the grammar-text loader, before symbol interning (§4.A).
#[derive(Debug, Clone, Default)]
pub struct LoadedGrammar {
    pub productions: Vec<(String, Vec<String>)>,
    pub token_classes: Vec<TokenClassSpec>,
}

enum Declaration {
    Production(String, Vec<String>),
    Token(TokenClassSpec),
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<Option<Declaration>> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(idx) = line.find(":=") {
        let name = line[..idx].trim();
        if name.is_empty() {
            return Err(ToolkitError::InvalidTokenClass(format!(
                "line {line_no}: missing token class name"
            )));
        }
        let rest = line[idx + 2..].trim();
        let mut fields = rest.split_whitespace();
        let first = fields.next().ok_or_else(|| {
            ToolkitError::InvalidTokenClass(format!(
                "line {line_no}: token class '{name}' is missing its first-char set"
            ))
        })?;
        let remainder = fields.next().ok_or_else(|| {
            ToolkitError::InvalidTokenClass(format!(
                "line {line_no}: token class '{name}' is missing its remainder-char set"
            ))
        })?;
        if fields.next().is_some() {
            return Err(ToolkitError::InvalidTokenClass(format!(
                "line {line_no}: token class '{name}' has extra fields"
            )));
        }
        Ok(Some(Declaration::Token(TokenClassSpec {
            name: name.to_string(),
            first: first.chars().collect(),
            remainder: remainder.chars().collect(),
        })))
    } else if let Some(idx) = line.find('=') {
        let lhs = line[..idx].trim();
        if lhs.is_empty() {
            return Err(ToolkitError::InvalidProduction(format!(
                "line {line_no}: empty left-hand side"
            )));
        }
        let rhs: Vec<String> = line[idx + 1..]
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Ok(Some(Declaration::Production(lhs.to_string(), rhs)))
    } else {
        Err(ToolkitError::InvalidFormat(format!(
            "line {line_no}: expected 'LHS = ...' or 'NAME := ...'"
        )))
    }
}

/// Parses `.grm` grammar text into a [`LoadedGrammar`] (§4.A, §6.1).
pub fn load(text: &str) -> Result<LoadedGrammar> {
    let mut loaded = LoadedGrammar::default();
    for (i, line) in text.lines().enumerate() {
        match parse_line(line, i + 1)? {
            None => {}
            Some(Declaration::Production(lhs, rhs)) => loaded.productions.push((lhs, rhs)),
            Some(Declaration::Token(spec)) => loaded.token_classes.push(spec),
        }
    }
    if loaded.productions.is_empty() {
        return Err(ToolkitError::EmptyInput);
    }
    Ok(loaded)
}

/// A context-free grammar: interned symbols, their classification, and the rule set (§3).
#[derive(Debug, Clone)]
pub struct Grammar {
    symbols: SymbolTable,
    classification: Classification,
    productions: Vec<Production>,
    rules: HashMap<SymbolId, Vec<usize>>,
    start_symbol: SymbolId,
    token_classes: Vec<TokenClassSpec>,
}

impl Grammar {
    /// Builds a [`Grammar`] from loaded declarations, interning every symbol name and validating
    /// invariant I1 (every rhs symbol is a nonterminal, a declared token, or a single-character
    /// literal).
    pub fn build(loaded: &LoadedGrammar, root: &str) -> Result<Self> {
        if loaded.productions.is_empty() {
            return Err(ToolkitError::EmptyInput);
        }

        let nonterminal_names: HashSet<&str> = loaded
            .productions
            .iter()
            .map(|(lhs, _)| lhs.as_str())
            .collect();
        let named_token_names: HashSet<&str> =
            loaded.token_classes.iter().map(|t| t.name.as_str()).collect();

        let mut symbols = SymbolTable::new();
        let mut productions = Vec::with_capacity(loaded.productions.len());
        let mut rules: HashMap<SymbolId, Vec<usize>> = HashMap::new();

        for (lhs_name, rhs_names) in &loaded.productions {
            let lhs = symbols.intern(lhs_name);
            let mut rhs = Vec::with_capacity(rhs_names.len());
            for name in rhs_names {
                let is_nonterminal = nonterminal_names.contains(name.as_str());
                let is_named_token = named_token_names.contains(name.as_str());
                let is_end_marker = name == crate::symbol::END_MARKER;
                let is_literal = name.chars().count() == 1;
                if !is_nonterminal && !is_named_token && !is_end_marker && !is_literal {
                    return Err(ToolkitError::UndefinedSymbol(name.clone()));
                }
                rhs.push(symbols.intern(name));
            }
            let index = productions.len();
            productions.push(Production::new(lhs, rhs));
            rules.entry(lhs).or_default().push(index);
        }

        for token in &loaded.token_classes {
            symbols.intern(&token.name);
        }

        let nonterminal_ids: Vec<SymbolId> = nonterminal_names
            .iter()
            .filter_map(|name| symbols.get(name))
            .collect();
        let classification = Classification::new(&symbols, nonterminal_ids);

        let start_symbol = symbols.get(root).ok_or_else(|| {
            ToolkitError::UndefinedSymbol(format!("root nonterminal '{root}' has no productions"))
        })?;
        if !rules.contains_key(&start_symbol) {
            return Err(ToolkitError::UndefinedSymbol(format!(
                "root nonterminal '{root}' has no productions"
            )));
        }

        Ok(Self {
            symbols,
            classification,
            productions,
            rules,
            start_symbol,
            token_classes: loaded.token_classes.clone(),
        })
    }

    /// Parses `.grm` text directly into a [`Grammar`] rooted at `root`.
    pub fn parse(text: &str, root: &str) -> Result<Self> {
        let loaded = load(text)?;
        Self::build(&loaded, root)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn all_productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production {
        &self.productions[index]
    }

    /// Returns the indices (into [`Grammar::all_productions`]) of `nt`'s productions, in
    /// declaration order, or an empty slice if `nt` has none.
    pub fn production_indices_of(&self, nt: SymbolId) -> &[usize] {
        self.rules.get(&nt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start_symbol(&self) -> SymbolId {
        self.start_symbol
    }

    pub fn token_classes(&self) -> &[TokenClassSpec] {
        &self.token_classes
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for prod in &self.productions {
            writeln!(f, "{}", prod.display(&self.symbols))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPR_GRAMMAR: &str = "
        Start  = Add
        Add    = Add + Factor
        Add    = Factor
        Factor = Factor * Term
        Factor = Term
        Term   = ( Add )
        Term   = name
        Term   = int
        name  := abc abc
        int   := 012 012
    ";

    #[test]
    fn loads_productions_and_token_classes() {
        let loaded = load(EXPR_GRAMMAR).unwrap();
        assert_eq!(loaded.productions.len(), 8);
        assert_eq!(loaded.token_classes.len(), 2);
        assert_eq!(loaded.token_classes[0].name, "name");
        assert_eq!(loaded.token_classes[0].first, vec!['a', 'b', 'c']);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let loaded = load("// a comment\n\nStart = a\n").unwrap();
        assert_eq!(loaded.productions.len(), 1);
    }

    #[test]
    fn builds_grammar_with_epsilon_production() {
        let loaded = load("Start = A\nA = a A\nA =").unwrap();
        let grammar = Grammar::build(&loaded, "Start").unwrap();
        assert_eq!(grammar.all_productions().len(), 3);
        let a = grammar.symbols().get("A").unwrap();
        let epsilon_index = grammar.production_indices_of(a)[1];
        assert!(grammar.production(epsilon_index).rhs.is_empty());
    }

    #[test]
    fn rejects_undefined_multichar_symbol() {
        let loaded = load("Start = foo").unwrap();
        let err = Grammar::build(&loaded, "Start").unwrap_err();
        assert!(matches!(err, ToolkitError::UndefinedSymbol(_)));
    }

    #[test]
    fn rejects_missing_root() {
        let loaded = load("Start = a").unwrap();
        let err = Grammar::build(&loaded, "Other").unwrap_err();
        assert!(matches!(err, ToolkitError::UndefinedSymbol(_)));
    }
}
