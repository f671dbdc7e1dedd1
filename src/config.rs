//! Generator configuration (§4.I).
//!
//! A plain struct constructed directly by library callers, or by the CLI from its parsed `clap`
//! arguments. There is no config-file format of its own — the grammar file named in §6.1 is the
//! only on-disk input the system reads.

use crate::symbol::END_MARKER;
use std::collections::BTreeSet;

/// Root nonterminal and initial lookahead set for a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub root: String,
    pub end_lookahead: BTreeSet<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root: "Start".to_string(),
            end_lookahead: BTreeSet::from([END_MARKER.to_string()]),
        }
    }
}
