//! Canonical LR(1) parser generator and driver — CLI binary.
//!
//! # Author
//! Juan Manuel Young Hoyos
//!
//! # References
//! Aho, Alfred V. et al. "Compilers: Principles, Techniques, and Tools" (2nd Edition).
//! Addison-Wesley, 2006.

use clap::Parser;
use lr1_toolkit::cli::{self, Cli};
use std::process;

fn main() {
    let cli = Cli::parse();
    process::exit(cli::run(cli));
}
