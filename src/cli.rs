//! CLI front end for the parser-generator toolkit (§4.G).
//!
//! Two subcommands: `build` runs the loader → nullable/FIRST → LR(1) → table-compiler pipeline and
//! reports success or a structured build error; `parse` additionally tokenizes an input and drives
//! it through the LR driver, printing the resulting parse forest. The CLI is the sole owner of
//! process exit codes (§6.5) — the library itself never calls `process::exit`.

use crate::config::GeneratorConfig;
use crate::driver::ForestNode;
use crate::error::ToolkitError;
use crate::tokenizer;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "lr1_toolkit", about = "Canonical LR(1) parser generator and driver")]
pub struct Cli {
    /// Grammar file to load (§6.1).
    #[arg(short, long, global = true)]
    pub grammar: PathBuf,

    /// Root nonterminal.
    #[arg(short, long, global = true, default_value = "Start")]
    pub root: String,

    /// End-of-input lookahead terminals for the augmentation root.
    #[arg(long, global = true, default_value = "$")]
    pub end_lookahead: Vec<String>,

    /// Raise logging verbosity; repeat for more detail (-v, -vv, -vvv).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the action table and report success, state/production counts, or a build error.
    Build,
    /// Build the action table, then tokenize and parse an input string or file.
    Parse {
        /// Literal input text. Mutually exclusive with `--input-file`.
        #[arg(long, conflicts_with = "input_file")]
        input: Option<String>,
        /// Path to a file containing the input text.
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
}

/// Installs the `tracing-subscriber` fmt layer from `-v` count and `RUST_LOG` (§4.H).
///
/// `RUST_LOG`, when set, takes precedence over the verbosity count, matching the filter
/// composition `tracing-subscriber` users rely on.
pub fn init_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Runs the CLI; returns the process exit code (§6.5).
pub fn run(cli: Cli) -> i32 {
    init_logging(cli.verbose);

    let grammar_text = match fs::read_to_string(&cli.grammar) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: could not read {}: {err}", cli.grammar.display());
            return 1;
        }
    };

    let config = GeneratorConfig {
        root: cli.root.clone(),
        end_lookahead: BTreeSet::from_iter(cli.end_lookahead.iter().cloned()),
    };

    let generated = match crate::build(&grammar_text, &config) {
        Ok(generated) => generated,
        Err(err) => {
            warn!(error = %err, "build failed");
            eprintln!("error: {err}");
            return build_error_exit_code(&err);
        }
    };
    info!(
        states = generated.action_table.len(),
        productions = generated.grammar.all_productions().len(),
        "built action table"
    );

    match cli.command {
        Command::Build => {
            println!(
                "ok: {} states, {} productions",
                generated.action_table.len(),
                generated.grammar.all_productions().len()
            );
            0
        }
        Command::Parse { input, input_file } => {
            let text = match resolve_input(input, input_file) {
                Ok(text) => text,
                Err(err) => {
                    eprintln!("error: {err}");
                    return 1;
                }
            };
            match tokenizer::tokenize(&generated.token_classes, &text) {
                Ok(tokens) => match crate::parse(&generated.grammar, &generated.action_table, &tokens) {
                    Ok(forest) => {
                        println!("{}", format_forest(&forest));
                        0
                    }
                    Err(err) => {
                        eprintln!("error: {err}");
                        2
                    }
                },
                Err(err) => {
                    eprintln!("error: {err}");
                    3
                }
            }
        }
    }
}

fn resolve_input(input: Option<String>, input_file: Option<PathBuf>) -> std::io::Result<String> {
    match (input, input_file) {
        (Some(text), None) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path),
        (None, None) => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        (Some(_), Some(_)) => unreachable!("clap rejects --input with --input-file"),
    }
}

fn build_error_exit_code(err: &ToolkitError) -> i32 {
    match err {
        ToolkitError::ConflictError { .. } | ToolkitError::UndefinedSymbol(_) => 1,
        ToolkitError::TokenizerAmbiguity { .. } | ToolkitError::TokenizerNoMatch { .. } => 3,
        _ => 1,
    }
}

/// Renders a parse forest the way §6.4 describes it: `[":"+lhs, child, …]` for interior nodes,
/// a bare quoted string for leaves.
pub fn format_forest(node: &ForestNode) -> String {
    let mut out = String::new();
    write_forest(node, &mut out);
    out
}

fn write_forest(node: &ForestNode, out: &mut String) {
    match node {
        ForestNode::Leaf(text) => {
            let _ = write!(out, "{text:?}");
        }
        ForestNode::Node(label, children) => {
            let _ = write!(out, "[{label:?}");
            for child in children {
                out.push_str(", ");
                write_forest(child, out);
            }
            out.push(']');
        }
    }
}
