//! Govgraph: batch integrity toolchain for the civic knowledge graph.
//!
//! The government-structure graph is published as a set of independently
//! editable JSON documents: a main and an intra tier per jurisdiction, plus
//! process, subgraph, and subview files that reference their node ids. There
//! is no shared runtime and no transaction manager - consistency is kept by
//! the sequential batch tools in this crate, each of which copies its target
//! to a `.backup*` sibling before overwriting it.
//!
//! # Tools
//!
//! - `merge`: validate and deduplicate a generated node batch into the
//!   canonical jurisdiction file
//! - `namespace`: establish the `{jurisdiction}:{id}` invariant across a
//!   jurisdiction's corpus (idempotent on re-run)
//! - `edges`: backfill missing relation/category/id on process edges
//! - `validate` / `refs`: standing referential-integrity checks; exit 1 iff
//!   at least one error was found
//! - `compose`: rebuild the aggregate cross-jurisdiction main document
//!
//! # Operation ordering
//!
//! The canonical node file for a jurisdiction must be merged and namespaced
//! before its dependent files are rewritten; dependent rewrites are driven by
//! the id map produced from the canonical file. Validators are safe to run at
//! any point and are designed to be re-run to convergence.

pub mod core;
pub mod tools;

use crate::core::config;
use crate::core::error::GovGraphError;
use crate::core::repository::DataStore;
use crate::tools::{compose, edges, merge, namespace, validate};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "govgraph",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch integrity toolchain for the NYC government-structure knowledge graph"
)]
struct Cli {
    /// Directory holding the JSON corpus (overrides govgraph.toml).
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge a generated node batch into a jurisdiction's canonical file
    #[clap(name = "merge", visible_alias = "m")]
    Merge(merge::MergeCli),

    /// Apply the jurisdiction namespace prefix across a jurisdiction's corpus
    #[clap(name = "namespace", visible_alias = "ns")]
    Namespace(namespace::NamespaceCli),

    /// Backfill missing relation, category, and id on process edges
    #[clap(name = "edges", visible_alias = "e")]
    Edges(edges::EdgesCli),

    /// Validate id uniqueness, namespacing, and reference closure
    #[clap(name = "validate", visible_alias = "v")]
    Validate(validate::ValidateCli),

    /// Check process and subgraph references, with fuzzy-match suggestions
    #[clap(name = "refs", visible_alias = "r")]
    Refs(validate::RefsCli),

    /// Rebuild the aggregate cross-jurisdiction main document
    #[clap(name = "compose", visible_alias = "c")]
    Compose(compose::ComposeCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}

pub fn run() -> Result<(), GovGraphError> {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        println!("v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let current_dir = std::env::current_dir()?;
    let config = config::load_config(&current_dir)?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data_dir.clone());
    let store = DataStore::new(current_dir.join(data_dir));

    match cli.command {
        Command::Merge(merge_cli) => merge::run_merge_cli(&store, merge_cli),
        Command::Namespace(namespace_cli) => namespace::run_namespace_cli(&store, namespace_cli),
        Command::Edges(edges_cli) => edges::run_edges_cli(&store, edges_cli),
        Command::Validate(validate_cli) => validate::run_validate_cli(&store, &config, validate_cli),
        Command::Refs(refs_cli) => validate::run_refs_cli(&store, &config, refs_cli),
        Command::Compose(compose_cli) => compose::run_compose_cli(&store, compose_cli),
        Command::Version => unreachable!(),
    }
}
