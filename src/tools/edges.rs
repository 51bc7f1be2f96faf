//! Edge metadata backfill for process files.
//!
//! Fills in missing `relation`, `category`, and `id` fields on process-local
//! edges. Backfill is strictly non-destructive: a field that is already
//! present is never overwritten, so a manually curated relation survives even
//! when a rule table would suggest something else.

use crate::core::assets::{self, OverrideTables};
use crate::core::error::GovGraphError;
use crate::core::model::{Edge, Jurisdiction, Process};
use crate::core::repository::{BACKUP_SUFFIX_EDGES, DataStore};
use crate::core::taxonomy::{DEFAULT_RELATION, category_for, edge_id, endpoint_key};
use crate::core::term;
use rustc_hash::FxHashMap;

#[derive(clap::Args, Debug)]
pub struct EdgesCli {
    /// Restrict the backfill to one jurisdiction (default: all).
    #[clap(long)]
    pub jurisdiction: Option<String>,
    /// Report counts of edges that would be updated without writing.
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BackfillCounts {
    pub updated: usize,
    pub untouched: usize,
}

impl BackfillCounts {
    fn absorb(&mut self, other: BackfillCounts) {
        self.updated += other.updated;
        self.untouched += other.untouched;
    }
}

/// Relation inference order: exact namespaced endpoint lookup, the same
/// lookup with jurisdiction prefixes stripped, then the default constant.
pub fn resolve_relation(edge: &Edge, overrides: &FxHashMap<String, String>) -> String {
    if let Some(relation) = overrides.get(&endpoint_key(&edge.source, &edge.target)) {
        return relation.clone();
    }
    let bare_source = Jurisdiction::strip_any(&edge.source);
    let bare_target = Jurisdiction::strip_any(&edge.target);
    if let Some(relation) = overrides.get(&endpoint_key(bare_source, bare_target)) {
        return relation.clone();
    }
    DEFAULT_RELATION.to_string()
}

/// Backfills one process's edges in place. Only absent fields are filled.
pub fn backfill_process(process: &mut Process, tables: &OverrideTables) -> BackfillCounts {
    let empty = FxHashMap::default();
    let overrides = tables.get(&process.id).unwrap_or(&empty);
    let mut counts = BackfillCounts::default();

    for edge in &mut process.edges {
        let mut touched = false;
        if edge.relation.is_none() {
            edge.relation = Some(resolve_relation(edge, overrides));
            touched = true;
        }
        // `relation` is now always present; category and id derive from it.
        let relation = edge
            .relation
            .clone()
            .unwrap_or_else(|| DEFAULT_RELATION.to_string());
        if edge.category.is_none() {
            edge.category = Some(category_for(&relation).as_str().to_string());
            touched = true;
        }
        if edge.id.is_none() {
            edge.id = Some(edge_id(&edge.source, &edge.target, &relation));
            touched = true;
        }
        if touched {
            counts.updated += 1;
        } else {
            counts.untouched += 1;
        }
    }
    counts
}

pub fn run_edges_cli(store: &DataStore, cli: EdgesCli) -> Result<(), GovGraphError> {
    let jurisdictions: Vec<Jurisdiction> = match &cli.jurisdiction {
        Some(name) => vec![name.parse()?],
        None => Jurisdiction::ALL.to_vec(),
    };
    let tables = assets::process_overrides()?;

    term::heading("Edge metadata backfill");
    if cli.dry_run {
        term::step("dry-run: no files will be written");
    }

    let mut totals = BackfillCounts::default();
    for jurisdiction in jurisdictions {
        let path = store.processes_path(jurisdiction);
        let mut processes = match store.load_processes(jurisdiction) {
            Ok(processes) => processes,
            Err(GovGraphError::NotFound(path)) => {
                term::warn(&format!("skipped missing process file ({})", path));
                continue;
            }
            Err(e) => return Err(e),
        };

        let mut counts = BackfillCounts::default();
        for process in &mut processes.processes {
            counts.absorb(backfill_process(process, &tables));
        }
        term::step(&format!(
            "{}: {} edge(s) updated, {} left untouched",
            jurisdiction, counts.updated, counts.untouched
        ));

        if counts.updated > 0 && !cli.dry_run {
            store.backup(&path, BACKUP_SUFFIX_EDGES)?;
            store.save_processes(jurisdiction, &processes)?;
        }
        totals.absorb(counts);
    }

    if cli.dry_run {
        term::ok(&format!(
            "dry-run complete: {} edge(s) would be updated, {} already resolved",
            totals.updated, totals.untouched
        ));
    } else {
        term::ok(&format!(
            "backfill complete: {} edge(s) updated, {} already resolved",
            totals.updated, totals.untouched
        ));
    }
    Ok(())
}
