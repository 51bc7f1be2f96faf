//! Jurisdiction namespace migration.
//!
//! Computes an old-id→new-id map by prepending `{jurisdiction}:` to every
//! node id in the jurisdiction's main and intra tiers, then propagates the
//! rewrite to every file that references those ids: the tier documents
//! themselves (nodes, edges, subviews), the process file, and the subgraph
//! files. Re-running the migration is a no-op: an id that already carries the
//! correct prefix maps to itself.
//!
//! Process files may reference nodes owned by another jurisdiction (state
//! processes walking city entities). Before rewriting dependents, the other
//! jurisdictions' mappings are merged in, keyed by each node's `legacyId` (or
//! its id with the prefix stripped) - which is why the canonical node files
//! must be migrated before their dependents.

use crate::core::error::GovGraphError;
use crate::core::model::{
    Edge, Jurisdiction, JurisdictionDocument, ProcessFile, Subgraph, Tier,
};
use crate::core::repository::{BACKUP_SUFFIX_NAMESPACE, DataStore};
use crate::core::taxonomy::edge_id;
use crate::core::term;
use rustc_hash::FxHashMap;

#[derive(clap::Args, Debug)]
pub struct NamespaceCli {
    /// Jurisdiction whose corpus should be migrated (city, state, federal).
    pub jurisdiction: String,
    /// Report the rewrites without touching any file.
    #[clap(long)]
    pub dry_run: bool,
}

pub type IdMap = FxHashMap<String, String>;

/// Old-id→new-id entries for one tier document.
///
/// An id that already carries the jurisdiction prefix maps to itself, which
/// is what makes double invocation safe.
pub fn build_id_map(document: &JurisdictionDocument, jurisdiction: Jurisdiction) -> IdMap {
    let mut map = IdMap::default();
    for node in &document.nodes {
        let new_id = if jurisdiction.owns(&node.id) {
            node.id.clone()
        } else {
            jurisdiction.namespaced(&node.id)
        };
        map.insert(node.id.clone(), new_id);
    }
    map
}

/// Merges an already-migrated document's mapping into `map`, keyed by each
/// node's `legacyId` (or its id with the prefix stripped). Existing entries
/// win, so the owning jurisdiction's own map keeps priority.
pub fn merge_foreign_map(map: &mut IdMap, document: &JurisdictionDocument, owner: Jurisdiction) {
    for node in &document.nodes {
        let Some(local) = owner.strip(&node.id) else {
            continue;
        };
        let legacy_key = node
            .legacy_id
            .clone()
            .unwrap_or_else(|| local.to_string());
        map.entry(legacy_key).or_insert_with(|| node.id.clone());
        map.entry(node.id.clone()).or_insert_with(|| node.id.clone());
    }
}

fn rewrite_ref(reference: &mut String, map: &IdMap) -> usize {
    match map.get(reference.as_str()) {
        Some(new_id) if new_id != reference => {
            *reference = new_id.clone();
            1
        }
        _ => 0,
    }
}

fn rewrite_edge(edge: &mut Edge, map: &IdMap) -> usize {
    let mut changed = rewrite_ref(&mut edge.source, map);
    changed += rewrite_ref(&mut edge.target, map);
    if changed > 0
        && edge.id.is_some()
        && let Some(relation) = &edge.relation
    {
        // Edge ids embed their endpoints; keep them in sync with the rewrite.
        edge.id = Some(edge_id(&edge.source, &edge.target, relation));
    }
    changed
}

/// Rewrites node ids (retaining the original as `legacyId`), parent
/// containment references, edge endpoints, and subview references.
pub fn rewrite_document(document: &mut JurisdictionDocument, map: &IdMap) -> usize {
    let mut changed = 0;
    for node in &mut document.nodes {
        if let Some(new_id) = map.get(&node.id)
            && *new_id != node.id
        {
            if node.legacy_id.is_none() {
                node.legacy_id = Some(node.id.clone());
            }
            node.id = new_id.clone();
            changed += 1;
        }
        if let Some(parent) = &mut node.parent {
            changed += rewrite_ref(parent, map);
        }
    }
    for edge in &mut document.edges {
        changed += rewrite_edge(edge, map);
    }
    for subview in &mut document.subviews {
        if let Some(anchor) = &mut subview.node_id {
            changed += rewrite_ref(anchor, map);
        }
        if let Some(anchors) = &mut subview.node_ids {
            for anchor in anchors {
                changed += rewrite_ref(anchor, map);
            }
        }
        for reference in &mut subview.nodes {
            changed += rewrite_ref(reference, map);
        }
        for edge in &mut subview.edges {
            changed += rewrite_edge(edge, map);
        }
    }
    changed
}

pub fn rewrite_processes(processes: &mut ProcessFile, map: &IdMap) -> usize {
    let mut changed = 0;
    for process in &mut processes.processes {
        for reference in &mut process.nodes {
            changed += rewrite_ref(reference, map);
        }
        for edge in &mut process.edges {
            changed += rewrite_edge(edge, map);
        }
    }
    changed
}

pub fn rewrite_subgraph(subgraph: &mut Subgraph, map: &IdMap) -> usize {
    let mut changed = 0;
    for node in &mut subgraph.elements.nodes {
        changed += rewrite_ref(&mut node.data.id, map);
    }
    for edge in &mut subgraph.elements.edges {
        changed += rewrite_ref(&mut edge.data.source, map);
        changed += rewrite_ref(&mut edge.data.target, map);
    }
    if let Some(entry) = &mut subgraph.entry_node_id {
        changed += rewrite_ref(entry, map);
    }
    changed
}

pub fn run_namespace_cli(store: &DataStore, cli: NamespaceCli) -> Result<(), GovGraphError> {
    let jurisdiction: Jurisdiction = cli.jurisdiction.parse()?;
    term::heading(&format!("Namespace migration: {}", jurisdiction));
    if cli.dry_run {
        term::step("dry-run: no files will be written");
    }

    // The canonical tiers are both loaded before anything is written, so the
    // map covers the union of main and intra ids.
    let mut map = IdMap::default();
    let mut tiers: Vec<(Tier, JurisdictionDocument)> = Vec::new();
    for tier in [Tier::Main, Tier::Intra] {
        match store.load_document(jurisdiction, tier) {
            Ok(document) => {
                map.extend(build_id_map(&document, jurisdiction));
                tiers.push((tier, document));
            }
            Err(GovGraphError::NotFound(path)) => {
                term::warn(&format!("skipped missing {} tier ({})", tier, path));
            }
            Err(e) => return Err(e),
        }
    }

    let mut total_changes = 0;
    let mut files_written = 0;

    for (tier, mut document) in tiers {
        let changed = rewrite_document(&mut document, &map);
        total_changes += changed;
        let path = store.document_path(jurisdiction, tier);
        if changed > 0 && !cli.dry_run {
            store.backup(&path, BACKUP_SUFFIX_NAMESPACE)?;
            store.save_document(jurisdiction, tier, &document)?;
            files_written += 1;
        }
        term::step(&format!(
            "{} tier: {} id reference(s) rewritten",
            tier, changed
        ));
    }

    // Dependents may reference other jurisdictions' nodes; fold in every
    // migrated document's legacy mapping before rewriting them.
    let mut dependent_map = map.clone();
    for owner in Jurisdiction::ALL {
        for tier in [Tier::Main, Tier::Intra] {
            match store.load_document(owner, tier) {
                Ok(document) => merge_foreign_map(&mut dependent_map, &document, owner),
                Err(GovGraphError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
    }

    let processes_path = store.processes_path(jurisdiction);
    match store.load_processes(jurisdiction) {
        Ok(mut processes) => {
            let changed = rewrite_processes(&mut processes, &dependent_map);
            total_changes += changed;
            if changed > 0 && !cli.dry_run {
                store.backup(&processes_path, BACKUP_SUFFIX_NAMESPACE)?;
                store.save_processes(jurisdiction, &processes)?;
                files_written += 1;
            }
            term::step(&format!("processes: {} id reference(s) rewritten", changed));
        }
        Err(GovGraphError::NotFound(path)) => {
            term::warn(&format!("skipped missing process file ({})", path));
        }
        Err(e) => return Err(e),
    }

    for path in store.subgraph_paths(jurisdiction)? {
        let mut subgraph = store.load_subgraph(&path)?;
        let changed = rewrite_subgraph(&mut subgraph, &dependent_map);
        total_changes += changed;
        if changed > 0 && !cli.dry_run {
            store.backup(&path, BACKUP_SUFFIX_NAMESPACE)?;
            store.save_subgraph(&path, &subgraph)?;
            files_written += 1;
        }
        term::step(&format!(
            "subgraph {}: {} id reference(s) rewritten",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
            changed
        ));
    }

    if cli.dry_run {
        term::ok(&format!(
            "dry-run complete: {} reference(s) would be rewritten",
            total_changes
        ));
    } else {
        term::ok(&format!(
            "migration complete: {} reference(s) rewritten across {} file(s)",
            total_changes, files_written
        ));
    }
    Ok(())
}
