//! Main-tier recomposition.
//!
//! Rebuilds the aggregate cross-jurisdiction document from the three
//! per-jurisdiction backups plus the regional overlay. Backup documents
//! predate namespacing, so every node and edge is prefixed with its
//! jurisdiction before assembly. Regional-overlay nodes merge into the
//! `state` namespace unless the id is already present natively; an overlay
//! edge is included only when both namespaced endpoints made it into the
//! assembled node set, which keeps partial overlay inclusion from introducing
//! dangling edges.

use crate::core::error::GovGraphError;
use crate::core::model::{Jurisdiction, JurisdictionDocument, Meta, Tier};
use crate::core::repository::{BACKUP_SUFFIX_MERGE, DataStore, backup_path_for};
use crate::core::term;
use crate::tools::namespace::{build_id_map, rewrite_document};
use rustc_hash::FxHashSet;

#[derive(clap::Args, Debug)]
pub struct ComposeCli {
    /// Report per-jurisdiction counts without writing the aggregate.
    #[clap(long)]
    pub dry_run: bool,
}

pub fn run_compose_cli(store: &DataStore, cli: ComposeCli) -> Result<(), GovGraphError> {
    term::heading("Main-tier composition");
    if cli.dry_run {
        term::step("dry-run: the aggregate will not be written");
    }

    let mut aggregate = JurisdictionDocument {
        meta: Meta {
            title: "NYC Government Structure".to_string(),
            description: "Aggregate cross-jurisdiction main tier composed from the city, state, \
                          and federal sources plus the regional overlay."
                .to_string(),
            tier: Some(Tier::Main.as_str().to_string()),
            extra: Default::default(),
        },
        ..Default::default()
    };
    let mut assembled_ids: FxHashSet<String> = FxHashSet::default();

    for jurisdiction in Jurisdiction::ALL {
        let path = backup_path_for(
            &store.document_path(jurisdiction, Tier::Main),
            BACKUP_SUFFIX_MERGE,
        );
        let mut document: JurisdictionDocument = match store.read_json(&path) {
            Ok(document) => document,
            Err(GovGraphError::NotFound(path)) => {
                term::warn(&format!(
                    "{}: skipped missing backup document ({})",
                    jurisdiction, path
                ));
                continue;
            }
            Err(e) => return Err(e),
        };

        let map = build_id_map(&document, jurisdiction);
        rewrite_document(&mut document, &map);

        term::step(&format!(
            "{}: {} node(s), {} edge(s)",
            jurisdiction,
            document.nodes.len(),
            document.edges.len()
        ));
        assembled_ids.extend(document.nodes.iter().map(|node| node.id.clone()));
        aggregate.nodes.append(&mut document.nodes);
        aggregate.edges.append(&mut document.edges);
    }

    match store.read_json::<JurisdictionDocument>(&store.regional_path()) {
        Ok(mut regional) => {
            let map = build_id_map(&regional, Jurisdiction::State);
            rewrite_document(&mut regional, &map);

            let mut added_nodes = 0usize;
            for node in regional.nodes {
                if assembled_ids.contains(&node.id) {
                    term::detail(&format!("overlay node already native to state: {}", node.id));
                    continue;
                }
                assembled_ids.insert(node.id.clone());
                aggregate.nodes.push(node);
                added_nodes += 1;
            }

            let mut added_edges = 0usize;
            let mut dropped_edges = 0usize;
            for edge in regional.edges {
                if assembled_ids.contains(&edge.source) && assembled_ids.contains(&edge.target) {
                    aggregate.edges.push(edge);
                    added_edges += 1;
                } else {
                    dropped_edges += 1;
                }
            }
            term::step(&format!(
                "regional overlay: {} node(s) merged into state, {} edge(s) included, {} dropped as dangling",
                added_nodes, added_edges, dropped_edges
            ));
        }
        Err(GovGraphError::NotFound(path)) => {
            term::warn(&format!("skipped missing regional overlay ({})", path));
        }
        Err(e) => return Err(e),
    }

    if !cli.dry_run {
        let path = store.aggregate_path();
        if path.exists() {
            store.backup(&path, BACKUP_SUFFIX_MERGE)?;
        }
        store.write_json(&path, &aggregate)?;
    }

    term::ok(&format!(
        "aggregate main tier: {} node(s), {} edge(s)",
        aggregate.nodes.len(),
        aggregate.edges.len()
    ));
    Ok(())
}
