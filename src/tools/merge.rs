//! Node merge engine for externally produced batches.
//!
//! Generation batches land as a JSON file of candidate nodes. The batch is
//! validated as a whole before anything is written: any missing required
//! field rejects the entire batch (no partial merges), while a short factoid
//! is only flagged. Duplicates against the canonical corpus or within the
//! batch itself are skipped and reported, not treated as errors.

use crate::core::error::GovGraphError;
use crate::core::model::{Jurisdiction, Node, Tier};
use crate::core::repository::{BACKUP_SUFFIX_MERGE, DataStore};
use crate::core::term;
use rustc_hash::FxHashSet;
use serde_json::Value;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
pub struct MergeCli {
    /// Jurisdiction whose canonical file receives the batch (city, state, federal).
    pub jurisdiction: String,
    /// JSON file of candidate nodes: an array, or an object with a `nodes` array.
    pub generated_file: PathBuf,
    /// Report the exact additions and resulting total without writing.
    #[clap(long)]
    pub dry_run: bool,
}

pub const REQUIRED_FIELDS: [&str; 5] = ["id", "label", "type", "branch", "factoid"];
pub const FACTOID_MIN_CHARS: usize = 20;

/// Validated batch: parsed nodes plus non-blocking warnings.
pub struct CandidateBatch {
    pub nodes: Vec<Node>,
    pub warnings: Vec<String>,
}

fn candidate_values(raw: Value) -> Result<Vec<Value>, GovGraphError> {
    match raw {
        Value::Array(values) => Ok(values),
        Value::Object(mut object) => match object.remove("nodes") {
            Some(Value::Array(values)) => Ok(values),
            _ => Err(GovGraphError::ValidationError(
                "Generated file must be a JSON array of nodes or an object with a 'nodes' array"
                    .to_string(),
            )),
        },
        _ => Err(GovGraphError::ValidationError(
            "Generated file must be a JSON array of nodes or an object with a 'nodes' array"
                .to_string(),
        )),
    }
}

/// All-or-nothing field validation. Every problem in the batch is reported in
/// the error; warnings (short factoids) never block the merge.
pub fn validate_candidates(values: Vec<Value>) -> Result<CandidateBatch, GovGraphError> {
    let mut problems = Vec::new();
    let mut warnings = Vec::new();

    for (index, value) in values.iter().enumerate() {
        let display_id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<no id>");
        for field in REQUIRED_FIELDS {
            let present = value
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|text| !text.trim().is_empty());
            if !present {
                problems.push(format!(
                    "candidate #{} ({}) is missing required field '{}'",
                    index + 1,
                    display_id,
                    field
                ));
            }
        }
        if let Some(factoid) = value.get("factoid").and_then(Value::as_str)
            && !factoid.trim().is_empty()
            && factoid.chars().count() < FACTOID_MIN_CHARS
        {
            warnings.push(format!(
                "candidate '{}' factoid is under {} characters",
                display_id, FACTOID_MIN_CHARS
            ));
        }
    }

    if !problems.is_empty() {
        return Err(GovGraphError::ValidationError(format!(
            "batch rejected, nothing merged: {}",
            problems.join("; ")
        )));
    }

    let nodes = values
        .into_iter()
        .map(serde_json::from_value::<Node>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CandidateBatch { nodes, warnings })
}

/// Splits candidates into genuinely new nodes and skipped duplicate ids,
/// deduplicating against the canonical set and within the batch itself.
pub fn plan_merge(
    existing_ids: &FxHashSet<String>,
    candidates: Vec<Node>,
) -> (Vec<Node>, Vec<String>) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut additions = Vec::new();
    let mut duplicates = Vec::new();
    for node in candidates {
        if existing_ids.contains(&node.id) || !seen.insert(node.id.clone()) {
            duplicates.push(node.id);
        } else {
            additions.push(node);
        }
    }
    (additions, duplicates)
}

pub fn run_merge_cli(store: &DataStore, cli: MergeCli) -> Result<(), GovGraphError> {
    let jurisdiction: Jurisdiction = cli.jurisdiction.parse()?;
    term::heading(&format!("Node merge: {}", jurisdiction));

    let mut canonical = store.load_document(jurisdiction, Tier::Main)?;
    let raw: Value = store.read_json(&cli.generated_file)?;
    let batch = validate_candidates(candidate_values(raw)?)?;
    for warning in &batch.warnings {
        term::warn(warning);
    }

    // Uniqueness holds across both tiers, so the duplicate check does too.
    let mut existing_ids: FxHashSet<String> = canonical
        .nodes
        .iter()
        .map(|node| node.id.clone())
        .collect();
    match store.load_document(jurisdiction, Tier::Intra) {
        Ok(intra) => existing_ids.extend(intra.nodes.iter().map(|node| node.id.clone())),
        Err(GovGraphError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let batch_size = batch.nodes.len();
    let (additions, duplicates) = plan_merge(&existing_ids, batch.nodes);

    for id in &duplicates {
        term::step(&format!("duplicate skipped: {}", id));
    }
    for node in &additions {
        term::step(&format!("new node: {}", node.id));
    }

    let resulting_total = canonical.nodes.len() + additions.len();
    if cli.dry_run {
        term::ok(&format!(
            "dry-run complete: {} of {} candidate(s) would be added, {} duplicate(s) skipped, resulting total {}",
            additions.len(),
            batch_size,
            duplicates.len(),
            resulting_total
        ));
        return Ok(());
    }

    if additions.is_empty() {
        term::ok(&format!(
            "nothing to merge: all {} candidate(s) were duplicates",
            duplicates.len()
        ));
        return Ok(());
    }

    let path = store.document_path(jurisdiction, Tier::Main);
    store.backup(&path, BACKUP_SUFFIX_MERGE)?;
    canonical.nodes.extend(additions.iter().cloned());
    canonical.nodes.sort_by(|a, b| a.id.cmp(&b.id));
    store.save_document(jurisdiction, Tier::Main, &canonical)?;

    term::ok(&format!(
        "merged {} node(s), skipped {} duplicate(s), canonical total {}",
        additions.len(),
        duplicates.len(),
        resulting_total
    ));
    Ok(())
}
