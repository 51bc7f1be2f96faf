//! Referential-integrity validation over the full corpus.
//!
//! Two surfaces share this module. `validate` checks each jurisdiction's main
//! and intra tier documents: id uniqueness, namespace conformance, edge
//! closure, and subview references. `refs` is the companion check over
//! process files (flat node reference lists) and subgraph files, and proposes
//! fuzzy-match corrections for every missing id.
//!
//! Problems are collected exhaustively - a single run reports every issue in
//! the corpus - and the process exits non-zero iff at least one error (not
//! merely warnings) was found.

use crate::core::config::GovGraphConfig;
use crate::core::error::GovGraphError;
use crate::core::model::{Jurisdiction, JurisdictionDocument, ProcessFile, Subgraph, Tier};
use crate::core::repository::DataStore;
use crate::core::similarity;
use crate::core::term::{self, Banner};
use regex::Regex;
use rustc_hash::FxHashSet;

#[derive(clap::Args, Debug)]
pub struct ValidateCli {
    /// Restrict validation to one jurisdiction (default: all configured).
    #[clap(long)]
    pub jurisdiction: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RefsCli {
    /// Restrict the reference check to one jurisdiction (default: all configured).
    #[clap(long)]
    pub jurisdiction: Option<String>,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn id_format() -> Regex {
    Regex::new(r"^(city|state|federal):[a-z0-9][a-z0-9_.-]*$").expect("valid id format regex")
}

/// Combined node-id set of both tiers; duplicates within or across the tiers
/// are reported as errors while building it.
fn combined_node_ids(
    jurisdiction: Jurisdiction,
    tiers: &[(Tier, &JurisdictionDocument)],
    report: &mut ValidationReport,
) -> FxHashSet<String> {
    let mut ids = FxHashSet::default();
    for (tier, document) in tiers {
        for node in &document.nodes {
            if !ids.insert(node.id.clone()) {
                report.error(format!(
                    "{}: duplicate node id '{}' ({} tier)",
                    jurisdiction, node.id, tier
                ));
            }
        }
    }
    ids
}

/// Document-level checks for one jurisdiction: duplicates, namespace
/// conformance, edge closure, subview references, and tier metadata.
pub fn check_documents(
    jurisdiction: Jurisdiction,
    main: Option<&JurisdictionDocument>,
    intra: Option<&JurisdictionDocument>,
    report: &mut ValidationReport,
) {
    let mut tiers: Vec<(Tier, &JurisdictionDocument)> = Vec::new();
    if let Some(document) = main {
        tiers.push((Tier::Main, document));
    }
    if let Some(document) = intra {
        tiers.push((Tier::Intra, document));
    }
    if tiers.is_empty() {
        report.warn(format!("{}: no tier documents found, skipped", jurisdiction));
        return;
    }

    let ids = combined_node_ids(jurisdiction, &tiers, report);
    let format = id_format();

    for (tier, document) in &tiers {
        match &document.meta.tier {
            None => report.warn(format!(
                "{}: {} tier document is missing meta.tier",
                jurisdiction, tier
            )),
            Some(value) if value != tier.as_str() => report.warn(format!(
                "{}: {} tier document has meta.tier '{}' (expected '{}')",
                jurisdiction, tier, value, tier
            )),
            Some(_) => {}
        }

        for node in &document.nodes {
            if !jurisdiction.owns(&node.id) {
                report.error(format!(
                    "{}: node id '{}' is missing the '{}' prefix ({} tier)",
                    jurisdiction,
                    node.id,
                    jurisdiction.prefix(),
                    tier
                ));
            } else if !format.is_match(&node.id) {
                report.error(format!(
                    "{}: node id '{}' does not match the id format ({} tier)",
                    jurisdiction, node.id, tier
                ));
            }
        }

        for edge in &document.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint) {
                    report.error(format!(
                        "{}: {} edge {}→{} references unknown node '{}'",
                        jurisdiction, tier, edge.source, edge.target, endpoint
                    ));
                }
            }
        }

        for subview in &document.subviews {
            for anchor in subview.anchors() {
                if !ids.contains(anchor) {
                    report.error(format!(
                        "{}: subview '{}' anchor references unknown node '{}'",
                        jurisdiction, subview.id, anchor
                    ));
                }
            }
            for reference in &subview.nodes {
                if !ids.contains(reference) {
                    report.error(format!(
                        "{}: subview '{}' references unknown node '{}'",
                        jurisdiction, subview.id, reference
                    ));
                }
            }
            // Subviews may be drafted with bare local ids; normalize before
            // checking, and degrade unresolved endpoints to warnings.
            for edge in &subview.edges {
                for endpoint in [&edge.source, &edge.target] {
                    if ids.contains(endpoint) {
                        continue;
                    }
                    let normalized = jurisdiction.namespaced(endpoint);
                    if !ids.contains(&normalized) {
                        report.warn(format!(
                            "{}: subview '{}' edge endpoint '{}' unresolved (also tried '{}')",
                            jurisdiction, subview.id, endpoint, normalized
                        ));
                    }
                }
            }
        }
    }
}

fn missing_with_suggestions(
    context: &str,
    reference: &str,
    known_ids: &FxHashSet<String>,
    report: &mut ValidationReport,
) {
    let suggestions = similarity::suggest(reference, known_ids.iter().map(String::as_str));
    if suggestions.is_empty() {
        report.error(format!("{} references missing node '{}'", context, reference));
    } else {
        report.error(format!(
            "{} references missing node '{}' (did you mean: {}?)",
            context,
            reference,
            suggestions.join(", ")
        ));
    }
}

/// Companion reference check over process and subgraph files.
///
/// `known_ids` is the full corpus id set, so legitimate cross-jurisdiction
/// references (state processes walking city entities) resolve.
pub fn check_references(
    jurisdiction: Jurisdiction,
    processes: Option<&ProcessFile>,
    subgraphs: &[(String, Subgraph)],
    known_ids: &FxHashSet<String>,
    report: &mut ValidationReport,
) {
    if let Some(file) = processes {
        for process in &file.processes {
            for reference in &process.nodes {
                if !known_ids.contains(reference) {
                    let context = format!("{}: process '{}'", jurisdiction, process.id);
                    missing_with_suggestions(&context, reference, known_ids, report);
                }
            }
        }
    }

    for (name, subgraph) in subgraphs {
        let context = format!("{}: subgraph '{}'", jurisdiction, name);
        for node in &subgraph.elements.nodes {
            if !known_ids.contains(&node.data.id) {
                missing_with_suggestions(&context, &node.data.id, known_ids, report);
            }
        }
        for edge in &subgraph.elements.edges {
            for endpoint in [&edge.data.source, &edge.data.target] {
                if !known_ids.contains(endpoint) {
                    missing_with_suggestions(&context, endpoint, known_ids, report);
                }
            }
        }
        if let Some(entry) = &subgraph.entry_node_id
            && !known_ids.contains(entry)
        {
            let context = format!("{}: subgraph '{}' entryNodeId", jurisdiction, name);
            missing_with_suggestions(&context, entry, known_ids, report);
        }
    }
}

fn selected_jurisdictions(
    config: &GovGraphConfig,
    requested: &Option<String>,
) -> Result<Vec<Jurisdiction>, GovGraphError> {
    match requested {
        Some(name) => Ok(vec![name.parse()?]),
        None => config.jurisdictions(),
    }
}

fn load_optional_document(
    store: &DataStore,
    jurisdiction: Jurisdiction,
    tier: Tier,
) -> Result<Option<JurisdictionDocument>, GovGraphError> {
    match store.load_document(jurisdiction, tier) {
        Ok(document) => Ok(Some(document)),
        Err(GovGraphError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn finish(report: ValidationReport, banner: &str) -> Result<(), GovGraphError> {
    for warning in &report.warnings {
        term::warn(&term::compact(warning, 140));
    }
    for error in &report.errors {
        term::error(&term::compact(error, 140));
    }
    println!();
    term::step(&format!(
        "{} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    ));

    if report.is_clean() {
        term::render_banner(&format!("{} PASSED", banner), Banner::Pass);
        Ok(())
    } else {
        term::render_banner(&format!("{} FAILED", banner), Banner::Fail);
        Err(GovGraphError::ReferentialIntegrityError(format!(
            "{} error(s) found",
            report.errors.len()
        )))
    }
}

pub fn run_validate_cli(
    store: &DataStore,
    config: &GovGraphConfig,
    cli: ValidateCli,
) -> Result<(), GovGraphError> {
    term::heading("Reference validation");
    let mut report = ValidationReport::default();

    for jurisdiction in selected_jurisdictions(config, &cli.jurisdiction)? {
        let main = load_optional_document(store, jurisdiction, Tier::Main)?;
        let intra = load_optional_document(store, jurisdiction, Tier::Intra)?;
        check_documents(jurisdiction, main.as_ref(), intra.as_ref(), &mut report);
    }

    finish(report, "VALIDATION")
}

pub fn run_refs_cli(
    store: &DataStore,
    config: &GovGraphConfig,
    cli: RefsCli,
) -> Result<(), GovGraphError> {
    term::heading("Process and subgraph reference check");
    let mut report = ValidationReport::default();

    // Full corpus id set: cross-jurisdiction references are legitimate.
    let mut known_ids = FxHashSet::default();
    for jurisdiction in config.jurisdictions()? {
        for tier in [Tier::Main, Tier::Intra] {
            if let Some(document) = load_optional_document(store, jurisdiction, tier)? {
                known_ids.extend(document.nodes.iter().map(|node| node.id.clone()));
            }
        }
    }

    for jurisdiction in selected_jurisdictions(config, &cli.jurisdiction)? {
        let processes = match store.load_processes(jurisdiction) {
            Ok(file) => Some(file),
            Err(GovGraphError::NotFound(path)) => {
                report.warn(format!(
                    "{}: skipped missing process file ({})",
                    jurisdiction, path
                ));
                None
            }
            Err(e) => return Err(e),
        };

        let mut subgraphs = Vec::new();
        for path in store.subgraph_paths(jurisdiction)? {
            let name = path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or("?")
                .to_string();
            subgraphs.push((name, store.load_subgraph(&path)?));
        }

        check_references(
            jurisdiction,
            processes.as_ref(),
            &subgraphs,
            &known_ids,
            &mut report,
        );
    }

    finish(report, "REFERENCES")
}
