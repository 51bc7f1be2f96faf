use govgraph::core::assets::OverrideTables;
use govgraph::core::model::Process;
use govgraph::core::repository::DataStore;
use govgraph::tools::edges::{self, EdgesCli};
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_json(root: &Path, relative: &str, value: Value) {
    let text = format!(
        "{}\n",
        serde_json::to_string_pretty(&value).expect("fixture json")
    );
    fs::write(root.join(relative), text).expect("fixture write");
}

fn read_json(root: &Path, relative: &str) -> Value {
    let text = fs::read_to_string(root.join(relative)).expect("read fixture back");
    serde_json::from_str(&text).expect("parse fixture back")
}

fn process_from(value: Value) -> Process {
    serde_json::from_value(value).expect("process parses")
}

fn tables_for(process_id: &str, rules: &[(&str, &str)]) -> OverrideTables {
    let mut table = FxHashMap::default();
    for (key, relation) in rules {
        table.insert((*key).to_string(), (*relation).to_string());
    }
    let mut tables = OverrideTables::default();
    tables.insert(process_id.to_string(), table);
    tables
}

#[test]
fn exact_override_fills_missing_relation() {
    let mut process = process_from(json!({
        "id": "city:budget_process",
        "label": "Budget Process",
        "nodes": [],
        "edges": [{ "source": "city:mayor", "target": "city:omb" }],
        "steps": []
    }));
    let tables = tables_for(
        "city:budget_process",
        &[("city:mayor→city:omb", "proposes_budget")],
    );

    let counts = edges::backfill_process(&mut process, &tables);

    assert_eq!(counts.updated, 1);
    assert_eq!(counts.untouched, 0);
    let edge = &process.edges[0];
    assert_eq!(edge.relation.as_deref(), Some("proposes_budget"));
    assert_eq!(edge.category.as_deref(), Some("financial"));
    assert_eq!(
        edge.id.as_deref(),
        Some("city:mayor→city:omb:proposes_budget")
    );
}

#[test]
fn stripped_lookup_matches_bare_rule_keys() {
    let mut process = process_from(json!({
        "id": "city:legislation",
        "label": "Legislation",
        "nodes": [],
        "edges": [{ "source": "city:city_council", "target": "city:mayor" }],
        "steps": []
    }));
    // Rule table predates namespacing: bare endpoint keys.
    let tables = tables_for("city:legislation", &[("city_council→mayor", "passes_bills")]);

    edges::backfill_process(&mut process, &tables);

    assert_eq!(process.edges[0].relation.as_deref(), Some("passes_bills"));
    assert_eq!(process.edges[0].category.as_deref(), Some("legislative"));
}

#[test]
fn default_relation_applies_when_no_rule_matches() {
    let mut process = process_from(json!({
        "id": "city:unknown_process",
        "label": "Unknown",
        "nodes": [],
        "edges": [{ "source": "city:a", "target": "city:b" }],
        "steps": []
    }));

    edges::backfill_process(&mut process, &OverrideTables::default());

    let edge = &process.edges[0];
    assert_eq!(edge.relation.as_deref(), Some("related_to"));
    assert_eq!(edge.category.as_deref(), Some("other"));
    assert_eq!(edge.id.as_deref(), Some("city:a→city:b:related_to"));
}

#[test]
fn backfill_never_overwrites_present_fields() {
    let mut process = process_from(json!({
        "id": "city:budget_process",
        "label": "Budget Process",
        "nodes": [],
        "edges": [{
            "source": "city:mayor",
            "target": "city:omb",
            "relation": "custom_relation"
        }],
        "steps": []
    }));
    // A rule table that would suggest something else.
    let tables = tables_for(
        "city:budget_process",
        &[("city:mayor→city:omb", "proposes_budget")],
    );

    let counts = edges::backfill_process(&mut process, &tables);

    let edge = &process.edges[0];
    assert_eq!(edge.relation.as_deref(), Some("custom_relation"));
    assert_eq!(edge.category.as_deref(), Some("other"));
    assert_eq!(
        edge.id.as_deref(),
        Some("city:mayor→city:omb:custom_relation")
    );
    assert_eq!(counts.updated, 1);
}

#[test]
fn fully_resolved_edges_are_left_untouched() {
    let mut process = process_from(json!({
        "id": "city:budget_process",
        "label": "Budget Process",
        "nodes": [],
        "edges": [{
            "source": "city:mayor",
            "target": "city:omb",
            "relation": "proposes_budget",
            "category": "financial",
            "id": "city:mayor→city:omb:proposes_budget"
        }],
        "steps": []
    }));

    let counts = edges::backfill_process(&mut process, &OverrideTables::default());

    assert_eq!(counts.updated, 0);
    assert_eq!(counts.untouched, 1);
}

#[test]
fn cli_writes_backup_then_updated_file() {
    let tmp = tempdir().expect("tempdir");
    write_json(
        tmp.path(),
        "city-processes.json",
        json!({
            "processes": [{
                "id": "city:budget_process",
                "label": "Budget Process",
                "nodes": [],
                "edges": [{ "source": "city:mayor", "target": "city:omb" }],
                "steps": []
            }]
        }),
    );
    let store = DataStore::new(tmp.path());

    edges::run_edges_cli(
        &store,
        EdgesCli {
            jurisdiction: Some("city".to_string()),
            dry_run: false,
        },
    )
    .expect("backfill succeeds");

    let backup = read_json(tmp.path(), "city-processes.json.backup-edges");
    assert!(backup["processes"][0]["edges"][0]["relation"].is_null());

    let updated = read_json(tmp.path(), "city-processes.json");
    assert_eq!(
        updated["processes"][0]["edges"][0]["relation"],
        "proposes_budget"
    );
    assert_eq!(updated["processes"][0]["edges"][0]["category"], "financial");
}

#[test]
fn dry_run_reports_without_writing() {
    let tmp = tempdir().expect("tempdir");
    write_json(
        tmp.path(),
        "city-processes.json",
        json!({
            "processes": [{
                "id": "city:budget_process",
                "label": "Budget Process",
                "nodes": [],
                "edges": [{ "source": "city:mayor", "target": "city:omb" }],
                "steps": []
            }]
        }),
    );
    let before = fs::read_to_string(tmp.path().join("city-processes.json")).expect("read seed");
    let store = DataStore::new(tmp.path());

    edges::run_edges_cli(
        &store,
        EdgesCli {
            jurisdiction: Some("city".to_string()),
            dry_run: true,
        },
    )
    .expect("dry run succeeds");

    let after = fs::read_to_string(tmp.path().join("city-processes.json")).expect("read after");
    assert_eq!(before, after);
    assert!(!tmp.path().join("city-processes.json.backup-edges").exists());
}

#[test]
fn missing_process_files_are_skipped() {
    let tmp = tempdir().expect("tempdir");
    let store = DataStore::new(tmp.path());

    edges::run_edges_cli(
        &store,
        EdgesCli {
            jurisdiction: None,
            dry_run: false,
        },
    )
    .expect("missing files skip with warnings");
}
