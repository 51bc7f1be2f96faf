use govgraph::core::repository::DataStore;
use govgraph::tools::compose::{self, ComposeCli};
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

fn node(id: &str, label: &str) -> Value {
    json!({ "id": id, "label": label })
}

fn seed_backups(root: &Path) {
    // Backup documents predate namespacing: bare ids throughout.
    write_json(
        root,
        "city.json.backup",
        json!({
            "meta": { "title": "City of New York" },
            "nodes": [node("mayor", "Mayor"), node("city_council", "City Council")],
            "edges": [{ "source": "mayor", "target": "city_council", "relation": "proposes_budget" }]
        }),
    );
    write_json(
        root,
        "state.json.backup",
        json!({
            "meta": { "title": "New York State" },
            "nodes": [node("governor", "Governor"), node("mta", "MTA")],
            "edges": [{ "source": "governor", "target": "mta", "relation": "appoints" }]
        }),
    );
    write_json(
        root,
        "federal.json.backup",
        json!({
            "meta": { "title": "Federal Government" },
            "nodes": [node("potus", "President")],
            "edges": []
        }),
    );
    write_json(
        root,
        "regional.json",
        json!({
            "meta": { "title": "Regional Entities" },
            "nodes": [node("mta", "MTA"), node("port_authority", "Port Authority")],
            "edges": [
                { "source": "mta", "target": "port_authority", "relation": "coordinates_with" },
                { "source": "port_authority", "target": "njtransit", "relation": "coordinates_with" }
            ]
        }),
    );
}

fn node_ids(aggregate: &Value) -> Vec<String> {
    aggregate["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .map(|node| node["id"].as_str().expect("node id").to_string())
        .collect()
}

#[test]
fn compose_prefixes_and_merges_the_overlay() {
    let tmp = tempdir().expect("tempdir");
    seed_backups(tmp.path());
    let store = DataStore::new(tmp.path());

    compose::run_compose_cli(&store, ComposeCli { dry_run: false }).expect("compose succeeds");

    let aggregate = read_json(tmp.path(), "main.json");
    assert_eq!(aggregate["meta"]["tier"], "main");

    let ids = node_ids(&aggregate);
    assert!(ids.contains(&"city:mayor".to_string()));
    assert!(ids.contains(&"state:governor".to_string()));
    assert!(ids.contains(&"federal:potus".to_string()));
    // Overlay merges into the state namespace; the natively present node is
    // not duplicated.
    assert!(ids.contains(&"state:port_authority".to_string()));
    assert_eq!(ids.iter().filter(|id| *id == "state:mta").count(), 1);
    assert_eq!(ids.len(), 6);

    let edges = aggregate["edges"].as_array().expect("edges array");
    // Overlay edge with both endpoints present is included; the one whose
    // target never entered the assembled set is dropped.
    assert!(edges.iter().any(|edge| {
        edge["source"] == "state:mta" && edge["target"] == "state:port_authority"
    }));
    assert!(!edges.iter().any(|edge| edge["target"] == "njtransit"));
    assert!(!edges.iter().any(|edge| edge["target"] == "state:njtransit"));
    assert_eq!(edges.len(), 3);
}

#[test]
fn compose_dry_run_writes_nothing() {
    let tmp = tempdir().expect("tempdir");
    seed_backups(tmp.path());
    let store = DataStore::new(tmp.path());

    compose::run_compose_cli(&store, ComposeCli { dry_run: true }).expect("dry run succeeds");

    assert!(!tmp.path().join("main.json").exists());
}

#[test]
fn missing_backups_are_skipped_with_warnings() {
    let tmp = tempdir().expect("tempdir");
    write_json(
        tmp.path(),
        "city.json.backup",
        json!({
            "meta": { "title": "City of New York" },
            "nodes": [node("mayor", "Mayor")],
            "edges": []
        }),
    );
    let store = DataStore::new(tmp.path());

    compose::run_compose_cli(&store, ComposeCli { dry_run: false })
        .expect("partial corpus still composes");

    let aggregate = read_json(tmp.path(), "main.json");
    assert_eq!(node_ids(&aggregate), vec!["city:mayor".to_string()]);
}
