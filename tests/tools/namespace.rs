use govgraph::core::model::{Jurisdiction, Tier};
use govgraph::core::repository::DataStore;
use govgraph::tools::namespace::{self, NamespaceCli};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_json(root: &Path, relative: &str, value: Value) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("fixture dir");
    }
    let text = format!(
        "{}\n",
        serde_json::to_string_pretty(&value).expect("fixture json")
    );
    fs::write(path, text).expect("fixture write");
}

fn read_json(root: &Path, relative: &str) -> Value {
    let text = fs::read_to_string(root.join(relative)).expect("read fixture back");
    serde_json::from_str(&text).expect("parse fixture back")
}

fn seed_city(root: &Path) {
    write_json(
        root,
        "city.json",
        json!({
            "meta": { "title": "City of New York", "tier": "main" },
            "nodes": [
                { "id": "mayor", "label": "Mayor", "type": "elected_office", "branch": "executive",
                  "factoid": "Chief executive of New York City government." },
                { "id": "city_council", "label": "City Council", "type": "legislature", "branch": "legislative",
                  "factoid": "51-member lawmaking body of New York City." }
            ],
            "edges": [
                { "source": "mayor", "target": "city_council", "relation": "proposes_budget" }
            ]
        }),
    );
    write_json(
        root,
        "city-processes.json",
        json!({
            "processes": [
                {
                    "id": "city:budget_process",
                    "label": "Budget Process",
                    "nodes": ["mayor", "city_council"],
                    "edges": [{ "source": "mayor", "target": "city_council" }],
                    "steps": []
                }
            ]
        }),
    );
    write_json(
        root,
        "subgraphs/city_budget.json",
        json!({
            "elements": {
                "nodes": [
                    { "data": { "id": "mayor" } },
                    { "data": { "id": "city_council" } }
                ],
                "edges": [
                    { "data": { "source": "mayor", "target": "city_council" } }
                ]
            },
            "entryNodeId": "mayor"
        }),
    );
}

#[test]
fn migration_prefixes_ids_and_retains_legacy() {
    let tmp = tempdir().expect("tempdir");
    seed_city(tmp.path());
    let store = DataStore::new(tmp.path());

    namespace::run_namespace_cli(
        &store,
        NamespaceCli {
            jurisdiction: "city".to_string(),
            dry_run: false,
        },
    )
    .expect("migration succeeds");

    let city = read_json(tmp.path(), "city.json");
    assert_eq!(city["nodes"][0]["id"], "city:mayor");
    assert_eq!(city["nodes"][0]["legacyId"], "mayor");
    assert_eq!(city["edges"][0]["source"], "city:mayor");
    assert_eq!(city["edges"][0]["target"], "city:city_council");

    let processes = read_json(tmp.path(), "city-processes.json");
    assert_eq!(
        processes["processes"][0]["nodes"],
        json!(["city:mayor", "city:city_council"])
    );
    assert_eq!(
        processes["processes"][0]["edges"][0]["target"],
        "city:city_council"
    );

    let subgraph = read_json(tmp.path(), "subgraphs/city_budget.json");
    assert_eq!(subgraph["entryNodeId"], "city:mayor");
    assert_eq!(subgraph["elements"]["nodes"][1]["data"]["id"], "city:city_council");

    assert!(tmp.path().join("city.json.backup-namespace").exists());
    assert!(
        tmp.path()
            .join("city-processes.json.backup-namespace")
            .exists()
    );
}

#[test]
fn second_migration_run_changes_nothing() {
    let tmp = tempdir().expect("tempdir");
    seed_city(tmp.path());
    let store = DataStore::new(tmp.path());

    for _ in 0..2 {
        namespace::run_namespace_cli(
            &store,
            NamespaceCli {
                jurisdiction: "city".to_string(),
                dry_run: false,
            },
        )
        .expect("migration succeeds");
    }

    let city = read_json(tmp.path(), "city.json");
    // No double prefix on the second run.
    assert_eq!(city["nodes"][0]["id"], "city:mayor");
    assert_eq!(city["nodes"][0]["legacyId"], "mayor");
    let processes = read_json(tmp.path(), "city-processes.json");
    assert_eq!(processes["processes"][0]["nodes"][0], "city:mayor");
}

#[test]
fn build_id_map_is_idempotent_on_prefixed_ids() {
    let document = serde_json::from_value(json!({
        "meta": {},
        "nodes": [
            { "id": "city:mayor", "legacyId": "mayor" },
            { "id": "comptroller" }
        ],
        "edges": []
    }))
    .expect("document parses");

    let map = namespace::build_id_map(&document, Jurisdiction::City);
    assert_eq!(map.get("city:mayor").map(String::as_str), Some("city:mayor"));
    assert_eq!(
        map.get("comptroller").map(String::as_str),
        Some("city:comptroller")
    );
}

#[test]
fn state_processes_pick_up_city_mapping() {
    let tmp = tempdir().expect("tempdir");
    // City corpus already migrated.
    write_json(
        tmp.path(),
        "city.json",
        json!({
            "meta": { "tier": "main" },
            "nodes": [
                { "id": "city:mayor", "legacyId": "mayor", "label": "Mayor" }
            ],
            "edges": []
        }),
    );
    write_json(
        tmp.path(),
        "state.json",
        json!({
            "meta": { "tier": "main" },
            "nodes": [
                { "id": "governor", "label": "Governor" }
            ],
            "edges": []
        }),
    );
    // State process walks a city entity by its legacy id.
    write_json(
        tmp.path(),
        "state-processes.json",
        json!({
            "processes": [
                {
                    "id": "state:city_oversight",
                    "label": "City Oversight",
                    "nodes": ["governor", "mayor", "city:mayor"],
                    "edges": [],
                    "steps": []
                }
            ]
        }),
    );
    let store = DataStore::new(tmp.path());

    namespace::run_namespace_cli(
        &store,
        NamespaceCli {
            jurisdiction: "state".to_string(),
            dry_run: false,
        },
    )
    .expect("migration succeeds");

    let processes = read_json(tmp.path(), "state-processes.json");
    assert_eq!(
        processes["processes"][0]["nodes"],
        json!(["state:governor", "city:mayor", "city:mayor"])
    );
}

#[test]
fn missing_files_are_skipped_not_fatal() {
    let tmp = tempdir().expect("tempdir");
    write_json(
        tmp.path(),
        "federal.json",
        json!({
            "meta": { "tier": "main" },
            "nodes": [{ "id": "potus", "label": "President" }],
            "edges": []
        }),
    );
    let store = DataStore::new(tmp.path());

    // No intra tier, no process file, no subgraphs.
    namespace::run_namespace_cli(
        &store,
        NamespaceCli {
            jurisdiction: "federal".to_string(),
            dry_run: false,
        },
    )
    .expect("missing dependents skip with a warning");

    let federal = read_json(tmp.path(), "federal.json");
    assert_eq!(federal["nodes"][0]["id"], "federal:potus");
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = tempdir().expect("tempdir");
    seed_city(tmp.path());
    let before = fs::read_to_string(tmp.path().join("city.json")).expect("read seed");
    let store = DataStore::new(tmp.path());

    namespace::run_namespace_cli(
        &store,
        NamespaceCli {
            jurisdiction: "city".to_string(),
            dry_run: true,
        },
    )
    .expect("dry run succeeds");

    let after = fs::read_to_string(tmp.path().join("city.json")).expect("read after");
    assert_eq!(before, after);
    assert!(!tmp.path().join("city.json.backup-namespace").exists());
}
