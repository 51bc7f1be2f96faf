//! Graph document model for the two-tier per-jurisdiction corpus.
//!
//! Every batch tool operates on these types. Documents are parsed strictly at
//! the load boundary: a node without an `id` or an edge without endpoints is a
//! parse error, so malformed files are rejected before any mutation logic runs.
//! Unknown JSON fields are preserved through a flattened extras map so that
//! hand-edited presentation data survives a rewrite.

use crate::core::error::GovGraphError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Top-level namespace scope for node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jurisdiction {
    City,
    State,
    Federal,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 3] = [
        Jurisdiction::City,
        Jurisdiction::State,
        Jurisdiction::Federal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::City => "city",
            Jurisdiction::State => "state",
            Jurisdiction::Federal => "federal",
        }
    }

    /// The `{jurisdiction}:` string prepended to a local id.
    pub fn prefix(&self) -> String {
        format!("{}:", self.as_str())
    }

    pub fn namespaced(&self, local_id: &str) -> String {
        format!("{}:{}", self.as_str(), local_id)
    }

    /// Returns the local id when `id` carries this jurisdiction's prefix.
    pub fn strip<'a>(&self, id: &'a str) -> Option<&'a str> {
        id.strip_prefix(self.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
    }

    pub fn owns(&self, id: &str) -> bool {
        self.strip(id).is_some()
    }

    /// Strips whichever jurisdiction prefix `id` carries, if any.
    pub fn strip_any(id: &str) -> &str {
        for jurisdiction in Jurisdiction::ALL {
            if let Some(local) = jurisdiction.strip(id) {
                return local;
            }
        }
        id
    }
}

impl FromStr for Jurisdiction {
    type Err = GovGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(Jurisdiction::City),
            "state" => Ok(Jurisdiction::State),
            "federal" => Ok(Jurisdiction::Federal),
            other => Err(GovGraphError::ValidationError(format!(
                "Unknown jurisdiction '{}'. Expected one of: city, state, federal.",
                other
            ))),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document tier within a jurisdiction.
///
/// `Main` holds constitutional/structural entities; `Intra` holds internal
/// departmental detail. Their node-id spaces must be disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Main,
    Intra,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Main => "main",
            Tier::Intra => "intra",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A government entity. `id` is globally unique and carries the
/// `{jurisdiction}:{localId}` form once migration has run; the pre-migration
/// id is retained as `legacyId` for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub factoid: String,
    #[serde(default, rename = "legacyId", skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A relationship between two nodes. `id` is a pure function of
/// `(source, target, relation)`; `category` is the taxonomy bucket derived
/// from `relation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named, pre-selected subset of nodes/edges anchored to one or more nodes.
///
/// Subview edges may legitimately be drafted with bare local ids; the
/// validator normalizes them with the jurisdiction prefix before checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subview {
    pub id: String,
    #[serde(default, rename = "nodeId", skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(default, rename = "nodeIds", skip_serializing_if = "Option::is_none")]
    pub node_ids: Option<Vec<String>>,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Subview {
    /// All anchor references, regardless of singular/plural form.
    pub fn anchors(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        if let Some(id) = &self.node_id {
            refs.push(id.as_str());
        }
        if let Some(ids) = &self.node_ids {
            refs.extend(ids.iter().map(String::as_str));
        }
        refs
    }
}

/// One tier of a jurisdiction's graph, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JurisdictionDocument {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subviews: Vec<Subview>,
}

/// A legislative/financial process: an ordered node walk plus process-local
/// edges. `steps` is narrative content, opaque to the toolchain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub steps: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessFile {
    #[serde(default)]
    pub processes: Vec<Process>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphNodeData {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphNode {
    pub data: SubgraphNodeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphEdgeData {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphEdge {
    pub data: SubgraphEdgeData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubgraphElements {
    #[serde(default)]
    pub nodes: Vec<SubgraphNode>,
    #[serde(default)]
    pub edges: Vec<SubgraphEdge>,
}

/// A Cytoscape-shaped focused subgraph file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subgraph {
    #[serde(default)]
    pub elements: SubgraphElements,
    #[serde(
        default,
        rename = "entryNodeId",
        skip_serializing_if = "Option::is_none"
    )]
    pub entry_node_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
