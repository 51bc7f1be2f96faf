//! Filesystem repository for the graph corpus.
//!
//! All reads and writes route through [`DataStore`], so migration, validation,
//! and merge logic stay pure functions over in-memory documents. Writes are
//! pretty-printed with 2-space indent and a trailing newline, matching the
//! hand-edited files. Mutating tools copy the target to a `.backup*` sibling
//! before overwriting; the copy is skipped when an up-to-date backup already
//! exists (content checksum match).

use crate::core::error::GovGraphError;
use crate::core::model::{Jurisdiction, JurisdictionDocument, ProcessFile, Subgraph, Tier};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKUP_SUFFIX_MERGE: &str = ".backup";
pub const BACKUP_SUFFIX_EDGES: &str = ".backup-edges";
pub const BACKUP_SUFFIX_NAMESPACE: &str = ".backup-namespace";

#[derive(Debug, Clone)]
pub struct DataStore {
    root: PathBuf,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DataStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `data/{jurisdiction}.json` (main) or `data/{jurisdiction}-intra.json`.
    pub fn document_path(&self, jurisdiction: Jurisdiction, tier: Tier) -> PathBuf {
        match tier {
            Tier::Main => self.root.join(format!("{}.json", jurisdiction)),
            Tier::Intra => self.root.join(format!("{}-intra.json", jurisdiction)),
        }
    }

    pub fn processes_path(&self, jurisdiction: Jurisdiction) -> PathBuf {
        self.root.join(format!("{}-processes.json", jurisdiction))
    }

    pub fn regional_path(&self) -> PathBuf {
        self.root.join("regional.json")
    }

    pub fn aggregate_path(&self) -> PathBuf {
        self.root.join("main.json")
    }

    /// `data/subgraphs/{jurisdiction}*.json`, sorted for deterministic runs.
    pub fn subgraph_paths(&self, jurisdiction: Jurisdiction) -> Result<Vec<PathBuf>, GovGraphError> {
        let dir = self.root.join("subgraphs");
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if name.starts_with(jurisdiction.as_str()) && name.ends_with(".json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    pub fn load_document(
        &self,
        jurisdiction: Jurisdiction,
        tier: Tier,
    ) -> Result<JurisdictionDocument, GovGraphError> {
        self.read_json(&self.document_path(jurisdiction, tier))
    }

    pub fn save_document(
        &self,
        jurisdiction: Jurisdiction,
        tier: Tier,
        document: &JurisdictionDocument,
    ) -> Result<(), GovGraphError> {
        self.write_json(&self.document_path(jurisdiction, tier), document)
    }

    pub fn load_processes(
        &self,
        jurisdiction: Jurisdiction,
    ) -> Result<ProcessFile, GovGraphError> {
        self.read_json(&self.processes_path(jurisdiction))
    }

    pub fn save_processes(
        &self,
        jurisdiction: Jurisdiction,
        processes: &ProcessFile,
    ) -> Result<(), GovGraphError> {
        self.write_json(&self.processes_path(jurisdiction), processes)
    }

    pub fn load_subgraph(&self, path: &Path) -> Result<Subgraph, GovGraphError> {
        self.read_json(path)
    }

    pub fn save_subgraph(&self, path: &Path, subgraph: &Subgraph) -> Result<(), GovGraphError> {
        self.write_json(path, subgraph)
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, GovGraphError> {
        if !path.exists() {
            return Err(GovGraphError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            GovGraphError::ValidationError(format!("Malformed document {}: {}", path.display(), e))
        })
    }

    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), GovGraphError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    /// Copies `path` to `{path}{suffix}` before an overwrite.
    ///
    /// Returns `false` when an identical backup is already in place.
    pub fn backup(&self, path: &Path, suffix: &str) -> Result<bool, GovGraphError> {
        if !path.exists() {
            return Err(GovGraphError::NotFound(path.display().to_string()));
        }
        let backup_path = backup_path_for(path, suffix);
        let current = fs::read(path)?;
        if backup_path.exists() {
            let existing = fs::read(&backup_path)?;
            if sha256_hex(&existing) == sha256_hex(&current) {
                return Ok(false);
            }
        }
        fs::write(&backup_path, current)?;
        Ok(true)
    }
}

pub fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
