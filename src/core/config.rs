//! Toolchain configuration.
//!
//! An optional `govgraph.toml` next to the dataset overrides the data
//! directory and the jurisdiction roster. Absent a config file, the defaults
//! match the published corpus layout.

use crate::core::error::GovGraphError;
use crate::core::model::Jurisdiction;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "govgraph.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovGraphConfig {
    /// Directory holding the JSON corpus, relative to the invocation root.
    pub data_dir: PathBuf,
    /// Jurisdictions processed by corpus-wide tools, in order.
    pub jurisdictions: Vec<String>,
}

impl Default for GovGraphConfig {
    fn default() -> Self {
        GovGraphConfig {
            data_dir: PathBuf::from("data"),
            jurisdictions: Jurisdiction::ALL
                .iter()
                .map(|j| j.as_str().to_string())
                .collect(),
        }
    }
}

impl GovGraphConfig {
    pub fn jurisdictions(&self) -> Result<Vec<Jurisdiction>, GovGraphError> {
        self.jurisdictions
            .iter()
            .map(|name| name.parse::<Jurisdiction>())
            .collect()
    }
}

pub fn load_config(root: &Path) -> Result<GovGraphConfig, GovGraphError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GovGraphConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| {
        GovGraphError::ValidationError(format!("Malformed {}: {}", path.display(), e))
    })
}
