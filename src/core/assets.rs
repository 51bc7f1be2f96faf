//! Embedded rule tables.
//!
//! The per-process relation override rules are baked into the binary so the
//! resolver runs hermetically against any checkout of the dataset - no
//! external rule files required.

use crate::core::error::GovGraphError;
use rustc_hash::FxHashMap;

pub const PROCESS_OVERRIDES_JSON: &str = include_str!("../../rules/process_overrides.json");

/// Override tables keyed by process id, then by `{source}→{target}`.
pub type OverrideTables = FxHashMap<String, FxHashMap<String, String>>;

pub fn process_overrides() -> Result<OverrideTables, GovGraphError> {
    let tables: OverrideTables = serde_json::from_str(PROCESS_OVERRIDES_JSON)?;
    Ok(tables)
}
