//! Flat-list (navigator layer) source parser
//!
//! Reads a flat list of `{techniqueID, tactic}` pairs carrying no names or
//! descriptions. The technique id doubles as a visible placeholder name,
//! signalling "needs enrichment" to a later workbook pass.

use super::RawCandidate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LayerDoc {
    pub techniques: Vec<LayerEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LayerEntry {
    #[serde(rename = "techniqueID", default)]
    pub technique_id: String,
    #[serde(default)]
    pub tactic: String,
}

/// Extract raw candidates from a layer document
///
/// Entries missing either the id or the tactic field are skipped.
pub fn candidates(doc: &LayerDoc) -> Vec<RawCandidate> {
    doc.techniques
        .iter()
        .filter(|t| !t.technique_id.is_empty() && !t.tactic.is_empty())
        .map(|t| RawCandidate {
            technique_id: t.technique_id.clone(),
            tactic: t.tactic.to_lowercase(),
            name: t.technique_id.clone(),
            description: String::new(),
        })
        .collect()
}
