//! Source document parsers
//!
//! Three structurally incompatible source shapes feed the catalog:
//! a STIX-style bundle, a flat navigator layer, and a spreadsheet
//! workbook. Each parser is a stateless reader producing unordered
//! `RawCandidate` records; validation happens later in the normalizer.

pub mod bundle;
pub mod layer;
pub mod workbook;

use rtops_common::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// One raw (technique, tactic) candidate emitted by a parser
///
/// Not yet validated: the id pattern and tactic membership are checked by
/// the normalizer, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub technique_id: String,
    pub tactic: String,
    pub name: String,
    pub description: String,
}

/// A successfully parsed source document, tagged by shape
#[derive(Debug)]
pub enum ParsedSource {
    Bundle(bundle::BundleDoc),
    Layer(layer::LayerDoc),
    Workbook(workbook::WorkbookDoc),
}

/// Shape sniffing for the two JSON source formats: a bundle carries a
/// top-level `objects` array, a navigator layer carries `techniques`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    Bundle(bundle::BundleDoc),
    Layer(layer::LayerDoc),
}

/// Load a bundle or layer document from a JSON file
pub fn load_json_source(path: &Path) -> Result<ParsedSource> {
    let content = std::fs::read_to_string(path)?;
    let doc: JsonDocument = serde_json::from_str(&content)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;

    Ok(match doc {
        JsonDocument::Bundle(doc) => ParsedSource::Bundle(doc),
        JsonDocument::Layer(doc) => ParsedSource::Layer(doc),
    })
}

/// Load a spreadsheet workbook document
pub fn load_workbook_source(path: &Path) -> Result<ParsedSource> {
    Ok(ParsedSource::Workbook(workbook::load(path)?))
}
