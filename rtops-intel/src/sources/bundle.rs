//! Bundle (graph-style) source parser
//!
//! Reads a STIX-style bundle: a top-level `objects` collection of tagged
//! entities. Only `attack-pattern` objects are technique data. The
//! technique id is not a primary field; it is recovered from the object's
//! external-reference list, and tactic membership comes from the
//! kill-chain phase tags in the primary taxonomy's namespace.

use super::RawCandidate;
use serde::Deserialize;

/// Source label identifying the primary taxonomy authority
const PRIMARY_SOURCE: &str = "mitre-attack";

#[derive(Debug, Deserialize)]
pub struct BundleDoc {
    pub objects: Vec<BundleObject>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BundleObject {
    #[serde(rename = "type", default)]
    pub object_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
    #[serde(default)]
    pub kill_chain_phases: Vec<KillChainPhase>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExternalReference {
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub external_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct KillChainPhase {
    #[serde(default)]
    pub kill_chain_name: String,
    #[serde(default)]
    pub phase_name: String,
}

/// Extract raw candidates from a bundle document
///
/// An object with zero recognized phases yields nothing; an object with N
/// phases yields N candidates sharing id, name, and description. Objects
/// without a recoverable technique id cannot be cataloged and are skipped.
pub fn candidates(doc: &BundleDoc) -> Vec<RawCandidate> {
    let mut out = Vec::new();

    for obj in &doc.objects {
        if obj.object_type != "attack-pattern" {
            continue;
        }

        // First primary-taxonomy reference whose external id looks like a
        // technique id wins.
        let technique_id = obj.external_references.iter().find_map(|r| {
            if r.source_name.eq_ignore_ascii_case(PRIMARY_SOURCE)
                && r.external_id.starts_with('T')
            {
                Some(r.external_id.clone())
            } else {
                None
            }
        });
        let Some(technique_id) = technique_id else {
            continue;
        };

        for phase in &obj.kill_chain_phases {
            if phase.kill_chain_name != PRIMARY_SOURCE {
                continue;
            }
            out.push(RawCandidate {
                technique_id: technique_id.clone(),
                tactic: phase.phase_name.to_lowercase(),
                name: obj.name.clone(),
                description: obj.description.trim().to_string(),
            });
        }
    }

    out
}
