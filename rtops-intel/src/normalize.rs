//! Record normalizer
//!
//! Pure gate between the parsers and the merger: every raw candidate
//! either becomes a well-formed catalog upsert or is silently dropped.
//! This is the single place technique-id syntax and registry membership
//! are enforced, for all three source shapes.

use crate::registry;
use crate::sources::RawCandidate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Technique identifier pattern: `T####` with an optional `.###` sub-id
static TECHNIQUE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^T\d{4}(\.\d{3})?$").expect("valid technique id pattern"));

/// A validated candidate, ready for the catalog merger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechniqueUpsert {
    pub technique_id: String,
    pub tactic: String,
    pub name: String,
    pub description: String,
}

/// Normalize one raw candidate, or reject it
///
/// Rejects when the technique id is empty or malformed, or when the tactic
/// is not a registry member. All fields are trimmed.
pub fn normalize(raw: &RawCandidate) -> Option<TechniqueUpsert> {
    let technique_id = raw.technique_id.trim();
    if !TECHNIQUE_ID.is_match(technique_id) {
        return None;
    }

    let tactic = raw.tactic.trim();
    if !registry::is_registered(tactic) {
        return None;
    }

    Some(TechniqueUpsert {
        technique_id: technique_id.to_string(),
        tactic: tactic.to_string(),
        name: raw.name.trim().to_string(),
        description: raw.description.trim().to_string(),
    })
}

/// Normalize a batch, dropping rejected candidates
pub fn normalize_all(raw: &[RawCandidate]) -> Vec<TechniqueUpsert> {
    raw.iter().filter_map(normalize).collect()
}
