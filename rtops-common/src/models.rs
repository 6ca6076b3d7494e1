//! Database models

use serde::{Deserialize, Serialize};

/// One canonical (technique, tactic) catalog row
///
/// A technique may appear under several tactics as separate rows; the pair
/// `(technique_id, tactic)` is unique in the `techniques` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TechniqueRecord {
    /// Taxonomy identifier, `T####` or `T####.###`
    pub technique_id: String,
    /// Registry tactic identifier (lowercase hyphenated)
    pub tactic: String,
    /// Display name; empty or equal to `technique_id` means "placeholder,
    /// awaiting enrichment"
    pub name: String,
    /// Free-text description; empty means "awaiting enrichment"
    pub description: String,
    /// Free-text reference links
    pub refs: String,
    /// RFC 3339 timestamp stamped at first insertion
    pub created_at: String,
}

impl TechniqueRecord {
    /// True when `name` is empty or still the technique id placeholder
    pub fn name_is_placeholder(&self) -> bool {
        self.name.is_empty() || self.name == self.technique_id
    }
}
