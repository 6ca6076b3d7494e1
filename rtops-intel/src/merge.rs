//! Catalog merger
//!
//! Applies normalized records to the persistent catalog under
//! insert-if-absent / enrich-if-incomplete semantics and counts effective
//! changes. Replaying the same batch is idempotent: the second pass leaves
//! the catalog unchanged and reports zero changes.

use crate::normalize::TechniqueUpsert;
use chrono::Utc;
use rtops_common::models::TechniqueRecord;
use rtops_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Field updates chosen by conflict resolution; `None` means "keep stored"
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Resolution {
    pub fn is_noop(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Enrich-only conflict resolution between a stored record and an incoming
/// upsert
///
/// Last writer loses on purpose: a genuine stored name is never replaced
/// by a different genuine name, and non-empty fields are never overwritten
/// with emptiness. Only empty or placeholder fields are fillable.
pub fn resolve(existing: &TechniqueRecord, incoming: &TechniqueUpsert) -> Resolution {
    let name = if !incoming.name.is_empty()
        && existing.name_is_placeholder()
        && incoming.name != existing.name
    {
        Some(incoming.name.clone())
    } else {
        None
    };

    let description = if !incoming.description.is_empty() && existing.description.is_empty() {
        Some(incoming.description.clone())
    } else {
        None
    };

    Resolution { name, description }
}

/// Apply one source file's worth of normalized records to the catalog
///
/// Runs as a single transaction per batch. Returns the number of effective
/// changes: rows inserted plus rows where a field transitioned.
pub async fn apply_batch(pool: &SqlitePool, batch: &[TechniqueUpsert]) -> Result<u64> {
    let mut changed: u64 = 0;
    let now = Utc::now().to_rfc3339();

    let mut tx = pool.begin().await?;

    for record in batch {
        // Insert-if-absent keeps a replayed batch from violating the
        // (technique_id, tactic) uniqueness invariant.
        let inserted = sqlx::query(
            r#"
            INSERT OR IGNORE INTO techniques (technique_id, tactic, name, description, refs, created_at)
            VALUES (?, ?, ?, ?, '', ?)
            "#,
        )
        .bind(&record.technique_id)
        .bind(&record.tactic)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 1 {
            changed += 1;
            continue;
        }

        let existing: TechniqueRecord = sqlx::query_as(
            "SELECT technique_id, tactic, name, description, refs, created_at
             FROM techniques WHERE technique_id = ? AND tactic = ?",
        )
        .bind(&record.technique_id)
        .bind(&record.tactic)
        .fetch_one(&mut *tx)
        .await?;

        let resolution = resolve(&existing, record);
        if resolution.is_noop() {
            continue;
        }

        debug!(
            technique_id = %record.technique_id,
            tactic = %record.tactic,
            "Enriching catalog record"
        );

        sqlx::query("UPDATE techniques SET name = ?, description = ? WHERE technique_id = ? AND tactic = ?")
            .bind(resolution.name.as_deref().unwrap_or(&existing.name))
            .bind(
                resolution
                    .description
                    .as_deref()
                    .unwrap_or(&existing.description),
            )
            .bind(&record.technique_id)
            .bind(&record.tactic)
            .execute(&mut *tx)
            .await?;

        changed += 1;
    }

    tx.commit().await?;
    Ok(changed)
}
