//! Catalog read contract
//!
//! The only way downstream screens (catalog browser, plan builder, report
//! renderer) consume the pipeline's result: list records grouped by tactic
//! in kill-chain order, with an optional free-text filter, plus the
//! populated flag for status display.

use crate::registry;
use rtops_common::models::TechniqueRecord;
use rtops_common::Result;
use sqlx::SqlitePool;

pub use rtops_common::db::settings::intel_loaded;

/// All records of one tactic, in display order
#[derive(Debug, Clone)]
pub struct TacticGroup {
    pub tactic: String,
    pub title: String,
    pub techniques: Vec<TechniqueRecord>,
}

/// List all catalog records grouped by tactic in kill-chain order
///
/// The filter is a case-insensitive substring match against name,
/// technique id, or tactic id. Every registry tactic gets a group, empty
/// or not, so consumers can render the full kill chain.
pub async fn list_techniques(
    pool: &SqlitePool,
    filter: Option<&str>,
) -> Result<Vec<TacticGroup>> {
    let mut records: Vec<TechniqueRecord> = sqlx::query_as(
        "SELECT technique_id, tactic, name, description, refs, created_at
         FROM techniques
         ORDER BY tactic, name, technique_id",
    )
    .fetch_all(pool)
    .await?;

    if let Some(query) = filter.map(str::trim).filter(|q| !q.is_empty()) {
        let query = query.to_lowercase();
        records.retain(|r| {
            r.name.to_lowercase().contains(&query)
                || r.technique_id.to_lowercase().contains(&query)
                || r.tactic.to_lowercase().contains(&query)
        });
    }

    let mut groups: Vec<TacticGroup> = registry::TACTIC_ORDER
        .iter()
        .map(|&tactic| TacticGroup {
            tactic: tactic.to_string(),
            title: registry::tactic_title(tactic).unwrap_or(tactic).to_string(),
            techniques: Vec::new(),
        })
        .collect();

    for record in records {
        if let Some(index) = registry::order_index(&record.tactic) {
            groups[index].techniques.push(record);
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtops_common::db::init::{create_settings_table, create_techniques_table};

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        create_techniques_table(&pool).await.unwrap();
        create_settings_table(&pool).await.unwrap();
        pool
    }

    async fn insert(pool: &SqlitePool, technique_id: &str, tactic: &str, name: &str) {
        sqlx::query(
            "INSERT INTO techniques (technique_id, tactic, name, description, refs, created_at)
             VALUES (?, ?, ?, '', '', '2026-01-01T00:00:00+00:00')",
        )
        .bind(technique_id)
        .bind(tactic)
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn groups_follow_kill_chain_order() {
        let pool = setup_test_db().await;
        insert(&pool, "T1486", "impact", "Data Encrypted for Impact").await;
        insert(&pool, "T1595", "reconnaissance", "Active Scanning").await;

        let groups = list_techniques(&pool, None).await.unwrap();
        assert_eq!(groups.len(), 14);
        assert_eq!(groups[0].tactic, "reconnaissance");
        assert_eq!(groups[0].techniques.len(), 1);
        assert_eq!(groups[13].tactic, "impact");
        assert_eq!(groups[13].techniques.len(), 1);
        // All other groups present but empty
        assert!(groups[1..13].iter().all(|g| g.techniques.is_empty()));
    }

    #[tokio::test]
    async fn filter_matches_name_id_and_tactic() {
        let pool = setup_test_db().await;
        insert(&pool, "T1059", "execution", "Command and Scripting Interpreter").await;
        insert(&pool, "T1021", "lateral-movement", "Remote Services").await;

        let by_name = list_techniques(&pool, Some("scripting")).await.unwrap();
        assert_eq!(by_name[3].techniques.len(), 1);
        assert!(by_name[9].techniques.is_empty());

        let by_id = list_techniques(&pool, Some("t1021")).await.unwrap();
        assert_eq!(by_id[9].techniques.len(), 1);
        assert!(by_id[3].techniques.is_empty());

        let by_tactic = list_techniques(&pool, Some("lateral")).await.unwrap();
        assert_eq!(by_tactic[9].techniques.len(), 1);
    }

    #[tokio::test]
    async fn blank_filter_returns_everything() {
        let pool = setup_test_db().await;
        insert(&pool, "T1059", "execution", "Command and Scripting Interpreter").await;

        let groups = list_techniques(&pool, Some("  ")).await.unwrap();
        let total: usize = groups.iter().map(|g| g.techniques.len()).sum();
        assert_eq!(total, 1);
    }
}
