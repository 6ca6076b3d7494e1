//! Integration tests for catalog merge semantics
//!
//! Exercises the insert-if-absent / enrich-if-incomplete rules end to end
//! against an in-memory catalog, including the layer-then-workbook
//! enrichment scenario.

use calamine::{Data, Range};
use rtops_common::db::init::{create_settings_table, create_techniques_table};
use rtops_common::models::TechniqueRecord;
use rtops_intel::merge::apply_batch;
use rtops_intel::normalize::{normalize_all, TechniqueUpsert};
use rtops_intel::sources::{layer, workbook};
use sqlx::SqlitePool;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    create_techniques_table(&pool).await.unwrap();
    create_settings_table(&pool).await.unwrap();
    pool
}

async fn fetch_all(pool: &SqlitePool) -> Vec<TechniqueRecord> {
    sqlx::query_as(
        "SELECT technique_id, tactic, name, description, refs, created_at
         FROM techniques ORDER BY technique_id, tactic",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

fn upsert(technique_id: &str, tactic: &str, name: &str, description: &str) -> TechniqueUpsert {
    TechniqueUpsert {
        technique_id: technique_id.to_string(),
        tactic: tactic.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn replaying_a_batch_is_idempotent() {
    let pool = setup_test_db().await;
    let batch = vec![
        upsert("T1059", "execution", "Command and Scripting Interpreter", "Shells."),
        upsert("T1059.001", "execution", "PowerShell", "PowerShell abuse."),
    ];

    let first = apply_batch(&pool, &batch).await.unwrap();
    assert_eq!(first, 2);

    let after_first = fetch_all(&pool).await;

    let second = apply_batch(&pool, &batch).await.unwrap();
    assert_eq!(second, 0, "second pass must report no new changes");

    let after_second = fetch_all(&pool).await;
    assert_eq!(after_first.len(), after_second.len());
    for (a, b) in after_first.iter().zip(&after_second) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.description, b.description);
        assert_eq!(a.created_at, b.created_at, "created_at is stamped once");
    }
}

#[tokio::test]
async fn same_technique_under_two_tactics_is_two_records() {
    let pool = setup_test_db().await;
    let batch = vec![
        upsert("T1078", "persistence", "Valid Accounts", ""),
        upsert("T1078", "initial-access", "Valid Accounts", ""),
    ];

    assert_eq!(apply_batch(&pool, &batch).await.unwrap(), 2);
    assert_eq!(fetch_all(&pool).await.len(), 2);
}

#[tokio::test]
async fn layer_import_then_workbook_enrichment() {
    let pool = setup_test_db().await;

    // Flat list establishes the pair with a placeholder name
    let doc: layer::LayerDoc =
        serde_json::from_str(r#"{"techniques": [{"techniqueID": "T1059", "tactic": "execution"}]}"#)
            .unwrap();
    let batch = normalize_all(&layer::candidates(&doc));
    assert_eq!(apply_batch(&pool, &batch).await.unwrap(), 1);

    let records = fetch_all(&pool).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].technique_id, "T1059");
    assert_eq!(records[0].tactic, "execution");
    assert_eq!(records[0].name, "T1059");
    assert!(records[0].description.is_empty());

    // Workbook pass enriches the same pair
    let mut range = Range::new((0, 0), (1, 3));
    for (c, header) in ["Technique ID", "Technique Name", "Description", "Tactics"]
        .iter()
        .enumerate()
    {
        range.set_value((0, c as u32), Data::String(header.to_string()));
    }
    for (c, cell) in [
        "T1059",
        "Command and Scripting Interpreter",
        "desc...",
        "Execution",
    ]
    .iter()
    .enumerate()
    {
        range.set_value((1, c as u32), Data::String(cell.to_string()));
    }

    let batch = normalize_all(&workbook::parse_sheet(&range));
    let changed = apply_batch(&pool, &batch).await.unwrap();
    assert_eq!(changed, 1);

    let records = fetch_all(&pool).await;
    assert_eq!(records.len(), 1, "no duplicate record");
    assert_eq!(records[0].name, "Command and Scripting Interpreter");
    assert_eq!(records[0].description, "desc...");
}

#[tokio::test]
async fn genuine_name_survives_later_enrichment() {
    let pool = setup_test_db().await;

    apply_batch(
        &pool,
        &[upsert("T1021", "lateral-movement", "Remote Services", "")],
    )
    .await
    .unwrap();

    let changed = apply_batch(
        &pool,
        &[upsert("T1021", "lateral-movement", "A Different Name", "")],
    )
    .await
    .unwrap();
    assert_eq!(changed, 0);

    let records = fetch_all(&pool).await;
    assert_eq!(records[0].name, "Remote Services");
}

#[tokio::test]
async fn first_non_empty_name_wins_within_a_batch() {
    let pool = setup_test_db().await;

    // Placeholder row from an earlier flat-list pass
    apply_batch(&pool, &[upsert("T1003", "credential-access", "T1003", "")])
        .await
        .unwrap();

    let changed = apply_batch(
        &pool,
        &[
            upsert("T1003", "credential-access", "OS Credential Dumping", ""),
            upsert("T1003", "credential-access", "Credential Dumping (old)", ""),
        ],
    )
    .await
    .unwrap();

    assert_eq!(changed, 1);
    let records = fetch_all(&pool).await;
    assert_eq!(records[0].name, "OS Credential Dumping");
}

#[tokio::test]
async fn enrichment_never_empties_a_field() {
    let pool = setup_test_db().await;

    apply_batch(
        &pool,
        &[upsert("T1566", "initial-access", "Phishing", "Messages.")],
    )
    .await
    .unwrap();

    let changed = apply_batch(&pool, &[upsert("T1566", "initial-access", "", "")])
        .await
        .unwrap();
    assert_eq!(changed, 0);

    let records = fetch_all(&pool).await;
    assert_eq!(records[0].name, "Phishing");
    assert_eq!(records[0].description, "Messages.");
}
