//! Database initialization
//!
//! Creates the catalog database on first run and opens it on subsequent
//! runs. Schema creation is idempotent, so initialization is safe to call
//! at every startup.

use crate::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    // Schema creation (idempotent - safe to call multiple times)
    create_techniques_table(&pool).await?;
    create_settings_table(&pool).await?;

    init_default_settings(&pool).await?;
    seed_default_techniques(&pool).await?;

    Ok(pool)
}

/// Create the techniques table
///
/// The canonical threat-behavior catalog. `UNIQUE(technique_id, tactic)`
/// makes the insert path idempotent: a technique may appear under several
/// tactics, but never twice under the same one.
pub async fn create_techniques_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS techniques (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            technique_id TEXT NOT NULL,
            tactic TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            refs TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            UNIQUE(technique_id, tactic)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_techniques_tactic ON techniques(tactic)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_techniques_technique_id ON techniques(technique_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the settings table
///
/// Stores application configuration key-value pairs.
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Initialize default settings
async fn init_default_settings(pool: &SqlitePool) -> Result<()> {
    ensure_setting(pool, "intel_loaded", "0").await?;
    Ok(())
}

/// Ensure a setting exists with the specified default value
///
/// If the setting doesn't exist, it will be created with the default.
async fn ensure_setting(pool: &SqlitePool, key: &str, default_value: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(default_value)
        .execute(pool)
        .await?;

    Ok(())
}

/// Well-known techniques seeded into an empty catalog so downstream screens
/// are never blank before the first import.
const DEFAULT_TECHNIQUES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "T1059",
        "execution",
        "Command and Scripting Interpreter",
        "Execute commands and scripts via shells/interpreters.",
        "https://attack.mitre.org/techniques/T1059/",
    ),
    (
        "T1021",
        "lateral-movement",
        "Remote Services",
        "RDP/SMB/SSH for lateral movement.",
        "https://attack.mitre.org/techniques/T1021/",
    ),
    (
        "T1003",
        "credential-access",
        "OS Credential Dumping",
        "Dump creds from OS components.",
        "https://attack.mitre.org/techniques/T1003/",
    ),
];

/// Seed fallback techniques when the catalog is empty
async fn seed_default_techniques(pool: &SqlitePool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM techniques")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let now = Utc::now().to_rfc3339();
    for &(technique_id, tactic, name, description, refs) in DEFAULT_TECHNIQUES {
        sqlx::query(
            r#"
            INSERT INTO techniques (technique_id, tactic, name, description, refs, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(technique_id)
        .bind(tactic)
        .bind(name)
        .bind(description)
        .bind(refs)
        .bind(&now)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} fallback techniques", DEFAULT_TECHNIQUES.len());
    Ok(())
}
