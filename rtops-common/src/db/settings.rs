//! Settings database operations
//!
//! Provides get/set accessors for the settings table following the
//! key-value pattern, plus typed accessors for the intel-loaded flag.

use crate::{Error, Result};
use sqlx::SqlitePool;

/// Has the catalog ever been successfully populated by an import pass?
///
/// Once set, this flag is never cleared by a later failed or zero-result
/// import.
pub async fn intel_loaded(pool: &SqlitePool) -> Result<bool> {
    Ok(get_setting::<String>(pool, "intel_loaded")
        .await?
        .map(|v| v == "1")
        .unwrap_or(false))
}

/// Mark the catalog as populated
pub async fn set_intel_loaded(pool: &SqlitePool) -> Result<()> {
    set_setting(pool, "intel_loaded", "1").await
}

/// Generic setting getter
pub async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter
pub async fn set_setting<T>(pool: &SqlitePool, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await
    .map_err(Error::Database)?;

    Ok(())
}
