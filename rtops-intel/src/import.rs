//! Import orchestrator
//!
//! Attempts every candidate source file in a fixed priority order:
//! bundle/layer JSON sources first (they establish identifiers and tactic
//! membership), workbook sources second (they enrich names and
//! descriptions, and may introduce new records). Failure is isolated per
//! source: a missing file is skipped silently, an unparseable one is
//! logged and skipped. Only a catalog-write failure aborts the pass, and
//! already-committed batches are left in place.

use crate::merge;
use crate::normalize;
use crate::sources::{self, ParsedSource};
use rtops_common::db::settings;
use rtops_common::Result;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default source file names, mirroring the taxonomy authority's exports
const BUNDLE_FILE: &str = "enterprise-attack.json";
const WORKBOOK_FILE: &str = "enterprise-attack-v17.1.xlsx";

/// Candidate source paths for one import pass
///
/// All candidates are best-effort locations; every existing one is
/// attempted, in order.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// Bundle or navigator-layer JSON documents
    pub json_candidates: Vec<PathBuf>,
    /// Spreadsheet workbook documents
    pub workbook_candidates: Vec<PathBuf>,
}

impl ImportConfig {
    /// Default candidate locations: the root folder, then the shared drop
    /// folder
    pub fn default_locations(root: &Path) -> Self {
        Self {
            json_candidates: vec![
                root.join(BUNDLE_FILE),
                PathBuf::from("/mnt/data").join(BUNDLE_FILE),
            ],
            workbook_candidates: vec![
                root.join(WORKBOOK_FILE),
                PathBuf::from("/mnt/data").join(WORKBOOK_FILE),
            ],
        }
    }
}

/// Aggregate outcome of one import pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Total records inserted or enriched across all sources
    pub changed: u64,
    /// Did this pass flip the persisted populated flag?
    pub flag_transitioned: bool,
}

impl ImportOutcome {
    /// Human-readable one-line summary of the pass
    pub fn summary(&self) -> String {
        if self.changed > 0 {
            format!("Imported/updated {} tactic-technique rows.", self.changed)
        } else {
            "No threat-intel data imported (files missing or unrecognized).".to_string()
        }
    }
}

/// Run one import pass over all configured candidate sources
///
/// The populated flag transitions to true only when the total change count
/// across all sources is greater than zero; once set it is never cleared.
pub async fn run_import(pool: &SqlitePool, config: &ImportConfig) -> Result<ImportOutcome> {
    let mut changed: u64 = 0;

    for path in &config.json_candidates {
        changed += apply_source(pool, path, sources::load_json_source).await?;
    }
    for path in &config.workbook_candidates {
        changed += apply_source(pool, path, sources::load_workbook_source).await?;
    }

    let was_loaded = settings::intel_loaded(pool).await?;
    let flag_transitioned = changed > 0 && !was_loaded;
    if flag_transitioned {
        settings::set_intel_loaded(pool).await?;
        info!("Threat-intel catalog marked populated");
    }

    let outcome = ImportOutcome {
        changed,
        flag_transitioned,
    };
    info!("{}", outcome.summary());
    Ok(outcome)
}

/// Attempt one candidate source file
///
/// Missing files and parse failures contribute zero changes and never
/// abort the pass; database errors propagate.
async fn apply_source(
    pool: &SqlitePool,
    path: &Path,
    loader: fn(&Path) -> Result<ParsedSource>,
) -> Result<u64> {
    if !path.exists() {
        debug!("Source not present, skipping: {}", path.display());
        return Ok(0);
    }

    let source = match loader(path) {
        Ok(source) => source,
        Err(e) => {
            warn!("Skipping unreadable source {}: {}", path.display(), e);
            return Ok(0);
        }
    };

    let raw = match &source {
        ParsedSource::Bundle(doc) => sources::bundle::candidates(doc),
        ParsedSource::Layer(doc) => sources::layer::candidates(doc),
        ParsedSource::Workbook(doc) => sources::workbook::candidates(doc),
    };
    let batch = normalize::normalize_all(&raw);
    let changed = merge::apply_batch(pool, &batch).await?;

    info!(
        source = %path.display(),
        candidates = raw.len(),
        accepted = batch.len(),
        changed,
        "Applied threat-intel source"
    );
    Ok(changed)
}
