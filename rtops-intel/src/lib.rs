//! rtops-intel - Threat-Intelligence Ingestion Pipeline
//!
//! Reconciles a technique/tactic taxonomy arriving from three structurally
//! incompatible sources (graph-style bundle, flat navigator layer,
//! spreadsheet workbook) into one canonical catalog, with enrich-only
//! merge semantics and per-source failure isolation.
//!
//! Data flows one direction: files → parser → normalizer → merger →
//! catalog. The import orchestrator is the only caller of the parsers and
//! owns failure isolation between sources.

pub mod catalog;
pub mod import;
pub mod merge;
pub mod normalize;
pub mod registry;
pub mod sources;

pub use import::{run_import, ImportConfig, ImportOutcome};
