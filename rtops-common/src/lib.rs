//! rtops-common - shared infrastructure for RTOps
//!
//! Error type, root folder resolution, database initialization, and the
//! canonical data models used by the threat-intel catalog.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
