//! Catalogue adapters: read and parse role specification files.
//!
//! This crate is allowed to do filesystem IO; the domain crate never is.

#![forbid(unsafe_code)]

mod parse;

use anyhow::Context;
use camino::Utf8Path;
use rolegate_domain::model::RoleCatalog;
use thiserror::Error;

pub use parse::{parse_catalog, CapabilityRecord, EffectRecord, RoleCatalogV1, RoleRecord};

/// Loader errors. Each names the role it refused, so callers can report
/// precisely which entry in the specification is broken.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("role '{role}' is malformed: {reason}")]
    MalformedRole { role: String, reason: String },

    #[error("role '{role}' is declared more than once")]
    DuplicateRole { role: String },

    #[error("role specification is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read and parse a role specification file into the domain catalogue.
pub fn load_catalog(path: &Utf8Path) -> anyhow::Result<RoleCatalog> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let catalog = parse_catalog(&text).with_context(|| format!("parse {path}"))?;
    Ok(catalog)
}
