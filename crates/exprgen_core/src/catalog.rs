//! Sources of known signatures.
//!
//! A catalog yields signature text; parsing is left to the caller so a
//! malformed catalog line fails the run at the point it is used.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;

/// Supplies the full set of known signatures.
pub trait SignatureCatalog {
    /// Every known signature, as text.
    fn signatures(&self) -> Result<BTreeSet<String>>;
}

/// Non-empty, non-comment lines of a signature or function listing.
pub fn parse_listing(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Catalog compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

const BUILTIN_SIGNATURES: &str = include_str!("../data/signatures.txt");

impl SignatureCatalog for BuiltinCatalog {
    fn signatures(&self) -> Result<BTreeSet<String>> {
        Ok(parse_listing(BUILTIN_SIGNATURES).into_iter().collect())
    }
}

/// Catalog read from a listing file.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Catalog backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Listing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignatureCatalog for FileCatalog {
    fn signatures(&self) -> Result<BTreeSet<String>> {
        debug!("Reading signature catalog from {}", self.path.display());
        let content = std::fs::read_to_string(&self.path)?;
        Ok(parse_listing(&content).into_iter().collect())
    }
}

/// Catalog selected by `config.catalog_path`, the builtin one otherwise.
pub fn from_config(config: &GeneratorConfig) -> Box<dyn SignatureCatalog> {
    match &config.catalog_path {
        Some(path) => Box::new(FileCatalog::new(path.clone())),
        None => Box::new(BuiltinCatalog),
    }
}
