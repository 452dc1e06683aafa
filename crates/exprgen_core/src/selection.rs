//! Resolution of the user's function selection into concrete signatures.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::Path;

use tracing::{debug, warn};

use crate::catalog::{parse_listing, SignatureCatalog};
use crate::error::Result;
use crate::signature::Signature;

/// Signatures to generate tests for.
///
/// Signatures are kept sorted by their canonical text, which fixes the
/// per-signature index used in test names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    signatures: Vec<Signature>,
    default_checks: bool,
}

impl Selection {
    /// Builds a selection from already parsed signatures.
    pub fn from_signatures(
        signatures: impl IntoIterator<Item = Signature>,
        default_checks: bool,
    ) -> Self {
        let by_text: BTreeMap<String, Signature> = signatures
            .into_iter()
            .map(|signature| (signature.to_string(), signature))
            .collect();
        Self {
            signatures: by_text.into_values().collect(),
            default_checks,
        }
    }

    /// Resolves `entries` against `catalog`.
    ///
    /// Each entry is a signature (contains `(`), an existing file whose
    /// lines are further entries (list files may name other list files), or
    /// a function name selecting every catalog signature of that name.
    /// No entries at all selects the whole catalog with default checks.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files and on signatures that do not parse.
    pub fn resolve<C>(entries: &[String], catalog: &C) -> Result<Self>
    where
        C: SignatureCatalog + ?Sized,
    {
        let mut pending: VecDeque<String> = entries.iter().map(|e| e.trim().to_string()).collect();
        let mut read_files = BTreeSet::new();
        let mut functions = BTreeSet::new();
        let mut signatures = Vec::new();

        while let Some(entry) = pending.pop_front() {
            if entry.is_empty() {
                continue;
            }
            if entry.contains('(') {
                signatures.push(Signature::parse(&entry)?);
                continue;
            }
            let path = Path::new(&entry);
            if path.is_file() {
                // each file is expanded once, so cyclic lists terminate
                if read_files.insert(std::fs::canonicalize(path)?) {
                    debug!("Reading function list from {}", entry);
                    let content = std::fs::read_to_string(path)?;
                    pending.extend(parse_listing(&content));
                }
                continue;
            }
            functions.insert(entry);
        }

        if functions.is_empty() && signatures.is_empty() {
            let all = catalog
                .signatures()?
                .iter()
                .map(|text| Signature::parse(text))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            return Ok(Self::from_signatures(all, true));
        }

        if !functions.is_empty() {
            let known = catalog
                .signatures()?
                .iter()
                .map(|text| Signature::parse(text))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for function in &functions {
                let before = signatures.len();
                signatures.extend(
                    known
                        .iter()
                        .filter(|signature| signature.name() == function)
                        .cloned(),
                );
                if signatures.len() == before {
                    warn!("No known signatures for function '{}'", function);
                }
            }
        }

        Ok(Self::from_signatures(signatures, false))
    }

    /// Selected signatures in generation order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// The whole catalog was selected; the ignored list applies.
    pub fn default_checks(&self) -> bool {
        self.default_checks
    }
}
