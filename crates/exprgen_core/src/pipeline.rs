//! End-to-end generation run: selection, generation and sharded output.

use std::path::PathBuf;

use tracing::info;

use crate::catalog;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::orchestrator::{SkipRecord, TestOrchestrator};
use crate::selection::Selection;
use crate::shard::{self, ShardWriter};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Output files in shard order
    pub files: Vec<PathBuf>,
    /// Number of tests written
    pub tests: usize,
    /// Combinations that produced no test
    pub skipped: Vec<SkipRecord>,
}

/// Generates tests for `functions` (names, signatures or list files; empty
/// for the whole catalog) and writes them into `shard_count` files.
///
/// # Errors
///
/// Fails before writing anything if `shard_count` is outside
/// `1..=`[`shard::MAX_SHARD_COUNT`], a selected signature does not parse
/// or a list file cannot be read.
pub fn run(config: &GeneratorConfig, functions: &[String], shard_count: usize) -> Result<RunSummary> {
    shard::check_shard_count(shard_count)?;

    let catalog = catalog::from_config(config);
    let selection = Selection::resolve(functions, catalog.as_ref())?;
    info!(
        "Selected {} signatures{}",
        selection.signatures().len(),
        if selection.default_checks() {
            " (whole catalog)"
        } else {
            ""
        }
    );

    let report = TestOrchestrator::from_config(config).generate(&selection)?;
    let files = ShardWriter::from_config(config).write(&report.bodies, shard_count)?;

    Ok(RunSummary {
        files,
        tests: report.bodies.len(),
        skipped: report.skipped,
    })
}
