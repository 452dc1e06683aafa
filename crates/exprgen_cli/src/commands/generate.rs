//! Generate command implementation
//!
//! Resolves the function selection, generates the expression tests and
//! writes them into the configured output directory.

use exprgen_core::config::GeneratorConfig;
use exprgen_core::pipeline;
use tracing::info;

use crate::Result;

/// Run the generate command
pub fn run(functions: &[String], shard_count: usize) -> Result<()> {
    info!("Starting expression test generation...");
    if functions.is_empty() {
        info!("  Functions: all known signatures");
    } else {
        info!("  Functions: {}", functions.join(", "));
    }
    info!("  Output files: {}", shard_count);

    let config = GeneratorConfig::load_with_env_and_validate()?;
    info!("  Output directory: {}", config.output_dir.display());

    let summary = pipeline::run(&config, functions, shard_count)?;
    info!(
        "Generation complete: {} tests in {} files ({} skipped)",
        summary.tests,
        summary.files.len(),
        summary.skipped.len()
    );
    Ok(())
}
