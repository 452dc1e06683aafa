//! # Sharded Output
//!
//! Splits the generated tests into `shard_count` contiguous, order
//! preserving groups and writes one source file per group, each starting
//! with the configured preamble.
//!
//! Group `i` holds tests `i * len / n .. (i + 1) * len / n`, so group sizes
//! differ by at most one and every test lands in exactly one group.

use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::orchestrator::TestBody;

/// Largest accepted number of output files.
pub const MAX_SHARD_COUNT: usize = 1024;

/// Rejects shard counts outside `1..=MAX_SHARD_COUNT`.
pub fn check_shard_count(shard_count: usize) -> Result<()> {
    if (1..=MAX_SHARD_COUNT).contains(&shard_count) {
        Ok(())
    } else {
        Err(GeneratorError::InvalidShardCount(shard_count))
    }
}

/// Index ranges of each shard.
///
/// # Examples
/// ```
/// use exprgen_core::shard::shard_bounds;
///
/// assert_eq!(shard_bounds(10, 3).unwrap(), vec![0..3, 3..6, 6..10]);
/// assert!(shard_bounds(10, 0).is_err());
/// ```
pub fn shard_bounds(len: usize, shard_count: usize) -> Result<Vec<Range<usize>>> {
    check_shard_count(shard_count)?;
    Ok((0..shard_count)
        .map(|i| i * len / shard_count..(i + 1) * len / shard_count)
        .collect())
}

/// Splits `items` into `shard_count` contiguous slices.
pub fn partition<T>(items: &[T], shard_count: usize) -> Result<Vec<&[T]>> {
    Ok(shard_bounds(items.len(), shard_count)?
        .into_iter()
        .map(|range| &items[range])
        .collect())
}

/// Trait for generated source files
pub trait FileGenerator {
    /// Generate file content as string
    fn generate(&self) -> String;

    /// Write to file
    fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.generate())
    }
}

/// One output file: the preamble followed by its tests.
#[derive(Debug, Clone, Copy)]
pub struct Shard<'a> {
    preamble: &'a str,
    bodies: &'a [TestBody],
}

impl<'a> Shard<'a> {
    /// Shard holding `bodies`.
    pub fn new(preamble: &'a str, bodies: &'a [TestBody]) -> Self {
        Self { preamble, bodies }
    }

    /// Tests in this shard.
    pub fn bodies(&self) -> &'a [TestBody] {
        self.bodies
    }
}

impl FileGenerator for Shard<'_> {
    fn generate(&self) -> String {
        let mut source = format!("{}\n\n", self.preamble);
        for body in self.bodies {
            source.push_str(&body.render());
        }
        source
    }
}

/// Writes shards into the output directory.
#[derive(Debug, Clone)]
pub struct ShardWriter {
    output_dir: PathBuf,
    preamble: String,
    file_prefix: String,
}

impl ShardWriter {
    /// Writer with explicit settings.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        preamble: impl Into<String>,
        file_prefix: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            preamble: preamble.into(),
            file_prefix: file_prefix.into(),
        }
    }

    /// Writer using the configured directory, preamble and file prefix.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            config.output_dir.clone(),
            config.preamble.clone(),
            config.file_prefix.clone(),
        )
    }

    /// Path of shard `index`.
    pub fn file_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("{}{}_test.cpp", self.file_prefix, index))
    }

    /// The shards `bodies` are split into.
    pub fn shards<'a>(&'a self, bodies: &'a [TestBody], shard_count: usize) -> Result<Vec<Shard<'a>>> {
        Ok(partition(bodies, shard_count)?
            .into_iter()
            .map(|group| Shard::new(&self.preamble, group))
            .collect())
    }

    /// Writes every shard, including empty ones, and returns the written
    /// paths in shard order.
    pub fn write(&self, bodies: &[TestBody], shard_count: usize) -> Result<Vec<PathBuf>> {
        let shards = self.shards(bodies, shard_count)?;
        std::fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::with_capacity(shards.len());
        for (index, shard) in shards.iter().enumerate() {
            let path = self.file_path(index);
            shard.write_to_file(&path)?;
            info!("Wrote {} tests to {}", shard.bodies().len(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}
