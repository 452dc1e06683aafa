//! Error types for the command line front end.

use exprgen_core::error::{ConfigError, GeneratorError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Test generation failed
    #[error("Generation failed: {0}")]
    Generation(#[from] GeneratorError),
}

/// Result alias for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
