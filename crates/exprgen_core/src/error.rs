//! Error types for expression test generation.
//!
//! This module provides:
//! - `ParseError`: malformed signature text or argument type
//! - `InvalidWrapError`: expression-wrapping an argument that is not matrix-like
//! - `ConfigError`: configuration loading and validation failures
//! - `GeneratorError`: the crate-level error every fallible operation returns
//!
//! Inapplicable (signature, overload) combinations are not errors; the
//! orchestrator records them as skips instead.

use thiserror::Error;

/// Malformed signature text.
///
/// # Examples
/// ```
/// use exprgen_core::error::ParseError;
///
/// let err = ParseError::Signature("vector foo".to_string());
/// assert_eq!(
///     err.to_string(),
///     "malformed signature 'vector foo': expected 'returnType name(argType, ...)'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not match `returnType name(argType, ...)`.
    #[error("malformed signature '{0}': expected 'returnType name(argType, ...)'")]
    Signature(String),

    /// An argument or return type is not a known type.
    #[error("unknown type '{0}'")]
    UnknownType(String),
}

/// Attempt to expression-wrap an argument that is not matrix-like.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("argument '{name}' is not matrix-like and cannot be wrapped in an expression")]
pub struct InvalidWrapError {
    /// Name of the offending argument.
    pub name: String,
}

/// Configuration error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error in the config file
    #[error("Parse error: {0}")]
    Parse(String),

    /// One or more invalid settings
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Malformed signature
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Expression wrapper requested for a non matrix-like argument
    #[error(transparent)]
    InvalidWrap(#[from] InvalidWrapError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shard count outside `1..=MAX_SHARD_COUNT`
    #[error(
        "shard count {0} is out of range, expected 1 to {max}",
        max = crate::shard::MAX_SHARD_COUNT
    )]
    InvalidShardCount(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;
