//! # Expression Test Generator
//!
//! Synthesizes C++ test cases checking that Stan Math functions handle
//! Eigen expression arguments correctly. For every function signature and
//! every calling convention (`Prim`, `Rev`, `Fwd`) a generated test:
//!
//! - compiles the call with expression-wrapped matrix arguments
//! - checks the result (and in reverse mode the adjoints) equals the result
//!   of the same call with plain arguments
//! - checks every expression argument is evaluated at most once
//!
//! The tests are split across a configurable number of source files for
//! parallel compilation.
//!
//! ## Modules
//!
//! - [`signature`]: signature parsing and classification
//! - [`argument`]: argument handles, synthesis and expression wrappers
//! - [`sequencer`]: ordered statement list with unique naming
//! - [`orchestrator`]: per (signature, overload) test policy
//! - [`shard`]: partitioning and writing of output files
//! - [`catalog`], [`selection`]: where signatures come from
//! - [`config`]: TOML configuration and exemption lists
//! - [`pipeline`]: a complete run

pub mod argument;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod overload;
pub mod pipeline;
pub mod selection;
pub mod sequencer;
pub mod shard;
pub mod signature;

pub use error::{GeneratorError, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::argument::{ArgumentHandle, ArgumentSynthesizer, CppArgumentSynthesizer};
    pub use crate::catalog::{BuiltinCatalog, FileCatalog, SignatureCatalog};
    pub use crate::config::{Exemptions, GeneratorConfig};
    pub use crate::error::{GeneratorError, Result};
    pub use crate::orchestrator::{GenerationReport, SkipReason, TestBody, TestOrchestrator};
    pub use crate::overload::Overload;
    pub use crate::selection::Selection;
    pub use crate::shard::{FileGenerator, ShardWriter};
    pub use crate::signature::Signature;
}
