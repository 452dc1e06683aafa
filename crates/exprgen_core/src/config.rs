//! Generator configuration management.
//!
//! Handles loading of generator settings from TOML files with environment
//! variable override support. Every field has a default, so an empty file
//! (or no file at all) yields a usable configuration.
//!
//! ```toml
//! output_dir = "test/expressions"
//! arg_size = 1
//!
//! [exemptions]
//! ignored = ["map_rect"]
//! no_fwd_overload = ["hmm_hidden_state_prob"]
//! no_rev_overload = []
//!
//! [[special_arg_values]]
//! function = "acosh"
//! position = 0
//! value = "1.4"
//! ```

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "EXPRGEN_CONFIG";

/// Configuration file picked up from the working directory when
/// [`CONFIG_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "expression_tests.toml";

/// Functions excluded from generation, wholesale or per overload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Exemptions {
    /// Skipped when generating for the whole catalog
    pub ignored: BTreeSet<String>,
    /// No forward-mode instantiation exists
    pub no_fwd_overload: BTreeSet<String>,
    /// No reverse-mode instantiation exists
    pub no_rev_overload: BTreeSet<String>,
}

impl Exemptions {
    /// No exemptions at all.
    pub fn none() -> Self {
        Self {
            ignored: BTreeSet::new(),
            no_fwd_overload: BTreeSet::new(),
            no_rev_overload: BTreeSet::new(),
        }
    }
}

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|name| name.to_string()).collect()
}

impl Default for Exemptions {
    fn default() -> Self {
        Self {
            ignored: names(&[
                "algebra_solver",
                "get_lp",
                "integrate_1d",
                "integrate_ode_rk45",
                "map_rect",
                "print",
                "reduce_sum",
                "reject",
            ]),
            no_fwd_overload: names(&["hmm_hidden_state_prob", "hmm_latent_rng", "map_rect"]),
            no_rev_overload: names(&["hmm_hidden_state_prob", "hmm_latent_rng"]),
        }
    }
}

/// Literal value used for one argument position of one function instead
/// of the synthesizer's default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SpecialArgValue {
    /// Function name
    pub function: String,
    /// Zero-based argument position
    pub position: usize,
    /// C++ literal
    pub value: String,
}

impl SpecialArgValue {
    fn new(function: &str, position: usize, value: &str) -> Self {
        Self {
            function: function.to_string(),
            position,
            value: value.to_string(),
        }
    }
}

fn default_special_arg_values() -> Vec<SpecialArgValue> {
    vec![
        SpecialArgValue::new("acosh", 0, "1.4"),
        SpecialArgValue::new("log1m_exp", 0, "-0.6"),
        SpecialArgValue::new("lkj_corr_cholesky_lpdf", 1, "1.5"),
    ]
}

/// Generator configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the test sources are written to
    pub output_dir: PathBuf,

    /// Line written at the top of every output file
    pub preamble: String,

    /// Output files are named `<file_prefix><index>_test.cpp`
    pub file_prefix: String,

    /// Number of elements (rows/columns) in synthesized containers
    pub arg_size: usize,

    /// Signature list used instead of the builtin catalog
    pub catalog_path: Option<PathBuf>,

    /// Exemption lists handed to the orchestrator
    pub exemptions: Exemptions,

    /// Per-function argument value overrides
    pub special_arg_values: Vec<SpecialArgValue>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("test/expressions"),
            preamble: "#include <test/expressions/expression_test_helpers.hpp>".to_string(),
            file_prefix: "tests".to_string(),
            arg_size: 1,
            catalog_path: None,
            exemptions: Exemptions::default(),
            special_arg_values: default_special_arg_values(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from `$EXPRGEN_CONFIG`, else from [`DEFAULT_CONFIG_FILE`] if it
    /// exists, else fall back to defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::load(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (the environment in
    /// production).
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(output_dir) = lookup("EXPRGEN_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(output_dir);
        }

        if let Some(arg_size) = lookup("EXPRGEN_ARG_SIZE") {
            if let Ok(arg_size) = arg_size.parse() {
                self.arg_size = arg_size;
            }
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.output_dir.as_os_str().is_empty() {
            errors.push("output_dir cannot be empty".to_string());
        }

        if self.arg_size == 0 {
            errors.push("arg_size must be greater than 0".to_string());
        }

        if self.preamble.trim().is_empty() {
            errors.push("preamble cannot be empty".to_string());
        }

        if self.file_prefix.is_empty() || self.file_prefix.contains(['/', '\\']) {
            errors.push(format!(
                "Invalid file_prefix '{}'. Must be a non-empty file name",
                self.file_prefix
            ));
        }

        for special in &self.special_arg_values {
            if special.function.is_empty() || special.value.trim().is_empty() {
                errors.push(format!(
                    "special_arg_values entry at position {} needs a function and a value",
                    special.position
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Discover, apply environment overrides and validate.
    pub fn load_with_env_and_validate() -> Result<Self, ConfigError> {
        let config = Self::discover()?.with_env_override();
        config.validate()?;
        Ok(config)
    }
}

/// Value configured for `function`'s argument at `position`, if any.
pub fn special_value<'a>(
    values: &'a [SpecialArgValue],
    function: &str,
    position: usize,
) -> Option<&'a str> {
    values
        .iter()
        .find(|special| special.function == function && special.position == position)
        .map(|special| special.value.as_str())
}
