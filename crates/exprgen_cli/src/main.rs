//! Expression Test Generator CLI
//!
//! Generates C++ tests checking that math library functions accept
//! expression arguments, give the same values and derivatives as with
//! plain arguments, and evaluate each expression at most once.
//!
//! # Usage
//!
//! - `generate-expression-tests` - tests for every known signature
//! - `generate-expression-tests --functions softmax "real sum(vector)"` -
//!   tests for selected functions or signatures (or files listing them)
//! - `generate-expression-tests -j 4` - split the tests into 4 files
//!
//! Settings beyond these flags come from `expression_tests.toml` (or the
//! file named by `EXPRGEN_CONFIG`); logging is controlled by `RUST_LOG`.

use std::process::ExitCode;

use clap::builder::RangedU64ValueParser;
use clap::{CommandFactory, Parser};
use exprgen_core::shard::MAX_SHARD_COUNT;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod error;

use error::Result;

/// Generate expression tests
#[derive(Parser, Debug)]
#[command(name = "generate-expression-tests")]
#[command(author, about, long_about = None)]
struct Cli {
    /// Signatures and/or function names to generate tests for, or files
    /// listing them. Default: all known signatures
    #[arg(long, num_args = 1.., value_name = "FUNCTION")]
    functions: Vec<String>,

    /// Number of files to split the tests into
    #[arg(
        short = 'j',
        default_value_t = 1,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_SHARD_COUNT as u64)
    )]
    j: usize,
}

/// Log filter used when `RUST_LOG` is unset; targets are crate names.
const DEFAULT_LOG_FILTER: &str = "exprgen_core=info,generate_expression_tests=info";

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            let _ = Cli::command().print_help();
            return ExitCode::from(2);
        }
    };

    match commands::generate::run(&cli.functions, cli.j) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["generate-expression-tests"]).unwrap();
        assert!(cli.functions.is_empty());
        assert_eq!(cli.j, 1);
    }

    #[test]
    fn test_functions_take_many_values() {
        let cli = Cli::try_parse_from([
            "generate-expression-tests",
            "--functions",
            "softmax",
            "real sum(vector)",
            "-j",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.functions, vec!["softmax", "real sum(vector)"]);
        assert_eq!(cli.j, 4);
    }

    #[test]
    fn test_rejects_zero_shards() {
        assert!(Cli::try_parse_from(["generate-expression-tests", "-j", "0"]).is_err());
    }

    #[test]
    fn test_shard_count_capped() {
        let max = MAX_SHARD_COUNT.to_string();
        let cli = Cli::try_parse_from(["generate-expression-tests", "-j", max.as_str()]).unwrap();
        assert_eq!(cli.j, MAX_SHARD_COUNT);

        let over = (MAX_SHARD_COUNT + 1).to_string();
        assert!(Cli::try_parse_from(["generate-expression-tests", "-j", over.as_str()]).is_err());
    }

    #[test]
    fn test_default_log_filter_names_both_crates() {
        let crate_name = module_path!().split("::").next().unwrap();
        assert!(DEFAULT_LOG_FILTER.contains(&format!("{crate_name}=info")));
        assert!(DEFAULT_LOG_FILTER.contains("exprgen_core="));
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["generate-expression-tests", "--output", "x"]).is_err());
    }

    #[test]
    fn test_command_is_consistent() {
        Cli::command().debug_assert();
    }
}
