//! Command line integration tests
//!
//! Runs the built binary the way a build script would.

use std::process::Command;

fn generator() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_generate-expression-tests"));
    command
        .env_remove("EXPRGEN_CONFIG")
        .env_remove("EXPRGEN_ARG_SIZE")
        .env_remove("RUST_LOG");
    command
}

/// Test an unknown flag is a usage error with status 2
#[test]
fn test_invalid_flag_exits_with_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = generator()
        .current_dir(dir.path())
        .arg("--bogus")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--functions"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

/// Test a selected run writes the requested number of files
#[test]
fn test_selected_functions_split_into_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let status = generator()
        .current_dir(dir.path())
        .env("EXPRGEN_OUTPUT_DIR", &out)
        .args(["--functions", "softmax", "vector exp(vector)", "-j", "2"])
        .status()
        .unwrap();
    assert!(status.success());

    let first = std::fs::read_to_string(out.join("tests0_test.cpp")).unwrap();
    let second = std::fs::read_to_string(out.join("tests1_test.cpp")).unwrap();
    assert!(!out.join("tests2_test.cpp").exists());

    // 2 signatures x 3 overloads, split 3/3
    for source in [&first, &second] {
        assert!(source.starts_with("#include <test/expressions/expression_test_helpers.hpp>\n\n"));
        assert_eq!(source.matches("\nTEST(").count(), 3);
    }
    let all = format!("{first}{second}");
    assert!(all.contains("TEST(ExpressionTestPrim, exp_0)"));
    assert!(all.contains("TEST(ExpressionTestRev, softmax_1)"));
}

/// Test a shard count above the cap is a usage error
#[test]
fn test_oversized_shard_count_exits_with_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = generator()
        .current_dir(dir.path())
        .args(["-j", "1000000"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

/// Test a malformed signature fails loudly without writing
#[test]
fn test_malformed_signature_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated");
    let output = generator()
        .current_dir(dir.path())
        .env("EXPRGEN_OUTPUT_DIR", &out)
        .args(["--functions", "vector broken(vector"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "stderr: {stderr}");
    assert!(stderr.contains("malformed signature 'vector broken(vector'"), "stderr: {stderr}");
}

/// Test the run summary is logged by default
#[test]
fn test_summary_logged_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let output = generator()
        .current_dir(dir.path())
        .env("EXPRGEN_OUTPUT_DIR", dir.path().join("generated"))
        .args(["--functions", "softmax"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Generation complete: 3 tests in 1 files"), "stderr: {stderr}");
}

/// Test settings are read from the config file in the working directory
#[test]
fn test_config_file_discovered() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("expression_tests.toml"),
        "output_dir = \"from_config\"\nfile_prefix = \"expr\"\n",
    )
    .unwrap();

    let status = generator()
        .current_dir(dir.path())
        .env_remove("EXPRGEN_OUTPUT_DIR")
        .args(["--functions", "softmax"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("from_config").join("expr0_test.cpp").exists());
}
