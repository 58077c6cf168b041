//! CLI end-to-end tests
//!
//! Runs the `abicat` binary and checks:
//! - help text and examples
//! - symbol, layout and selftest output (text and JSON)
//! - header generation with and without abicat.toml
//! - shell completions and error handling

use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn abicat_cmd() -> Command {
    let mut cmd = Command::cargo_bin("abicat").unwrap();
    cmd.env_remove("ABICAT_JSON")
        .env_remove("ABICAT_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn json_stdout(args: &[&str]) -> serde_json::Value {
    let output = abicat_cmd().args(args).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ══════════════════════════════════════════════════════════════════════════════
// HELP
// ══════════════════════════════════════════════════════════════════════════════

mod help_messages {
    use super::*;

    #[test]
    fn test_main_help_lists_commands() {
        abicat_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("symbols"))
            .stdout(predicate::str::contains("header"))
            .stdout(predicate::str::contains("layout"))
            .stdout(predicate::str::contains("selftest"))
            .stdout(predicate::str::contains("completions"));
    }

    #[test]
    fn test_main_help_shows_environment_variables() {
        abicat_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("ENVIRONMENT VARIABLES"))
            .stdout(predicate::str::contains("ABICAT_JSON"))
            .stdout(predicate::str::contains("ABICAT_LOG"));
    }

    #[test]
    fn test_unknown_command_fails() {
        abicat_cmd()
            .arg("frobnicate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unrecognized subcommand"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SYMBOLS & LAYOUT
// ══════════════════════════════════════════════════════════════════════════════

mod inspection {
    use super::*;

    #[test]
    fn test_symbols_table() {
        abicat_cmd()
            .arg("symbols")
            .assert()
            .success()
            .stdout(predicate::str::contains("int *multiply(int a, int b);"))
            .stdout(predicate::str::contains("caller frees with free_int"))
            .stdout(predicate::str::contains("extern uint64_t GLOBALINT;"));
    }

    #[test]
    fn test_symbols_json() {
        let value = json_stdout(&["symbols", "--json"]);
        let functions = value["functions"].as_array().unwrap();
        assert!(functions.iter().any(|f| f["name"] == "ptr_ptr"));
        assert_eq!(value["data"][0]["name"], "GLOBALINT");
    }

    #[test]
    fn test_json_from_environment() {
        let output = abicat_cmd()
            .arg("layout")
            .env("ABICAT_JSON", "1")
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(value.is_array());
    }

    #[rstest]
    #[case("1")]
    #[case("true")]
    #[case("json")]
    fn test_json_environment_values(#[case] value: &str) {
        let output = abicat_cmd()
            .arg("symbols")
            .env("ABICAT_JSON", value)
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(value["functions"].is_array());
    }

    #[rstest]
    #[case("0")]
    #[case("false")]
    fn test_json_environment_disabled_gives_table(#[case] value: &str) {
        abicat_cmd()
            .arg("layout")
            .env("ABICAT_JSON", value)
            .assert()
            .success()
            .stdout(predicate::str::contains("StructWithArray  size 40"));
    }

    #[test]
    fn test_layout_text() {
        abicat_cmd()
            .arg("layout")
            .assert()
            .success()
            .stdout(predicate::str::contains("StructWithArray  size 40"))
            .stdout(predicate::str::contains("StructWithStruct  size 80"));
    }

    #[test]
    fn test_layout_json_offsets() {
        let value = json_stdout(&["layout", "--json"]);
        let swa = value
            .as_array()
            .unwrap()
            .iter()
            .find(|l| l["name"] == "StructWithArray")
            .unwrap()
            .clone();
        assert_eq!(swa["fields"][1]["name"], "array2");
        assert_eq!(swa["fields"][1]["offset"], 16);
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// HEADER
// ══════════════════════════════════════════════════════════════════════════════

mod header {
    use super::*;

    #[test]
    fn test_header_to_stdout_uses_defaults() {
        let dir = TempDir::new().unwrap();
        abicat_cmd()
            .current_dir(dir.path())
            .arg("header")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("/* Generated by abicat */"))
            .stdout(predicate::str::contains("#ifndef ABICAT_H"))
            .stdout(predicate::str::contains("void free_ptr_ptr(int **ptr);"));
    }

    #[test]
    fn test_header_reads_working_directory_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("abicat.toml"),
            "[header]\nguard = \"NATIVE_H\"\ninclude_release = false\n",
        )
        .unwrap();
        abicat_cmd()
            .current_dir(dir.path())
            .args(["header", "-o", "out.h"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let text = fs::read_to_string(dir.path().join("out.h")).unwrap();
        assert!(text.contains("#ifndef NATIVE_H"));
        assert!(!text.contains("free_int"));
    }

    #[test]
    fn test_header_rejects_unknown_config_key() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.toml");
        fs::write(&config, "[header]\ncolour = true\n").unwrap();
        abicat_cmd()
            .arg("header")
            .arg("--config")
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load configuration"));
    }

    #[test]
    fn test_header_missing_config_file() {
        abicat_cmd()
            .args(["header", "--config", "/nonexistent/abicat.toml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// SELFTEST & COMPLETIONS
// ══════════════════════════════════════════════════════════════════════════════

mod selftest {
    use super::*;

    #[test]
    fn test_selftest_passes() {
        abicat_cmd()
            .arg("selftest")
            .assert()
            .success()
            .stdout(predicate::str::contains("PASS callback_primitive"))
            .stdout(predicate::str::contains("0 failed"));
    }

    #[test]
    fn test_selftest_json_all_passed() {
        let value = json_stdout(&["selftest", "--json"]);
        let results = value.as_array().unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r["passed"] == true));
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        abicat_cmd()
            .args(["--verbose", "selftest"])
            .assert()
            .success()
            .stderr(predicate::str::contains("probe finished"));
    }
}

mod completions {
    use super::*;

    #[test]
    fn test_bash_completions() {
        abicat_cmd()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("abicat"));
    }

    #[test]
    fn test_invalid_shell() {
        abicat_cmd()
            .args(["completions", "tcsh"])
            .assert()
            .failure();
    }
}
