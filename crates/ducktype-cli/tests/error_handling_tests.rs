//! Exit codes and error messages of the ducktype CLI.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn ducktype() -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("ducktype");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_error_unknown_type() {
    ducktype()
        .args(["probe", "IDuck", "Swan"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown type 'Swan'"))
        .stderr(predicate::str::contains("Suggestions:"))
        .stderr(predicate::str::contains("ducktype list"));
}

#[test]
fn test_error_concrete_interface() {
    ducktype()
        .args(["probe", "Duck", "Mallard"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "ducktype_adapters::samples::Duck must be an interface type.",
        ));
}

#[test]
fn test_error_ambiguous_simple_name() {
    let temp = TempDir::new().unwrap();
    let shapes = temp.path().join("ducks.toml");
    fs::write(&shapes, "[[types]]\nname = \"zoo::Duck\"\nkind = \"concrete\"\n").unwrap();

    ducktype()
        .args(["probe", "IDuck", "Duck", "--manifest"])
        .arg(&shapes)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ambiguous"))
        .stderr(predicate::str::contains("zoo::Duck"));
}

#[test]
fn test_error_broken_manifest() {
    let temp = TempDir::new().unwrap();
    let shapes = temp.path().join("broken.toml");
    fs::write(&shapes, "[[types]\n").unwrap();

    ducktype()
        .args(["list", "--manifest"])
        .arg(&shapes)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn test_error_missing_config_file() {
    let temp = TempDir::new().unwrap();

    ducktype()
        .arg("--config")
        .arg(temp.path().join("absent.toml"))
        .arg("list")
        .assert()
        .code(4);
}

#[test]
fn test_error_unknown_config_key() {
    ducktype()
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_error_invalid_arguments() {
    ducktype()
        .args(["probe", "IDuck"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("TYPE"));
}

#[test]
fn test_error_verbose_hides_hint() {
    ducktype()
        .args(["-v", "probe", "IDuck", "Swan"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--verbose").not());
}
