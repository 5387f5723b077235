/* tests/cli_smoke.rs */

// Exit-code and surface checks for every subcommand that can run
// without the external toolchain.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn gantry_cmd() -> Command {
  cargo_bin_cmd!("gantry")
}

#[test]
fn help_lists_every_command() {
  gantry_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("dev"))
    .stdout(predicate::str::contains("build-local"))
    .stdout(predicate::str::contains("build-dev"))
    .stdout(predicate::str::contains("production"))
    .stdout(predicate::str::contains("serve"))
    .stdout(predicate::str::contains("clean"));
}

#[test]
fn unknown_subcommand_fails() {
  gantry_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn commands_fail_cleanly_without_a_config() {
  let tmp = TempDir::new().unwrap();
  gantry_cmd()
    .arg("clean")
    .current_dir(tmp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("gantry.toml not found"));
}

#[test]
fn bare_invocation_defaults_to_the_local_build() {
  let tmp = TempDir::new().unwrap();
  gantry_cmd()
    .current_dir(tmp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("gantry.toml not found"));
}

#[test]
fn camel_case_aliases_are_accepted() {
  let tmp = TempDir::new().unwrap();
  // reaching the config lookup proves clap accepted the alias
  gantry_cmd()
    .arg("buildLocal")
    .current_dir(tmp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("gantry.toml not found"));
  gantry_cmd()
    .arg("buildDev")
    .current_dir(tmp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("gantry.toml not found"));
}

#[test]
fn explicit_config_path_is_honored() {
  let tmp = TempDir::new().unwrap();
  let config = tmp.path().join("gantry.toml");
  std::fs::write(&config, "[project]\nname = \"smoke\"\n").unwrap();
  gantry_cmd()
    .arg("clean")
    .arg("--config")
    .arg(&config)
    .assert()
    .success()
    .stdout(predicate::str::contains("clean complete"));
}

#[test]
fn broken_config_reports_the_parse_error() {
  let tmp = TempDir::new().unwrap();
  let config = tmp.path().join("gantry.toml");
  std::fs::write(&config, "[project\n").unwrap();
  gantry_cmd()
    .arg("clean")
    .arg("--config")
    .arg(&config)
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed to parse"));
}
