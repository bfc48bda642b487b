//! End-to-end runs of the `run` binary inside a scratch working directory.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ENV_YAML: &str = r#"
dev:
  properties:
    host: localhost
    port: 8080
    token: $SIMRUN_TEST_TOKEN
    missing: $SIMRUN_TEST_DEFINITELY_UNSET
"#;

const SIM_YAML: &str = r#"
smoke:
  properties:
    duration: 10
    mode: fast
  command: cat test.properties
broken:
  properties:
    duration: 1
  command: echo boom; exit 7
"#;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config");
    std::fs::create_dir(&config).unwrap();
    std::fs::write(config.join("env.yml"), ENV_YAML).unwrap();
    std::fs::write(config.join("sim.yml"), SIM_YAML).unwrap();
    dir
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_run"))
        .args(args)
        .current_dir(dir)
        .env("SIMRUN_TEST_TOKEN", "tok-123")
        .env_remove("SIMRUN_TEST_DEFINITELY_UNSET")
        .env_remove("SIMRUN_CONFIG_DIR")
        .env_remove("SIMRUN_LOG_FILE")
        .env_remove("SIMRUN_LOG_JSON")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_valid_pair_writes_properties_and_runs_command() {
    let dir = workspace();
    let out = run_in(dir.path(), &["dev", "smoke"]);
    assert_eq!(out.status.code(), Some(0));

    let props = read(dir.path(), "test.properties");
    let lines: Vec<_> = props.lines().collect();
    // header + 4 env + 2 sim
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "# TEST PROPERTIES. ENV dev, SIM smoke");
    assert_eq!(lines[1], "host=localhost");
    assert_eq!(lines[3], "token=tok-123");
    assert_eq!(lines[4], "missing=");
    assert_eq!(lines[6], "mode=fast");

    let log = read(dir.path(), "output.log");
    assert!(log.contains("Executing simulation command"));
    assert!(log.contains("Output: # TEST PROPERTIES. ENV dev, SIM smoke"));
    assert!(log.contains("WARN"));
    assert!(log.contains("SIMRUN_TEST_DEFINITELY_UNSET"));
}

#[test]
fn test_log_lines_go_to_stdout_too() {
    let dir = workspace();
    let out = run_in(dir.path(), &["dev", "smoke"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(" - INFO - "));
    assert!(stdout.contains("Executing simulation command"));
}

#[test]
fn test_log_file_is_appended_across_runs() {
    let dir = workspace();
    run_in(dir.path(), &["dev", "smoke"]);
    let first = read(dir.path(), "output.log").len();
    run_in(dir.path(), &["dev", "smoke"]);
    let second = read(dir.path(), "output.log").len();
    assert!(second > first);
}

#[test]
fn test_failing_command_still_exits_zero() {
    let dir = workspace();
    let out = run_in(dir.path(), &["dev", "broken"]);
    assert_eq!(out.status.code(), Some(0));

    let log = read(dir.path(), "output.log");
    assert!(log.contains("Command failed with return code 7"));
    assert!(log.contains("boom"));
}

#[test]
fn test_unknown_environment_exits_two() {
    let dir = workspace();
    let out = run_in(dir.path(), &["prod", "smoke"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("test.properties").exists());
    assert!(read(dir.path(), "output.log").contains("Environment or Simulation is not defined"));
}

#[test]
fn test_unknown_simulation_exits_two() {
    let dir = workspace();
    let out = run_in(dir.path(), &["dev", "soak"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(!dir.path().join("test.properties").exists());
}

#[test]
fn test_missing_config_file_exits_two() {
    let dir = workspace();
    std::fs::remove_file(dir.path().join("config").join("sim.yml")).unwrap();
    let out = run_in(dir.path(), &["dev", "smoke"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(read(dir.path(), "output.log").contains("File not found"));
}

#[test]
fn test_empty_argument_exits_one_without_file_io() {
    let dir = workspace();
    for args in [["", "smoke"], ["dev", ""]] {
        let out = run_in(dir.path(), &args);
        assert_eq!(out.status.code(), Some(1));
    }
    assert!(!dir.path().join("output.log").exists());
    assert!(!dir.path().join("test.properties").exists());
}

#[test]
fn test_path_options() {
    let dir = workspace();
    std::fs::rename(dir.path().join("config"), dir.path().join("profiles")).unwrap();

    let out = run_in(
        dir.path(),
        &[
            "--config-dir",
            "profiles",
            "--output",
            "custom.properties",
            "--log-file",
            "logs/run.log",
            "dev",
            "broken",
        ],
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(read(dir.path(), "custom.properties").starts_with("# TEST PROPERTIES. ENV dev, SIM broken"));
    assert!(read(dir.path(), "logs/run.log").contains("return code 7"));
}
