//! CLI integration tests for fieldmap.
//!
//! These tests verify command-line argument parsing, help output,
//! mapping results and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PROFILE: &str = r#"
version: "1"
records:
  - name: Customer
    description: A stored customer
    fields:
      - { name: id, type: int }
      - { name: name, type: "string?" }
      - { name: version, type: byte, default: 1 }
  - name: CustomerView
    fields:
      - { name: my_id, type: int, from: id }
      - { name: my_name, type: "string?", from: name }
      - { name: my_age, type: int, default: 18 }
  - name: DatedView
    fields:
      - { name: created, type: date, from: id }
  - name: EmailView
    fields:
      - { name: contact, type: string, from: email }
"#;

/// A scratch directory holding a profile and an empty config file.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("records.yaml"), PROFILE).unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Get a command for the fieldmap binary, isolated from user config.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("fieldmap").unwrap();
        cmd.current_dir(self.dir.path())
            .env("FIELDMAP_CONFIG", self.path("config.toml"))
            .env_remove("RUST_LOG");
        cmd
    }
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("map"))
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_map_subcommand_help() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["map", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--reverse"))
        .stdout(predicate::str::contains("--save-to"));
}

#[test]
fn test_version_flag() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fieldmap"));
}

#[test]
fn test_no_arguments_shows_help() {
    let ws = Workspace::new();
    ws.cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_prints_plan_table() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "records.yaml", "--from", "Customer", "--to", "CustomerView"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer → CustomerView (forward)"))
        .stdout(predicate::str::contains("my_id"))
        .stdout(predicate::str::contains("my_name"))
        .stdout(predicate::str::contains("2 field(s) mapped"));
}

#[test]
fn test_check_json_output() {
    let ws = Workspace::new();
    let assert = ws
        .cmd()
        .args([
            "-o", "json", "check", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "--reverse",
        ])
        .assert()
        .success();

    let plan = stdout_json(&assert.get_output().stdout);
    assert_eq!(plan["direction"], "reverse");
    assert_eq!(plan["source_type"], "CustomerView");
    assert_eq!(plan["target_type"], "Customer");
    assert_eq!(plan["steps"].as_array().unwrap().len(), 2);
    assert_eq!(plan["steps"][0]["target_field"], "id");
}

#[test]
fn test_check_incompatible_types_exit_code() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "records.yaml", "--from", "Customer", "--to", "DatedView"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error [INCOMPATIBLE_TYPES]"))
        .stderr(predicate::str::contains("Cannot assign int to date (field 'created')"));
}

#[test]
fn test_check_unknown_source_field() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "records.yaml", "--from", "Customer", "--to", "EmailView"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Missing field 'email' on 'Customer'"));
}

#[test]
fn test_check_unknown_record() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "records.yaml", "--from", "Customer", "--to", "Nobody"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown record 'Nobody'"));
}

#[test]
fn test_check_missing_profile() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "absent.yaml", "--from", "Customer", "--to", "CustomerView"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_check_without_profile_shows_help_hint() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["check", "--from", "Customer", "--to", "CustomerView"])
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("--help"));
}

#[test]
fn test_check_uses_default_profile_from_config() {
    let ws = Workspace::new();
    ws.write("config.toml", "default_profile = \"records.yaml\"\n");
    ws.cmd()
        .args(["check", "--from", "Customer", "--to", "CustomerView"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_id"));
}

#[test]
fn test_invalid_profile_exit_code() {
    let ws = Workspace::new();
    ws.write(
        "broken.yaml",
        "records:\n  - name: Customer\n    fields:\n      - { name: id, type: integer32 }\n",
    );
    ws.cmd()
        .args(["check", "broken.yaml", "--from", "Customer", "--to", "Customer"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error [PROFILE]"));
}

// =============================================================================
// Map Tests
// =============================================================================

#[test]
fn test_map_single_instance() {
    let ws = Workspace::new();
    ws.write("customer.json", r#"{ "id": 7, "name": "Ada", "version": 3 }"#);

    let assert = ws
        .cmd()
        .args([
            "-o", "json", "map", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "-i", "customer.json",
        ])
        .assert()
        .success();

    let view = stdout_json(&assert.get_output().stdout);
    assert_eq!(view["my_id"], 7);
    assert_eq!(view["my_name"], "Ada");
    assert_eq!(view["my_age"], 18);
}

#[test]
fn test_map_array_keeps_order() {
    let ws = Workspace::new();
    ws.write(
        "customers.json",
        r#"[{ "id": 1, "name": "Ada" }, { "id": 2 }, { "id": 3, "name": null }]"#,
    );

    let assert = ws
        .cmd()
        .args([
            "-o", "json", "map", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "-i", "customers.json",
        ])
        .assert()
        .success();

    let views = stdout_json(&assert.get_output().stdout);
    let views = views.as_array().unwrap();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0]["my_name"], "Ada");
    assert_eq!(views[1]["my_id"], 2);
    assert!(views[1]["my_name"].is_null());
    assert!(views[2]["my_name"].is_null());
}

#[test]
fn test_map_reverse() {
    let ws = Workspace::new();
    ws.write("view.json", r#"{ "my_id": 9, "my_name": "Grace", "my_age": 40 }"#);

    let assert = ws
        .cmd()
        .args([
            "-o", "json", "map", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "--reverse", "-i", "view.json",
        ])
        .assert()
        .success();

    let customer = stdout_json(&assert.get_output().stdout);
    assert_eq!(customer["id"], 9);
    assert_eq!(customer["name"], "Grace");
    // untouched by the mapping, keeps its declared default
    assert_eq!(customer["version"], 1);
}

#[test]
fn test_map_from_stdin() {
    let ws = Workspace::new();
    let assert = ws
        .cmd()
        .args([
            "-o", "json", "map", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "-i", "-",
        ])
        .write_stdin(r#"{ "id": 5 }"#)
        .assert()
        .success();

    let view = stdout_json(&assert.get_output().stdout);
    assert_eq!(view["my_id"], 5);
}

#[test]
fn test_map_yaml_output() {
    let ws = Workspace::new();
    ws.write("customer.json", r#"{ "id": 7, "name": "Ada" }"#);
    ws.cmd()
        .args([
            "-o", "yaml", "map", "records.yaml", "--from", "Customer", "--to", "CustomerView",
            "-i", "customer.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("my_id: 7"))
        .stdout(predicate::str::contains("my_name: Ada"));
}

#[test]
fn test_map_save_to_file() {
    let ws = Workspace::new();
    ws.write("customer.json", r#"{ "id": 7, "name": "Ada" }"#);

    ws.cmd()
        .args([
            "map", "records.yaml", "--from", "Customer", "--to", "CustomerView", "-i",
            "customer.json", "--save-to", "out/view.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 instance(s)"));

    let saved = std::fs::read_to_string(ws.path("out/view.json")).unwrap();
    let view: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(view["my_id"], 7);
}

#[test]
fn test_map_invalid_instance() {
    let ws = Workspace::new();
    ws.write("customer.json", r#"{ "id": "seven" }"#);
    ws.cmd()
        .args([
            "map", "records.yaml", "--from", "Customer", "--to", "CustomerView", "-i",
            "customer.json",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error [INVALID_INSTANCE]"))
        .stderr(predicate::str::contains("field 'id'"));
}

#[test]
fn test_map_malformed_input() {
    let ws = Workspace::new();
    ws.write("customer.json", "{ not json");
    ws.cmd()
        .args([
            "map", "records.yaml", "--from", "Customer", "--to", "CustomerView", "-i",
            "customer.json",
        ])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_map_missing_input() {
    let ws = Workspace::new();
    ws.cmd()
        .args([
            "map", "records.yaml", "--from", "Customer", "--to", "CustomerView", "-i",
            "absent.json",
        ])
        .assert()
        .failure()
        .code(3);
}

// =============================================================================
// Describe Tests
// =============================================================================

#[test]
fn test_describe_all_records() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["describe", "records.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("═══ Customer ═══"))
        .stdout(predicate::str::contains("A stored customer"))
        .stdout(predicate::str::contains("═══ DatedView ═══"))
        .stdout(predicate::str::contains("string?"));
}

#[test]
fn test_describe_single_record_json() {
    let ws = Workspace::new();
    let assert = ws
        .cmd()
        .args(["-o", "json", "describe", "records.yaml", "-r", "CustomerView"])
        .assert()
        .success();

    let records = stdout_json(&assert.get_output().stdout);
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["name"], "CustomerView");
    assert_eq!(records[0]["fields"][0]["from"], "id");
    assert_eq!(records[0]["fields"][2]["default"], 18);
}

#[test]
fn test_describe_profiles_dir_lookup() {
    let ws = Workspace::new();
    let dir = ws.path("profiles");
    std::fs::create_dir(&dir).unwrap();
    std::fs::write(dir.join("shop.yaml"), PROFILE).unwrap();
    ws.write(
        "config.toml",
        &format!("[paths]\nprofiles_dir = {:?}\n", dir.to_string_lossy()),
    );

    ws.cmd()
        .args(["describe", "shop.yaml", "-r", "Customer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("═══ Customer ═══"));
}

// =============================================================================
// Config and Completions Tests
// =============================================================================

#[test]
fn test_config_show_json() {
    let ws = Workspace::new();
    ws.write("config.toml", "[output]\nformat = \"yaml\"\n");

    let assert = ws
        .cmd()
        .args(["config", "show", "--format", "json"])
        .assert()
        .success();

    let config = stdout_json(&assert.get_output().stdout);
    assert_eq!(config["output"]["format"], "yaml");
    assert_eq!(config["output"]["progress_threshold"], 100);
}

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new();
    let target = ws.path("generated.toml");

    ws.cmd()
        .args(["config", "init"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));
    assert!(Path::new(&target).exists());

    ws.cmd()
        .args(["config", "init"])
        .arg(&target)
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("--force"));

    ws.cmd()
        .args(["config", "init", "--force"])
        .arg(&target)
        .assert()
        .success();
}

#[test]
fn test_config_path_lists_locations() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".fieldmap.toml"));
}

#[test]
fn test_completions_bash() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fieldmap"));
}

#[test]
fn test_broken_config_file() {
    let ws = Workspace::new();
    ws.write("config.toml", "output = [");
    ws.cmd()
        .args(["describe", "records.yaml"])
        .assert()
        .failure()
        .code(14);
}
