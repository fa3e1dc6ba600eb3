//! Profile loading from disk and mapping between profile records

use fieldmap_core::{
    map, map_reverse, Direction, Error, ErrorCode, MappingPlan, Profile, TypeDescriptor,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_profile(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CUSTOMER_JSON: &str = r#"{
  "version": "1",
  "records": [
    {
      "name": "Customer",
      "fields": [
        { "name": "id", "type": "int" },
        { "name": "name", "type": "string?" },
        { "name": "joined", "type": "date" },
        { "name": "token", "type": "uuid?" }
      ]
    },
    {
      "name": "CustomerView",
      "fields": [
        { "name": "my_id", "type": "int", "from": "id" },
        { "name": "my_name", "type": "string?", "from": "name" },
        { "name": "since", "type": "date", "from": "joined" },
        { "name": "my_age", "type": "int", "default": 18 }
      ]
    }
  ]
}"#;

#[test]
fn test_load_each_format_from_disk() {
    let json_file = write_profile(".json", CUSTOMER_JSON);
    let from_json = Profile::from_path(json_file.path()).unwrap();

    let yaml = serde_yaml::to_string(&from_json).unwrap();
    let yaml_file = write_profile(".yaml", &yaml);
    let from_yaml = Profile::from_path(yaml_file.path()).unwrap();

    let toml_text = toml::to_string(&from_json).unwrap();
    let toml_file = write_profile(".toml", &toml_text);
    let from_toml = Profile::from_path(toml_file.path()).unwrap();

    assert_eq!(from_json, from_yaml);
    assert_eq!(from_json, from_toml);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Profile::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Io);
}

#[test]
fn test_malformed_file_is_format_error() {
    let file = write_profile(".json", "{ records: ");
    let err = Profile::from_path(file.path()).unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
    assert_eq!(err.code(), ErrorCode::Format);
}

#[test]
fn test_map_profile_records_forward_and_back() {
    let file = write_profile(".json", CUSTOMER_JSON);
    let profile = Profile::from_path(file.path()).unwrap();
    let class = profile.descriptor("Customer").unwrap();
    let view = profile.descriptor("CustomerView").unwrap();

    let source = class
        .instance_from_json(&json!({
            "id": 7,
            "name": "Ada",
            "joined": "2020-02-02",
            "token": "67e55044-10b1-426f-9247-bb680e5fe0c8"
        }))
        .unwrap();

    let mapped = map(&source, &class, &view).unwrap();
    assert_eq!(
        serde_json::Value::Object(mapped.clone()),
        json!({ "my_id": 7, "my_name": "Ada", "since": "2020-02-02", "my_age": 18 })
    );

    let back = map_reverse(&mapped, &view, &class).unwrap();
    assert_eq!(back["id"], json!(7));
    assert_eq!(back["joined"], json!("2020-02-02"));
    assert_eq!(back["token"], json!(null));
}

#[test]
fn test_profile_plan_matches_declarations() {
    let profile: Profile = serde_json::from_str(CUSTOMER_JSON).unwrap();
    let class = profile.descriptor("Customer").unwrap();
    let view = profile.descriptor("CustomerView").unwrap();

    let plan = MappingPlan::resolve(&view, &class, Direction::Forward).unwrap();
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.steps[2].source_type, "date");
    assert_eq!(plan.steps[1].target_type, "string?");
    assert_eq!(view.fields().len(), 4);
}

#[test]
fn test_profile_incompatible_kinds() {
    let text = r#"
records:
  - name: Customer
    fields:
      - { name: id, type: int }
  - name: DatedView
    fields:
      - { name: created, type: date, from: id }
"#;
    let file = write_profile(".yml", text);
    let profile = Profile::from_path(file.path()).unwrap();
    let class = profile.descriptor("Customer").unwrap();
    let view = profile.descriptor("DatedView").unwrap();

    let err = map(&class.instantiate(), &class, &view).unwrap_err();
    assert_eq!(err.to_string(), "Cannot assign int to date (field 'created')");
}

#[test]
fn test_profile_long_is_not_widened_from_int() {
    let text = r#"
records:
  - name: Small
    fields:
      - { name: n, type: int }
  - name: Wide
    fields:
      - { name: n, type: long, from: n }
"#;
    let profile = Profile::parse(text, fieldmap_core::ProfileFormat::Yaml).unwrap();
    let small = profile.descriptor("Small").unwrap();
    let wide = profile.descriptor("Wide").unwrap();

    let err = map(&small.instantiate(), &small, &wide).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IncompatibleTypes);
}
