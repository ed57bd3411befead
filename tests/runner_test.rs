use confweave::cli::Args;
use confweave::error::Error;
use confweave::runner::run;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn args(config: &Path, output_dir: &Path) -> Args {
    Args {
        config: config.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        force: false,
        verbose: false,
        options: None,
        replace_map: None,
        set: Vec::new(),
        intermediate: false,
    }
}

fn write_config(dir: &TempDir, content: &Value) -> PathBuf {
    let path = dir.path().join("site.json");
    fs::write(&path, content.to_string()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn sample() -> Value {
    json!({
        "template-definitions": {
            "copy-patterns": [
                {"baseJsonPath": "$.items[*]", "targetAttributes": {"label": "$.meta.label"}}
            ]
        },
        "meta": {"label": "X"},
        "items": [{}, {}],
        "options": {"replaceValueMap": {"labels": "$.meta.label"}}
    })
}

#[test]
fn test_run_writes_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &sample());
    let output_dir = dir.path().join("out");

    let written = run(&args(&config, &output_dir)).unwrap();
    assert_eq!(written, output_dir.join("site.json"));

    let output = read_json(&written);
    assert_eq!(output["items"][1]["label"], json!("$.meta.label"));
    assert_eq!(output["options"]["replaceValueMap"]["labels"], json!("X"));
    assert!(!output_dir.join("site.intermediate.json").exists());
}

#[test]
fn test_run_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &sample());
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&output_dir).unwrap();
    fs::write(output_dir.join("site.json"), "old").unwrap();

    let err = run(&args(&config, &output_dir)).unwrap_err();
    assert!(matches!(err, Error::OutputExistsError { .. }));
    assert_eq!(fs::read_to_string(output_dir.join("site.json")).unwrap(), "old");

    let mut forced = args(&config, &output_dir);
    forced.force = true;
    run(&forced).unwrap();
    assert_eq!(read_json(&output_dir.join("site.json"))["meta"]["label"], json!("X"));
}

#[test]
fn test_run_writes_intermediate() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &sample());
    let output_dir = dir.path().join("out");

    let mut with_intermediate = args(&config, &output_dir);
    with_intermediate.intermediate = true;
    run(&with_intermediate).unwrap();

    let intermediate = read_json(&output_dir.join("site.intermediate.json"));
    assert_eq!(intermediate["options"]["replaceValueMap"]["labels"], json!("$.meta.label"));
    assert_eq!(intermediate["items"][0]["label"], json!("$.meta.label"));
}

#[test]
fn test_run_with_options_and_replace_map() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &json!({
            "template-definitions": {},
            "alt": {"k": "$.v"},
            "other": {"k": "$.v"},
            "v": "${suffix}"
        }),
    );
    let options = dir.path().join("options.yml");
    fs::write(&options, "replaceValueMap: $.other\n").unwrap();
    let output_dir = dir.path().join("out");

    let mut custom = args(&config, &output_dir);
    custom.options = Some(options);
    custom.replace_map = Some("$.alt".to_string());
    custom.set = vec![("suffix".to_string(), "ok".to_string())];

    let output = read_json(&run(&custom).unwrap());
    assert_eq!(output["alt"]["k"], json!("ok"));
    assert_eq!(output["other"]["k"], json!("$.v"));
}

#[test]
fn test_run_rejects_missing_or_empty_config() {
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("out");

    let missing = run(&args(&dir.path().join("absent.json"), &output_dir)).unwrap_err();
    assert!(matches!(missing, Error::ConfigError(_)));

    let empty = dir.path().join("empty.json");
    fs::write(&empty, "  \n").unwrap();
    assert!(matches!(run(&args(&empty, &output_dir)).unwrap_err(), Error::ConfigError(_)));
    assert!(!output_dir.exists());
}

#[test]
fn test_run_fails_without_partial_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &json!({
            "template-definitions": {
                "copy-patterns": [{"baseJsonPath": "$.items[?(@.a ==", "targetAttributes": {"x": "y"}}]
            },
            "items": []
        }),
    );
    let output_dir = dir.path().join("out");

    let err = run(&args(&config, &output_dir)).unwrap_err();
    assert!(matches!(err, Error::MalformedQuery { .. }));
    assert!(!output_dir.exists());
}
