use clap::Parser;
use confweave::cli::Args;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("confweave")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./site.json", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.config, PathBuf::from("./site.json"));
    assert_eq!(parsed.output_dir, PathBuf::from("./output"));
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.intermediate);
    assert!(parsed.options.is_none());
    assert!(parsed.set.is_empty());
}

#[test]
fn test_default_output_dir() {
    let parsed = Args::try_parse_from(make_args(&["./site.json"])).unwrap();
    assert_eq!(parsed.output_dir, PathBuf::from("target"));
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--force",
        "--verbose",
        "--intermediate",
        "--options",
        "./options.yml",
        "--replace-map",
        "$.out.map",
        "--set",
        "code.group=Site",
        "--set",
        "name=hero",
        "./site.json",
        "./output",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.intermediate);
    assert_eq!(parsed.options, Some(PathBuf::from("./options.yml")));
    assert_eq!(parsed.replace_map.as_deref(), Some("$.out.map"));
    assert_eq!(
        parsed.set,
        vec![
            ("code.group".to_string(), "Site".to_string()),
            ("name".to_string(), "hero".to_string())
        ]
    );
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-f", "-v", "./site.json", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
}

#[test]
fn test_invalid_set() {
    let args = make_args(&["--set", "novalue", "./site.json"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_args() {
    let args = make_args(&[]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./site.json", "./output", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
