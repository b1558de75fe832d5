//! Configuration resolution tests
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that set ACOUSTID_* / SCAN_DIRECTORY are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use clap::Parser;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tagfill::services::WriteMode;
use tagfill::workflow::PlaceholderMatch;
use tagfill::{AppConfig, Args};
use tagfill_common::Error;

const ENV_VARS: [&str; 4] = ["ACOUSTID_KEY", "ACOUSTID_NAME", "ACOUSTID_VERSION", "SCAN_DIRECTORY"];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_toml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
#[serial]
fn test_env_supplies_required_keys() {
    clear_env();
    std::env::set_var("ACOUSTID_KEY", "env-key");
    std::env::set_var("ACOUSTID_NAME", "tagfill");
    std::env::set_var("ACOUSTID_VERSION", "0.1.0");
    std::env::set_var("SCAN_DIRECTORY", "/music");

    let args = Args::parse_from(["tagfill"]);
    let config = AppConfig::resolve(&args, None).unwrap();

    assert_eq!(config.acoustid_api_key, "env-key");
    assert_eq!(config.scan_directory, PathBuf::from("/music"));

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    std::env::set_var("ACOUSTID_KEY", "env-key");

    let args = Args::parse_from([
        "tagfill",
        "--acoustid-key",
        "cli-key",
        "--app-name",
        "tagfill",
        "--app-version",
        "0.1.0",
        "--scan-directory",
        "/music",
    ]);
    let config = AppConfig::resolve(&args, None).unwrap();
    assert_eq!(config.acoustid_api_key, "cli-key");

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    std::env::set_var("ACOUSTID_KEY", "env-key");

    let toml = write_toml(
        r#"
acoustid_api_key = "toml-key"
app_name = "tagfill"
app_version = "0.1.0"
scan_directory = "/srv/music"
strict_placeholders = true
atomic_writes = true
"#,
    );

    let args = Args::parse_from(["tagfill", "--config", toml.path().to_str().unwrap()]);
    let config = AppConfig::load(&args).unwrap();

    assert_eq!(config.acoustid_api_key, "env-key");
    assert_eq!(config.app_name, "tagfill");
    assert_eq!(config.scan_directory, PathBuf::from("/srv/music"));
    assert_eq!(config.placeholder_match, PlaceholderMatch::Strict);
    assert_eq!(config.write_mode, WriteMode::Atomic);

    clear_env();
}

#[test]
#[serial]
fn test_missing_keys_reported_together() {
    clear_env();

    let args = Args::parse_from(["tagfill", "--app-name", "tagfill"]);
    let result = AppConfig::resolve(&args, None);

    match result {
        Err(Error::MissingConfig(keys)) => {
            assert_eq!(keys, vec!["ACOUSTID_KEY", "ACOUSTID_VERSION", "SCAN_DIRECTORY"]);
        }
        other => panic!("expected MissingConfig, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_whitespace_env_value_is_missing() {
    clear_env();
    std::env::set_var("ACOUSTID_KEY", "   ");

    let args = Args::parse_from([
        "tagfill",
        "--app-name",
        "tagfill",
        "--app-version",
        "0.1.0",
        "--scan-directory",
        "/music",
    ]);

    assert!(matches!(
        AppConfig::resolve(&args, None),
        Err(Error::MissingConfig(keys)) if keys == vec!["ACOUSTID_KEY"]
    ));

    clear_env();
}

#[test]
#[serial]
fn test_flags_parse() {
    clear_env();

    let args = Args::parse_from([
        "tagfill",
        "--strict-placeholders",
        "--atomic-writes",
        "--dry-run",
        "--fpcalc-path",
        "/opt/chromaprint/fpcalc",
    ]);

    assert!(args.strict_placeholders);
    assert!(args.atomic_writes);
    assert!(args.dry_run);
    assert_eq!(args.fpcalc_path, Some(PathBuf::from("/opt/chromaprint/fpcalc")));
}

#[test]
fn test_malformed_toml_is_error() {
    let toml = write_toml("scan_directory = [");
    let args = Args {
        config: Some(toml.path().to_path_buf()),
        ..Default::default()
    };

    assert!(matches!(AppConfig::load(&args), Err(Error::ConfigParse(_))));
}
