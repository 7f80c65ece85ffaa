//! Integration tests for configuration loading and resolution
//!
//! Covers:
//! - Priority order: --config > LANGFIT_CONFIG > user config dir > defaults
//! - Missing implicit config → warning + defaults
//! - Missing or malformed explicit config → error
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that read or write LANGFIT_CONFIG are marked with #[serial].

use langfit_common::config::{ConfigResolver, ConfigSource, CONFIG_ENV_VAR};
use langfit_common::{EngineConfig, Error, TomlConfig};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Resolver whose implicit location points into a temp dir
fn resolver_with_user_path(path: Option<PathBuf>) -> ConfigResolver {
    ConfigResolver::new().with_user_config_path(path)
}

#[test]
#[serial]
fn test_no_overrides_uses_compiled_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();

    let resolver = resolver_with_user_path(Some(dir.path().join("missing.toml")));
    let (config, source) = resolver.load(None).unwrap();

    assert_eq!(source, ConfigSource::CompiledDefaults);
    assert_eq!(config.engine, EngineConfig::default());
    assert_eq!(config.logging.level, "info");
}

#[test]
#[serial]
fn test_user_config_dir_file_is_loaded() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "config.toml", "[engine]\nquestion_cap = 8\n");

    let resolver = resolver_with_user_path(Some(path.clone()));
    let (config, source) = resolver.load(None).unwrap();

    assert_eq!(source, ConfigSource::UserConfigDir(path));
    assert_eq!(config.engine.question_cap, 8);
    assert_eq!(config.engine.question_floor, 6);
}

#[test]
#[serial]
fn test_env_var_beats_user_config_dir() {
    let dir = TempDir::new().unwrap();
    let user = write_config(&dir, "user.toml", "[engine]\nquestion_cap = 8\n");
    let from_env = write_config(&dir, "env.toml", "[engine]\nquestion_cap = 7\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = resolver_with_user_path(Some(user));
    let (config, source) = resolver.load(None).unwrap();

    assert_eq!(source, ConfigSource::Environment(from_env));
    assert_eq!(config.engine.question_cap, 7);

    // Cleanup
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    let dir = TempDir::new().unwrap();
    let from_env = write_config(&dir, "env.toml", "[engine]\nquestion_cap = 7\n");
    let from_cli = write_config(&dir, "cli.toml", "[engine]\nquestion_cap = 9\n");
    env::set_var(CONFIG_ENV_VAR, &from_env);

    let resolver = resolver_with_user_path(None);
    let (config, source) = resolver.load(Some(from_cli.as_path())).unwrap();

    assert_eq!(source, ConfigSource::CommandLine(from_cli));
    assert_eq!(config.engine.question_cap, 9);

    // Cleanup
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "");

    let resolver = resolver_with_user_path(None);
    assert_eq!(resolver.resolve(None), ConfigSource::CompiledDefaults);

    // Cleanup
    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    let resolver = resolver_with_user_path(None);
    let result = resolver.load(Some(missing.as_path()));

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_malformed_explicit_file_is_an_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[engine\nquestion_cap = ");

    let resolver = resolver_with_user_path(None);
    let result = resolver.load(Some(path.as_path()));

    assert!(matches!(result, Err(Error::Toml(_))));
}

#[test]
fn test_invalid_engine_values_are_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "invalid.toml",
        "[engine]\nquestion_floor = 12\nquestion_cap = 10\n",
    );

    let result = TomlConfig::from_file(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_full_document_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "full.toml",
        r#"
catalog_path = "/opt/langfit/catalog.toml"
templates_path = "/opt/langfit/templates.toml"

[logging]
level = "debug"
file = "/tmp/langfit.log"

[engine]
candidate_floor = 5
candidate_ceiling = 15
question_cap = 8
question_floor = 4
min_coverage = 0.25
min_quality = 4.5
large_candidate_set = 10
small_candidate_set = 3
fallback_language = "go"

[engine.weights]
domain = 4
performance = 3
style = 2
ecosystem = 1
"#,
    );

    let config = TomlConfig::from_file(&path).unwrap();

    assert_eq!(
        config.catalog_path.as_deref(),
        Some(Path::new("/opt/langfit/catalog.toml"))
    );
    assert_eq!(
        config.templates_path.as_deref(),
        Some(Path::new("/opt/langfit/templates.toml"))
    );
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.logging.file.as_deref(),
        Some(Path::new("/tmp/langfit.log"))
    );
    assert_eq!(config.engine.candidate_ceiling, 15);
    assert_eq!(config.engine.min_coverage, 0.25);
    assert_eq!(config.engine.fallback_language, "go");
    assert_eq!(config.engine.weights.domain, 4);
    assert_eq!(config.engine.weights.style, 2);
}
