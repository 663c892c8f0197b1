//! Integration tests for configuration management

use exchange_planner::config::{Config, ConfigOverrides};

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    // Should have non-empty defaults for critical fields
    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert!(
        !config.paths.catalog_file.is_empty(),
        "Default catalog_file should not be empty"
    );
    assert!(
        !config.paths.plans_dir.is_empty(),
        "Default plans_dir should not be empty"
    );
    assert!(
        !config.paths.exports_dir.is_empty(),
        "Default exports_dir should not be empty"
    );
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
catalog_file = "./catalog.toml"
equivalences_file = "./equivalences.toml"
plans_dir = "./plans"
exports_dir = "./exports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.catalog_file, "./catalog.toml");
    assert_eq!(config.paths.equivalences_file, "./equivalences.toml");
    assert_eq!(config.paths.plans_dir, "./plans");
    assert_eq!(config.paths.exports_dir, "./exports");
}

#[test]
fn test_config_from_toml_partial() {
    // Test that missing fields within sections use defaults
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, ""); // Default empty
    assert!(!config.logging.verbose); // Default false
    assert_eq!(config.paths.catalog_file, ""); // Default empty
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$EXPLAN/test.log"

[paths]
catalog_file = "$EXPLAN/catalog.toml"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    // Variable should be expanded to actual path
    assert!(config.logging.file.contains("explan"));
    assert!(!config.logging.file.contains("$EXPLAN"));
    assert!(config.paths.catalog_file.contains("explan"));
    assert!(!config.paths.catalog_file.contains("$EXPLAN"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    // Test get
    let level = config.get("level");
    assert!(level.is_some());

    // Test set
    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config
        .set("catalog_file", "/data/catalog.toml")
        .expect("Failed to set catalog_file");
    assert_eq!(config.paths.catalog_file, "/data/catalog.toml");
}

#[test]
fn test_config_set_rejects_bad_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("verbose", "not-a-bool").is_err());
    assert!(config.set("no_such_key", "value").is_err());
}

#[test]
fn test_config_unset_restores_default() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config
        .set("plans_dir", "/somewhere/else")
        .expect("Failed to set plans_dir");
    assert_ne!(config.paths.plans_dir, defaults.paths.plans_dir);

    config
        .unset("plans_dir", &defaults)
        .expect("Failed to unset plans_dir");
    assert_eq!(config.paths.plans_dir, defaults.paths.plans_dir);

    assert!(config.unset("no_such_key", &defaults).is_err());
}

#[test]
fn test_config_key_aliases() {
    let mut config = Config::from_defaults();

    // Dashed and underscored forms address the same value
    config
        .set("exports-dir", "/data/exports")
        .expect("Failed to set exports-dir");
    assert_eq!(config.get("exports_dir").unwrap(), "/data/exports");
}

#[test]
fn test_merge_defaults_fills_missing_fields() {
    let mut config = Config::from_toml(
        r#"
[logging]
level = "info"

[paths]
"#,
    )
    .expect("Failed to parse TOML");

    let defaults = Config::from_defaults();
    let changed = config.merge_defaults(&defaults);

    assert!(changed, "Merging into a sparse config should change it");
    assert_eq!(config.logging.level, "info"); // User value preserved
    assert_eq!(config.paths.catalog_file, defaults.paths.catalog_file);
    assert_eq!(config.paths.plans_dir, defaults.paths.plans_dir);

    // A second merge is a no-op
    assert!(!config.merge_defaults(&defaults));
}

#[test]
fn test_apply_overrides() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        verbose: Some(true),
        catalog_file: Some("/override/catalog.toml".to_string()),
        ..ConfigOverrides::default()
    };
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.catalog_file, "/override/catalog.toml");
}

#[test]
fn test_apply_empty_overrides_is_noop() {
    let mut config = Config::from_defaults();
    let before = format!("{config}");

    config.apply_overrides(&ConfigOverrides::default());

    assert_eq!(format!("{config}"), before);
}
