use bindery_config::{
    AmbiguityMode, BinderyConfig, ConfigError, ConfigValidationError, ConfigWarning,
};
use pretty_assertions::assert_eq;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn empty_config_uses_defaults() {
    let (config, diagnostics) =
        BinderyConfig::load_from_str_with_diagnostics("").expect("config should parse");

    assert_eq!(config, BinderyConfig::default());
    assert!(diagnostics.is_empty());
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.stderr);
    assert_eq!(config.resolution.ambiguity, AmbiguityMode::Fail);
    assert_eq!(config.resolution.max_type_depth, 64);
    assert!(config.resolution.box_primitives);
}

#[test]
fn parses_every_section() {
    let text = r#"
[logging]
level = "warning"
json = true
stderr = false

[resolution]
ambiguity = "ignore"
max_type_depth = 8
box_primitives = false
"#;

    let (config, diagnostics) =
        BinderyConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.logging.level, "warning");
    assert!(config.logging.json);
    assert!(!config.logging.stderr);
    assert_eq!(config.resolution.ambiguity, AmbiguityMode::Ignore);
    assert_eq!(config.resolution.max_type_depth, 8);
    assert!(!config.resolution.box_primitives);
}

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[logging]
levle = "debug"

[resolution]
max_depth = 3
"#;

    let (_config, diagnostics) =
        BinderyConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.unknown_keys,
        vec!["logging.levle", "resolution.max_depth", "typo"]
    );
    assert!(diagnostics.is_ok());
}

#[test]
fn zero_max_type_depth_is_an_error() {
    let text = r#"
[resolution]
max_type_depth = 0
"#;

    let (config, diagnostics) =
        BinderyConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.errors,
        vec![ConfigValidationError::ResolutionMaxTypeDepthZero]
    );
    assert!(!diagnostics.is_ok());
    assert_eq!(config.resolution.effective_max_type_depth(), 64);
}

#[test]
fn invalid_level_directive_is_a_warning() {
    let text = r#"
[logging]
level = "bindery.registry=loud"
"#;

    let (_config, diagnostics) =
        BinderyConfig::load_from_str_with_diagnostics(text).expect("config should parse");

    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::LoggingLevelInvalid {
            value: "bindery.registry=loud".to_owned(),
            normalized: "bindery.registry=loud".to_owned(),
        }]
    );
}

#[test]
fn missing_log_directory_is_reported_relative_to_config_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bindery.toml");
    std::fs::write(
        &path,
        r#"
[logging]
file = "logs/bindery.log"
"#,
    )
    .expect("write config");

    let (_config, diagnostics) =
        BinderyConfig::load_from_path_with_diagnostics(&path).expect("config should load");

    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::LoggingFileDirMissing {
            toml_path: "logging.file".to_owned(),
            resolved: dir.path().join("logs/bindery.log"),
        }]
    );

    std::fs::create_dir(dir.path().join("logs")).expect("create logs dir");
    let (_config, diagnostics) =
        BinderyConfig::load_from_path_with_diagnostics(&path).expect("config should load");
    assert!(diagnostics.warnings.is_empty());
}

#[test]
fn load_from_path_reads_a_file() {
    let file = NamedTempFile::new().expect("temp file");
    std::fs::write(file.path(), "[resolution]\nambiguity = \"ignore\"\n").expect("write config");

    let config = BinderyConfig::load_from_path(file.path()).expect("config should load");
    assert_eq!(config.resolution.ambiguity, AmbiguityMode::Ignore);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = BinderyConfig::load_from_path(dir.path().join("absent.toml"))
        .expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
}

#[test]
fn type_errors_are_toml_errors() {
    let err = BinderyConfig::load_from_str_with_diagnostics("[resolution]\nmax_type_depth = \"deep\"\n")
        .expect_err("max_type_depth must be an integer");
    match err {
        ConfigError::Toml(message) => assert!(!message.contains("deep"), "{message}"),
        other => panic!("expected a toml error, got {other:?}"),
    }
}
