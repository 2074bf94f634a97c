use std::env;
use std::fs;

use sqlwindow::config::loader::{load_from_file, load_spec_from_toml, load_spec_from_yaml};
use sqlwindow::{ErrorKind, Interpolation, RollingBound, WindowConfig, WindowSpec};
use tempfile::tempdir;

#[test]
fn test_default_config() {
    let config = WindowConfig::default();

    assert_eq!(config.aggregation.ddof, 1);
    assert_eq!(config.aggregation.min_periods, 1);
    assert_eq!(config.aggregation.interpolation, Interpolation::Linear);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.trace_queries);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation() {
    let mut config = WindowConfig::default();
    config.aggregation.min_periods = 0;
    assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Configuration);

    let mut config = WindowConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "DEBUG".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.logging.level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_config_serialization() {
    let mut config = WindowConfig::default();
    config.aggregation.ddof = 0;
    config.aggregation.interpolation = Interpolation::Nearest;

    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("aggregation:"));
    assert!(yaml.contains("nearest"));

    let toml = config.to_toml().unwrap();
    assert!(toml.contains("[aggregation]"));
    assert!(toml.contains("[logging]"));

    let from_yaml: WindowConfig = serde_yaml::from_str(&yaml).unwrap();
    let from_toml: WindowConfig = toml::from_str(&toml).unwrap();
    assert_eq!(from_yaml, config);
    assert_eq!(from_toml, config);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: WindowConfig = serde_yaml::from_str("aggregation:\n  min_periods: 3\n").unwrap();

    assert_eq!(config.aggregation.min_periods, 3);
    assert_eq!(config.aggregation.ddof, 1);
    assert_eq!(config.logging, WindowConfig::default().logging);
}

#[test]
fn test_config_files() {
    let dir = tempdir().unwrap();

    let mut config = WindowConfig::default();
    config.aggregation.min_periods = 2;
    config.logging.trace_queries = true;

    let yaml_path = dir.path().join("window.yaml");
    config.save_to_file(&yaml_path).unwrap();
    assert_eq!(load_from_file(&yaml_path).unwrap(), config);

    let toml_path = dir.path().join("window.toml");
    config.save_to_file(&toml_path).unwrap();
    assert_eq!(load_from_file(&toml_path).unwrap(), config);

    // no extension: YAML is tried first, then TOML
    let bare_path = dir.path().join("window");
    fs::write(&bare_path, config.to_toml().unwrap()).unwrap();
    assert_eq!(load_from_file(&bare_path).unwrap(), config);

    let json_path = dir.path().join("window.json");
    fs::write(&json_path, "{}").unwrap();
    assert!(load_from_file(&json_path).is_err());

    assert!(load_from_file(&dir.path().join("missing.yaml")).is_err());
}

// The only test in this binary that reads SQLWINDOW_* variables
#[test]
fn test_environment_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("window.toml");
    fs::write(
        &path,
        "[aggregation]\nddof = 2\nmin_periods = 4\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();

    env::set_var("SQLWINDOW_DDOF", "0");
    env::set_var("SQLWINDOW_INTERPOLATION", "midpoint");
    env::set_var("SQLWINDOW_TRACE_QUERIES", "true");
    let loaded = WindowConfig::load(Some(&path));
    env::set_var("SQLWINDOW_MIN_PERIODS", "zero");
    let invalid = WindowConfig::load(Some(&path));
    env::set_var("SQLWINDOW_MIN_PERIODS", "0");
    let rejected = WindowConfig::load(None::<&str>);
    for key in [
        "SQLWINDOW_DDOF",
        "SQLWINDOW_INTERPOLATION",
        "SQLWINDOW_TRACE_QUERIES",
        "SQLWINDOW_MIN_PERIODS",
    ] {
        env::remove_var(key);
    }

    let config = loaded.unwrap();
    assert_eq!(config.aggregation.ddof, 0);
    assert_eq!(config.aggregation.min_periods, 4);
    assert_eq!(config.aggregation.interpolation, Interpolation::Midpoint);
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.trace_queries);

    assert_eq!(invalid.unwrap_err().kind(), ErrorKind::Configuration);
    assert_eq!(rejected.unwrap_err().kind(), ErrorKind::Configuration);
}

#[test]
fn test_window_spec_from_toml() {
    let spec = load_spec_from_toml(
        r#"
partition_by = ["region", "store"]
order_by = "ts"
ascending = false
time_rolling = "5min"
"#,
    )
    .unwrap();

    assert_eq!(spec.partition_by(), &["region".to_string(), "store".to_string()]);
    assert_eq!(spec.order_by(), "ts");
    assert!(!spec.ascending());
    assert_eq!(
        spec.rolling(),
        Some(RollingBound::Time(chrono::Duration::minutes(5)))
    );
}

#[test]
fn test_window_spec_serialization() {
    let spec = WindowSpec::builder("g", "t")
        .time_rolling_str("90s")
        .unwrap()
        .build()
        .unwrap();

    let yaml = serde_yaml::to_string(&spec).unwrap();
    assert!(yaml.contains("time_rolling"));
    assert!(yaml.contains("90s"));
    assert!(!yaml.contains("rows_rolling"));
    assert_eq!(load_spec_from_yaml(&yaml).unwrap(), spec);
}

#[test]
fn test_invalid_window_spec_documents() {
    let both = "partition_by: g\norder_by: t\nrows_rolling: 2\ntime_rolling: 10s\n";
    assert_eq!(
        load_spec_from_yaml(both).unwrap_err().kind(),
        ErrorKind::Configuration
    );

    let missing_order = "partition_by = \"g\"\n";
    assert!(load_spec_from_toml(missing_order).is_err());
}
