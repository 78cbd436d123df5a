use std::path::{Path, PathBuf};

use osk_config::{Config, ConfigError, ConfigManager};
use tempfile::tempdir;

#[test]
fn default_config_uses_txt_and_colour() {
    let cfg = Config::default();

    assert_eq!(cfg.default_export_format, "txt");
    assert!(cfg.ui_color_enabled);
    assert_eq!(cfg.log_filter(), "osk_manager=info");
    assert_eq!(
        cfg.resolve_data_dir(Path::new("/srv/osk")),
        PathBuf::from("/srv/osk/data")
    );
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("default_export_format", "DOC").expect("format");
    cfg.set("data_dir", "/tmp/osk-data").expect("data dir");
    cfg.set("ui_color_enabled", "off").expect("colour");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.default_export_format, "doc");
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("absent.json"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let mut cfg = Config::default();
    assert!(matches!(
        cfg.set("theme", "dark"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        cfg.set("default_export_format", "pdf"),
        Err(ConfigError::InvalidValue { .. })
    ));
    cfg.set("log_filter", "osk_manager=debug").expect("filter");
    assert_eq!(cfg.get("log_filter").expect("get"), "osk_manager=debug");
    cfg.set("log_filter", "default").expect("reset");
    assert_eq!(cfg.log_filter, None);
}
