use super::load_config;
use super::settings::{PartialBrokerSettings, PartialSettings, Settings};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Runs `f` with the current directory switched to a fresh temp dir.
fn in_temp_dir<R>(f: impl FnOnce() -> R) -> R {
    let tmp = TempDir::new().expect("create tempdir");
    let orig: PathBuf = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");
    let out = f();
    env::set_current_dir(orig).expect("restore cwd");
    out
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 7373);
    assert_eq!(settings.server.web_root, "web");
    assert_eq!(settings.broker.capacity, 10);
    assert_eq!(settings.bind_addr(), "0.0.0.0:7373");
}

#[test]
fn test_merge_keeps_given_values_and_fills_the_rest() {
    let partial = PartialSettings {
        server: None,
        broker: Some(PartialBrokerSettings { capacity: Some(64) }),
    };
    let settings = Settings::merge(partial);
    assert_eq!(settings.broker.capacity, 64);
    assert_eq!(settings.server, Settings::default().server);
}

#[test]
#[serial]
fn test_load_config_without_sources_yields_defaults() {
    let cfg = in_temp_dir(|| load_config().expect("load_config failed"));
    assert_eq!(cfg, Settings::default());
}

#[test]
#[serial]
fn test_load_config_from_file_overrides_defaults() {
    let cfg = in_temp_dir(|| {
        fs::create_dir_all("config").expect("create config dir");
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [broker]
            capacity = 32
        "#;
        fs::write("config/default.toml", toml).expect("write config file");
        load_config().expect("load_config failed")
    });

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.server.web_root, "web");
    assert_eq!(cfg.broker.capacity, 32);
}

#[test]
#[serial]
fn test_load_config_from_env_overrides_defaults() {
    let cfg = temp_env::with_vars(
        [
            ("SPECULAR_SERVER__PORT", Some("9100")),
            ("SPECULAR_SERVER__WEB_ROOT", Some("/srv/chat")),
            ("SPECULAR_BROKER__CAPACITY", Some("3")),
        ],
        || in_temp_dir(|| load_config().expect("load_config failed")),
    );

    assert_eq!(cfg.server.port, 9100);
    assert_eq!(cfg.server.web_root, "/srv/chat");
    assert_eq!(cfg.broker.capacity, 3);
    assert_eq!(cfg.server.host, "0.0.0.0");
}
