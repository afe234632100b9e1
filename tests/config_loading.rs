use std::path::Path;

use figment::Jail;
use playback_metrics::config::{build_figment, extract};

const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:9191
logging:
  level: "debug"
  format: "console"
metrics:
  path: /scrape
"#;

#[test]
fn loads_yaml_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", TEST_CONFIG)?;

        let config = extract(&build_figment(Path::new("config.yaml"))).map_err(|e| e.to_string())?;
        assert_eq!(config.bind_address, "127.0.0.1:9191");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "console");
        assert_eq!(config.logging.service_name, "jellyfin-playback-metrics");
        assert_eq!(config.metrics.path, "/scrape");
        Ok(())
    });
}

#[test]
fn missing_file_falls_back_to_defaults() {
    Jail::expect_with(|_jail| {
        let config = extract(&build_figment(Path::new("absent.yaml"))).map_err(|e| e.to_string())?;
        assert_eq!(config.bind_address, "0.0.0.0:9090");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.metrics.path, "/metrics");
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", TEST_CONFIG)?;
        jail.set_env("PLAYBACK_METRICS_BIND_ADDRESS", "127.0.0.1:7070");
        jail.set_env("PLAYBACK_METRICS_LOGGING__LEVEL", "warn");
        jail.set_env("PLAYBACK_METRICS_CONFIG", "config.yaml");

        let config = extract(&build_figment(Path::new("config.yaml"))).map_err(|e| e.to_string())?;
        assert_eq!(config.bind_address, "127.0.0.1:7070");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.metrics.path, "/scrape");
        Ok(())
    });
}

#[test]
fn unsupported_version_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", "version: \"2.0.0\"\n")?;

        assert!(extract(&build_figment(Path::new("config.yaml"))).is_err());
        Ok(())
    });
}

#[test]
fn relative_metrics_path_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.yaml", "version: \"1.0.0\"\nmetrics:\n  path: metrics\n")?;

        let err = extract(&build_figment(Path::new("config.yaml"))).unwrap_err();
        assert!(err.to_string().contains("metrics.path must start with '/'"));
        Ok(())
    });
}
