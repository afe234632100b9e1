use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use crate::error::{Error, Result};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PLAYBACK_METRICS_CONFIG";
/// Prefix of environment overrides, e.g. `PLAYBACK_METRICS_LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "PLAYBACK_METRICS_";

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for ConfigV1 {
    fn default() -> Self {
        ConfigV1 {
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Where the scrape endpoint is mounted.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            path: default_metrics_path(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:9090".to_string()
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

/// Built-in defaults, then the YAML file at `path`, then environment overrides.
pub fn build_figment(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
}

/// Extract a validated config from any figment.
pub fn extract(figment: &Figment) -> Result<ConfigV1> {
    let config = match figment.extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };

    if !config.metrics.path.starts_with('/') {
        return Err(Error::Config(Box::new(figment::Error::from(format!(
            "metrics.path must start with '/', got '{}'",
            config.metrics.path
        )))));
    }

    Ok(config)
}

/// Load config from `$PLAYBACK_METRICS_CONFIG`, or "config.yaml" in the current directory.
///
/// A missing file is not an error; defaults and environment overrides still apply.
pub fn load_config() -> Result<ConfigV1> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    extract(&build_figment(&path))
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<()> {
    let schema = schema_for!(Config);
    let rendered =
        serde_json::to_string_pretty(&schema).map_err(|e| Error::Encoding(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
