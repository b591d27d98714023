use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;

use std::{env, fs, path::Path, sync::Arc, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "https://api.adsmedia.live/v1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, alias = "ApiKey")]
    pub api_key: String,
    #[serde(default, alias = "DefaultFromName")]
    pub default_from_name: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub command_token: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl Config {
    /// The part of the config that can be swapped at runtime.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            api_key: self.api_key.clone(),
            default_from_name: self.default_from_name.clone(),
        }
    }
}

/// Credentials and sender defaults read on every command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub api_key: String,
    pub default_from_name: String,
}

/// Shared, replaceable [`Configuration`].
///
/// Readers get an `Arc` snapshot, so a concurrent `set` never changes
/// values under an in-flight invocation.
#[derive(Debug, Default)]
pub struct ConfigurationHolder {
    current: RwLock<Option<Arc<Configuration>>>,
}

impl ConfigurationHolder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(configuration))),
        }
    }

    /// Returns the last configuration set, or an empty one if none was.
    pub async fn get(&self) -> Arc<Configuration> {
        self.current.read().await.clone().unwrap_or_default()
    }

    pub async fn set(&self, configuration: Configuration) {
        *self.current.write().await = Some(Arc::new(configuration));
    }
}

pub type ConfigError = Box<dyn std::error::Error + Send + Sync>;

fn load_from_env() -> Result<Config, ConfigError> {
    config_from_vars(|name| env::var(name).ok())
}

fn config_from_vars<F>(var: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = match var("PORT") {
        Some(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {}", e))?,
        None => DEFAULT_PORT,
    };

    Ok(Config {
        port,
        api_key: var("ADSMEDIA_API_KEY").unwrap_or_default(),
        default_from_name: var("ADSMEDIA_DEFAULT_FROM_NAME").unwrap_or_default(),
        api_base_url: var("ADSMEDIA_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        command_token: var("ADSMEDIA_COMMAND_TOKEN").filter(|token| !token.is_empty()),
        request_timeout: None,
    })
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

/// Loads the service config from the first file found, then from the environment.
///
/// Lookup order: `$ADSMEDIA_COMMAND_CONFIG`, `config.yaml`, `config.example.yaml`.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path =
        env::var("ADSMEDIA_COMMAND_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    for fallback in ["config.yaml", "config.example.yaml"] {
        if Path::new(fallback).exists() {
            tracing::warn!(
                "Config file '{}' not found, falling back to '{}'",
                config_path,
                fallback
            );
            return load_from_file(fallback);
        }
    }

    tracing::info!(
        "No config file found, loading ADSMedia settings from environment variables"
    );
    load_from_env().map_err(|e| {
        ConfigError::from(format!(
            "No config file found ('{}', 'config.yaml', 'config.example.yaml') \
             and environment configuration is invalid: {}",
            config_path, e
        ))
    })
}

/// Swaps in the credentials from a fresh `load`. On failure the held
/// snapshot is left untouched.
pub async fn reload<F>(holder: &ConfigurationHolder, load: F) -> Result<(), ConfigError>
where
    F: FnOnce() -> Result<Config, ConfigError>,
{
    let cfg = load()?;
    holder.set(cfg.configuration()).await;
    Ok(())
}
