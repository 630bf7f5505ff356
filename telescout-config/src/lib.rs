//! Loader for Telescout configuration with YAML + environment overlays.
//!
//! A `telescout.yaml` file provides the base settings; `TELESCOUT__`-prefixed
//! environment variables override individual keys, and `${VAR}` placeholders
//! inside string values are expanded from the environment before the typed
//! config is materialised.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct ScoutConfig {
    pub version: Option<String>,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Credentials and session location for the Telegram client.
#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    pub api_id: i32,
    pub api_hash: String,
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct BrowserConfig {
    /// Explicit Chrome/Chromium binary. When unset, discovery is left to
    /// the browser layer.
    #[serde(default)]
    pub chrome_bin: Option<String>,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Number of search-result pages scraped per query.
    #[serde(default = "default_pages")]
    pub pages: u32,
    /// Maximum messages fetched per resolved channel.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Explicit log directory. When unset, the observability layer falls
    /// back to `TELESCOUT_LOG_DIR` and then the user data dir.
    #[serde(default)]
    pub dir: Option<String>,
    /// Duplicate log events to stderr in addition to the file sink.
    #[serde(default)]
    pub stderr: bool,
    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chrome_bin: None,
            headless: default_headless(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            message_limit: default_message_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            stderr: false,
            format: default_log_format(),
        }
    }
}

fn default_session_file() -> String {
    "telescout.session".into()
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_headless() -> bool {
    true
}
fn default_pages() -> u32 {
    2
}
fn default_message_limit() -> usize {
    5
}
fn default_log_format() -> String {
    "text".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start with sensible defaults: YAML file + `TELESCOUT__` env overrides.
    ///
    /// ```
    /// use telescout_config::ScoutConfigLoader;
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("telegram:\n  api_id: 12345\n  api_hash: \"ab12\"")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.telegram.api_id, 12345);
    /// assert_eq!(config.search.pages, 2);
    /// assert_eq!(config.server.port, 8080);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("TELESCOUT").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders in string values are expanded (recursively, up
    /// to a fixed depth) before the typed structs are produced.
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScoutConfig =
            serde_json::from_value(v).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
