//! Configuration for the ripwatch dashboard.
//!
//! TOML file in the platform config directory, layered under `RIPWATCH_`
//! environment variables, plus the small `state.toml` that remembers the
//! chosen display language between runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use ripwatch_core::{CoreError, DEFAULT_LANGUAGE, LanguageStore, PollerConfig, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse state file: {0}")]
    State(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub polling: Polling,

    #[serde(default)]
    pub ui: Ui,
}

/// Where the ripper service lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Server {
    /// Service base URL (e.g. "http://ripper.local:5000").
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Polling {
    #[serde(default = "default_status_interval")]
    pub status_interval_ms: u64,

    #[serde(default = "default_logs_interval")]
    pub logs_interval_ms: u64,

    /// Lines requested from the log tail endpoint.
    #[serde(default = "default_log_lines")]
    pub log_lines: u32,
}

impl Default for Polling {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval(),
            logs_interval_ms: default_logs_interval(),
            log_lines: default_log_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ui {
    /// Language used when no preference has been saved yet.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Seconds an alert stays on screen.
    #[serde(default = "default_alert_secs")]
    pub alert_secs: u64,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            alert_secs: default_alert_secs(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_status_interval() -> u64 {
    2000
}
fn default_logs_interval() -> u64 {
    3000
}
fn default_log_lines() -> u32 {
    100
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.into()
}
fn default_alert_secs() -> u64 {
    5
}

// ── Translation into runtime settings ───────────────────────────────

impl Config {
    /// The validated service URL.
    pub fn server_url(&self) -> Result<url::Url, ConfigError> {
        self.server
            .url
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "server.url".into(),
                reason: format!("{e}: {}", self.server.url),
            })
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.server.timeout_secs),
            accept_invalid_certs: self.server.insecure,
        }
    }

    /// Poll cadence. Zero intervals are bumped to the defaults, since
    /// `tokio::time::interval` rejects a zero period.
    pub fn poller(&self) -> PollerConfig {
        let ms = |value: u64, fallback: u64| {
            Duration::from_millis(if value == 0 { fallback } else { value })
        };
        PollerConfig {
            status_interval: ms(self.polling.status_interval_ms, default_status_interval()),
            logs_interval: ms(self.polling.logs_interval_ms, default_logs_interval()),
            log_lines: self.polling.log_lines,
        }
    }

    pub fn alert_lifetime(&self) -> Duration {
        Duration::from_secs(self.ui.alert_secs)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "ripwatch", "ripwatch").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("ripwatch");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where persisted client state (language preference) lives.
pub fn state_path() -> PathBuf {
    config_dir().join("state.toml")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if present), then `RIPWATCH_`
/// variables with `__` separating sections (`RIPWATCH_SERVER__URL`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("RIPWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    write_toml(path, cfg)
}

fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(value)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Language preference ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

/// The display language remembered in `state.toml`.
#[derive(Debug, Clone)]
pub struct LanguagePreference {
    path: PathBuf,
}

impl LanguagePreference {
    /// Preference stored at the canonical state path.
    pub fn new() -> Self {
        Self::at(state_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<State, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(State::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageStore for LanguagePreference {
    fn load(&self) -> Option<String> {
        match self.read() {
            Ok(state) => state.language,
            Err(e) => {
                debug!(error = %e, "ignoring unreadable state file");
                None
            }
        }
    }

    fn save(&mut self, code: &str) -> Result<(), CoreError> {
        let mut state = self.read().unwrap_or_default();
        state.language = Some(code.to_owned());
        write_toml(&self.path, &state).map_err(|e| CoreError::Persistence {
            message: e.to_string(),
        })
    }
}
