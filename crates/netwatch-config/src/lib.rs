//! Configuration for the netwatch dashboard.
//!
//! TOML file + `NETWATCH_*` environment, layered over documented defaults,
//! and translation to [`netwatch_core::MonitorConfig`]. The TUI applies its
//! command-line overrides on top of the result; the setup utility writes
//! the defaults out with [`save_config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netwatch_core::MonitorConfig;
use netwatch_core::config::{
    DEFAULT_GEO_URL, DEFAULT_INTERFACE, DEFAULT_PUBLIC_IP_URL, DEFAULT_STATS_ROOT,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

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
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Config {
    /// What to sample and how often.
    #[serde(default)]
    pub monitor: MonitorSection,

    /// External lookup services.
    #[serde(default)]
    pub services: ServicesSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorSection {
    #[serde(default = "default_interface")]
    pub interface: String,

    #[serde(default = "default_stats_root")]
    pub stats_root: PathBuf,

    /// Program and arguments printing the TCP connection table.
    #[serde(default = "default_connection_command")]
    pub connection_command: Vec<String>,

    /// Counter sampling window, milliseconds.
    #[serde(default = "default_sample_window_ms")]
    pub sample_window_ms: u64,

    /// Sleep between dashboard refreshes, milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            stats_root: default_stats_root(),
            connection_command: default_connection_command(),
            sample_window_ms: default_sample_window_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServicesSection {
    #[serde(default = "default_public_ip_url")]
    pub public_ip_url: String,

    #[serde(default = "default_geo_url")]
    pub geo_url: String,

    /// Per-request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ServicesSection {
    fn default() -> Self {
        Self {
            public_ip_url: default_public_ip_url(),
            geo_url: default_geo_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_interface() -> String {
    DEFAULT_INTERFACE.into()
}
fn default_stats_root() -> PathBuf {
    PathBuf::from(DEFAULT_STATS_ROOT)
}
fn default_connection_command() -> Vec<String> {
    vec!["netstat".into(), "-tn".into()]
}
fn default_sample_window_ms() -> u64 {
    2_000
}
fn default_refresh_interval_ms() -> u64 {
    2_000
}
fn default_public_ip_url() -> String {
    DEFAULT_PUBLIC_IP_URL.into()
}
fn default_geo_url() -> String {
    DEFAULT_GEO_URL.into()
}
fn default_timeout() -> u64 {
    10
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "netwatch", "netwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is not
/// an error: defaults (and any `NETWATCH_*` variables) apply.
///
/// Environment keys use `__` as the section separator, e.g.
/// `NETWATCH_MONITOR__INTERFACE=wlan0`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("NETWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to MonitorConfig ────────────────────────────────────

impl Config {
    /// Validate and convert into the runtime [`MonitorConfig`].
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let m = &self.monitor;
        let s = &self.services;

        validate_interface(&m.interface)?;
        if m.connection_command.is_empty() {
            return Err(invalid("monitor.connection_command", "must name a program"));
        }
        if m.sample_window_ms == 0 {
            return Err(invalid("monitor.sample_window_ms", "must be greater than zero"));
        }
        if s.timeout == 0 {
            return Err(invalid("services.timeout", "must be greater than zero"));
        }
        validate_url("services.public_ip_url", &s.public_ip_url)?;
        validate_url("services.geo_url", &s.geo_url)?;

        Ok(MonitorConfig {
            interface: m.interface.clone(),
            stats_root: m.stats_root.clone(),
            connection_command: m.connection_command.clone(),
            sample_window: Duration::from_millis(m.sample_window_ms),
            refresh_interval: Duration::from_millis(m.refresh_interval_ms),
            public_ip_url: s.public_ip_url.clone(),
            geo_url: s.geo_url.clone(),
            timeout: Duration::from_secs(s.timeout),
        })
    }
}

/// Interface names are single path components.
pub fn validate_interface(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(invalid(
            "monitor.interface",
            &format!("'{name}' is not an interface name"),
        ));
    }
    Ok(())
}

fn validate_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    url::Url::parse(raw)
        .map(|_| ())
        .map_err(|e| invalid(field, &format!("invalid URL '{raw}': {e}")))
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_match_monitor_defaults() {
        let monitor = Config::default().to_monitor_config().unwrap();
        assert_eq!(monitor, MonitorConfig::default());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.monitor.sample_window_ms, 2_000);
        assert_eq!(cfg.services.geo_url, DEFAULT_GEO_URL);
    }

    #[test]
    fn file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[monitor]\ninterface = \"wlan0\"\nrefresh_interval_ms = 5000\n\n[services]\ntimeout = 3\n",
        )
        .unwrap();

        let monitor = load_config_from(&path).unwrap().to_monitor_config().unwrap();
        assert_eq!(monitor.interface, "wlan0");
        assert_eq!(monitor.refresh_interval, Duration::from_secs(5));
        assert_eq!(monitor.sample_window, Duration::from_secs(2));
        assert_eq!(monitor.timeout, Duration::from_secs(3));
        assert_eq!(monitor.public_ip_url, DEFAULT_PUBLIC_IP_URL);
    }

    #[test]
    fn saved_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.monitor.interface = "enp3s0".into();

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn rejects_bad_interface() {
        let mut cfg = Config::default();
        cfg.monitor.interface = "../etc".into();
        let err = cfg.to_monitor_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "monitor.interface"));
    }

    #[test]
    fn rejects_zero_sample_window() {
        let mut cfg = Config::default();
        cfg.monitor.sample_window_ms = 0;
        assert!(cfg.to_monitor_config().is_err());
    }

    #[test]
    fn rejects_bad_service_url() {
        let mut cfg = Config::default();
        cfg.services.public_ip_url = "ifconfig dot me".into();
        let err = cfg.to_monitor_config().unwrap_err();
        assert!(err.to_string().contains("services.public_ip_url"));
    }
}
