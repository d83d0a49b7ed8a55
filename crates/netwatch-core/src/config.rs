// ── Runtime monitor configuration ──
//
// Describes *what* to sample and *where* to enrich it. Never touches disk:
// the TUI (via `netwatch-config`) constructs a `MonitorConfig` and hands
// it to `Monitor::new`.

use std::path::PathBuf;
use std::time::Duration;

/// Default network interface whose counters are sampled.
pub const DEFAULT_INTERFACE: &str = "eth0";
/// Default location of per-interface statistics directories.
pub const DEFAULT_STATS_ROOT: &str = "/sys/class/net";
/// Default public-address service (plain-text body).
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://ifconfig.me";
/// Default geolocation service base URL (`/json/{address}` is appended).
pub const DEFAULT_GEO_URL: &str = "http://ip-api.com";

/// Configuration for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Interface whose tx/rx counters are sampled (default `eth0`).
    pub interface: String,
    /// Directory containing `<iface>/statistics/{tx,rx}_bytes`.
    pub stats_root: PathBuf,
    /// Program and arguments that print the TCP connection table.
    pub connection_command: Vec<String>,
    /// Gap between the two counter samples of one rate measurement.
    pub sample_window: Duration,
    /// Sleep between dashboard iterations.
    pub refresh_interval: Duration,
    /// Public-address lookup URL.
    pub public_ip_url: String,
    /// Geolocation service base URL.
    pub geo_url: String,
    /// Per-request timeout for both lookup services.
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interface: DEFAULT_INTERFACE.into(),
            stats_root: PathBuf::from(DEFAULT_STATS_ROOT),
            connection_command: vec!["netstat".into(), "-tn".into()],
            sample_window: Duration::from_secs(2),
            refresh_interval: Duration::from_secs(2),
            public_ip_url: DEFAULT_PUBLIC_IP_URL.into(),
            geo_url: DEFAULT_GEO_URL.into(),
            timeout: Duration::from_secs(10),
        }
    }
}
