// ── Lookup resolvers ──
//
// Wrap the raw lookup clients with the dashboard's fallback contract:
// resolvers never return errors. Every absorbed failure is logged and
// counted so it stays observable.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use tracing::warn;
use url::Url;

use netwatch_api::{GeoClient, PublicIpClient, TransportConfig};

use crate::config::MonitorConfig;
use crate::error::CoreError;
use crate::model::Connection;

/// Shown when an address cannot be geolocated.
pub const LOCATION_UNKNOWN: &str = "Location Unknown";
/// Shown when the public address cannot be fetched.
pub const PUBLIC_IP_ERROR: &str = "Error fetching public IP";

/// Running totals of absorbed lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupFailures {
    pub geolocation: u64,
    pub public_address: u64,
}

/// Geolocation and public-address resolution with fallbacks.
pub struct Resolver {
    geo: GeoClient,
    public_ip: PublicIpClient,
    geo_failures: AtomicU64,
    public_ip_failures: AtomicU64,
}

impl Resolver {
    pub fn new(geo: GeoClient, public_ip: PublicIpClient) -> Self {
        Self {
            geo,
            public_ip,
            geo_failures: AtomicU64::new(0),
            public_ip_failures: AtomicU64::new(0),
        }
    }

    /// Build both lookup clients from the monitor configuration.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::with_timeout(config.timeout);
        let geo_url = parse_url("geo_url", &config.geo_url)?;
        let public_ip_url = parse_url("public_ip_url", &config.public_ip_url)?;
        Ok(Self::new(
            GeoClient::new(geo_url, &transport)?,
            PublicIpClient::new(public_ip_url, &transport)?,
        ))
    }

    /// `"city, country"` for `address`, or [`LOCATION_UNKNOWN`].
    pub async fn resolve(&self, address: &str) -> String {
        match self.geo.lookup(address).await {
            Ok(location) => location.to_string(),
            Err(e) => {
                self.geo_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    address,
                    kind = e.kind(),
                    transient = e.is_transient(),
                    error = %e,
                    "geolocation lookup failed"
                );
                LOCATION_UNKNOWN.to_owned()
            }
        }
    }

    /// This host's public address, or [`PUBLIC_IP_ERROR`].
    pub async fn resolve_self(&self) -> String {
        match self.public_ip.fetch().await {
            Ok(address) => address,
            Err(e) => {
                self.public_ip_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    kind = e.kind(),
                    transient = e.is_transient(),
                    error = %e,
                    "public address lookup failed"
                );
                PUBLIC_IP_ERROR.to_owned()
            }
        }
    }

    /// Resolve every distinct peer address of `connections` concurrently.
    ///
    /// Issues exactly one lookup per distinct address and returns once all
    /// of them have completed, keyed by address in first-seen order.
    pub async fn resolve_all(&self, connections: &[Connection]) -> IndexMap<String, String> {
        let distinct: IndexSet<&str> = connections
            .iter()
            .map(|c| c.peer_address.as_str())
            .collect();

        let lookups = distinct
            .into_iter()
            .map(|address| async move { (address.to_owned(), self.resolve(address).await) });

        join_all(lookups).await.into_iter().collect()
    }

    /// Failures absorbed so far.
    pub fn failures(&self) -> LookupFailures {
        LookupFailures {
            geolocation: self.geo_failures.load(Ordering::Relaxed),
            public_address: self.public_ip_failures.load(Ordering::Relaxed),
        }
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, CoreError> {
    Url::parse(raw).map_err(|e| CoreError::Config {
        message: format!("invalid {field} '{raw}': {e}"),
    })
}
