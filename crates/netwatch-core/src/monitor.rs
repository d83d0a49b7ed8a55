// ── Monitor: one full sampling cycle ──
//
// Sampler + counter reader → rate estimator → resolvers → `Snapshot`.
// The session loop calls `snapshot()` once per iteration; nothing in here
// ever fails the cycle. OS-level failures degrade to an empty table or an
// unavailable bandwidth figure.

use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::counters::CounterReader;
use crate::error::CoreError;
use crate::model::{Connection, EnrichedConnection, RateMeasurement, Snapshot};
use crate::rate;
use crate::resolver::{LOCATION_UNKNOWN, LookupFailures, Resolver};
use crate::sampler::ConnectionSampler;

pub struct Monitor {
    config: MonitorConfig,
    sampler: ConnectionSampler,
    counters: CounterReader,
    resolver: Resolver,
    /// Set once an interface-unavailable warning has been logged.
    counters_warned: AtomicBool,
}

impl Monitor {
    /// Build the sampler, counter reader, and lookup clients.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let sampler = ConnectionSampler::new(&config.connection_command)?;
        let counters = CounterReader::new(config.stats_root.clone());
        let resolver = Resolver::from_config(&config)?;
        Ok(Self {
            config,
            sampler,
            counters,
            resolver,
            counters_warned: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Absorbed lookup failures since startup.
    pub fn lookup_failures(&self) -> LookupFailures {
        self.resolver.failures()
    }

    /// Current established connections; an empty list if sampling failed.
    pub async fn connections(&self) -> Vec<Connection> {
        match self.sampler.sample().await {
            Ok(connections) => connections,
            Err(e) => {
                warn!(error = %e, "connection sampling failed");
                Vec::new()
            }
        }
    }

    /// Measure interface throughput over one `sample_window`.
    pub async fn measure(&self) -> Result<RateMeasurement, CoreError> {
        let interface = &self.config.interface;
        let before = self.counters.read(interface)?;
        tokio::time::sleep(self.config.sample_window).await;
        let after = self.counters.read(interface)?;

        let dt = after
            .timestamp
            .saturating_duration_since(before.timestamp)
            .as_secs_f64();
        let measurement = rate::estimate(&before, &after, dt);
        if measurement.clamped {
            warn!(
                interface,
                tx_before = before.transmitted_bytes,
                tx_after = after.transmitted_bytes,
                rx_before = before.received_bytes,
                rx_after = after.received_bytes,
                "interface counters went backwards, rate clamped to zero"
            );
        }
        Ok(measurement)
    }

    /// Run one full cycle: sample, measure, resolve.
    pub async fn snapshot(&self) -> Snapshot {
        let connections = self.connections().await;

        let total = match self.measure().await {
            Ok(measurement) => {
                self.counters_warned.store(false, Ordering::Relaxed);
                Some(measurement)
            }
            Err(e) => {
                if e.is_interface_unavailable() && self.counters_warned.swap(true, Ordering::Relaxed) {
                    debug!(error = %e, "interface counters still unavailable");
                } else {
                    warn!(error = %e, "failed to read interface counters");
                }
                None
            }
        };

        let (public_address, locations) = tokio::join!(
            self.resolver.resolve_self(),
            self.resolver.resolve_all(&connections),
        );

        debug!(
            connections = connections.len(),
            distinct_peers = locations.len(),
            "sampling cycle complete"
        );

        Snapshot {
            public_address,
            total,
            connections: enrich(connections, &locations, total.as_ref()),
        }
    }
}

/// Attach locations and an even bandwidth share to each connection.
pub fn enrich(
    connections: Vec<Connection>,
    locations: &IndexMap<String, String>,
    total: Option<&RateMeasurement>,
) -> Vec<EnrichedConnection> {
    let share = total.and_then(|t| t.split(connections.len()));
    connections
        .into_iter()
        .map(|connection| {
            let location = locations
                .get(&connection.peer_address)
                .cloned()
                .unwrap_or_else(|| LOCATION_UNKNOWN.to_owned());
            EnrichedConnection {
                connection,
                location,
                share,
            }
        })
        .collect()
}
