// ── Per-cycle data model ──
//
// Everything here is rebuilt from scratch on every sampling cycle; nothing
// carries identity from one cycle to the next.

use tokio::time::Instant;

/// An established TCP connection, identified by its remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub peer_address: String,
    pub peer_port: String,
}

impl Connection {
    pub fn new(peer_address: impl Into<String>, peer_port: impl Into<String>) -> Self {
        Self {
            peer_address: peer_address.into(),
            peer_port: peer_port.into(),
        }
    }
}

/// Cumulative interface byte counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub transmitted_bytes: u64,
    pub received_bytes: u64,
    pub timestamp: Instant,
}

impl CounterSample {
    /// Sample stamped with the current time.
    pub fn new(transmitted_bytes: u64, received_bytes: u64) -> Self {
        Self::at(transmitted_bytes, received_bytes, Instant::now())
    }

    pub fn at(transmitted_bytes: u64, received_bytes: u64, timestamp: Instant) -> Self {
        Self {
            transmitted_bytes,
            received_bytes,
            timestamp,
        }
    }
}

/// Transmit/receive throughput in kilobits per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateMeasurement {
    pub tx_kbps: f64,
    pub rx_kbps: f64,
    /// A counter went backwards (wrap or reset) and its delta was clamped to zero.
    pub clamped: bool,
}

impl RateMeasurement {
    pub fn new(tx_kbps: f64, rx_kbps: f64) -> Self {
        Self {
            tx_kbps,
            rx_kbps,
            clamped: false,
        }
    }

    /// Even share of this rate across `connections` connections.
    ///
    /// This is an approximation: the interface total divided by the
    /// connection count, not a per-flow measurement.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn split(&self, connections: usize) -> Option<Self> {
        if connections == 0 {
            return None;
        }
        let n = connections as f64;
        Some(Self {
            tx_kbps: self.tx_kbps / n,
            rx_kbps: self.rx_kbps / n,
            clamped: self.clamped,
        })
    }
}

/// A connection enriched with its location and bandwidth share.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedConnection {
    pub connection: Connection,
    pub location: String,
    /// `None` when the interface counters could not be read this cycle.
    pub share: Option<RateMeasurement>,
}

/// Everything the dashboard needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub public_address: String,
    /// `None` when the interface counters could not be read this cycle.
    pub total: Option<RateMeasurement>,
    pub connections: Vec<EnrichedConnection>,
}

impl Snapshot {
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
