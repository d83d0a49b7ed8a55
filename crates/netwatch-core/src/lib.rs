// netwatch-core: sampling pipeline between the OS, the lookup services, and the dashboard.

pub mod config;
pub mod counters;
pub mod error;
pub mod model;
pub mod monitor;
pub mod rate;
pub mod resolver;
pub mod sampler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::MonitorConfig;
pub use counters::CounterReader;
pub use error::CoreError;
pub use model::{Connection, CounterSample, EnrichedConnection, RateMeasurement, Snapshot};
pub use monitor::Monitor;
pub use resolver::{LOCATION_UNKNOWN, LookupFailures, PUBLIC_IP_ERROR, Resolver};
pub use sampler::{ConnectionSampler, parse_connection_table};
