//! Human-readable bandwidth formatting.

use netwatch_core::RateMeasurement;

/// At or above this many kbps (in either direction) both directions are shown in Mbps.
const MEGABIT_THRESHOLD_KBPS: f64 = 1024.0;

/// Shown in place of a rate when interface counters are unavailable.
pub const RATE_UNAVAILABLE: &str = "N/A";

/// Format a TX/RX kbps pair as "TX: 500 Kbps, RX: 300 Kbps".
///
/// One direction crossing the threshold switches *both* to Mbps, so the
/// pair always shares a unit.
pub fn format_bandwidth(tx_kbps: f64, rx_kbps: f64) -> String {
    if tx_kbps >= MEGABIT_THRESHOLD_KBPS || rx_kbps >= MEGABIT_THRESHOLD_KBPS {
        format!(
            "TX: {:.2} Mbps, RX: {:.2} Mbps",
            tx_kbps / MEGABIT_THRESHOLD_KBPS,
            rx_kbps / MEGABIT_THRESHOLD_KBPS
        )
    } else {
        format!("TX: {tx_kbps:.0} Kbps, RX: {rx_kbps:.0} Kbps")
    }
}

/// Format an optional measurement, falling back to [`RATE_UNAVAILABLE`].
pub fn format_measurement(measurement: Option<&RateMeasurement>) -> String {
    measurement.map_or_else(
        || RATE_UNAVAILABLE.to_owned(),
        |m| format_bandwidth(m.tx_kbps, m.rx_kbps),
    )
}
