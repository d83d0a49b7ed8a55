// ── Rate estimator ──
//
// kbps = (bytes_delta * 8) / 1024 / Δt. Pure; no I/O.

use crate::model::{CounterSample, RateMeasurement};

const BITS_PER_BYTE: f64 = 8.0;
const BITS_PER_KILOBIT: f64 = 1024.0;

/// Estimate tx/rx throughput between two samples taken `dt_secs` apart.
///
/// A counter that went backwards (wraparound or interface reset) yields a
/// zero rate for that direction and sets `clamped`. A non-positive or
/// non-finite `dt_secs` yields zero rates with `clamped` set.
pub fn estimate(before: &CounterSample, after: &CounterSample, dt_secs: f64) -> RateMeasurement {
    if !dt_secs.is_finite() || dt_secs <= 0.0 {
        return RateMeasurement {
            clamped: true,
            ..RateMeasurement::default()
        };
    }

    let (tx_delta, tx_clamped) = delta(before.transmitted_bytes, after.transmitted_bytes);
    let (rx_delta, rx_clamped) = delta(before.received_bytes, after.received_bytes);

    RateMeasurement {
        tx_kbps: to_kbps(tx_delta, dt_secs),
        rx_kbps: to_kbps(rx_delta, dt_secs),
        clamped: tx_clamped || rx_clamped,
    }
}

fn delta(before: u64, after: u64) -> (u64, bool) {
    after.checked_sub(before).map_or((0, true), |d| (d, false))
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_kbps(bytes: u64, dt_secs: f64) -> f64 {
    (bytes as f64 * BITS_PER_BYTE) / BITS_PER_KILOBIT / dt_secs
}
