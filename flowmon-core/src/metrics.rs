//! Per-interval derived metrics: throughput, packet-delivery ratio,
//! loss and mean one-way delay.

use crate::delta::IntervalDelta;
use std::time::Duration;

/// Rate-based metrics derived from one [`IntervalDelta`].
///
/// All fields are finite: the derivation replaces every NaN or
/// infinite intermediate with `0.0` and clamps the two percentages to
/// `[0, 100]`, so a single anomalous sample can never push a metric
/// outside its natural bound or corrupt downstream aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Received throughput in megabits per second.
    pub throughput_mbps: f64,
    /// Packet delivery ratio, percentage of sent packets received.
    pub pdr_percent: f64,
    /// Loss percentage, the complement of the (clamped) delivery
    /// ratio.
    pub loss_percent: f64,
    /// Mean one-way delay of the packets received this interval, in
    /// milliseconds.
    pub delay_ms: f64,
}

/// Replace NaN and infinities with `0.0`.
fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn clamp_percent(value: f64) -> f64 {
    sanitize(value).clamp(0.0, 100.0)
}

impl Metrics {
    /// Derive the interval metrics from a delta and the interval
    /// length.
    ///
    /// The caller is expected to pass a non-zero interval (the sampling
    /// cadence); a zero interval yields zero throughput rather than a
    /// division error.
    ///
    /// An interval with no sent packets reports `pdr = 0` and
    /// `loss = 0`, an explicit zero-traffic policy that is deliberately
    /// distinct from 100% loss. An interval with no received packets
    /// reports a zero delay.
    ///
    /// # Example
    ///
    /// ```
    /// # use flowmon_core::{delta::IntervalDelta, metrics::Metrics};
    /// # use std::time::Duration;
    /// let delta = IntervalDelta {
    ///     rx_bytes: 125_000,
    ///     tx_packets: 200,
    ///     rx_packets: 198,
    ///     delay: Duration::from_millis(500),
    /// };
    ///
    /// let metrics = Metrics::derive(&delta, Duration::from_secs(1));
    ///
    /// assert_eq!(metrics.throughput_mbps, 1.0); // 125_000 * 8 / 1e6
    /// assert_eq!(metrics.pdr_percent, 99.0);
    /// assert_eq!(metrics.loss_percent, 1.0);
    /// ```
    pub fn derive(delta: &IntervalDelta, interval: Duration) -> Self {
        let interval_secs = interval.as_secs_f64();

        let throughput_mbps = if interval_secs > 0.0 {
            (delta.rx_bytes as f64 * 8.0 / interval_secs) / 1e6
        } else {
            0.0
        };

        let (pdr_percent, loss_percent) = if delta.tx_packets > 0 {
            let pdr = clamp_percent(delta.rx_packets as f64 / delta.tx_packets as f64 * 100.0);
            // loss is derived from the already-clamped pdr
            let loss = clamp_percent(100.0 - pdr);
            (pdr, loss)
        } else {
            (0.0, 0.0)
        };

        let delay_ms = if delta.rx_packets > 0 {
            sanitize(delta.delay.as_secs_f64() / delta.rx_packets as f64 * 1_000.0)
        } else {
            0.0
        };

        Self {
            throughput_mbps,
            pdr_percent,
            loss_percent,
            delay_ms,
        }
    }
}
