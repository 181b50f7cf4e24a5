//! Interval deltas: the portion of a cumulative counter's growth
//! attributable to one sampling interval.

use crate::flow::FlowSnapshot;
use std::time::Duration;

/// The growth of a flow's cumulative counters over one sampling
/// interval.
///
/// Produced by [`IntervalDelta::between`] from the current snapshot and
/// the last observed one. Every field is guaranteed non-negative no
/// matter how anomalous the input counters are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalDelta {
    /// Bytes received during the interval.
    pub rx_bytes: u64,
    /// Packets sent during the interval.
    pub tx_packets: u64,
    /// Packets received during the interval.
    pub rx_packets: u64,
    /// One-way delay accumulated by packets received during the
    /// interval.
    pub delay: Duration,
}

/// Safe subtraction of two cumulative counter values.
///
/// A current value below the last observed one means the counter was
/// reset; `current` then already reflects the post-reset accumulation
/// and is taken verbatim.
fn counter_delta(current: u64, last: u64) -> u64 {
    if current >= last { current - last } else { current }
}

fn duration_delta(current: Duration, last: Duration) -> Duration {
    if current >= last { current - last } else { current }
}

impl IntervalDelta {
    /// The all-zero delta.
    pub const ZERO: Self = Self {
        rx_bytes: 0,
        tx_packets: 0,
        rx_packets: 0,
        delay: Duration::ZERO,
    };

    /// Compute the delta between `current` and the last observed
    /// snapshot for the same flow.
    ///
    /// On the flow's first appearance there is no last snapshot and the
    /// delta equals the current values verbatim (the implicit last is
    /// zero). Otherwise each field is subtracted independently, falling
    /// back to the current value whenever the counter went backwards.
    ///
    /// This is a pure function: the caller is responsible for storing
    /// `current` in the [`FlowRegistry`] afterwards.
    ///
    /// # Example
    ///
    /// ```
    /// # use flowmon_core::{delta::IntervalDelta, flow::FlowSnapshot};
    /// # use std::net::{IpAddr, Ipv4Addr};
    /// # use std::time::Duration;
    /// # let src = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
    /// # let dst = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));
    /// let mut current = FlowSnapshot::empty(src, dst);
    /// current.rx_bytes = 125_000;
    /// current.tx_packets = 200;
    ///
    /// // first sample: no last snapshot, delta is the raw counters
    /// let delta = IntervalDelta::between(&current, None);
    /// assert_eq!(delta.rx_bytes, 125_000);
    /// assert_eq!(delta.tx_packets, 200);
    /// ```
    ///
    /// [`FlowRegistry`]: crate::registry::FlowRegistry
    pub fn between(current: &FlowSnapshot, last: Option<&FlowSnapshot>) -> Self {
        let Some(last) = last else {
            return Self {
                rx_bytes: current.rx_bytes,
                tx_packets: current.tx_packets,
                rx_packets: current.rx_packets,
                delay: current.delay_sum,
            };
        };

        Self {
            rx_bytes: counter_delta(current.rx_bytes, last.rx_bytes),
            tx_packets: counter_delta(current.tx_packets, last.tx_packets),
            rx_packets: counter_delta(current.rx_packets, last.rx_packets),
            delay: duration_delta(current.delay_sum, last.delay_sum),
        }
    }

    /// Whether the interval carried observable activity.
    ///
    /// An interval is active when the source sent at least one packet
    /// or the destination received at least one byte. Only active
    /// intervals are worth a time-series record.
    pub fn has_activity(&self) -> bool {
        self.tx_packets > 0 || self.rx_bytes > 0
    }
}
