//! Flow identity and the cumulative counter snapshot supplied by the
//! external stats source.

mod id;

pub use self::id::FlowId;

use std::{net::IpAddr, time::Duration};

/// Point-in-time snapshot of a flow's cumulative counters.
///
/// Supplied by the external stats source on every query, one per
/// [`FlowId`]. Every counter is cumulative since the flow first
/// appeared: in a well-behaved flow each field is monotonically
/// non-decreasing across samples. The monitor tolerates violations
/// (counter reset, reorder), see
/// [`IntervalDelta::between`](crate::delta::IntervalDelta::between).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    /// Address of the endpoint that originated the flow. Used for
    /// classification.
    pub source: IpAddr,
    /// Address of the endpoint the flow is directed at.
    pub destination: IpAddr,
    /// Total bytes received by the destination so far.
    pub rx_bytes: u64,
    /// Total packets sent by the source so far.
    pub tx_packets: u64,
    /// Total packets received by the destination so far.
    pub rx_packets: u64,
    /// Sum of the one-way delays of every received packet.
    pub delay_sum: Duration,
    /// Time of the first sent packet, relative to the run origin.
    pub first_tx_at: Duration,
    /// Time of the most recently received packet, relative to the run
    /// origin.
    pub last_rx_at: Duration,
}

impl FlowSnapshot {
    /// A snapshot with all counters at zero, flowing from `source` to
    /// `destination`.
    ///
    /// # Example
    ///
    /// ```
    /// # use flowmon_core::flow::FlowSnapshot;
    /// # use std::net::{IpAddr, Ipv4Addr};
    /// let snapshot = FlowSnapshot::empty(
    ///     IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1)),
    ///     IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2)),
    /// );
    /// assert_eq!(snapshot.rx_bytes, 0);
    /// assert_eq!(snapshot.tx_packets, 0);
    /// ```
    pub fn empty(source: IpAddr, destination: IpAddr) -> Self {
        Self {
            source,
            destination,
            rx_bytes: 0,
            tx_packets: 0,
            rx_packets: 0,
            delay_sum: Duration::ZERO,
            first_tx_at: Duration::ZERO,
            last_rx_at: Duration::ZERO,
        }
    }
}
