//! Deterministic, seedable stand-in for an external stats source.
//!
//! [`SyntheticSource`] fabricates cumulative counter streams; it
//! moves no packets. Every random decision (per-packet loss, delay
//! jitter) is drawn from a single [`ChaChaRng`], so a given seed
//! always produces the same stream. Used by the examples, the benches
//! and the tests as the external collaborator the monitor samples.

use crate::{
    flow::{FlowId, FlowSnapshot},
    source::StatsSource,
};
use rand_chacha::ChaChaRng;
use rand_core::{Rng, SeedableRng as _};
use std::{net::IpAddr, time::Duration};

/// The traffic shape of one synthetic flow.
#[derive(Debug, Clone)]
pub struct FlowProfile {
    /// Originating endpoint.
    pub source: IpAddr,
    /// Receiving endpoint.
    pub destination: IpAddr,
    /// Packets the source emits per second of synthetic time.
    pub packets_per_sec: u64,
    /// Size of every packet in bytes.
    pub packet_size: u64,
    /// Probability that a sent packet never arrives (`0.0..=1.0`).
    pub loss: f64,
    /// Nominal one-way delay of a delivered packet. Each delivery is
    /// jittered up to +25% of this value.
    pub delay: Duration,
}

struct SyntheticFlow {
    id: FlowId,
    profile: FlowProfile,
    counters: FlowSnapshot,
}

/// A deterministic counter fabricator implementing [`StatsSource`].
///
/// Time only moves when [`advance`](SyntheticSource::advance) is
/// called; querying the snapshot is pure. This keeps the source
/// independent of the sampler's cadence: the driver decides how much
/// synthetic traffic elapses between queries.
///
/// # Example
///
/// ```
/// # use flowmon_core::synthetic::{FlowProfile, SyntheticSource};
/// # use flowmon_core::StatsSource;
/// # use std::net::{IpAddr, Ipv4Addr};
/// # use std::time::Duration;
/// let mut source = SyntheticSource::new(42);
/// let flow = source.add_flow(FlowProfile {
///     source: IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1)),
///     destination: IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2)),
///     packets_per_sec: 488,
///     packet_size: 512,
///     loss: 0.0,
///     delay: Duration::from_millis(5),
/// });
///
/// source.advance(Duration::from_secs(1));
///
/// let (id, counters) = source.snapshot().unwrap().remove(0);
/// assert_eq!(id, flow);
/// assert_eq!(counters.tx_packets, 488);
/// assert_eq!(counters.rx_bytes, 488 * 512);
/// ```
pub struct SyntheticSource {
    flows: Vec<SyntheticFlow>,
    next_id: FlowId,
    rng: ChaChaRng,
    elapsed: Duration,
}

impl SyntheticSource {
    /// Create an empty source. The same seed always yields the same
    /// counter streams.
    pub fn new(seed: u64) -> Self {
        Self {
            flows: Vec::new(),
            next_id: FlowId::ONE,
            rng: ChaChaRng::seed_from_u64(seed),
            elapsed: Duration::ZERO,
        }
    }

    /// Register a flow and return the identifier it will report under.
    ///
    /// Identifiers are assigned sequentially starting at
    /// [`FlowId::ONE`].
    pub fn add_flow(&mut self, profile: FlowProfile) -> FlowId {
        let id = self.next_id;
        self.next_id = id.next();

        let counters = FlowSnapshot::empty(profile.source, profile.destination);
        self.flows.push(SyntheticFlow {
            id,
            profile,
            counters,
        });
        id
    }

    /// Synthetic time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Generate `elapsed` worth of traffic on every flow.
    pub fn advance(&mut self, elapsed: Duration) {
        let now = self.elapsed;
        let after = now + elapsed;

        for flow in &mut self.flows {
            let sent = (flow.profile.packets_per_sec as f64 * elapsed.as_secs_f64()) as u64;
            if sent == 0 {
                continue;
            }

            if flow.counters.tx_packets == 0 {
                flow.counters.first_tx_at = now;
            }
            flow.counters.tx_packets += sent;

            let mut received = 0u64;
            for _ in 0..sent {
                if !drop_packet(&mut self.rng, flow.profile.loss) {
                    received += 1;
                    flow.counters.delay_sum += jittered(&mut self.rng, flow.profile.delay);
                }
            }

            if received > 0 {
                flow.counters.rx_packets += received;
                flow.counters.rx_bytes += received * flow.profile.packet_size;
                flow.counters.last_rx_at = after;
            }
        }

        self.elapsed = after;
    }

    /// Zero the cumulative counters of one flow, as a monitor-side
    /// counter reset would. The next delta computed against the old
    /// observation exercises the underflow policy.
    pub fn reset_flow(&mut self, id: FlowId) {
        if let Some(flow) = self.flows.iter_mut().find(|flow| flow.id == id) {
            flow.counters = FlowSnapshot::empty(flow.profile.source, flow.profile.destination);
        }
    }
}

impl StatsSource for SyntheticSource {
    fn snapshot(&mut self) -> anyhow::Result<Vec<(FlowId, FlowSnapshot)>> {
        Ok(self
            .flows
            .iter()
            .map(|flow| (flow.id, flow.counters.clone()))
            .collect())
    }
}

/// Draw a uniform sample in `[0, 1)` and compare it against the loss
/// rate.
fn drop_packet<R: Rng>(rng: &mut R, loss: f64) -> bool {
    if loss <= 0.0 {
        return false;
    }
    let bits = rng.next_u64();
    let sample = (bits as f64) * (1.0 / (u64::MAX as f64 + 1.0));
    sample < loss
}

/// Nominal delay stretched by up to +25%.
fn jittered<R: Rng>(rng: &mut R, nominal: Duration) -> Duration {
    let bits = rng.next_u64();
    let unit = (bits as f64) * (1.0 / (u64::MAX as f64 + 1.0));
    nominal.mul_f64(1.0 + 0.25 * unit)
}
