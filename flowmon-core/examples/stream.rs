//! Stream example: fabricate a long synthetic counter stream and
//! print what one in-scope flow accumulated.
//!
//! Run with:
//!   cargo run --example stream -p flowmon-core

use anyhow::Result;
use flowmon_core::{
    IntervalDelta, Metrics, StatsSource as _,
    synthetic::{FlowProfile, SyntheticSource},
};
use indicatif::ProgressBar;
use std::{
    net::{IpAddr, Ipv4Addr},
    time::Duration,
};

const TICKS: u64 = 3_600;
const INTERVAL: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    let mut source = SyntheticSource::new(42);
    source.add_flow(FlowProfile {
        source: IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1)),
        destination: IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2)),
        packets_per_sec: 488,
        packet_size: 512,
        loss: 0.02,
        delay: Duration::from_millis(5),
    });

    let mut last = None;
    let mut peak_mbps = 0.0f64;

    let pb = ProgressBar::new(TICKS);
    for _ in 0..TICKS {
        source.advance(INTERVAL);
        let (_, counters) = source.snapshot()?.remove(0);

        let delta = IntervalDelta::between(&counters, last.as_ref());
        let metrics = Metrics::derive(&delta, INTERVAL);
        peak_mbps = peak_mbps.max(metrics.throughput_mbps);

        last = Some(counters);
        pb.inc(1);
    }
    pb.finish_with_message("stream complete");

    let counters = last.expect("at least one tick was generated");
    println!(
        "sent {} packets, received {} ({} bytes) over {TICKS}s",
        counters.tx_packets, counters.rx_packets, counters.rx_bytes,
    );
    println!("peak interval throughput: {peak_mbps:.2} Mbps");

    Ok(())
}
