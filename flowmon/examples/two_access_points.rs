//! Two access points push UDP-sized traffic toward one server; the
//! monitor samples the flow counters once per second, writes the CSV
//! time series and prints the whole-run summary.
//!
//! Run with:
//!   cargo run --example two_access_points -p flowmon

use anyhow::Result;
use clap::Parser;
use flowmon::{
    Classifier, Interval, MonitorConfiguration, Sampler, SummaryReport, TimeSeriesWriter,
};
use flowmon_core::synthetic::{FlowProfile, SyntheticSource};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::PathBuf,
    time::Duration,
};

const AP1: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
const AP2: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 5, 1));
const SERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));

// 2 Mbps of 512-byte packets
const PACKET_SIZE: u64 = 512;
const PACKETS_PER_SEC: u64 = 2_000_000 / 8 / PACKET_SIZE;

#[derive(Parser)]
struct Command {
    /// Stop sampling once a tick fires at or past this time.
    #[arg(long, default_value = "20s")]
    run_length: Interval,

    /// Sampling cadence.
    #[arg(long, default_value = "1s")]
    interval: Interval,

    /// Time of the first sampling tick.
    #[arg(long, default_value = "2s")]
    start_offset: Interval,

    /// Seed for the synthetic counter streams. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the CSV time series.
    #[arg(long, default_value = "flow_timeseries.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cmd = Command::parse();
    let seed = cmd.seed.unwrap_or_else(rand::random);

    let mut classifier = Classifier::new();
    classifier
        .register(AP1, "AP1 (helper)")
        .register(AP2, "AP2 (apps)");

    let mut source = SyntheticSource::new(seed);
    for (addr, loss, delay) in [
        (AP1, 0.01, Duration::from_millis(4)),
        (AP2, 0.03, Duration::from_millis(6)),
    ] {
        source.add_flow(FlowProfile {
            source: addr,
            destination: SERVER,
            packets_per_sec: PACKETS_PER_SEC,
            packet_size: PACKET_SIZE,
            loss,
            delay,
        });
    }

    let configuration = MonitorConfiguration {
        start_offset: cmd.start_offset,
        interval: cmd.interval,
        run_length: cmd.run_length,
    };

    let sink = TimeSeriesWriter::create(&cmd.output)?;
    let mut sampler = Sampler::new(configuration, classifier, source, sink)?;

    // generate the synthetic traffic up to each tick, then sample
    let mut last = Duration::ZERO;
    while let Some(next) = sampler.next_tick() {
        sampler.source_mut().advance(next - last);
        last = next;
        sampler.tick()?;
    }

    let (mut source, classifier, _) = sampler.finish()?;

    println!("time series written to {}", cmd.output.display());
    println!();
    println!("=== AP1 vs AP2, {PACKETS_PER_SEC} packets/s of {PACKET_SIZE} bytes each (seed {seed}) ===");
    println!();

    let report = SummaryReport::collect(&mut source, &classifier)?;
    print!("{report}");

    Ok(())
}
