/*!
# Flow metrics monitor

Samples cumulative per-flow network counters at a fixed cadence and
turns them into per-interval throughput, packet-delivery ratio, loss
and mean one-way delay, written as an append-only CSV time series.
When the run-length bound is reached, a whole-run summary table is
recomputed from the final counters.

The primitives (deltas, metric derivation, classification) live in
[`flowmon_core`]; this crate adds the periodic [`Sampler`], the
injectable [`Clock`], the [`TimeSeriesWriter`] sink and the
[`SummaryReport`].

```no_run
use flowmon::{
    Classifier, InstantClock, MonitorConfiguration, Sampler, SummaryReport, TimeSeriesWriter,
};
# fn stats_source() -> flowmon_core::synthetic::SyntheticSource {
#     flowmon_core::synthetic::SyntheticSource::new(0)
# }

# fn main() -> anyhow::Result<()> {
let mut classifier = Classifier::new();
classifier.register("10.1.3.1".parse()?, "AP1 (helper)");

let sink = TimeSeriesWriter::create("flow_timeseries.csv")?;
let mut sampler = Sampler::new(
    MonitorConfiguration::default(),
    classifier,
    stats_source(),
    sink,
)?;

sampler.run(&mut InstantClock)?;

let (mut source, classifier, _) = sampler.finish()?;
let report = SummaryReport::collect(&mut source, &classifier)?;
println!("{report}");
# Ok(())
# }
```
*/

mod clock;
mod config;
mod report;
mod sampler;
mod sink;

// convenient re-export of `flowmon_core` core objects
pub use flowmon_core::{
    Classifier, FlowId, FlowRegistry, FlowSnapshot, Interval, IntervalDelta, Metrics, StatsSource,
    TimeSeriesRecord,
};

pub use self::{
    clock::{Clock, InstantClock, WallClock},
    config::{ConfigurationError, MonitorConfiguration},
    report::{FlowSummary, SummaryReport},
    sampler::{Sampler, State},
    sink::{SinkError, TimeSeriesWriter},
};
