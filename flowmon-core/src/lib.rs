/*!
# Flow-metrics primitives

Deterministic building blocks for turning cumulative per-flow network
counters into per-interval, rate-based metrics.

An external stats source (see [`StatsSource`]) periodically supplies,
per [`FlowId`], a [`FlowSnapshot`] of cumulative counters. From the
current and previous snapshots, [`IntervalDelta::between`] extracts the
growth attributable to one sampling interval with underflow protection,
and [`Metrics::derive`] converts it into throughput, packet-delivery
ratio, loss percentage and mean one-way delay with an explicit
clamp-and-zero policy for numeric degeneracy. The [`Classifier`]
decides which flows are in scope for reporting and labels them; the
[`FlowRegistry`] remembers the last observed snapshot per flow.

The periodic driver that strings these together lives in the `flowmon`
crate.
*/

pub mod classify;
pub mod defaults;
pub mod delta;
pub mod flow;
mod interval;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod source;
pub mod synthetic;
mod time;

pub use self::{
    classify::Classifier,
    delta::IntervalDelta,
    flow::{FlowId, FlowSnapshot},
    interval::Interval,
    metrics::Metrics,
    record::TimeSeriesRecord,
    registry::FlowRegistry,
    source::StatsSource,
    time::DurationParseError,
};
