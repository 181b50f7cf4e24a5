//! The seam between the monitor and whatever owns the actual
//! counters.

use crate::flow::{FlowId, FlowSnapshot};
use anyhow::Result;

/// An external source of truth for cumulative flow counters.
///
/// The source owns collection from the underlying traffic generators;
/// the monitor queries it, it is never pushed to. Every query returns
/// the full current snapshot for every known flow.
///
/// A query failure is an upstream collaborator failure: it propagates
/// to the caller of the sampling tick and is never masked by the
/// monitor.
pub trait StatsSource {
    /// Query the current cumulative counters of every known flow.
    fn snapshot(&mut self) -> Result<Vec<(FlowId, FlowSnapshot)>>;
}

impl<S: StatsSource + ?Sized> StatsSource for &mut S {
    fn snapshot(&mut self) -> Result<Vec<(FlowId, FlowSnapshot)>> {
        (**self).snapshot()
    }
}
