//! Per-flow storage of the last observed cumulative counters.

use crate::flow::{FlowId, FlowSnapshot};
use std::collections::HashMap;

/// The last observed [`FlowSnapshot`] per [`FlowId`].
///
/// An entry is created lazily the first time a flow is recorded and
/// replaced on every subsequent sample; entries are never removed for
/// the lifetime of the run. The absence of an entry is meaningful: it
/// signals the flow's first sample.
#[derive(Debug, Clone, Default)]
pub struct FlowRegistry {
    last: HashMap<FlowId, FlowSnapshot>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently recorded snapshot for this flow, if any.
    pub fn last_observed(&self, id: FlowId) -> Option<&FlowSnapshot> {
        self.last.get(&id)
    }

    /// Store the current snapshot as the new last observed state,
    /// returning the replaced one if the flow was already known.
    pub fn record(&mut self, id: FlowId, current: FlowSnapshot) -> Option<FlowSnapshot> {
        self.last.insert(id, current)
    }

    /// Number of flows observed so far.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
