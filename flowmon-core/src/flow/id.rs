use anyhow::anyhow;
use std::{fmt, str};

/// The identifier of a directional flow tracked by the monitor.
///
/// The identifier is minted by the external stats source and is stable
/// for the lifetime of the flow. It is the key for all per-flow state
/// kept by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
pub struct FlowId(u64);

impl FlowId {
    pub const ZERO: Self = FlowId::new(0);
    pub const ONE: Self = FlowId::new(1);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use = "function does not modify the current value"]
    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl str::FromStr for FlowId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self).map_err(|error| anyhow!("{error}"))
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
