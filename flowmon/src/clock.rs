//! The injectable ticker that paces the sampler.

use std::{
    thread,
    time::{Duration, Instant},
};

/// Paces the sampling loop.
///
/// Deadlines are expressed relative to the run origin; the clock
/// decides what, if anything, to wait on. Injecting the clock keeps
/// the sampler's termination condition and interval arithmetic
/// testable without a real event loop.
pub trait Clock {
    /// Block until the given run-relative deadline has been reached.
    fn wait_until(&mut self, deadline: Duration);
}

/// Real-time pacing: deadlines are measured against an [`Instant`]
/// captured when the clock is started.
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    /// Start the clock; the run origin is now.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn wait_until(&mut self, deadline: Duration) {
        let target = self.origin + deadline;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }
}

/// A clock that never sleeps.
///
/// Every deadline is considered already reached, so the sampling loop
/// runs as fast as the stats source can answer. Suitable for tests and
/// offline replay.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn wait_until(&mut self, _deadline: Duration) {}
}
