use flowmon_core::{Interval, defaults};
use thiserror::Error;

/// The timing surface of a monitoring run.
///
/// The defaults sample once per second, starting 2s into the run and
/// stopping at 20s.
///
/// # Example
///
/// ```
/// use flowmon::MonitorConfiguration;
///
/// let configuration = MonitorConfiguration {
///     run_length: "60s".parse().unwrap(),
///     ..MonitorConfiguration::default()
/// };
/// assert_eq!(configuration.interval.to_string(), "1s");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfiguration {
    /// Time of the first sampling tick, relative to the run origin.
    pub start_offset: Interval,
    /// Sampling cadence. The sampler trusts this value; it never
    /// measures the actual elapsed time between ticks.
    pub interval: Interval,
    /// The run-length bound: once a tick fires at or past this time,
    /// the sampler stops rescheduling itself.
    pub run_length: Interval,
}

impl Default for MonitorConfiguration {
    fn default() -> Self {
        Self {
            start_offset: defaults::DEFAULT_START_OFFSET,
            interval: defaults::DEFAULT_INTERVAL,
            run_length: defaults::DEFAULT_RUN_LENGTH,
        }
    }
}

impl MonitorConfiguration {
    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ZeroInterval`]: a zero sampling interval
    /// would reschedule the same tick forever.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.interval.is_zero() {
            return Err(ConfigurationError::ZeroInterval);
        }
        Ok(())
    }
}

/// Error returned when a [`MonitorConfiguration`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The sampling interval is zero.
    #[error("the sampling interval must not be zero")]
    ZeroInterval,
}
