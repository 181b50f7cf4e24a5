use crate::Interval;
use std::time::Duration;

/// Default sampling [`Interval`]
///
/// Counters are sampled once per second.
///
/// ```
/// # use flowmon_core::defaults::*;
/// assert_eq!(
///     DEFAULT_INTERVAL.to_string(),
///     "1s"
/// );
/// ```
pub const DEFAULT_INTERVAL: Interval = Interval::new(Duration::from_secs(1));

/// Default start offset of the first sampling tick
///
/// Sampling begins a short while into the run so that the traffic
/// sources have started before the first counters are read.
///
/// ```
/// # use flowmon_core::defaults::*;
/// assert_eq!(
///     DEFAULT_START_OFFSET.to_string(),
///     "2s"
/// );
/// ```
pub const DEFAULT_START_OFFSET: Interval = Interval::new(Duration::from_secs(2));

/// Default run-length bound
///
/// The sampler stops rescheduling itself once the tick time reaches
/// this bound.
///
/// ```
/// # use flowmon_core::defaults::*;
/// assert_eq!(
///     DEFAULT_RUN_LENGTH.to_string(),
///     "20s"
/// );
/// ```
pub const DEFAULT_RUN_LENGTH: Interval = Interval::new(Duration::from_secs(20));
