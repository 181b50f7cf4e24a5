use std::{fmt, str::FromStr, time::Duration};

/// A span of sampling time: the cadence of the sampler, the start
/// offset of the first tick, or the run-length bound.
///
/// # Default [`Interval`]
///
/// ```
/// # use flowmon_core::Interval;
/// assert_eq!(
///     Interval::default().to_string(),
///     "1s"
/// )
/// ```
///
/// # truncation
///
/// The interval is precise up to the microsecond. Constructing an
/// [`Interval`] from a [`Duration`] with nanosecond precision
/// truncates the nanosecond part.
///
/// ```
/// # use flowmon_core::Interval;
/// # use std::time::Duration;
/// let interval = Interval::new(Duration::from_nanos(987_654_321));
/// assert_eq!(
///     interval.into_duration(),
///     Duration::from_micros(987_654),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(u64);

impl Interval {
    /// The `0` interval.
    pub const ZERO: Self = Self::new(Duration::ZERO);

    /// create a new interval with the given [`Duration`].
    #[inline(always)]
    pub const fn new(duration: Duration) -> Self {
        Self(duration.as_micros() as u64)
    }

    /// get the inner duration
    #[inline(always)]
    pub fn into_duration(self) -> Duration {
        Duration::from_micros(self.0)
    }

    /// the interval length in (fractional) seconds
    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.into_duration().as_secs_f64()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<Interval> for Duration {
    fn from(value: Interval) -> Self {
        value.into_duration()
    }
}
impl From<Duration> for Interval {
    fn from(value: Duration) -> Self {
        Self::new(value)
    }
}

impl Default for Interval {
    fn default() -> Self {
        crate::defaults::DEFAULT_INTERVAL
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dur = crate::time::Duration::new(self.into_duration());
        dur.fmt(f)
    }
}

impl FromStr for Interval {
    type Err = crate::time::DurationParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = crate::time::Duration::from_str(s)?;

        Ok(Self::new(duration.into_duration()))
    }
}
