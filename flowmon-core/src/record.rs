//! The time-series emission contract: one comma-separated line per
//! active in-scope flow per tick.

use crate::metrics::Metrics;
use std::fmt;

/// One line of the time-series output.
///
/// `Display` renders the comma-separated row; [`TimeSeriesRecord::HEADER`]
/// is the column header written once at the top of the sink.
///
/// # Example
///
/// ```
/// # use flowmon_core::{metrics::Metrics, record::TimeSeriesRecord};
/// let record = TimeSeriesRecord {
///     time: 3,
///     label: "AP1 (helper)".to_string(),
///     metrics: Metrics {
///         throughput_mbps: 1.0,
///         pdr_percent: 99.0,
///         loss_percent: 1.0,
///         delay_ms: 2.5253,
///     },
/// };
/// assert_eq!(record.to_string(), "3,AP1 (helper),1.00,99.00,1.00,2.53");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    /// Tick time in whole seconds since the run origin.
    pub time: u64,
    /// The endpoint label assigned by the classifier.
    pub label: String,
    /// The derived metrics for this interval.
    pub metrics: Metrics,
}

impl TimeSeriesRecord {
    /// Column header of the time-series output.
    pub const HEADER: &'static str = "Time,Flow,Throughput(Mbps),PDR(%),Loss(%),Delay(ms)";
}

impl fmt::Display for TimeSeriesRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{:.2},{:.2},{:.2},{:.2}",
            self.time,
            self.label,
            self.metrics.throughput_mbps,
            self.metrics.pdr_percent,
            self.metrics.loss_percent,
            self.metrics.delay_ms,
        )
    }
}
