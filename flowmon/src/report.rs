//! The whole-run summary: average metrics recomputed from the final
//! cumulative counters, rendered as a fixed-width table.

use anyhow::{Context as _, Result};
use flowmon_core::{Classifier, FlowSnapshot, StatsSource};
use std::fmt;

/// Whole-run averages for one in-scope flow.
///
/// Deliberately computed from the final cumulative counters, not from
/// the accumulated interval deltas. Note the loss formula:
/// `(tx - rx) / tx`, not the complement of the delivery ratio the
/// per-interval path uses. The two only coincide when no clamping
/// occurred during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSummary {
    /// The endpoint label assigned by the classifier.
    pub label: String,
    /// Average received throughput over the flow's active lifetime, in
    /// megabits per second.
    pub throughput_mbps: f64,
    /// Whole-run packet delivery ratio, in percent.
    pub pdr_percent: f64,
    /// Whole-run loss, in percent.
    pub loss_percent: f64,
    /// Mean one-way delay over every received packet, in
    /// milliseconds.
    pub delay_ms: f64,
}

impl FlowSummary {
    /// Compute the whole-run averages from a flow's final counters.
    ///
    /// The throughput denominator is the flow's active lifetime, from
    /// the first sent packet to the last received one. A flow that
    /// never received anything has a zero (or negative) lifetime; it
    /// reports zero throughput rather than dividing by it.
    pub fn from_final(label: impl Into<String>, counters: &FlowSnapshot) -> Self {
        let active_secs = counters.last_rx_at.as_secs_f64() - counters.first_tx_at.as_secs_f64();
        let throughput_mbps = if active_secs > 0.0 {
            (counters.rx_bytes as f64 * 8.0 / active_secs) / 1e6
        } else {
            0.0
        };

        let tx = counters.tx_packets as f64;
        let rx = counters.rx_packets as f64;

        let pdr_percent = if counters.tx_packets > 0 {
            rx / tx * 100.0
        } else {
            0.0
        };
        let loss_percent = if counters.tx_packets > 0 {
            (tx - rx) / tx * 100.0
        } else {
            0.0
        };

        let delay_ms = if counters.rx_packets > 0 {
            counters.delay_sum.as_secs_f64() / rx * 1_000.0
        } else {
            0.0
        };

        Self {
            label: label.into(),
            throughput_mbps,
            pdr_percent,
            loss_percent,
            delay_ms,
        }
    }
}

/// The final report: one [`FlowSummary`] per in-scope flow.
///
/// `Display` renders the fixed-width table, values at 5-decimal
/// precision.
#[derive(Debug, Clone, Default)]
pub struct SummaryReport {
    rows: Vec<FlowSummary>,
}

impl SummaryReport {
    /// Query the source one final time and summarize every in-scope
    /// flow. Runs strictly after the sampler has stopped.
    pub fn collect<S: StatsSource>(source: &mut S, classifier: &Classifier) -> Result<Self> {
        let flows = source
            .snapshot()
            .context("Failed to query the stats source for the final snapshot")?;

        let rows = flows
            .iter()
            .filter_map(|(_, counters)| {
                let label = classifier.classify(counters)?;
                Some(FlowSummary::from_final(label, counters))
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[FlowSummary] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<15}{:<18}{:<12}{:<12}{:<12}",
            "#Flow Process", "Throughput(Mbps)", "PDR(%)", "Loss(%)", "Delay(ms)",
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<15}{:<18.5}{:<12.5}{:<12.5}{:<12.5}",
                row.label, row.throughput_mbps, row.pdr_percent, row.loss_percent, row.delay_ms,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowmon_core::{FlowId, IntervalDelta, Metrics};
    use std::{
        net::{IpAddr, Ipv4Addr},
        time::Duration,
    };

    const AP1: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
    const STRAY: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 7));
    const SINK: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));

    fn final_counters() -> FlowSnapshot {
        FlowSnapshot {
            rx_bytes: 4_500_000,
            tx_packets: 9_000,
            rx_packets: 8_820,
            delay_sum: Duration::from_millis(44_100),
            first_tx_at: Duration::from_secs(2),
            last_rx_at: Duration::from_secs(20),
            ..FlowSnapshot::empty(AP1, SINK)
        }
    }

    #[test]
    fn whole_run_averages() {
        let summary = FlowSummary::from_final("AP 1 (helper)", &final_counters());

        // 4_500_000 bytes * 8 over the 18s active lifetime
        assert_eq!(summary.throughput_mbps, 2.0);
        assert_eq!(summary.pdr_percent, 98.0);
        assert_eq!(summary.loss_percent, 2.0);
        assert_eq!(summary.delay_ms, 5.0);
    }

    #[test]
    fn flow_without_reception_reports_zero_throughput() {
        let mut counters = final_counters();
        counters.rx_bytes = 0;
        counters.rx_packets = 0;
        counters.delay_sum = Duration::ZERO;
        counters.last_rx_at = Duration::ZERO; // active lifetime is negative

        let summary = FlowSummary::from_final("silent", &counters);

        assert_eq!(summary.throughput_mbps, 0.0);
        assert_eq!(summary.pdr_percent, 0.0);
        assert_eq!(summary.loss_percent, 100.0);
        assert_eq!(summary.delay_ms, 0.0);
    }

    #[test]
    fn flow_without_traffic_is_all_zero() {
        let counters = FlowSnapshot::empty(AP1, SINK);

        let summary = FlowSummary::from_final("idle", &counters);

        assert_eq!(summary.throughput_mbps, 0.0);
        assert_eq!(summary.pdr_percent, 0.0);
        assert_eq!(summary.loss_percent, 0.0);
        assert_eq!(summary.delay_ms, 0.0);
    }

    /// The per-interval loss (`100 − clamped pdr`) and the whole-run
    /// loss (`(tx − rx) / tx`) agree exactly as long as nothing was
    /// clamped.
    #[test]
    fn loss_formulas_coincide_when_unclamped() {
        let counters = final_counters();
        let delta = IntervalDelta {
            rx_bytes: counters.rx_bytes,
            tx_packets: counters.tx_packets,
            rx_packets: counters.rx_packets,
            delay: counters.delay_sum,
        };

        let interval = Metrics::derive(&delta, Duration::from_secs(1));
        let summary = FlowSummary::from_final("x", &counters);

        assert!((interval.loss_percent - summary.loss_percent).abs() < 1e-9);
    }

    /// Under anomaly (more received than sent) the two formulas
    /// diverge: the interval path clamps, the summary goes negative.
    #[test]
    fn loss_formulas_diverge_under_anomaly() {
        let mut counters = final_counters();
        counters.rx_packets = counters.tx_packets + 100;

        let delta = IntervalDelta {
            rx_bytes: counters.rx_bytes,
            tx_packets: counters.tx_packets,
            rx_packets: counters.rx_packets,
            delay: counters.delay_sum,
        };

        let interval = Metrics::derive(&delta, Duration::from_secs(1));
        let summary = FlowSummary::from_final("x", &counters);

        assert_eq!(interval.loss_percent, 0.0);
        assert!(summary.loss_percent < 0.0);
    }

    #[test]
    fn collect_filters_and_labels() {
        struct Final(Vec<(FlowId, FlowSnapshot)>);
        impl StatsSource for Final {
            fn snapshot(&mut self) -> Result<Vec<(FlowId, FlowSnapshot)>> {
                Ok(self.0.clone())
            }
        }

        let mut stray = final_counters();
        stray.source = STRAY;
        let mut source = Final(vec![
            (FlowId::ONE, final_counters()),
            (FlowId::ONE.next(), stray),
        ]);

        let mut classifier = Classifier::new();
        classifier.register(AP1, "AP 1 (helper)");

        let report = SummaryReport::collect(&mut source, &classifier).unwrap();

        assert_eq!(report.rows().len(), 1);
        assert_eq!(report.rows()[0].label, "AP 1 (helper)");
    }

    #[test]
    fn table_layout() {
        let report = SummaryReport {
            rows: vec![FlowSummary::from_final("AP 1 (helper)", &final_counters())],
        };

        let rendered = report.to_string();
        let mut lines = rendered.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("#Flow Process  Throughput(Mbps)  PDR(%)"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("AP 1 (helper)  2.00000           98.00000"));
        assert!(row.contains("5.00000"));
        assert!(lines.next().is_none());
    }
}
