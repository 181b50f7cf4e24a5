//! The periodic driver: one tick per interval, from the start offset
//! to the run-length bound.

use crate::{
    clock::Clock,
    config::{ConfigurationError, MonitorConfiguration},
    sink::{SinkError, TimeSeriesWriter},
};
use anyhow::{Context as _, Result};
use flowmon_core::{
    Classifier, FlowRegistry, IntervalDelta, Metrics, StatsSource, TimeSeriesRecord,
};
use std::{io::Write, time::Duration};

/// Where the sampling loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// A tick is scheduled at the given run-relative time.
    Running { next_tick: Duration },
    /// The run-length bound has been reached; no further ticks fire.
    Stopped,
}

/// The periodic sampler.
///
/// Owns everything a run needs (the configuration, the classifier,
/// the last-observed registry, the stats source and the time-series
/// sink), so there is no ambient state; the whole context is
/// constructed at start and torn down with the value.
///
/// On every tick the sampler queries the full snapshot from the
/// source, and for each in-scope flow computes the interval delta,
/// derives the metrics, emits a time-series record when the interval
/// carried activity, and unconditionally stores the snapshot as the
/// new last observation. Out-of-scope flows are ignored entirely: no
/// registry entry, no emission.
///
/// # Example
///
/// ```
/// # use flowmon::{MonitorConfiguration, Sampler, TimeSeriesWriter};
/// # use flowmon_core::{Classifier, synthetic::{FlowProfile, SyntheticSource}};
/// # use std::net::{IpAddr, Ipv4Addr};
/// # use std::time::Duration;
/// let ap1 = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
/// let sink_addr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));
///
/// let mut classifier = Classifier::new();
/// classifier.register(ap1, "AP1 (helper)");
///
/// let mut source = SyntheticSource::new(42);
/// source.add_flow(FlowProfile {
///     source: ap1,
///     destination: sink_addr,
///     packets_per_sec: 488,
///     packet_size: 512,
///     loss: 0.01,
///     delay: Duration::from_millis(5),
/// });
///
/// let sink = TimeSeriesWriter::new(Vec::new()).unwrap();
/// let mut sampler = Sampler::new(
///     MonitorConfiguration::default(),
///     classifier,
///     source,
///     sink,
/// )
/// .unwrap();
///
/// // drive the synthetic traffic between ticks, then tick
/// let mut last = Duration::ZERO;
/// while let Some(next) = sampler.next_tick() {
///     sampler.source_mut().advance(next - last);
///     last = next;
///     sampler.tick().unwrap();
/// }
///
/// let (_, _, bytes) = sampler.finish().unwrap();
/// let csv = String::from_utf8(bytes).unwrap();
/// assert!(csv.lines().count() > 1); // header plus emitted records
/// ```
pub struct Sampler<S, W: Write> {
    configuration: MonitorConfiguration,
    classifier: Classifier,
    registry: FlowRegistry,
    source: S,
    sink: TimeSeriesWriter<W>,
    state: State,
}

impl<S, W> Sampler<S, W>
where
    S: StatsSource,
    W: Write,
{
    /// Assemble a run. The first tick is scheduled at the configured
    /// start offset.
    ///
    /// # Errors
    ///
    /// Rejects configurations that cannot drive a loop, see
    /// [`MonitorConfiguration::validate`].
    pub fn new(
        configuration: MonitorConfiguration,
        classifier: Classifier,
        source: S,
        sink: TimeSeriesWriter<W>,
    ) -> Result<Self, ConfigurationError> {
        configuration.validate()?;

        let state = State::Running {
            next_tick: configuration.start_offset.into_duration(),
        };

        Ok(Self {
            configuration,
            classifier,
            registry: FlowRegistry::new(),
            source,
            sink,
            state,
        })
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The run-relative time of the next scheduled tick, or `None`
    /// once stopped.
    pub fn next_tick(&self) -> Option<Duration> {
        match self.state {
            State::Running { next_tick } => Some(next_tick),
            State::Stopped => None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn registry(&self) -> &FlowRegistry {
        &self.registry
    }

    /// Execute the scheduled tick. A no-op once stopped.
    ///
    /// # Errors
    ///
    /// A stats-source failure or a sink write failure aborts the tick
    /// and propagates; neither is masked.
    pub fn tick(&mut self) -> Result<()> {
        let State::Running { next_tick: now } = self.state else {
            return Ok(());
        };

        let flows = self
            .source
            .snapshot()
            .context("Failed to query the stats source")?;

        for (id, current) in flows {
            let Some(label) = self.classifier.classify(&current) else {
                continue;
            };

            let delta = IntervalDelta::between(&current, self.registry.last_observed(id));
            let metrics = Metrics::derive(&delta, self.configuration.interval.into_duration());

            if delta.has_activity() {
                let record = TimeSeriesRecord {
                    time: now.as_secs(),
                    label: label.to_owned(),
                    metrics,
                };
                self.sink.emit(&record)?;
            }

            // state advances whether or not a record was emitted
            self.registry.record(id, current);
        }

        self.state = if now < self.configuration.run_length.into_duration() {
            State::Running {
                next_tick: now + self.configuration.interval.into_duration(),
            }
        } else {
            State::Stopped
        };

        Ok(())
    }

    /// Drive the loop to completion, pacing each tick with `clock`.
    pub fn run<C: Clock>(&mut self, clock: &mut C) -> Result<()> {
        while let State::Running { next_tick } = self.state {
            clock.wait_until(next_tick);
            self.tick()?;
        }
        Ok(())
    }

    /// Flush the sink and tear the run down, handing back the source
    /// (for the final summary pass), the classifier and the sink's
    /// inner writer.
    pub fn finish(self) -> Result<(S, Classifier, W), SinkError> {
        let out = self.sink.finish()?;
        Ok((self.source, self.classifier, out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::InstantClock;
    use flowmon_core::{FlowId, FlowSnapshot, Interval};
    use std::{
        collections::VecDeque,
        net::{IpAddr, Ipv4Addr},
    };

    const AP1: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
    const STRAY: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 0, 7));
    const SINK: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));

    /// Stats source replaying a fixed sequence of frames, one per
    /// query.
    struct Script {
        frames: VecDeque<Vec<(FlowId, FlowSnapshot)>>,
        queries: usize,
    }

    impl Script {
        fn new(frames: impl IntoIterator<Item = Vec<(FlowId, FlowSnapshot)>>) -> Self {
            Self {
                frames: frames.into_iter().collect(),
                queries: 0,
            }
        }
    }

    impl StatsSource for Script {
        fn snapshot(&mut self) -> Result<Vec<(FlowId, FlowSnapshot)>> {
            self.queries += 1;
            Ok(self.frames.pop_front().unwrap_or_default())
        }
    }

    fn config(start: &str, interval: &str, run_length: &str) -> MonitorConfiguration {
        MonitorConfiguration {
            start_offset: start.parse().unwrap(),
            interval: interval.parse().unwrap(),
            run_length: run_length.parse().unwrap(),
        }
    }

    fn classifier() -> Classifier {
        let mut classifier = Classifier::new();
        classifier.register(AP1, "AP1 (helper)");
        classifier
    }

    fn snapshot(rx_bytes: u64, tx: u64, rx: u64, delay: Duration) -> FlowSnapshot {
        FlowSnapshot {
            rx_bytes,
            tx_packets: tx,
            rx_packets: rx,
            delay_sum: delay,
            ..FlowSnapshot::empty(AP1, SINK)
        }
    }

    fn sampler(
        configuration: MonitorConfiguration,
        script: Script,
    ) -> Sampler<Script, Vec<u8>> {
        Sampler::new(
            configuration,
            classifier(),
            script,
            TimeSeriesWriter::new(Vec::new()).unwrap(),
        )
        .unwrap()
    }

    fn run_to_csv(mut sampler: Sampler<Script, Vec<u8>>) -> (Script, String) {
        sampler.run(&mut InstantClock).unwrap();
        assert_eq!(sampler.state(), State::Stopped);
        let (script, _, bytes) = sampler.finish().unwrap();
        (script, String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn first_tick_is_at_the_start_offset() {
        let sampler = sampler(config("2s", "1s", "20s"), Script::new([]));

        assert_eq!(sampler.next_tick(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn ticks_run_from_offset_to_bound_inclusive() {
        let sampler = sampler(config("2s", "1s", "4s"), Script::new([]));

        // ticks at 2s, 3s, 4s; the tick at 4s sees 4 < 4 fail and stops
        let (script, _) = run_to_csv(sampler);
        assert_eq!(script.queries, 3);
    }

    #[test]
    fn zero_interval_is_rejected_at_startup() {
        let result = Sampler::new(
            MonitorConfiguration {
                interval: Interval::ZERO,
                ..MonitorConfiguration::default()
            },
            classifier(),
            Script::new([]),
            TimeSeriesWriter::new(Vec::new()).unwrap(),
        );

        assert!(matches!(result, Err(ConfigurationError::ZeroInterval)));
    }

    #[test]
    fn emits_expected_rows() {
        let frames = [
            // first sample: delta is the raw counters
            vec![(
                FlowId::ONE,
                snapshot(125_000, 200, 198, Duration::from_millis(500)),
            )],
            // unchanged: zero delta, no emission, state still updated
            vec![(
                FlowId::ONE,
                snapshot(125_000, 200, 198, Duration::from_millis(500)),
            )],
            // rx_bytes reset + modest growth elsewhere
            vec![(
                FlowId::ONE,
                snapshot(3_000, 210, 200, Duration::from_millis(510)),
            )],
        ];

        let sampler = sampler(config("1s", "1s", "3s"), Script::new(frames));
        let (_, csv) = run_to_csv(sampler);

        assert_eq!(
            csv,
            "Time,Flow,Throughput(Mbps),PDR(%),Loss(%),Delay(ms)\n\
             1,AP1 (helper),1.00,99.00,1.00,2.53\n\
             3,AP1 (helper),0.02,20.00,80.00,5.00\n",
        );
    }

    #[test]
    fn quiet_interval_is_not_emitted_but_state_advances() {
        let first = snapshot(1_000, 10, 10, Duration::from_millis(50));
        let frames = [
            vec![(FlowId::ONE, first.clone())],
            vec![(FlowId::ONE, first.clone())],
        ];

        let mut sampler = sampler(config("1s", "1s", "2s"), Script::new(frames));
        sampler.tick().unwrap();
        sampler.tick().unwrap();

        assert_eq!(sampler.registry().last_observed(FlowId::ONE), Some(&first));

        let (_, _, bytes) = sampler.finish().unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        assert_eq!(csv.lines().count(), 2); // header + the first tick only
    }

    #[test]
    fn out_of_scope_flows_leave_no_trace() {
        let mut stray = snapshot(9_999, 99, 99, Duration::from_secs(1));
        stray.source = STRAY;

        let frames = [vec![
            (FlowId::ONE, snapshot(1_000, 10, 10, Duration::from_millis(50))),
            (FlowId::ONE.next(), stray),
        ]];

        let mut sampler = sampler(config("1s", "1s", "1s"), Script::new(frames));
        sampler.tick().unwrap();

        // no registry entry for the stray flow
        assert!(sampler.registry().last_observed(FlowId::ONE.next()).is_none());
        assert_eq!(sampler.registry().len(), 1);

        let (_, _, bytes) = sampler.finish().unwrap();
        let csv = String::from_utf8(bytes).unwrap();
        assert!(!csv.contains("9999"));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn source_failure_propagates() {
        struct Failing;
        impl StatsSource for Failing {
            fn snapshot(&mut self) -> Result<Vec<(FlowId, FlowSnapshot)>> {
                anyhow::bail!("collector went away")
            }
        }

        let mut sampler = Sampler::new(
            MonitorConfiguration::default(),
            classifier(),
            Failing,
            TimeSeriesWriter::new(Vec::new()).unwrap(),
        )
        .unwrap();

        let error = sampler.run(&mut InstantClock).unwrap_err();
        assert!(error.to_string().contains("stats source"));
    }

    #[test]
    fn tick_after_stop_is_a_noop() {
        let mut sampler = sampler(config("1s", "1s", "1s"), Script::new([vec![]]));
        sampler.tick().unwrap();
        assert_eq!(sampler.state(), State::Stopped);

        sampler.tick().unwrap();

        let (script, _, _) = sampler.finish().unwrap();
        assert_eq!(script.queries, 1);
    }

    #[test]
    fn sub_second_cadence_schedules_exactly() {
        let mut sampler = sampler(config("0s", "500ms", "1s"), Script::new([]));

        sampler.tick().unwrap();
        assert_eq!(sampler.next_tick(), Some(Duration::from_millis(500)));
        sampler.tick().unwrap();
        assert_eq!(sampler.next_tick(), Some(Duration::from_secs(1)));
        sampler.tick().unwrap();
        assert_eq!(sampler.next_tick(), None);
    }
}
