//! The append-only, line-oriented time-series sink.

use flowmon_core::TimeSeriesRecord;
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Error returned by the time-series sink.
///
/// Failing to create the sink is fatal at startup; the monitor must
/// not begin a run it cannot record.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink file could not be created.
    #[error("Failed to create the time-series sink at {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Appending a line to the sink failed.
    #[error("Failed to append to the time-series sink")]
    Write(#[from] io::Error),
}

/// Writes the time-series output, one [`TimeSeriesRecord`] per line.
///
/// The header is written when the sink is opened, before the first
/// sampling tick. The underlying writer is flushed by
/// [`finish`](TimeSeriesWriter::finish) (or, on abnormal termination,
/// by the buffered writer's `Drop`).
///
/// # Example
///
/// ```
/// # use flowmon::TimeSeriesWriter;
/// # use flowmon_core::{Metrics, TimeSeriesRecord};
/// let mut sink = TimeSeriesWriter::new(Vec::new()).unwrap();
/// sink.emit(&TimeSeriesRecord {
///     time: 2,
///     label: "AP1 (helper)".to_string(),
///     metrics: Metrics {
///         throughput_mbps: 1.0,
///         pdr_percent: 99.0,
///         loss_percent: 1.0,
///         delay_ms: 2.53,
///     },
/// })
/// .unwrap();
///
/// let bytes = sink.finish().unwrap();
/// assert_eq!(
///     String::from_utf8(bytes).unwrap(),
///     "Time,Flow,Throughput(Mbps),PDR(%),Loss(%),Delay(ms)\n\
///      2,AP1 (helper),1.00,99.00,1.00,2.53\n",
/// );
/// ```
#[derive(Debug)]
pub struct TimeSeriesWriter<W: Write> {
    out: W,
}

impl TimeSeriesWriter<BufWriter<File>> {
    /// Create (truncating) the sink file at `path` and write the
    /// header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SinkError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> TimeSeriesWriter<W> {
    /// Wrap a writer and emit the header line.
    pub fn new(mut out: W) -> Result<Self, SinkError> {
        writeln!(out, "{}", TimeSeriesRecord::HEADER)?;
        Ok(Self { out })
    }

    /// Append one record.
    pub fn emit(&mut self, record: &TimeSeriesRecord) -> Result<(), SinkError> {
        writeln!(self.out, "{record}")?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowmon_core::Metrics;

    fn record(time: u64, label: &str) -> TimeSeriesRecord {
        TimeSeriesRecord {
            time,
            label: label.to_string(),
            metrics: Metrics::default(),
        }
    }

    #[test]
    fn header_is_written_on_open() {
        let sink = TimeSeriesWriter::new(Vec::new()).unwrap();
        let bytes = sink.finish().unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            format!("{}\n", TimeSeriesRecord::HEADER),
        );
    }

    #[test]
    fn records_append_in_order() {
        let mut sink = TimeSeriesWriter::new(Vec::new()).unwrap();
        sink.emit(&record(2, "a")).unwrap();
        sink.emit(&record(3, "b")).unwrap();

        let text = String::from_utf8(sink.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2,a,"));
        assert!(lines[2].starts_with("3,b,"));
    }

    #[test]
    fn create_failure_is_fatal_and_names_the_path() {
        let error = TimeSeriesWriter::create("/definitely/not/a/directory/out.csv").unwrap_err();

        match error {
            SinkError::Create { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/a/directory/out.csv"))
            }
            SinkError::Write(_) => panic!("expected a Create error"),
        }
    }
}
