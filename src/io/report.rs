//! Timeline, metrics and summary writers.
//!
//! # Formats
//!
//! | Stream | Header |
//! |--------|--------|
//! | Timeline | `start,end,pid,event` (`pid` is `-` for CS and IDLE) |
//! | Metrics | `pid,waiting,turnaround,response,arrival,burst,finish` |

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::models::TimelineEvent;
use crate::scheduler::{ProcessMetrics, SimSummary, TimelineSink};

/// Timeline header row.
pub const TIMELINE_HEADER: &str = "start,end,pid,event";

/// Metrics header row.
pub const METRICS_HEADER: &str = "pid,waiting,turnaround,response,arrival,burst,finish";

/// Formats one timeline row (without newline).
pub fn timeline_row(event: &TimelineEvent) -> String {
    let pid = event
        .pid
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{},{},{},{}", event.start, event.end, pid, event.kind)
}

/// Formats one metrics row (without newline).
pub fn metrics_row(m: &ProcessMetrics) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        m.pid, m.waiting, m.turnaround, m.response, m.arrival, m.burst, m.finish
    )
}

/// Streams timeline rows to a writer as the simulation emits them.
///
/// The header is written on construction. The first write error is kept
/// and returned by [`finish`]; events recorded after it are dropped.
///
/// [`finish`]: CsvTimelineWriter::finish
#[derive(Debug)]
pub struct CsvTimelineWriter<W: Write> {
    writer: W,
    rows: usize,
    error: Option<io::Error>,
}

impl<W: Write> CsvTimelineWriter<W> {
    /// Wraps `writer` and emits the header row.
    pub fn new(mut writer: W) -> Self {
        let error = writeln!(writer, "{TIMELINE_HEADER}").err();
        Self {
            writer,
            rows: 0,
            error,
        }
    }

    /// Number of rows written, excluding the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and returns the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TimelineSink for CsvTimelineWriter<W> {
    fn record(&mut self, event: &TimelineEvent) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.writer, "{}", timeline_row(event)) {
            Ok(()) => self.rows += 1,
            Err(e) => self.error = Some(e),
        }
    }
}

/// Writes the metrics header and one row per process.
pub fn write_metrics_csv<W: Write>(mut writer: W, metrics: &[ProcessMetrics]) -> io::Result<()> {
    writeln!(writer, "{METRICS_HEADER}")?;
    for m in metrics {
        writeln!(writer, "{}", metrics_row(m))?;
    }
    writer.flush()
}

/// Human-readable run summary.
pub fn format_summary(summary: &SimSummary) -> String {
    let mut out = String::new();
    // writing to a String cannot fail
    let _ = writeln!(out, "== Summary ==");
    let _ = writeln!(out, "Algo        : {}", summary.algorithm);
    let _ = writeln!(out, "Processes   : {}", summary.process_count);
    let _ = writeln!(out, "Makespan    : {}", summary.total_time);
    let _ = writeln!(out, "CPU Util    : {:.3}", summary.cpu_utilization);
    let _ = writeln!(out, "Throughput  : {:.3} proc/unit", summary.throughput);
    out
}
