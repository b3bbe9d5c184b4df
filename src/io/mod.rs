//! Input and output collaborators.
//!
//! - **`loader`**: reads the process list (header plus `pid,arrival,burst[,priority]` rows)
//! - **`report`**: timeline/metrics CSV writers and the printed summary

mod loader;
mod report;

pub use loader::{load_processes, load_processes_file, parse_row, LoadError};
pub use report::{
    format_summary, metrics_row, timeline_row, write_metrics_csv, CsvTimelineWriter,
    METRICS_HEADER, TIMELINE_HEADER,
};
