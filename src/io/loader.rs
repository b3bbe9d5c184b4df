//! Process list loader.
//!
//! Reads a header line followed by `pid,arrival,burst[,priority]` rows.
//! Malformed rows are skipped rather than failing the whole load.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::models::Process;

/// Why a process list could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be opened or read.
    Io(io::Error),
    /// The source has no header line.
    MissingHeader,
    /// No row parsed into a process.
    NoProcesses,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot read process list: {e}"),
            LoadError::MissingHeader => write!(f, "process list has no header line"),
            LoadError::NoProcesses => write!(f, "process list contains no valid rows"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Parses one `pid,arrival,burst[,priority]` row.
///
/// Returns `None` if a required field is missing or any field is not an
/// integer. An absent or empty priority defaults to 0.
pub fn parse_row(line: &str) -> Option<Process> {
    let mut fields = line.split(',').map(str::trim);

    let pid = fields.next()?.parse().ok()?;
    let arrival = fields.next()?.parse().ok()?;
    let burst = fields.next()?.parse().ok()?;
    let priority = match fields.next() {
        None | Some("") => 0,
        Some(s) => s.parse().ok()?,
    };

    Some(Process::new(pid, arrival, burst).with_priority(priority))
}

/// Loads processes from any buffered reader.
pub fn load_processes<R: BufRead>(reader: R) -> Result<Vec<Process>, LoadError> {
    let mut lines = reader.lines();

    let header = lines.next().ok_or(LoadError::MissingHeader)??;
    debug!("process list header: {}", header.trim());

    let mut processes = Vec::new();
    for (lineno, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(&line) {
            Some(p) => processes.push(p),
            // +2: one for the header, one for 1-based numbering
            None => warn!("skipping malformed row {}: {:?}", lineno + 2, line),
        }
    }

    if processes.is_empty() {
        return Err(LoadError::NoProcesses);
    }
    Ok(processes)
}

/// Loads processes from a file.
pub fn load_processes_file(path: impl AsRef<Path>) -> Result<Vec<Process>, LoadError> {
    let file = File::open(path.as_ref())?;
    load_processes(BufReader::new(file))
}
