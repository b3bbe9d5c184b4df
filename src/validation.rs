//! Input validation and outcome auditing.
//!
//! The simulation core trusts its input. This module provides the checks a
//! caller runs before simulating and an independent audit of the produced
//! timeline and metrics.
//!
//! Input checks detect:
//! - Empty process collections
//! - Duplicate pids
//! - Negative arrival times
//! - Non-positive bursts
//!
//! The audit re-derives makespan, busy, idle and context-switch time from
//! the timeline and cross-checks every per-process metric against it.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{EventKind, Pid, Process, Time, Timeline};
use crate::scheduler::ProcessMetrics;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// No processes were supplied.
    EmptyInput,
    /// Two processes share the same pid.
    DuplicatePid,
    /// A process arrives before t=0.
    NegativeArrival,
    /// A process demands no CPU time.
    NonPositiveBurst,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a process collection before simulation.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_processes(processes: &[Process]) -> ValidationResult {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "No processes to schedule",
        ));
    }

    let mut pids = HashSet::new();
    for p in processes {
        if !pids.insert(p.pid) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicatePid,
                format!("Duplicate pid: {}", p.pid),
            ));
        }
        if p.arrival < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeArrival,
                format!("Process {} arrives at negative time {}", p.pid, p.arrival),
            ));
        }
        if p.burst <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveBurst,
                format!("Process {} has non-positive burst {}", p.pid, p.burst),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A failed audit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// An event ends before it starts.
    NegativeDuration { start: Time, end: Time },
    /// An event starts before the previous one ended.
    Overlap { start: Time, previous_end: Time },
    /// A RUN event without a pid, or a CS/IDLE event with one.
    MisattributedEvent { start: Time, kind: EventKind },
    /// A CS event whose length differs from the configured cost.
    ContextSwitchLength { start: Time, length: Time, expected: Time },
    /// Total RUN time differs from the total demand.
    RunTimeMismatch { run: Time, bursts: Time },
    /// A process ran for a different total time than its burst.
    ProcessRunTime { pid: Pid, run: Time, burst: Time },
    /// A metrics row or RUN event names a pid missing from the input.
    UnknownPid(Pid),
    /// A process has no RUN event.
    NeverRan(Pid),
    /// `turnaround != finish - arrival`.
    Turnaround(Pid),
    /// `waiting != turnaround - burst`.
    Waiting(Pid),
    /// `waiting < 0`.
    NegativeWaiting(Pid),
    /// `finish` differs from the end of the last RUN event.
    Finish(Pid),
    /// `response` differs from first RUN start minus arrival.
    Response(Pid),
    /// The first RUN event precedes the arrival.
    RanBeforeArrival(Pid),
    /// Metrics rows and input pids differ.
    MetricsCoverage,
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::NegativeDuration { start, end } => {
                write!(f, "Bad segment duration: {start}->{end}")
            }
            AuditError::Overlap {
                start,
                previous_end,
            } => write!(f, "Overlapping events: {start} < {previous_end}"),
            AuditError::MisattributedEvent { start, kind } => {
                write!(f, "{kind} event at {start} has the wrong pid attribution")
            }
            AuditError::ContextSwitchLength {
                start,
                length,
                expected,
            } => write!(
                f,
                "CS duration {length} at {start} != configured {expected}"
            ),
            AuditError::RunTimeMismatch { run, bursts } => {
                write!(f, "RUN time {run} != sum of bursts {bursts}")
            }
            AuditError::ProcessRunTime { pid, run, burst } => {
                write!(f, "RUN time {run} != burst {burst} for pid {pid}")
            }
            AuditError::UnknownPid(pid) => write!(f, "Unknown pid {pid}"),
            AuditError::NeverRan(pid) => write!(f, "No RUN for pid {pid}"),
            AuditError::Turnaround(pid) => write!(f, "TA mismatch for pid {pid}"),
            AuditError::Waiting(pid) => write!(f, "Waiting mismatch for pid {pid}"),
            AuditError::NegativeWaiting(pid) => write!(f, "Negative waiting for pid {pid}"),
            AuditError::Finish(pid) => write!(f, "Finish != last RUN end for pid {pid}"),
            AuditError::Response(pid) => write!(f, "Response mismatch for pid {pid}"),
            AuditError::RanBeforeArrival(pid) => {
                write!(f, "First run before arrival for pid {pid}")
            }
            AuditError::MetricsCoverage => write!(f, "Metrics missing/extra pids"),
        }
    }
}

impl std::error::Error for AuditError {}

/// Totals re-derived from an audited timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// End of the last event.
    pub makespan: Time,
    /// Total RUN time.
    pub busy: Time,
    /// Total IDLE time.
    pub idle: Time,
    /// Total CS time.
    pub cs_time: Time,
    /// busy / makespan.
    pub cpu_utilization: f64,
    /// processes / makespan.
    pub throughput: f64,
}

/// Audits a timeline and metrics against the input processes.
///
/// `expected_cs`, when given, is the configured context-switch cost that
/// every CS event must match.
pub fn audit(
    processes: &[Process],
    timeline: &Timeline,
    metrics: &[ProcessMetrics],
    expected_cs: Option<Time>,
) -> Result<AuditReport, AuditError> {
    let by_pid: HashMap<Pid, &Process> = processes.iter().map(|p| (p.pid, p)).collect();

    let mut last_end = Time::MIN;
    let (mut busy, mut idle, mut cs_time) = (0, 0, 0);
    let mut first_run: BTreeMap<Pid, Time> = BTreeMap::new();
    let mut last_run_end: BTreeMap<Pid, Time> = BTreeMap::new();
    let mut run_time: BTreeMap<Pid, Time> = BTreeMap::new();

    for e in &timeline.events {
        if e.end < e.start {
            return Err(AuditError::NegativeDuration {
                start: e.start,
                end: e.end,
            });
        }
        if e.start < last_end {
            return Err(AuditError::Overlap {
                start: e.start,
                previous_end: last_end,
            });
        }
        last_end = e.end;

        let duration = e.duration();
        match (e.kind, e.pid) {
            (EventKind::Run, Some(pid)) => {
                busy += duration;
                first_run.entry(pid).or_insert(e.start);
                last_run_end.insert(pid, e.end);
                *run_time.entry(pid).or_insert(0) += duration;
            }
            (EventKind::Cs, None) => {
                if let Some(expected) = expected_cs {
                    if duration != expected {
                        return Err(AuditError::ContextSwitchLength {
                            start: e.start,
                            length: duration,
                            expected,
                        });
                    }
                }
                cs_time += duration;
            }
            (EventKind::Idle, None) => idle += duration,
            (kind, _) => {
                return Err(AuditError::MisattributedEvent {
                    start: e.start,
                    kind,
                })
            }
        }
    }

    let bursts: Time = processes.iter().map(|p| p.burst).sum();
    if busy != bursts {
        return Err(AuditError::RunTimeMismatch { run: busy, bursts });
    }
    if let Some(&pid) = run_time.keys().find(|pid| !by_pid.contains_key(pid)) {
        return Err(AuditError::UnknownPid(pid));
    }
    for p in processes {
        let run = run_time.get(&p.pid).copied().unwrap_or(0);
        if run != p.burst {
            return Err(AuditError::ProcessRunTime {
                pid: p.pid,
                run,
                burst: p.burst,
            });
        }
    }

    let mut seen = HashSet::new();
    for m in metrics {
        let p = by_pid.get(&m.pid).ok_or(AuditError::UnknownPid(m.pid))?;
        seen.insert(m.pid);

        if m.turnaround != m.finish - p.arrival {
            return Err(AuditError::Turnaround(m.pid));
        }
        if m.waiting != m.turnaround - p.burst {
            return Err(AuditError::Waiting(m.pid));
        }
        if m.waiting < 0 {
            return Err(AuditError::NegativeWaiting(m.pid));
        }
        let first = *first_run.get(&m.pid).ok_or(AuditError::NeverRan(m.pid))?;
        if last_run_end.get(&m.pid) != Some(&m.finish) {
            return Err(AuditError::Finish(m.pid));
        }
        if m.response != first - p.arrival {
            return Err(AuditError::Response(m.pid));
        }
        if first < p.arrival {
            return Err(AuditError::RanBeforeArrival(m.pid));
        }
    }

    if seen.len() != by_pid.len() || metrics.len() != seen.len() {
        return Err(AuditError::MetricsCoverage);
    }

    let makespan = timeline.makespan();
    let ratio = |x: f64| if makespan > 0 { x / makespan as f64 } else { 0.0 };
    Ok(AuditReport {
        makespan,
        busy,
        idle,
        cs_time,
        cpu_utilization: ratio(busy as f64),
        throughput: ratio(processes.len() as f64),
    })
}
