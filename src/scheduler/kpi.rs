//! Simulation quality metrics (KPIs).
//!
//! Computes per-process and aggregate performance indicators once a
//! simulation has run to completion.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | finish − arrival |
//! | Waiting | turnaround − burst |
//! | Response | first dispatch − arrival |
//! | Makespan | time at which the last process finished |
//! | CPU utilization | busy time / makespan |
//! | Throughput | processes / makespan |

use serde::{Deserialize, Serialize};

use crate::models::{Algorithm, Pid, Process, Time};

/// Value reported for a timing field that was never set.
pub const NOT_SET: Time = -1;

/// Performance indicators for one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub pid: Pid,
    /// Time spent ready but not running.
    pub waiting: Time,
    /// Time from arrival to completion.
    pub turnaround: Time,
    /// Time from arrival to first dispatch; [`NOT_SET`] if never dispatched.
    pub response: Time,
    /// Arrival time.
    pub arrival: Time,
    /// Total CPU demand.
    pub burst: Time,
    /// Completion time; [`NOT_SET`] if never finished.
    pub finish: Time,
}

impl ProcessMetrics {
    /// Derives metrics from a simulated process.
    pub fn from_process(p: &Process) -> Self {
        let finish = p.finish_time.unwrap_or(NOT_SET);
        let turnaround = finish - p.arrival;
        Self {
            pid: p.pid,
            waiting: turnaround - p.burst,
            turnaround,
            response: p
                .first_response_time
                .map(|t| t - p.arrival)
                .unwrap_or(NOT_SET),
            arrival: p.arrival,
            burst: p.burst,
            finish,
        }
    }

    /// Metrics for every process, in slice order.
    pub fn collect(processes: &[Process]) -> Vec<Self> {
        processes.iter().map(Self::from_process).collect()
    }
}

/// Aggregate statistics of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    /// Policy that produced the run.
    pub algorithm: Algorithm,
    /// Number of processes simulated.
    pub process_count: usize,
    /// Makespan.
    pub total_time: Time,
    /// Time spent executing processes.
    pub busy_time: Time,
    /// Time spent switching context.
    pub context_switch_time: Time,
    /// Time spent with nothing to run.
    pub idle_time: Time,
    /// Number of times the CPU changed process.
    pub context_switches: usize,
    /// busy_time / total_time (0 when total_time is 0).
    pub cpu_utilization: f64,
    /// process_count / total_time (0 when total_time is 0).
    pub throughput: f64,
}

/// Averages over the per-process metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time over dispatched processes.
    pub avg_response: f64,
    /// Largest waiting time of any single process.
    pub max_waiting: Time,
}

impl AggregateMetrics {
    /// Computes averages from per-process metrics.
    pub fn calculate(metrics: &[ProcessMetrics]) -> Self {
        if metrics.is_empty() {
            return Self::default();
        }

        let n = metrics.len() as f64;
        let total_waiting: Time = metrics.iter().map(|m| m.waiting).sum();
        let total_turnaround: Time = metrics.iter().map(|m| m.turnaround).sum();

        let responses: Vec<Time> = metrics
            .iter()
            .map(|m| m.response)
            .filter(|&r| r != NOT_SET)
            .collect();
        let avg_response = if responses.is_empty() {
            0.0
        } else {
            responses.iter().sum::<Time>() as f64 / responses.len() as f64
        };

        Self {
            avg_waiting: total_waiting as f64 / n,
            avg_turnaround: total_turnaround as f64 / n,
            avg_response,
            max_waiting: metrics.iter().map(|m| m.waiting).max().unwrap_or(0),
        }
    }
}
