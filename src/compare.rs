//! Side-by-side comparison of all scheduling policies.
//!
//! Runs each policy on a fresh copy of the same input and tabulates the
//! average per-process metrics together with the run summary.
//!
//! # Usage
//!
//! ```
//! use u_cpusim::compare::compare_algorithms;
//! use u_cpusim::models::{Algorithm, Process};
//!
//! let processes = vec![Process::new(1, 0, 8), Process::new(2, 1, 2)];
//! let report = compare_algorithms(&processes, 0, 3);
//! assert_eq!(report.rows.len(), 5);
//! assert_eq!(report.best_waiting(), Some(Algorithm::Srtf));
//! ```

use std::fmt::Write as _;

use log::info;
use serde::{Deserialize, Serialize};

use crate::models::{Algorithm, Process, SimConfig, Time};
use crate::scheduler::{AggregateMetrics, SimulationOutcome, Simulator};

/// One policy's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Policy.
    pub algorithm: Algorithm,
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time.
    pub avg_response: f64,
    /// busy / makespan.
    pub cpu_utilization: f64,
    /// processes / makespan.
    pub throughput: f64,
    /// Makespan.
    pub makespan: Time,
}

impl ComparisonRow {
    /// Summarizes one simulation outcome.
    pub fn from_outcome(outcome: &SimulationOutcome) -> Self {
        let agg = AggregateMetrics::calculate(&outcome.metrics);
        Self {
            algorithm: outcome.summary.algorithm,
            avg_waiting: agg.avg_waiting,
            avg_turnaround: agg.avg_turnaround,
            avg_response: agg.avg_response,
            cpu_utilization: outcome.summary.cpu_utilization,
            throughput: outcome.summary.throughput,
            makespan: outcome.summary.total_time,
        }
    }
}

/// Results of every policy over the same input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Context-switch cost used for every run.
    pub context_switch_cost: Time,
    /// Round-robin quantum.
    pub quantum: Time,
    /// One row per policy, in [`Algorithm::ALL`] order.
    pub rows: Vec<ComparisonRow>,
}

/// Runs all five policies over copies of `processes`.
pub fn compare_algorithms(
    processes: &[Process],
    context_switch_cost: Time,
    quantum: Time,
) -> ComparisonReport {
    let rows: Vec<ComparisonRow> = Algorithm::ALL
        .into_iter()
        .map(|algorithm| {
            let config = SimConfig::new(algorithm)
                .with_context_switch_cost(context_switch_cost)
                .with_quantum(quantum);
            let mut fresh: Vec<Process> = processes.to_vec();
            fresh.iter_mut().for_each(Process::reset);
            let outcome = Simulator::new(config).run(&mut fresh);
            ComparisonRow::from_outcome(&outcome)
        })
        .collect();

    info!("compared {} policies over {} processes", rows.len(), processes.len());

    ComparisonReport {
        context_switch_cost: context_switch_cost.max(0),
        quantum,
        rows,
    }
}

impl ComparisonReport {
    /// Policy with the lowest average waiting time.
    pub fn best_waiting(&self) -> Option<Algorithm> {
        self.best_by(|r| r.avg_waiting, false)
    }

    /// Policy with the lowest average turnaround time.
    pub fn best_turnaround(&self) -> Option<Algorithm> {
        self.best_by(|r| r.avg_turnaround, false)
    }

    /// Policy with the lowest average response time.
    pub fn best_response(&self) -> Option<Algorithm> {
        self.best_by(|r| r.avg_response, false)
    }

    /// Policy with the highest CPU utilization.
    pub fn best_utilization(&self) -> Option<Algorithm> {
        self.best_by(|r| r.cpu_utilization, true)
    }

    // First row wins ties, so the result follows `Algorithm::ALL` order.
    fn best_by(&self, key: impl Fn(&ComparisonRow) -> f64, maximize: bool) -> Option<Algorithm> {
        let mut best: Option<&ComparisonRow> = None;
        for row in &self.rows {
            let better = match best {
                None => true,
                Some(b) if maximize => key(row) > key(b),
                Some(b) => key(row) < key(b),
            };
            if better {
                best = Some(row);
            }
        }
        best.map(|r| r.algorithm)
    }

    /// CSV table with a header row.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "algo,avg_waiting,avg_turnaround,avg_response,cpu_utilization,throughput,makespan\n",
        );
        for r in &self.rows {
            let _ = writeln!(
                out,
                "{},{:.6},{:.6},{:.6},{:.6},{:.6},{}",
                r.algorithm,
                r.avg_waiting,
                r.avg_turnaround,
                r.avg_response,
                r.cpu_utilization,
                r.throughput,
                r.makespan
            );
        }
        out
    }

    /// Markdown report with the table and per-metric winners.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Scheduler Comparison Report\n\n");
        let _ = writeln!(
            out,
            "- Context switch cost: **{}**; RR quantum: **{}**\n",
            self.context_switch_cost, self.quantum
        );
        out.push_str(
            "| Algo | Avg Waiting | Avg Turnaround | Avg Response | CPU Util | Throughput | Makespan |\n",
        );
        out.push_str(
            "|------|-------------:|---------------:|-------------:|---------:|-----------:|---------:|\n",
        );
        for r in &self.rows {
            let _ = writeln!(
                out,
                "| {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {} |",
                r.algorithm,
                r.avg_waiting,
                r.avg_turnaround,
                r.avg_response,
                r.cpu_utilization,
                r.throughput,
                r.makespan
            );
        }
        out.push('\n');

        let name = |a: Option<Algorithm>| a.map(|a| a.name()).unwrap_or("-");
        let _ = writeln!(
            out,
            "**Best (lower is better)** → Waiting: `{}`, Turnaround: `{}`, Response: `{}`  ",
            name(self.best_waiting()),
            name(self.best_turnaround()),
            name(self.best_response())
        );
        let _ = writeln!(
            out,
            "**Best (higher is better)** → CPU Utilization: `{}`",
            name(self.best_utilization())
        );
        out
    }
}
