//! Single-CPU simulation engine and KPI evaluation.
//!
//! Provides the shared discrete-event loop that drives every policy and
//! the metrics derived from a finished run.
//!
//! # Algorithm
//!
//! `Simulator` advances an integer clock from t=0, delegating the two
//! per-dispatch decisions (which process, how long) to a
//! [`crate::dispatching::Policy`]. Context-switch and idle intervals are
//! accounted by the loop itself, identically for all policies.
//!
//! # KPI
//!
//! `ProcessMetrics` and `SimSummary` report waiting, turnaround and
//! response times plus utilization, throughput and makespan.
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5.2-5.3
//! - Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

mod kpi;
mod simulator;
mod sink;

pub use kpi::{AggregateMetrics, ProcessMetrics, SimSummary, NOT_SET};
pub use simulator::{SimulationOutcome, Simulator};
pub use sink::{Tee, TimelineSink};
