//! Dispatching policies and selection rules.
//!
//! Each scheduling policy is a [`Policy`]: the shared event loop in
//! [`crate::scheduler::Simulator`] calls it at two decision points, "which
//! process runs next" and "for how long". Queue-based policies (FCFS, RR)
//! keep a [`ReadyQueue`]; selection-based policies (SJF, SRTF, Priority)
//! rescan the arrived processes with a [`RuleEngine`] every time.
//!
//! # Usage
//!
//! ```
//! use u_cpusim::dispatching::{RuleEngine, SchedulingContext, TieBreaker};
//! use u_cpusim::dispatching::rules;
//! use u_cpusim::models::Process;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Spt)
//!     .with_final_tie_breaker(TieBreaker::ByPid);
//!
//! let processes = vec![Process::new(1, 0, 8), Process::new(2, 0, 3)];
//! let context = SchedulingContext::at_time(0);
//! assert_eq!(engine.select_best(&processes, &context), Some(1));
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne, "Operating System Concepts", Ch. 5
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
mod policies;
mod queue;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{RuleEngine, TieBreaker};
pub use policies::{
    policy_for, FcfsPolicy, PriorityPolicy, RoundRobinPolicy, SjfPolicy, SrtfPolicy,
};
pub use queue::ReadyQueue;

use crate::models::{Algorithm, Process, Time};
use std::fmt::Debug;

/// Score returned by a selection rule.
///
/// Lower scores = higher priority (selected first).
pub type RuleScore = i64;

/// A rule that ranks eligible processes.
///
/// # Score Convention
/// **Lower score = selected first.**
pub trait SelectionRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT").
    fn name(&self) -> &'static str;

    /// Evaluates a process at the current decision point.
    fn evaluate(&self, process: &Process, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// A scheduling policy plugged into the shared event loop.
///
/// The loop calls [`Policy::admit`] for every arrival (in arrival order,
/// before any dispatch at that instant), [`Policy::select`] to pick the next
/// process, [`Policy::slice`] to size the dispatch, and [`Policy::requeue`]
/// when the slice ends with work left. Arrivals during a slice are admitted
/// before the preempted process is requeued.
pub trait Policy: Debug {
    /// The algorithm this policy implements.
    fn algorithm(&self) -> Algorithm;

    /// A process at `index` has arrived.
    fn admit(&mut self, _index: usize) {}

    /// Picks the next process to run, or `None` if nothing is eligible.
    fn select(&mut self, processes: &[Process], context: &SchedulingContext) -> Option<usize>;

    /// Run length for the selected process, starting at `context.now`.
    fn slice(&self, process: &Process, context: &SchedulingContext) -> Time;

    /// The process at `index` ran its slice and still has work left.
    fn requeue(&mut self, _index: usize) {}
}
