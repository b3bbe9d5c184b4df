//! Built-in selection rules.
//!
//! # Categories
//!
//! - **Time-based**: SPT (original burst), LWKR (remaining work)
//! - **Queue**: FIFO (arrival time)
//! - **Priority**: PRIORITY (static priority value)
//!
//! # Score Convention
//! All rules return lower scores for processes that should run first.

use super::{RuleScore, SchedulingContext, SelectionRule};
use crate::models::Process;

/// Shortest Processing Time.
///
/// Ranks by the original burst, which never changes. Used by
/// non-preemptive shortest-job-first.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl SelectionRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        process.burst
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Least Work Remaining.
///
/// Ranks by the CPU time still owed. Re-evaluated after every slice,
/// this yields shortest-remaining-time-first.
#[derive(Debug, Clone, Copy)]
pub struct Lwkr;

impl SelectionRule for Lwkr {
    fn name(&self) -> &'static str {
        "LWKR"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        process.remaining
    }

    fn description(&self) -> &'static str {
        "Least Work Remaining"
    }
}

/// First In First Out.
///
/// Ranks by arrival time.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl SelectionRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        process.arrival
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

/// Static priority (lower value = more important).
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl SelectionRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, process: &Process, _context: &SchedulingContext) -> RuleScore {
        RuleScore::from(process.priority)
    }

    fn description(&self) -> &'static str {
        "Process Priority"
    }
}
