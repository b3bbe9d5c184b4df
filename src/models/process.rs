//! Process (unit of work) model.
//!
//! A process is fully described up front: identity, arrival time,
//! CPU demand and priority. The simulation mutates only the remaining
//! demand and the write-once timing fields.
//!
//! # Time Representation
//! All times are integer ticks relative to the simulation epoch (t=0).

use serde::{Deserialize, Serialize};

/// Simulated time in ticks.
pub type Time = i64;

/// Process identifier.
pub type Pid = i64;

/// A process to be scheduled on the single simulated CPU.
///
/// `start_time`, `first_response_time` and `finish_time` are write-once:
/// they are `None` until the corresponding event happens and are never
/// overwritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique process identifier (also the final tie-breaker).
    pub pid: Pid,
    /// Time the process becomes eligible to run.
    pub arrival: Time,
    /// Total CPU time required.
    pub burst: Time,
    /// CPU time still owed.
    pub remaining: Time,
    /// Scheduling priority (lower = more important).
    pub priority: i32,
    /// First dispatch time, after any context-switch delay.
    pub start_time: Option<Time>,
    /// Time `remaining` reached zero.
    pub finish_time: Option<Time>,
    /// Time of first CPU allocation.
    pub first_response_time: Option<Time>,
}

impl Process {
    /// Creates a process with `remaining == burst` and priority 0.
    pub fn new(pid: Pid, arrival: Time, burst: Time) -> Self {
        Self {
            pid,
            arrival,
            burst,
            remaining: burst,
            priority: 0,
            start_time: None,
            finish_time: None,
            first_response_time: None,
        }
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether the process still owes CPU time.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.remaining > 0
    }

    /// Whether the process has arrived and still owes CPU time at `now`.
    #[inline]
    pub fn is_ready_at(&self, now: Time) -> bool {
        self.arrival <= now && self.is_pending()
    }

    /// Records the first CPU allocation. Later calls are no-ops.
    pub fn mark_dispatched(&mut self, now: Time) {
        self.start_time.get_or_insert(now);
        self.first_response_time.get_or_insert(now);
    }

    /// Consumes `run` ticks of CPU time ending at `now`.
    ///
    /// Sets `finish_time` when the remaining demand reaches zero.
    /// Returns `true` if the process completed.
    pub fn consume(&mut self, run: Time, now: Time) -> bool {
        debug_assert!(run > 0, "pid {} consumed a non-positive slice", self.pid);
        self.remaining = (self.remaining - run).max(0);
        if self.remaining == 0 && self.finish_time.is_none() {
            self.finish_time = Some(now);
            return true;
        }
        false
    }

    /// Restores load-time state so the process can be simulated again.
    pub fn reset(&mut self) {
        self.remaining = self.burst;
        self.start_time = None;
        self.finish_time = None;
        self.first_response_time = None;
    }
}

/// Sorts processes by arrival time, ties by pid ascending.
pub fn sort_by_arrival(processes: &mut [Process]) {
    processes.sort_by(|a, b| a.arrival.cmp(&b.arrival).then_with(|| a.pid.cmp(&b.pid)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_new() {
        let p = Process::new(7, 3, 5).with_priority(2);
        assert_eq!(p.pid, 7);
        assert_eq!(p.remaining, 5);
        assert_eq!(p.priority, 2);
        assert!(p.start_time.is_none());
        assert!(p.finish_time.is_none());
        assert!(p.first_response_time.is_none());
    }

    #[test]
    fn test_mark_dispatched_is_write_once() {
        let mut p = Process::new(1, 0, 4);
        p.mark_dispatched(2);
        p.mark_dispatched(9);
        assert_eq!(p.start_time, Some(2));
        assert_eq!(p.first_response_time, Some(2));
    }

    #[test]
    fn test_consume_sets_finish_once() {
        let mut p = Process::new(1, 0, 4);
        assert!(!p.consume(3, 3));
        assert_eq!(p.remaining, 1);
        assert!(p.finish_time.is_none());

        assert!(p.consume(1, 6));
        assert_eq!(p.remaining, 0);
        assert_eq!(p.finish_time, Some(6));
    }

    #[test]
    fn test_is_ready_at() {
        let p = Process::new(1, 5, 2);
        assert!(!p.is_ready_at(4));
        assert!(p.is_ready_at(5));
    }

    #[test]
    fn test_reset() {
        let mut p = Process::new(1, 0, 4);
        p.mark_dispatched(0);
        p.consume(4, 4);
        p.reset();
        assert_eq!(p, Process::new(1, 0, 4));
    }

    #[test]
    fn test_sort_by_arrival_ties_by_pid() {
        let mut ps = vec![
            Process::new(3, 2, 1),
            Process::new(2, 0, 1),
            Process::new(1, 2, 1),
        ];
        sort_by_arrival(&mut ps);
        let pids: Vec<Pid> = ps.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![2, 1, 3]);
    }
}
