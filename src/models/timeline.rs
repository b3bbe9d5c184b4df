//! Timeline (solution) model.
//!
//! A timeline is the ordered list of intervals the CPU spent running a
//! process, switching context, or idling. Intervals are contiguous: each
//! event's `end` equals the next event's `start`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Pid, Time};

/// What the CPU was doing during an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// Executing a process.
    Run,
    /// Paying the context-switch cost.
    Cs,
    /// Nothing eligible to run.
    Idle,
}

impl EventKind {
    /// Label used in the timeline output.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Run => "RUN",
            EventKind::Cs => "CS",
            EventKind::Idle => "IDLE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single `[start, end)` interval on the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Interval start.
    pub start: Time,
    /// Interval end (exclusive).
    pub end: Time,
    /// Running process; `None` for CS and IDLE.
    pub pid: Option<Pid>,
    /// Event kind.
    pub kind: EventKind,
}

impl TimelineEvent {
    /// A RUN interval for `pid`.
    pub fn run(start: Time, end: Time, pid: Pid) -> Self {
        Self {
            start,
            end,
            pid: Some(pid),
            kind: EventKind::Run,
        }
    }

    /// A context-switch interval.
    pub fn context_switch(start: Time, end: Time) -> Self {
        Self {
            start,
            end,
            pid: None,
            kind: EventKind::Cs,
        }
    }

    /// An idle interval.
    pub fn idle(start: Time, end: Time) -> Self {
        Self {
            start,
            end,
            pid: None,
            kind: EventKind::Idle,
        }
    }

    /// Interval length.
    #[inline]
    pub fn duration(&self) -> Time {
        self.end - self.start
    }
}

/// Ordered sequence of timeline events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    /// Events in chronological order.
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: TimelineEvent) {
        self.events.push(event);
    }

    /// Makespan: end of the last event.
    pub fn makespan(&self) -> Time {
        self.events.last().map(|e| e.end).unwrap_or(0)
    }

    /// Total time spent in events of `kind`.
    pub fn total(&self, kind: EventKind) -> Time {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.duration())
            .sum()
    }

    /// Number of events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    /// RUN intervals belonging to `pid`.
    pub fn runs_for(&self, pid: Pid) -> Vec<&TimelineEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Run && e.pid == Some(pid))
            .collect()
    }

    /// Pids in the order they ran, merging back-to-back RUN events of the same pid.
    pub fn dispatch_order(&self) -> Vec<Pid> {
        let mut order: Vec<Pid> = Vec::new();
        for pid in self.events.iter().filter_map(|e| match e.kind {
            EventKind::Run => e.pid,
            _ => None,
        }) {
            if order.last() != Some(&pid) {
                order.push(pid);
            }
        }
        order
    }

    /// Whether each event starts where the previous one ended.
    pub fn is_contiguous(&self) -> bool {
        self.events.windows(2).all(|w| w[0].end == w[1].start)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the timeline has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_timeline() -> Timeline {
        let mut t = Timeline::new();
        t.push(TimelineEvent::idle(0, 2));
        t.push(TimelineEvent::run(2, 4, 1));
        t.push(TimelineEvent::context_switch(4, 5));
        t.push(TimelineEvent::run(5, 8, 2));
        t.push(TimelineEvent::run(8, 9, 2));
        t
    }

    #[test]
    fn test_timeline_totals() {
        let t = sample_timeline();
        assert_eq!(t.makespan(), 9);
        assert_eq!(t.total(EventKind::Run), 6);
        assert_eq!(t.total(EventKind::Cs), 1);
        assert_eq!(t.total(EventKind::Idle), 2);
        assert_eq!(t.count(EventKind::Run), 3);
    }

    #[test]
    fn test_dispatch_order_merges_consecutive() {
        assert_eq!(sample_timeline().dispatch_order(), vec![1, 2]);
    }

    #[test]
    fn test_runs_for() {
        let t = sample_timeline();
        assert_eq!(t.runs_for(2).len(), 2);
        assert!(t.runs_for(9).is_empty());
    }

    #[test]
    fn test_contiguity() {
        let mut t = sample_timeline();
        assert!(t.is_contiguous());
        t.push(TimelineEvent::run(10, 11, 3));
        assert!(!t.is_contiguous());
    }

    #[test]
    fn test_empty_timeline() {
        let t = Timeline::new();
        assert_eq!(t.makespan(), 0);
        assert!(t.is_empty());
        assert!(t.is_contiguous());
    }

    #[test]
    fn test_event_kind_serde() {
        let e = TimelineEvent::context_switch(1, 2);
        let json = serde_json::to_value(e).unwrap();
        assert_eq!(json["kind"], "CS");
        assert!(json["pid"].is_null());
    }
}
