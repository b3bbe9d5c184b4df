//! Scheduling context for dispatch decisions.

use crate::models::Time;

/// Clock state passed to policies at each decision point.
///
/// All times are ticks relative to the simulation epoch (t=0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulingContext {
    /// Current simulation time.
    pub now: Time,
    /// Earliest arrival not yet admitted, if any process is still to arrive.
    ///
    /// Can be at or before `now` when the arrival fell inside the context
    /// switch that preceded this dispatch.
    pub next_arrival: Option<Time>,
}

impl SchedulingContext {
    /// Creates a context at the given time with no pending arrivals.
    pub fn at_time(now: Time) -> Self {
        Self {
            now,
            next_arrival: None,
        }
    }

    /// Sets the next pending arrival.
    pub fn with_next_arrival(mut self, arrival: Option<Time>) -> Self {
        self.next_arrival = arrival;
        self
    }

    /// Ticks until the next arrival, if one is pending.
    ///
    /// Zero or negative once that arrival is already due.
    pub fn until_next_arrival(&self) -> Option<Time> {
        self.next_arrival.map(|a| a - self.now)
    }
}
