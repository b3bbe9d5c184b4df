//! Destinations for timeline events.

use crate::models::{Timeline, TimelineEvent};

/// Receives timeline events as the simulation produces them.
///
/// Events arrive in chronological order and never have zero length.
pub trait TimelineSink {
    /// Records one event.
    fn record(&mut self, event: &TimelineEvent);
}

impl TimelineSink for Timeline {
    fn record(&mut self, event: &TimelineEvent) {
        self.push(*event);
    }
}

impl<S: TimelineSink + ?Sized> TimelineSink for &mut S {
    fn record(&mut self, event: &TimelineEvent) {
        (**self).record(event);
    }
}

/// Sink that forwards each event to two sinks.
#[derive(Debug)]
pub struct Tee<A, B> {
    /// First destination.
    pub first: A,
    /// Second destination.
    pub second: B,
}

impl<A: TimelineSink, B: TimelineSink> TimelineSink for Tee<A, B> {
    fn record(&mut self, event: &TimelineEvent) {
        self.first.record(event);
        self.second.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_sink() {
        let mut t = Timeline::new();
        t.record(&TimelineEvent::run(0, 3, 1));
        t.record(&TimelineEvent::idle(3, 4));
        assert_eq!(t.len(), 2);
        assert_eq!(t.makespan(), 4);
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let mut a = Timeline::new();
        let mut b = Timeline::new();
        {
            let mut tee = Tee {
                first: &mut a,
                second: &mut b,
            };
            tee.record(&TimelineEvent::run(0, 1, 7));
        }
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
    }
}
