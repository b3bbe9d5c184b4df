//! Discrete-event simulation of a single CPU.
//!
//! # Algorithm
//!
//! 1. Sort processes by arrival (ties by pid) and start the clock at 0.
//! 2. Admit every process with `arrival <= t` to the policy.
//! 3. Ask the policy for the next process. If none is eligible, jump the
//!    clock to the next arrival and record IDLE.
//! 4. If the pid differs from the previous dispatch, charge the
//!    context-switch cost and record CS.
//! 5. Run the policy-sized slice, record RUN, admit arrivals up to the new
//!    `t`, then finish or requeue the process. Slice bounds see the first
//!    arrival after the decision instant, even one landing inside the CS.
//! 6. Repeat until every process has finished.
//!
//! # Complexity
//! O(n) per decision for selection-based policies, O(1) for queue-based ones.

use log::{debug, info, trace, warn};

use super::kpi::{ProcessMetrics, SimSummary};
use super::sink::TimelineSink;
use crate::dispatching::{policy_for, Policy, SchedulingContext};
use crate::models::{
    sort_by_arrival, Algorithm, Pid, Process, SimConfig, Time, Timeline, TimelineEvent,
};

/// Result of a simulation run kept in memory.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    /// Every recorded interval.
    pub timeline: Timeline,
    /// Per-process metrics, in arrival order.
    pub metrics: Vec<ProcessMetrics>,
    /// Aggregate statistics.
    pub summary: SimSummary,
}

/// Runs one scheduling policy over a fixed process set.
///
/// # Example
///
/// ```
/// use u_cpusim::models::{Algorithm, Process, SimConfig};
/// use u_cpusim::scheduler::Simulator;
///
/// let mut processes = vec![Process::new(1, 0, 5), Process::new(2, 2, 3)];
/// let outcome = Simulator::new(SimConfig::new(Algorithm::Fcfs)).run(&mut processes);
///
/// assert_eq!(outcome.summary.total_time, 8);
/// assert_eq!(outcome.metrics[1].waiting, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Creates a simulator for the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulates and collects the timeline in memory.
    ///
    /// `processes` is sorted by arrival and its remaining/timing fields are
    /// updated in place.
    pub fn run(&self, processes: &mut [Process]) -> SimulationOutcome {
        let mut timeline = Timeline::new();
        let summary = self.run_with_sink(processes, &mut timeline);
        SimulationOutcome {
            timeline,
            metrics: ProcessMetrics::collect(processes),
            summary,
        }
    }

    /// Simulates, streaming each timeline event to `sink`.
    ///
    /// Assumes a non-empty collection with unique pids, non-negative
    /// arrivals and positive bursts (see [`crate::validation`]).
    pub fn run_with_sink<S: TimelineSink + ?Sized>(
        &self,
        processes: &mut [Process],
        sink: &mut S,
    ) -> SimSummary {
        let mut policy = policy_for(&self.config);
        self.drive(policy.as_mut(), processes, sink)
    }

    /// Simulates with a caller-supplied policy.
    pub fn run_policy<S: TimelineSink + ?Sized>(
        &self,
        policy: &mut dyn Policy,
        processes: &mut [Process],
        sink: &mut S,
    ) -> SimSummary {
        self.drive(policy, processes, sink)
    }

    fn drive<S: TimelineSink + ?Sized>(
        &self,
        policy: &mut dyn Policy,
        processes: &mut [Process],
        sink: &mut S,
    ) -> SimSummary {
        sort_by_arrival(processes);
        let n = processes.len();
        let algorithm = policy.algorithm();
        info!(
            "simulating {algorithm} over {n} processes (cs={}, quantum={})",
            self.config.context_switch_cost,
            self.config.effective_quantum()
        );

        let mut clock = Clock::new(self.config.context_switch_cost, sink);
        let mut cursor = 0;
        let mut completed = processes.iter().filter(|p| !p.is_pending()).count();

        admit_arrivals(policy, processes, &mut cursor, clock.now);

        while completed < n {
            let context = SchedulingContext::at_time(clock.now);
            let Some(idx) = policy.select(processes, &context) else {
                let Some(next) = processes.get(cursor).map(|p| p.arrival) else {
                    warn!(
                        "{algorithm}: nothing eligible at t={} and no pending arrival; \
                         {} processes unfinished",
                        clock.now,
                        n - completed
                    );
                    break;
                };
                if next > clock.now {
                    debug!("t={}: idle until next arrival at {next}", clock.now);
                    clock.idle_until(next);
                }
                admit_arrivals(policy, processes, &mut cursor, clock.now);
                continue;
            };

            let pid = processes[idx].pid;
            // bound taken at the decision instant; arrivals during the
            // switch still cut the slice
            let next_arrival = next_arrival_after(processes, cursor, clock.now);
            if clock.last_pid.is_some_and(|last| last != pid) {
                clock.context_switch();
            }

            processes[idx].mark_dispatched(clock.now);
            let context = SchedulingContext::at_time(clock.now).with_next_arrival(next_arrival);
            let run = policy.slice(&processes[idx], &context).max(1);
            debug_assert!(
                run <= processes[idx].remaining,
                "pid {pid} sliced beyond its remaining demand"
            );
            debug!("t={}: dispatch pid {pid} for {run}", clock.now);

            clock.run(pid, run);
            let finished = processes[idx].consume(run, clock.now);
            admit_arrivals(policy, processes, &mut cursor, clock.now);

            if finished {
                completed += 1;
                debug!("t={}: pid {pid} finished", clock.now);
            } else {
                policy.requeue(idx);
            }
            clock.last_pid = Some(pid);
        }

        let summary = clock.summary(algorithm, n);
        info!(
            "{algorithm} finished: makespan={}, utilization={:.3}, throughput={:.3}",
            summary.total_time, summary.cpu_utilization, summary.throughput
        );
        summary
    }
}

/// Admits every not-yet-admitted process with `arrival <= now`.
fn admit_arrivals(
    policy: &mut dyn Policy,
    processes: &[Process],
    cursor: &mut usize,
    now: Time,
) {
    while let Some(p) = processes.get(*cursor) {
        if p.arrival > now {
            break;
        }
        trace!("t={now}: pid {} arrives", p.pid);
        if p.is_pending() {
            policy.admit(*cursor);
        }
        *cursor += 1;
    }
}

/// Earliest arrival strictly after `now` among processes not yet admitted.
fn next_arrival_after(processes: &[Process], cursor: usize, now: Time) -> Option<Time> {
    processes[cursor..]
        .iter()
        .map(|p| p.arrival)
        .find(|&a| a > now)
}

/// Simulation clock and time accounting.
struct Clock<'a, S: TimelineSink + ?Sized> {
    now: Time,
    cs_cost: Time,
    last_pid: Option<Pid>,
    busy: Time,
    cs_time: Time,
    idle: Time,
    switches: usize,
    sink: &'a mut S,
}

impl<'a, S: TimelineSink + ?Sized> Clock<'a, S> {
    fn new(cs_cost: Time, sink: &'a mut S) -> Self {
        Self {
            now: 0,
            cs_cost: cs_cost.max(0),
            last_pid: None,
            busy: 0,
            cs_time: 0,
            idle: 0,
            switches: 0,
            sink,
        }
    }

    fn emit(&mut self, event: TimelineEvent) {
        if event.duration() <= 0 {
            return;
        }
        trace!("{},{},{:?},{}", event.start, event.end, event.pid, event.kind);
        self.sink.record(&event);
    }

    fn idle_until(&mut self, until: Time) {
        self.emit(TimelineEvent::idle(self.now, until));
        self.idle += until - self.now;
        self.now = until;
    }

    fn context_switch(&mut self) {
        self.switches += 1;
        let end = self.now + self.cs_cost;
        self.emit(TimelineEvent::context_switch(self.now, end));
        self.cs_time += self.cs_cost;
        self.now = end;
    }

    fn run(&mut self, pid: Pid, run: Time) {
        let end = self.now + run;
        self.emit(TimelineEvent::run(self.now, end, pid));
        self.busy += run;
        self.now = end;
    }

    fn summary(&self, algorithm: Algorithm, process_count: usize) -> SimSummary {
        SimSummary {
            algorithm,
            process_count,
            total_time: self.now,
            busy_time: self.busy,
            context_switch_time: self.cs_time,
            idle_time: self.idle,
            context_switches: self.switches,
            cpu_utilization: ratio(self.busy as f64, self.now),
            throughput: ratio(process_count as f64, self.now),
        }
    }
}

fn ratio(numerator: f64, total_time: Time) -> f64 {
    if total_time > 0 {
        numerator / total_time as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;

    fn run(algo: Algorithm, cs: Time, quantum: Time, processes: &mut [Process]) -> SimulationOutcome {
        let config = SimConfig::new(algo)
            .with_context_switch_cost(cs)
            .with_quantum(quantum);
        Simulator::new(config).run(processes)
    }

    fn spans(timeline: &Timeline) -> Vec<(Time, Time, Option<Pid>, EventKind)> {
        timeline
            .events
            .iter()
            .map(|e| (e.start, e.end, e.pid, e.kind))
            .collect()
    }

    fn two_procs() -> Vec<Process> {
        vec![Process::new(1, 0, 5), Process::new(2, 2, 3)]
    }

    #[test]
    fn test_fcfs_example() {
        let mut ps = two_procs();
        let out = run(Algorithm::Fcfs, 0, 4, &mut ps);

        assert_eq!(
            spans(&out.timeline),
            vec![(0, 5, Some(1), EventKind::Run), (5, 8, Some(2), EventKind::Run)]
        );
        let m1 = &out.metrics[0];
        assert_eq!((m1.waiting, m1.turnaround, m1.response), (0, 5, 0));
        let m2 = &out.metrics[1];
        assert_eq!((m2.waiting, m2.turnaround, m2.response), (3, 6, 3));
        assert_eq!(out.summary.total_time, 8);
        assert!((out.summary.cpu_utilization - 1.0).abs() < 1e-10);
        assert!((out.summary.throughput - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_rr_example() {
        let mut ps = two_procs();
        let out = run(Algorithm::Rr, 0, 2, &mut ps);

        assert_eq!(
            spans(&out.timeline),
            vec![
                (0, 2, Some(1), EventKind::Run),
                (2, 4, Some(2), EventKind::Run),
                (4, 6, Some(1), EventKind::Run),
                (6, 7, Some(2), EventKind::Run),
                (7, 8, Some(1), EventKind::Run),
            ]
        );
        assert_eq!(out.summary.total_time, 8);
        assert!((out.summary.cpu_utilization - 1.0).abs() < 1e-10);
        assert_eq!(ps[0].finish_time, Some(8));
        assert_eq!(ps[1].finish_time, Some(7));
    }

    #[test]
    fn test_srtf_example_with_context_switch() {
        let mut ps = vec![Process::new(1, 0, 6), Process::new(2, 2, 2)];
        let out = run(Algorithm::Srtf, 1, 4, &mut ps);

        assert_eq!(
            spans(&out.timeline),
            vec![
                (0, 2, Some(1), EventKind::Run),
                (2, 3, None, EventKind::Cs),
                (3, 5, Some(2), EventKind::Run),
                (5, 6, None, EventKind::Cs),
                (6, 10, Some(1), EventKind::Run),
            ]
        );
        assert_eq!(out.summary.context_switches, 2);
        assert_eq!(out.summary.context_switch_time, 2);
        assert_eq!(out.summary.busy_time, 8);
        assert_eq!(ps[1].first_response_time, Some(3));
        assert_eq!(out.metrics[1].response, 1);
    }

    #[test]
    fn test_srtf_arrival_during_context_switch() {
        // pid 3 arrives while the switch to pid 2 is in progress
        let mut ps = vec![
            Process::new(1, 0, 10),
            Process::new(2, 2, 5),
            Process::new(3, 3, 1),
        ];
        let out = run(Algorithm::Srtf, 2, 4, &mut ps);

        assert_eq!(
            spans(&out.timeline),
            vec![
                (0, 2, Some(1), EventKind::Run),
                (2, 4, None, EventKind::Cs),
                (4, 5, Some(2), EventKind::Run),
                (5, 7, None, EventKind::Cs),
                (7, 8, Some(3), EventKind::Run),
                (8, 10, None, EventKind::Cs),
                (10, 14, Some(2), EventKind::Run),
                (14, 16, None, EventKind::Cs),
                (16, 24, Some(1), EventKind::Run),
            ]
        );
        let waiting: Vec<Time> = out.metrics.iter().map(|m| m.waiting).collect();
        assert_eq!(waiting, vec![14, 7, 4]);
        let response: Vec<Time> = out.metrics.iter().map(|m| m.response).collect();
        assert_eq!(response, vec![0, 2, 4]);
    }

    #[test]
    fn test_initial_gap_is_idle() {
        let mut ps = vec![Process::new(1, 3, 2)];
        for algo in Algorithm::ALL {
            for p in ps.iter_mut() {
                p.reset();
            }
            let out = run(algo, 2, 4, &mut ps);
            assert_eq!(
                spans(&out.timeline),
                vec![(0, 3, None, EventKind::Idle), (3, 5, Some(1), EventKind::Run)],
                "{algo}"
            );
            assert_eq!(out.summary.idle_time, 3);
            assert_eq!(out.summary.context_switches, 0);
        }
    }

    #[test]
    fn test_context_switch_after_idle_gap() {
        let mut ps = vec![Process::new(1, 0, 2), Process::new(2, 5, 1)];
        let out = run(Algorithm::Fcfs, 1, 4, &mut ps);
        assert_eq!(
            spans(&out.timeline),
            vec![
                (0, 2, Some(1), EventKind::Run),
                (2, 5, None, EventKind::Idle),
                (5, 6, None, EventKind::Cs),
                (6, 7, Some(2), EventKind::Run),
            ]
        );
    }

    #[test]
    fn test_rr_alone_not_charged_repeatedly() {
        let mut ps = vec![Process::new(1, 0, 7)];
        let out = run(Algorithm::Rr, 3, 2, &mut ps);
        assert_eq!(out.timeline.count(EventKind::Cs), 0);
        assert_eq!(out.timeline.count(EventKind::Run), 4);
        assert_eq!(out.summary.total_time, 7);
    }

    #[test]
    fn test_rr_arrival_during_slice_goes_first() {
        // pid 2 arrives during pid 1's slice; it must run before pid 1 returns
        let mut ps = vec![
            Process::new(1, 0, 4),
            Process::new(2, 1, 2),
            Process::new(3, 0, 2),
        ];
        let out = run(Algorithm::Rr, 0, 2, &mut ps);
        assert_eq!(out.timeline.dispatch_order(), vec![1, 3, 2, 1]);
    }

    #[test]
    fn test_sjf_non_preemptive() {
        let mut ps = vec![
            Process::new(1, 0, 7),
            Process::new(2, 1, 4),
            Process::new(3, 2, 1),
            Process::new(4, 3, 4),
        ];
        let out = run(Algorithm::Sjf, 0, 4, &mut ps);
        // 1 runs to completion, then 3 (shortest), then 2/4 tie on burst → lower pid
        assert_eq!(out.timeline.dispatch_order(), vec![1, 3, 2, 4]);
        assert_eq!(out.timeline.count(EventKind::Run), 4);
        assert_eq!(out.summary.total_time, 16);
    }

    #[test]
    fn test_srtf_preempts_on_shorter_arrival() {
        let mut ps = vec![
            Process::new(1, 0, 8),
            Process::new(2, 1, 4),
            Process::new(3, 2, 9),
            Process::new(4, 3, 5),
        ];
        let out = run(Algorithm::Srtf, 0, 4, &mut ps);
        assert_eq!(out.timeline.dispatch_order(), vec![1, 2, 4, 1, 3]);
        let waiting: Vec<Time> = out.metrics.iter().map(|m| m.waiting).collect();
        assert_eq!(waiting, vec![9, 0, 15, 2]);
    }

    #[test]
    fn test_priority_order() {
        let mut ps = vec![
            Process::new(1, 0, 3).with_priority(3),
            Process::new(2, 1, 2).with_priority(1),
            Process::new(3, 1, 2).with_priority(2),
            Process::new(4, 2, 1).with_priority(1),
        ];
        let out = run(Algorithm::Prio, 0, 4, &mut ps);
        // pid 1 holds the CPU; then priority 1 (pid 2 arrived earlier than pid 4), pid 4, pid 3
        assert_eq!(out.timeline.dispatch_order(), vec![1, 2, 4, 3]);
    }

    #[test]
    fn test_fcfs_context_switch_between_every_dispatch() {
        let mut ps = vec![
            Process::new(1, 0, 2),
            Process::new(2, 0, 2),
            Process::new(3, 0, 2),
        ];
        let out = run(Algorithm::Fcfs, 1, 4, &mut ps);
        assert_eq!(out.summary.context_switches, 2);
        assert_eq!(out.summary.total_time, 8);
        assert!((out.summary.cpu_utilization - 0.75).abs() < 1e-10);
    }

    #[test]
    fn test_input_sorted_in_place() {
        let mut ps = vec![Process::new(2, 4, 1), Process::new(1, 0, 1)];
        let out = run(Algorithm::Fcfs, 0, 4, &mut ps);
        assert_eq!(ps[0].pid, 1);
        assert_eq!(out.metrics[0].pid, 1);
    }

    #[test]
    fn test_timeline_contiguous_from_zero() {
        let mut ps = vec![
            Process::new(1, 2, 3),
            Process::new(2, 9, 2),
            Process::new(3, 3, 4),
        ];
        for algo in Algorithm::ALL {
            for p in ps.iter_mut() {
                p.reset();
            }
            let out = run(algo, 1, 2, &mut ps);
            assert!(out.timeline.is_contiguous(), "{algo}");
            assert_eq!(out.timeline.events[0].start, 0, "{algo}");
            assert_eq!(out.timeline.makespan(), out.summary.total_time, "{algo}");
            assert_eq!(
                out.summary.busy_time
                    + out.summary.idle_time
                    + out.summary.context_switch_time,
                out.summary.total_time,
                "{algo}"
            );
        }
    }

    /// Serves the most recently admitted process first.
    #[derive(Debug, Default)]
    struct LastInFirstOut {
        stack: Vec<usize>,
    }

    impl Policy for LastInFirstOut {
        fn algorithm(&self) -> Algorithm {
            Algorithm::Fcfs
        }

        fn admit(&mut self, index: usize) {
            self.stack.push(index);
        }

        fn select(&mut self, _processes: &[Process], _context: &SchedulingContext) -> Option<usize> {
            self.stack.pop()
        }

        fn slice(&self, process: &Process, _context: &SchedulingContext) -> Time {
            process.remaining
        }
    }

    #[test]
    fn test_run_custom_policy() {
        let sim = Simulator::new(SimConfig::new(Algorithm::Fcfs).with_context_switch_cost(1));
        assert_eq!(sim.config().context_switch_cost, 1);

        let mut ps = vec![
            Process::new(1, 0, 3),
            Process::new(2, 1, 2),
            Process::new(3, 2, 1),
        ];
        let mut policy = LastInFirstOut::default();
        let mut timeline = Timeline::new();
        let summary = sim.run_policy(&mut policy, &mut ps, &mut timeline);

        assert_eq!(timeline.dispatch_order(), vec![1, 3, 2]);
        assert_eq!(summary.context_switches, 2);
        assert_eq!(summary.total_time, 8);
        assert_eq!(ps[1].finish_time, Some(8));
    }

    #[test]
    fn test_empty_input() {
        let out = run(Algorithm::Rr, 0, 4, &mut []);
        assert!(out.timeline.is_empty());
        assert_eq!(out.summary.total_time, 0);
        assert_eq!(out.summary.cpu_utilization, 0.0);
        assert_eq!(out.summary.throughput, 0.0);
    }
}
