//! The five scheduling policies.
//!
//! | Policy | Kind | Selection | Slice |
//! |--------|------|-----------|-------|
//! | FCFS | queue | head of FIFO | run to completion |
//! | RR | queue | head of FIFO | `min(remaining, quantum)` |
//! | SJF | selection | smallest burst, then pid | run to completion |
//! | SRTF | selection | smallest remaining, then pid | until done or next arrival |
//! | Priority | selection | lowest priority value, then arrival, then pid | run to completion |

use super::{rules, Policy, ReadyQueue, RuleEngine, SchedulingContext, TieBreaker};
use crate::models::{Algorithm, Process, SimConfig, Time};

/// Builds the policy named by `config.algorithm`.
pub fn policy_for(config: &SimConfig) -> Box<dyn Policy> {
    match config.algorithm {
        Algorithm::Fcfs => Box::new(FcfsPolicy::new()),
        Algorithm::Rr => Box::new(RoundRobinPolicy::new(config.effective_quantum())),
        Algorithm::Sjf => Box::new(SjfPolicy::new()),
        Algorithm::Srtf => Box::new(SrtfPolicy::new()),
        Algorithm::Prio => Box::new(PriorityPolicy::new()),
    }
}

/// First-come-first-served.
///
/// Processes are admitted in arrival order (ties by pid) and run to
/// completion in that order.
#[derive(Debug, Clone, Default)]
pub struct FcfsPolicy {
    queue: ReadyQueue,
}

impl FcfsPolicy {
    /// Creates the policy with an empty ready queue.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for FcfsPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn admit(&mut self, index: usize) {
        self.queue.push(index);
    }

    fn select(&mut self, _processes: &[Process], _context: &SchedulingContext) -> Option<usize> {
        self.queue.pop()
    }

    fn slice(&self, process: &Process, _context: &SchedulingContext) -> Time {
        process.remaining
    }

    fn requeue(&mut self, index: usize) {
        // only reached if a slice ends before completion
        self.queue.push(index);
    }
}

/// Round robin with a fixed quantum.
///
/// A process that exhausts its quantum goes to the tail, behind any
/// process that arrived during its slice.
#[derive(Debug, Clone)]
pub struct RoundRobinPolicy {
    queue: ReadyQueue,
    quantum: Time,
}

impl RoundRobinPolicy {
    /// Creates the policy. The quantum must be positive.
    pub fn new(quantum: Time) -> Self {
        debug_assert!(quantum > 0, "round robin quantum must be positive");
        Self {
            queue: ReadyQueue::new(),
            quantum,
        }
    }

    /// The time slice granted per dispatch.
    pub fn quantum(&self) -> Time {
        self.quantum
    }
}

impl Policy for RoundRobinPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rr
    }

    fn admit(&mut self, index: usize) {
        self.queue.push(index);
    }

    fn select(&mut self, _processes: &[Process], _context: &SchedulingContext) -> Option<usize> {
        self.queue.pop()
    }

    fn slice(&self, process: &Process, _context: &SchedulingContext) -> Time {
        process.remaining.min(self.quantum)
    }

    fn requeue(&mut self, index: usize) {
        self.queue.push(index);
    }
}

/// Shortest job first (non-preemptive).
#[derive(Debug, Clone)]
pub struct SjfPolicy {
    engine: RuleEngine,
}

impl SjfPolicy {
    /// Smallest original burst, ties by lowest pid.
    pub fn new() -> Self {
        Self {
            engine: RuleEngine::new()
                .with_rule(rules::Spt)
                .with_final_tie_breaker(TieBreaker::ByPid),
        }
    }
}

impl Default for SjfPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for SjfPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sjf
    }

    fn select(&mut self, processes: &[Process], context: &SchedulingContext) -> Option<usize> {
        self.engine.select_best(processes, context)
    }

    fn slice(&self, process: &Process, _context: &SchedulingContext) -> Time {
        process.remaining
    }
}

/// Shortest remaining time first (preemptive).
///
/// Slices end at the next arrival so a shorter newcomer can take over.
#[derive(Debug, Clone)]
pub struct SrtfPolicy {
    engine: RuleEngine,
}

impl SrtfPolicy {
    /// Smallest remaining work, ties by lowest pid.
    pub fn new() -> Self {
        Self {
            engine: RuleEngine::new()
                .with_rule(rules::Lwkr)
                .with_final_tie_breaker(TieBreaker::ByPid),
        }
    }
}

impl Default for SrtfPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for SrtfPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Srtf
    }

    fn select(&mut self, processes: &[Process], context: &SchedulingContext) -> Option<usize> {
        self.engine.select_best(processes, context)
    }

    fn slice(&self, process: &Process, context: &SchedulingContext) -> Time {
        let run = match context.until_next_arrival() {
            Some(gap) => process.remaining.min(gap),
            None => process.remaining,
        };
        // at least one tick so the clock always advances
        run.max(1)
    }
}

/// Static priority (non-preemptive, lower value first).
#[derive(Debug, Clone)]
pub struct PriorityPolicy {
    engine: RuleEngine,
}

impl PriorityPolicy {
    /// Lowest priority value, then earliest arrival, then lowest pid.
    pub fn new() -> Self {
        Self {
            engine: RuleEngine::new()
                .with_rule(rules::Priority)
                .with_rule(rules::Fifo)
                .with_final_tie_breaker(TieBreaker::ByPid),
        }
    }
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for PriorityPolicy {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Prio
    }

    fn select(&mut self, processes: &[Process], context: &SchedulingContext) -> Option<usize> {
        self.engine.select_best(processes, context)
    }

    fn slice(&self, process: &Process, _context: &SchedulingContext) -> Time {
        process.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_for_matches_algorithm() {
        for algo in Algorithm::ALL {
            let policy = policy_for(&SimConfig::new(algo));
            assert_eq!(policy.algorithm(), algo);
        }
    }

    #[test]
    fn test_policy_for_uses_effective_quantum() {
        let cfg = SimConfig::new(Algorithm::Rr).with_quantum(0);
        let policy = policy_for(&cfg);
        let p = Process::new(1, 0, 10);
        assert_eq!(policy.slice(&p, &SchedulingContext::at_time(0)), 4);
    }

    #[test]
    fn test_fcfs_pops_in_admission_order() {
        let ps = vec![Process::new(1, 0, 3), Process::new(2, 0, 1)];
        let mut fcfs = FcfsPolicy::new();
        fcfs.admit(0);
        fcfs.admit(1);
        let ctx = SchedulingContext::at_time(0);
        assert_eq!(fcfs.select(&ps, &ctx), Some(0));
        assert_eq!(fcfs.slice(&ps[0], &ctx), 3);
        assert_eq!(fcfs.select(&ps, &ctx), Some(1));
        assert_eq!(fcfs.select(&ps, &ctx), None);
    }

    #[test]
    fn test_rr_slice_and_requeue() {
        let ps = vec![Process::new(1, 0, 5), Process::new(2, 0, 1)];
        let mut rr = RoundRobinPolicy::new(2);
        assert_eq!(rr.quantum(), 2);
        rr.admit(0);
        rr.admit(1);
        let ctx = SchedulingContext::at_time(0);
        assert_eq!(rr.select(&ps, &ctx), Some(0));
        assert_eq!(rr.slice(&ps[0], &ctx), 2);
        rr.requeue(0);
        assert_eq!(rr.select(&ps, &ctx), Some(1));
        assert_eq!(rr.slice(&ps[1], &ctx), 1);
        assert_eq!(rr.select(&ps, &ctx), Some(0));
    }

    #[test]
    fn test_sjf_selects_by_burst() {
        let mut ps = vec![Process::new(1, 0, 4), Process::new(2, 0, 6)];
        // pid 2 has less remaining but SJF looks at the original burst
        ps[1].remaining = 1;
        let mut sjf = SjfPolicy::new();
        assert_eq!(sjf.select(&ps, &SchedulingContext::at_time(0)), Some(0));
    }

    #[test]
    fn test_srtf_slice_bounded_by_next_arrival() {
        let srtf = SrtfPolicy::new();
        let p = Process::new(1, 0, 6);
        let ctx = SchedulingContext::at_time(0).with_next_arrival(Some(2));
        assert_eq!(srtf.slice(&p, &ctx), 2);

        let ctx = SchedulingContext::at_time(0).with_next_arrival(Some(10));
        assert_eq!(srtf.slice(&p, &ctx), 6);

        assert_eq!(srtf.slice(&p, &SchedulingContext::at_time(0)), 6);
    }

    #[test]
    fn test_srtf_slice_never_zero() {
        let srtf = SrtfPolicy::new();
        let p = Process::new(1, 0, 6);
        let ctx = SchedulingContext {
            now: 3,
            next_arrival: Some(3),
        };
        assert_eq!(srtf.slice(&p, &ctx), 1);
    }

    #[test]
    fn test_priority_ties_by_arrival_then_pid() {
        let ps = vec![
            Process::new(5, 0, 3).with_priority(2),
            Process::new(3, 1, 3).with_priority(1),
            Process::new(2, 1, 3).with_priority(1),
        ];
        let mut prio = PriorityPolicy::new();
        assert_eq!(prio.select(&ps, &SchedulingContext::at_time(0)), Some(0));
        assert_eq!(prio.select(&ps, &SchedulingContext::at_time(1)), Some(2));
    }
}
