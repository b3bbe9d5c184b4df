//! Rule engine for selection-based dispatching.
//!
//! Composes selection rules lexicographically: the first rule decides,
//! later rules only break ties, and a final tie-breaker makes the choice
//! deterministic.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{RuleScore, SchedulingContext, SelectionRule};
use crate::models::Process;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep the earlier process in arena order.
    #[default]
    NextRule,
    /// Lowest pid first.
    ByPid,
}

/// A composable rule engine for process selection.
///
/// # Example
/// ```
/// use u_cpusim::dispatching::{RuleEngine, TieBreaker};
/// use u_cpusim::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Priority)
///     .with_rule(rules::Fifo)
///     .with_final_tie_breaker(TieBreaker::ByPid);
/// assert_eq!(engine.rule_names(), vec!["PRIORITY", "FIFO"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn SelectionRule>>,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Rules are applied in insertion order.
    pub fn with_rule<R: SelectionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Returns the index of the best eligible process at `context.now`.
    ///
    /// Eligible means arrived (`arrival <= now`) with work remaining.
    pub fn select_best(&self, processes: &[Process], context: &SchedulingContext) -> Option<usize> {
        processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_ready_at(context.now))
            .min_by(|(_, a), (_, b)| self.compare(a, b, context))
            .map(|(idx, _)| idx)
    }

    /// Eligible process indices, best first.
    pub fn rank(&self, processes: &[Process], context: &SchedulingContext) -> Vec<usize> {
        let mut indices: Vec<usize> = processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_ready_at(context.now))
            .map(|(idx, _)| idx)
            .collect();
        indices.sort_by(|&a, &b| self.compare(&processes[a], &processes[b], context));
        indices
    }

    /// Scores of a single process under each rule.
    pub fn evaluate(&self, process: &Process, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|r| r.evaluate(process, context))
            .collect()
    }

    fn compare(&self, a: &Process, b: &Process, context: &SchedulingContext) -> Ordering {
        for rule in &self.rules {
            let ord = rule.evaluate(a, context).cmp(&rule.evaluate(b, context));
            if ord != Ordering::Equal {
                return ord;
            }
        }

        match self.tie_breaker {
            TieBreaker::NextRule => Ordering::Equal,
            TieBreaker::ByPid => a.pid.cmp(&b.pid),
        }
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;

    fn procs() -> Vec<Process> {
        vec![
            Process::new(3, 0, 5).with_priority(1),
            Process::new(1, 2, 5).with_priority(1),
            Process::new(2, 0, 2).with_priority(4),
            Process::new(4, 9, 1).with_priority(0),
        ]
    }

    #[test]
    fn test_select_ignores_unarrived() {
        let engine = RuleEngine::new().with_rule(rules::Spt);
        let ctx = SchedulingContext::at_time(0);
        // pid 4 is shortest but arrives at 9
        assert_eq!(engine.select_best(&procs(), &ctx), Some(2));
    }

    #[test]
    fn test_select_ignores_finished() {
        let mut ps = procs();
        ps[2].remaining = 0;
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_final_tie_breaker(TieBreaker::ByPid);
        let ctx = SchedulingContext::at_time(2);
        // pids 3 and 1 tie on burst 5 → lowest pid
        assert_eq!(engine.select_best(&ps, &ctx), Some(1));
    }

    #[test]
    fn test_next_rule_keeps_arena_order() {
        let ps = vec![Process::new(9, 0, 3), Process::new(1, 0, 3)];
        let engine = RuleEngine::new().with_rule(rules::Spt);
        assert_eq!(
            engine.select_best(&ps, &SchedulingContext::at_time(0)),
            Some(0)
        );
    }

    #[test]
    fn test_sequential_tie_breaking() {
        let engine = RuleEngine::new()
            .with_rule(rules::Priority)
            .with_rule(rules::Fifo)
            .with_final_tie_breaker(TieBreaker::ByPid);
        let ctx = SchedulingContext::at_time(2);
        // priority 1: pid 3 (arrival 0) and pid 1 (arrival 2) → earlier arrival wins
        assert_eq!(engine.rank(&procs(), &ctx), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_processes() {
        let engine = RuleEngine::new().with_rule(rules::Spt);
        let ctx = SchedulingContext::at_time(0);
        assert!(engine.select_best(&[], &ctx).is_none());
        assert!(engine.rank(&[], &ctx).is_empty());
    }

    #[test]
    fn test_evaluate_scores() {
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_rule(rules::Priority);
        let p = Process::new(1, 0, 6).with_priority(3);
        assert_eq!(
            engine.evaluate(&p, &SchedulingContext::at_time(0)),
            vec![6, 3]
        );
    }
}
