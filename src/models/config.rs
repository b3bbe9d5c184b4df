//! Simulation configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Time;

/// Round-robin quantum used when a non-positive value is supplied.
pub const DEFAULT_QUANTUM: Time = 4;

/// The five scheduling policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// First-come-first-served (non-preemptive).
    Fcfs,
    /// Round robin with a fixed quantum.
    Rr,
    /// Shortest job first (non-preemptive, keyed on burst).
    Sjf,
    /// Shortest remaining time first (preemptive).
    Srtf,
    /// Static priority (non-preemptive, lower value first).
    Prio,
}

impl Algorithm {
    /// All policies, in reporting order.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Fcfs,
        Algorithm::Rr,
        Algorithm::Sjf,
        Algorithm::Srtf,
        Algorithm::Prio,
    ];

    /// Short command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => "fcfs",
            Algorithm::Rr => "rr",
            Algorithm::Sjf => "sjf",
            Algorithm::Srtf => "srtf",
            Algorithm::Prio => "prio",
        }
    }

    /// Whether the policy can take the CPU away from a running process.
    pub fn is_preemptive(&self) -> bool {
        matches!(self, Algorithm::Rr | Algorithm::Srtf)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when an algorithm name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAlgorithm(pub String);

impl fmt::Display for UnknownAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown algo: {}", self.0)
    }
}

impl std::error::Error for UnknownAlgorithm {}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Policy to simulate.
    pub algorithm: Algorithm,
    /// Ticks charged whenever the CPU changes process.
    pub context_switch_cost: Time,
    /// Round-robin time slice. Non-positive values fall back to [`DEFAULT_QUANTUM`].
    pub quantum: Time,
}

impl SimConfig {
    /// Creates a configuration with no context-switch cost and the default quantum.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            context_switch_cost: 0,
            quantum: DEFAULT_QUANTUM,
        }
    }

    /// Sets the context-switch cost. Negative values are clamped to zero.
    pub fn with_context_switch_cost(mut self, cost: Time) -> Self {
        self.context_switch_cost = cost.max(0);
        self
    }

    /// Sets the round-robin quantum.
    pub fn with_quantum(mut self, quantum: Time) -> Self {
        self.quantum = quantum;
        self
    }

    /// Quantum actually used by round robin.
    pub fn effective_quantum(&self) -> Time {
        if self.quantum > 0 {
            self.quantum
        } else {
            DEFAULT_QUANTUM
        }
    }
}
