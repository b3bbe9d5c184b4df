//! Reproducible random workloads.
//!
//! Generates process sets for experiments and property tests. The same
//! parameters and seed always yield the same processes.
//!
//! # Usage
//!
//! ```
//! use u_cpusim::workload::WorkloadSpec;
//!
//! let processes = WorkloadSpec::new(20).with_seed(7).generate();
//! assert_eq!(processes.len(), 20);
//! assert!(processes.iter().all(|p| p.burst >= 1));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{Pid, Process, Time};

/// Parameters of a random workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    /// Number of processes (pids `1..=count`).
    pub count: usize,
    /// Arrivals are drawn uniformly from `0..=max_arrival`.
    pub max_arrival: Time,
    /// Smallest burst.
    pub min_burst: Time,
    /// Largest burst.
    pub max_burst: Time,
    /// Priorities are drawn uniformly from `0..=max_priority`.
    pub max_priority: i32,
    /// RNG seed.
    pub seed: u64,
}

impl WorkloadSpec {
    /// A workload of `count` processes with moderate defaults.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            max_arrival: 20,
            min_burst: 1,
            max_burst: 10,
            max_priority: 5,
            seed: 0,
        }
    }

    /// Sets the arrival window.
    pub fn with_max_arrival(mut self, max_arrival: Time) -> Self {
        self.max_arrival = max_arrival.max(0);
        self
    }

    /// Sets the burst range. Bursts are always at least 1.
    pub fn with_burst_range(mut self, min_burst: Time, max_burst: Time) -> Self {
        self.min_burst = min_burst.max(1);
        self.max_burst = max_burst.max(self.min_burst);
        self
    }

    /// Sets the largest priority value.
    pub fn with_max_priority(mut self, max_priority: i32) -> Self {
        self.max_priority = max_priority.max(0);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates the process set, in pid order.
    pub fn generate(&self) -> Vec<Process> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let min_burst = self.min_burst.max(1);
        let max_burst = self.max_burst.max(min_burst);

        (1..=self.count)
            .map(|pid| {
                let arrival = rng.random_range(0..=self.max_arrival.max(0));
                let burst = rng.random_range(min_burst..=max_burst);
                let priority = rng.random_range(0..=self.max_priority.max(0));
                Process::new(pid as Pid, arrival, burst).with_priority(priority)
            })
            .collect()
    }
}
