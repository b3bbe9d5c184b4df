//! Discrete-time CPU scheduling simulator.
//!
//! Replays a list of processes through one of five classic single-CPU
//! policies, charging a fixed context-switch cost, and reports the CPU
//! timeline, per-process metrics, and a run summary.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Process`, `Timeline`, `TimelineEvent`,
//!   `Algorithm`, `SimConfig`
//! - **`dispatching`**: Ready-set selection: the `Policy` trait, the five
//!   policies, and the composable `RuleEngine` they are built from
//! - **`scheduler`**: The shared event loop (`Simulator`), timeline sinks,
//!   and per-process/aggregate metrics
//! - **`validation`**: Input integrity checks and post-run timeline audit
//! - **`io`**: Process list loader and CSV/summary writers
//! - **`compare`**: All-policy comparison reports
//! - **`workload`**: Seeded random process sets
//!
//! # Algorithms
//!
//! | Policy | Preemptive | Selection |
//! |--------|------------|-----------|
//! | FCFS | no | arrival order |
//! | RR | at quantum expiry | FIFO queue, tail re-queue |
//! | SJF | no | shortest burst |
//! | SRTF | at arrivals | shortest remaining time |
//! | PRIO | no | lowest priority value |
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", ch. 2.4

pub mod compare;
pub mod dispatching;
pub mod io;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workload;
