//! Simulation domain models.
//!
//! Provides the data types describing a simulation input (processes and
//! configuration) and its output (the CPU timeline).
//!
//! # Domain Mappings
//!
//! | u-cpusim | Operating system | Job shop |
//! |----------|------------------|----------|
//! | Process | Task / thread | Job |
//! | Timeline | Dispatch trace | Gantt chart |
//! | Context switch | Register save/restore | Setup time |

mod config;
mod process;
mod timeline;

pub use config::{Algorithm, SimConfig, UnknownAlgorithm, DEFAULT_QUANTUM};
pub use process::{sort_by_arrival, Pid, Process, Time};
pub use timeline::{EventKind, Timeline, TimelineEvent};
