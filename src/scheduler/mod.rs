//! Simulation runs and metrics evaluation.
//!
//! Ties validation, dispatch and metrics together into one call.
//!
//! # Runner
//!
//! `Simulator` validates input, copies the processes, dispatches them with
//! the selected policy, audits the resulting timeline and computes metrics.
//! `SimulationRequest` is the serializable form of the same inputs.
//!
//! # Metrics
//!
//! `ScheduleMetrics` computes per-process turnaround, waiting and response
//! times plus their averages, makespan, utilization and throughput.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

mod metrics;
mod simulation;

pub use metrics::{ProcessMetrics, ScheduleMetrics};
pub use simulation::{
    compare_policies, run_simulation, SimulationRequest, SimulationResult, Simulator,
};
