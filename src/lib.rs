//! Discrete CPU scheduling simulator.
//!
//! Given processes (arrival, burst) and a dispatch discipline, computes the
//! exact execution timeline and the derived waiting/turnaround metrics.
//! Time is a simulated integer unit; there is a single CPU.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Process`, `Policy`, `TimelineSlice`, `Timeline`
//! - **`dispatching`**: `Scheduler` trait with FCFS, SJF/SRTF and Round-Robin
//! - **`scheduler`**: `Simulator` runner, `SimulationRequest`, `ScheduleMetrics`
//! - **`validation`**: Input checks (raw text, ranges, duplicate IDs, quantum)
//! - **`registry`**: `ProcessRegistry` for collaborators that collect input incrementally
//! - **`workload`**: Seeded random process sets
//! - **`error`**: `SimError` taxonomy
//!
//! # Example
//!
//! ```
//! use cpu_sched_sim::models::{Policy, Process};
//! use cpu_sched_sim::scheduler::run_simulation;
//!
//! let processes = vec![
//!     Process::new("P1", 0, 5),
//!     Process::new("P2", 1, 3),
//!     Process::new("P3", 2, 8),
//! ];
//! let result = run_simulation(&processes, &Policy::round_robin(2)).unwrap();
//! assert_eq!(result.timeline.slices()[1].process_id, "P2");
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

pub mod dispatching;
pub mod error;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod validation;
pub mod workload;

pub use error::{SimError, SimResult};
