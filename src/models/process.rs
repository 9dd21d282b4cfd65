//! Process model.
//!
//! A process is the unit of work handed to a scheduler: immutable input
//! (`id`, `arrival`, `burst`) plus the mutable simulation state a
//! scheduler updates (`remaining`, `completion`).
//!
//! # Time Representation
//! All times are integer simulated time units relative to t=0.

use serde::{Deserialize, Serialize};

/// A process to be scheduled on the single simulated CPU.
///
/// Schedulers always work on an independent copy (see [`Process::fresh_copy`]);
/// the caller's records are never mutated, so one list can be simulated
/// under several policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique identifier (`P1`, `P2`, ...).
    pub id: String,
    /// Time at which the process becomes eligible to run.
    pub arrival: i64,
    /// Total service time required.
    pub burst: i64,
    /// Service time not yet executed (`0..=burst`).
    #[serde(default)]
    pub remaining: i64,
    /// Time at which the process finished. `None` until scheduled.
    #[serde(default)]
    pub completion: Option<i64>,
}

impl Process {
    /// Creates a process with `remaining = burst` and no completion.
    pub fn new(id: impl Into<String>, arrival: i64, burst: i64) -> Self {
        Self {
            id: id.into(),
            arrival,
            burst,
            remaining: burst,
            completion: None,
        }
    }

    /// Returns a copy with simulation state reset.
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.id.clone(), self.arrival, self.burst)
    }

    /// Whether the process has arrived by `time`.
    #[inline]
    pub fn has_arrived(&self, time: i64) -> bool {
        self.arrival <= time
    }

    /// Whether all service time has been executed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Executes `units` of service and returns the new remaining time.
    pub(crate) fn execute(&mut self, units: i64) -> i64 {
        self.remaining -= units;
        self.remaining
    }

    /// Records completion at `time`.
    pub(crate) fn complete_at(&mut self, time: i64) {
        self.completion = Some(time);
    }

    /// Turnaround time (`completion - arrival`), if completed.
    pub fn turnaround(&self) -> Option<i64> {
        self.completion.map(|c| c - self.arrival)
    }

    /// Waiting time (`turnaround - burst`), if completed.
    pub fn waiting(&self) -> Option<i64> {
        self.turnaround().map(|t| t - self.burst)
    }
}

/// Formats the sequential id for the `n`-th submitted process (1-based).
pub fn process_id(n: u32) -> String {
    format!("P{n}")
}
