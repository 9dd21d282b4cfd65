//! First-Come-First-Served.
//!
//! # Algorithm
//!
//! 1. Stable-sort processes by arrival (ties keep insertion order).
//! 2. Run each to completion. If the CPU is free before the next arrival,
//!    it idles until that arrival (a gap in the timeline, not a slice).
//!
//! # Complexity
//! O(n log n).

use super::{arrival_order, run_in_order, Horizon, Scheduler};
use crate::error::SimResult;
use crate::models::{Process, Timeline};

/// First-Come-First-Served, non-preemptive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fcfs;

impl Scheduler for Fcfs {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn schedule_within(
        &self,
        processes: &mut [Process],
        horizon: Horizon,
    ) -> SimResult<Timeline> {
        let order = arrival_order(processes);
        run_in_order(processes, &order, horizon)
    }

    fn description(&self) -> &'static str {
        "First-Come-First-Served"
    }
}
