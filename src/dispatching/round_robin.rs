//! Round-Robin time slicing.
//!
//! # Algorithm (per dispatch)
//!
//! 1. Pop the ready-queue head.
//! 2. Run it for `min(quantum, remaining)` and emit the slice.
//! 3. If work remains, re-queue it at the tail; otherwise record completion.
//!
//! # Admission
//!
//! - [`RoundRobinMode::ArrivalGated`]: a process joins the ready queue only
//!   once it has arrived (arrival order, ties by insertion order).
//!   Admission happens before each dispatch (`arrival <= now`) and again
//!   right after a slice ends for processes that arrived while it ran
//!   (`arrival < end`). Those mid-slice arrivals therefore queue ahead of
//!   the preempted process; a process arriving exactly at the slice end is
//!   admitted after it. If the queue is empty while processes are still to
//!   arrive, the CPU idles until the next arrival.
//! - [`RoundRobinMode::ArrivalAgnostic`]: every process is enqueued up front
//!   in arrival order and the queue is consumed strictly FIFO. A dispatched
//!   process still never starts before its own arrival; the CPU idles
//!   instead.

use std::collections::VecDeque;

use super::{arrival_order, Horizon, Scheduler};
use crate::error::{SimError, SimResult};
use crate::models::{Process, RoundRobinMode, Timeline};

/// Round-Robin scheduler with a fixed quantum.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: i64,
    mode: RoundRobinMode,
}

impl RoundRobin {
    /// Creates a Round-Robin scheduler.
    ///
    /// # Errors
    /// `InvalidQuantum` if `quantum <= 0`.
    pub fn new(quantum: i64, mode: RoundRobinMode) -> SimResult<Self> {
        if quantum <= 0 {
            return Err(SimError::invalid_quantum(quantum));
        }
        Ok(Self { quantum, mode })
    }

    /// The time quantum.
    pub fn quantum(&self) -> i64 {
        self.quantum
    }

    /// The admission mode.
    pub fn mode(&self) -> RoundRobinMode {
        self.mode
    }

    /// Runs the queue head for one quantum and returns the slice end.
    fn dispatch(
        &self,
        process: &mut Process,
        time: i64,
        timeline: &mut Timeline,
        horizon: Horizon,
    ) -> SimResult<i64> {
        let run = self.quantum.min(process.remaining);
        let end = horizon.advance(time, run)?;

        log::debug!(
            "t={time}: dispatch {} for {run} (remaining {})",
            process.id,
            process.remaining
        );
        timeline.record(&process.id, time, end);
        process.execute(run);
        Ok(end)
    }

    fn schedule_gated(&self, processes: &mut [Process], horizon: Horizon) -> SimResult<Timeline> {
        let mut timeline = Timeline::new();
        let mut pending: VecDeque<usize> = arrival_order(processes).into();
        let mut ready: VecDeque<usize> = VecDeque::new();
        let mut time = 0;

        loop {
            admit(processes, &mut pending, &mut ready, |arrival| arrival <= time);

            let Some(idx) = ready.pop_front() else {
                match pending.front() {
                    Some(&next) => {
                        let next_arrival = processes[next].arrival;
                        log::trace!("idle [{time}, {next_arrival})");
                        time = next_arrival;
                        continue;
                    }
                    None => break,
                }
            };

            let end = self.dispatch(&mut processes[idx], time, &mut timeline, horizon)?;
            admit(processes, &mut pending, &mut ready, |arrival| arrival < end);
            time = end;

            if processes[idx].is_finished() {
                processes[idx].complete_at(time);
            } else {
                ready.push_back(idx);
            }
        }

        Ok(timeline)
    }

    fn schedule_agnostic(
        &self,
        processes: &mut [Process],
        horizon: Horizon,
    ) -> SimResult<Timeline> {
        let mut timeline = Timeline::new();
        let mut ready: VecDeque<usize> = arrival_order(processes).into();
        let mut time = 0;

        while let Some(idx) = ready.pop_front() {
            if time < processes[idx].arrival {
                log::trace!("idle [{time}, {})", processes[idx].arrival);
                time = processes[idx].arrival;
            }

            time = self.dispatch(&mut processes[idx], time, &mut timeline, horizon)?;

            if processes[idx].is_finished() {
                processes[idx].complete_at(time);
            } else {
                ready.push_back(idx);
            }
        }

        Ok(timeline)
    }
}

/// Moves pending processes whose arrival satisfies `arrived` onto the ready
/// queue. `pending` is in arrival order, so admission stops at the first
/// process that has not arrived.
fn admit<F>(
    processes: &[Process],
    pending: &mut VecDeque<usize>,
    ready: &mut VecDeque<usize>,
    arrived: F,
) where
    F: Fn(i64) -> bool,
{
    while let Some(&idx) = pending.front() {
        if !arrived(processes[idx].arrival) {
            break;
        }
        pending.pop_front();
        ready.push_back(idx);
    }
}

impl Scheduler for RoundRobin {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn schedule_within(
        &self,
        processes: &mut [Process],
        horizon: Horizon,
    ) -> SimResult<Timeline> {
        match self.mode {
            RoundRobinMode::ArrivalGated => self.schedule_gated(processes, horizon),
            RoundRobinMode::ArrivalAgnostic => self.schedule_agnostic(processes, horizon),
        }
    }

    fn description(&self) -> &'static str {
        match self.mode {
            RoundRobinMode::ArrivalGated => "Round-Robin (arrival-gated)",
            RoundRobinMode::ArrivalAgnostic => "Round-Robin (FIFO)",
        }
    }
}
