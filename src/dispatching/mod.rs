//! Dispatch policies for the single simulated CPU.
//!
//! Provides the three disciplines (FCFS, SJF, Round-Robin) behind one
//! [`Scheduler`] trait, plus the ordering and termination helpers they share.
//!
//! # Usage
//!
//! ```
//! use cpu_sched_sim::dispatching::{Fcfs, Scheduler};
//! use cpu_sched_sim::models::Process;
//!
//! let mut processes = vec![Process::new("P1", 0, 5), Process::new("P2", 1, 3)];
//! let timeline = Fcfs.schedule(&mut processes).unwrap();
//! assert_eq!(timeline.len(), 2);
//! assert_eq!(processes[1].completion, Some(8));
//! ```
//!
//! # References
//!
//! - Silberschatz, Galvin & Gagne (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod fcfs;
mod order;
mod round_robin;
mod sjf;

pub use fcfs::Fcfs;
pub use order::{arrival_order, order_by};
pub use round_robin::RoundRobin;
pub use sjf::Sjf;

use std::fmt::Debug;

use crate::error::{SimError, SimResult};
use crate::models::{Policy, Process, Timeline};

/// A dispatch discipline.
///
/// Implementations receive processes with fresh state (`remaining == burst`,
/// no completion), emit slices in time order, and set each process's
/// `completion` exactly once.
pub trait Scheduler: Send + Sync + Debug {
    /// Policy name (e.g., "FCFS", "SRTF").
    fn name(&self) -> &'static str;

    /// Runs the discipline, failing with `InfiniteLoop` if the clock passes
    /// `horizon`.
    fn schedule_within(&self, processes: &mut [Process], horizon: Horizon)
        -> SimResult<Timeline>;

    /// Runs the discipline with the default horizon for `processes`.
    fn schedule(&self, processes: &mut [Process]) -> SimResult<Timeline> {
        let horizon = Horizon::for_processes(processes);
        self.schedule_within(processes, horizon)
    }

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Upper bound on the simulated clock.
///
/// No valid schedule runs past `max(arrival) + sum(burst)`: in the worst
/// case the CPU idles until the last arrival and then serves every burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    limit: i64,
}

impl Horizon {
    /// Horizon with an explicit limit.
    pub fn new(limit: i64) -> Self {
        Self { limit }
    }

    /// Tightest safe horizon for a process set.
    pub fn for_processes(processes: &[Process]) -> Self {
        let total_burst = processes
            .iter()
            .fold(0i64, |acc, p| acc.saturating_add(p.burst));
        let last_arrival = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
        Self::new(total_burst.saturating_add(last_arrival))
    }

    /// The limit in time units.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Fails if `time` is beyond the horizon.
    #[inline]
    pub fn check(&self, time: i64) -> SimResult<()> {
        if time > self.limit {
            return Err(SimError::InfiniteLoop { limit: self.limit });
        }
        Ok(())
    }

    /// `time + by`, failing with `InfiniteLoop` if the clock would overflow.
    #[inline]
    pub fn offset(&self, time: i64, by: i64) -> SimResult<i64> {
        time.checked_add(by).ok_or(SimError::InfiniteLoop { limit: self.limit })
    }

    /// `time + by`, failing if the result overflows or passes the horizon.
    #[inline]
    pub fn advance(&self, time: i64, by: i64) -> SimResult<i64> {
        let end = self.offset(time, by)?;
        self.check(end)?;
        Ok(end)
    }
}

/// Runs `process` from `start` to completion and records the slice.
///
/// Returns the completion time.
pub(crate) fn run_to_completion(
    process: &mut Process,
    start: i64,
    timeline: &mut Timeline,
    horizon: Horizon,
) -> SimResult<i64> {
    let end = horizon.advance(start, process.remaining)?;
    process.execute(process.remaining);
    process.complete_at(end);
    timeline.record(&process.id, start, end);
    Ok(end)
}

/// Runs processes to completion in the given order, idling until each
/// one's arrival if the CPU gets there early.
pub(crate) fn run_in_order(
    processes: &mut [Process],
    order: &[usize],
    horizon: Horizon,
) -> SimResult<Timeline> {
    let mut timeline = Timeline::new();
    let mut time = 0;

    for &idx in order {
        let process = &mut processes[idx];
        if time < process.arrival {
            log::trace!("idle [{time}, {})", process.arrival);
            time = process.arrival;
        }
        log::debug!("t={time}: dispatch {} (burst {})", process.id, process.burst);
        time = run_to_completion(process, time, &mut timeline, horizon)?;
    }

    Ok(timeline)
}

impl Policy {
    /// Builds the scheduler for this policy.
    ///
    /// # Errors
    /// `InvalidQuantum` for a Round-Robin policy with a non-positive quantum.
    pub fn scheduler(&self) -> SimResult<Box<dyn Scheduler>> {
        Ok(match *self {
            Policy::Fcfs => Box::new(Fcfs),
            Policy::Sjf { mode } => Box::new(Sjf::new(mode)),
            Policy::RoundRobin { quantum, mode } => Box::new(RoundRobin::new(quantum, mode)?),
        })
    }
}
