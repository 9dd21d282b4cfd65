//! Shortest-Job-First and Shortest-Remaining-Time-First.
//!
//! # Modes
//!
//! - [`SjfMode::NonPreemptive`]: batch order by burst, then arrival, then
//!   insertion order. Each job runs to completion; the CPU idles if a job
//!   is reached before it has arrived.
//! - [`SjfMode::ArrivalAware`]: at each decision point choose the shortest
//!   burst among processes that have arrived and are not finished.
//! - [`SjfMode::Preemptive`]: at every time unit run the arrived process with
//!   the least remaining work (ties: earliest arrival, then insertion order).
//!
//! The preemptive mode jumps from event to event (next arrival or current
//! completion) instead of stepping one unit at a time. Between events the
//! selected process only gets shorter while every other candidate is
//! unchanged, so the selection cannot change and the result is identical
//! to unit stepping. Consecutive units of the same process are coalesced
//! into one slice.
//!
//! # Reference
//! Smith (1956), SPT is optimal for minimizing mean flow time on a single machine.

use super::order::select_min;
use super::{order_by, run_in_order, run_to_completion, Horizon, Scheduler};
use crate::error::SimResult;
use crate::models::{Process, SjfMode, Timeline};

/// Shortest-Job-First scheduler.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sjf {
    mode: SjfMode,
}

impl Sjf {
    /// Creates an SJF scheduler with the given mode.
    pub fn new(mode: SjfMode) -> Self {
        Self { mode }
    }

    /// The dispatch mode.
    pub fn mode(&self) -> SjfMode {
        self.mode
    }

    fn schedule_batch(processes: &mut [Process], horizon: Horizon) -> SimResult<Timeline> {
        let order = order_by(processes, |p| (p.burst, p.arrival));
        run_in_order(processes, &order, horizon)
    }

    fn schedule_arrival_aware(
        processes: &mut [Process],
        horizon: Horizon,
    ) -> SimResult<Timeline> {
        let mut timeline = Timeline::new();
        let mut time = 0;

        loop {
            let ready = (0..processes.len())
                .filter(|&i| !processes[i].is_finished() && processes[i].has_arrived(time));
            let pick = select_min(ready, |i| (processes[i].burst, processes[i].arrival));

            match pick {
                Some(idx) => {
                    log::debug!(
                        "t={time}: dispatch {} (burst {})",
                        processes[idx].id,
                        processes[idx].burst
                    );
                    time = run_to_completion(&mut processes[idx], time, &mut timeline, horizon)?;
                }
                None => match next_arrival(processes, time) {
                    Some(next) => {
                        log::trace!("idle [{time}, {next})");
                        time = next;
                    }
                    None => break,
                },
            }
        }

        Ok(timeline)
    }

    fn schedule_preemptive(processes: &mut [Process], horizon: Horizon) -> SimResult<Timeline> {
        let mut timeline = Timeline::new();
        let mut time = 0;
        // Process currently holding the CPU and the start of its open slice.
        let mut running: Option<(usize, i64)> = None;

        loop {
            let ready = (0..processes.len())
                .filter(|&i| !processes[i].is_finished() && processes[i].has_arrived(time));
            let pick = select_min(ready, |i| (processes[i].remaining, processes[i].arrival));

            let Some(idx) = pick else {
                close_slice(&mut running, processes, time, &mut timeline);
                match next_arrival(processes, time) {
                    Some(next) => {
                        log::trace!("idle [{time}, {next})");
                        time = next;
                        continue;
                    }
                    None => break,
                }
            };

            if running.map(|(r, _)| r) != Some(idx) {
                close_slice(&mut running, processes, time, &mut timeline);
                log::debug!(
                    "t={time}: dispatch {} (remaining {})",
                    processes[idx].id,
                    processes[idx].remaining
                );
                running = Some((idx, time));
            }

            let finish = horizon.offset(time, processes[idx].remaining)?;
            let until = next_arrival(processes, time).map_or(finish, |a| a.min(finish));
            horizon.check(until)?;

            let left = processes[idx].execute(until - time);
            time = until;
            if left == 0 {
                processes[idx].complete_at(time);
                close_slice(&mut running, processes, time, &mut timeline);
            }
        }

        Ok(timeline)
    }
}

/// Earliest arrival strictly after `time`.
fn next_arrival(processes: &[Process], time: i64) -> Option<i64> {
    processes
        .iter()
        .filter(|p| p.arrival > time)
        .map(|p| p.arrival)
        .min()
}

/// Emits the open slice of the running process, if any, ending at `time`.
fn close_slice(
    running: &mut Option<(usize, i64)>,
    processes: &[Process],
    time: i64,
    timeline: &mut Timeline,
) {
    if let Some((idx, start)) = running.take() {
        if time > start {
            timeline.record(&processes[idx].id, start, time);
        }
    }
}

impl Scheduler for Sjf {
    fn name(&self) -> &'static str {
        match self.mode {
            SjfMode::Preemptive => "SRTF",
            SjfMode::NonPreemptive | SjfMode::ArrivalAware => "SJF",
        }
    }

    fn schedule_within(
        &self,
        processes: &mut [Process],
        horizon: Horizon,
    ) -> SimResult<Timeline> {
        match self.mode {
            SjfMode::NonPreemptive => Self::schedule_batch(processes, horizon),
            SjfMode::ArrivalAware => Self::schedule_arrival_aware(processes, horizon),
            SjfMode::Preemptive => Self::schedule_preemptive(processes, horizon),
        }
    }

    fn description(&self) -> &'static str {
        match self.mode {
            SjfMode::NonPreemptive => "Shortest Job First (batch)",
            SjfMode::ArrivalAware => "Shortest Job First (non-preemptive)",
            SjfMode::Preemptive => "Shortest Remaining Time First",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimelineSlice;

    fn sample() -> Vec<Process> {
        vec![
            Process::new("P1", 0, 5),
            Process::new("P2", 1, 3),
            Process::new("P3", 2, 8),
        ]
    }

    fn ids(timeline: &Timeline) -> Vec<&str> {
        timeline
            .slices()
            .iter()
            .map(|s| s.process_id.as_str())
            .collect()
    }

    #[test]
    fn test_batch_orders_by_burst() {
        let mut ps = sample();
        let timeline = Sjf::new(SjfMode::NonPreemptive).schedule(&mut ps).unwrap();
        // P2 is shortest but arrives at 1, so the CPU idles [0, 1)
        assert_eq!(
            timeline.slices(),
            &[
                TimelineSlice::new("P2", 1, 4),
                TimelineSlice::new("P1", 4, 9),
                TimelineSlice::new("P3", 9, 17),
            ]
        );
        assert_eq!(ps[1].completion, Some(4));
    }

    #[test]
    fn test_batch_tie_breaks_on_arrival_then_insertion() {
        let mut ps = vec![
            Process::new("P1", 2, 2),
            Process::new("P2", 0, 2),
            Process::new("P3", 0, 2),
        ];
        let timeline = Sjf::new(SjfMode::NonPreemptive).schedule(&mut ps).unwrap();
        assert_eq!(ids(&timeline), vec!["P2", "P3", "P1"]);
    }

    #[test]
    fn test_arrival_aware_only_picks_arrived() {
        let mut ps = sample();
        let timeline = Sjf::new(SjfMode::ArrivalAware).schedule(&mut ps).unwrap();
        // Only P1 has arrived at t=0; afterwards P2 (3) beats P3 (8)
        assert_eq!(
            timeline.slices(),
            &[
                TimelineSlice::new("P1", 0, 5),
                TimelineSlice::new("P2", 5, 8),
                TimelineSlice::new("P3", 8, 16),
            ]
        );
    }

    #[test]
    fn test_arrival_aware_picks_shortest_ready() {
        let mut ps = vec![
            Process::new("P1", 0, 4),
            Process::new("P2", 1, 6),
            Process::new("P3", 2, 2),
        ];
        let timeline = Sjf::new(SjfMode::ArrivalAware).schedule(&mut ps).unwrap();
        assert_eq!(ids(&timeline), vec!["P1", "P3", "P2"]);
        assert_eq!(ps[1].completion, Some(12));
    }

    #[test]
    fn test_arrival_aware_idles_between_arrivals() {
        let mut ps = vec![Process::new("P1", 0, 1), Process::new("P2", 5, 2)];
        let timeline = Sjf::new(SjfMode::ArrivalAware).schedule(&mut ps).unwrap();
        assert_eq!(timeline.slices()[1], TimelineSlice::new("P2", 5, 7));
    }

    #[test]
    fn test_preemptive_srtf() {
        let mut ps = vec![
            Process::new("P1", 0, 8),
            Process::new("P2", 1, 4),
            Process::new("P3", 2, 9),
            Process::new("P4", 3, 5),
        ];
        let timeline = Sjf::new(SjfMode::Preemptive).schedule(&mut ps).unwrap();
        assert_eq!(
            timeline.slices(),
            &[
                TimelineSlice::new("P1", 0, 1),
                TimelineSlice::new("P2", 1, 5),
                TimelineSlice::new("P4", 5, 10),
                TimelineSlice::new("P1", 10, 17),
                TimelineSlice::new("P3", 17, 26),
            ]
        );
        assert_eq!(ps[0].completion, Some(17));
        assert_eq!(ps[1].completion, Some(5));
        assert_eq!(ps[2].completion, Some(26));
        assert_eq!(ps[3].completion, Some(10));
    }

    #[test]
    fn test_preemptive_coalesces_across_arrivals() {
        // P1 keeps the CPU when P2 arrives (remaining 3 < 4), so one slice
        let mut ps = vec![Process::new("P1", 0, 5), Process::new("P2", 2, 4)];
        let timeline = Sjf::new(SjfMode::Preemptive).schedule(&mut ps).unwrap();
        assert_eq!(
            timeline.slices(),
            &[TimelineSlice::new("P1", 0, 5), TimelineSlice::new("P2", 5, 9)]
        );
    }

    #[test]
    fn test_preemptive_tie_prefers_earlier_arrival() {
        // At t=2 both have remaining 3; P1 arrived first and keeps running
        let mut ps = vec![Process::new("P1", 0, 5), Process::new("P2", 2, 3)];
        let timeline = Sjf::new(SjfMode::Preemptive).schedule(&mut ps).unwrap();
        assert_eq!(ids(&timeline), vec!["P1", "P2"]);
    }

    #[test]
    fn test_preemptive_idle_gap() {
        let mut ps = vec![Process::new("P1", 0, 2), Process::new("P2", 4, 1)];
        let timeline = Sjf::new(SjfMode::Preemptive).schedule(&mut ps).unwrap();
        assert_eq!(
            timeline.slices(),
            &[TimelineSlice::new("P1", 0, 2), TimelineSlice::new("P2", 4, 5)]
        );
    }

    #[test]
    fn test_preemptive_matches_unit_stepping() {
        let ps = vec![
            Process::new("P1", 0, 7),
            Process::new("P2", 2, 4),
            Process::new("P3", 4, 1),
            Process::new("P4", 5, 4),
        ];

        let mut jumped = ps.clone();
        let timeline = Sjf::new(SjfMode::Preemptive).schedule(&mut jumped).unwrap();

        // Reference: one unit at a time
        let mut stepped = ps.clone();
        let mut owner: Vec<String> = Vec::new();
        let mut time = 0;
        while stepped.iter().any(|p| !p.is_finished()) {
            let pick = (0..stepped.len())
                .filter(|&i| !stepped[i].is_finished() && stepped[i].arrival <= time)
                .min_by_key(|&i| (stepped[i].remaining, stepped[i].arrival, i));
            if let Some(i) = pick {
                stepped[i].remaining -= 1;
                owner.push(stepped[i].id.clone());
                if stepped[i].remaining == 0 {
                    stepped[i].completion = Some(time + 1);
                }
            } else {
                owner.push(String::new());
            }
            time += 1;
        }

        for s in timeline.slices() {
            for t in s.start..s.end {
                assert_eq!(owner[t as usize], s.process_id);
            }
        }
        for (a, b) in jumped.iter().zip(&stepped) {
            assert_eq!(a.completion, b.completion);
        }
    }

    #[test]
    fn test_horizon_exceeded() {
        let mut ps = vec![Process::new("P1", 0, 10)];
        let err = Sjf::new(SjfMode::Preemptive)
            .schedule_within(&mut ps, Horizon::new(5))
            .unwrap_err();
        assert_eq!(err, crate::error::SimError::InfiniteLoop { limit: 5 });
    }
}
