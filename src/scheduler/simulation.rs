//! Simulation runner.
//!
//! # Algorithm
//!
//! 1. Validate the process list and policy parameters. Nothing runs on failure.
//! 2. Copy every process with fresh state; the caller's records are never touched.
//! 3. Dispatch with the policy's scheduler under a termination horizon.
//! 4. Audit the timeline against the completed processes.
//! 5. Compute metrics.
//!
//! Each run is a pure function of (processes, policy, horizon): no state is
//! shared between runs, so identical input always yields identical output.

use serde::{Deserialize, Serialize};

use super::ScheduleMetrics;
use crate::dispatching::Horizon;
use crate::error::{SimError, SimResult};
use crate::models::{Policy, Process, Timeline};
use crate::validation::validate_processes;

/// Input container for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Processes to schedule.
    pub processes: Vec<Process>,
    /// Dispatch discipline.
    #[serde(default)]
    pub policy: Policy,
    /// Override for the simulated-time guard. `None` = `max(arrival) + sum(burst)`.
    #[serde(default)]
    pub time_limit: Option<i64>,
}

impl SimulationRequest {
    /// Creates a request for `processes` under `policy`.
    pub fn new(processes: Vec<Process>, policy: Policy) -> Self {
        Self {
            processes,
            policy,
            time_limit: None,
        }
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the simulated-time guard.
    pub fn with_time_limit(mut self, limit: i64) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Decodes a request from JSON.
    ///
    /// Process `remaining` / `completion` may be omitted; every run starts
    /// from fresh state regardless.
    pub fn from_json(json: &str) -> SimResult<Self> {
        serde_json::from_str(json).map_err(|e| SimError::InvalidRequest(e.to_string()))
    }

    /// Encodes the request as JSON.
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string(self).map_err(|e| SimError::InvalidRequest(e.to_string()))
    }

    /// Validates processes and policy parameters.
    pub fn validate(&self) -> SimResult<()> {
        validate_processes(&self.processes)?;
        self.policy.validate()
    }

    /// Runs the request.
    pub fn run(&self) -> SimResult<SimulationResult> {
        let simulator = match self.time_limit {
            Some(limit) => Simulator::new().with_time_limit(limit),
            None => Simulator::new(),
        };
        simulator.run(&self.processes, &self.policy)
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Policy that produced this result.
    pub policy: Policy,
    /// Execution timeline.
    pub timeline: Timeline,
    /// Independent copies of the input with `completion` set.
    pub processes: Vec<Process>,
    /// Derived metrics.
    pub metrics: ScheduleMetrics,
}

impl SimulationResult {
    /// Average waiting time (two decimals).
    pub fn avg_waiting(&self) -> f64 {
        self.metrics.avg_waiting()
    }

    /// Average turnaround time (two decimals).
    pub fn avg_turnaround(&self) -> f64 {
        self.metrics.avg_turnaround()
    }
}

/// Runs simulations with an optional fixed time guard.
///
/// # Example
///
/// ```
/// use cpu_sched_sim::models::{Policy, Process};
/// use cpu_sched_sim::scheduler::Simulator;
///
/// let processes = vec![
///     Process::new("P1", 0, 5),
///     Process::new("P2", 1, 3),
///     Process::new("P3", 2, 8),
/// ];
/// let result = Simulator::new().run(&processes, &Policy::Fcfs).unwrap();
/// assert_eq!(result.metrics.avg_waiting_display(), "3.33");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator {
    time_limit: Option<i64>,
}

impl Simulator {
    /// Creates a simulator with the default horizon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the simulated-time guard.
    pub fn with_time_limit(mut self, limit: i64) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Runs `policy` over an independent copy of `processes`.
    ///
    /// # Errors
    /// - `EmptyInput`, `InvalidProcessInput`, `InvalidQuantum` before any work.
    /// - `InfiniteLoop` if the clock passes the guard.
    /// - `EmptyTimeline` / `InternalConsistency` if the scheduler misbehaves.
    pub fn run(&self, processes: &[Process], policy: &Policy) -> SimResult<SimulationResult> {
        validate_processes(processes)?;
        policy.validate()?;
        let scheduler = policy.scheduler()?;

        let mut work: Vec<Process> = processes.iter().map(Process::fresh_copy).collect();
        let horizon = self
            .time_limit
            .map(Horizon::new)
            .unwrap_or_else(|| Horizon::for_processes(&work));

        log::debug!(
            "running {} over {} processes (horizon {})",
            scheduler.description(),
            work.len(),
            horizon.limit()
        );
        let timeline = scheduler.schedule_within(&mut work, horizon)?;
        audit(&work, &timeline)?;
        let metrics = ScheduleMetrics::calculate(&work, &timeline)?;

        log::info!(
            "{policy}: {} slices, makespan {}, avg waiting {}, avg turnaround {}",
            timeline.len(),
            metrics.makespan,
            metrics.avg_waiting_display(),
            metrics.avg_turnaround_display()
        );

        Ok(SimulationResult {
            policy: *policy,
            timeline,
            processes: work,
            metrics,
        })
    }

    /// Runs every policy on its own copy of `processes`, in order.
    ///
    /// Stops at the first failing policy.
    pub fn compare(
        &self,
        processes: &[Process],
        policies: &[Policy],
    ) -> SimResult<Vec<SimulationResult>> {
        policies.iter().map(|p| self.run(processes, p)).collect()
    }
}

/// Runs `policy` over `processes` with the default horizon.
pub fn run_simulation(processes: &[Process], policy: &Policy) -> SimResult<SimulationResult> {
    Simulator::new().run(processes, policy)
}

/// Runs each policy over the same input.
pub fn compare_policies(
    processes: &[Process],
    policies: &[Policy],
) -> SimResult<Vec<SimulationResult>> {
    Simulator::new().compare(processes, policies)
}

/// Checks a finished run.
///
/// - Slices are ordered and non-overlapping.
/// - Every process finished, with `completion` equal to its last slice end.
/// - Each process's slice durations sum to its burst.
fn audit(processes: &[Process], timeline: &Timeline) -> SimResult<()> {
    timeline.total_elapsed()?;
    timeline.check_ordering()?;

    let busy = timeline.busy_time_by_process();
    for p in processes {
        let executed = busy.get(p.id.as_str()).copied().unwrap_or(0);
        if executed != p.burst {
            return Err(SimError::InternalConsistency(format!(
                "process {} executed {executed} of burst {}",
                p.id, p.burst
            )));
        }
        if !p.is_finished() {
            return Err(SimError::InternalConsistency(format!(
                "process {} has {} units remaining",
                p.id, p.remaining
            )));
        }
        let last_end = timeline.completion_of(&p.id);
        if p.completion != last_end {
            return Err(SimError::InternalConsistency(format!(
                "process {} completion {:?} does not match last slice end {:?}",
                p.id, p.completion, last_end
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoundRobinMode, SjfMode, TimelineSlice};

    fn sample() -> Vec<Process> {
        vec![
            Process::new("P1", 0, 5),
            Process::new("P2", 1, 3),
            Process::new("P3", 2, 8),
        ]
    }

    #[test]
    fn test_fcfs_example() {
        let result = run_simulation(&sample(), &Policy::Fcfs).unwrap();
        assert_eq!(
            result.timeline.slices(),
            &[
                TimelineSlice::new("P1", 0, 5),
                TimelineSlice::new("P2", 5, 8),
                TimelineSlice::new("P3", 8, 16),
            ]
        );
        let waiting: Vec<i64> = result.metrics.per_process.iter().map(|m| m.waiting).collect();
        assert_eq!(waiting, vec![0, 4, 6]);
        assert!((result.avg_waiting() - 3.33).abs() < 1e-10);
    }

    #[test]
    fn test_sjf_batch_example() {
        let result = run_simulation(&sample(), &Policy::sjf(SjfMode::NonPreemptive)).unwrap();
        // P2 is shortest but only arrives at 1, so the CPU idles over [0, 1)
        assert_eq!(
            result.timeline.slices(),
            &[
                TimelineSlice::new("P2", 1, 4),
                TimelineSlice::new("P1", 4, 9),
                TimelineSlice::new("P3", 9, 17),
            ]
        );
        let waiting: Vec<i64> = result.metrics.per_process.iter().map(|m| m.waiting).collect();
        assert_eq!(waiting, vec![4, 0, 7]);
        assert_eq!(result.metrics.total_waiting, 11);
        assert_eq!(result.metrics.avg_waiting_display(), "3.67");
    }

    #[test]
    fn test_input_overflowing_clock_is_rejected() {
        let processes = vec![Process::new("P1", i64::MAX - 1, 5)];
        for policy in [
            Policy::Fcfs,
            Policy::sjf(SjfMode::Preemptive),
            Policy::round_robin(2),
        ] {
            assert!(matches!(
                run_simulation(&processes, &policy),
                Err(SimError::InvalidProcessInput { .. })
            ));
        }
    }

    #[test]
    fn test_round_robin_example() {
        let result = run_simulation(&sample(), &Policy::round_robin(2)).unwrap();
        assert_eq!(
            &result.timeline.slices()[..3],
            &[
                TimelineSlice::new("P1", 0, 2),
                TimelineSlice::new("P2", 2, 4),
                TimelineSlice::new("P1", 4, 6),
            ]
        );
        assert_eq!(result.metrics.avg_waiting_display(), "5.33");
        assert_eq!(result.metrics.avg_turnaround_display(), "10.67");
    }

    #[test]
    fn test_single_process() {
        let result = run_simulation(&[Process::new("P1", 0, 4)], &Policy::Fcfs).unwrap();
        assert_eq!(result.timeline.slices(), &[TimelineSlice::new("P1", 0, 4)]);
        assert_eq!(result.metrics.total_waiting, 0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            run_simulation(&[], &Policy::Fcfs),
            Err(SimError::EmptyInput)
        );
    }

    #[test]
    fn test_invalid_quantum_rejected_before_run() {
        let err = run_simulation(&sample(), &Policy::round_robin(0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidQuantum { .. }));
    }

    #[test]
    fn test_invalid_process_rejected() {
        let processes = vec![Process::new("P1", 0, 0)];
        assert!(matches!(
            run_simulation(&processes, &Policy::Fcfs),
            Err(SimError::InvalidProcessInput { .. })
        ));
    }

    #[test]
    fn test_caller_records_untouched() {
        let processes = sample();
        let before = processes.clone();
        run_simulation(&processes, &Policy::sjf(SjfMode::Preemptive)).unwrap();
        assert_eq!(processes, before);
    }

    #[test]
    fn test_stale_state_is_reset() {
        // Input carrying state from a previous run is simulated from scratch
        let mut processes = sample();
        processes[0].remaining = 0;
        processes[0].completion = Some(99);
        let result = run_simulation(&processes, &Policy::Fcfs).unwrap();
        assert_eq!(result.processes[0].completion, Some(5));
    }

    #[test]
    fn test_idempotent() {
        let policy = Policy::round_robin_with(3, RoundRobinMode::ArrivalAgnostic);
        let a = run_simulation(&sample(), &policy).unwrap();
        let b = run_simulation(&sample(), &policy).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_limit_guard() {
        let err = Simulator::new()
            .with_time_limit(10)
            .run(&sample(), &Policy::Fcfs)
            .unwrap_err();
        assert_eq!(err, SimError::InfiniteLoop { limit: 10 });
    }

    #[test]
    fn test_compare_policies() {
        let policies = [
            Policy::Fcfs,
            Policy::sjf(SjfMode::Preemptive),
            Policy::round_robin(2),
        ];
        let results = compare_policies(&sample(), &policies).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].policy, policies[1]);
        assert!(results.iter().all(|r| r.timeline.busy_time() == 16));
    }

    #[test]
    fn test_audit_catches_mismatch() {
        let mut processes = vec![Process::new("P1", 0, 3)];
        processes[0].remaining = 0;
        processes[0].completion = Some(3);
        let mut timeline = Timeline::new();
        timeline.record("P1", 0, 2);
        assert!(matches!(
            audit(&processes, &timeline),
            Err(SimError::InternalConsistency(_))
        ));
        assert_eq!(audit(&processes, &Timeline::new()), Err(SimError::EmptyTimeline));
    }

    #[test]
    fn test_request_json_roundtrip() {
        let json = r#"{
            "processes": [
                {"id": "P1", "arrival": 0, "burst": 5},
                {"id": "P2", "arrival": 1, "burst": 3}
            ],
            "policy": {"type": "round_robin", "quantum": 2}
        }"#;
        let request = SimulationRequest::from_json(json).unwrap();
        assert_eq!(request.policy, Policy::round_robin(2));
        assert!(request.validate().is_ok());

        let result = request.run().unwrap();
        assert_eq!(result.timeline.total_elapsed(), Ok(8));

        let again = SimulationRequest::from_json(&request.to_json().unwrap()).unwrap();
        assert_eq!(again, request);
    }

    #[test]
    fn test_request_bad_json() {
        assert!(matches!(
            SimulationRequest::from_json("{not json"),
            Err(SimError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_time_limit() {
        let request = SimulationRequest::new(sample(), Policy::Fcfs).with_time_limit(3);
        assert_eq!(request.run(), Err(SimError::InfiniteLoop { limit: 3 }));
    }
}
