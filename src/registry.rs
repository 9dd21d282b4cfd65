//! Process registry owned by the presentation layer.
//!
//! Collects validated processes with sequential ids (`P1`, `P2`, ...),
//! runs simulations over them and keeps the most recent result. The
//! engine itself holds no state between runs; this is the collaborator's
//! value, passed explicitly into each run.

use crate::error::SimResult;
use crate::models::{process_id, Policy, Process};
use crate::scheduler::{SimulationResult, Simulator};
use crate::validation::{check_arrival, check_burst, check_time_bound, parse_process_input};

/// Registry of submitted processes and the last simulation result.
///
/// # Example
///
/// ```
/// use cpu_sched_sim::models::Policy;
/// use cpu_sched_sim::registry::ProcessRegistry;
///
/// let mut registry = ProcessRegistry::new();
/// registry.submit(0, 5).unwrap();
/// registry.submit_raw(Some("1"), Some("3")).unwrap();
///
/// let result = registry.run(&Policy::Fcfs).unwrap();
/// assert_eq!(result.timeline.len(), 2);
///
/// registry.reset();
/// assert!(registry.is_empty());
/// assert!(registry.last_result().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    submitted: u32,
    simulator: Simulator,
    last_result: Option<SimulationResult>,
}

impl ProcessRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `simulator` for subsequent runs.
    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.simulator = simulator;
        self
    }

    /// Id the next accepted process will receive.
    pub fn next_id(&self) -> String {
        process_id(self.submitted + 1)
    }

    /// Adds a process. The id is only consumed on success.
    pub fn submit(&mut self, arrival: i64, burst: i64) -> SimResult<&Process> {
        let id = self.next_id();
        check_arrival(&id, arrival)?;
        check_burst(&id, burst)?;
        self.push(Process::new(id, arrival, burst))
    }

    /// Adds a process from raw prompt text.
    pub fn submit_raw(&mut self, arrival: Option<&str>, burst: Option<&str>) -> SimResult<&Process> {
        let id = self.next_id();
        let (arrival, burst) = parse_process_input(&id, arrival, burst)?;
        self.push(Process::new(id, arrival, burst))
    }

    /// Accepts `process` unless the registered set would overflow the clock.
    fn push(&mut self, process: Process) -> SimResult<&Process> {
        check_time_bound(self.processes.iter().chain([&process]))?;
        self.submitted += 1;
        log::debug!(
            "registered {} (arrival {}, burst {})",
            process.id,
            process.arrival,
            process.burst
        );
        self.processes.push(process);
        Ok(&self.processes[self.processes.len() - 1])
    }

    /// Registered processes in submission order.
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Number of registered processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether no process has been registered.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Simulates the registered processes under `policy` and caches the result.
    ///
    /// On failure the previously cached result is kept.
    pub fn run(&mut self, policy: &Policy) -> SimResult<&SimulationResult> {
        let result = self.simulator.run(&self.processes, policy)?;
        Ok(self.last_result.insert(result))
    }

    /// The most recent successful result.
    pub fn last_result(&self) -> Option<&SimulationResult> {
        self.last_result.as_ref()
    }

    /// Clears processes, the id counter and the cached result. Idempotent.
    pub fn reset(&mut self) {
        self.processes.clear();
        self.submitted = 0;
        self.last_result = None;
    }
}
