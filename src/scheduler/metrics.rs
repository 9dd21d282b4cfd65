//! Simulation performance metrics.
//!
//! Computes per-process and aggregate indicators from completed processes
//! and their timeline.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Turnaround | completion - arrival |
//! | Waiting | turnaround - burst |
//! | Response | first start - arrival |
//! | Makespan | End of the last slice |
//! | CPU Utilization | busy time / makespan |
//! | Throughput | processes / makespan |
//!
//! Sums are kept as exact integers. Averages are rounded to two decimals
//! only when read through the display accessors.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::models::{Process, Timeline};

/// Metrics for one completed process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    /// Process identifier.
    pub id: String,
    /// Arrival time.
    pub arrival: i64,
    /// Burst time.
    pub burst: i64,
    /// Completion time.
    pub completion: i64,
    /// `completion - arrival`.
    pub turnaround: i64,
    /// `turnaround - burst`.
    pub waiting: i64,
    /// First start minus arrival.
    pub response: i64,
}

/// Aggregate metrics for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Per-process breakdown, in input order.
    pub per_process: Vec<ProcessMetrics>,
    /// Sum of waiting times.
    pub total_waiting: i64,
    /// Sum of turnaround times.
    pub total_turnaround: i64,
    /// Sum of response times.
    pub total_response: i64,
    /// End of the last slice.
    pub makespan: i64,
    /// Time the CPU spent executing.
    pub busy_time: i64,
}

impl ScheduleMetrics {
    /// Computes metrics for completed processes.
    ///
    /// # Errors
    /// - `EmptyInput` if `processes` is empty.
    /// - `InternalConsistency` if a process has no completion, never ran,
    ///   or has a negative waiting time.
    pub fn calculate(processes: &[Process], timeline: &Timeline) -> SimResult<Self> {
        if processes.is_empty() {
            return Err(SimError::EmptyInput);
        }

        let mut per_process = Vec::with_capacity(processes.len());
        let mut total_waiting = 0;
        let mut total_turnaround = 0;
        let mut total_response = 0;

        for p in processes {
            let completion = p.completion.ok_or_else(|| {
                SimError::InternalConsistency(format!("process {} has no completion time", p.id))
            })?;
            let first_start = timeline.first_start(&p.id).ok_or_else(|| {
                SimError::InternalConsistency(format!("process {} never ran", p.id))
            })?;

            let turnaround = completion - p.arrival;
            let waiting = turnaround - p.burst;
            if waiting < 0 {
                return Err(SimError::InternalConsistency(format!(
                    "process {} has negative waiting time {waiting}",
                    p.id
                )));
            }
            let response = first_start - p.arrival;

            total_waiting = checked_total(total_waiting, waiting, "waiting")?;
            total_turnaround = checked_total(total_turnaround, turnaround, "turnaround")?;
            total_response = checked_total(total_response, response, "response")?;

            per_process.push(ProcessMetrics {
                id: p.id.clone(),
                arrival: p.arrival,
                burst: p.burst,
                completion,
                turnaround,
                waiting,
                response,
            });
        }

        Ok(Self {
            per_process,
            total_waiting,
            total_turnaround,
            total_response,
            makespan: timeline.total_elapsed()?,
            busy_time: timeline.busy_time(),
        })
    }

    /// Number of processes measured.
    pub fn count(&self) -> usize {
        self.per_process.len()
    }

    /// Average waiting time, rounded to two decimals.
    pub fn avg_waiting(&self) -> f64 {
        round_mean(self.total_waiting, self.count())
    }

    /// Average turnaround time, rounded to two decimals.
    pub fn avg_turnaround(&self) -> f64 {
        round_mean(self.total_turnaround, self.count())
    }

    /// Average response time, rounded to two decimals.
    pub fn avg_response(&self) -> f64 {
        round_mean(self.total_response, self.count())
    }

    /// Unrounded average waiting time.
    pub fn avg_waiting_exact(&self) -> f64 {
        self.total_waiting as f64 / self.count() as f64
    }

    /// Unrounded average turnaround time.
    pub fn avg_turnaround_exact(&self) -> f64 {
        self.total_turnaround as f64 / self.count() as f64
    }

    /// Average waiting time formatted with two decimals (e.g., "3.33").
    pub fn avg_waiting_display(&self) -> String {
        format!("{:.2}", self.avg_waiting())
    }

    /// Average turnaround time formatted with two decimals.
    pub fn avg_turnaround_display(&self) -> String {
        format!("{:.2}", self.avg_turnaround())
    }

    /// Fraction of the makespan the CPU was busy (0.0..=1.0).
    pub fn cpu_utilization(&self) -> f64 {
        if self.makespan <= 0 {
            return 0.0;
        }
        self.busy_time as f64 / self.makespan as f64
    }

    /// Completed processes per time unit.
    pub fn throughput(&self) -> f64 {
        if self.makespan <= 0 {
            return 0.0;
        }
        self.count() as f64 / self.makespan as f64
    }

    /// Metrics for one process.
    pub fn for_process(&self, id: &str) -> Option<&ProcessMetrics> {
        self.per_process.iter().find(|m| m.id == id)
    }
}

fn checked_total(total: i64, value: i64, what: &str) -> SimResult<i64> {
    total
        .checked_add(value)
        .ok_or_else(|| SimError::InternalConsistency(format!("total {what} time overflows")))
}

/// `total / count` rounded half-up to two decimals using integer arithmetic.
fn round_mean(total: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let n = count as i128;
    let scaled = total as i128 * 200;
    let hundredths = if scaled >= 0 {
        (scaled + n) / (2 * n)
    } else {
        -((-scaled + n) / (2 * n))
    };
    hundredths as f64 / 100.0
}
