//! Scheduling policy selection.
//!
//! A closed set of disciplines. Each variant carries the parameters it
//! needs, so a Round-Robin run without a quantum cannot be expressed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Shortest-Job-First variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SjfMode {
    /// Batch SJF: sort the whole list by burst (ties: arrival, insertion
    /// order) and run each to completion. A process never starts before
    /// its arrival; the CPU idles instead.
    NonPreemptive,
    /// Shortest-Remaining-Time-First: at every time unit run the arrived
    /// process with the least remaining work.
    Preemptive,
    /// Non-preemptive SJF over the ready set: at each decision point pick
    /// the shortest burst among arrived, unfinished processes.
    #[default]
    ArrivalAware,
}

/// Round-Robin variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundRobinMode {
    /// Ready queue admits processes only once they have arrived.
    #[default]
    ArrivalGated,
    /// All processes enqueued up front; strict FIFO.
    ArrivalAgnostic,
}

/// Scheduling discipline for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Policy {
    /// First-Come-First-Served.
    #[default]
    Fcfs,
    /// Shortest-Job-First.
    Sjf {
        /// Dispatch variant.
        #[serde(default)]
        mode: SjfMode,
    },
    /// Round-Robin with a fixed time quantum.
    RoundRobin {
        /// Maximum contiguous slice per dispatch.
        quantum: i64,
        /// Admission variant.
        #[serde(default)]
        mode: RoundRobinMode,
    },
}

impl Policy {
    /// SJF with the given mode.
    pub fn sjf(mode: SjfMode) -> Self {
        Policy::Sjf { mode }
    }

    /// Arrival-gated Round-Robin with the given quantum.
    pub fn round_robin(quantum: i64) -> Self {
        Policy::RoundRobin {
            quantum,
            mode: RoundRobinMode::default(),
        }
    }

    /// Round-Robin with an explicit mode.
    pub fn round_robin_with(quantum: i64, mode: RoundRobinMode) -> Self {
        Policy::RoundRobin { quantum, mode }
    }

    /// Short policy name (e.g., "FCFS", "SRTF", "RR").
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf {
                mode: SjfMode::Preemptive,
            } => "SRTF",
            Policy::Sjf { .. } => "SJF",
            Policy::RoundRobin { .. } => "RR",
        }
    }

    /// Checks policy parameters.
    ///
    /// # Errors
    /// `InvalidQuantum` if a Round-Robin quantum is not positive.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            Policy::RoundRobin { quantum, .. } if *quantum <= 0 => {
                Err(SimError::invalid_quantum(quantum))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => f.write_str("FCFS"),
            Policy::Sjf { mode } => write!(f, "SJF ({mode:?})"),
            Policy::RoundRobin { quantum, mode } => write!(f, "RR (q={quantum}, {mode:?})"),
        }
    }
}

/// Parses dropdown-style names: `fcfs`, `sjf`, `srtf`, `rr` / `rr:<quantum>`.
///
/// A bare `rr` has no quantum and is rejected with `InvalidQuantum`.
impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (name, arg) = match s.split_once(':') {
            Some((n, a)) => (n, Some(a)),
            None => (s.as_str(), None),
        };
        match name {
            "fcfs" => Ok(Policy::Fcfs),
            "sjf" => Ok(Policy::sjf(SjfMode::default())),
            "sjf-batch" => Ok(Policy::sjf(SjfMode::NonPreemptive)),
            "srtf" | "sjf-preemptive" => Ok(Policy::sjf(SjfMode::Preemptive)),
            "rr" | "round-robin" | "rr-fifo" => {
                let raw = arg.unwrap_or("");
                let quantum = crate::validation::parse_quantum(raw)?;
                let mode = if name == "rr-fifo" {
                    RoundRobinMode::ArrivalAgnostic
                } else {
                    RoundRobinMode::ArrivalGated
                };
                Ok(Policy::round_robin_with(quantum, mode))
            }
            other => Err(SimError::UnknownPolicy(other.to_string())),
        }
    }
}
