//! Error taxonomy for simulation runs.
//!
//! Errors fall into two groups:
//! - **User errors** (`InvalidProcessInput`, `InvalidQuantum`, `UnknownPolicy`,
//!   `InvalidRequest`, `EmptyInput`): rejected before any process state is touched.
//! - **Engine defects** (`EmptyTimeline`, `InternalConsistency`, `InfiniteLoop`):
//!   a scheduler produced an impossible result. The run is aborted instead of
//!   reporting misleading metrics.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which field of a process failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessField {
    /// Process identifier.
    Id,
    /// Arrival time.
    Arrival,
    /// Burst (service) time.
    Burst,
}

impl fmt::Display for ProcessField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessField::Id => "id",
            ProcessField::Arrival => "arrival time",
            ProcessField::Burst => "burst time",
        };
        f.write_str(name)
    }
}

/// Errors produced by validation and simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A process has a missing, non-numeric or out-of-range field.
    #[error("invalid {field} for process {process}: {reason}")]
    InvalidProcessInput {
        /// Process the error refers to (assigned or would-be id).
        process: String,
        /// Offending field.
        field: ProcessField,
        /// Human-readable description.
        reason: String,
    },

    /// Round-Robin quantum missing, non-numeric or not positive.
    #[error("invalid time quantum '{value}': must be a positive integer")]
    InvalidQuantum {
        /// The rejected value as supplied.
        value: String,
    },

    /// Policy name not recognized.
    #[error("unknown scheduling policy '{0}'")]
    UnknownPolicy(String),

    /// A simulation request could not be decoded from, or encoded to, JSON.
    #[error("invalid simulation request: {0}")]
    InvalidRequest(String),

    /// Simulation requested with no processes.
    #[error("no processes to simulate")]
    EmptyInput,

    /// A scheduler produced no slices.
    #[error("timeline is empty")]
    EmptyTimeline,

    /// A scheduler result violates a timeline or metrics invariant.
    #[error("internal consistency violation: {0}")]
    InternalConsistency(String),

    /// The simulated clock ran past the termination horizon.
    #[error("simulation did not terminate within {limit} time units")]
    InfiniteLoop {
        /// Horizon that was exceeded.
        limit: i64,
    },
}

impl SimError {
    /// Creates an `InvalidProcessInput` error.
    pub fn invalid_input(
        process: impl Into<String>,
        field: ProcessField,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProcessInput {
            process: process.into(),
            field,
            reason: reason.into(),
        }
    }

    /// Creates an `InvalidQuantum` error.
    pub fn invalid_quantum(value: impl ToString) -> Self {
        Self::InvalidQuantum {
            value: value.to_string(),
        }
    }

    /// Whether the error was caused by caller input rather than an engine defect.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SimError::InvalidProcessInput { .. }
                | SimError::InvalidQuantum { .. }
                | SimError::UnknownPolicy(_)
                | SimError::InvalidRequest(_)
                | SimError::EmptyInput
        )
    }
}

/// Result alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field_and_process() {
        let err = SimError::invalid_input("P3", ProcessField::Burst, "must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid burst time for process P3: must be greater than 0"
        );
    }

    #[test]
    fn test_user_error_classification() {
        assert!(SimError::EmptyInput.is_user_error());
        assert!(SimError::invalid_quantum(0).is_user_error());
        assert!(!SimError::EmptyTimeline.is_user_error());
        assert!(!SimError::InternalConsistency("x".into()).is_user_error());
        assert!(!SimError::InfiniteLoop { limit: 10 }.is_user_error());
    }

    #[test]
    fn test_quantum_message() {
        let err = SimError::invalid_quantum("-2");
        assert!(err.to_string().contains("'-2'"));
    }
}
