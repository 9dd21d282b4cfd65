//! Timeline (Gantt) model.
//!
//! A timeline is the ordered sequence of execution intervals a scheduler
//! produced for one run. Idle CPU time is not recorded as a slice; it is
//! implied by a gap between consecutive slices.
//!
//! The timeline is a pure accumulator: slices are kept in the order they
//! were appended and are never reordered or merged. Consecutive
//! Round-Robin slices of the same process stay distinct entries.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// One uninterrupted execution interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSlice {
    /// Process that ran.
    pub process_id: String,
    /// Start time (inclusive).
    pub start: i64,
    /// End time (exclusive).
    pub end: i64,
}

impl TimelineSlice {
    /// Creates a new slice.
    pub fn new(process_id: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            process_id: process_id.into(),
            start,
            end,
        }
    }

    /// Length of the interval.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

impl fmt::Display for TimelineSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{})", self.process_id, self.start, self.end)
    }
}

/// An interval during which the CPU had nothing to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleGap {
    /// Start of the idle period.
    pub start: i64,
    /// End of the idle period.
    pub end: i64,
}

/// Ordered execution timeline for a single simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    slices: Vec<TimelineSlice>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slice.
    pub fn push(&mut self, slice: TimelineSlice) {
        log::trace!("slice {slice}");
        self.slices.push(slice);
    }

    /// Appends `(process_id, start, end)`.
    pub fn record(&mut self, process_id: &str, start: i64, end: i64) {
        self.push(TimelineSlice::new(process_id, start, end));
    }

    /// All slices in emission order.
    pub fn slices(&self) -> &[TimelineSlice] {
        &self.slices
    }

    /// Consumes the timeline and returns its slices.
    pub fn into_slices(self) -> Vec<TimelineSlice> {
        self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether no slice has been recorded.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Total elapsed time: end of the last slice.
    ///
    /// # Errors
    /// `EmptyTimeline` if no slices were produced.
    pub fn total_elapsed(&self) -> SimResult<i64> {
        self.slices
            .last()
            .map(|s| s.end)
            .ok_or(SimError::EmptyTimeline)
    }

    /// Slices belonging to one process, in order.
    pub fn slices_for(&self, process_id: &str) -> Vec<&TimelineSlice> {
        self.slices
            .iter()
            .filter(|s| s.process_id == process_id)
            .collect()
    }

    /// Executed time for one process.
    pub fn busy_time_for(&self, process_id: &str) -> i64 {
        self.slices
            .iter()
            .filter(|s| s.process_id == process_id)
            .map(TimelineSlice::duration)
            .sum()
    }

    /// Executed time per process.
    pub fn busy_time_by_process(&self) -> HashMap<&str, i64> {
        let mut busy: HashMap<&str, i64> = HashMap::new();
        for s in &self.slices {
            *busy.entry(s.process_id.as_str()).or_insert(0) += s.duration();
        }
        busy
    }

    /// Total executed time across all processes.
    pub fn busy_time(&self) -> i64 {
        self.slices.iter().map(TimelineSlice::duration).sum()
    }

    /// First start time of a process.
    pub fn first_start(&self, process_id: &str) -> Option<i64> {
        self.slices
            .iter()
            .find(|s| s.process_id == process_id)
            .map(|s| s.start)
    }

    /// Completion time of a process (end of its last slice).
    pub fn completion_of(&self, process_id: &str) -> Option<i64> {
        self.slices
            .iter()
            .rev()
            .find(|s| s.process_id == process_id)
            .map(|s| s.end)
    }

    /// Idle intervals, including a leading gap before the first slice.
    pub fn idle_gaps(&self) -> Vec<IdleGap> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for s in &self.slices {
            if s.start > cursor {
                gaps.push(IdleGap {
                    start: cursor,
                    end: s.start,
                });
            }
            cursor = cursor.max(s.end);
        }
        gaps
    }

    /// Number of times the CPU switched from one process to a different one.
    pub fn context_switches(&self) -> usize {
        self.slices
            .windows(2)
            .filter(|w| w[0].process_id != w[1].process_id)
            .count()
    }

    /// CPU utilization: busy time / total elapsed (0.0..=1.0).
    ///
    /// Returns `None` for an empty timeline.
    pub fn cpu_utilization(&self) -> Option<f64> {
        let elapsed = self.total_elapsed().ok()?;
        if elapsed <= 0 {
            return None;
        }
        Some(self.busy_time() as f64 / elapsed as f64)
    }

    /// Proportional width of each slice (percent of total elapsed time),
    /// for rendering the Gantt bars.
    pub fn proportions(&self) -> SimResult<Vec<(&TimelineSlice, f64)>> {
        let total = self.total_elapsed()?;
        Ok(self
            .slices
            .iter()
            .map(|s| (s, s.duration() as f64 / total as f64 * 100.0))
            .collect())
    }

    /// Checks slice ordering: `start < end` and no overlap.
    pub fn check_ordering(&self) -> SimResult<()> {
        for s in &self.slices {
            if s.start >= s.end {
                return Err(SimError::InternalConsistency(format!(
                    "slice {s} has non-positive length"
                )));
            }
        }
        for w in self.slices.windows(2) {
            if w[0].end > w[1].start {
                return Err(SimError::InternalConsistency(format!(
                    "slice {} overlaps {}",
                    w[0], w[1]
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.slices.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl FromIterator<TimelineSlice> for Timeline {
    fn from_iter<I: IntoIterator<Item = TimelineSlice>>(iter: I) -> Self {
        Self {
            slices: iter.into_iter().collect(),
        }
    }
}
