//! CPU scheduling domain models.
//!
//! Provides the data types consumed and produced by a simulation run.
//!
//! | Type | Role |
//! |------|------|
//! | `Process` | Input record plus per-run state (`remaining`, `completion`) |
//! | `Policy` | Closed set of dispatch disciplines with their parameters |
//! | `TimelineSlice` | One uninterrupted `(process, start, end)` interval |
//! | `Timeline` | Ordered, gap-aware sequence of slices (Gantt chart) |

mod policy;
mod process;
mod timeline;

pub use policy::{Policy, RoundRobinMode, SjfMode};
pub use process::{process_id, Process};
pub use timeline::{IdleGap, Timeline, TimelineSlice};
