//! Simulation domain models.
//!
//! Provides the data types a mapping run operates on: the task graph nodes,
//! the per-thread queue/history state, and the exported schedule.
//!
//! | Type | Role |
//! |------|------|
//! | `SimTask` | Node of the task dependency graph, mutated only by a run |
//! | `ThreadState` | Allocation queue + execution history of one simulated thread |
//! | `Schedule` | Exported execution history of a finished run |

mod schedule;
mod task;
mod thread;

pub use schedule::{Assignment, Schedule};
pub use task::{dependencies_finished, index_by_id, reset_tasks, SimTask, TaskId, TaskStatus};
pub use thread::ThreadState;
