//! Task model.
//!
//! A task is one node of the task dependency graph. The graph generator
//! creates it; only the mapping run mutates its timing and status fields.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Task identifier, unique within one task list.
pub type TaskId = u32;

/// Lifecycle status of a task within one run.
///
/// Transitions are monotone: `Pending → Queued → Executing → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting in the pending pool for its dependencies.
    #[default]
    Pending,
    /// Sitting in a thread's allocation queue.
    Queued,
    /// Running on a thread.
    Executing,
    /// Done.
    Finished,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Queued => "queued",
            TaskStatus::Executing => "executing",
            TaskStatus::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// A unit of work in the simulated program.
///
/// # Time Representation
/// All times are simulated time units (not wall-clock). A scheduler tick
/// advances time by a fixed step, conventionally 1,000,000 units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimTask {
    /// Unique identifier.
    pub id: TaskId,
    /// Identifiers of the tasks this one waits for.
    pub dependencies: Vec<TaskId>,
    /// Execution duration.
    pub duration: i64,
    /// Time at which the task entered an allocation queue.
    pub arrival: Option<i64>,
    /// Time at which the task was dispatched.
    pub start: Option<i64>,
    /// `start + duration`, stamped on dispatch.
    pub finish: Option<i64>,
    /// Current lifecycle status.
    pub status: TaskStatus,
}

impl SimTask {
    /// Creates a pending task with no dependencies.
    pub fn new(id: TaskId, duration: i64) -> Self {
        Self {
            id,
            dependencies: Vec::new(),
            duration,
            arrival: None,
            start: None,
            finish: None,
            status: TaskStatus::Pending,
        }
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, dependency: TaskId) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Replaces the dependency list.
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }

    /// Whether the task has reached `Finished`.
    pub fn is_finished(&self) -> bool {
        self.status == TaskStatus::Finished
    }

    /// Time spent in the allocation queue as of `now`.
    ///
    /// Zero before the task has arrived.
    pub fn waiting_time(&self, now: i64) -> i64 {
        self.arrival.map_or(0, |arrival| now - arrival)
    }

    /// Clears all per-run fields, returning the task to `Pending`.
    pub fn reset(&mut self) {
        self.arrival = None;
        self.start = None;
        self.finish = None;
        self.status = TaskStatus::Pending;
    }
}

/// Returns an independent copy of `tasks` with every per-run field cleared.
///
/// Each run of a policy pair must start from such a copy so that no run
/// observes another run's mutations.
pub fn reset_tasks(tasks: &[SimTask]) -> Vec<SimTask> {
    tasks
        .iter()
        .cloned()
        .map(|mut t| {
            t.reset();
            t
        })
        .collect()
}

/// Builds an id → position index over a task list.
pub fn index_by_id(tasks: &[SimTask]) -> HashMap<TaskId, usize> {
    tasks.iter().enumerate().map(|(i, t)| (t.id, i)).collect()
}

/// Returns `true` iff every task referenced by `dependencies` is finished.
///
/// Unknown ids count as unfinished; graphs are expected to be validated
/// beforehand (see [`crate::validation::validate_graph`]).
pub fn dependencies_finished(
    tasks: &[SimTask],
    index: &HashMap<TaskId, usize>,
    dependencies: &[TaskId],
) -> bool {
    dependencies.iter().all(|dep| {
        index
            .get(dep)
            .is_some_and(|&pos| tasks[pos].is_finished())
    })
}
