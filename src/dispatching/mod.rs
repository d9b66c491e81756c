//! Dispatching controllers.
//!
//! Pick the next task to run from an idle thread's allocation queue.
//!
//! | Tag | Policy | Inputs |
//! |-----|--------|--------|
//! | `CONT2` | Fuzzy task-selection controller, type 2 | execution time, waiting time |
//! | `CONT3` | Fuzzy task-selection controller, type 3 | execution time, waiting time |
//! | `FIFO` | First in, first out | none |
//!
//! The two fuzzy variants share calibration and differ only in their
//! relation model.
//!
//! # Usage
//!
//! ```
//! use u_fuzzymap::dispatching::{DispatchPolicy, Dispatcher};
//! use u_fuzzymap::models::SimTask;
//!
//! let mut tasks = vec![SimTask::new(0, 5), SimTask::new(1, 3)];
//! tasks[0].arrival = Some(0);
//! tasks[1].arrival = Some(1_000_000);
//!
//! let dispatcher = Dispatcher::Fifo;
//! assert_eq!(dispatcher.policy(), DispatchPolicy::Fifo);
//! assert_eq!(dispatcher.select(&[0, 1], &tasks, 2_000_000), Some(0));
//! ```

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::CalibrationProfile;
use crate::error::{MappingError, Result};
use crate::fuzzy::{kernel, FuzzyController, ModelKind, ModelStore};
use crate::models::SimTask;

/// Dispatching policy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchPolicy {
    /// Fuzzy task-selection controller type 2 (`CONT2`).
    FuzzyType2,
    /// Fuzzy task-selection controller type 3 (`CONT3`).
    FuzzyType3,
    /// Oldest queued task first (`FIFO`).
    Fifo,
}

impl DispatchPolicy {
    /// Tag used in reports and exported file names.
    pub fn tag(self) -> &'static str {
        match self {
            DispatchPolicy::FuzzyType2 => "CONT2",
            DispatchPolicy::FuzzyType3 => "CONT3",
            DispatchPolicy::Fifo => "FIFO",
        }
    }

    /// Relation model this policy needs, if any.
    pub fn model(self) -> Option<ModelKind> {
        match self {
            DispatchPolicy::FuzzyType2 => Some(ModelKind::DispatchType2),
            DispatchPolicy::FuzzyType3 => Some(ModelKind::DispatchType3),
            DispatchPolicy::Fifo => None,
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DispatchPolicy {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONT2" => Ok(DispatchPolicy::FuzzyType2),
            "CONT3" => Ok(DispatchPolicy::FuzzyType3),
            "FIFO" => Ok(DispatchPolicy::Fifo),
            _ => Err(MappingError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Resolved dispatching handler for one run.
#[derive(Debug, Clone)]
pub enum Dispatcher {
    /// Scores every queued task with a fuzzy controller.
    Fuzzy {
        policy: DispatchPolicy,
        controller: FuzzyController,
    },
    /// Always the head of the queue.
    Fifo,
}

impl Dispatcher {
    /// Resolves `policy`, loading its relation model from `store` when needed.
    pub fn build(
        policy: DispatchPolicy,
        profile: &CalibrationProfile,
        store: &ModelStore,
    ) -> Result<Self> {
        match policy.model() {
            Some(kind) => {
                let model = store.load(kind)?;
                let controller =
                    FuzzyController::new(&profile.execution_time, &profile.waiting_time, model)?;
                Ok(Dispatcher::Fuzzy { policy, controller })
            }
            None => Ok(Dispatcher::Fifo),
        }
    }

    /// Policy this handler implements.
    pub fn policy(&self) -> DispatchPolicy {
        match self {
            Dispatcher::Fuzzy { policy, .. } => *policy,
            Dispatcher::Fifo => DispatchPolicy::Fifo,
        }
    }

    /// Position within `queue` of the task to dispatch at time `now`.
    ///
    /// `queue` holds positions into `tasks`, in arrival order. Returns
    /// `None` only for an empty queue.
    pub fn select(&self, queue: &[usize], tasks: &[SimTask], now: i64) -> Option<usize> {
        if queue.is_empty() {
            return None;
        }
        match self {
            Dispatcher::Fuzzy { controller, .. } => {
                let scores = task_scores(controller, queue, tasks, now);
                let selected = kernel::select_highest(&scores)?;
                debug!(position = selected, score = scores[selected], now, "fuzzy dispatch");
                Some(selected)
            }
            // Queues are append-only in arrival order, so the head waited longest.
            Dispatcher::Fifo => Some(0),
        }
    }
}

/// Selection rate of every queued task under a fuzzy dispatching controller.
pub fn task_scores(
    controller: &FuzzyController,
    queue: &[usize],
    tasks: &[SimTask],
    now: i64,
) -> Vec<f64> {
    queue
        .iter()
        .map(|&pos| {
            let task = &tasks[pos];
            controller.score(task.duration as f64, task.waiting_time(now) as f64)
        })
        .collect()
}
