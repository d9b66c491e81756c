//! Allocation controllers.
//!
//! Choose the thread whose allocation queue receives a newly ready task.
//!
//! | Tag | Policy | Inputs |
//! |-----|--------|--------|
//! | `CONT1` | Fuzzy controller 1 | queue length, total queued execution time |
//! | `RR` | Round-robin | none (cursor) |
//!
//! Policies are parsed from their tag once and resolved into an
//! [`Allocator`] at run setup; decisions never compare strings.

mod round_robin;

pub use round_robin::RoundRobin;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::config::CalibrationProfile;
use crate::error::{MappingError, Result};
use crate::fuzzy::{kernel, FuzzyController, ModelKind, ModelStore};
use crate::models::{SimTask, ThreadState};

/// Allocation policy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationPolicy {
    /// Fuzzy allocation controller (`CONT1`).
    Fuzzy,
    /// Round-robin over threads (`RR`).
    RoundRobin,
}

impl AllocationPolicy {
    /// Tag used in reports and exported file names.
    pub fn tag(self) -> &'static str {
        match self {
            AllocationPolicy::Fuzzy => "CONT1",
            AllocationPolicy::RoundRobin => "RR",
        }
    }

    /// Relation model this policy needs, if any.
    pub fn model(self) -> Option<ModelKind> {
        match self {
            AllocationPolicy::Fuzzy => Some(ModelKind::Allocation),
            AllocationPolicy::RoundRobin => None,
        }
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AllocationPolicy {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONT1" => Ok(AllocationPolicy::Fuzzy),
            "RR" => Ok(AllocationPolicy::RoundRobin),
            _ => Err(MappingError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Resolved allocation handler for one run.
#[derive(Debug, Clone)]
pub enum Allocator {
    /// Scores every queue with the fuzzy controller.
    Fuzzy(FuzzyController),
    /// Cycles through the threads.
    RoundRobin(RoundRobin),
}

impl Allocator {
    /// Resolves `policy`, loading its relation model from `store` when needed.
    pub fn build(
        policy: AllocationPolicy,
        profile: &CalibrationProfile,
        store: &ModelStore,
    ) -> Result<Self> {
        match policy {
            AllocationPolicy::Fuzzy => {
                let model = store.load(ModelKind::Allocation)?;
                let controller = FuzzyController::new(
                    &profile.number_of_tasks,
                    &profile.total_execution_time,
                    model,
                )?;
                Ok(Allocator::Fuzzy(controller))
            }
            AllocationPolicy::RoundRobin => Ok(Allocator::RoundRobin(RoundRobin::new())),
        }
    }

    /// Policy this handler implements.
    pub fn policy(&self) -> AllocationPolicy {
        match self {
            Allocator::Fuzzy(_) => AllocationPolicy::Fuzzy,
            Allocator::RoundRobin(_) => AllocationPolicy::RoundRobin,
        }
    }

    /// Index of the thread that receives the next ready task.
    ///
    /// # Panics
    /// If `threads` is empty.
    pub fn allocate(&mut self, threads: &[ThreadState], tasks: &[SimTask]) -> usize {
        assert!(!threads.is_empty(), "allocation needs at least one thread");
        match self {
            Allocator::Fuzzy(controller) => {
                let scores = queue_scores(controller, threads, tasks);
                let selected = kernel::select_highest(&scores).unwrap_or(0);
                debug!(thread = selected, score = scores[selected], "fuzzy allocation");
                selected
            }
            Allocator::RoundRobin(rr) => rr.next(threads.len()),
        }
    }
}

/// Selection rate of every thread queue under the fuzzy allocation controller.
///
/// Pure function of the current queue contents.
pub fn queue_scores(
    controller: &FuzzyController,
    threads: &[ThreadState],
    tasks: &[SimTask],
) -> Vec<f64> {
    threads
        .iter()
        .map(|thread| {
            controller.score(
                thread.queue_len() as f64,
                thread.queued_work(tasks) as f64,
            )
        })
        .collect()
}
