//! Random task graph and execution-time synthesis.
//!
//! Produces workloads for experiments when no benchmark graph is at hand.
//! Every task may only depend on tasks with a smaller id, so generated
//! graphs are acyclic and task 0 is always ready at time 0.

use rand::prelude::IndexedRandom;
use rand::Rng;

use crate::models::{SimTask, TaskId};

/// Generates a random dependency DAG of `num_tasks` tasks.
///
/// Each task after the first, with probability `dependency_probability`,
/// depends on between 1 and `max_dependencies` distinct earlier tasks.
/// Durations are left at 0; see [`assign_durations`].
pub fn random_graph<R: Rng>(
    num_tasks: usize,
    dependency_probability: f64,
    max_dependencies: usize,
    rng: &mut R,
) -> Vec<SimTask> {
    let p = dependency_probability.clamp(0.0, 1.0);
    let mut tasks: Vec<SimTask> = Vec::with_capacity(num_tasks);

    for i in 0..num_tasks {
        let mut task = SimTask::new(i as TaskId, 0);
        if i > 0 && max_dependencies > 0 && rng.random_bool(p) {
            let earlier: Vec<TaskId> = (0..i as TaskId).collect();
            let count = rng.random_range(1..=max_dependencies.min(i));
            let mut deps: Vec<TaskId> = earlier.choose_multiple(rng, count).copied().collect();
            deps.sort_unstable();
            task.dependencies = deps;
        }
        tasks.push(task);
    }
    tasks
}

/// Draws every task's duration uniformly from `[min, max] * unit`.
pub fn assign_durations<R: Rng>(tasks: &mut [SimTask], min: i64, max: i64, unit: i64, rng: &mut R) {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    for task in tasks {
        task.duration = rng.random_range(lo..=hi) * unit;
    }
}

/// Picks a system deadline as a random fraction of the total work.
///
/// The fraction is drawn uniformly from `[min_fraction, max_fraction]`.
pub fn random_deadline<R: Rng>(
    tasks: &[SimTask],
    min_fraction: f64,
    max_fraction: f64,
    rng: &mut R,
) -> i64 {
    let total: i64 = tasks.iter().map(|t| t.duration).sum();
    let (lo, hi) = if min_fraction <= max_fraction {
        (min_fraction, max_fraction)
    } else {
        (max_fraction, min_fraction)
    };
    let fraction = if lo == hi { lo } else { rng.random_range(lo..=hi) };
    (total as f64 * fraction).round() as i64
}
