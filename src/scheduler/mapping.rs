//! Discrete-event task-to-thread mapping.
//!
//! # Algorithm
//!
//! Simulated time starts at 0 and advances by a fixed tick step after every
//! full pass over the threads. Within a pass, for each thread in index order:
//!
//! 1. **Completion**: the thread's executing task is marked finished once
//!    its finish time is reached.
//! 2. **Promotion** (once per tick, in the coordinator slot right after
//!    thread 0's completion check): every pending task whose dependencies
//!    are all finished is stamped with the current time and pushed onto the
//!    queue chosen by the allocator.
//! 3. **Dispatch**: an idle thread with a non-empty queue runs the task
//!    chosen by the dispatcher.
//!
//! The run ends the instant the last task finishes; that time is the
//! response time (makespan).
//!
//! # Termination
//! A cyclic or unreachable dependency graph never finishes. Validate graphs
//! with [`crate::validation::validate_graph`] before mapping them.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::allocation::Allocator;
use crate::config::DEFAULT_TICK_STEP;
use crate::dispatching::Dispatcher;
use crate::error::{MappingError, Result};
use crate::models::{index_by_id, Schedule, SimTask, TaskId, TaskStatus, ThreadState};

use super::PolicyPair;

/// Mutable state of one run. Created fresh by every [`MappingScheduler::run`].
#[derive(Debug)]
struct RunContext {
    now: i64,
    tasks: Vec<SimTask>,
    /// Positions of tasks not yet queued, in task-list order.
    pending: Vec<usize>,
    /// Dependency positions per task, resolved once from ids.
    dependencies: Vec<Vec<usize>>,
    threads: Vec<ThreadState>,
    completed: usize,
    last_completed_thread: Option<usize>,
    allocator: Allocator,
}

impl RunContext {
    fn is_done(&self) -> bool {
        self.completed == self.tasks.len()
    }

    fn is_ready(&self, pos: usize) -> bool {
        self.dependencies[pos]
            .iter()
            .all(|&dep| self.tasks[dep].status == TaskStatus::Finished)
    }
}

/// Result of a finished run.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    /// Time at which the last task finished.
    pub response_time: i64,
    /// Final task states.
    pub tasks: Vec<SimTask>,
    /// Final thread states (queues are empty; histories are complete).
    pub threads: Vec<ThreadState>,
    /// Number of finished tasks (equals the task count).
    pub completed: usize,
    /// Thread on which the last completion was observed.
    pub last_completed_thread: Option<usize>,
}

impl MappingOutcome {
    /// Exports the execution histories under `name`.
    pub fn schedule(&self, name: impl Into<String>) -> Schedule {
        Schedule::from_threads(name, &self.threads, &self.tasks)
    }
}

/// Runs the mapping loop for one allocation/dispatching policy pair.
///
/// The scheduler itself is immutable; each [`run`](Self::run) works on its
/// own [`RunContext`] (including a copy of the allocator's cursor), so no
/// state leaks between runs.
#[derive(Debug, Clone)]
pub struct MappingScheduler {
    allocator: Allocator,
    dispatcher: Dispatcher,
    thread_count: usize,
    tick_step: i64,
}

impl MappingScheduler {
    /// Creates a scheduler over `thread_count` simulated threads.
    pub fn new(allocator: Allocator, dispatcher: Dispatcher, thread_count: usize) -> Self {
        Self {
            allocator,
            dispatcher,
            thread_count,
            tick_step: DEFAULT_TICK_STEP,
        }
    }

    /// Sets the simulated time advanced per tick.
    pub fn with_tick_step(mut self, tick_step: i64) -> Self {
        self.tick_step = tick_step;
        self
    }

    /// Policy pair this scheduler implements.
    pub fn pair(&self) -> PolicyPair {
        PolicyPair::new(self.allocator.policy(), self.dispatcher.policy())
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn tick_step(&self) -> i64 {
        self.tick_step
    }

    /// Maps `tasks` onto the threads until every task has finished.
    ///
    /// `tasks` should be a fresh copy (see [`crate::models::reset_tasks`]);
    /// per-run fields already set are overwritten as the run progresses.
    ///
    /// # Errors
    /// `NoThreads` for a zero thread count, `UnknownDependency` when a task
    /// references an id missing from `tasks`.
    pub fn run(&self, tasks: Vec<SimTask>) -> Result<MappingOutcome> {
        if self.thread_count == 0 {
            return Err(MappingError::NoThreads);
        }
        let dependencies = resolve_dependencies(&tasks, &index_by_id(&tasks))?;

        let mut ctx = RunContext {
            now: 0,
            pending: (0..tasks.len()).collect(),
            dependencies,
            threads: vec![ThreadState::new(); self.thread_count],
            completed: 0,
            last_completed_thread: None,
            allocator: self.allocator.clone(),
            tasks,
        };

        info!(
            pair = %self.pair(),
            tasks = ctx.tasks.len(),
            threads = self.thread_count,
            "mapping started"
        );

        while !ctx.is_done() {
            if self.step(&mut ctx) {
                break;
            }
            ctx.now += self.tick_step;
        }

        info!(pair = %self.pair(), response_time = ctx.now, "mapping finished");

        Ok(MappingOutcome {
            response_time: ctx.now,
            completed: ctx.completed,
            last_completed_thread: ctx.last_completed_thread,
            tasks: ctx.tasks,
            threads: ctx.threads,
        })
    }

    /// One full pass over the threads at `ctx.now`.
    ///
    /// Returns `true` if the last task finished during this pass.
    fn step(&self, ctx: &mut RunContext) -> bool {
        let mut promoted = false;
        for thread in 0..self.thread_count {
            self.complete(ctx, thread);
            if ctx.is_done() {
                return true;
            }
            if !promoted {
                self.promote(ctx);
                promoted = true;
            }
            self.dispatch(ctx, thread);
        }
        false
    }

    fn complete(&self, ctx: &mut RunContext, thread: usize) {
        let Some(pos) = ctx.threads[thread].current() else {
            return;
        };
        let now = ctx.now;
        let task = &mut ctx.tasks[pos];
        if task.status == TaskStatus::Executing && task.finish.is_some_and(|f| f <= now) {
            task.status = TaskStatus::Finished;
            ctx.completed += 1;
            ctx.last_completed_thread = Some(thread);
            debug!(task = task.id, thread, now, "task finished");
        }
    }

    fn promote(&self, ctx: &mut RunContext) {
        let ready: Vec<usize> = ctx
            .pending
            .iter()
            .copied()
            .filter(|&pos| ctx.is_ready(pos))
            .collect();
        if ready.is_empty() {
            return;
        }

        for &pos in &ready {
            let thread = ctx.allocator.allocate(&ctx.threads, &ctx.tasks);
            let task = &mut ctx.tasks[pos];
            task.arrival = Some(ctx.now);
            task.status = TaskStatus::Queued;
            ctx.threads[thread].queue.push(pos);
            debug!(task = task.id, thread, now = ctx.now, "task queued");
        }
        ctx.pending.retain(|pos| !ready.contains(pos));
    }

    fn dispatch(&self, ctx: &mut RunContext, thread: usize) {
        let state = &ctx.threads[thread];
        if !state.is_idle(&ctx.tasks) {
            return;
        }
        let Some(selected) = self.dispatcher.select(&state.queue, &ctx.tasks, ctx.now) else {
            return;
        };

        let state = &mut ctx.threads[thread];
        let pos = state.queue.remove(selected);
        state.history.push(pos);

        let task = &mut ctx.tasks[pos];
        task.start = Some(ctx.now);
        task.finish = Some(ctx.now + task.duration);
        task.status = TaskStatus::Executing;
        debug!(task = task.id, thread, start = ctx.now, finish = ctx.now + task.duration, "task dispatched");
    }
}

/// Converts dependency ids into task positions.
fn resolve_dependencies(
    tasks: &[SimTask],
    index: &HashMap<TaskId, usize>,
) -> Result<Vec<Vec<usize>>> {
    tasks
        .iter()
        .map(|task| {
            task.dependencies
                .iter()
                .map(|dep| {
                    index
                        .get(dep)
                        .copied()
                        .ok_or(MappingError::UnknownDependency {
                            task: task.id,
                            dependency: *dep,
                        })
                })
                .collect::<Result<Vec<usize>>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::RoundRobin;
    use crate::config::VariableConfig;
    use crate::dispatching::DispatchPolicy;
    use crate::fuzzy::{anti_diagonal_model, diagonal_model, FuzzyController};

    const TICK: i64 = 1_000_000;

    fn rr_fifo(threads: usize) -> MappingScheduler {
        MappingScheduler::new(
            Allocator::RoundRobin(RoundRobin::new()),
            Dispatcher::Fifo,
            threads,
        )
    }

    fn fuzzy_pair(threads: usize) -> MappingScheduler {
        let alloc = FuzzyController::new(
            &VariableConfig::new(2.0, 0.0, 10.0, 1.0),
            &VariableConfig::new(2.0 * TICK as f64, 0.0, 10.0 * TICK as f64, TICK as f64),
            anti_diagonal_model(11),
        )
        .unwrap();
        let disp = FuzzyController::new(
            &VariableConfig::new(2.0 * TICK as f64, 0.0, 10.0 * TICK as f64, TICK as f64),
            &VariableConfig::new(2.0 * TICK as f64, 0.0, 10.0 * TICK as f64, TICK as f64),
            diagonal_model(11),
        )
        .unwrap();
        MappingScheduler::new(
            Allocator::Fuzzy(alloc),
            Dispatcher::Fuzzy {
                policy: DispatchPolicy::FuzzyType2,
                controller: disp,
            },
            threads,
        )
    }

    /// Diamond: 0 → {1, 2} → 3, plus an independent task 4.
    fn diamond() -> Vec<SimTask> {
        vec![
            SimTask::new(0, 2 * TICK),
            SimTask::new(1, 3 * TICK).with_dependency(0),
            SimTask::new(2, TICK).with_dependency(0),
            SimTask::new(3, 2 * TICK).with_dependencies([1, 2]),
            SimTask::new(4, 4 * TICK),
        ]
    }

    fn assert_conserved(outcome: &MappingOutcome) {
        assert_eq!(outcome.completed, outcome.tasks.len());
        assert!(outcome.tasks.iter().all(|t| t.status == TaskStatus::Finished));
        let schedule = outcome.schedule("check");
        assert_eq!(schedule.assignment_count(), outcome.tasks.len());
        assert!(schedule.task_occurrences().values().all(|&n| n == 1));
        assert!(outcome.threads.iter().all(|t| t.queue.is_empty()));
    }

    fn assert_dependencies_respected(outcome: &MappingOutcome) {
        let index = index_by_id(&outcome.tasks);
        for task in &outcome.tasks {
            let start = task.start.unwrap();
            assert_eq!(task.finish.unwrap(), start + task.duration);
            assert!(task.arrival.unwrap() <= start);
            for dep in &task.dependencies {
                let dep_task = &outcome.tasks[index[dep]];
                assert!(dep_task.finish.unwrap() <= task.arrival.unwrap());
            }
        }
    }

    #[test]
    fn test_two_task_chain() {
        let tasks = vec![
            SimTask::new(0, 2 * TICK),
            SimTask::new(1, TICK).with_dependency(0),
        ];
        let outcome = rr_fifo(1).run(tasks).unwrap();

        assert_eq!(outcome.response_time, 3 * TICK);
        assert_eq!(outcome.completed, 2);
        let a = &outcome.tasks[0];
        let b = &outcome.tasks[1];
        assert_eq!((a.start, a.finish), (Some(0), Some(2 * TICK)));
        assert_eq!(b.arrival, Some(2 * TICK));
        assert_eq!((b.start, b.finish), (Some(2 * TICK), Some(3 * TICK)));
        assert_eq!(outcome.last_completed_thread, Some(0));
    }

    #[test]
    fn test_independent_tasks_spread_round_robin() {
        let tasks: Vec<SimTask> = (0..4).map(|i| SimTask::new(i, TICK)).collect();
        let outcome = rr_fifo(2).run(tasks).unwrap();

        // Two per thread, back to back.
        assert_eq!(outcome.response_time, 2 * TICK);
        assert_eq!(outcome.threads[0].history, vec![0, 2]);
        assert_eq!(outcome.threads[1].history, vec![1, 3]);
        assert_conserved(&outcome);
    }

    #[test]
    fn test_diamond_rr_fifo() {
        let outcome = rr_fifo(2).run(diamond()).unwrap();
        assert_conserved(&outcome);
        assert_dependencies_respected(&outcome);
        // Critical path 0 → 1 → 3 is 7 ticks; task 1 becomes ready at 2.
        assert!(outcome.response_time >= 7 * TICK);
    }

    #[test]
    fn test_diamond_fuzzy_pair() {
        let scheduler = fuzzy_pair(3);
        let outcome = scheduler.run(diamond()).unwrap();
        assert_conserved(&outcome);
        assert_dependencies_respected(&outcome);
        assert_eq!(scheduler.pair().to_string(), "CONT1-CONT2");
    }

    #[test]
    fn test_completion_on_later_thread_releases_next_tick() {
        // Task 0 lands on thread 1 (round-robin after the filler on 0),
        // finishes at tick 1, and its dependent is promoted only at tick 2
        // because promotion runs before thread 1's completion check.
        let tasks = vec![
            SimTask::new(9, 5 * TICK),
            SimTask::new(0, TICK),
            SimTask::new(1, TICK).with_dependency(0),
        ];
        let outcome = rr_fifo(2).run(tasks).unwrap();
        assert_eq!(outcome.threads[1].history[0], 1);
        assert_eq!(outcome.tasks[2].arrival, Some(2 * TICK));
        assert_conserved(&outcome);
    }

    #[test]
    fn test_zero_duration_task() {
        let tasks = vec![SimTask::new(0, 0), SimTask::new(1, TICK).with_dependency(0)];
        let outcome = rr_fifo(1).run(tasks).unwrap();
        // Finished at the completion check of tick 1, dependent runs [1, 2).
        assert_eq!(outcome.tasks[1].start, Some(TICK));
        assert_eq!(outcome.response_time, 2 * TICK);
    }

    #[test]
    fn test_runs_are_independent() {
        let scheduler = rr_fifo(3);
        let first = scheduler.run(diamond()).unwrap();
        let second = scheduler.run(diamond()).unwrap();
        assert_eq!(first.response_time, second.response_time);
        for (a, b) in first.threads.iter().zip(&second.threads) {
            assert_eq!(a.history, b.history);
        }
    }

    #[test]
    fn test_custom_tick_step() {
        let tasks = vec![SimTask::new(0, 20), SimTask::new(1, 10).with_dependency(0)];
        let outcome = rr_fifo(1).with_tick_step(10).run(tasks).unwrap();
        assert_eq!(outcome.response_time, 30);
    }

    #[test]
    fn test_empty_task_list() {
        let outcome = rr_fifo(4).run(Vec::new()).unwrap();
        assert_eq!(outcome.response_time, 0);
        assert_eq!(outcome.completed, 0);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = rr_fifo(0).run(vec![SimTask::new(0, 1)]).unwrap_err();
        assert!(matches!(err, MappingError::NoThreads));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let err = rr_fifo(1)
            .run(vec![SimTask::new(0, 1).with_dependency(42)])
            .unwrap_err();
        assert!(matches!(
            err,
            MappingError::UnknownDependency {
                task: 0,
                dependency: 42
            }
        ));
    }
}
