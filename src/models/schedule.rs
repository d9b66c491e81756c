//! Schedule (run result) model.
//!
//! A schedule is the exported form of a finished run: for every simulated
//! thread, the ordered list of tasks it executed and when. It is the value
//! handed to schedule sinks and the Gantt renderer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{SimTask, TaskId, TaskStatus, ThreadState};

/// The complete per-thread execution history of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Controller-pair name, e.g. `"CONT1-CONT2"`.
    pub name: String,
    /// Dispatch records in per-thread execution order.
    pub assignments: Vec<Assignment>,
    /// Number of simulated threads (threads that never ran a task still count).
    pub thread_count: usize,
}

/// One dispatched task on one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Executed task.
    pub task_id: TaskId,
    /// Thread index.
    pub thread: usize,
    /// Dispatch time.
    pub start: i64,
    /// Completion time (`start + duration`).
    pub finish: i64,
    /// Task status at export time.
    pub status: TaskStatus,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(task_id: TaskId, thread: usize, start: i64, finish: i64) -> Self {
        Self {
            task_id,
            thread,
            start,
            finish,
            status: TaskStatus::Finished,
        }
    }

    /// Execution duration.
    #[inline]
    pub fn duration(&self) -> i64 {
        self.finish - self.start
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new(name: impl Into<String>, thread_count: usize) -> Self {
        Self {
            name: name.into(),
            assignments: Vec::new(),
            thread_count,
        }
    }

    /// Builds a schedule from the thread histories of a run.
    pub fn from_threads(name: impl Into<String>, threads: &[ThreadState], tasks: &[SimTask]) -> Self {
        let mut schedule = Self::new(name, threads.len());
        for (thread_idx, thread) in threads.iter().enumerate() {
            for &pos in &thread.history {
                let task = &tasks[pos];
                let start = task.start.unwrap_or(0);
                schedule.add_assignment(Assignment {
                    task_id: task.id,
                    thread: thread_idx,
                    start,
                    finish: task.finish.unwrap_or(start + task.duration),
                    status: task.status,
                });
            }
        }
        schedule
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.thread_count = self.thread_count.max(assignment.thread + 1);
        self.assignments.push(assignment);
    }

    /// Latest finish time across all assignments.
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.finish).max().unwrap_or(0)
    }

    /// Finds the assignment of a task.
    pub fn assignment_for_task(&self, task_id: TaskId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task_id == task_id)
    }

    /// Returns the assignments of one thread, in execution order.
    pub fn assignments_for_thread(&self, thread: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.thread == thread)
            .collect()
    }

    /// Total execution time of one thread.
    pub fn busy_time(&self, thread: usize) -> i64 {
        self.assignments_for_thread(thread)
            .iter()
            .map(|a| a.duration())
            .sum()
    }

    /// How many times each task id appears across all threads.
    ///
    /// A well-formed run yields exactly one occurrence per task.
    pub fn task_occurrences(&self) -> HashMap<TaskId, usize> {
        let mut counts = HashMap::new();
        for a in &self.assignments {
            *counts.entry(a.task_id).or_insert(0) += 1;
        }
        counts
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new("RR-FIFO", 2);
        s.add_assignment(Assignment::new(0, 0, 0, 2_000_000));
        s.add_assignment(Assignment::new(1, 1, 0, 1_000_000));
        s.add_assignment(Assignment::new(2, 0, 2_000_000, 5_000_000));
        s
    }

    #[test]
    fn test_schedule_makespan() {
        assert_eq!(sample_schedule().makespan(), 5_000_000);
    }

    #[test]
    fn test_assignments_for_thread_keep_order() {
        let s = sample_schedule();
        let t0 = s.assignments_for_thread(0);
        assert_eq!(t0.len(), 2);
        assert_eq!(t0[0].task_id, 0);
        assert_eq!(t0[1].task_id, 2);
        assert_eq!(s.busy_time(0), 5_000_000);
        assert_eq!(s.busy_time(1), 1_000_000);
    }

    #[test]
    fn test_assignment_for_task() {
        let s = sample_schedule();
        assert_eq!(s.assignment_for_task(1).unwrap().thread, 1);
        assert!(s.assignment_for_task(99).is_none());
    }

    #[test]
    fn test_from_threads() {
        let mut tasks = vec![SimTask::new(7, 3), SimTask::new(8, 4)];
        tasks[0].start = Some(0);
        tasks[0].finish = Some(3);
        tasks[0].status = TaskStatus::Finished;
        tasks[1].start = Some(0);
        tasks[1].finish = Some(4);
        tasks[1].status = TaskStatus::Executing;

        let mut threads = vec![ThreadState::new(), ThreadState::new(), ThreadState::new()];
        threads[0].history.push(0);
        threads[2].history.push(1);

        let s = Schedule::from_threads("CONT1-FIFO", &threads, &tasks);
        assert_eq!(s.thread_count, 3);
        assert_eq!(s.assignment_count(), 2);
        let a = s.assignment_for_task(8).unwrap();
        assert_eq!(a.thread, 2);
        assert_eq!(a.finish, 4);
        assert_eq!(a.status, TaskStatus::Executing);
    }

    #[test]
    fn test_task_occurrences() {
        let s = sample_schedule();
        assert!(s.task_occurrences().values().all(|&n| n == 1));
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new("x", 0);
        assert_eq!(s.makespan(), 0);
        assert_eq!(s.assignment_count(), 0);
    }
}
