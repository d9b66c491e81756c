//! Simulated worker thread state.

use super::{SimTask, TaskStatus};

/// Per-thread state for one mapping run.
///
/// Both sequences hold positions into the run's task arena rather than
/// the tasks themselves, so a task is owned exactly once.
#[derive(Debug, Clone, Default)]
pub struct ThreadState {
    /// Ready tasks waiting for this thread, in arrival order.
    pub queue: Vec<usize>,
    /// Every task ever dispatched to this thread. The last entry is the
    /// running (or most recently finished) task.
    pub history: Vec<usize>,
}

impl ThreadState {
    /// Creates an empty thread.
    pub fn new() -> Self {
        Self::default()
    }

    /// The running or most recently finished task, if any.
    pub fn current(&self) -> Option<usize> {
        self.history.last().copied()
    }

    /// A thread is idle iff it never ran anything or its last task finished.
    pub fn is_idle(&self, tasks: &[SimTask]) -> bool {
        self.current()
            .map_or(true, |pos| tasks[pos].status == TaskStatus::Finished)
    }

    /// Number of queued tasks.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Sum of the durations of all queued tasks.
    pub fn queued_work(&self, tasks: &[SimTask]) -> i64 {
        self.queue.iter().map(|&pos| tasks[pos].duration).sum()
    }

    /// Sum of the durations of every task this thread executed.
    pub fn busy_time(&self, tasks: &[SimTask]) -> i64 {
        self.history.iter().map(|&pos| tasks[pos].duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_when_empty() {
        let tasks: Vec<SimTask> = Vec::new();
        assert!(ThreadState::new().is_idle(&tasks));
    }

    #[test]
    fn test_idle_follows_last_entry() {
        let mut tasks = vec![SimTask::new(0, 5), SimTask::new(1, 7)];
        let mut thread = ThreadState::new();
        thread.history.push(0);
        tasks[0].status = TaskStatus::Executing;
        assert!(!thread.is_idle(&tasks));

        tasks[0].status = TaskStatus::Finished;
        assert!(thread.is_idle(&tasks));

        thread.history.push(1);
        tasks[1].status = TaskStatus::Executing;
        assert!(!thread.is_idle(&tasks));
    }

    #[test]
    fn test_queue_aggregates() {
        let tasks = vec![SimTask::new(0, 5), SimTask::new(1, 7), SimTask::new(2, 11)];
        let mut thread = ThreadState::new();
        thread.queue = vec![0, 2];
        thread.history = vec![1];
        assert_eq!(thread.queue_len(), 2);
        assert_eq!(thread.queued_work(&tasks), 16);
        assert_eq!(thread.busy_time(&tasks), 7);
    }
}
