//! Round-robin thread cursor.

/// Cursor that advances by one thread per call, wrapping at the thread count.
///
/// Starts before thread 0, so the first call returns 0. The cursor is the
/// only state; it is unrelated to which thread last completed a task.
#[derive(Debug, Clone, Default)]
pub struct RoundRobin {
    cursor: Option<usize>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances and returns the next thread index.
    pub fn next(&mut self, thread_count: usize) -> usize {
        let next = match self.cursor {
            Some(c) if c + 1 < thread_count => c + 1,
            _ => 0,
        };
        self.cursor = Some(next);
        next
    }

    /// Last returned index, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
