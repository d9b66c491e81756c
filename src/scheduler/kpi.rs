//! Run quality metrics (KPIs).
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Response time | Time at which the last task finished |
//! | Thread idle time | Response time − busy time of the thread |
//! | System idle time | Sum of thread idle times |
//! | Missed deadline | Response time > deadline |

use serde::{Deserialize, Serialize};

use crate::models::Schedule;

use super::PolicyPair;

/// Results of one policy-pair run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Policy pair that produced the run.
    pub pair: PolicyPair,
    /// Makespan.
    pub response_time: i64,
    /// Total idle time over all threads.
    pub idle_time: i64,
    /// Idle time of each thread.
    pub idle_per_thread: Vec<i64>,
    /// Whether the response time exceeds the deadline.
    pub missed_deadline: bool,
    /// Number of finished tasks.
    pub completed: usize,
    /// Per-thread execution history.
    pub schedule: Schedule,
    /// Text Gantt chart, when rendering was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gantt: Option<String>,
}

impl RunReport {
    /// Builds a report from a finished schedule.
    pub fn calculate(
        pair: PolicyPair,
        schedule: Schedule,
        response_time: i64,
        deadline: i64,
        completed: usize,
    ) -> Self {
        let idle_per_thread = idle_times(&schedule, response_time);
        Self {
            pair,
            response_time,
            idle_time: idle_per_thread.iter().sum(),
            idle_per_thread,
            missed_deadline: missed_deadline(deadline, response_time),
            completed,
            schedule,
            gantt: None,
        }
    }

    /// Tab-separated `response\tidle\tmissed` triple.
    pub fn summary(&self) -> String {
        format!(
            "{}\t{}\t{}",
            self.response_time,
            self.idle_time,
            if self.missed_deadline { "True" } else { "False" }
        )
    }
}

/// Idle time of every thread over `[0, response_time)`.
pub fn idle_times(schedule: &Schedule, response_time: i64) -> Vec<i64> {
    (0..schedule.thread_count)
        .map(|thread| (response_time - schedule.busy_time(thread)).max(0))
        .collect()
}

/// Whether a run finishing at `response_time` misses `deadline`.
#[inline]
pub fn missed_deadline(deadline: i64, response_time: i64) -> bool {
    response_time > deadline
}
