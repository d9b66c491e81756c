//! Discrete-event mapping scheduler and run metrics.
//!
//! # Algorithm
//!
//! `MappingScheduler` advances simulated time tick by tick, promoting ready
//! tasks into per-thread allocation queues (allocation controller) and
//! dispatching queued tasks onto idle threads (dispatching controller)
//! until every task has finished.
//!
//! # KPI
//!
//! `RunReport` carries response time, idle time and the missed-deadline
//! flag of a run together with its exported schedule.
//!
//! # Usage
//!
//! ```
//! use u_fuzzymap::config::CalibrationTable;
//! use u_fuzzymap::fuzzy::ModelStore;
//! use u_fuzzymap::models::SimTask;
//! use u_fuzzymap::scheduler::{execute, RunRequest};
//!
//! let tasks = vec![
//!     SimTask::new(0, 2_000_000),
//!     SimTask::new(1, 1_000_000).with_dependency(0),
//! ];
//! let request = RunRequest::new(1, "RR-FIFO".parse().unwrap(), "heat").with_deadline(5_000_000);
//! let report = execute(
//!     &request,
//!     &tasks,
//!     &CalibrationTable::builtin(),
//!     &ModelStore::new("model"),
//! )
//! .unwrap();
//! assert_eq!(report.response_time, 3_000_000);
//! assert!(!report.missed_deadline);
//! ```

mod kpi;
mod mapping;

pub use kpi::{idle_times, missed_deadline, RunReport};
pub use mapping::{MappingOutcome, MappingScheduler};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tracing::{info, warn};

use crate::allocation::{AllocationPolicy, Allocator};
use crate::config::{CalibrationTable, DEFAULT_TICK_STEP};
use crate::dispatching::{DispatchPolicy, Dispatcher};
use crate::error::{MappingError, Result};
use crate::fuzzy::ModelStore;
use crate::models::{reset_tasks, SimTask};
use crate::render::render_gantt;

/// An allocation policy combined with a dispatching policy.
///
/// Written as `ALLOC-DISPATCH`, e.g. `CONT1-CONT2` or `RR-FIFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PolicyPair {
    pub allocation: AllocationPolicy,
    pub dispatch: DispatchPolicy,
}

impl PolicyPair {
    pub fn new(allocation: AllocationPolicy, dispatch: DispatchPolicy) -> Self {
        Self {
            allocation,
            dispatch,
        }
    }

    /// The fuzzy pairs compared by the research harness, followed by the
    /// round-robin/FIFO baseline.
    pub fn standard_set() -> Vec<PolicyPair> {
        use AllocationPolicy::{Fuzzy, RoundRobin};
        use DispatchPolicy::{Fifo, FuzzyType2, FuzzyType3};
        vec![
            PolicyPair::new(Fuzzy, FuzzyType2),
            PolicyPair::new(Fuzzy, FuzzyType3),
            PolicyPair::new(Fuzzy, Fifo),
            PolicyPair::new(RoundRobin, FuzzyType2),
            PolicyPair::new(RoundRobin, FuzzyType3),
            PolicyPair::new(RoundRobin, Fifo),
        ]
    }
}

impl fmt::Display for PolicyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.allocation, self.dispatch)
    }
}

impl FromStr for PolicyPair {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self> {
        let (alloc, disp) = s
            .split_once('-')
            .ok_or_else(|| MappingError::UnknownPolicy(s.to_string()))?;
        Ok(Self::new(alloc.parse()?, disp.parse()?))
    }
}

impl From<PolicyPair> for String {
    fn from(pair: PolicyPair) -> Self {
        pair.to_string()
    }
}

impl TryFrom<String> for PolicyPair {
    type Error = MappingError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Parameters of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Number of simulated threads.
    pub thread_count: usize,
    /// Policy pair to run.
    pub pair: PolicyPair,
    /// Calibration profile key.
    pub benchmark: String,
    /// System deadline (same time unit as task durations).
    pub deadline: i64,
    /// Whether to render a text Gantt chart into the report.
    pub render: bool,
    /// Simulated time per tick.
    pub tick_step: i64,
}

impl RunRequest {
    /// Creates a request with no deadline pressure (`i64::MAX`), no
    /// rendering and the default tick step.
    pub fn new(thread_count: usize, pair: PolicyPair, benchmark: impl Into<String>) -> Self {
        Self {
            thread_count,
            pair,
            benchmark: benchmark.into(),
            deadline: i64::MAX,
            render: false,
            tick_step: DEFAULT_TICK_STEP,
        }
    }

    pub fn with_deadline(mut self, deadline: i64) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn with_tick_step(mut self, tick_step: i64) -> Self {
        self.tick_step = tick_step;
        self
    }

    /// Name used for exported schedules.
    pub fn name(&self) -> String {
        self.pair.to_string()
    }
}

/// Builds the scheduler for `request`, loading only the relation models
/// the policy pair needs.
pub fn build_scheduler(
    request: &RunRequest,
    calibration: &CalibrationTable,
    models: &ModelStore,
) -> Result<MappingScheduler> {
    let profile = calibration.profile(&request.benchmark)?;
    let allocator = Allocator::build(request.pair.allocation, profile, models)?;
    let dispatcher = Dispatcher::build(request.pair.dispatch, profile, models)?;
    Ok(MappingScheduler::new(allocator, dispatcher, request.thread_count)
        .with_tick_step(request.tick_step))
}

/// Runs one policy pair on a fresh copy of `tasks` and evaluates it.
pub fn execute(
    request: &RunRequest,
    tasks: &[SimTask],
    calibration: &CalibrationTable,
    models: &ModelStore,
) -> Result<RunReport> {
    let scheduler = build_scheduler(request, calibration, models)?;
    let outcome = scheduler.run(reset_tasks(tasks))?;

    let schedule = outcome.schedule(request.name());
    let mut report = RunReport::calculate(
        request.pair,
        schedule,
        outcome.response_time,
        request.deadline,
        outcome.completed,
    );
    if request.render {
        report.gantt = Some(render_gantt(&report.schedule, report.response_time, 60));
    }

    info!(
        pair = %request.pair,
        response_time = report.response_time,
        idle_time = report.idle_time,
        missed_deadline = report.missed_deadline,
        "run evaluated"
    );
    if report.missed_deadline {
        warn!(
            pair = %request.pair,
            deadline = request.deadline,
            response_time = report.response_time,
            "deadline missed"
        );
    }
    Ok(report)
}
