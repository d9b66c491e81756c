//! Back-to-back comparison of policy pairs on one task graph.
//!
//! Each pair runs on its own reset copy of the base task list, so no run
//! can observe another's arrival/start/finish/status mutations.
//!
//! ```
//! use u_fuzzymap::experiment::Experiment;
//! use u_fuzzymap::fuzzy::ModelStore;
//! use u_fuzzymap::models::SimTask;
//!
//! let tasks = vec![SimTask::new(0, 1_000_000), SimTask::new(1, 1_000_000)];
//! let experiment = Experiment::new(tasks, 2, "heat", ModelStore::new("model"));
//! let reports = experiment.run(&["RR-FIFO".parse().unwrap()]).unwrap();
//! assert_eq!(reports[0].response_time, 1_000_000);
//! ```

use tracing::info;

use crate::config::{CalibrationTable, DEFAULT_TICK_STEP};
use crate::error::{MappingError, Result};
use crate::export::ScheduleSink;
use crate::fuzzy::ModelStore;
use crate::models::SimTask;
use crate::scheduler::{execute, PolicyPair, RunReport, RunRequest};
use crate::validation::validate_graph;

/// A task graph plus everything needed to map it under several policy pairs.
#[derive(Debug, Clone)]
pub struct Experiment {
    tasks: Vec<SimTask>,
    thread_count: usize,
    benchmark: String,
    deadline: i64,
    render: bool,
    tick_step: i64,
    calibration: CalibrationTable,
    models: ModelStore,
}

impl Experiment {
    /// Creates an experiment with the built-in calibration table and no deadline.
    pub fn new(
        tasks: Vec<SimTask>,
        thread_count: usize,
        benchmark: impl Into<String>,
        models: ModelStore,
    ) -> Self {
        Self {
            tasks,
            thread_count,
            benchmark: benchmark.into(),
            deadline: i64::MAX,
            render: false,
            tick_step: DEFAULT_TICK_STEP,
            calibration: CalibrationTable::builtin(),
            models,
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

    pub fn with_calibration(mut self, calibration: CalibrationTable) -> Self {
        self.calibration = calibration;
        self
    }

    /// Base task list (never mutated by runs).
    pub fn tasks(&self) -> &[SimTask] {
        &self.tasks
    }

    /// Runs every pair in order and returns one report per pair.
    ///
    /// The task graph is validated first; an invalid graph would never
    /// finish mapping.
    pub fn run(&self, pairs: &[PolicyPair]) -> Result<Vec<RunReport>> {
        validate_graph(&self.tasks).map_err(MappingError::InvalidGraph)?;

        info!(
            benchmark = %self.benchmark,
            tasks = self.tasks.len(),
            threads = self.thread_count,
            pairs = pairs.len(),
            "experiment started"
        );

        pairs
            .iter()
            .map(|&pair| {
                let request = RunRequest::new(self.thread_count, pair, self.benchmark.clone())
                    .with_deadline(self.deadline)
                    .with_render(self.render)
                    .with_tick_step(self.tick_step);
                execute(&request, &self.tasks, &self.calibration, &self.models)
            })
            .collect()
    }

    /// Runs every pair and exports each schedule to `sink`.
    pub fn run_with_sink(
        &self,
        pairs: &[PolicyPair],
        sink: &mut dyn ScheduleSink,
    ) -> Result<Vec<RunReport>> {
        let reports = self.run(pairs)?;
        for report in &reports {
            sink.export(&report.schedule)?;
        }
        Ok(reports)
    }
}

/// One tab-separated line with `response\tidle\tmissed` for every report.
pub fn results_line(reports: &[RunReport]) -> String {
    reports
        .iter()
        .map(RunReport::summary)
        .collect::<Vec<_>>()
        .join("\t")
}
