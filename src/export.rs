//! Schedule export.
//!
//! A finished run hands its per-thread execution history to a
//! [`ScheduleSink`], keyed by controller-pair name.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{MappingError, Result};
use crate::models::Schedule;

/// Destination for exported schedules.
pub trait ScheduleSink {
    /// Stores one run's schedule.
    fn export(&mut self, schedule: &Schedule) -> Result<()>;
}

/// Writes each schedule as pretty JSON to `<dir>/fuzzy_<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    dir: PathBuf,
}

impl JsonDirectorySink {
    /// Creates a sink writing into `dir` (created on first export).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File a schedule named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("fuzzy_{name}.json"))
    }

    /// Reads back a schedule written by this sink.
    pub fn read(path: impl AsRef<Path>) -> Result<Schedule> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MappingError::from_io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl ScheduleSink for JsonDirectorySink {
    fn export(&mut self, schedule: &Schedule) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| MappingError::from_io(&self.dir, e))?;
        let path = self.path_for(&schedule.name);
        let json = serde_json::to_string_pretty(schedule)?;
        fs::write(&path, json).map_err(|e| MappingError::from_io(&path, e))?;
        debug!(path = %path.display(), assignments = schedule.assignment_count(), "schedule exported");
        Ok(())
    }
}

/// Keeps exported schedules in memory, in export order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub schedules: Vec<Schedule>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent export named `name`.
    pub fn get(&self, name: &str) -> Option<&Schedule> {
        self.schedules.iter().rev().find(|s| s.name == name)
    }
}

impl ScheduleSink for MemorySink {
    fn export(&mut self, schedule: &Schedule) -> Result<()> {
        self.schedules.push(schedule.clone());
        Ok(())
    }
}
