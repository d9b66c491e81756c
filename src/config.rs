//! Calibration and run configuration.
//!
//! Fuzzy variable calibration (shape factor, clipping bounds, universe
//! resolution) depends on the benchmark whose task graph is being mapped.
//! Profiles are kept in a [`CalibrationTable`] keyed by benchmark name,
//! either the built-in one or one deserialized from JSON.
//!
//! ```
//! use u_fuzzymap::config::CalibrationTable;
//!
//! let table = CalibrationTable::builtin();
//! let heat = table.profile("heat").unwrap();
//! assert_eq!(heat.number_of_tasks.upper, 4.0);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{MappingError, Result};

/// Default simulated time advanced per scheduler tick.
pub const DEFAULT_TICK_STEP: i64 = 1_000_000;

/// Calibration of one fuzzy variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    /// Base width of the triangular membership function.
    pub shape_factor: f64,
    /// Lower clipping bound (first universe point).
    pub lower: f64,
    /// Upper clipping bound (last universe point).
    pub upper: f64,
    /// Distance between consecutive universe points.
    pub step: f64,
}

impl VariableConfig {
    /// Creates a variable calibration.
    pub const fn new(shape_factor: f64, lower: f64, upper: f64, step: f64) -> Self {
        Self {
            shape_factor,
            lower,
            upper,
            step,
        }
    }

    /// Number of universe sample points.
    pub fn points(&self) -> usize {
        if self.step <= 0.0 || self.upper <= self.lower {
            return 1;
        }
        ((self.upper - self.lower) / self.step).round() as usize + 1
    }
}

/// Calibration of all four fuzzy variables for one benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Allocation queue length.
    pub number_of_tasks: VariableConfig,
    /// Sum of queued execution times.
    pub total_execution_time: VariableConfig,
    /// Execution time of one queued task.
    pub execution_time: VariableConfig,
    /// Time a queued task has waited since arrival.
    pub waiting_time: VariableConfig,
}

/// Calibration profiles keyed by benchmark name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationTable {
    profiles: BTreeMap<String, CalibrationProfile>,
}

impl CalibrationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `axpy`, `heat` and `sparseLU` profiles.
    pub fn builtin() -> Self {
        Self::new()
            .with_profile(
                "axpy",
                CalibrationProfile {
                    number_of_tasks: VariableConfig::new(15.0, 4.0, 24.0, 0.2),
                    total_execution_time: VariableConfig::new(
                        98_500_000.0,
                        59_000_000.0,
                        256_000_000.0,
                        1_970_000.0,
                    ),
                    execution_time: VariableConfig::new(
                        7_500_000.0,
                        7_000_000.0,
                        22_000_000.0,
                        150_000.0,
                    ),
                    waiting_time: VariableConfig::new(
                        91_000_000.0,
                        59_000_000.0,
                        241_000_000.0,
                        1_820_000.0,
                    ),
                },
            )
            .with_profile(
                "heat",
                CalibrationProfile {
                    number_of_tasks: VariableConfig::new(3.0, 0.0, 4.0, 0.04),
                    total_execution_time: VariableConfig::new(
                        50_000_000.0,
                        0.0,
                        100_000_000.0,
                        1_000_000.0,
                    ),
                    execution_time: VariableConfig::new(
                        7_000_000.0,
                        30_000_000.0,
                        45_000_000.0,
                        150_000.0,
                    ),
                    waiting_time: VariableConfig::new(
                        50_000_000.0,
                        0.0,
                        100_000_000.0,
                        1_000_000.0,
                    ),
                },
            )
            .with_profile(
                "sparseLU",
                CalibrationProfile {
                    number_of_tasks: VariableConfig::new(6.0, 2.0, 10.0, 0.08),
                    total_execution_time: VariableConfig::new(
                        116_000_000.0,
                        0.0,
                        232_000_000.0,
                        2_320_000.0,
                    ),
                    execution_time: VariableConfig::new(
                        40_000_000.0,
                        0.0,
                        80_000_000.0,
                        800_000.0,
                    ),
                    waiting_time: VariableConfig::new(
                        70_000_000.0,
                        0.0,
                        145_000_000.0,
                        1_450_000.0,
                    ),
                },
            )
    }

    /// Adds or replaces a profile.
    pub fn with_profile(mut self, benchmark: impl Into<String>, profile: CalibrationProfile) -> Self {
        self.profiles.insert(benchmark.into(), profile);
        self
    }

    /// Looks up the profile for `benchmark`.
    pub fn profile(&self, benchmark: &str) -> Result<&CalibrationProfile> {
        self.profiles
            .get(benchmark)
            .ok_or_else(|| MappingError::UnknownBenchmark(benchmark.to_string()))
    }

    /// Benchmark names in the table, sorted.
    pub fn benchmarks(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Parses a table from JSON (`{"name": {profile}, ...}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MappingError::from_io(path, e))?;
        Self::from_json(&text)
    }

    /// Serializes the table to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
