//! Calibrated fuzzy variables.

use crate::config::VariableConfig;

use super::kernel;

/// One scalar metric with its clipping bounds and sampled universe.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyVariable {
    shape_factor: f64,
    lower: f64,
    upper: f64,
    universe: Vec<f64>,
}

impl FuzzyVariable {
    /// Builds the variable; universe points are `lower + i * step`.
    pub fn new(config: &VariableConfig) -> Self {
        let universe = (0..config.points())
            .map(|i| config.lower + i as f64 * config.step)
            .collect();
        Self {
            shape_factor: config.shape_factor,
            lower: config.lower,
            upper: config.upper,
            universe,
        }
    }

    /// Clamps a crisp value into `[lower, upper]`.
    pub fn clip(&self, value: f64) -> f64 {
        value.max(self.lower).min(self.upper)
    }

    /// Clips `value` and fuzzifies it over this variable's universe.
    pub fn fuzzify(&self, value: f64) -> Vec<f64> {
        kernel::fuzzify(&self.universe, self.clip(value), self.shape_factor)
    }

    /// Sample points of the universe of discourse.
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    pub fn shape_factor(&self) -> f64 {
        self.shape_factor
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}
