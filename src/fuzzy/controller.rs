//! Two-input fuzzy decision controller.

use std::sync::Arc;

use crate::config::VariableConfig;
use crate::error::{MappingError, Result};

use super::kernel::{self, SELECTION_RATE_POINTS};
use super::{FuzzyVariable, RelationModel};

/// Scores a candidate from two crisp metrics.
///
/// Pipeline: clip → fuzzify each input → min → max-min inference with the
/// relation model → centroid over the selection-rate universe. Dimensions
/// are checked once at construction so scoring itself cannot fail.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    first: FuzzyVariable,
    second: FuzzyVariable,
    model: Arc<RelationModel>,
    output: Vec<f64>,
}

impl FuzzyController {
    /// Creates a controller over two calibrated inputs and a relation model.
    ///
    /// Both input universes must have the model's row count, and the model
    /// must have one column per selection-rate point.
    pub fn new(
        first: &VariableConfig,
        second: &VariableConfig,
        model: Arc<RelationModel>,
    ) -> Result<Self> {
        let first = FuzzyVariable::new(first);
        let second = FuzzyVariable::new(second);

        if first.universe().len() != second.universe().len() {
            return Err(MappingError::ShapeMismatch {
                what: "second input universe length",
                expected: first.universe().len(),
                found: second.universe().len(),
            });
        }
        if model.rows() != first.universe().len() {
            return Err(MappingError::ShapeMismatch {
                what: "relation model rows",
                expected: first.universe().len(),
                found: model.rows(),
            });
        }
        if model.cols() != SELECTION_RATE_POINTS {
            return Err(MappingError::ShapeMismatch {
                what: "relation model columns",
                expected: SELECTION_RATE_POINTS,
                found: model.cols(),
            });
        }

        Ok(Self {
            first,
            second,
            model,
            output: kernel::selection_rate_universe(),
        })
    }

    /// Selection rate in `[0, 1]` for one candidate.
    pub fn score(&self, first: f64, second: f64) -> f64 {
        let antecedent = kernel::combine_min(&self.first.fuzzify(first), &self.second.fuzzify(second));
        let consequent = kernel::infer(&self.model, &antecedent);
        kernel::defuzzify(&self.output, &consequent)
    }

    pub fn first(&self) -> &FuzzyVariable {
        &self.first
    }

    pub fn second(&self) -> &FuzzyVariable {
        &self.second
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Relation where antecedent row `r` of `n` maps to a crisp output
    /// peak at column `r * 100 / (n - 1)`, so larger inputs score higher.
    pub(crate) fn diagonal_model(n: usize) -> Arc<RelationModel> {
        let rows = (0..n)
            .map(|r| {
                let peak = r * (SELECTION_RATE_POINTS - 1) / (n - 1);
                (0..SELECTION_RATE_POINTS)
                    .map(|c| if c == peak { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        Arc::new(RelationModel::from_rows(rows).unwrap())
    }

    /// Same as [`diagonal_model`] but reversed: smaller inputs score higher.
    pub(crate) fn anti_diagonal_model(n: usize) -> Arc<RelationModel> {
        let rows = (0..n)
            .map(|r| {
                let peak = (n - 1 - r) * (SELECTION_RATE_POINTS - 1) / (n - 1);
                (0..SELECTION_RATE_POINTS)
                    .map(|c| if c == peak { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();
        Arc::new(RelationModel::from_rows(rows).unwrap())
    }

    fn unit(upper: f64) -> VariableConfig {
        VariableConfig::new(2.0, 0.0, upper, upper / 10.0)
    }

    #[test]
    fn test_rejects_row_mismatch() {
        let err = FuzzyController::new(&unit(10.0), &unit(10.0), diagonal_model(5)).unwrap_err();
        assert!(matches!(
            err,
            MappingError::ShapeMismatch {
                what: "relation model rows",
                expected: 11,
                found: 5
            }
        ));
    }

    #[test]
    fn test_rejects_column_mismatch() {
        let model = Arc::new(RelationModel::from_rows(vec![vec![0.5; 3]; 11]).unwrap());
        let err = FuzzyController::new(&unit(10.0), &unit(10.0), model).unwrap_err();
        assert!(matches!(err, MappingError::ShapeMismatch { what: "relation model columns", .. }));
    }

    #[test]
    fn test_rejects_unequal_inputs() {
        let err = FuzzyController::new(
            &unit(10.0),
            &VariableConfig::new(2.0, 0.0, 10.0, 2.0),
            diagonal_model(11),
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_score_follows_relation() {
        let c = FuzzyController::new(&unit(10.0), &unit(10.0), diagonal_model(11)).unwrap();
        let low = c.score(1.0, 1.0);
        let high = c.score(9.0, 9.0);
        assert!(high > low);
        assert!((0.0..=1.0).contains(&low));
        assert!((0.0..=1.0).contains(&high));

        let c = FuzzyController::new(&unit(10.0), &unit(10.0), anti_diagonal_model(11)).unwrap();
        assert!(c.score(1.0, 1.0) > c.score(9.0, 9.0));
    }

    #[test]
    fn test_score_is_deterministic() {
        let c = FuzzyController::new(&unit(10.0), &unit(10.0), diagonal_model(11)).unwrap();
        assert_eq!(c.score(3.3, 7.1), c.score(3.3, 7.1));
    }

    #[test]
    fn test_disjoint_inputs_score_zero() {
        // Narrow triangles centered far apart never overlap: empty antecedent.
        let narrow = VariableConfig::new(1.0, 0.0, 10.0, 1.0);
        let c = FuzzyController::new(&narrow, &narrow, diagonal_model(11)).unwrap();
        assert_eq!(c.score(0.0, 10.0), 0.0);
    }
}
