//! Fuzzy inference kernel.
//!
//! The four steps that turn crisp metrics into a selection score:
//!
//! 1. **Fuzzification**: triangular membership centered on the crisp value.
//! 2. **Conjunction**: elementwise minimum of two antecedent sets (fuzzy AND).
//! 3. **Inference**: max-min composition with a relation matrix.
//! 4. **Defuzzification**: centroid (center of gravity).
//!
//! All functions are pure and deterministic.
//!
//! # Reference
//! Zadeh (1973), "Outline of a New Approach to the Analysis of Complex
//! Systems and Decision Processes" (compositional rule of inference)

use super::RelationModel;

/// Number of points in the selection-rate universe.
pub const SELECTION_RATE_POINTS: usize = 101;

/// Universe of the controller output: `0.00, 0.01, ..., 1.00`.
pub fn selection_rate_universe() -> Vec<f64> {
    (0..SELECTION_RATE_POINTS)
        .map(|i| i as f64 / (SELECTION_RATE_POINTS - 1) as f64)
        .collect()
}

/// Triangular fuzzy set centered on `value` with base `width`, sampled on `universe`.
///
/// Membership at `u` is `1 - 2|value - u| / width` inside the half-width and
/// 0 outside. A non-positive `width` degenerates to a crisp singleton
/// (1 only where `u == value`).
pub fn fuzzify(universe: &[f64], value: f64, width: f64) -> Vec<f64> {
    universe
        .iter()
        .map(|&u| {
            let distance = (value - u).abs();
            if width <= 0.0 {
                if distance == 0.0 { 1.0 } else { 0.0 }
            } else if distance > width / 2.0 {
                0.0
            } else {
                1.0 - 2.0 * distance / width
            }
        })
        .collect()
}

/// Elementwise minimum of two membership vectors.
///
/// # Panics
/// If the vectors have different lengths. Universes are aligned by
/// configuration, so a mismatch is a programming error.
pub fn combine_min(a: &[f64], b: &[f64]) -> Vec<f64> {
    assert_eq!(
        a.len(),
        b.len(),
        "antecedent universes must share one sampling length"
    );
    a.iter().zip(b).map(|(&x, &y)| x.min(y)).collect()
}

/// Max-min relational composition: `out[i] = max_j min(antecedent[j], model[j][i])`.
///
/// # Panics
/// If `antecedent.len()` differs from the model's row count.
pub fn infer(model: &RelationModel, antecedent: &[f64]) -> Vec<f64> {
    assert_eq!(
        antecedent.len(),
        model.rows(),
        "antecedent length must equal relation row count"
    );
    (0..model.cols())
        .map(|col| {
            antecedent
                .iter()
                .enumerate()
                .fold(0.0_f64, |acc, (row, &mu)| acc.max(mu.min(model.get(row, col))))
        })
        .collect()
}

/// Centroid defuzzification.
///
/// Returns 0 for an empty fuzzy set (all memberships zero), so a degenerate
/// candidate simply loses to any other.
///
/// # Panics
/// If `membership` and `universe` have different lengths.
pub fn defuzzify(universe: &[f64], membership: &[f64]) -> f64 {
    assert_eq!(
        universe.len(),
        membership.len(),
        "membership must be sampled on the given universe"
    );
    let (weighted, total) = universe
        .iter()
        .zip(membership)
        .fold((0.0, 0.0), |(s1, s2), (&u, &mu)| (s1 + mu * u, s2 + mu));
    if total == 0.0 {
        0.0
    } else {
        weighted / total
    }
}

/// Index of the highest score; ties resolve to the lowest index.
///
/// Returns `None` for an empty slice.
pub fn select_highest(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some(b) if score > scores[b] => best = Some(i),
            None => best = Some(i),
            _ => {}
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe(lower: f64, step: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| lower + i as f64 * step).collect()
    }

    #[test]
    fn test_fuzzify_peak_and_feet() {
        let u = universe(0.0, 1.0, 11);
        let mu = fuzzify(&u, 5.0, 4.0);
        assert_eq!(mu.len(), u.len());
        assert!((mu[5] - 1.0).abs() < 1e-10);
        // c ± w/2 lands exactly on the feet
        assert!(mu[3].abs() < 1e-10);
        assert!(mu[7].abs() < 1e-10);
        assert!((mu[4] - 0.5).abs() < 1e-10);
        assert!((mu[6] - 0.5).abs() < 1e-10);
        assert_eq!(mu[0], 0.0);
        assert_eq!(mu[10], 0.0);
    }

    #[test]
    fn test_fuzzify_monotone_from_center() {
        let u = universe(0.0, 0.25, 41);
        let mu = fuzzify(&u, 5.0, 6.0);
        let center = 20;
        for i in center..u.len() - 1 {
            assert!(mu[i + 1] <= mu[i]);
        }
        for i in 1..=center {
            assert!(mu[i - 1] <= mu[i]);
        }
        // symmetric around the center
        for d in 0..=12 {
            assert!((mu[center - d] - mu[center + d]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fuzzify_zero_width_is_singleton() {
        let u = universe(0.0, 1.0, 5);
        assert_eq!(fuzzify(&u, 2.0, 0.0), vec![0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(fuzzify(&u, 2.5, 0.0).iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_combine_min() {
        let a = [0.2, 0.9, 0.5];
        let b = [0.4, 0.1, 0.5];
        assert_eq!(combine_min(&a, &b), vec![0.2, 0.1, 0.5]);
    }

    #[test]
    #[should_panic]
    fn test_combine_min_rejects_unequal_lengths() {
        combine_min(&[0.1, 0.2], &[0.1]);
    }

    #[test]
    fn test_infer_max_min() {
        let model = RelationModel::from_rows(vec![
            vec![0.1, 0.8, 0.3],
            vec![0.6, 0.2, 1.0],
        ])
        .unwrap();
        let out = infer(&model, &[0.5, 0.7]);
        // col0: max(min(.5,.1), min(.7,.6)) = .6
        // col1: max(min(.5,.8), min(.7,.2)) = .5
        // col2: max(min(.5,.3), min(.7,1)) = .7
        assert_eq!(out.len(), 3);
        assert!((out[0] - 0.6).abs() < 1e-10);
        assert!((out[1] - 0.5).abs() < 1e-10);
        assert!((out[2] - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_infer_output_bounded() {
        let rows: Vec<Vec<f64>> = (0..7)
            .map(|r| (0..5).map(|c| ((r * 5 + c) % 11) as f64 / 10.0).collect())
            .collect();
        let model = RelationModel::from_rows(rows).unwrap();
        let antecedent: Vec<f64> = (0..7).map(|i| (i as f64 * 0.37) % 1.0).collect();
        for v in infer(&model, &antecedent) {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    #[should_panic]
    fn test_infer_rejects_wrong_antecedent_length() {
        let model = RelationModel::from_rows(vec![vec![0.5, 0.5]]).unwrap();
        infer(&model, &[0.1, 0.2]);
    }

    #[test]
    fn test_defuzzify_centroid() {
        let u = [0.0, 0.5, 1.0];
        let c = defuzzify(&u, &[1.0, 1.0, 1.0]);
        assert!((c - 0.5).abs() < 1e-10);
        let c = defuzzify(&u, &[0.0, 0.0, 1.0]);
        assert!((c - 1.0).abs() < 1e-10);
        let c = defuzzify(&u, &[1.0, 0.0, 0.5]);
        assert!((c - 0.5 / 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_defuzzify_empty_set_is_zero() {
        let u = selection_rate_universe();
        assert_eq!(defuzzify(&u, &vec![0.0; u.len()]), 0.0);
    }

    #[test]
    fn test_selection_rate_universe() {
        let u = selection_rate_universe();
        assert_eq!(u.len(), 101);
        assert_eq!(u[0], 0.0);
        assert_eq!(u[100], 1.0);
        assert!((u[37] - 0.37).abs() < 1e-12);
    }

    #[test]
    fn test_select_highest_first_wins_ties() {
        assert_eq!(select_highest(&[]), None);
        assert_eq!(select_highest(&[0.3]), Some(0));
        assert_eq!(select_highest(&[0.3, 0.7, 0.7, 0.1]), Some(1));
        assert_eq!(select_highest(&[0.5, 0.5]), Some(0));
        assert_eq!(select_highest(&[0.0, 0.0, 0.2]), Some(2));
    }
}
