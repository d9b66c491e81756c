//! Fuzzy decision engine.
//!
//! Turns live queue and thread metrics into a selection score in `[0, 1]`.
//!
//! # Components
//!
//! - **`kernel`**: fuzzification, min-conjunction, max-min inference and
//!   centroid defuzzification over discretized universes
//! - **`FuzzyVariable`**: calibrated metric (shape factor, bounds, universe)
//! - **`RelationModel`**: precomputed rule matrix loaded from a text file
//! - **`FuzzyController`**: the full two-input scoring pipeline
//!
//! Membership functions, bounds and relations are fixed for a run; nothing
//! here adapts or learns.

mod controller;
pub mod kernel;
mod relation;
mod variable;

pub use controller::FuzzyController;
pub use relation::{ModelKind, ModelStore, RelationModel};
pub use variable::FuzzyVariable;

#[cfg(test)]
pub(crate) use controller::tests::{anti_diagonal_model, diagonal_model};
