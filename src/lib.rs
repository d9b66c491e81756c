//! Fuzzy-logic task-to-thread mapping simulator.
//!
//! Simulates executing a dependency graph of tasks on a fixed pool of
//! threads. Two decisions are made every tick: which thread a newly ready
//! task is queued on (allocation), and which queued task an idle thread runs
//! next (dispatching). Either decision can be made by a two-input fuzzy
//! controller or by a classical baseline (round-robin, FIFO).
//!
//! # Modules
//!
//! - **`models`**: Domain types: `SimTask`, `ThreadState`, `Schedule`, `Assignment`
//! - **`fuzzy`**: Fuzzification, max-min inference, centroid defuzzification,
//!   relation models and the two-input `FuzzyController`
//! - **`allocation`**: Thread selection for ready tasks (CONT1, RR)
//! - **`dispatching`**: Task selection for idle threads (CONT2, CONT3, FIFO)
//! - **`scheduler`**: The tick-driven `MappingScheduler` and run KPIs
//! - **`experiment`**: Back-to-back comparison of policy pairs
//! - **`config`**: Per-benchmark calibration of the fuzzy variables
//! - **`validation`**: Task graph integrity checks (duplicate IDs, DAG cycles)
//! - **`generator`**: Random task graphs, durations and deadlines
//! - **`export`** / **`render`**: Schedule sinks and text Gantt charts
//!
//! # References
//!
//! - Zadeh (1965), "Fuzzy Sets"
//! - Mamdani & Assilian (1975), "An Experiment in Linguistic Synthesis with a
//!   Fuzzy Logic Controller"

pub mod allocation;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod experiment;
pub mod export;
pub mod fuzzy;
pub mod generator;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod validation;

pub use error::{MappingError, Result};
