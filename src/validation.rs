//! Input validation for task graphs.
//!
//! The mapping loop assumes a well-formed dependency DAG; a cyclic or
//! unreachable graph never terminates. Checks structural integrity before
//! mapping. Detects:
//! - Duplicate task IDs
//! - Dependencies on unknown tasks
//! - Self-dependencies
//! - Circular dependencies (DAG validation)
//! - Graphs with no initially ready task
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::models::{SimTask, TaskId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task depends on an ID that is not in the list.
    UnknownDependency,
    /// A task depends on itself.
    SelfDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// Every task has at least one dependency.
    NoReadyTask,
    /// A task has a negative execution time.
    NegativeDuration,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a task graph before mapping.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No negative durations
/// 3. All dependency references point to existing tasks
/// 4. No task depends on itself
/// 5. At least one task is ready at time 0 (non-empty lists only)
/// 6. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_graph(tasks: &[SimTask]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        if task.duration < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeDuration,
                format!("Task {} has negative duration {}", task.id, task.duration),
            ));
        }
    }

    for task in tasks {
        for &dep in &task.dependencies {
            if dep == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task {} depends on itself", task.id),
                ));
            } else if !task_ids.contains(&dep) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!("Task {} references unknown dependency {}", task.id, dep),
                ));
            }
        }
    }

    if !tasks.is_empty() && tasks.iter().all(|t| !t.dependencies.is_empty()) {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoReadyTask,
            "No task is ready at time 0 (every task has dependencies)",
        ));
    }

    if let Some(cycle_err) = detect_cycles(tasks) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph using DFS.
///
/// Self-loops are reported separately and skipped here.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists. Nodes are visited in
/// ascending ID order so the reported task is deterministic.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(tasks: &[SimTask]) -> Option<ValidationError> {
    // Adjacency list: dependency → dependents
    let mut adj: HashMap<TaskId, Vec<TaskId>> = HashMap::new();
    let mut all_ids: BTreeSet<TaskId> = BTreeSet::new();

    for task in tasks {
        all_ids.insert(task.id);
        for &dep in &task.dependencies {
            if dep != task.id {
                adj.entry(dep).or_default().push(task.id);
            }
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for &node in &all_ids {
        if !visited.contains(&node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: TaskId,
    adj: &HashMap<TaskId, Vec<TaskId>>,
    visited: &mut HashSet<TaskId>,
    in_stack: &mut HashSet<TaskId>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
