//! Iteration controls and convergence diagnostics for value function iteration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How the per-iteration Bellman update is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    /// Single-threaded double loop.
    #[default]
    Sequential,
    /// Return-matrix columns and row maximizations are spread over the rayon pool.
    Parallel,
}

/// Configuration for the outer fixed-point loop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IterationOptions {
    /// Supremum norm tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of Bellman updates before giving up.
    pub max_iterations: usize,
    /// Evaluation strategy for each update.
    pub execution: Execution,
}

impl Default for IterationOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 1_000,
            execution: Execution::Sequential,
        }
    }
}

impl IterationOptions {
    /// Override the stopping tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Select sequential or parallel evaluation.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Checks that the loop has a reachable stopping rule.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Tolerance {
                tolerance: self.tolerance,
            }
            .into());
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::IterationCap.into());
        }
        Ok(())
    }
}

/// Diagnostics returned alongside the converged value and policy functions.
#[derive(Clone, Debug, Serialize)]
pub struct IterationSummary {
    /// Number of Bellman updates performed.
    pub iterations: usize,
    /// Sup-norm distance between the last two value functions.
    pub norm: f64,
    /// Whether `norm <= tolerance` held when the loop stopped.
    pub converged: bool,
    /// Wall-clock time spent in the loop.
    pub elapsed: Duration,
}
