//! Injected solver configuration: grid bounds, economic parameters and stopping rule.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VfiError};
use crate::grid::StateGrid;
use crate::model::GrowthModel;
use crate::observer::IterationObserver;
use crate::solver::{VfiProblem, VfiSolution};
use crate::solving::{Execution, IterationOptions};

/// Everything needed for one value function iteration run.
///
/// `Default` reproduces the baseline parameterization: `A = 10`, `alpha = 0.5`,
/// `beta = 0.9` on 200 points over `[1, 25]`, stopping at `1e-6` or 1000 iterations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower grid bound.
    pub kmin: f64,
    /// Upper grid bound.
    pub kmax: f64,
    /// Number of grid points.
    pub precision: usize,
    /// Production scale `A`.
    pub productivity: f64,
    /// Capital-income share `alpha`.
    pub alpha: f64,
    /// Discount factor `beta`.
    pub beta: f64,
    /// Sup-norm stopping tolerance.
    pub tolerance: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Sequential or rayon-parallel Bellman updates.
    pub execution: Execution,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let iteration = IterationOptions::default();
        Self {
            kmin: 1.0,
            kmax: 25.0,
            precision: 200,
            productivity: 10.0,
            alpha: 0.5,
            beta: 0.9,
            tolerance: iteration.tolerance,
            max_iterations: iteration.max_iterations,
            execution: iteration.execution,
        }
    }
}

impl SolverConfig {
    /// Override the grid bounds and number of points.
    pub fn with_grid(mut self, kmin: f64, kmax: f64, precision: usize) -> Self {
        self.kmin = kmin;
        self.kmax = kmax;
        self.precision = precision;
        self
    }

    /// Override the economic parameters `A`, `alpha` and `beta`.
    pub fn with_parameters(mut self, productivity: f64, alpha: f64, beta: f64) -> Self {
        self.productivity = productivity;
        self.alpha = alpha;
        self.beta = beta;
        self
    }

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

    /// Select sequential or parallel Bellman updates.
    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Parses a configuration from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|source| VfiError::serialization("solver config", source))
    }

    /// Economic parameters as a validated [`GrowthModel`].
    pub fn model(&self) -> Result<GrowthModel> {
        GrowthModel::new(self.productivity, self.alpha, self.beta)
    }

    /// The state grid described by `kmin`, `kmax` and `precision`.
    pub fn grid(&self) -> Result<StateGrid> {
        StateGrid::linspace(self.kmin, self.kmax, self.precision)
    }

    /// Stopping rule and execution strategy.
    pub fn iteration_options(&self) -> IterationOptions {
        IterationOptions {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            execution: self.execution,
        }
    }

    /// Builds the problem after validating every parameter.
    pub fn problem(&self) -> Result<VfiProblem> {
        self.validate()?;
        Ok(VfiProblem::new(self.model()?, self.grid()?))
    }

    /// Rejects configurations that cannot define a model, grid or stopping rule.
    pub fn validate(&self) -> Result<()> {
        self.model()?;
        self.grid()?;
        self.iteration_options().validate()
    }
}

/// Validates `config`, then solves it while streaming iteration records to `observer`.
pub fn solve<O>(config: &SolverConfig, observer: &mut O) -> Result<VfiSolution>
where
    O: IterationObserver + ?Sized,
{
    let problem = config.problem()?;
    problem.solve_with_observer(&config.iteration_options(), observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::observer::IterationRecord;

    #[test]
    fn default_matches_baseline_parameters() {
        let config = SolverConfig::default();
        assert_eq!(config.kmin, 1.0);
        assert_eq!(config.kmax, 25.0);
        assert_eq!(config.precision, 200);
        assert_eq!(config.productivity, 10.0);
        assert_eq!(config.alpha, 0.5);
        assert_eq!(config.beta, 0.9);
        assert_eq!(config.tolerance, 1e-6);
        assert_eq!(config.max_iterations, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configurations_never_reach_the_loop() {
        let cases = [
            (
                SolverConfig::default().with_grid(1.0, 25.0, 0),
                ConfigError::EmptyGrid,
            ),
            (
                SolverConfig::default().with_parameters(10.0, 1.5, 0.9),
                ConfigError::CapitalShare { alpha: 1.5 },
            ),
            (
                SolverConfig::default().with_parameters(10.0, 0.5, 1.0),
                ConfigError::DiscountFactor { beta: 1.0 },
            ),
            (
                SolverConfig::default().with_grid(5.0, 5.0, 200),
                ConfigError::GridBounds {
                    kmin: 5.0,
                    kmax: 5.0,
                },
            ),
            (
                SolverConfig::default().with_max_iterations(0),
                ConfigError::IterationCap,
            ),
        ];

        for (config, expected) in cases {
            let mut calls = 0;
            let err = solve(&config, &mut |_: &IterationRecord| calls += 1).unwrap_err();
            assert_eq!(err.as_config_error(), Some(&expected));
            assert_eq!(calls, 0);
        }
    }

    #[test]
    fn json_overrides_keep_remaining_defaults() {
        let config =
            SolverConfig::from_json(r#"{"precision": 50, "execution": "parallel"}"#).unwrap();
        assert_eq!(config.precision, 50);
        assert_eq!(config.execution, Execution::Parallel);
        assert_eq!(config.kmax, 25.0);

        assert!(matches!(
            SolverConfig::from_json("{\"precision\": -1}"),
            Err(VfiError::Serialization { .. })
        ));
    }
}
