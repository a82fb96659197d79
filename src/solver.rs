//! Value function iteration: the fixed-point loop and steady-state extraction.

use std::time::Instant;

use nalgebra::DVector;
use serde::Serialize;

use crate::bellman::{first_argmin, sup_norm, BellmanOperator};
use crate::error::{Result, VfiError};
use crate::grid::StateGrid;
use crate::model::GrowthModel;
use crate::observer::{IterationObserver, IterationRecord, LogObserver};
use crate::solving::{IterationOptions, IterationSummary};

/// Norm assumed before the first update; a tolerance at or above it skips iteration.
pub const INITIAL_NORM: f64 = 1e5;

/// A growth model paired with the grid on which its Bellman equation is solved.
#[derive(Clone, Debug)]
pub struct VfiProblem {
    model: GrowthModel,
    grid: StateGrid,
}

impl VfiProblem {
    /// Constructs a new value function iteration problem.
    pub fn new(model: GrowthModel, grid: StateGrid) -> Self {
        Self { model, grid }
    }

    /// Accessor for the economic parameters.
    pub fn model(&self) -> &GrowthModel {
        &self.model
    }

    /// Accessor for the state grid.
    pub fn grid(&self) -> &StateGrid {
        &self.grid
    }

    /// Iterates to the fixed point, reporting progress through the `log` facade.
    pub fn solve(&self, options: &IterationOptions) -> Result<VfiSolution> {
        self.solve_with_observer(options, &mut LogObserver)
    }

    /// Iterates `V <- T V` from `V = 1` until the sup-norm change drops to the
    /// tolerance or the iteration cap is reached.
    ///
    /// Hitting the cap is not an error; inspect [`IterationSummary::converged`].
    pub fn solve_with_observer<O>(
        &self,
        options: &IterationOptions,
        observer: &mut O,
    ) -> Result<VfiSolution>
    where
        O: IterationObserver + ?Sized,
    {
        options.validate()?;

        let n = self.grid.len();
        log::debug!(
            "starting value function iteration on {} grid points (tol {}, max {} iterations, {:?})",
            n,
            options.tolerance,
            options.max_iterations,
            options.execution
        );

        let started = Instant::now();
        let mut operator = BellmanOperator::new(&self.model, &self.grid, options.execution);
        let mut value = DVector::from_element(n, 1.0);
        let mut policy = self.grid.points().clone();
        let mut policy_indices: Vec<usize> = (0..n).collect();
        let mut norm = INITIAL_NORM;
        let mut iterations = 0usize;

        while iterations < options.max_iterations && norm > options.tolerance {
            let update = operator.apply(&value)?;
            norm = sup_norm(&update.value, &value)?;
            value = update.value;
            policy = update.policy;
            policy_indices = update.policy_indices;

            iterations += 1;
            observer.on_iteration(&IterationRecord {
                iteration: iterations,
                norm,
            });
        }

        let converged = norm <= options.tolerance;
        if !converged {
            log::warn!(
                "stopped after {} iterations with norm {} above tolerance {}",
                iterations,
                norm,
                options.tolerance
            );
        }

        let steady_state = steady_state(&self.grid, &policy)?;
        let summary = IterationSummary {
            iterations,
            norm,
            converged,
            elapsed: started.elapsed(),
        };
        log::debug!(
            "steady state k* = {} after {} iterations ({:?})",
            steady_state.capital,
            iterations,
            summary.elapsed
        );

        Ok(VfiSolution {
            grid: self.grid.clone(),
            policy,
            policy_indices,
            value,
            steady_state,
            summary,
        })
    }
}

/// Grid point whose policy choice lies closest to itself.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SteadyState {
    /// Grid index of the steady state.
    pub index: usize,
    /// Capital stock `k*` at that index.
    pub capital: f64,
    /// `|g(k*) - k*|`, the smallest such gap over the grid.
    pub gap: f64,
}

/// Locates the discrete fixed point `g(k) = k`, preferring the lowest index on ties.
pub fn steady_state(grid: &StateGrid, policy: &DVector<f64>) -> Result<SteadyState> {
    if policy.len() != grid.len() {
        return Err(VfiError::dimension_mismatch(
            "policy length",
            grid.len(),
            policy.len(),
        ));
    }

    let (index, gap) = first_argmin(
        policy
            .iter()
            .zip(grid.points().iter())
            .map(|(choice, capital)| (choice - capital).abs()),
    );
    Ok(SteadyState {
        index,
        capital: grid.point(index),
        gap,
    })
}

/// Converged value and policy functions with their diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct VfiSolution {
    /// Grid shared by the state and the choice.
    pub grid: StateGrid,
    /// Optimal next-period capital at every grid point.
    pub policy: DVector<f64>,
    /// Grid index of each policy choice.
    pub policy_indices: Vec<usize>,
    /// Value function at every grid point.
    pub value: DVector<f64>,
    /// Discrete steady state of the policy.
    pub steady_state: SteadyState,
    /// Iteration count, final norm and timing.
    pub summary: IterationSummary,
}

impl VfiSolution {
    /// Steady-state capital `k*`.
    pub fn kstar(&self) -> f64 {
        self.steady_state.capital
    }

    /// Whether the loop met the tolerance before the cap.
    pub fn is_converged(&self) -> bool {
        self.summary.converged
    }
}
