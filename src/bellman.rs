//! The Bellman operator on the discretized growth model: return-matrix construction and
//! the per-state maximization over next-period capital.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::error::{Result, VfiError};
use crate::grid::StateGrid;
use crate::model::GrowthModel;
use crate::solving::Execution;

/// Result of a single Bellman update `T V`.
#[derive(Clone, Debug, PartialEq)]
pub struct BellmanUpdate {
    /// Grid index of the maximizing choice for each state.
    pub policy_indices: Vec<usize>,
    /// Next-period capital chosen in each state (grid values).
    pub policy: DVector<f64>,
    /// Maximized right-hand side of the Bellman equation for each state.
    pub value: DVector<f64>,
}

/// Applies the Bellman operator repeatedly while reusing one `precision x precision` buffer.
///
/// Entry `[i, j]` of the return matrix holds `ln(A k_i^alpha - k_j) + beta V[j]` when
/// consumption is positive and negative infinity otherwise.
#[derive(Clone, Debug)]
pub struct BellmanOperator<'a> {
    model: &'a GrowthModel,
    grid: &'a StateGrid,
    execution: Execution,
    output: DVector<f64>,
    returns: DMatrix<f64>,
}

impl<'a> BellmanOperator<'a> {
    /// Allocates the return matrix and caches output `A k^alpha` at every grid point.
    pub fn new(model: &'a GrowthModel, grid: &'a StateGrid, execution: Execution) -> Self {
        let n = grid.len();
        let output = grid.points().map(|capital| model.output(capital));
        Self {
            model,
            grid,
            execution,
            output,
            returns: DMatrix::zeros(n, n),
        }
    }

    /// Return matrix produced by the most recent call to [`apply`](Self::apply).
    pub fn returns(&self) -> &DMatrix<f64> {
        &self.returns
    }

    /// Computes `T V` for the continuation values `value`, indexed like the grid.
    pub fn apply(&mut self, value: &DVector<f64>) -> Result<BellmanUpdate> {
        let n = self.grid.len();
        if value.len() != n {
            return Err(VfiError::dimension_mismatch(
                "value function length",
                n,
                value.len(),
            ));
        }

        self.fill_returns(value);
        maximize_rows(&self.returns, self.grid, self.execution)
    }

    fn fill_returns(&mut self, value: &DVector<f64>) {
        let n = self.grid.len();
        let beta = self.model.discount();
        let grid = self.grid.points();
        let output = &self.output;

        // Storage is column-major, so each chunk is one choice `j` across all states.
        let fill_column = |(choice, column): (usize, &mut [f64])| {
            let next_capital = grid[choice];
            let continuation = beta * value[choice];
            for (state, entry) in column.iter_mut().enumerate() {
                *entry = bellman_entry(output[state], next_capital, continuation);
            }
        };

        let buffer = self.returns.as_mut_slice();
        match self.execution {
            Execution::Sequential => buffer.chunks_mut(n).enumerate().for_each(fill_column),
            Execution::Parallel => buffer.par_chunks_mut(n).enumerate().for_each(fill_column),
        }
    }
}

#[inline]
fn bellman_entry(output: f64, next_capital: f64, continuation: f64) -> f64 {
    let consumption = output - next_capital;
    if consumption > 0.0 {
        consumption.ln() + continuation
    } else {
        f64::NEG_INFINITY
    }
}

/// Maximizes every row of `returns` over the choice axis.
///
/// Ties resolve to the smallest choice index. A row with no feasible choice yields
/// index 0 and value negative infinity.
pub fn maximize_rows(
    returns: &DMatrix<f64>,
    grid: &StateGrid,
    execution: Execution,
) -> Result<BellmanUpdate> {
    let n = grid.len();
    if returns.nrows() != n {
        return Err(VfiError::dimension_mismatch(
            "return matrix rows",
            n,
            returns.nrows(),
        ));
    }
    if returns.ncols() != n {
        return Err(VfiError::dimension_mismatch(
            "return matrix columns",
            n,
            returns.ncols(),
        ));
    }

    let best = |state: usize| first_argmax(returns.row(state).iter().copied());
    let maxima: Vec<(usize, f64)> = match execution {
        Execution::Sequential => (0..n).map(best).collect(),
        Execution::Parallel => (0..n).into_par_iter().map(best).collect(),
    };

    let policy = DVector::from_iterator(n, maxima.iter().map(|&(choice, _)| grid.point(choice)));
    let value = DVector::from_iterator(n, maxima.iter().map(|&(_, best)| best));
    let policy_indices = maxima.into_iter().map(|(choice, _)| choice).collect();

    Ok(BellmanUpdate {
        policy_indices,
        policy,
        value,
    })
}

/// First-occurrence arg-max. An empty sequence returns `(0, -inf)`.
pub fn first_argmax<I>(values: I) -> (usize, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut best = (0, f64::NEG_INFINITY);
    for (index, value) in values.into_iter().enumerate() {
        if index == 0 || value > best.1 {
            best = (index, value);
        }
    }
    best
}

/// First-occurrence arg-min. An empty sequence returns `(0, +inf)`.
pub fn first_argmin<I>(values: I) -> (usize, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut best = (0, f64::INFINITY);
    for (index, value) in values.into_iter().enumerate() {
        if index == 0 || value < best.1 {
            best = (index, value);
        }
    }
    best
}

/// Sup-norm `max_i |a_i - b_i|`.
///
/// Entries that are equal, including matching infinities from infeasible states,
/// contribute zero rather than `NaN`.
pub fn sup_norm(a: &DVector<f64>, b: &DVector<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(VfiError::dimension_mismatch("sup-norm operands", a.len(), b.len()));
    }
    Ok(a.iter().zip(b.iter()).fold(0.0_f64, |norm, (x, y)| {
        let gap = if x == y { 0.0 } else { (x - y).abs() };
        norm.max(gap)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn baseline_model() -> GrowthModel {
        GrowthModel::new(10.0, 0.5, 0.9).unwrap()
    }

    #[test]
    fn infeasible_choices_are_negative_infinity() {
        let model = baseline_model();
        let grid = StateGrid::linspace(1.0, 25.0, 40).unwrap();
        let value = DVector::from_element(grid.len(), 1.0);
        let mut operator = BellmanOperator::new(&model, &grid, Execution::Sequential);
        operator.apply(&value).unwrap();

        let returns = operator.returns();
        let mut infeasible = 0;
        for i in 0..grid.len() {
            for j in 0..grid.len() {
                let output = model.output(grid.point(i));
                if output <= grid.point(j) {
                    assert_eq!(returns[(i, j)], f64::NEG_INFINITY);
                    infeasible += 1;
                } else {
                    let expected = (output - grid.point(j)).ln() + 0.9 * value[j];
                    assert_relative_eq!(returns[(i, j)], expected, epsilon = 1e-12);
                }
            }
        }
        // Output at k = 1 is 10, so choices above 10 are infeasible in the first row.
        assert!(infeasible > 0);
    }

    #[test]
    fn continuation_is_indexed_by_choice() {
        let model = baseline_model();
        let grid = StateGrid::linspace(1.0, 3.0, 3).unwrap();
        let value = DVector::from_vec(vec![0.0, 10.0, 0.0]);
        let mut operator = BellmanOperator::new(&model, &grid, Execution::Sequential);
        let update = operator.apply(&value).unwrap();

        // A large continuation at the middle choice dominates in every state.
        assert_eq!(update.policy_indices, vec![1, 1, 1]);
        assert_eq!(update.policy, DVector::from_element(3, 2.0));
        let expected_first = (10.0_f64 - 2.0).ln() + 9.0;
        assert_relative_eq!(update.value[0], expected_first, epsilon = 1e-12);
    }

    #[test]
    fn first_argmax_breaks_ties_toward_lower_index() {
        assert_eq!(first_argmax(vec![1.0, 3.0, 3.0, 2.0]), (1, 3.0));
        assert_eq!(
            first_argmax(vec![f64::NEG_INFINITY, f64::NEG_INFINITY]),
            (0, f64::NEG_INFINITY)
        );
        assert_eq!(first_argmax(Vec::new()), (0, f64::NEG_INFINITY));
        assert_eq!(first_argmin(vec![2.0, 0.5, 0.5]), (1, 0.5));
    }

    #[test]
    fn tied_rows_resolve_deterministically() {
        let grid = StateGrid::linspace(1.0, 4.0, 4).unwrap();
        let returns = DMatrix::from_row_slice(
            4,
            4,
            &[
                0.5, 2.0, 2.0, 1.0, //
                3.0, 3.0, 3.0, 3.0, //
                f64::NEG_INFINITY, 1.0, 0.0, 1.0, //
                0.0, 0.0, 0.0, 7.0,
            ],
        );

        for execution in [Execution::Sequential, Execution::Parallel] {
            for _ in 0..5 {
                let update = maximize_rows(&returns, &grid, execution).unwrap();
                assert_eq!(update.policy_indices, vec![1, 0, 1, 3]);
                assert_eq!(update.policy, DVector::from_vec(vec![2.0, 1.0, 2.0, 4.0]));
                assert_eq!(update.value, DVector::from_vec(vec![2.0, 3.0, 1.0, 7.0]));
            }
        }
    }

    #[test]
    fn all_infeasible_row_selects_first_choice() {
        let model = baseline_model();
        // Zero capital produces zero output, so no choice leaves positive consumption.
        let grid = StateGrid::linspace(0.0, 4.0, 9).unwrap();
        let value = DVector::from_element(grid.len(), 1.0);
        let mut operator = BellmanOperator::new(&model, &grid, Execution::Sequential);
        let update = operator.apply(&value).unwrap();

        assert!(operator
            .returns()
            .row(0)
            .iter()
            .all(|entry| *entry == f64::NEG_INFINITY));
        assert_eq!(update.policy_indices[0], 0);
        assert_eq!(update.policy[0], 0.0);
        assert_eq!(update.value[0], f64::NEG_INFINITY);
        assert!(update.value.iter().skip(1).all(|v| v.is_finite()));
    }

    #[test]
    fn parallel_update_matches_sequential_bitwise() {
        let model = baseline_model();
        let grid = StateGrid::linspace(1.0, 25.0, 64).unwrap();
        let mut rng = SmallRng::seed_from_u64(17);
        let mut sequential = BellmanOperator::new(&model, &grid, Execution::Sequential);
        let mut parallel = BellmanOperator::new(&model, &grid, Execution::Parallel);

        for _ in 0..8 {
            let value = DVector::from_fn(grid.len(), |_, _| rng.gen_range(-5.0..5.0));
            let a = sequential.apply(&value).unwrap();
            let b = parallel.apply(&value).unwrap();
            assert_eq!(a, b);
            assert_eq!(sequential.returns(), parallel.returns());
        }
    }

    #[test]
    fn apply_rejects_misaligned_value_function() {
        let model = baseline_model();
        let grid = StateGrid::linspace(1.0, 25.0, 10).unwrap();
        let mut operator = BellmanOperator::new(&model, &grid, Execution::Sequential);
        let result = operator.apply(&DVector::from_element(9, 1.0));
        assert!(matches!(
            result,
            Err(VfiError::DimensionMismatch {
                expected: 10,
                found: 9,
                ..
            })
        ));
    }

    #[test]
    fn sup_norm_ignores_matching_infinities() {
        let a = DVector::from_vec(vec![f64::NEG_INFINITY, 1.0, 2.0]);
        let b = DVector::from_vec(vec![f64::NEG_INFINITY, 1.5, 1.75]);
        assert_eq!(sup_norm(&a, &b).unwrap(), 0.5);

        let c = DVector::from_vec(vec![1.0, 1.0, 2.0]);
        assert_eq!(sup_norm(&a, &c).unwrap(), f64::INFINITY);
        assert!(sup_norm(&a, &DVector::from_element(2, 0.0)).is_err());
    }
}
