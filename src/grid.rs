//! Discretized capital grid shared by the state and the choice of next-period capital.

use nalgebra::DVector;
use serde::Serialize;

use crate::error::{ConfigError, Result};

/// Evenly spaced capital stocks on `[kmin, kmax]`, immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateGrid {
    points: DVector<f64>,
}

impl StateGrid {
    /// Builds `precision` evenly spaced points from `kmin` to `kmax` inclusive.
    ///
    /// A single-point grid holds only `kmin`. The last point is pinned to `kmax`
    /// so rounding in the step never moves the upper bound.
    pub fn linspace(kmin: f64, kmax: f64, precision: usize) -> Result<Self> {
        if precision == 0 {
            return Err(ConfigError::EmptyGrid.into());
        }
        if !(kmin.is_finite() && kmax.is_finite() && kmin >= 0.0 && kmin < kmax) {
            return Err(ConfigError::GridBounds { kmin, kmax }.into());
        }

        let points = if precision == 1 {
            DVector::from_element(1, kmin)
        } else {
            let step = (kmax - kmin) / (precision - 1) as f64;
            let mut points = DVector::from_fn(precision, |i, _| kmin + i as f64 * step);
            points[precision - 1] = kmax;
            points
        };

        Ok(Self { points })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the grid values.
    pub fn points(&self) -> &DVector<f64> {
        &self.points
    }

    /// Capital stock at `index`.
    pub fn point(&self, index: usize) -> f64 {
        self.points[index]
    }

    /// Smallest capital stock (`kmin`).
    pub fn lower(&self) -> f64 {
        self.points[0]
    }

    /// Largest capital stock (`kmax`).
    pub fn upper(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Distance between neighbouring points, zero for a single-point grid.
    pub fn spacing(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            0.0
        } else {
            (self.upper() - self.lower()) / (n - 1) as f64
        }
    }
}
