//! Data handed to the plotting collaborator: the policy curve against the 45° line
//! with a vertical marker at the steady state.

use serde::Serialize;

use crate::error::{Result, VfiError};
use crate::solver::VfiSolution;

/// A labelled polyline over the shared grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Vertical line at `x` spanning `[ymin, ymax]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerticalMarker {
    pub label: String,
    pub x: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// Everything needed to render the policy figure; styling is left to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolicyPlot {
    pub title: String,
    /// Width and height in inches.
    pub figure_size: (f64, f64),
    pub curves: Vec<Curve>,
    pub markers: Vec<VerticalMarker>,
}

impl PolicyPlot {
    /// Policy curve, 45° line and a `k*` marker over `[0, 30]`.
    pub fn from_solution(solution: &VfiSolution) -> Self {
        let grid: Vec<f64> = solution.grid.points().iter().copied().collect();
        let policy: Vec<f64> = solution.policy.iter().copied().collect();

        Self {
            title: "Value Function Iteration".to_string(),
            figure_size: (10.0, 8.0),
            curves: vec![
                Curve {
                    label: "Optimal k'".to_string(),
                    x: grid.clone(),
                    y: policy,
                },
                Curve {
                    label: "45° line".to_string(),
                    x: grid.clone(),
                    y: grid,
                },
            ],
            markers: vec![VerticalMarker {
                label: "Equilibrium value k*".to_string(),
                x: solution.kstar(),
                ymin: 0.0,
                ymax: 30.0,
            }],
        }
    }

    /// Replaces the vertical extent of every marker.
    pub fn with_marker_range(mut self, ymin: f64, ymax: f64) -> Self {
        for marker in &mut self.markers {
            marker.ymin = ymin;
            marker.ymax = ymax;
        }
        self
    }

    /// Pretty-printed JSON document for the renderer.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|source| VfiError::serialization("policy plot", source))
    }
}
