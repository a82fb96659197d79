//! Value function iteration for the deterministic neoclassical growth model.
//!
//! The planner chooses next-period capital `k'` from the same grid as the current
//! state `k` to solve
//!
//! ```text
//! V(k) = max_{k'} ln(A k^alpha - k') + beta V(k')
//! ```
//!
//! This crate provides
//!
//! - model primitives and closed-form benchmarks (`model` module),
//! - the discretized capital grid (`grid` module),
//! - the Bellman operator with its reusable return matrix (`bellman` module),
//! - the fixed-point loop and steady-state extraction (`solver` module), and
//! - an injected configuration struct plus the plotting hand-off (`config`, `plot`).
//!
//! # Quick start
//!
//! ```no_run
//! use vfirs::{solve, LogObserver, SolverConfig};
//!
//! let config = SolverConfig::default();
//! let solution = solve(&config, &mut LogObserver).expect("valid configuration");
//!
//! if !solution.is_converged() {
//!     eprintln!("stopped at norm {}", solution.summary.norm);
//! }
//! println!("The steady-state value of capital is {}", solution.kstar());
//! ```
//!
//! Reaching the iteration cap is reported through the returned summary rather than
//! as an error, so a best-effort policy is always available.

pub mod bellman;
pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod observer;
pub mod plot;
pub mod solver;
pub mod solving;

pub use config::{solve, SolverConfig};
pub use error::{ConfigError, Result, VfiError};
pub use grid::StateGrid;
pub use model::{GrowthModel, GrowthModelBuilder};
pub use observer::{IterationObserver, IterationRecord, LogObserver, NormHistory};
pub use plot::PolicyPlot;
pub use solver::{SteadyState, VfiProblem, VfiSolution};
pub use solving::{Execution, IterationOptions, IterationSummary};
