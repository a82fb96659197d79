use thiserror::Error;

/// Unified error type for `vfirs` operations.
#[derive(Debug, Error)]
pub enum VfiError {
    /// Raised before any iteration when the supplied parameters cannot define a model.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// Raised when arrays handed to the Bellman operator are not aligned with the grid.
    #[error("dimension mismatch in {context}: expected {expected} but found {found}")]
    DimensionMismatch {
        /// Human-readable context describing the operation.
        context: &'static str,
        /// The required dimension, usually the grid size.
        expected: usize,
        /// The dimension that was actually supplied.
        found: usize,
    },

    /// Raised when a result cannot be encoded as JSON.
    #[error("failed to serialize {context}")]
    Serialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Raised when writing output files fails.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The specific parameter that made a configuration invalid.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The capital-income share must lie strictly inside `(0, 1)`.
    #[error("capital share alpha must lie in (0, 1), found {alpha}")]
    CapitalShare { alpha: f64 },

    /// The discount factor must lie strictly inside `(0, 1)`.
    #[error("discount factor beta must lie in (0, 1), found {beta}")]
    DiscountFactor { beta: f64 },

    /// Productivity scales output and must be positive.
    #[error("productivity A must be positive and finite, found {productivity}")]
    Productivity { productivity: f64 },

    /// The grid needs at least one point.
    #[error("grid precision must be at least 1")]
    EmptyGrid,

    /// Bounds must be finite with `0 <= kmin < kmax`.
    #[error("grid bounds must satisfy 0 <= kmin < kmax, found [{kmin}, {kmax}]")]
    GridBounds { kmin: f64, kmax: f64 },

    /// The stopping tolerance must be positive.
    #[error("tolerance must be positive and finite, found {tolerance}")]
    Tolerance { tolerance: f64 },

    /// At least one iteration must be allowed.
    #[error("iteration cap must be at least 1")]
    IterationCap,
}

impl VfiError {
    /// Helper to format a [`DimensionMismatch`](VfiError::DimensionMismatch) error.
    pub fn dimension_mismatch(context: &'static str, expected: usize, found: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            found,
        }
    }

    /// Helper to wrap a JSON encoding failure.
    pub fn serialization(context: &'static str, source: serde_json::Error) -> Self {
        Self::Serialization { context, source }
    }

    /// Returns the configuration problem if this error was raised during validation.
    pub fn as_config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::InvalidConfiguration(inner) => Some(inner),
            _ => None,
        }
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, VfiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_into_invalid_configuration() {
        let err: VfiError = ConfigError::DiscountFactor { beta: 1.0 }.into();
        assert_eq!(
            err.as_config_error(),
            Some(&ConfigError::DiscountFactor { beta: 1.0 })
        );
        assert_eq!(
            err.to_string(),
            "invalid configuration: discount factor beta must lie in (0, 1), found 1"
        );
    }

    #[test]
    fn dimension_mismatch_is_not_a_config_error() {
        let err = VfiError::dimension_mismatch("value function length", 3, 2);
        assert!(err.as_config_error().is_none());
    }
}
