//! Primitives of the deterministic growth model: Cobb-Douglas technology and log utility.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, VfiError};

/// Economic parameters of the single-agent growth model with full depreciation.
///
/// Output is `A * k^alpha`, period utility is `ln(c)`, and the planner discounts
/// the future at rate `beta`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GrowthModelParameters")]
pub struct GrowthModel {
    productivity: f64,
    capital_share: f64,
    discount: f64,
}

impl GrowthModel {
    /// Creates a `GrowthModel` from validated components.
    pub fn new(productivity: f64, capital_share: f64, discount: f64) -> Result<Self> {
        GrowthModelBuilder::new(productivity)
            .capital_share(capital_share)
            .discount(discount)
            .build()
    }

    /// Production scale `A`.
    pub fn productivity(&self) -> f64 {
        self.productivity
    }

    /// Capital-income share `alpha`.
    pub fn capital_share(&self) -> f64 {
        self.capital_share
    }

    /// Discount factor `beta`.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Output available for consumption and saving when the capital stock is `capital`.
    pub fn output(&self, capital: f64) -> f64 {
        self.productivity * capital.powf(self.capital_share)
    }

    /// Closed-form optimal savings rule `k' = alpha * beta * A * k^alpha`.
    pub fn analytic_policy(&self, capital: f64) -> f64 {
        self.capital_share * self.discount * self.output(capital)
    }

    /// Closed-form steady state `k* = (A * beta * alpha)^(1 / (1 - alpha))`.
    pub fn analytic_steady_state(&self) -> f64 {
        (self.productivity * self.discount * self.capital_share)
            .powf(1.0 / (1.0 - self.capital_share))
    }
}

/// Unvalidated wire form of [`GrowthModel`]; deserialization goes through the builder.
#[derive(Deserialize)]
struct GrowthModelParameters {
    productivity: f64,
    capital_share: f64,
    discount: f64,
}

impl TryFrom<GrowthModelParameters> for GrowthModel {
    type Error = VfiError;

    fn try_from(raw: GrowthModelParameters) -> Result<Self> {
        GrowthModel::new(raw.productivity, raw.capital_share, raw.discount)
    }
}

/// Builder that validates parameter ranges before constructing a [`GrowthModel`].
#[derive(Debug)]
pub struct GrowthModelBuilder {
    productivity: f64,
    capital_share: Option<f64>,
    discount: Option<f64>,
}

impl GrowthModelBuilder {
    /// Start building a model from its production scale.
    pub fn new(productivity: f64) -> Self {
        Self {
            productivity,
            capital_share: None,
            discount: None,
        }
    }

    /// Sets the capital-income share `alpha`.
    pub fn capital_share(mut self, alpha: f64) -> Self {
        self.capital_share = Some(alpha);
        self
    }

    /// Sets the discount factor `beta`.
    pub fn discount(mut self, beta: f64) -> Self {
        self.discount = Some(beta);
        self
    }

    /// Finalizes construction. Missing shares and discount factors are rejected as `NaN`.
    pub fn build(self) -> Result<GrowthModel> {
        if !(self.productivity.is_finite() && self.productivity > 0.0) {
            return Err(ConfigError::Productivity {
                productivity: self.productivity,
            }
            .into());
        }

        let alpha = self.capital_share.unwrap_or(f64::NAN);
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::CapitalShare { alpha }.into());
        }

        let beta = self.discount.unwrap_or(f64::NAN);
        if !(beta > 0.0 && beta < 1.0) {
            return Err(ConfigError::DiscountFactor { beta }.into());
        }

        Ok(GrowthModel {
            productivity: self.productivity,
            capital_share: alpha,
            discount: beta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VfiError;
    use approx::assert_relative_eq;

    #[test]
    fn builder_accepts_baseline_parameters() {
        let model = GrowthModelBuilder::new(10.0)
            .capital_share(0.5)
            .discount(0.9)
            .build()
            .expect("valid model");

        assert_relative_eq!(model.output(4.0), 20.0, epsilon = 1e-12);
        assert_relative_eq!(model.analytic_steady_state(), 20.25, epsilon = 1e-12);
        assert_relative_eq!(model.analytic_policy(20.25), 20.25, epsilon = 1e-12);
    }

    #[test]
    fn builder_rejects_out_of_range_parameters() {
        let share = GrowthModel::new(10.0, 1.5, 0.9);
        assert!(matches!(
            share,
            Err(VfiError::InvalidConfiguration(ConfigError::CapitalShare { .. }))
        ));

        let discount = GrowthModel::new(10.0, 0.5, 1.0);
        assert!(matches!(
            discount,
            Err(VfiError::InvalidConfiguration(ConfigError::DiscountFactor { .. }))
        ));

        let scale = GrowthModel::new(0.0, 0.5, 0.9);
        assert!(matches!(
            scale,
            Err(VfiError::InvalidConfiguration(ConfigError::Productivity { .. }))
        ));
    }

    #[test]
    fn deserialization_validates_parameters() {
        let model: GrowthModel = serde_json::from_str(
            r#"{"productivity": 10.0, "capital_share": 0.5, "discount": 0.9}"#,
        )
        .unwrap();
        assert_eq!(model, GrowthModel::new(10.0, 0.5, 0.9).unwrap());

        let share = serde_json::from_str::<GrowthModel>(
            r#"{"productivity": 10.0, "capital_share": 1.5, "discount": 0.9}"#,
        );
        let message = share.unwrap_err().to_string();
        assert!(message.contains("capital share alpha"), "{message}");

        let discount = serde_json::from_str::<GrowthModel>(
            r#"{"productivity": 10.0, "capital_share": 0.5, "discount": 1.0}"#,
        );
        assert!(discount.is_err());
    }

    #[test]
    fn builder_requires_share_and_discount() {
        let result = GrowthModelBuilder::new(10.0).discount(0.9).build();
        assert!(matches!(
            result,
            Err(VfiError::InvalidConfiguration(ConfigError::CapitalShare { .. }))
        ));
    }
}
