//! Serializable regression models.
//!
//! Each model maps the feature vector `x = [fck, fy, Mu]` to the three outputs
//! `[b, d, Ast]` independently.
//!
//! ## JSON
//!
//! ```json
//! { "kind": "linear",
//!   "intercept": [150.0, 200.0, 100.0],
//!   "coefficients": [[0.0, 0.0, 0.5], [0.0, 0.0, 2.0], [0.0, 0.0, 6.0]] }
//!
//! { "kind": "power_law",
//!   "scale": [230.0, 40.0, 12.0],
//!   "exponents": [[0.0, 0.0, 0.0], [-0.1, 0.0, 0.5], [-0.2, 0.1, 0.8]] }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::models::Predictor;
use crate::section::Section;

const OUTPUT_NAMES: [&str; 3] = ["b", "d", "Ast"];

/// Regression model families that can be stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressionModel {
    /// `y_i = intercept_i + sum_j coefficients[i][j] * x_j`
    Linear {
        intercept: [f64; 3],
        coefficients: [[f64; 3]; 3],
    },

    /// `y_i = scale_i * fck^e[i][0] * fy^e[i][1] * Mu^e[i][2]`
    ///
    /// A linear fit in log space. Inputs must be positive.
    PowerLaw {
        scale: [f64; 3],
        exponents: [[f64; 3]; 3],
    },
}

impl RegressionModel {
    fn outputs(&self, x: [f64; 3]) -> Result<[f64; 3], ModelError> {
        let mut y = [0.0; 3];
        match self {
            RegressionModel::Linear {
                intercept,
                coefficients,
            } => {
                for (i, out) in y.iter_mut().enumerate() {
                    *out = intercept[i]
                        + coefficients[i]
                            .iter()
                            .zip(x.iter())
                            .map(|(c, xj)| c * xj)
                            .sum::<f64>();
                }
            }
            RegressionModel::PowerLaw { scale, exponents } => {
                if let Some(bad) = x.iter().find(|v| **v <= 0.0) {
                    return Err(ModelError::UnsupportedInput(format!(
                        "power-law model needs positive inputs, got {}",
                        bad
                    )));
                }
                for (i, out) in y.iter_mut().enumerate() {
                    *out = scale[i]
                        * exponents[i]
                            .iter()
                            .zip(x.iter())
                            .map(|(e, xj)| xj.powf(*e))
                            .product::<f64>();
                }
            }
        }
        Ok(y)
    }
}

impl Predictor for RegressionModel {
    fn predict(&self, fck_mpa: f64, fy_mpa: f64, mu_knm: f64) -> Result<Section, ModelError> {
        let y = self.outputs([fck_mpa, fy_mpa, mu_knm])?;
        for (value, output) in y.iter().zip(OUTPUT_NAMES) {
            if !value.is_finite() {
                return Err(ModelError::NonFinite {
                    output,
                    value: *value,
                });
            }
        }
        Ok(Section::from(y))
    }
}
