//! # Prediction Orchestrator
//!
//! Runs every registered model for one load input, corrects each raw
//! prediction on its own, and formats the per-model results.
//!
//! - A model that fails records `{"error": "..."}` in its slot; other models
//!   are unaffected.
//! - Corrections never share information between models.
//! - Dimensions are rounded up to whole millimetres (mm²) only in the
//!   presentation step.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "input": { "fck": 30.0, "fy": 415.0, "Mu": 120.0 },
//!   "predictions": {
//!     "gradient_boost": { "b": 245, "d": 510, "Ast": 714, "valid": true },
//!     "svr": { "error": "prediction for 'd' is not finite (NaN)" }
//!   }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use beam_core::corrector::SearchConfig;
//! use beam_core::models::{ModelRegistry, RegressionModel};
//! use beam_core::orchestrator::{predict_beam_design, ModelPrediction};
//!
//! let mut models = ModelRegistry::new();
//! models.insert("linear", Arc::new(RegressionModel::Linear {
//!     intercept: [300.0, 450.0, 1500.0],
//!     coefficients: [[0.0; 3]; 3],
//! }));
//!
//! let body = serde_json::json!({ "fck": 30, "fy": 415, "Mu": 120 });
//! let response = predict_beam_design(&body, &models, &SearchConfig::default()).unwrap();
//!
//! match &response.predictions["linear"] {
//!     ModelPrediction::Design(design) => assert_eq!(design.b, 300),
//!     ModelPrediction::Error { error } => panic!("{}", error),
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::corrector::{correct_with, CorrectionResult, SearchConfig};
use crate::errors::{DesignResult, ModelError};
use crate::evaluator::StructuralEvaluator;
use crate::models::ModelRegistry;
use crate::section::{LoadInput, Section};

/// Response body for one design request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResponse {
    /// The parsed input, echoed back
    pub input: LoadInput,

    /// Result per model name
    pub predictions: BTreeMap<String, ModelPrediction>,
}

/// One model's slot in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelPrediction {
    Design(RoundedSection),
    Error { error: String },
}

/// Corrected section rounded up for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedSection {
    /// Width (mm)
    pub b: i64,
    /// Effective depth (mm)
    pub d: i64,
    /// Tension steel (mm²)
    #[serde(rename = "Ast")]
    pub ast: i64,
    /// Whether the corrector found a section passing every check
    pub valid: bool,
}

impl From<&CorrectionResult> for RoundedSection {
    fn from(result: &CorrectionResult) -> Self {
        RoundedSection {
            b: result.section.width_mm.ceil() as i64,
            d: result.section.depth_mm.ceil() as i64,
            ast: result.section.ast_mm2.ceil() as i64,
            valid: result.valid,
        }
    }
}

/// Raw prediction and its correction for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelDesign {
    pub raw: Section,
    pub correction: CorrectionResult,
}

/// Query every model and correct each successful prediction.
///
/// Results come back in registry (name) order.
pub fn run_models(
    load: &LoadInput,
    models: &ModelRegistry,
    config: &SearchConfig,
) -> Vec<(String, Result<ModelDesign, ModelError>)> {
    models
        .iter()
        .map(|(name, model)| {
            let outcome = model
                .predict(load.fck_mpa, load.fy_mpa, load.mu_knm)
                .map(|raw| {
                    let correction = correct_with(raw, load, config, &StructuralEvaluator);
                    debug!(
                        model = name,
                        valid = correction.valid,
                        stages = correction.stages,
                        "prediction corrected"
                    );
                    if !correction.valid {
                        warn!(model = name, "no valid section near prediction; returning clamped original");
                    }
                    ModelDesign { raw, correction }
                });

            if let Err(e) = &outcome {
                warn!(model = name, error = %e, "model prediction failed");
            }

            (name.to_string(), outcome)
        })
        .collect()
}

impl DesignResponse {
    /// Build the response from outcomes already produced by [`run_models`].
    pub fn from_designs(load: &LoadInput, designs: &[(String, Result<ModelDesign, ModelError>)]) -> Self {
        let predictions = designs
            .iter()
            .map(|(name, outcome)| {
                let slot = match outcome {
                    Ok(design) => ModelPrediction::Design(RoundedSection::from(&design.correction)),
                    Err(e) => ModelPrediction::Error { error: e.to_string() },
                };
                (name.clone(), slot)
            })
            .collect();

        DesignResponse {
            input: *load,
            predictions,
        }
    }
}

/// Design for an already-parsed load input.
pub fn design_for_load(load: &LoadInput, models: &ModelRegistry, config: &SearchConfig) -> DesignResponse {
    DesignResponse::from_designs(load, &run_models(load, models, config))
}

/// Design from an untyped request body.
///
/// # Returns
///
/// * `Ok(DesignResponse)` - Every model's slot filled, with a design or an error
/// * `Err(DesignError)` - `fck`, `fy` or `Mu` missing or not numeric
pub fn predict_beam_design(body: &Value, models: &ModelRegistry, config: &SearchConfig) -> DesignResult<DesignResponse> {
    let load = LoadInput::from_json(body)?;
    Ok(design_for_load(&load, models, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DesignError;
    use crate::evaluator::is_valid;
    use crate::models::Predictor;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fixed(b: f64, d: f64, ast: f64) -> Arc<dyn Predictor> {
        Arc::new(move |_fck: f64, _fy: f64, _mu: f64| Ok::<_, ModelError>(Section::new(b, d, ast)))
    }

    fn failing() -> Arc<dyn Predictor> {
        Arc::new(|_fck: f64, _fy: f64, _mu: f64| -> Result<Section, ModelError> {
            Err(ModelError::UnsupportedInput("model not fitted".to_string()))
        })
    }

    fn registry() -> ModelRegistry {
        let mut models = ModelRegistry::new();
        models.insert("already_valid", fixed(300.0, 450.0, 1500.0));
        models.insert("needs_search", fixed(250.0, 500.0, 700.0));
        models.insert("undersized", fixed(180.0, 280.0, 900.0));
        models
    }

    fn design(response: &DesignResponse, name: &str) -> RoundedSection {
        match &response.predictions[name] {
            ModelPrediction::Design(d) => *d,
            ModelPrediction::Error { error } => panic!("{} failed: {}", name, error),
        }
    }

    #[test]
    fn test_each_model_corrected() {
        let body = json!({ "fck": 30, "fy": 415, "Mu": 120 });
        let response = predict_beam_design(&body, &registry(), &SearchConfig::default()).unwrap();

        assert_eq!(response.input, LoadInput::new(30.0, 415.0, 120.0));
        assert_eq!(response.predictions.len(), 3);

        assert_eq!(
            design(&response, "already_valid"),
            RoundedSection { b: 300, d: 450, ast: 1500, valid: true }
        );
        assert_eq!(
            design(&response, "needs_search"),
            RoundedSection { b: 245, d: 510, ast: 714, valid: true }
        );
        assert_eq!(
            design(&response, "undersized"),
            RoundedSection { b: 200, d: 280, ast: 900, valid: false }
        );
    }

    #[test]
    fn test_failed_model_isolated() {
        let mut models = registry();
        models.insert("broken", failing());

        let load = LoadInput::new(30.0, 415.0, 120.0);
        let response = design_for_load(&load, &models, &SearchConfig::default());

        assert_eq!(response.predictions.len(), 4);
        assert_eq!(
            response.predictions["broken"],
            ModelPrediction::Error {
                error: "unsupported input: model not fitted".to_string()
            }
        );
        // The other slots match a run without the failing model
        assert_eq!(design(&response, "already_valid").b, 300);
        assert!(design(&response, "needs_search").valid);
    }

    #[test]
    fn test_every_model_failing_still_succeeds() {
        let mut models = ModelRegistry::new();
        models.insert("a", failing());
        models.insert("b", failing());

        let response = predict_beam_design(&json!({ "fck": 30, "fy": 415, "Mu": 120 }), &models, &SearchConfig::default()).unwrap();
        assert!(response
            .predictions
            .values()
            .all(|p| matches!(p, ModelPrediction::Error { .. })));
    }

    #[test]
    fn test_missing_field_rejects_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut models = ModelRegistry::new();
        models.insert(
            "counted",
            Arc::new(move |_fck: f64, _fy: f64, _mu: f64| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ModelError>(Section::new(300.0, 450.0, 1500.0))
            }),
        );

        let err = predict_beam_design(&json!({ "fck": 30, "Mu": 120 }), &models, &SearchConfig::default()).unwrap_err();
        assert_eq!(err, DesignError::missing_field("fy"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rounding_is_presentation_only() {
        // Correction runs on the unrounded prediction and keeps full precision
        let load = LoadInput::new(30.0, 415.0, 120.0);
        let results = run_models(&load, &registry(), &SearchConfig::default());
        let (_, outcome) = results
            .iter()
            .find(|(name, _)| name == "needs_search")
            .unwrap();
        let model_design = outcome.as_ref().unwrap();

        let section = model_design.correction.section;
        assert!(is_valid(section.width_mm, section.depth_mm, section.ast_mm2, 30.0, 415.0, 120.0));
        assert_eq!(model_design.raw, Section::new(250.0, 500.0, 700.0));
        assert_eq!(section, Section::new(245.0, 510.0, 714.0));
    }

    #[test]
    fn test_response_built_from_single_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut models = registry();
        models.insert(
            "drifting",
            Arc::new(move |_fck: f64, _fy: f64, _mu: f64| {
                // Each call predicts a wider section than the last
                let n = counter.fetch_add(1, Ordering::SeqCst) as f64;
                Ok::<_, ModelError>(Section::new(300.0 + 10.0 * n, 450.0, 1500.0))
            }),
        );
        models.insert("broken", failing());

        let load = LoadInput::new(30.0, 415.0, 120.0);
        let designs = run_models(&load, &models, &SearchConfig::default());
        let response = DesignResponse::from_designs(&load, &designs);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.predictions.len(), designs.len());
        assert_eq!(design(&response, "drifting").b, 300);
        for (name, outcome) in &designs {
            match (outcome, &response.predictions[name.as_str()]) {
                (Ok(model_design), ModelPrediction::Design(rounded)) => {
                    assert_eq!(*rounded, RoundedSection::from(&model_design.correction));
                }
                (Err(e), ModelPrediction::Error { error }) => assert_eq!(*error, e.to_string()),
                _ => panic!("slot for {} does not match its outcome", name),
            }
        }
    }

    #[test]
    fn test_rounding_ceil() {
        let result = CorrectionResult {
            section: Section::new(230.2, 449.0, 941.01),
            valid: true,
            stages: 0,
            evaluations: 1,
        };
        assert_eq!(
            RoundedSection::from(&result),
            RoundedSection { b: 231, d: 449, ast: 942, valid: true }
        );
    }

    #[test]
    fn test_response_json_shape() {
        let mut models = registry();
        models.insert("broken", failing());
        let response = predict_beam_design(&json!({ "fck": 30, "fy": 415, "Mu": 120 }), &models, &SearchConfig::default()).unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["input"], json!({ "fck": 30.0, "fy": 415.0, "Mu": 120.0 }));
        assert_eq!(
            value["predictions"]["already_valid"],
            json!({ "b": 300, "d": 450, "Ast": 1500, "valid": true })
        );
        assert_eq!(
            value["predictions"]["broken"],
            json!({ "error": "unsupported input: model not fitted" })
        );

        let roundtrip: DesignResponse = serde_json::from_value(value).unwrap();
        assert_eq!(roundtrip, response);
    }
}
