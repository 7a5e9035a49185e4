//! # beam_core - RCC Beam Design Engine
//!
//! `beam_core` turns regression-model predictions of a reinforced concrete
//! beam section into designs that pass IS 456 limit-state checks. All inputs
//! and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Isolated models**: One model failing never fails a request
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::corrector::correct;
//! use beam_core::section::{LoadInput, Section};
//!
//! // A model predicted 180 x 280 mm with 900 mm² of steel for 120 kN·m
//! let load = LoadInput::new(30.0, 415.0, 120.0);
//! let result = correct(Section::new(180.0, 280.0, 900.0), &load);
//!
//! // Far too small to repair locally: the width floor is still applied
//! assert!(!result.valid);
//! assert_eq!(result.section.width_mm, 200.0);
//! ```
//!
//! ## Modules
//!
//! - [`evaluator`] - Moment capacity, steel limits, cost and validity checks
//! - [`corrector`] - Local search repairing invalid predictions
//! - [`orchestrator`] - Runs all models for a request and formats results
//! - [`models`] - Predictor trait, regression models and the model registry
//! - [`file_io`] - Model files: atomic saves and directory loading
//! - [`section`] - Section and load input value types
//! - [`units`] - Unit conversions and rounding
//! - [`errors`] - Structured error types

pub mod corrector;
pub mod errors;
pub mod evaluator;
pub mod file_io;
pub mod models;
pub mod orchestrator;
pub mod section;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use corrector::{correct, correct_with, CorrectionResult, SearchConfig};
pub use errors::{DesignError, DesignResult, ModelError};
pub use evaluator::{DesignRules, StructuralEvaluator};
pub use file_io::{load_models, save_model, ModelFile};
pub use models::{ModelRegistry, Predictor, RegressionModel};
pub use orchestrator::{predict_beam_design, DesignResponse, ModelPrediction};
pub use section::{LoadInput, Section};
