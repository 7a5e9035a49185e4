//! # Error Types
//!
//! Structured error types for beam_core. Request-level failures (bad input,
//! model directory problems) are [`DesignError`]s. A single model failing to
//! predict is a [`ModelError`]; the orchestrator records it against that model
//! instead of failing the whole request.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{DesignError, DesignResult};
//!
//! fn validate_moment(mu_knm: f64) -> DesignResult<()> {
//!     if mu_knm <= 0.0 {
//!         return Err(DesignError::invalid_input(
//!             "Mu",
//!             mu_knm.to_string(),
//!             "Design moment must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_moment(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Structured error type for design requests.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignError {
    /// An input value is present but unusable (non-numeric, non-finite)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required input: {field}")]
    MissingField { field: String },

    /// Models could not be loaded from disk
    #[error("Model loading failed for '{path}': {reason}")]
    ModelLoad { path: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Configuration value could not be used
    #[error("Invalid configuration '{key}': {reason}")]
    Config { key: String, reason: String },
}

impl DesignError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        DesignError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ModelLoad error
    pub fn model_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a Config error
    pub fn config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        DesignError::Config {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's request rather than the service
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DesignError::InvalidInput { .. }
                | DesignError::MissingField { .. }
                | DesignError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DesignError::InvalidInput { .. } => "INVALID_INPUT",
            DesignError::MissingField { .. } => "MISSING_FIELD",
            DesignError::ModelLoad { .. } => "MODEL_LOAD",
            DesignError::SerializationError { .. } => "SERIALIZATION_ERROR",
            DesignError::Config { .. } => "CONFIG_ERROR",
        }
    }
}

impl From<serde_json::Error> for DesignError {
    fn from(e: serde_json::Error) -> Self {
        DesignError::SerializationError {
            reason: e.to_string(),
        }
    }
}

/// Failure of a single model's prediction call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The model produced NaN or infinity for one of its outputs
    #[error("prediction for '{output}' is not finite ({value})")]
    NonFinite { output: &'static str, value: f64 },

    /// The model was asked to predict from inputs it cannot handle
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DesignError::invalid_input("fck", "abc", "Must be a number");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: DesignError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DesignError::missing_field("Mu").error_code(), "MISSING_FIELD");
        assert_eq!(DesignError::model_load("saved_models", "empty").error_code(), "MODEL_LOAD");
    }

    #[test]
    fn test_missing_field_message() {
        let error = DesignError::missing_field("fy");
        assert_eq!(error.to_string(), "Missing required input: fy");
        assert!(error.is_input_error());
        assert!(!DesignError::model_load("x", "y").is_input_error());
    }

    #[test]
    fn test_model_error_message() {
        let error = ModelError::NonFinite { output: "d", value: f64::NAN };
        assert!(error.to_string().contains("'d'"));
    }
}
