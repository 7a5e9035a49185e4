//! # Sections and Load Inputs
//!
//! The two value types every design operation works on:
//!
//! - [`Section`] - a rectangular singly-reinforced beam section (b, d, Ast)
//! - [`LoadInput`] - material grades and factored moment demand (fck, fy, Mu)
//!
//! Both serialize with their textbook symbols as JSON keys.
//!
//! ## JSON Example
//!
//! ```rust
//! use beam_core::section::{LoadInput, Section};
//!
//! let load: LoadInput = serde_json::from_str(r#"{"fck": 30, "fy": 415, "Mu": 120}"#).unwrap();
//! assert_eq!(load.mu_knm, 120.0);
//!
//! let section = Section::new(230.0, 450.0, 942.0);
//! let json = serde_json::to_string(&section).unwrap();
//! assert!(json.contains("\"Ast\":942.0"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DesignError, DesignResult};

/// Rectangular beam section.
///
/// Sections are values: the corrector never mutates one, it builds new
/// candidates from perturbed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Width b (mm)
    #[serde(rename = "b")]
    pub width_mm: f64,

    /// Effective depth d (mm)
    #[serde(rename = "d")]
    pub depth_mm: f64,

    /// Area of tension reinforcement Ast (mm²)
    #[serde(rename = "Ast")]
    pub ast_mm2: f64,
}

impl Section {
    pub fn new(width_mm: f64, depth_mm: f64, ast_mm2: f64) -> Self {
        Section {
            width_mm,
            depth_mm,
            ast_mm2,
        }
    }

    /// Same section with the width raised to at least `min_width_mm`
    pub fn with_min_width(self, min_width_mm: f64) -> Self {
        Section {
            width_mm: self.width_mm.max(min_width_mm),
            ..self
        }
    }
}

impl From<[f64; 3]> for Section {
    fn from(dims: [f64; 3]) -> Self {
        Section::new(dims[0], dims[1], dims[2])
    }
}

/// Design inputs for one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadInput {
    /// Characteristic compressive strength of concrete fck (MPa)
    #[serde(rename = "fck")]
    pub fck_mpa: f64,

    /// Yield strength of reinforcement fy (MPa)
    #[serde(rename = "fy")]
    pub fy_mpa: f64,

    /// Factored design moment Mu (kN·m)
    #[serde(rename = "Mu")]
    pub mu_knm: f64,
}

/// Request keys in the order they are checked
pub const REQUIRED_FIELDS: [&str; 3] = ["fck", "fy", "Mu"];

impl LoadInput {
    pub fn new(fck_mpa: f64, fy_mpa: f64, mu_knm: f64) -> Self {
        LoadInput {
            fck_mpa,
            fy_mpa,
            mu_knm,
        }
    }

    /// Extract a load input from an untyped JSON request body.
    ///
    /// Each required key must be present and hold a number or a numeric
    /// string. The first missing key is reported.
    ///
    /// ```rust
    /// use beam_core::section::LoadInput;
    /// use beam_core::errors::DesignError;
    ///
    /// let body = serde_json::json!({ "fck": "25", "fy": 500, "Mu": 80.5 });
    /// let load = LoadInput::from_json(&body).unwrap();
    /// assert_eq!(load.fck_mpa, 25.0);
    ///
    /// let missing = serde_json::json!({ "fck": 25, "Mu": 80.5 });
    /// assert_eq!(LoadInput::from_json(&missing), Err(DesignError::missing_field("fy")));
    /// ```
    pub fn from_json(body: &Value) -> DesignResult<Self> {
        let object = body.as_object().ok_or_else(|| {
            DesignError::invalid_input("body", body.to_string(), "Request body must be a JSON object")
        })?;

        for key in REQUIRED_FIELDS {
            if !object.contains_key(key) {
                return Err(DesignError::missing_field(key));
            }
        }

        Ok(LoadInput {
            fck_mpa: numeric_field(object, "fck")?,
            fy_mpa: numeric_field(object, "fy")?,
            mu_knm: numeric_field(object, "Mu")?,
        })
    }
}

fn numeric_field(object: &serde_json::Map<String, Value>, key: &str) -> DesignResult<f64> {
    let value = object
        .get(key)
        .ok_or_else(|| DesignError::missing_field(key))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DesignError::invalid_input(
            key,
            value.to_string(),
            "Must be a finite number",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_numbers() {
        let load = LoadInput::from_json(&json!({ "fck": 30, "fy": 415, "Mu": 120 })).unwrap();
        assert_eq!(load, LoadInput::new(30.0, 415.0, 120.0));
    }

    #[test]
    fn test_from_json_numeric_strings() {
        let load = LoadInput::from_json(&json!({ "fck": " 20 ", "fy": "500", "Mu": "95.5" })).unwrap();
        assert_eq!(load.fck_mpa, 20.0);
        assert_eq!(load.mu_knm, 95.5);
    }

    #[test]
    fn test_from_json_reports_first_missing_key() {
        let err = LoadInput::from_json(&json!({ "Mu": 10 })).unwrap_err();
        assert_eq!(err, DesignError::missing_field("fck"));

        let err = LoadInput::from_json(&json!({ "fck": 30, "fy": 415 })).unwrap_err();
        assert_eq!(err, DesignError::missing_field("Mu"));
    }

    #[test]
    fn test_from_json_rejects_non_numeric() {
        let err = LoadInput::from_json(&json!({ "fck": 30, "fy": "high", "Mu": 120 })).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = LoadInput::from_json(&json!({ "fck": null, "fy": 415, "Mu": 120 })).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = LoadInput::from_json(&json!({ "fck": "NaN", "fy": 415, "Mu": 120 })).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = LoadInput::from_json(&json!([30, 415, 120])).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_section_serialization_keys() {
        let json = serde_json::to_value(Section::new(230.0, 400.0, 804.0)).unwrap();
        assert_eq!(json, json!({ "b": 230.0, "d": 400.0, "Ast": 804.0 }));
    }

    #[test]
    fn test_with_min_width() {
        let s = Section::new(180.0, 280.0, 900.0).with_min_width(200.0);
        assert_eq!(s, Section::new(200.0, 280.0, 900.0));

        let s = Section::new(250.0, 280.0, 900.0).with_min_width(200.0);
        assert_eq!(s.width_mm, 250.0);
    }
}
