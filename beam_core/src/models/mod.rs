//! # Prediction Models
//!
//! Section predictors are opaque to the rest of the crate: anything that maps
//! `(fck, fy, Mu)` to a raw `(b, d, Ast)` implements [`Predictor`]. The
//! orchestrator queries every model in a [`ModelRegistry`] and corrects each
//! prediction independently.
//!
//! [`RegressionModel`] is the serializable model family loaded from disk by
//! [`crate::file_io::load_models`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use beam_core::models::{ModelRegistry, Predictor, RegressionModel};
//!
//! let mut registry = ModelRegistry::new();
//! registry.insert(
//!     "linear",
//!     Arc::new(RegressionModel::Linear {
//!         intercept: [150.0, 200.0, 100.0],
//!         coefficients: [[0.0, 0.0, 0.5], [0.0, 0.0, 2.0], [0.0, 0.0, 6.0]],
//!     }),
//! );
//!
//! let section = registry.get("linear").unwrap().predict(30.0, 415.0, 120.0).unwrap();
//! assert_eq!(section.depth_mm, 440.0);
//! ```

pub mod regression;

pub use regression::RegressionModel;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::ModelError;
use crate::section::Section;

/// A trained model that predicts a raw beam section.
///
/// Implementations must be pure and reentrant: the service calls them from
/// concurrent requests without locking.
pub trait Predictor: Send + Sync {
    /// Predict `(b, d, Ast)` for concrete grade `fck` (MPa), steel grade `fy`
    /// (MPa) and factored moment `Mu` (kN·m).
    fn predict(&self, fck_mpa: f64, fy_mpa: f64, mu_knm: f64) -> Result<Section, ModelError>;
}

impl<F> Predictor for F
where
    F: Fn(f64, f64, f64) -> Result<Section, ModelError> + Send + Sync,
{
    fn predict(&self, fck_mpa: f64, fy_mpa: f64, mu_knm: f64) -> Result<Section, ModelError> {
        self(fck_mpa, fy_mpa, mu_knm)
    }
}

/// Name-keyed collection of predictors, iterated in name order.
#[derive(Clone)]
pub struct ModelRegistry {
    models: BTreeMap<String, Arc<dyn Predictor>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        ModelRegistry {
            models: BTreeMap::new(),
        }
    }

    /// Add a model, replacing any model already registered under `name`.
    pub fn insert(&mut self, name: impl Into<String>, model: Arc<dyn Predictor>) -> Option<Arc<dyn Predictor>> {
        self.models.insert(name.into(), model)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Predictor>> {
        self.models.get(name)
    }

    /// Model names in iteration order
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Predictor>)> {
        self.models.iter().map(|(name, model)| (name.as_str(), model))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(section: Section) -> Arc<dyn Predictor> {
        Arc::new(move |_fck: f64, _fy: f64, _mu: f64| Ok::<_, ModelError>(section))
    }

    #[test]
    fn test_registry_orders_by_name() {
        let mut registry = ModelRegistry::new();
        registry.insert("random_forest", fixed(Section::new(230.0, 450.0, 900.0)));
        registry.insert("gradient_boost", fixed(Section::new(250.0, 500.0, 950.0)));
        registry.insert("knn", fixed(Section::new(240.0, 480.0, 920.0)));

        assert_eq!(registry.names(), vec!["gradient_boost", "knn", "random_forest"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut registry = ModelRegistry::new();
        assert!(registry.insert("m", fixed(Section::new(1.0, 1.0, 1.0))).is_none());
        assert!(registry.insert("m", fixed(Section::new(2.0, 2.0, 2.0))).is_some());

        let section = registry.get("m").unwrap().predict(30.0, 415.0, 120.0).unwrap();
        assert_eq!(section.width_mm, 2.0);
    }

    #[test]
    fn test_closure_predictor() {
        let model = |_fck: f64, _fy: f64, mu: f64| Ok::<_, ModelError>(Section::new(230.0, 3.0 * mu, 8.0 * mu));
        let section = model.predict(30.0, 415.0, 100.0).unwrap();
        assert_eq!(section, Section::new(230.0, 300.0, 800.0));
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = ModelRegistry::default();
        assert!(registry.is_empty());
        registry.insert("svr", fixed(Section::new(1.0, 1.0, 1.0)));
        assert!(format!("{:?}", registry).contains("svr"));
    }
}
