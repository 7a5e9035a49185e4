//! # Model Files
//!
//! Trained models live in a directory of `.json` files, one model per file,
//! named after the file stem (`random_forest.json` registers `random_forest`).
//!
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent half-written models
//! - **Version validation**: Model files carry a schema version
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "description": "Linear fit on 2,400 IS 456 designs",
//!   "model": { "kind": "linear", "intercept": [...], "coefficients": [...] }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::file_io::load_models;
//! use std::path::Path;
//!
//! let registry = load_models(Path::new("saved_models"))?;
//! println!("Loaded: {:?}", registry.names());
//! # Ok::<(), beam_core::errors::DesignError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{DesignError, DesignResult};
use crate::models::{ModelRegistry, RegressionModel};

/// Current model file schema version
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Extension of model files inside a model directory
pub const MODEL_EXTENSION: &str = "json";

/// On-disk wrapper around a [`RegressionModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    /// Schema version the file was written with
    pub version: String,

    /// Free-form notes (training data, fit quality)
    #[serde(default)]
    pub description: String,

    pub model: RegressionModel,
}

impl ModelFile {
    pub fn new(model: RegressionModel) -> Self {
        ModelFile {
            version: SCHEMA_VERSION.to_string(),
            description: String::new(),
            model,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Save a model file with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.tmp` and fsync
/// 3. Rename over `path`
pub fn save_model(model: &ModelFile, path: &Path) -> DesignResult<()> {
    let json = serde_json::to_string_pretty(model)?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        DesignError::model_load(tmp_path.display().to_string(), format!("create temp file: {}", e))
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        DesignError::model_load(tmp_path.display().to_string(), format!("write temp file: {}", e))
    })?;

    tmp_file.sync_all().map_err(|e| {
        DesignError::model_load(tmp_path.display().to_string(), format!("sync temp file: {}", e))
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DesignError::model_load(path.display().to_string(), format!("rename to final: {}", e))
    })?;

    Ok(())
}

/// Load a single model file.
///
/// # Returns
///
/// * `Ok(ModelFile)` - Parsed model with a compatible version
/// * `Err(DesignError::ModelLoad)` - I/O error, invalid JSON or incompatible version
pub fn load_model(path: &Path) -> DesignResult<ModelFile> {
    let mut file = File::open(path)
        .map_err(|e| DesignError::model_load(path.display().to_string(), format!("open: {}", e)))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| DesignError::model_load(path.display().to_string(), format!("read: {}", e)))?;

    let model: ModelFile = serde_json::from_str(&contents)
        .map_err(|e| DesignError::model_load(path.display().to_string(), format!("invalid JSON: {}", e)))?;

    if !is_compatible_version(&model.version) {
        return Err(DesignError::model_load(
            path.display().to_string(),
            format!("version {} is incompatible with {}", model.version, SCHEMA_VERSION),
        ));
    }

    Ok(model)
}

/// Load every model file in `dir` into a registry.
///
/// # Returns
///
/// * `Ok(ModelRegistry)` - At least one model loaded
/// * `Err(DesignError::ModelLoad)` - Directory missing, unreadable, empty of
///   models, or any model file fails to load
pub fn load_models(dir: &Path) -> DesignResult<ModelRegistry> {
    if !dir.is_dir() {
        return Err(DesignError::model_load(
            dir.display().to_string(),
            "Model directory not found",
        ));
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| DesignError::model_load(dir.display().to_string(), format!("read directory: {}", e)))?;

    let mut paths: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == MODEL_EXTENSION))
        .collect();
    paths.sort();

    let mut registry = ModelRegistry::new();
    for path in paths {
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let model = load_model(&path)?;
        debug!(model = %name, path = %path.display(), "model file loaded");
        registry.insert(name, Arc::new(model.model));
    }

    if registry.is_empty() {
        return Err(DesignError::model_load(
            dir.display().to_string(),
            "No models found in model directory",
        ));
    }

    info!(models = ?registry.names(), "Models loaded");
    Ok(registry)
}

/// Major version must match; on 0.x the file's minor may not be newer.
fn is_compatible_version(file_version: &str) -> bool {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return false;
    }

    if file_parts[0] != current_parts[0] {
        return false;
    }

    if current_parts[0] == 0 && file_parts.len() > 1 && current_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return false;
    }

    true
}
