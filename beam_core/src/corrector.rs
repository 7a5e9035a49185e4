//! # Design Corrector
//!
//! Repairs a model's raw section prediction so that it passes the structural
//! checks, preferring the cheapest nearby section.
//!
//! ## Search
//!
//! Starting from the raw `(b, d, Ast)`, each stage perturbs every dimension by
//! a fraction `p` of its own value, so stage `p` visits the 27 sections
//! `(b ± {0, bp}) x (d ± {0, dp}) x (Ast ± {0, Ast p})`. Stages grow from
//! `step_percent` to `max_step_percent` in `step_percent` increments.
//!
//! - Candidates narrower than the minimum width are skipped.
//! - The cheapest valid candidate wins; equal costs keep the earlier one.
//! - The whole stage is swept before stopping, so the first stage with any
//!   valid candidate returns its cheapest, not its first.
//! - If no stage succeeds the raw section is returned with `valid = false`.
//!
//! The width floor is applied to whatever section is returned.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::corrector::correct;
//! use beam_core::section::{LoadInput, Section};
//!
//! let load = LoadInput::new(30.0, 415.0, 120.0);
//! let result = correct(Section::new(250.0, 500.0, 700.0), &load);
//!
//! assert!(result.valid);
//! assert!(result.section.width_mm >= 200.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DesignError, DesignResult};
use crate::evaluator::{DesignRules, StructuralEvaluator};
use crate::section::{LoadInput, Section};

/// Smallest constructible beam width (mm)
pub const MIN_WIDTH_MM: f64 = 200.0;

/// Upper bound on `max_step_percent / step_percent` accepted by [`SearchConfig::validate`]
pub const MAX_STAGES: usize = 10_000;

/// Perturbation signs per dimension, in sweep order
const SIGNS: [f64; 3] = [-1.0, 0.0, 1.0];

/// Search parameters.
///
/// ## JSON Example
///
/// ```json
/// { "step_percent": 0.01, "max_step_percent": 0.2, "min_width_mm": 200.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// First perturbation fraction and the increment between stages
    pub step_percent: f64,

    /// Largest perturbation fraction searched (inclusive)
    pub max_step_percent: f64,

    /// Width floor for candidates and for the returned section (mm)
    pub min_width_mm: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            step_percent: 0.01,
            max_step_percent: 0.20,
            min_width_mm: MIN_WIDTH_MM,
        }
    }
}

impl SearchConfig {
    /// Number of stages the search may run.
    ///
    /// `ceil(max / step)`, never less than one stage.
    pub fn stage_count(&self) -> usize {
        if self.step_percent.is_nan() || self.step_percent <= 0.0 {
            return 1;
        }
        let stop = self.max_step_percent + self.step_percent;
        let stages = ((stop - self.step_percent) / self.step_percent).ceil();
        if stages.is_finite() && stages >= 1.0 {
            stages as usize
        } else {
            1
        }
    }

    /// Reject parameters that are not positive and finite, or that would
    /// run more than [`MAX_STAGES`] stages.
    pub fn validate(&self) -> DesignResult<()> {
        if !(self.step_percent > 0.0 && self.step_percent.is_finite()) {
            return Err(DesignError::config("step_percent", "must be a positive number"));
        }
        if !(self.max_step_percent > 0.0 && self.max_step_percent.is_finite()) {
            return Err(DesignError::config("max_step_percent", "must be a positive number"));
        }
        if !self.min_width_mm.is_finite() {
            return Err(DesignError::config("min_width_mm", "must be a finite number"));
        }
        if self.max_step_percent / self.step_percent > MAX_STAGES as f64 {
            return Err(DesignError::config(
                "step_percent",
                format!("more than {} stages up to max_step_percent {}", MAX_STAGES, self.max_step_percent),
            ));
        }
        Ok(())
    }

    /// Perturbation fraction for a zero-based stage index
    pub fn stage_fraction(&self, stage: usize) -> f64 {
        self.step_percent + stage as f64 * self.step_percent
    }
}

/// Outcome of correcting one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    /// Section to present (width floor already applied)
    pub section: Section,

    /// Whether `section` came from a valid candidate (or the valid raw input)
    pub valid: bool,

    /// Search stages run; zero when the raw section was accepted as is
    pub stages: usize,

    /// Candidate sections checked for validity
    pub evaluations: usize,
}

/// Correct a raw prediction with the default search and IS 456 rules.
pub fn correct(raw: Section, load: &LoadInput) -> CorrectionResult {
    correct_with(raw, load, &SearchConfig::default(), &StructuralEvaluator)
}

/// Correct a raw prediction with explicit search parameters and rules.
pub fn correct_with<R: DesignRules>(
    raw: Section,
    load: &LoadInput,
    config: &SearchConfig,
    rules: &R,
) -> CorrectionResult {
    if rules.is_valid(&raw, load) && raw.width_mm >= config.min_width_mm {
        return CorrectionResult {
            section: raw,
            valid: true,
            stages: 0,
            evaluations: 1,
        };
    }

    let mut best = raw;
    let mut min_cost = f64::INFINITY;
    let mut found_valid = false;
    let mut stages = 0;
    let mut evaluations = 1;

    for stage in 0..config.stage_count() {
        let p = config.stage_fraction(stage);
        let delta_b = raw.width_mm * p;
        let delta_d = raw.depth_mm * p;
        let delta_ast = raw.ast_mm2 * p;
        stages += 1;

        for sb in SIGNS {
            let width_mm = raw.width_mm + sb * delta_b;
            if width_mm < config.min_width_mm {
                continue;
            }

            for sd in SIGNS {
                let depth_mm = raw.depth_mm + sd * delta_d;

                for sa in SIGNS {
                    let candidate = Section::new(width_mm, depth_mm, raw.ast_mm2 + sa * delta_ast);
                    evaluations += 1;

                    if !rules.is_valid(&candidate, load) {
                        continue;
                    }
                    let cost = rules.cost(&candidate);
                    if cost < min_cost {
                        min_cost = cost;
                        best = candidate;
                        found_valid = true;
                    }
                }
            }
        }

        if found_valid {
            debug!(stage = stages, fraction = p, cost = min_cost, "valid section found");
            break;
        }
    }

    if !found_valid {
        debug!(stages, evaluations, "no valid section in search radius");
    }

    CorrectionResult {
        section: best.with_min_width(config.min_width_mm),
        valid: found_valid,
        stages,
        evaluations,
    }
}
