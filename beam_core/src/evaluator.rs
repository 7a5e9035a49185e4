//! # Structural Evaluator
//!
//! Limit-state checks for a singly-reinforced rectangular RCC beam section
//! (IS 456 simplified rectangular stress block), plus the material cost model
//! used to rank candidate sections.
//!
//! ## Checks
//!
//! A section is valid for a load input when all of the following hold:
//!
//! 1. `Ast_min <= Ast <= Ast_max` (minimum and maximum tension steel)
//! 2. `b / d >= 0.3` (practical proportions)
//! 3. `Mu <= MOR` (capacity covers demand)
//! 4. `MOR <= Mul` (section is under-reinforced)
//!
//! Every intermediate quantity is rounded where the design tables round it
//! (xu_limit and limits to 2 places, moments to 3 places) and the checks
//! compare the rounded values.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::evaluator::{is_valid, moment_capacity};
//!
//! let (mor, mul) = moment_capacity(300.0, 450.0, 1500.0, 30.0, 415.0);
//! assert_eq!(mor, 206.05);
//! assert_eq!(mul, 251.693);
//!
//! assert!(is_valid(300.0, 450.0, 1500.0, 30.0, 415.0, 120.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::section::{LoadInput, Section};
use crate::units::{mm2_to_m2, nmm_to_knm, round_to};

/// Modulus of elasticity of reinforcing steel Es (MPa)
pub const STEEL_ES_MPA: f64 = 2e5;

/// Limiting compressive strain in concrete at failure
const CONCRETE_ULTIMATE_STRAIN: f64 = 0.0035;

/// Concrete strain plus the 0.002 steel strain allowance at the balanced condition
const BALANCED_STRAIN_SUM: f64 = 0.0055;

/// Minimum b/d ratio for a practical section
pub const MIN_WIDTH_DEPTH_RATIO: f64 = 0.3;

/// Concrete rate (currency per m³)
pub const CONCRETE_RATE_PER_M3: f64 = 15000.0;

/// Reinforcing steel rate (currency per kg)
pub const STEEL_RATE_PER_KG: f64 = 140.0;

/// Density of reinforcing steel (kg/m³)
pub const STEEL_DENSITY_KG_M3: f64 = 7850.0;

/// Limiting depth of the neutral axis xu,max (mm).
///
/// Strain compatibility at the balanced condition:
/// `xu,max = 0.0035 d / (0.0055 + 0.87 fy / Es)`, rounded to 2 places.
pub fn neutral_axis_ultimate_depth(depth_mm: f64, fy_mpa: f64) -> f64 {
    let strain_sum = BALANCED_STRAIN_SUM + 0.87 * fy_mpa / STEEL_ES_MPA;
    round_to(CONCRETE_ULTIMATE_STRAIN * depth_mm / strain_sum, 2)
}

/// Moment of resistance and limiting moment (kN·m), each rounded to 3 places.
///
/// - `xu = 0.87 fy Ast / (0.36 fck b)`
/// - `MOR = 0.87 fy Ast (d - 0.416 xu)`
/// - `Mul = 0.36 fck b xu,max (d - 0.416 xu,max)`
pub fn moment_capacity(width_mm: f64, depth_mm: f64, ast_mm2: f64, fck_mpa: f64, fy_mpa: f64) -> (f64, f64) {
    let xu = (0.87 * fy_mpa * ast_mm2) / (0.36 * fck_mpa * width_mm);
    let mor = nmm_to_knm(0.87 * fy_mpa * ast_mm2 * (depth_mm - 0.416 * xu));

    let xu_limit = neutral_axis_ultimate_depth(depth_mm, fy_mpa);
    let mul = nmm_to_knm(0.36 * fck_mpa * width_mm * xu_limit * (depth_mm - 0.416 * xu_limit));

    (round_to(mor, 3), round_to(mul, 3))
}

/// Minimum and maximum tension reinforcement (mm²), rounded to 2 places.
///
/// `Ast,min = 0.85 b d / fy`, `Ast,max = 0.04 b d`
pub fn reinforcement_limits(width_mm: f64, depth_mm: f64, fy_mpa: f64) -> (f64, f64) {
    let ast_min = 0.85 * width_mm * depth_mm / fy_mpa;
    let ast_max = 0.04 * width_mm * depth_mm;
    (round_to(ast_min, 2), round_to(ast_max, 2))
}

/// Width to depth ratio b/d. Callers guarantee a non-zero depth.
pub fn width_depth_ratio(width_mm: f64, depth_mm: f64) -> f64 {
    width_mm / depth_mm
}

/// Material cost per metre run of beam, rounded to 2 places.
///
/// Concrete volume `b d` (m³/m) at [`CONCRETE_RATE_PER_M3`] plus steel weight
/// `Ast x 7850` (kg/m) at [`STEEL_RATE_PER_KG`]. Independent of the load.
pub fn cost(width_mm: f64, depth_mm: f64, ast_mm2: f64) -> f64 {
    let concrete_m3_per_m = mm2_to_m2(width_mm * depth_mm);
    let steel_kg_per_m = mm2_to_m2(ast_mm2) * STEEL_DENSITY_KG_M3;
    round_to(
        concrete_m3_per_m * CONCRETE_RATE_PER_M3 + steel_kg_per_m * STEEL_RATE_PER_KG,
        2,
    )
}

/// Composite validity check. All four conditions must hold.
pub fn is_valid(width_mm: f64, depth_mm: f64, ast_mm2: f64, fck_mpa: f64, fy_mpa: f64, mu_knm: f64) -> bool {
    let (ast_min, ast_max) = reinforcement_limits(width_mm, depth_mm, fy_mpa);
    if !(ast_min <= ast_mm2 && ast_mm2 <= ast_max) {
        return false;
    }
    if width_depth_ratio(width_mm, depth_mm) < MIN_WIDTH_DEPTH_RATIO {
        return false;
    }
    let (mor, mul) = moment_capacity(width_mm, depth_mm, ast_mm2, fck_mpa, fy_mpa);
    !(mu_knm > mor || mor > mul)
}

/// Validity and cost rules a design search ranks candidates by.
///
/// [`StructuralEvaluator`] is the production implementation; the corrector is
/// generic so the search procedure can be exercised against simpler rules.
pub trait DesignRules {
    /// Whether `section` satisfies every check for `load`
    fn is_valid(&self, section: &Section, load: &LoadInput) -> bool;

    /// Cost of `section`; lower is better
    fn cost(&self, section: &Section) -> f64;
}

/// IS 456 section checks and the material cost model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuralEvaluator;

impl StructuralEvaluator {
    /// Full breakdown of every check for a section.
    pub fn evaluate(&self, section: &Section, load: &LoadInput) -> SectionCheck {
        let Section {
            width_mm,
            depth_mm,
            ast_mm2,
        } = *section;

        let (ast_min_mm2, ast_max_mm2) = reinforcement_limits(width_mm, depth_mm, load.fy_mpa);
        let (mor_knm, mul_knm) = moment_capacity(width_mm, depth_mm, ast_mm2, load.fck_mpa, load.fy_mpa);
        let ratio = width_depth_ratio(width_mm, depth_mm);

        SectionCheck {
            xu_limit_mm: neutral_axis_ultimate_depth(depth_mm, load.fy_mpa),
            mor_knm,
            mul_knm,
            ast_min_mm2,
            ast_max_mm2,
            width_depth_ratio: ratio,
            cost: cost(width_mm, depth_mm, ast_mm2),
            reinforcement_ok: ast_min_mm2 <= ast_mm2 && ast_mm2 <= ast_max_mm2,
            proportions_ok: ratio >= MIN_WIDTH_DEPTH_RATIO,
            capacity_ok: load.mu_knm <= mor_knm,
            under_reinforced: mor_knm <= mul_knm,
        }
    }
}

impl DesignRules for StructuralEvaluator {
    fn is_valid(&self, section: &Section, load: &LoadInput) -> bool {
        is_valid(
            section.width_mm,
            section.depth_mm,
            section.ast_mm2,
            load.fck_mpa,
            load.fy_mpa,
            load.mu_knm,
        )
    }

    fn cost(&self, section: &Section) -> f64 {
        cost(section.width_mm, section.depth_mm, section.ast_mm2)
    }
}

/// Check breakdown for one section against one load input.
///
/// ## JSON Example
///
/// ```json
/// {
///   "xu_limit_mm": 215.6,
///   "mor_knm": 206.05,
///   "mul_knm": 251.693,
///   "ast_min_mm2": 276.51,
///   "ast_max_mm2": 5400.0,
///   "width_depth_ratio": 0.667,
///   "cost": 3673.5,
///   "reinforcement_ok": true,
///   "proportions_ok": true,
///   "capacity_ok": true,
///   "under_reinforced": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCheck {
    /// Limiting neutral axis depth xu,max (mm)
    pub xu_limit_mm: f64,
    /// Moment of resistance MOR (kN·m)
    pub mor_knm: f64,
    /// Limiting moment of resistance Mu,lim (kN·m)
    pub mul_knm: f64,
    /// Minimum tension steel (mm²)
    pub ast_min_mm2: f64,
    /// Maximum tension steel (mm²)
    pub ast_max_mm2: f64,
    /// b/d
    pub width_depth_ratio: f64,
    /// Material cost per metre run
    pub cost: f64,

    pub reinforcement_ok: bool,
    pub proportions_ok: bool,
    pub capacity_ok: bool,
    pub under_reinforced: bool,
}

impl SectionCheck {
    /// True when every check passes
    pub fn passes(&self) -> bool {
        self.reinforcement_ok && self.proportions_ok && self.capacity_ok && self.under_reinforced
    }

    /// Names of the checks that fail, in evaluation order
    pub fn failed_checks(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.reinforcement_ok {
            failed.push("Reinforcement limits");
        }
        if !self.proportions_ok {
            failed.push("Width/depth ratio");
        }
        if !self.capacity_ok {
            failed.push("Moment capacity");
        }
        if !self.under_reinforced {
            failed.push("Over-reinforced");
        }
        failed
    }
}

/// Minimum detailing width (mm)
pub const DETAILING_MIN_WIDTH_MM: f64 = 200.0;

/// Minimum detailing depth (mm)
pub const DETAILING_MIN_DEPTH_MM: f64 = 300.0;

/// Outcome of the preliminary detailing check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailingCheck {
    pub ok: bool,
    pub message: String,
}

/// Preliminary detailing check on section size and steel area.
///
/// Independent of the limit-state checks; reported alongside them but never
/// used to accept or reject a corrected design.
pub fn detailing_check(section: &Section) -> DetailingCheck {
    let (ok, message) = if section.width_mm < DETAILING_MIN_WIDTH_MM || section.depth_mm < DETAILING_MIN_DEPTH_MM {
        (false, "Section too small")
    } else if section.ast_mm2 <= 0.0 {
        (false, "Invalid reinforcement area")
    } else {
        (true, "Design OK")
    };

    DetailingCheck {
        ok,
        message: message.to_string(),
    }
}
