//! # Units and Rounding
//!
//! beam_core works in SI units throughout, matching IS 456 limit-state design:
//! - Length: millimetres (mm)
//! - Area: square millimetres (mm²)
//! - Stress: megapascals (MPa = N/mm²)
//! - Moment: kilonewton-metres (kN·m) at the API, newton-millimetres (N·mm)
//!   inside capacity formulas
//!
//! Field names carry the unit where it is not obvious from the glossary
//! (`b`, `d`, `Ast`, `fck`, `fy`, `Mu` keep their textbook names on the wire).
//!
//! ## Example
//!
//! ```rust
//! use beam_core::units::{nmm_to_knm, round_to};
//!
//! assert_eq!(nmm_to_knm(120_000_000.0), 120.0);
//! assert_eq!(round_to(1.23456, 2), 1.23);
//! ```

/// Newton-millimetres in one kilonewton-metre
pub const NMM_PER_KNM: f64 = 1e6;

/// Square millimetres in one square metre
pub const MM2_PER_M2: f64 = 1e6;

/// Convert a moment from N·mm to kN·m
pub fn nmm_to_knm(moment_nmm: f64) -> f64 {
    moment_nmm / NMM_PER_KNM
}

/// Convert an area from mm² to m²
pub fn mm2_to_m2(area_mm2: f64) -> f64 {
    area_mm2 / MM2_PER_M2
}

/// Round to a fixed number of decimal places.
///
/// Rounding points are part of the design checks: capacities and limits are
/// compared after rounding, so every check must round at the same place.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_conversion() {
        assert_eq!(nmm_to_knm(1e6), 1.0);
        assert_eq!(nmm_to_knm(0.0), 0.0);
    }

    #[test]
    fn test_area_conversion() {
        // 300 x 450 mm section = 0.135 m²
        assert!((mm2_to_m2(300.0 * 450.0) - 0.135).abs() < 1e-12);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 3), 3.142);
        assert_eq!(round_to(2.005_1, 2), 2.01);
        assert_eq!(round_to(-1.234, 1), -1.2);
        assert_eq!(round_to(42.0, 0), 42.0);
    }
}
