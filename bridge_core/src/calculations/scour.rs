//! # Scour and Bed Protection
//!
//! Lacey scour depth below HFL, the resulting founding-level requirement
//! for the piers, and the riprap/apron sizing around them.
//!
//! - Normal scour: ds = 1.34 (Q²/f)^(1/3)
//! - Design scour: 1.5 ds
//! - Stone size (Neill): d50 = V² / (5.75 g)
//! - Aprons: 1.5 x pier width upstream, 3.0 x pier width downstream
//!
//! The discharge enters the Lacey expression as given; see DESIGN.md for the
//! treatment of total discharge versus discharge intensity.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::scour::{calculate, ScourInput};
//! use bridge_core::config::DesignConfig;
//!
//! let input = ScourInput {
//!     discharge_cumecs: 3.0,
//!     silt_factor: 1.5,
//!     pier_width_m: 1.5,
//!     velocity_m_s: 0.2,
//!     hfl_m: 101.2,
//!     founding_level_m: 93.49,
//! };
//! let result = calculate(&input, &DesignConfig::default()).unwrap();
//! assert!(result.foundation_adequate);
//! assert_eq!(result.apron_downstream_m, 4.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, positive, DesignConfig};
use crate::errors::CalcResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScourInput {
    pub discharge_cumecs: f64,
    pub silt_factor: f64,
    pub pier_width_m: f64,
    /// Mean velocity used for stone sizing (m/s)
    pub velocity_m_s: f64,
    pub hfl_m: f64,
    /// Provided founding level of the pier footing (m)
    pub founding_level_m: f64,
}

impl ScourInput {
    pub fn validate(&self) -> CalcResult<()> {
        positive("discharge_cumecs", self.discharge_cumecs)?;
        positive("silt_factor", self.silt_factor)?;
        non_negative("pier_width_m", self.pier_width_m)?;
        non_negative("velocity_m_s", self.velocity_m_s)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScourResult {
    /// Lacey normal scour depth below HFL (m)
    pub normal_scour_depth_m: f64,
    /// Design scour depth below HFL (m)
    pub design_scour_depth_m: f64,
    /// Deepest scoured bed level, HFL − design scour (m)
    pub required_foundation_level_m: f64,
    pub safety_margin_m: f64,
    pub provided_foundation_level_m: f64,
    /// (required − margin) − provided; negative when the footing is too shallow (m)
    pub foundation_clearance_m: f64,
    pub foundation_adequate: bool,
    /// Median riprap stone size (m)
    pub stone_size_d50_m: f64,
    pub apron_upstream_m: f64,
    pub apron_downstream_m: f64,
}

impl ScourResult {
    pub fn passes(&self) -> bool {
        self.foundation_adequate
    }
}

/// Lacey normal scour depth ds = k (Q²/f)^(1/3)
///
/// ```rust
/// use bridge_core::calculations::scour::lacey_scour_depth;
///
/// let ds = lacey_scour_depth(1265.76, 1.5, 1.34);
/// assert!((ds - 136.975).abs() < 1e-3);
/// ```
pub fn lacey_scour_depth(discharge_cumecs: f64, silt_factor: f64, coefficient: f64) -> f64 {
    coefficient * (discharge_cumecs.powi(2) / silt_factor).cbrt()
}

pub fn calculate(input: &ScourInput, config: &DesignConfig) -> CalcResult<ScourResult> {
    input.validate()?;
    let constants = &config.constants;

    let normal = lacey_scour_depth(input.discharge_cumecs, input.silt_factor, constants.lacey_scour_coefficient);
    let design = constants.design_scour_factor * normal;
    let required_level = input.hfl_m - design;
    let clearance = (required_level - config.scour_margin_m) - input.founding_level_m;

    Ok(ScourResult {
        normal_scour_depth_m: normal,
        design_scour_depth_m: design,
        required_foundation_level_m: required_level,
        safety_margin_m: config.scour_margin_m,
        provided_foundation_level_m: input.founding_level_m,
        foundation_clearance_m: clearance,
        foundation_adequate: input.founding_level_m <= required_level - config.scour_margin_m,
        stone_size_d50_m: input.velocity_m_s.powi(2) / (constants.neill_coefficient * constants.gravity_m_s2),
        apron_upstream_m: constants.apron_upstream_factor * input.pier_width_m,
        apron_downstream_m: constants.apron_downstream_factor * input.pier_width_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(discharge_cumecs: f64, founding_level_m: f64) -> ScourInput {
        ScourInput {
            discharge_cumecs,
            silt_factor: 1.5,
            pier_width_m: 1.5,
            velocity_m_s: 2.5816,
            hfl_m: 101.2,
            founding_level_m,
        }
    }

    #[test]
    fn test_lacey_normal_scour() {
        let result = calculate(&input(1265.76, 93.49), &DesignConfig::default()).unwrap();
        let expected = 1.34 * (1265.76_f64 * 1265.76 / 1.5).powf(1.0 / 3.0);
        assert!((result.normal_scour_depth_m - expected).abs() < 1e-9);
        assert!((result.normal_scour_depth_m - 136.975).abs() < 1e-3);
    }

    #[test]
    fn test_design_scour_is_one_and_half_normal() {
        let result = calculate(&input(100.0, 50.0), &DesignConfig::default()).unwrap();
        assert!((result.design_scour_depth_m - 1.5 * result.normal_scour_depth_m).abs() < 1e-12);
        assert!((result.required_foundation_level_m - (101.2 - result.design_scour_depth_m)).abs() < 1e-12);
    }

    #[test]
    fn test_neill_stone_size() {
        let result = calculate(&input(100.0, 50.0), &DesignConfig::default()).unwrap();
        assert!((result.stone_size_d50_m - 2.5816_f64.powi(2) / (5.75 * 9.81)).abs() < 1e-12);
    }

    #[test]
    fn test_apron_lengths() {
        let result = calculate(&input(100.0, 50.0), &DesignConfig::default()).unwrap();
        assert_eq!(result.apron_upstream_m, 2.25);
        assert_eq!(result.apron_downstream_m, 4.5);
    }

    #[test]
    fn test_adequacy_respects_margin() {
        let config = DesignConfig::default();
        let trial = calculate(&input(3.0, 0.0), &config).unwrap();
        let limit = trial.required_foundation_level_m - config.scour_margin_m;

        let at_limit = calculate(&input(3.0, limit), &config).unwrap();
        assert!(at_limit.foundation_adequate);

        let too_shallow = calculate(&input(3.0, limit + 0.01), &config).unwrap();
        assert!(!too_shallow.foundation_adequate);
        assert!(too_shallow.foundation_clearance_m < 0.0);
    }

    #[test]
    fn test_large_flood_fails_shallow_footing() {
        let result = calculate(&input(1265.76, 93.49), &DesignConfig::default()).unwrap();
        assert!(!result.passes());
    }
}
