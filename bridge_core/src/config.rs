//! # Design Configuration
//!
//! Everything the pipeline treats as policy rather than input: acceptance
//! limits, unit rates, footing-sizing controls, detailing choices and the
//! code-of-practice constants table.
//!
//! All structs default to the values used in Indian highway practice
//! (IRC 6 / IRC 78 / IS 456) and deserialize with `#[serde(default)]`, so a
//! config file only needs the fields it overrides.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::config::{DesignConfig, FoundationMode};
//!
//! let config: DesignConfig = serde_json::from_str(r#"{
//!     "allowable_afflux_m": 0.15,
//!     "footing": { "mode": "Check" }
//! }"#).unwrap();
//!
//! assert_eq!(config.allowable_afflux_m, 0.15);
//! assert_eq!(config.min_overturning_sf, 2.0);
//! assert_eq!(config.footing.mode, FoundationMode::Check);
//! assert_eq!(config.footing.max_iterations, 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::loads::{irc_combinations, LimitState, LoadCombination};
use crate::materials::BarTable;

/// Top-level configuration surface for a design run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Afflux above which the waterway check fails (m)
    pub allowable_afflux_m: f64,

    /// Minimum factor of safety against overturning
    pub min_overturning_sf: f64,

    /// Minimum factor of safety against sliding
    pub min_sliding_sf: f64,

    /// Margin kept between the required and provided founding level (m)
    pub scour_margin_m: f64,

    pub rates: UnitRates,
    pub footing: FootingSizing,
    pub detailing: DetailingSettings,
    pub constants: CodeConstants,
}

impl Default for DesignConfig {
    fn default() -> Self {
        DesignConfig {
            allowable_afflux_m: 0.100,
            min_overturning_sf: 2.0,
            min_sliding_sf: 1.5,
            scour_margin_m: 1.5,
            rates: UnitRates::default(),
            footing: FootingSizing::default(),
            detailing: DetailingSettings::default(),
            constants: CodeConstants::default(),
        }
    }
}

impl DesignConfig {
    /// Validate configuration values
    pub fn validate(&self) -> CalcResult<()> {
        positive("allowable_afflux_m", self.allowable_afflux_m)?;
        positive("min_overturning_sf", self.min_overturning_sf)?;
        positive("min_sliding_sf", self.min_sliding_sf)?;
        non_negative("scour_margin_m", self.scour_margin_m)?;
        self.rates.validate()?;
        self.footing.validate()?;
        self.detailing.validate()?;
        self.constants.validate()?;
        self.constants.bar_sizes.lookup(self.detailing.main_bar_diameter_mm)?;
        Ok(())
    }
}

/// Unit material rates (₹) and overhead percentages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitRates {
    /// Concrete supplied and placed (₹/m³)
    pub concrete_per_m3: f64,
    /// Reinforcing steel (₹/kg)
    pub steel_per_kg: f64,
    /// Formwork (₹/m²)
    pub formwork_per_m2: f64,
    /// Foundation excavation (₹/m³)
    pub excavation_per_m3: f64,
    /// Contingencies as a percentage of direct cost
    pub contingency_percent: f64,
    /// Contractor's profit as a percentage of direct cost plus contingencies
    pub contractor_profit_percent: f64,
}

impl Default for UnitRates {
    fn default() -> Self {
        UnitRates {
            concrete_per_m3: 8500.0,
            steel_per_kg: 75.0,
            formwork_per_m2: 450.0,
            excavation_per_m3: 180.0,
            contingency_percent: 10.0,
            contractor_profit_percent: 12.0,
        }
    }
}

impl UnitRates {
    pub fn validate(&self) -> CalcResult<()> {
        non_negative("concrete_per_m3", self.concrete_per_m3)?;
        non_negative("steel_per_kg", self.steel_per_kg)?;
        non_negative("formwork_per_m2", self.formwork_per_m2)?;
        non_negative("excavation_per_m3", self.excavation_per_m3)?;
        non_negative("contingency_percent", self.contingency_percent)?;
        non_negative("contractor_profit_percent", self.contractor_profit_percent)?;
        Ok(())
    }
}

/// Whether the pier footing is checked as given or sized by search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FoundationMode {
    /// Grow the footing from the stem footprint until it passes
    #[default]
    Design,
    /// Check the footing dimensions given in the input
    Check,
}

/// Controls for the trial-and-error footing search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootingSizing {
    pub mode: FoundationMode,
    /// Increment added to each side per iteration (m)
    pub step_m: f64,
    pub max_iterations: u32,
    /// Projection beyond the pier stem on each side for the first trial (m)
    pub initial_projection_m: f64,
}

impl Default for FootingSizing {
    fn default() -> Self {
        FootingSizing {
            mode: FoundationMode::Design,
            step_m: 0.25,
            max_iterations: 20,
            initial_projection_m: 0.5,
        }
    }
}

impl FootingSizing {
    pub fn validate(&self) -> CalcResult<()> {
        positive("footing.step_m", self.step_m)?;
        non_negative("footing.initial_projection_m", self.initial_projection_m)?;
        if self.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "footing.max_iterations",
                "0",
                "At least one sizing iteration is required",
            ));
        }
        Ok(())
    }
}

/// Bar and cover choices for the bar schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailingSettings {
    pub main_bar_diameter_mm: u32,
    /// Clear cover for pier cap, stem and abutment stem (mm)
    pub clear_cover_mm: f64,
    /// Clear cover for footings cast against soil (mm)
    pub footing_cover_mm: f64,
    /// Upper limit on main bar spacing (mm)
    pub max_bar_spacing_mm: f64,
}

impl Default for DetailingSettings {
    fn default() -> Self {
        DetailingSettings {
            main_bar_diameter_mm: 20,
            clear_cover_mm: 50.0,
            footing_cover_mm: 75.0,
            max_bar_spacing_mm: 300.0,
        }
    }
}

impl DetailingSettings {
    pub fn validate(&self) -> CalcResult<()> {
        positive("detailing.clear_cover_mm", self.clear_cover_mm)?;
        positive("detailing.footing_cover_mm", self.footing_cover_mm)?;
        positive("detailing.max_bar_spacing_mm", self.max_bar_spacing_mm)?;
        Ok(())
    }
}

/// Empirical coefficients and factors for one code-of-practice edition.
///
/// Swapping this table swaps the standard; no formula hardcodes a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConstants {
    /// Edition label recorded in every report
    pub edition: String,

    /// Gravitational acceleration (m/s²)
    pub gravity_m_s2: f64,

    // Hydraulics (IRC 5 / IRC 78)
    /// Lacey regime width W = C * sqrt(Q)
    pub lacey_regime_coefficient: f64,
    /// Afflux velocity-head divisor in (V²/17.85 + 0.0152)
    pub afflux_velocity_divisor: f64,
    /// Afflux constant term in (V²/17.85 + 0.0152)
    pub afflux_constant: f64,

    // Scour
    /// Lacey scour depth ds = k * (Q²/f)^(1/3)
    pub lacey_scour_coefficient: f64,
    /// Design scour = factor * normal scour
    pub design_scour_factor: f64,
    /// Neill stone size d50 = V² / (k * g)
    pub neill_coefficient: f64,
    /// Upstream apron length as a multiple of pier width
    pub apron_upstream_factor: f64,
    /// Downstream apron length as a multiple of pier width
    pub apron_downstream_factor: f64,

    // Live load
    /// Spans longer than this take the long-span impact factor (m)
    pub impact_span_threshold_m: f64,
    pub impact_factor_long_span: f64,
    pub impact_factor_short_span: f64,

    // Water current on piers (IRC 6 cl. 210)
    /// Pressure constant in P = k * K * V² (kg/m²)
    pub water_current_constant: f64,
    /// Pier nose shape factor K
    pub pier_shape_factor: f64,
    /// Maximum surface velocity as a multiple of mean velocity
    pub surface_velocity_factor: f64,

    // Earth pressure
    /// Wall friction angle as a fraction of phi for Coulomb pressure
    pub wall_friction_ratio: f64,
    /// Live load surcharge as an equivalent height of fill (m)
    pub surcharge_height_m: f64,
    /// Load factor on earth pressure moments for steel design
    pub earth_pressure_load_factor: f64,

    // Reinforcement (working stress style)
    /// Lever-arm factor j in Ast = M / (0.87 fy d j)
    pub lever_arm_factor: f64,
    /// Partial safety reduction on fy (0.87)
    pub steel_stress_factor: f64,
    /// Minimum steel as a fraction of the gross section
    pub min_steel_ratio: f64,
    pub bar_sizes: BarTable,

    // Quantities
    /// Steel percentage of deck concrete volume
    pub deck_steel_percent: f64,
    /// Mass density of reinforcing steel (kg/m³)
    pub steel_density_kg_m3: f64,
    /// Working space beyond footing edges for excavation (m, each side)
    pub excavation_working_space_m: f64,
    /// Extra excavation depth below the footing (m)
    pub excavation_extra_depth_m: f64,

    pub load_combinations: Vec<LoadCombination>,
}

impl Default for CodeConstants {
    fn default() -> Self {
        CodeConstants {
            edition: "IRC:6-2017 / IRC:78-2014 / IS 456-2000".to_string(),
            gravity_m_s2: 9.81,
            lacey_regime_coefficient: 4.8,
            afflux_velocity_divisor: 17.85,
            afflux_constant: 0.0152,
            lacey_scour_coefficient: 1.34,
            design_scour_factor: 1.5,
            neill_coefficient: 5.75,
            apron_upstream_factor: 1.5,
            apron_downstream_factor: 3.0,
            impact_span_threshold_m: 9.0,
            impact_factor_long_span: 1.25,
            impact_factor_short_span: 1.5,
            water_current_constant: 52.0,
            pier_shape_factor: 0.66,
            surface_velocity_factor: std::f64::consts::SQRT_2,
            wall_friction_ratio: 2.0 / 3.0,
            surcharge_height_m: 1.2,
            earth_pressure_load_factor: 1.5,
            lever_arm_factor: 0.9,
            steel_stress_factor: 0.87,
            min_steel_ratio: 0.0012,
            bar_sizes: BarTable::default(),
            deck_steel_percent: 1.5,
            steel_density_kg_m3: 7850.0,
            excavation_working_space_m: 0.5,
            excavation_extra_depth_m: 0.5,
            load_combinations: irc_combinations(),
        }
    }
}

impl CodeConstants {
    /// Impact factor for a span: long-span factor strictly above the threshold
    ///
    /// ```rust
    /// use bridge_core::config::CodeConstants;
    ///
    /// let constants = CodeConstants::default();
    /// assert_eq!(constants.impact_factor(9.6), 1.25);
    /// assert_eq!(constants.impact_factor(9.0), 1.5);
    /// assert_eq!(constants.impact_factor(8.0), 1.5);
    /// ```
    pub fn impact_factor(&self, effective_span_m: f64) -> f64 {
        if effective_span_m > self.impact_span_threshold_m {
            self.impact_factor_long_span
        } else {
            self.impact_factor_short_span
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        let strictly_positive = [
            ("gravity_m_s2", self.gravity_m_s2),
            ("lacey_regime_coefficient", self.lacey_regime_coefficient),
            ("afflux_velocity_divisor", self.afflux_velocity_divisor),
            ("lacey_scour_coefficient", self.lacey_scour_coefficient),
            ("design_scour_factor", self.design_scour_factor),
            ("neill_coefficient", self.neill_coefficient),
            ("impact_factor_long_span", self.impact_factor_long_span),
            ("impact_factor_short_span", self.impact_factor_short_span),
            ("surface_velocity_factor", self.surface_velocity_factor),
            ("earth_pressure_load_factor", self.earth_pressure_load_factor),
            ("lever_arm_factor", self.lever_arm_factor),
            ("steel_stress_factor", self.steel_stress_factor),
            ("steel_density_kg_m3", self.steel_density_kg_m3),
        ];
        for (field, value) in strictly_positive {
            positive(field, value)?;
        }
        let at_least_zero = [
            ("afflux_constant", self.afflux_constant),
            ("apron_upstream_factor", self.apron_upstream_factor),
            ("apron_downstream_factor", self.apron_downstream_factor),
            ("water_current_constant", self.water_current_constant),
            ("pier_shape_factor", self.pier_shape_factor),
            ("wall_friction_ratio", self.wall_friction_ratio),
            ("surcharge_height_m", self.surcharge_height_m),
            ("min_steel_ratio", self.min_steel_ratio),
            ("deck_steel_percent", self.deck_steel_percent),
            ("excavation_working_space_m", self.excavation_working_space_m),
            ("excavation_extra_depth_m", self.excavation_extra_depth_m),
        ];
        for (field, value) in at_least_zero {
            non_negative(field, value)?;
        }
        self.bar_sizes.validate()?;

        if self.load_combinations.is_empty() {
            return Err(CalcError::invalid_input(
                "load_combinations",
                "[]",
                "At least one load combination is required",
            ));
        }
        if !self
            .load_combinations
            .iter()
            .any(|c| c.limit_state == LimitState::Serviceability)
        {
            return Err(CalcError::invalid_input(
                "load_combinations",
                format!("{} combinations", self.load_combinations.len()),
                "A serviceability combination is required for bearing checks",
            ));
        }
        Ok(())
    }
}

pub(crate) fn positive(field: &str, value: f64) -> CalcResult<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DesignConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_configuration_surface() {
        let config = DesignConfig::default();
        assert_eq!(config.allowable_afflux_m, 0.100);
        assert_eq!(config.min_overturning_sf, 2.0);
        assert_eq!(config.min_sliding_sf, 1.5);
        assert_eq!(config.footing.step_m, 0.25);
        assert_eq!(config.rates.steel_per_kg, 75.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DesignConfig = serde_json::from_str(r#"{"rates": {"concrete_per_m3": 9200.0}}"#).unwrap();
        assert_eq!(config.rates.concrete_per_m3, 9200.0);
        assert_eq!(config.rates.formwork_per_m2, 450.0);
        assert_eq!(config.constants.load_combinations.len(), 4);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut config = DesignConfig::default();
        config.rates.excavation_per_m3 = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_bar_diameter_rejected() {
        let mut config = DesignConfig::default();
        config.detailing.main_bar_diameter_mm = 22;
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_combinations_need_serviceability_case() {
        let mut config = DesignConfig::default();
        config.constants.load_combinations.retain(|c| c.limit_state == LimitState::Ultimate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut config = DesignConfig::default();
        config.footing.max_iterations = 0;
        assert!(config.validate().is_err());
    }
}
