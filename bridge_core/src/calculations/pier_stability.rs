//! # Pier Stability
//!
//! Overturning and sliding of an intermediate pier on its footing, checked
//! for every load combination.
//!
//! ## Actions
//!
//! For each combination with factors fD, fL, fW, fE:
//!
//! - Vertical: V = fD·DL + fL·LL − buoyancy
//! - Transverse: H_T = fW·W + F_current
//! - Longitudinal: H_L = fE·EQ
//! - M_L = fL·M_LL + fE·EQ·z_deck
//! - M_T = fW·W·z_deck + F_current·z_current
//!
//! Lever arms are measured from the founding level. Water current pressure
//! follows IRC 6, p = 52·K·V²·g/1000 (kN/m²), over the stem width and the
//! water depth, with the resultant at two thirds of the depth above the bed.
//!
//! ## Checks
//!
//! - Overturning SF per axis = V·(dimension/2)/M, infinite when M = 0
//! - Sliding SF = μV/√(H_L² + H_T²)
//! - V ≤ 0 is net uplift: both SFs are zero and the combination is listed
//!   in `uplift_combinations`
//!
//! The reported safety factors are the minima over all combinations. A pier
//! is stable when both meet the configured minimums.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::{hydraulics, load_analysis, pier_stability};
//! use bridge_core::config::DesignConfig;
//! use bridge_core::input::DesignInput;
//!
//! let design = DesignInput::default();
//! let config = DesignConfig::default();
//! let flow = hydraulics::calculate(&hydraulics::HydraulicInput::from_design(&design), &config).unwrap();
//! let loads = load_analysis::calculate(&load_analysis::LoadInput::from_design(&design), &config).unwrap();
//!
//! let input = pier_stability::StabilityInput::from_design(&design, &loads, &flow, &config);
//! let result = pier_stability::calculate(&input, &config).unwrap();
//! assert!(result.passes());
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::hydraulics::HydraulicResult;
use crate::calculations::load_analysis::LoadSet;
use crate::config::{non_negative, positive, CodeConstants, DesignConfig};
use crate::errors::{CalcError, CalcResult};
use crate::input::DesignInput;
use crate::loads::{LoadCase, LoadCombination, LoadType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityInput {
    /// Unfactored DL, LL (with impact), wind and seismic forces
    pub load_case: LoadCase,
    /// Live load moment about the transverse pier axis (kN·m)
    pub live_load_moment_knm: f64,
    pub combinations: Vec<LoadCombination>,
    /// Mean flow velocity at the pier (m/s)
    pub flow_velocity_m_s: f64,
    pub stem_width_m: f64,
    pub stem_length_m: f64,
    pub footing_length_m: f64,
    pub footing_width_m: f64,
    pub footing_thickness_m: f64,
    pub founding_level_m: f64,
    pub bed_level_m: f64,
    pub hfl_m: f64,
    pub cap_bottom_level_m: f64,
    /// Level at which deck wind and seismic forces act (slab mid-depth, m)
    pub deck_force_level_m: f64,
    pub water_unit_weight_kn_m3: f64,
    pub friction_coefficient: f64,
}

impl StabilityInput {
    pub fn from_design(
        input: &DesignInput,
        loads: &LoadSet,
        hydraulics: &HydraulicResult,
        config: &DesignConfig,
    ) -> Self {
        StabilityInput {
            load_case: loads.load_case.clone(),
            live_load_moment_knm: loads.live_load.longitudinal_moment_knm,
            combinations: config.constants.load_combinations.clone(),
            flow_velocity_m_s: hydraulics.design_velocity_m_s,
            stem_width_m: input.pier.stem_width_m,
            stem_length_m: input.pier.stem_length_m,
            footing_length_m: input.pier.footing_length_m,
            footing_width_m: input.pier.footing_width_m,
            footing_thickness_m: input.pier.footing_thickness_m,
            founding_level_m: input.pier.founding_level_m,
            bed_level_m: input.hydraulics.bed_level_m,
            hfl_m: input.hydraulics.hfl_m,
            cap_bottom_level_m: input.cap_bottom_level_m(),
            deck_force_level_m: input.soffit_level_m() + input.deck.slab_thickness_m / 2.0,
            water_unit_weight_kn_m3: input.material.water_unit_weight_kn_m3,
            friction_coefficient: input.soil.friction_coefficient,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        positive("footing_length_m", self.footing_length_m)?;
        positive("footing_width_m", self.footing_width_m)?;
        positive("friction_coefficient", self.friction_coefficient)?;
        non_negative("flow_velocity_m_s", self.flow_velocity_m_s)?;
        non_negative("water_unit_weight_kn_m3", self.water_unit_weight_kn_m3)?;
        if self.combinations.is_empty() {
            return Err(CalcError::invalid_input("combinations", "[]", "No load combinations to check"));
        }
        Ok(())
    }

    fn footing_top_level_m(&self) -> f64 {
        self.founding_level_m + self.footing_thickness_m
    }

    /// Uplift on the submerged stem and footing (kN)
    pub fn buoyancy_kn(&self) -> f64 {
        let footing_top = self.footing_top_level_m();
        let stem_submerged = (self.hfl_m.min(self.cap_bottom_level_m) - footing_top).max(0.0);
        let footing_submerged = (self.hfl_m - self.founding_level_m).clamp(0.0, self.footing_thickness_m);
        let volume = stem_submerged * self.stem_width_m * self.stem_length_m
            + footing_submerged * self.footing_length_m * self.footing_width_m;
        self.water_unit_weight_kn_m3 * volume
    }

    /// Water depth acting on the stem (m)
    pub fn water_depth_m(&self) -> f64 {
        (self.hfl_m - self.bed_level_m).max(0.0)
    }

    /// Lever arm of the deck forces above the founding level (m)
    pub fn deck_lever_arm_m(&self) -> f64 {
        self.deck_force_level_m - self.founding_level_m
    }

    /// Lever arm of the water current resultant above the founding level (m)
    pub fn current_lever_arm_m(&self) -> f64 {
        (self.bed_level_m - self.founding_level_m) + 2.0 / 3.0 * self.water_depth_m()
    }
}

/// Water current force on the pier stem (kN)
///
/// ```rust
/// use bridge_core::calculations::pier_stability::water_current_force;
/// use bridge_core::config::CodeConstants;
///
/// let constants = CodeConstants::default();
/// assert_eq!(water_current_force(0.0, 1.5, 6.2, &constants), 0.0);
/// assert!(water_current_force(2.58, 1.5, 6.2, &constants) > 0.0);
/// ```
pub fn water_current_force(velocity_m_s: f64, stem_width_m: f64, depth_m: f64, constants: &CodeConstants) -> f64 {
    let surface_velocity = constants.surface_velocity_factor * velocity_m_s;
    let pressure_kn_m2 = constants.water_current_constant
        * constants.pier_shape_factor
        * surface_velocity.powi(2)
        * constants.gravity_m_s2
        / 1000.0;
    pressure_kn_m2 * stem_width_m * depth_m
}

/// Resisting over overturning, infinite when nothing overturns
fn safety_factor(resisting: f64, overturning: f64) -> f64 {
    if overturning.abs() > 0.0 {
        resisting / overturning.abs()
    } else {
        f64::INFINITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationStability {
    pub combination: String,
    pub vertical_load_kn: f64,
    pub longitudinal_force_kn: f64,
    pub transverse_force_kn: f64,
    pub longitudinal_moment_knm: f64,
    pub transverse_moment_knm: f64,
    /// V·L/2 about the longitudinal toe (kN·m)
    pub resisting_moment_longitudinal_knm: f64,
    /// V·B/2 about the transverse toe (kN·m)
    pub resisting_moment_transverse_knm: f64,
    pub overturning_sf: f64,
    pub sliding_sf: f64,
    /// Buoyancy exceeds the factored vertical load; both SFs are zero
    pub uplift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityStatus {
    Stable,
    Unstable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityResult {
    pub buoyancy_kn: f64,
    pub water_current_force_kn: f64,
    pub combinations: Vec<CombinationStability>,
    /// Combination with the largest vertical load (first wins ties)
    pub governing_combination: String,
    pub overturning_sf: f64,
    pub critical_overturning_combination: String,
    pub sliding_sf: f64,
    pub critical_sliding_combination: String,
    pub min_overturning_sf: f64,
    pub min_sliding_sf: f64,
    pub overturning_ok: bool,
    pub sliding_ok: bool,
    /// Combinations with net uplift, in list order
    pub uplift_combinations: Vec<String>,
    pub status: StabilityStatus,
}

impl StabilityResult {
    pub fn passes(&self) -> bool {
        self.status == StabilityStatus::Stable
    }

    pub fn combination(&self, name: &str) -> Option<&CombinationStability> {
        self.combinations.iter().find(|c| c.combination == name)
    }
}

pub fn calculate(input: &StabilityInput, config: &DesignConfig) -> CalcResult<StabilityResult> {
    input.validate()?;

    let buoyancy = input.buoyancy_kn();
    let current = water_current_force(
        input.flow_velocity_m_s,
        input.stem_width_m,
        input.water_depth_m(),
        &config.constants,
    );
    let z_deck = input.deck_lever_arm_m();
    let z_current = input.current_lever_arm_m();

    let dead = input.load_case.get(LoadType::Dead);
    let live = input.load_case.get(LoadType::Live);
    let wind = input.load_case.get(LoadType::Wind);
    let seismic = input.load_case.get(LoadType::Seismic);

    let mut rows = Vec::with_capacity(input.combinations.len());
    for combo in &input.combinations {
        let f_dead = combo.get_factor(LoadType::Dead);
        let f_live = combo.get_factor(LoadType::Live);
        let f_wind = combo.get_factor(LoadType::Wind);
        let f_seismic = combo.get_factor(LoadType::Seismic);

        let vertical = f_dead * dead + f_live * live - buoyancy;
        let uplift = !(vertical > 0.0);
        if uplift {
            tracing::warn!(combination = %combo.name, vertical_kn = vertical, "net uplift on pier");
        }
        let h_long = f_seismic * seismic;
        let h_trans = f_wind * wind + current;
        let m_long = f_live * input.live_load_moment_knm + f_seismic * seismic * z_deck;
        let m_trans = f_wind * wind * z_deck + current * z_current;

        let resisting_long = vertical * input.footing_length_m / 2.0;
        let resisting_trans = vertical * input.footing_width_m / 2.0;
        // Nothing holds the pier down under uplift
        let (overturning_sf, sliding_sf) = if uplift {
            (0.0, 0.0)
        } else {
            (
                safety_factor(resisting_long, m_long).min(safety_factor(resisting_trans, m_trans)),
                safety_factor(input.friction_coefficient * vertical, h_long.hypot(h_trans)),
            )
        };

        rows.push(CombinationStability {
            combination: combo.name.clone(),
            vertical_load_kn: vertical,
            longitudinal_force_kn: h_long,
            transverse_force_kn: h_trans,
            longitudinal_moment_knm: m_long,
            transverse_moment_knm: m_trans,
            resisting_moment_longitudinal_knm: resisting_long,
            resisting_moment_transverse_knm: resisting_trans,
            overturning_sf,
            sliding_sf,
            uplift,
        });
    }

    let governing = first_extreme(&rows, |r| r.vertical_load_kn, |a, b| a > b);
    let critical_ot = first_extreme(&rows, |r| r.overturning_sf, |a, b| a < b);
    let critical_sl = first_extreme(&rows, |r| r.sliding_sf, |a, b| a < b);

    let overturning_ok = critical_ot.overturning_sf >= config.min_overturning_sf;
    let sliding_ok = critical_sl.sliding_sf >= config.min_sliding_sf;
    let status = if overturning_ok && sliding_ok {
        StabilityStatus::Stable
    } else {
        StabilityStatus::Unstable
    };

    if status == StabilityStatus::Unstable {
        tracing::warn!(
            overturning_sf = critical_ot.overturning_sf,
            sliding_sf = critical_sl.sliding_sf,
            "pier stability below minimum"
        );
    }

    Ok(StabilityResult {
        buoyancy_kn: buoyancy,
        water_current_force_kn: current,
        governing_combination: governing.combination.clone(),
        overturning_sf: critical_ot.overturning_sf,
        critical_overturning_combination: critical_ot.combination.clone(),
        sliding_sf: critical_sl.sliding_sf,
        critical_sliding_combination: critical_sl.combination.clone(),
        min_overturning_sf: config.min_overturning_sf,
        min_sliding_sf: config.min_sliding_sf,
        overturning_ok,
        sliding_ok,
        uplift_combinations: rows
            .iter()
            .filter(|r| r.uplift)
            .map(|r| r.combination.clone())
            .collect(),
        status,
        combinations: rows,
    })
}

/// First row whose key beats every earlier one
fn first_extreme<F, C>(rows: &[CombinationStability], key: F, better: C) -> &CombinationStability
where
    F: Fn(&CombinationStability) -> f64,
    C: Fn(f64, f64) -> bool,
{
    let mut best = &rows[0];
    for row in &rows[1..] {
        if better(key(row), key(best)) {
            best = row;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{irc_combinations, LimitState};

    fn simple_input() -> StabilityInput {
        StabilityInput {
            load_case: LoadCase::new("Pier")
                .with_load(LoadType::Dead, 5000.0)
                .with_load(LoadType::Live, 2000.0)
                .with_load(LoadType::Wind, 100.0)
                .with_load(LoadType::Seismic, 150.0),
            live_load_moment_knm: 1000.0,
            combinations: irc_combinations(),
            flow_velocity_m_s: 0.0,
            stem_width_m: 1.5,
            stem_length_m: 8.0,
            footing_length_m: 4.0,
            footing_width_m: 10.0,
            footing_thickness_m: 1.0,
            founding_level_m: 90.0,
            bed_level_m: 92.0,
            hfl_m: 91.0,
            cap_bottom_level_m: 98.0,
            deck_force_level_m: 100.0,
            water_unit_weight_kn_m3: 10.0,
            friction_coefficient: 0.5,
        }
    }

    #[test]
    fn test_buoyancy_partial_footing() {
        // HFL one metre above founding, footing fully submerged, stem dry
        let input = simple_input();
        assert!((input.buoyancy_kn() - 10.0 * 4.0 * 10.0 * 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_buoyancy_default_pier() {
        let input = DesignInput::default();
        let loads = crate::calculations::load_analysis::calculate(
            &crate::calculations::load_analysis::LoadInput::from_design(&input),
            &DesignConfig::default(),
        )
        .unwrap();
        let flow = crate::calculations::hydraulics::calculate(
            &crate::calculations::hydraulics::HydraulicInput::from_design(&input),
            &DesignConfig::default(),
        )
        .unwrap();
        let stability = StabilityInput::from_design(&input, &loads, &flow, &DesignConfig::default());
        // stem 6.445 x 1.5 x 8 below the cap, footing 3.5 x 9 x 1.2
        let expected = 10.0 * (6.445 * 1.5 * 8.0 + 3.5 * 9.0 * 1.2);
        assert!((stability.buoyancy_kn() - expected).abs() < 1e-6);
        assert!((stability.deck_lever_arm_m() - 8.545).abs() < 1e-9);
    }

    #[test]
    fn test_lc1_has_only_live_load_moment() {
        let result = calculate(&simple_input(), &DesignConfig::default()).unwrap();
        let lc1 = result.combination("LC1").unwrap();
        let vertical = 1.5 * 5000.0 + 1.5 * 2000.0 - 400.0;
        assert!((lc1.vertical_load_kn - vertical).abs() < 1e-9);
        assert!((lc1.longitudinal_moment_knm - 1500.0).abs() < 1e-9);
        assert_eq!(lc1.transverse_moment_knm, 0.0);
        assert!((lc1.overturning_sf - vertical * 2.0 / 1500.0).abs() < 1e-9);
        // No horizontal force at all
        assert!(lc1.sliding_sf.is_infinite());
    }

    #[test]
    fn test_seismic_combination_moments() {
        let result = calculate(&simple_input(), &DesignConfig::default()).unwrap();
        let lc3 = result.combination("LC3").unwrap();
        assert!((lc3.longitudinal_force_kn - 180.0).abs() < 1e-9);
        assert!((lc3.longitudinal_moment_knm - (1.2 * 1000.0 + 180.0 * 10.0)).abs() < 1e-9);
        let expected_sliding = 0.5 * lc3.vertical_load_kn / 180.0;
        assert!((lc3.sliding_sf - expected_sliding).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_over_combinations_reported() {
        let result = calculate(&simple_input(), &DesignConfig::default()).unwrap();
        let min_ot = result
            .combinations
            .iter()
            .map(|c| c.overturning_sf)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.overturning_sf, min_ot);
        assert_eq!(
            result.combination(&result.critical_overturning_combination).unwrap().overturning_sf,
            min_ot
        );
        assert_eq!(result.governing_combination, "LC1");
    }

    #[test]
    fn test_water_current_adds_transverse_force() {
        let mut input = simple_input();
        input.hfl_m = 95.0;
        input.flow_velocity_m_s = 2.0;
        let constants = CodeConstants::default();
        let force = water_current_force(2.0, 1.5, 3.0, &constants);
        let expected = 52.0 * 0.66 * 8.0 * 9.81 / 1000.0 * 1.5 * 3.0;
        assert!((force - expected).abs() < 1e-9);

        let result = calculate(&input, &DesignConfig::default()).unwrap();
        let lc1 = result.combination("LC1").unwrap();
        assert!((lc1.transverse_force_kn - force).abs() < 1e-9);
        assert!((lc1.transverse_moment_knm - force * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_footing_is_unstable() {
        let mut input = simple_input();
        input.footing_length_m = 0.2;
        let result = calculate(&input, &DesignConfig::default()).unwrap();
        assert!(!result.overturning_ok);
        assert_eq!(result.status, StabilityStatus::Unstable);
        assert!(!result.combinations.is_empty());
    }

    #[test]
    fn test_net_uplift_is_unstable() {
        let mut input = simple_input();
        input.load_case = LoadCase::new("Light").with_load(LoadType::Dead, 100.0);
        input.combinations = vec![LoadCombination::new("S", "DL", LimitState::Serviceability)
            .with_factor(LoadType::Dead, 1.0)];

        let result = calculate(&input, &DesignConfig::default()).unwrap();
        assert_eq!(result.status, StabilityStatus::Unstable);
        assert!(!result.overturning_ok);
        assert!(!result.sliding_ok);
        assert_eq!(result.uplift_combinations, vec!["S".to_string()]);

        let row = result.combination("S").unwrap();
        assert!(row.uplift);
        assert!(row.vertical_load_kn < 0.0);
        assert_eq!(row.overturning_sf, 0.0);
        assert_eq!(row.sliding_sf, 0.0);
    }

    #[test]
    fn test_uplift_flagged_only_where_it_occurs() {
        let mut input = simple_input();
        input.load_case = LoadCase::new("Light")
            .with_load(LoadType::Dead, 300.0)
            .with_load(LoadType::Live, 400.0);
        input.combinations = vec![
            LoadCombination::new("DL", "DL", LimitState::Serviceability).with_factor(LoadType::Dead, 1.0),
            LoadCombination::new("DL+LL", "DL + LL", LimitState::Serviceability)
                .with_factor(LoadType::Dead, 1.0)
                .with_factor(LoadType::Live, 1.0),
        ];

        let result = calculate(&input, &DesignConfig::default()).unwrap();
        assert_eq!(result.uplift_combinations, vec!["DL".to_string()]);
        assert!(!result.combination("DL+LL").unwrap().uplift);
        assert_eq!(result.critical_overturning_combination, "DL");
        assert_eq!(result.governing_combination, "DL+LL");
    }
}
