//! # Reinforcement Estimate
//!
//! Main flexural steel for the pier cap, pier stem, pier footing and the
//! abutment stem, with a bar schedule per component.
//!
//! ## Method
//!
//! - Effective depth d = D − cover − φ/2
//! - Required steel Ast = M / (0.87 fy · j · d), lever arm factor j = 0.9
//! - Minimum steel 0.12 % of the gross section; provided = max(required, min)
//! - Bar count = ⌈Ast / bar area⌉, raised until spacing ≤ 300 mm
//! - Spacing = (b − 2·cover) / (n − 1)
//! - Bar length = member length − 2·cover
//!
//! Weights use the per-diameter unit weights of the bar table, so an
//! unlisted diameter is a [`CalcError::MaterialNotFound`].
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::reinforcement::{design_flexure, FlexureInput, ReinforcedComponent};
//! use bridge_core::config::DesignConfig;
//!
//! let config = DesignConfig::default();
//! let stem = FlexureInput {
//!     component: ReinforcedComponent::PierStem,
//!     design_moment_knm: 2925.0,
//!     section_width_m: 8.0,
//!     overall_depth_m: 1.5,
//!     member_length_m: 6.445,
//!     cover_mm: 50.0,
//!     members: 1,
//! };
//!
//! let schedule = design_flexure(&stem, 415.0, &config).unwrap();
//! assert_eq!(schedule.bar_diameter_mm, 20);
//! assert!(schedule.spacing_mm <= 300.0);
//! assert!(schedule.provided_area_mm2 >= schedule.minimum_area_mm2);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::foundation::FoundationResult;
use crate::calculations::load_analysis::LoadSet;
use crate::calculations::pier_stability::StabilityResult;
use crate::config::{positive, DesignConfig};
use crate::errors::{CalcError, CalcResult};
use crate::input::DesignInput;
use crate::loads::{find_governing_for, LimitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReinforcedComponent {
    PierCap,
    PierStem,
    PierFooting,
    AbutmentStem,
}

impl ReinforcedComponent {
    pub fn description(&self) -> &'static str {
        match self {
            ReinforcedComponent::PierCap => "Pier cap",
            ReinforcedComponent::PierStem => "Pier stem",
            ReinforcedComponent::PierFooting => "Pier footing",
            ReinforcedComponent::AbutmentStem => "Abutment stem",
        }
    }
}

/// One rectangular section in bending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlexureInput {
    pub component: ReinforcedComponent,
    /// Factored design moment (kN·m)
    pub design_moment_knm: f64,
    /// Section width the bars are spread across (m)
    pub section_width_m: f64,
    /// Overall depth D (m)
    pub overall_depth_m: f64,
    /// Length of member the bars run along (m)
    pub member_length_m: f64,
    pub cover_mm: f64,
    /// Identical members in the bridge
    pub members: u32,
}

impl FlexureInput {
    pub fn validate(&self) -> CalcResult<()> {
        if !self.design_moment_knm.is_finite() {
            return Err(CalcError::invalid_input(
                "design_moment_knm",
                self.design_moment_knm.to_string(),
                "Moment must be finite",
            ));
        }
        positive("section_width_m", self.section_width_m)?;
        positive("overall_depth_m", self.overall_depth_m)?;
        positive("member_length_m", self.member_length_m)?;
        positive("cover_mm", self.cover_mm)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSchedule {
    pub component: ReinforcedComponent,
    pub members: u32,
    pub design_moment_knm: f64,
    pub section_width_mm: f64,
    pub overall_depth_mm: f64,
    pub effective_depth_mm: f64,
    pub required_area_mm2: f64,
    pub minimum_area_mm2: f64,
    pub provided_area_mm2: f64,
    pub bar_diameter_mm: u32,
    /// Bars per member
    pub bar_count: u32,
    pub spacing_mm: f64,
    pub bar_length_m: f64,
    /// Provided steel over b·d
    pub steel_ratio: f64,
    pub weight_per_member_kg: f64,
    /// Weight per member x members (kg)
    pub total_weight_kg: f64,
}

/// Design the main steel of one section
pub fn design_flexure(input: &FlexureInput, fy_mpa: f64, config: &DesignConfig) -> CalcResult<BarSchedule> {
    input.validate()?;
    positive("fy_mpa", fy_mpa)?;
    let constants = &config.constants;
    let detailing = &config.detailing;
    let bar = constants.bar_sizes.lookup(detailing.main_bar_diameter_mm)?;

    let b = input.section_width_m * 1000.0;
    let depth = input.overall_depth_m * 1000.0;
    let d = depth - input.cover_mm - f64::from(bar.diameter_mm) / 2.0;
    if !(d > 0.0) {
        return Err(CalcError::invalid_input(
            "overall_depth_m",
            input.overall_depth_m.to_string(),
            format!("{} leaves no effective depth after cover", input.component.description()),
        ));
    }
    let clear_width = b - 2.0 * input.cover_mm;
    if !(clear_width > 0.0) {
        return Err(CalcError::invalid_input(
            "section_width_m",
            input.section_width_m.to_string(),
            format!("{} is narrower than its cover", input.component.description()),
        ));
    }

    let required = input.design_moment_knm.abs() * 1.0e6
        / (constants.steel_stress_factor * fy_mpa * constants.lever_arm_factor * d);
    let minimum = constants.min_steel_ratio * b * depth;
    let provided_target = required.max(minimum);

    let bar_area = bar.area_mm2();
    let by_area = (provided_target / bar_area).ceil() as u32;
    let by_spacing = (clear_width / detailing.max_bar_spacing_mm).ceil() as u32 + 1;
    let bar_count = by_area.max(by_spacing).max(2);
    let spacing = clear_width / f64::from(bar_count - 1);

    let bar_length = input.member_length_m - 2.0 * input.cover_mm / 1000.0;
    if !(bar_length > 0.0) {
        return Err(CalcError::invalid_input(
            "member_length_m",
            input.member_length_m.to_string(),
            format!("{} is shorter than its cover", input.component.description()),
        ));
    }
    let provided = f64::from(bar_count) * bar_area;
    let weight_per_member = f64::from(bar_count) * bar_length * bar.unit_weight_kg_m;

    Ok(BarSchedule {
        component: input.component,
        members: input.members,
        design_moment_knm: input.design_moment_knm,
        section_width_mm: b,
        overall_depth_mm: depth,
        effective_depth_mm: d,
        required_area_mm2: required,
        minimum_area_mm2: minimum,
        provided_area_mm2: provided,
        bar_diameter_mm: bar.diameter_mm,
        bar_count,
        spacing_mm: spacing,
        bar_length_m: bar_length,
        steel_ratio: provided / (b * d),
        weight_per_member_kg: weight_per_member,
        total_weight_kg: weight_per_member * f64::from(input.members),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementInput {
    pub fy_mpa: f64,
    /// Governing combination over unfactored DL + LL
    pub design_load_factor: f64,
    pub sections: Vec<FlexureInput>,
}

impl ReinforcementInput {
    /// Pier cap, stem and footing sections for every pier in the bridge
    ///
    /// A bridge without intermediate piers still gets one typical pier so
    /// the schedule stays comparable; its member count is zero.
    pub fn pier_sections(
        input: &DesignInput,
        loads: &LoadSet,
        stability: &StabilityResult,
        footing: &FoundationResult,
        config: &DesignConfig,
    ) -> CalcResult<Vec<FlexureInput>> {
        let pier = &input.pier;
        let gc = input.material.concrete_unit_weight_kn_m3;
        let factor = loads.design_load_factor();
        let piers = input.project.num_piers();

        let overhang = ((pier.cap_length_m - pier.stem_length_m) / 2.0).max(0.0);
        let cap_line_load = (loads.superstructure_dead_load_kn + loads.live_load.total_kn) / pier.cap_length_m
            + pier.cap_width_m * pier.cap_thickness_m * gc;
        let cap_moment = factor * cap_line_load * overhang.powi(2) / 2.0;

        let ultimate = find_governing_for(&loads.combinations, LimitState::Ultimate).ok_or_else(|| {
            CalcError::invalid_input("load_combinations", "[]", "An ultimate combination is required for the stem")
        })?;
        let stem_moment = stability
            .combination(&ultimate.combination.name)
            .map(|row| row.longitudinal_moment_knm)
            .ok_or_else(|| CalcError::Internal {
                message: format!("No stability row for {}", ultimate.combination.name),
            })?;

        let projection = ((footing.length_m - pier.stem_width_m) / 2.0).max(0.0);
        let net_pressure = (footing.max_pressure_kn_m2 - gc * footing.thickness_m).max(0.0);
        let footing_moment = factor * net_pressure * projection.powi(2) / 2.0 * footing.width_m;

        Ok(vec![
            FlexureInput {
                component: ReinforcedComponent::PierCap,
                design_moment_knm: cap_moment,
                section_width_m: pier.cap_width_m,
                overall_depth_m: pier.cap_thickness_m,
                member_length_m: pier.cap_length_m,
                cover_mm: config.detailing.clear_cover_mm,
                members: piers,
            },
            FlexureInput {
                component: ReinforcedComponent::PierStem,
                design_moment_knm: stem_moment,
                section_width_m: pier.stem_length_m,
                overall_depth_m: pier.stem_width_m,
                member_length_m: input.pier_stem_height_m(),
                cover_mm: config.detailing.clear_cover_mm,
                members: piers,
            },
            FlexureInput {
                component: ReinforcedComponent::PierFooting,
                design_moment_knm: footing_moment,
                section_width_m: footing.width_m,
                overall_depth_m: footing.thickness_m,
                member_length_m: footing.length_m,
                cover_mm: config.detailing.footing_cover_mm,
                members: piers,
            },
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementResult {
    pub fy_mpa: f64,
    pub design_load_factor: f64,
    pub schedules: Vec<BarSchedule>,
    /// Sum of every schedule's total weight (kg)
    pub total_weight_kg: f64,
}

impl ReinforcementResult {
    pub fn schedule(&self, component: ReinforcedComponent) -> Option<&BarSchedule> {
        self.schedules.iter().find(|s| s.component == component)
    }

    /// Steel of one component across all its members (kg)
    pub fn component_weight_kg(&self, component: ReinforcedComponent) -> f64 {
        self.schedule(component).map(|s| s.total_weight_kg).unwrap_or(0.0)
    }
}

pub fn calculate(input: &ReinforcementInput, config: &DesignConfig) -> CalcResult<ReinforcementResult> {
    positive("design_load_factor", input.design_load_factor)?;
    let schedules = input
        .sections
        .iter()
        .map(|section| design_flexure(section, input.fy_mpa, config))
        .collect::<CalcResult<Vec<_>>>()?;
    let total_weight_kg = schedules.iter().map(|s| s.total_weight_kg).sum();

    tracing::debug!(total_weight_kg, schedules = schedules.len(), "bar schedule complete");

    Ok(ReinforcementResult {
        fy_mpa: input.fy_mpa,
        design_load_factor: input.design_load_factor,
        schedules,
        total_weight_kg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetailingSettings;

    fn stem() -> FlexureInput {
        FlexureInput {
            component: ReinforcedComponent::PierStem,
            design_moment_knm: 2925.0,
            section_width_m: 8.0,
            overall_depth_m: 1.5,
            member_length_m: 6.445,
            cover_mm: 50.0,
            members: 2,
        }
    }

    #[test]
    fn test_required_area() {
        let schedule = design_flexure(&stem(), 415.0, &DesignConfig::default()).unwrap();
        assert!((schedule.effective_depth_mm - 1440.0).abs() < 1e-9);
        let expected = 2925.0e6 / (0.87 * 415.0 * 0.9 * 1440.0);
        assert!((schedule.required_area_mm2 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_minimum_steel_governs_stocky_stem() {
        let schedule = design_flexure(&stem(), 415.0, &DesignConfig::default()).unwrap();
        assert!((schedule.minimum_area_mm2 - 14400.0).abs() < 1e-9);
        assert!(schedule.required_area_mm2 < schedule.minimum_area_mm2);
        assert_eq!(schedule.bar_count, 46);
        assert!((schedule.spacing_mm - 7900.0 / 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_weights_use_bar_table() {
        let schedule = design_flexure(&stem(), 415.0, &DesignConfig::default()).unwrap();
        let per_member = 46.0 * (6.445 - 0.1) * 2.47;
        assert!((schedule.weight_per_member_kg - per_member).abs() < 1e-9);
        assert!((schedule.total_weight_kg - 2.0 * per_member).abs() < 1e-9);
    }

    #[test]
    fn test_spacing_limit_adds_bars() {
        let mut section = stem();
        section.design_moment_knm = 0.0;
        section.overall_depth_m = 0.2;
        let schedule = design_flexure(&section, 415.0, &DesignConfig::default()).unwrap();
        // 0.12 % of 8000 x 200 needs 7 bars, but 7900 mm at 300 mm needs 28
        assert_eq!(schedule.bar_count, 28);
        assert!(schedule.spacing_mm <= 300.0);
    }

    #[test]
    fn test_unknown_bar_diameter() {
        let config = DesignConfig {
            detailing: DetailingSettings {
                main_bar_diameter_mm: 22,
                ..DetailingSettings::default()
            },
            ..DesignConfig::default()
        };
        let err = design_flexure(&stem(), 415.0, &config).unwrap_err();
        assert!(matches!(err, CalcError::MaterialNotFound { .. }));
    }

    #[test]
    fn test_cover_exceeding_depth_rejected() {
        let mut section = stem();
        section.overall_depth_m = 0.05;
        assert!(design_flexure(&section, 415.0, &DesignConfig::default()).is_err());
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let mut cap = stem();
        cap.component = ReinforcedComponent::PierCap;
        cap.design_moment_knm = 800.0;
        cap.section_width_m = 1.5;
        cap.overall_depth_m = 0.6;
        let input = ReinforcementInput {
            fy_mpa: 500.0,
            design_load_factor: 1.5,
            sections: vec![stem(), cap],
        };
        let result = calculate(&input, &DesignConfig::default()).unwrap();
        let sum: f64 = result.schedules.iter().map(|s| s.total_weight_kg).sum();
        assert_eq!(result.total_weight_kg, sum);
        assert!(result.component_weight_kg(ReinforcedComponent::PierCap) > 0.0);
        assert_eq!(result.component_weight_kg(ReinforcedComponent::AbutmentStem), 0.0);
    }
}
