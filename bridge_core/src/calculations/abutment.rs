//! # Abutment Design
//!
//! Stability, bearing and stem steel for the two abutment types, computed
//! independently and compared.
//!
//! | Variant | Earth pressure | Body |
//! |---------|----------------|------|
//! | Battered (Type-1) | Coulomb, δ = ⅔φ on a back face at θ = atan(batter) | Trapezoidal gravity stem on a spread base |
//! | Cantilever (Type-2) | Rankine on the vertical plane through the heel | Thin stem, toe and heel slab carrying backfill |
//!
//! Both variants carry:
//!
//! - active thrust ½·Ka·γ·H² at H/3 and surcharge Ka·γ·h_s·H at H/2
//! - passive resistance ½·Kp·γ·D² on the base depth
//! - half the superstructure dead load and half the live load on the stem
//! - wing walls at the middle of the base
//!
//! Overturning is taken about the toe. The base is checked in bearing as a
//! footing of base width x abutment length. A failing variant is reported
//! with its flags set, never dropped.
//!
//! The comparison gives the lighter variant by total vertical load and the
//! cheaper one by direct cost of two abutments at the configured rates.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::abutment::{calculate, AbutmentInput};
//! use bridge_core::calculations::load_analysis::{self, LoadInput};
//! use bridge_core::config::DesignConfig;
//! use bridge_core::input::{AbutmentType, DesignInput};
//!
//! let design = DesignInput::default();
//! let config = DesignConfig::default();
//! let loads = load_analysis::calculate(&LoadInput::from_design(&design), &config).unwrap();
//!
//! let comparison = calculate(&AbutmentInput::from_design(&design, &loads), AbutmentType::Battered, &config).unwrap();
//! assert_eq!(comparison.summary.recommended, AbutmentType::Battered);
//! assert!(comparison.battered.overturning_sf > 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::estimate::ComponentQuantities;
use crate::calculations::foundation::{self, FoundationInput, FoundationResult};
use crate::calculations::load_analysis::LoadSet;
use crate::calculations::pier_stability::StabilityStatus;
use crate::calculations::reinforcement::{design_flexure, BarSchedule, FlexureInput, ReinforcedComponent};
use crate::config::{positive, CodeConstants, DesignConfig};
use crate::errors::{CalcError, CalcResult};
use crate::input::{AbutmentType, BatteredGeometry, CantileverGeometry, DesignInput, SoilParameters, WingWalls};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbutmentInput {
    /// Deck level minus abutment founding level (m)
    pub height_m: f64,
    /// Abutment length across the bridge (m)
    pub length_m: f64,
    pub soil: SoilParameters,
    pub concrete_unit_weight_kn_m3: f64,
    pub fy_mpa: f64,
    /// Superstructure dead load delivered to one abutment (kN)
    pub superstructure_dead_reaction_kn: f64,
    /// Live load delivered to one abutment (kN)
    pub live_reaction_kn: f64,
    pub battered: BatteredGeometry,
    pub cantilever: CantileverGeometry,
    pub wing_walls: WingWalls,
}

impl AbutmentInput {
    pub fn from_design(input: &DesignInput, loads: &LoadSet) -> Self {
        AbutmentInput {
            height_m: input.deck_level_m() - input.abutment.founding_level_m,
            length_m: input.project.bridge_width_m,
            soil: input.soil.clone(),
            concrete_unit_weight_kn_m3: input.material.concrete_unit_weight_kn_m3,
            fy_mpa: input.material.fy_mpa(),
            superstructure_dead_reaction_kn: loads.superstructure_dead_load_kn / 2.0,
            live_reaction_kn: loads.live_load.total_kn / 2.0,
            battered: input.abutment.battered.clone(),
            cantilever: input.abutment.cantilever.clone(),
            wing_walls: input.abutment.wing_walls.clone(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        positive("height_m", self.height_m)?;
        positive("length_m", self.length_m)?;
        positive("concrete_unit_weight_kn_m3", self.concrete_unit_weight_kn_m3)?;
        self.soil.validate()?;
        let base_thickness = self.battered.base_thickness_m.max(self.cantilever.base_thickness_m);
        if base_thickness >= self.height_m {
            return Err(CalcError::invalid_input(
                "abutment.base_thickness_m",
                base_thickness.to_string(),
                format!("Base is deeper than the {:.3} m abutment", self.height_m),
            ));
        }
        Ok(())
    }
}

/// Rankine active coefficient
///
/// ```rust
/// use bridge_core::calculations::abutment::rankine_active;
/// assert!((rankine_active(30.0) - 1.0 / 3.0).abs() < 1e-12);
/// ```
pub fn rankine_active(phi_deg: f64) -> f64 {
    let s = phi_deg.to_radians().sin();
    (1.0 - s) / (1.0 + s)
}

/// Rankine passive coefficient, tan²(45° + φ/2)
pub fn rankine_passive(phi_deg: f64) -> f64 {
    (45.0 + phi_deg / 2.0).to_radians().tan().powi(2)
}

/// Coulomb active coefficient for a level backfill
///
/// `theta_deg` is the back face inclination from vertical and `delta_deg`
/// the wall friction angle.
pub fn coulomb_active(phi_deg: f64, delta_deg: f64, theta_deg: f64) -> f64 {
    let (phi, delta, theta) = (phi_deg.to_radians(), delta_deg.to_radians(), theta_deg.to_radians());
    let root = ((phi + delta).sin() * phi.sin() / ((delta + theta).cos() * theta.cos())).sqrt();
    (phi - theta).cos().powi(2) / (theta.cos().powi(2) * (delta + theta).cos() * (1.0 + root).powi(2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbutmentLoadItem {
    Base,
    StemFrontBatter,
    Stem,
    StemBackBatter,
    BackfillOverBatter,
    BackfillOverHeel,
    WingWalls,
    SuperstructureDead,
    SuperstructureLive,
    EarthThrustVertical,
}

impl AbutmentLoadItem {
    /// Concrete and backfill weight, as opposed to reactions and thrust
    pub fn is_self_weight(&self) -> bool {
        !matches!(
            self,
            AbutmentLoadItem::SuperstructureDead
                | AbutmentLoadItem::SuperstructureLive
                | AbutmentLoadItem::EarthThrustVertical
        )
    }
}

/// A vertical force and its lever arm from the toe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbutmentLoad {
    pub item: AbutmentLoadItem,
    pub vertical_kn: f64,
    pub lever_arm_m: f64,
}

impl AbutmentLoad {
    fn new(item: AbutmentLoadItem, vertical_kn: f64, lever_arm_m: f64) -> Self {
        AbutmentLoad {
            item,
            vertical_kn,
            lever_arm_m,
        }
    }

    pub fn moment_knm(&self) -> f64 {
        self.vertical_kn * self.lever_arm_m
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbutmentDesign {
    pub variant: AbutmentType,
    pub height_m: f64,
    pub stem_height_m: f64,
    pub stem_top_width_m: f64,
    pub stem_bottom_width_m: f64,
    pub toe_length_m: f64,
    pub heel_length_m: f64,
    pub base_thickness_m: f64,
    pub base_width_m: f64,
    pub length_m: f64,

    pub active_coefficient: f64,
    pub passive_coefficient: f64,
    /// Inclination of the thrust to horizontal, δ + θ (degrees)
    pub thrust_inclination_deg: f64,
    pub earth_thrust_kn: f64,
    pub earth_thrust_horizontal_kn: f64,
    pub earth_thrust_vertical_kn: f64,
    pub surcharge_thrust_horizontal_kn: f64,
    pub passive_resistance_kn: f64,

    pub loads: Vec<AbutmentLoad>,
    /// Concrete and backfill (kN)
    pub dead_load_kn: f64,
    pub total_vertical_load_kn: f64,
    pub total_horizontal_load_kn: f64,
    pub resisting_moment_knm: f64,
    pub overturning_moment_knm: f64,
    pub overturning_sf: f64,
    pub sliding_sf: f64,
    pub overturning_ok: bool,
    pub sliding_ok: bool,

    pub bearing: FoundationResult,
    pub stem_section: FlexureInput,
    pub steel: BarSchedule,
    pub status: StabilityStatus,
}

impl AbutmentDesign {
    pub fn passes(&self) -> bool {
        self.status == StabilityStatus::Stable
    }

    /// Concrete in one abutment including wing walls (m³)
    pub fn concrete_volume_m3(&self, unit_weight_kn_m3: f64) -> f64 {
        self.loads
            .iter()
            .filter(|l| {
                matches!(
                    l.item,
                    AbutmentLoadItem::Base
                        | AbutmentLoadItem::StemFrontBatter
                        | AbutmentLoadItem::Stem
                        | AbutmentLoadItem::StemBackBatter
                        | AbutmentLoadItem::WingWalls
                )
            })
            .map(|l| l.vertical_kn)
            .sum::<f64>()
            / unit_weight_kn_m3
    }

    /// Take-off for the pair of abutments built to this variant
    pub fn quantities(
        &self,
        wings: &WingWalls,
        concrete_unit_weight_kn_m3: f64,
        constants: &CodeConstants,
    ) -> ComponentQuantities {
        let working = constants.excavation_working_space_m;
        ComponentQuantities {
            concrete_m3: self.concrete_volume_m3(concrete_unit_weight_kn_m3),
            steel_kg: self.steel.weight_per_member_kg,
            formwork_m2: 2.0 * self.stem_height_m * self.length_m
                + 2.0 * (self.base_width_m + self.length_m) * self.base_thickness_m
                + 2.0 * f64::from(wings.count) * wings.length_m * wings.height_m,
            excavation_m3: (self.base_width_m + 2.0 * working)
                * (self.length_m + 2.0 * working)
                * (self.base_thickness_m + constants.excavation_extra_depth_m),
            members: 2,
        }
    }
}

/// Load and cost comparison between the two variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub battered_total_load_kn: f64,
    pub cantilever_total_load_kn: f64,
    /// Variant with the lower total vertical load (Battered on a tie)
    pub recommended: AbutmentType,
    /// |difference| of the two totals (kN)
    pub load_difference_kn: f64,
    /// Two abutments of each variant
    pub battered_quantities: ComponentQuantities,
    pub cantilever_quantities: ComponentQuantities,
    /// Direct cost of two abutments at the configured rates (₹)
    pub battered_cost: f64,
    pub cantilever_cost: f64,
    /// |battered_cost − cantilever_cost| (₹)
    pub cost_difference: f64,
    /// Variant with the lower direct cost (Battered on a tie)
    pub economical: AbutmentType,
    pub battered_status: StabilityStatus,
    pub cantilever_status: StabilityStatus,
    /// Variant chosen in the input, carried into quantities
    pub selected: AbutmentType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbutmentComparison {
    pub battered: AbutmentDesign,
    pub cantilever: AbutmentDesign,
    pub summary: ComparisonSummary,
}

impl AbutmentComparison {
    pub fn design(&self, variant: AbutmentType) -> &AbutmentDesign {
        match variant {
            AbutmentType::Battered => &self.battered,
            AbutmentType::Cantilever => &self.cantilever,
        }
    }

    pub fn selected(&self) -> &AbutmentDesign {
        self.design(self.summary.selected)
    }
}

/// Design both variants and compare them
pub fn calculate(input: &AbutmentInput, selected: AbutmentType, config: &DesignConfig) -> CalcResult<AbutmentComparison> {
    input.validate()?;
    let battered = design_variant(input, AbutmentType::Battered, config)?;
    let cantilever = design_variant(input, AbutmentType::Cantilever, config)?;

    let recommended = if cantilever.total_vertical_load_kn < battered.total_vertical_load_kn {
        AbutmentType::Cantilever
    } else {
        AbutmentType::Battered
    };

    let take_off = |design: &AbutmentDesign| {
        design.quantities(&input.wing_walls, input.concrete_unit_weight_kn_m3, &config.constants)
    };
    let battered_quantities = take_off(&battered);
    let cantilever_quantities = take_off(&cantilever);
    let battered_cost = battered_quantities.direct_cost(&config.rates);
    let cantilever_cost = cantilever_quantities.direct_cost(&config.rates);
    let economical = if cantilever_cost < battered_cost {
        AbutmentType::Cantilever
    } else {
        AbutmentType::Battered
    };

    let summary = ComparisonSummary {
        battered_total_load_kn: battered.total_vertical_load_kn,
        cantilever_total_load_kn: cantilever.total_vertical_load_kn,
        recommended,
        load_difference_kn: (battered.total_vertical_load_kn - cantilever.total_vertical_load_kn).abs(),
        battered_quantities,
        cantilever_quantities,
        battered_cost,
        cantilever_cost,
        cost_difference: (battered_cost - cantilever_cost).abs(),
        economical,
        battered_status: battered.status,
        cantilever_status: cantilever.status,
        selected,
    };

    tracing::debug!(
        recommended = %recommended,
        economical = %economical,
        selected = %selected,
        battered_cost,
        cantilever_cost,
        "abutment variants compared"
    );

    Ok(AbutmentComparison {
        battered,
        cantilever,
        summary,
    })
}

/// Design one abutment variant
pub fn design_variant(input: &AbutmentInput, variant: AbutmentType, config: &DesignConfig) -> CalcResult<AbutmentDesign> {
    input.validate()?;
    let constants = &config.constants;
    let h = input.height_m;
    let la = input.length_m;
    let gamma = input.soil.unit_weight_kn_m3;
    let gc = input.concrete_unit_weight_kn_m3;
    let phi = input.soil.friction_angle_deg;

    let mut loads = Vec::new();
    let (stem_top, stem_bottom, toe, heel, base_t, ka, inclination_deg, thrust_x) = match variant {
        AbutmentType::Battered => {
            let g = &input.battered;
            positive("abutment.battered.stem_top_width_m", g.stem_top_width_m)?;
            let hs = h - g.base_thickness_m;
            let run = g.batter * hs;
            let top = g.stem_top_width_m;
            let bottom = top + 2.0 * run;
            let toe = g.toe_length_m;

            let theta = g.batter.atan().to_degrees();
            let delta = constants.wall_friction_ratio * phi;

            let batter_area = 0.5 * run * hs;
            loads.push(AbutmentLoad::new(
                AbutmentLoadItem::StemFrontBatter,
                batter_area * la * gc,
                toe + 2.0 / 3.0 * run,
            ));
            loads.push(AbutmentLoad::new(AbutmentLoadItem::Stem, top * hs * la * gc, toe + run + top / 2.0));
            loads.push(AbutmentLoad::new(
                AbutmentLoadItem::StemBackBatter,
                batter_area * la * gc,
                toe + run + top + run / 3.0,
            ));
            loads.push(AbutmentLoad::new(
                AbutmentLoadItem::BackfillOverBatter,
                batter_area * la * gamma,
                toe + run + top + 2.0 / 3.0 * run,
            ));
            loads.push(AbutmentLoad::new(
                AbutmentLoadItem::BackfillOverHeel,
                g.heel_length_m * hs * la * gamma,
                toe + bottom + g.heel_length_m / 2.0,
            ));

            (
                top,
                bottom,
                toe,
                g.heel_length_m,
                g.base_thickness_m,
                coulomb_active(phi, delta, theta),
                delta + theta,
                toe + bottom,
            )
        }
        AbutmentType::Cantilever => {
            let g = &input.cantilever;
            positive("abutment.cantilever.stem_thickness_m", g.stem_thickness_m)?;
            let hs = h - g.base_thickness_m;
            let t = g.stem_thickness_m;
            let toe = g.toe_length_m;

            loads.push(AbutmentLoad::new(AbutmentLoadItem::Stem, t * hs * la * gc, toe + t / 2.0));
            loads.push(AbutmentLoad::new(
                AbutmentLoadItem::BackfillOverHeel,
                g.heel_length_m * hs * la * gamma,
                toe + t + g.heel_length_m / 2.0,
            ));

            (
                t,
                t,
                toe,
                g.heel_length_m,
                g.base_thickness_m,
                rankine_active(phi),
                0.0,
                toe + t + g.heel_length_m,
            )
        }
    };

    let stem_height = h - base_t;
    let base_width = toe + stem_bottom + heel;
    let stem_centre = toe + stem_bottom / 2.0;
    loads.insert(0, AbutmentLoad::new(AbutmentLoadItem::Base, base_width * base_t * la * gc, base_width / 2.0));
    loads.push(AbutmentLoad::new(
        AbutmentLoadItem::WingWalls,
        input.wing_walls.volume_m3() * gc,
        base_width / 2.0,
    ));
    loads.push(AbutmentLoad::new(
        AbutmentLoadItem::SuperstructureDead,
        input.superstructure_dead_reaction_kn,
        stem_centre,
    ));
    loads.push(AbutmentLoad::new(AbutmentLoadItem::SuperstructureLive, input.live_reaction_kn, stem_centre));

    let inclination = inclination_deg.to_radians();
    let earth_thrust = 0.5 * ka * gamma * h * h * la;
    let thrust_h = earth_thrust * inclination.cos();
    let thrust_v = earth_thrust * inclination.sin();
    let surcharge_h = ka * gamma * constants.surcharge_height_m * h * la * inclination.cos();
    if thrust_v > 0.0 {
        loads.push(AbutmentLoad::new(AbutmentLoadItem::EarthThrustVertical, thrust_v, thrust_x));
    }

    let kp = rankine_passive(phi);
    let passive = 0.5 * kp * gamma * base_t * base_t * la;

    let dead_load: f64 = loads.iter().filter(|l| l.item.is_self_weight()).map(|l| l.vertical_kn).sum();
    let total_vertical: f64 = loads.iter().map(|l| l.vertical_kn).sum();
    let resisting: f64 = loads.iter().map(AbutmentLoad::moment_knm).sum();
    let overturning = thrust_h * h / 3.0 + surcharge_h * h / 2.0;
    let horizontal = thrust_h + surcharge_h;

    let overturning_sf = resisting / overturning;
    let sliding_sf = (input.soil.friction_coefficient * total_vertical + passive) / horizontal;
    let overturning_ok = overturning_sf >= config.min_overturning_sf;
    let sliding_ok = sliding_sf >= config.min_sliding_sf;

    let resultant_x = (resisting - overturning) / total_vertical;
    let eccentricity = base_width / 2.0 - resultant_x;
    let bearing = foundation::check(&FoundationInput {
        vertical_load_kn: total_vertical,
        longitudinal_moment_knm: total_vertical * eccentricity,
        transverse_moment_knm: 0.0,
        length_m: base_width,
        width_m: la,
        thickness_m: base_t,
        footing_unit_weight_kn_m3: 0.0,
        safe_bearing_capacity_kn_m2: input.soil.safe_bearing_capacity_kn_m2,
    })?;

    let ka_h = ka * inclination.cos();
    let stem_moment = constants.earth_pressure_load_factor
        * (ka_h * gamma * stem_height.powi(3) / 6.0
            + ka_h * gamma * constants.surcharge_height_m * stem_height.powi(2) / 2.0)
        * la;
    let stem_section = FlexureInput {
        component: ReinforcedComponent::AbutmentStem,
        design_moment_knm: stem_moment,
        section_width_m: la,
        overall_depth_m: stem_bottom,
        member_length_m: stem_height,
        cover_mm: config.detailing.clear_cover_mm,
        members: 1,
    };
    let steel = design_flexure(&stem_section, input.fy_mpa, config)?;

    let status = if overturning_ok && sliding_ok && bearing.passes() {
        StabilityStatus::Stable
    } else {
        tracing::warn!(
            variant = %variant,
            overturning_sf,
            sliding_sf,
            utilization = bearing.utilization,
            "abutment variant fails"
        );
        StabilityStatus::Unstable
    };

    Ok(AbutmentDesign {
        variant,
        height_m: h,
        stem_height_m: stem_height,
        stem_top_width_m: stem_top,
        stem_bottom_width_m: stem_bottom,
        toe_length_m: toe,
        heel_length_m: heel,
        base_thickness_m: base_t,
        base_width_m: base_width,
        length_m: la,
        active_coefficient: ka,
        passive_coefficient: kp,
        thrust_inclination_deg: inclination_deg,
        earth_thrust_kn: earth_thrust,
        earth_thrust_horizontal_kn: thrust_h,
        earth_thrust_vertical_kn: thrust_v,
        surcharge_thrust_horizontal_kn: surcharge_h,
        passive_resistance_kn: passive,
        loads,
        dead_load_kn: dead_load,
        total_vertical_load_kn: total_vertical,
        total_horizontal_load_kn: horizontal,
        resisting_moment_knm: resisting,
        overturning_moment_knm: overturning,
        overturning_sf,
        sliding_sf,
        overturning_ok,
        sliding_ok,
        bearing,
        stem_section,
        steel,
        status,
    })
}
