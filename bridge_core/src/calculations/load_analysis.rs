//! # Load Analysis
//!
//! Dead load on one intermediate pier (one span of superstructure plus the
//! pier's own cap, stem and footing), the IRC live load reaction with impact,
//! and the factored load combinations.
//!
//! ## Dead Load Components
//!
//! | Component | Formula |
//! |-----------|---------|
//! | Slab | L x W x t_slab x γc |
//! | Wearing coat | L x (W − 2 b_fp) x t_wc x γwc |
//! | Footpath | 2 x L x b_fp x t_fp x γc |
//! | Pier cap | L_cap x B_cap x t_cap x γc |
//! | Pier stem | b x l x h x γc |
//! | Footing | L_f x B_f x t_f x γc |
//!
//! ## Live Load
//!
//! Total = reaction x impact factor, with impact 1.25 for spans over 9 m and
//! 1.5 otherwise. The reaction acts at a longitudinal eccentricity from the
//! pier axis, giving a moment of reaction x eccentricity.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::load_analysis::{calculate, LoadInput};
//! use bridge_core::config::DesignConfig;
//! use bridge_core::input::DesignInput;
//!
//! let loads = calculate(&LoadInput::from_design(&DesignInput::default()), &DesignConfig::default()).unwrap();
//! assert_eq!(loads.live_load.impact_factor, 1.25);
//! assert!(loads.reconciles());
//! assert_eq!(loads.governing.combination.name, "LC1");
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, positive, DesignConfig};
use crate::errors::{CalcError, CalcResult};
use crate::input::{DesignInput, IrcLoadClass};
use crate::loads::{evaluate_combinations, find_governing_combination, CombinationResult, LoadCase, LoadType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadInput {
    pub effective_span_m: f64,
    pub bridge_width_m: f64,
    pub slab_thickness_m: f64,
    pub wearing_coat_thickness_m: f64,
    pub footpath_width_m: f64,
    pub footpath_thickness_m: f64,
    pub cap_length_m: f64,
    pub cap_width_m: f64,
    pub cap_thickness_m: f64,
    pub stem_width_m: f64,
    pub stem_length_m: f64,
    pub stem_height_m: f64,
    pub footing_length_m: f64,
    pub footing_width_m: f64,
    pub footing_thickness_m: f64,
    pub concrete_unit_weight_kn_m3: f64,
    pub wearing_coat_unit_weight_kn_m3: f64,
    pub irc_class: IrcLoadClass,
    pub vertical_reaction_kn: f64,
    pub eccentricity_m: f64,
    pub wind_force_kn: f64,
    pub seismic_force_kn: f64,
}

impl LoadInput {
    pub fn from_design(input: &DesignInput) -> Self {
        LoadInput {
            effective_span_m: input.project.effective_span_m,
            bridge_width_m: input.project.bridge_width_m,
            slab_thickness_m: input.deck.slab_thickness_m,
            wearing_coat_thickness_m: input.deck.wearing_coat_thickness_m,
            footpath_width_m: input.deck.footpath_width_m,
            footpath_thickness_m: input.deck.footpath_thickness_m,
            cap_length_m: input.pier.cap_length_m,
            cap_width_m: input.pier.cap_width_m,
            cap_thickness_m: input.pier.cap_thickness_m,
            stem_width_m: input.pier.stem_width_m,
            stem_length_m: input.pier.stem_length_m,
            stem_height_m: input.pier_stem_height_m(),
            footing_length_m: input.pier.footing_length_m,
            footing_width_m: input.pier.footing_width_m,
            footing_thickness_m: input.pier.footing_thickness_m,
            concrete_unit_weight_kn_m3: input.material.concrete_unit_weight_kn_m3,
            wearing_coat_unit_weight_kn_m3: input.material.wearing_coat_unit_weight_kn_m3,
            irc_class: input.loading.irc_class,
            vertical_reaction_kn: input.loading.vertical_reaction_kn,
            eccentricity_m: input.loading.eccentricity_m,
            wind_force_kn: input.loading.wind_force_kn,
            seismic_force_kn: input.loading.seismic_force_kn,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        positive("effective_span_m", self.effective_span_m)?;
        positive("bridge_width_m", self.bridge_width_m)?;
        positive("stem_height_m", self.stem_height_m)?;
        positive("concrete_unit_weight_kn_m3", self.concrete_unit_weight_kn_m3)?;
        non_negative("wearing_coat_unit_weight_kn_m3", self.wearing_coat_unit_weight_kn_m3)?;
        non_negative("vertical_reaction_kn", self.vertical_reaction_kn)?;
        non_negative("wind_force_kn", self.wind_force_kn)?;
        non_negative("seismic_force_kn", self.seismic_force_kn)?;
        if 2.0 * self.footpath_width_m >= self.bridge_width_m {
            return Err(CalcError::invalid_input(
                "footpath_width_m",
                self.footpath_width_m.to_string(),
                "Footpaths leave no carriageway",
            ));
        }
        Ok(())
    }

    pub fn carriageway_width_m(&self) -> f64 {
        self.bridge_width_m - 2.0 * self.footpath_width_m
    }
}

/// Itemized dead load contributors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadLoadComponent {
    Slab,
    WearingCoat,
    Footpath,
    PierCap,
    PierStem,
    Footing,
}

impl DeadLoadComponent {
    pub const ALL: [DeadLoadComponent; 6] = [
        DeadLoadComponent::Slab,
        DeadLoadComponent::WearingCoat,
        DeadLoadComponent::Footpath,
        DeadLoadComponent::PierCap,
        DeadLoadComponent::PierStem,
        DeadLoadComponent::Footing,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            DeadLoadComponent::Slab => "Deck slab",
            DeadLoadComponent::WearingCoat => "Wearing coat",
            DeadLoadComponent::Footpath => "Footpaths",
            DeadLoadComponent::PierCap => "Pier cap",
            DeadLoadComponent::PierStem => "Pier stem",
            DeadLoadComponent::Footing => "Pier footing",
        }
    }

    /// Carried by the bearings rather than part of the pier itself
    pub fn is_superstructure(&self) -> bool {
        matches!(
            self,
            DeadLoadComponent::Slab | DeadLoadComponent::WearingCoat | DeadLoadComponent::Footpath
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadLoadItem {
    pub component: DeadLoadComponent,
    pub value_kn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveLoad {
    pub irc_class: IrcLoadClass,
    pub effective_span_m: f64,
    pub vertical_reaction_kn: f64,
    pub impact_factor: f64,
    /// Reaction x impact factor (kN)
    pub total_kn: f64,
    pub eccentricity_m: f64,
    /// Reaction x eccentricity, about the transverse pier axis (kN·m)
    pub longitudinal_moment_knm: f64,
}

/// Loads on one intermediate pier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSet {
    pub dead_loads: Vec<DeadLoadItem>,
    pub total_dead_load_kn: f64,
    /// Slab, wearing coat and footpaths of one span (kN)
    pub superstructure_dead_load_kn: f64,
    pub live_load: LiveLoad,
    pub wind_load_kn: f64,
    pub seismic_load_kn: f64,
    /// Unfactored actions the combinations are applied to
    pub load_case: LoadCase,
    /// Every combination, in declaration order
    pub combinations: Vec<CombinationResult>,
    /// Maximum combination (first declared wins ties)
    pub governing: CombinationResult,
}

impl LoadSet {
    /// Dead load of one component (0.0 if absent)
    pub fn dead_load(&self, component: DeadLoadComponent) -> f64 {
        self.dead_loads
            .iter()
            .find(|item| item.component == component)
            .map(|item| item.value_kn)
            .unwrap_or(0.0)
    }

    /// Total dead load equals the sum of its items
    pub fn reconciles(&self) -> bool {
        sum_items(&self.dead_loads) == self.total_dead_load_kn
            && self.live_load.vertical_reaction_kn * self.live_load.impact_factor == self.live_load.total_kn
    }

    /// Unfactored DL + LL (kN)
    pub fn service_gravity_load_kn(&self) -> f64 {
        self.total_dead_load_kn + self.live_load.total_kn
    }

    /// Ratio of the governing combination to unfactored DL + LL
    pub fn design_load_factor(&self) -> f64 {
        let service = self.service_gravity_load_kn();
        if service > 0.0 {
            self.governing.value_kn / service
        } else {
            1.0
        }
    }
}

fn sum_items(items: &[DeadLoadItem]) -> f64 {
    items.iter().map(|item| item.value_kn).sum()
}

pub fn calculate(input: &LoadInput, config: &DesignConfig) -> CalcResult<LoadSet> {
    input.validate()?;
    let constants = &config.constants;
    let gc = input.concrete_unit_weight_kn_m3;
    let span = input.effective_span_m;

    let dead_loads = vec![
        DeadLoadItem {
            component: DeadLoadComponent::Slab,
            value_kn: span * input.bridge_width_m * input.slab_thickness_m * gc,
        },
        DeadLoadItem {
            component: DeadLoadComponent::WearingCoat,
            value_kn: span
                * input.carriageway_width_m()
                * input.wearing_coat_thickness_m
                * input.wearing_coat_unit_weight_kn_m3,
        },
        DeadLoadItem {
            component: DeadLoadComponent::Footpath,
            value_kn: 2.0 * span * input.footpath_width_m * input.footpath_thickness_m * gc,
        },
        DeadLoadItem {
            component: DeadLoadComponent::PierCap,
            value_kn: input.cap_length_m * input.cap_width_m * input.cap_thickness_m * gc,
        },
        DeadLoadItem {
            component: DeadLoadComponent::PierStem,
            value_kn: input.stem_width_m * input.stem_length_m * input.stem_height_m * gc,
        },
        DeadLoadItem {
            component: DeadLoadComponent::Footing,
            value_kn: input.footing_length_m * input.footing_width_m * input.footing_thickness_m * gc,
        },
    ];
    let total_dead_load = sum_items(&dead_loads);
    let superstructure: f64 = dead_loads
        .iter()
        .filter(|item| item.component.is_superstructure())
        .map(|item| item.value_kn)
        .sum();

    let impact_factor = constants.impact_factor(span);
    let live_load = LiveLoad {
        irc_class: input.irc_class,
        effective_span_m: span,
        vertical_reaction_kn: input.vertical_reaction_kn,
        impact_factor,
        total_kn: input.vertical_reaction_kn * impact_factor,
        eccentricity_m: input.eccentricity_m,
        longitudinal_moment_knm: input.vertical_reaction_kn * input.eccentricity_m,
    };

    let load_case = LoadCase::new("Intermediate pier")
        .with_load(LoadType::Dead, total_dead_load)
        .with_load(LoadType::Live, live_load.total_kn)
        .with_load(LoadType::Wind, input.wind_force_kn)
        .with_load(LoadType::Seismic, input.seismic_force_kn);
    load_case.validate()?;

    let combinations = evaluate_combinations(&load_case, &constants.load_combinations);
    let governing = find_governing_combination(&combinations)
        .cloned()
        .ok_or_else(|| CalcError::invalid_input("load_combinations", "[]", "No load combinations configured"))?;

    tracing::debug!(
        total_dead_load_kn = total_dead_load,
        live_load_kn = live_load.total_kn,
        governing = %governing.combination.name,
        "pier loads assembled"
    );

    Ok(LoadSet {
        dead_loads,
        total_dead_load_kn: total_dead_load,
        superstructure_dead_load_kn: superstructure,
        live_load,
        wind_load_kn: input.wind_force_kn,
        seismic_load_kn: input.seismic_force_kn,
        load_case,
        combinations,
        governing,
    })
}
