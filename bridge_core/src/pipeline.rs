//! # Design Pipeline
//!
//! Runs every stage in order on one input bundle and collects the results
//! into a single [`DesignReport`].
//!
//! ```text
//! Hydraulics → Scour → Loads → Pier stability → Foundation
//!            → Abutments (both variants) → Reinforcement → Estimate
//! ```
//!
//! A run is pure: the same input and configuration always produce the same
//! report, identified by a SHA-256 fingerprint. Invalid input and a footing
//! search that never converges stop the run with a [`CalcError`]. Failing
//! checks do not: the report is still produced and its
//! [`DesignStatus::Failed`] lists every failure.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::config::DesignConfig;
//! use bridge_core::input::DesignInput;
//! use bridge_core::pipeline::{run, DesignStatus};
//!
//! let report = run(&DesignInput::default(), &DesignConfig::default()).unwrap();
//! // A 1265 cumec flood through three 9.6 m spans overtops the afflux limit
//! assert!(matches!(report.design_status, DesignStatus::Failed { .. }));
//! assert_eq!(report.fingerprint.len(), 64);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::calculations::abutment::{self, AbutmentComparison, AbutmentDesign, AbutmentInput};
use crate::calculations::estimate::{self, EstimateInput, EstimationResult};
use crate::calculations::foundation::{self, FoundationInput, FoundationResult};
use crate::calculations::hydraulics::{self, HydraulicInput, HydraulicResult};
use crate::calculations::load_analysis::{self, DeadLoadComponent, LoadInput, LoadSet};
use crate::calculations::pier_stability::{self, StabilityInput, StabilityResult};
use crate::calculations::reinforcement::{self, ReinforcementInput, ReinforcementResult};
use crate::calculations::scour::{self, ScourInput, ScourResult};
use crate::calculations::Stage;
use crate::config::{DesignConfig, FoundationMode};
use crate::errors::{CalcError, CalcResult};
use crate::input::{DesignInput, ProjectParameters};
use crate::loads::{find_governing_for, LimitState, LoadType};

/// One check that did not pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedCheck {
    pub stage: Stage,
    pub check: String,
    pub detail: String,
}

impl FailedCheck {
    fn new(stage: Stage, check: impl Into<String>, detail: impl Into<String>) -> Self {
        FailedCheck {
            stage,
            check: check.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DesignStatus {
    Completed,
    Failed { failures: Vec<FailedCheck> },
}

impl DesignStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, DesignStatus::Completed)
    }

    pub fn failures(&self) -> &[FailedCheck] {
        match self {
            DesignStatus::Completed => &[],
            DesignStatus::Failed { failures } => failures,
        }
    }
}

/// Everything one run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignReport {
    /// SHA-256 over the input and configuration (hex)
    pub fingerprint: String,
    pub constants_edition: String,
    pub project: ProjectParameters,
    pub hydraulics: HydraulicResult,
    pub scour: ScourResult,
    pub loads: LoadSet,
    pub pier_stability: StabilityResult,
    pub foundation: FoundationResult,
    pub abutments: AbutmentComparison,
    pub reinforcement: ReinforcementResult,
    pub estimate: EstimationResult,
    pub design_status: DesignStatus,
}

impl DesignReport {
    pub fn passes(&self) -> bool {
        self.design_status.is_completed()
    }

    pub fn selected_abutment(&self) -> &AbutmentDesign {
        self.abutments.selected()
    }
}

/// Fingerprint of a run: SHA-256 over the canonical JSON of input and
/// configuration plus the crate version
pub fn fingerprint(input: &DesignInput, config: &DesignConfig) -> CalcResult<String> {
    let mut hasher = Sha256::new();

    let input_json = serde_json::to_string(input).map_err(|e| CalcError::from_json_error(&e))?;
    hasher.update(input_json.as_bytes());

    let config_json = serde_json::to_string(config).map_err(|e| CalcError::from_json_error(&e))?;
    hasher.update(config_json.as_bytes());

    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());

    Ok(format!("{:x}", hasher.finalize()))
}

/// Run the full design
pub fn run(input: &DesignInput, config: &DesignConfig) -> CalcResult<DesignReport> {
    let fingerprint = fingerprint(input, config)?;
    let _span = tracing::info_span!("design_run", fingerprint = %&fingerprint[..12]).entered();

    config.validate()?;
    input.validate()?;
    info!(bridge = %input.project.bridge_name, spans = input.project.num_spans, "Starting design run");

    let hydraulics = hydraulics::calculate(&HydraulicInput::from_design(input), config)?;
    info!(
        velocity_m_s = hydraulics.design_velocity_m_s,
        afflux_m = hydraulics.afflux_m,
        "hydraulics complete"
    );

    let scour = scour::calculate(
        &ScourInput {
            discharge_cumecs: input.hydraulics.discharge_cumecs,
            silt_factor: input.hydraulics.silt_factor,
            pier_width_m: input.pier.stem_width_m,
            velocity_m_s: hydraulics.design_velocity_m_s,
            hfl_m: input.hydraulics.hfl_m,
            founding_level_m: input.pier.founding_level_m,
        },
        config,
    )?;
    info!(design_scour_m = scour.design_scour_depth_m, "scour complete");

    let loads = load_analysis::calculate(&LoadInput::from_design(input), config)?;
    info!(
        dead_load_kn = loads.total_dead_load_kn,
        governing = %loads.governing.combination.name,
        "loads complete"
    );

    let stability = pier_stability::calculate(&StabilityInput::from_design(input, &loads, &hydraulics, config), config)?;
    info!(
        overturning_sf = stability.overturning_sf,
        sliding_sf = stability.sliding_sf,
        "pier stability complete"
    );

    let footing = pier_foundation(input, &loads, &stability, config)?;
    info!(
        length_m = footing.length_m,
        width_m = footing.width_m,
        utilization = footing.utilization,
        "pier foundation complete"
    );

    let abutments = abutment::calculate(&AbutmentInput::from_design(input, &loads), input.abutment_type, config)?;
    info!(recommended = %abutments.summary.recommended, "abutments complete");

    let mut sections = ReinforcementInput::pier_sections(input, &loads, &stability, &footing, config)?;
    let mut abutment_stem = abutments.selected().stem_section.clone();
    abutment_stem.members = 2;
    sections.push(abutment_stem);
    let reinforcement = reinforcement::calculate(
        &ReinforcementInput {
            fy_mpa: input.material.fy_mpa(),
            design_load_factor: loads.design_load_factor(),
            sections,
        },
        config,
    )?;
    info!(steel_kg = reinforcement.total_weight_kg, "reinforcement complete");

    let estimate = estimate::calculate(
        &EstimateInput::from_design(input, &footing, &reinforcement, abutments.selected(), config),
        &config.rates,
    )?;
    info!(total_cost = estimate.total_cost, "estimate complete");

    let failures = collect_failures(&hydraulics, &scour, &stability, &footing, &abutments);
    let design_status = if failures.is_empty() {
        DesignStatus::Completed
    } else {
        tracing::warn!(failures = failures.len(), "design has failing checks");
        DesignStatus::Failed { failures }
    };

    Ok(DesignReport {
        fingerprint,
        constants_edition: config.constants.edition.clone(),
        project: input.project.clone(),
        hydraulics,
        scour,
        loads,
        pier_stability: stability,
        foundation: footing,
        abutments,
        reinforcement,
        estimate,
        design_status,
    })
}

/// Bearing of the pier footing under the governing serviceability combination
fn pier_foundation(
    input: &DesignInput,
    loads: &LoadSet,
    stability: &StabilityResult,
    config: &DesignConfig,
) -> CalcResult<FoundationResult> {
    let service = find_governing_for(&loads.combinations, LimitState::Serviceability).ok_or_else(|| {
        CalcError::invalid_input(
            "load_combinations",
            format!("{} combinations", loads.combinations.len()),
            "A serviceability combination is required for bearing checks",
        )
    })?;
    let combo = &service.combination;
    let moments = stability.combination(&combo.name).ok_or_else(|| CalcError::Internal {
        message: format!("No stability row for {}", combo.name),
    })?;

    let dead_without_footing = loads.total_dead_load_kn - loads.dead_load(DeadLoadComponent::Footing);
    let foundation_input = FoundationInput {
        vertical_load_kn: combo.get_factor(LoadType::Dead) * dead_without_footing
            + combo.get_factor(LoadType::Live) * loads.live_load.total_kn,
        longitudinal_moment_knm: moments.longitudinal_moment_knm,
        transverse_moment_knm: moments.transverse_moment_knm,
        length_m: input.pier.footing_length_m,
        width_m: input.pier.footing_width_m,
        thickness_m: input.pier.footing_thickness_m,
        footing_unit_weight_kn_m3: input.material.concrete_unit_weight_kn_m3,
        safe_bearing_capacity_kn_m2: input.soil.safe_bearing_capacity_kn_m2,
    };

    match config.footing.mode {
        FoundationMode::Check => foundation::check(&foundation_input),
        FoundationMode::Design => foundation::design(
            &foundation_input,
            input.pier.stem_width_m,
            input.pier.stem_length_m,
            &config.footing,
        ),
    }
}

fn collect_failures(
    hydraulics: &HydraulicResult,
    scour: &ScourResult,
    stability: &StabilityResult,
    footing: &FoundationResult,
    abutments: &AbutmentComparison,
) -> Vec<FailedCheck> {
    let mut failures = Vec::new();

    if !hydraulics.afflux_ok {
        failures.push(FailedCheck::new(
            Stage::Hydraulics,
            "afflux",
            format!(
                "Afflux {:.3} m is not below the allowable {:.3} m",
                hydraulics.afflux_m, hydraulics.allowable_afflux_m
            ),
        ));
    }
    if !scour.foundation_adequate {
        failures.push(FailedCheck::new(
            Stage::Scour,
            "founding level",
            format!(
                "Pier founded at {:.3} m, needs {:.3} m or lower (scour level {:.3} m less {:.2} m margin)",
                scour.provided_foundation_level_m,
                scour.required_foundation_level_m - scour.safety_margin_m,
                scour.required_foundation_level_m,
                scour.safety_margin_m
            ),
        ));
    }
    if !stability.uplift_combinations.is_empty() {
        failures.push(FailedCheck::new(
            Stage::PierStability,
            "uplift",
            format!(
                "Buoyancy {:.1} kN exceeds the vertical load under {}",
                stability.buoyancy_kn,
                stability.uplift_combinations.join(", ")
            ),
        ));
    }
    if !stability.overturning_ok {
        failures.push(FailedCheck::new(
            Stage::PierStability,
            "overturning",
            format!(
                "SF {:.2} under {} is below {:.2}",
                stability.overturning_sf, stability.critical_overturning_combination, stability.min_overturning_sf
            ),
        ));
    }
    if !stability.sliding_ok {
        failures.push(FailedCheck::new(
            Stage::PierStability,
            "sliding",
            format!(
                "SF {:.2} under {} is below {:.2}",
                stability.sliding_sf, stability.critical_sliding_combination, stability.min_sliding_sf
            ),
        ));
    }
    bearing_failures(Stage::Foundation, "pier footing", footing, &mut failures);

    for design in [&abutments.battered, &abutments.cantilever] {
        let label = design.variant.display_name();
        if !design.overturning_ok {
            failures.push(FailedCheck::new(
                Stage::Abutment,
                format!("{label} overturning"),
                format!("SF {:.2}", design.overturning_sf),
            ));
        }
        if !design.sliding_ok {
            failures.push(FailedCheck::new(
                Stage::Abutment,
                format!("{label} sliding"),
                format!("SF {:.2}", design.sliding_sf),
            ));
        }
        bearing_failures(Stage::Abutment, label, &design.bearing, &mut failures);
    }
    failures
}

fn bearing_failures(stage: Stage, label: &str, bearing: &FoundationResult, failures: &mut Vec<FailedCheck>) {
    if !bearing.bearing_ok {
        failures.push(FailedCheck::new(
            stage,
            format!("{label} bearing"),
            format!(
                "σmax {:.1} kN/m² exceeds SBC {:.1} kN/m²",
                bearing.max_pressure_kn_m2, bearing.safe_bearing_capacity_kn_m2
            ),
        ));
    }
    if bearing.area_in_tension {
        failures.push(FailedCheck::new(
            stage,
            format!("{label} tension"),
            format!(
                "σmin {:.1} kN/m², {:.2} m² of base in tension",
                bearing.min_pressure_kn_m2, bearing.tension_area_m2
            ),
        ));
    }
}

struct CacheEntries {
    reports: HashMap<String, Arc<DesignReport>>,
    order: VecDeque<String>,
}

/// Memoized design runs keyed by fingerprint
///
/// Holds at most `capacity` reports, evicting the oldest first. Failed runs
/// (errors) are never stored.
pub struct DesignCache {
    capacity: usize,
    entries: Mutex<CacheEntries>,
}

impl DesignCache {
    pub fn new(capacity: usize) -> Self {
        DesignCache {
            capacity: capacity.max(1),
            entries: Mutex::new(CacheEntries {
                reports: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Cached report for this input, running the design on a miss
    pub fn get_or_run(&self, input: &DesignInput, config: &DesignConfig) -> CalcResult<Arc<DesignReport>> {
        let key = fingerprint(input, config)?;
        if let Some(report) = self.lock()?.reports.get(&key) {
            tracing::debug!(fingerprint = %&key[..12], "design cache hit");
            return Ok(Arc::clone(report));
        }

        let report = Arc::new(run(input, config)?);

        let mut entries = self.lock()?;
        if let Some(existing) = entries.reports.get(&key) {
            return Ok(Arc::clone(existing));
        }
        while entries.order.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.reports.remove(&oldest);
                }
                None => break,
            }
        }
        entries.order.push_back(key.clone());
        entries.reports.insert(key, Arc::clone(&report));
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.reports.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> CalcResult<std::sync::MutexGuard<'_, CacheEntries>> {
        self.entries.lock().map_err(|_| CalcError::Internal {
            message: "design cache lock poisoned".to_string(),
        })
    }
}

impl Default for DesignCache {
    fn default() -> Self {
        DesignCache::new(32)
    }
}
