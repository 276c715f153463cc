//! # Design Input Bundle
//!
//! The parameter bundle a caller hands to [`pipeline::run`](crate::pipeline::run).
//! Groups are plain data and are never mutated by the pipeline; every
//! invariant is checked once by [`DesignInput::validate`] before stage 1.
//!
//! ## Structure
//!
//! ```text
//! DesignInput
//! ├── project: ProjectParameters   (span, width, spans, skew, classification)
//! ├── soil: SoilParameters         (SBC, phi, unit weight, cohesion, mu)
//! ├── material: MaterialProperties (grades, unit weights)
//! ├── abutment_type: AbutmentType  (variant selector)
//! ├── hydraulics: HydraulicParameters
//! ├── deck: DeckParameters
//! ├── pier: PierGeometry
//! ├── loading: LiveLoadParameters
//! └── abutment: AbutmentParameters
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::input::{AbutmentType, DesignInput};
//!
//! let mut input = DesignInput::default();
//! input.project.effective_span_m = 10.0;
//! input.abutment_type = AbutmentType::Cantilever;
//! assert!(input.validate().is_ok());
//!
//! let json = serde_json::to_string(&input).unwrap();
//! let parsed = DesignInput::from_json(&json).unwrap();
//! assert_eq!(parsed, input);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, positive};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialProperties;

/// Structural classification of the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BridgeType {
    /// Solid RCC slab superstructure on piers and abutments
    #[default]
    RccSlab,
    /// Submersible (causeway-type) RCC slab bridge
    SubmersibleSlab,
}

/// IRC live load class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IrcLoadClass {
    #[serde(alias = "Class AA")]
    ClassAA,
    #[default]
    #[serde(alias = "Class 70R")]
    Class70R,
    #[serde(alias = "Class A")]
    ClassA,
}

impl IrcLoadClass {
    pub fn display_name(&self) -> &'static str {
        match self {
            IrcLoadClass::ClassAA => "IRC Class AA",
            IrcLoadClass::Class70R => "IRC Class 70R",
            IrcLoadClass::ClassA => "IRC Class A",
        }
    }
}

/// Abutment variant selector
///
/// Accepts both the structural names and the "Type-1"/"Type-2" labels.
///
/// ```rust
/// use bridge_core::input::AbutmentType;
///
/// let a: AbutmentType = serde_json::from_str("\"Type-2\"").unwrap();
/// assert_eq!(a, AbutmentType::Cantilever);
/// assert_eq!(AbutmentType::from_str_flexible("battered").unwrap(), AbutmentType::Battered);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbutmentType {
    /// Type-1: gravity abutment with battered faces
    #[default]
    #[serde(alias = "Type-1")]
    Battered,
    /// Type-2: L-shaped cantilever abutment
    #[serde(alias = "Type-2")]
    Cantilever,
}

impl AbutmentType {
    pub const ALL: [AbutmentType; 2] = [AbutmentType::Battered, AbutmentType::Cantilever];

    /// Drawing label ("Type-1" / "Type-2")
    pub fn type_label(&self) -> &'static str {
        match self {
            AbutmentType::Battered => "Type-1",
            AbutmentType::Cantilever => "Type-2",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AbutmentType::Battered => "Type-1 Battered",
            AbutmentType::Cantilever => "Type-2 Cantilever",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_uppercase().replace([' ', '_'], "-").as_str() {
            "BATTERED" | "TYPE-1" | "TYPE1" | "GRAVITY" => Ok(AbutmentType::Battered),
            "CANTILEVER" | "TYPE-2" | "TYPE2" => Ok(AbutmentType::Cantilever),
            _ => Err(CalcError::invalid_input(
                "abutment_type",
                s,
                "Expected Battered/Type-1 or Cantilever/Type-2",
            )),
        }
    }
}

impl std::fmt::Display for AbutmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Upper bound (exclusive) on the skew between flow and bridge normal
pub const MAX_SKEW_ANGLE_DEG: f64 = 55.0;

/// Bridge geometry and classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    pub bridge_name: String,
    pub location: String,
    pub bridge_type: BridgeType,
    /// Effective span of each slab (m)
    pub effective_span_m: f64,
    /// Overall deck width including footpaths (m)
    pub bridge_width_m: f64,
    pub num_spans: u32,
    /// Angle between the flow and the normal to the bridge axis (degrees)
    pub skew_angle_deg: f64,
}

/// Skew in [0, MAX_SKEW_ANGLE_DEG)
pub fn validate_skew(field: &str, skew_angle_deg: f64) -> CalcResult<()> {
    if !(0.0..MAX_SKEW_ANGLE_DEG).contains(&skew_angle_deg) {
        return Err(CalcError::invalid_input(
            field,
            skew_angle_deg.to_string(),
            format!("Skew angle must be in [0, {}) degrees", MAX_SKEW_ANGLE_DEG),
        ));
    }
    Ok(())
}

impl ProjectParameters {
    pub fn validate(&self) -> CalcResult<()> {
        positive("project.effective_span_m", self.effective_span_m)?;
        positive("project.bridge_width_m", self.bridge_width_m)?;
        if self.num_spans == 0 {
            return Err(CalcError::invalid_input(
                "project.num_spans",
                "0",
                "A bridge needs at least one span",
            ));
        }
        validate_skew("project.skew_angle_deg", self.skew_angle_deg)?;
        Ok(())
    }

    /// Overall length between abutment faces (m)
    pub fn bridge_length_m(&self) -> f64 {
        f64::from(self.num_spans) * self.effective_span_m
    }

    pub fn num_piers(&self) -> u32 {
        self.num_spans.saturating_sub(1)
    }

    pub fn deck_area_m2(&self) -> f64 {
        self.bridge_length_m() * self.bridge_width_m
    }
}

/// Founding soil properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilParameters {
    /// Safe bearing capacity (kN/m²)
    pub safe_bearing_capacity_kn_m2: f64,
    /// Angle of internal friction (degrees)
    pub friction_angle_deg: f64,
    /// Unit weight of soil and backfill (kN/m³)
    pub unit_weight_kn_m3: f64,
    /// Cohesion (kN/m²)
    pub cohesion_kn_m2: f64,
    /// Base friction coefficient mu
    pub friction_coefficient: f64,
}

impl SoilParameters {
    pub fn validate(&self) -> CalcResult<()> {
        positive("soil.safe_bearing_capacity_kn_m2", self.safe_bearing_capacity_kn_m2)?;
        if !(0.0..=45.0).contains(&self.friction_angle_deg) {
            return Err(CalcError::invalid_input(
                "soil.friction_angle_deg",
                self.friction_angle_deg.to_string(),
                "Angle of internal friction must be between 0 and 45 degrees",
            ));
        }
        positive("soil.unit_weight_kn_m3", self.unit_weight_kn_m3)?;
        non_negative("soil.cohesion_kn_m2", self.cohesion_kn_m2)?;
        positive("soil.friction_coefficient", self.friction_coefficient)?;
        Ok(())
    }
}

impl Default for SoilParameters {
    fn default() -> Self {
        SoilParameters {
            safe_bearing_capacity_kn_m2: 450.0,
            friction_angle_deg: 30.0,
            unit_weight_kn_m3: 18.0,
            cohesion_kn_m2: 15.0,
            friction_coefficient: 0.45,
        }
    }
}

/// One point of a river cross-section survey
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    /// Chainage across the river (m)
    pub offset_m: f64,
    /// Ground level (m, same datum as HFL)
    pub level_m: f64,
}

/// Waterway geometry at HFL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CrossSection {
    /// Area, wetted perimeter and surface width measured directly
    Measured {
        area_m2: f64,
        wetted_perimeter_m: f64,
        surface_width_m: f64,
    },
    /// Survey points, integrated up to HFL
    Surveyed { points: Vec<SurveyPoint> },
}

/// River and flood data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicParameters {
    /// Design flood discharge (m³/s)
    pub discharge_cumecs: f64,
    pub cross_section: CrossSection,
    /// Highest flood level (m)
    pub hfl_m: f64,
    /// Lowest bed level at the bridge site (m)
    pub bed_level_m: f64,
    pub manning_n: f64,
    /// Bed slope expressed as "1 in N"
    pub bed_slope_one_in: f64,
    /// Lacey silt factor f
    pub silt_factor: f64,
    /// Clearance from HFL to road level (m)
    pub freeboard_m: f64,
}

impl HydraulicParameters {
    pub fn validate(&self) -> CalcResult<()> {
        positive("hydraulics.discharge_cumecs", self.discharge_cumecs)?;
        positive("hydraulics.manning_n", self.manning_n)?;
        positive("hydraulics.bed_slope_one_in", self.bed_slope_one_in)?;
        positive("hydraulics.silt_factor", self.silt_factor)?;
        non_negative("hydraulics.freeboard_m", self.freeboard_m)?;
        if !(self.hfl_m > self.bed_level_m) {
            return Err(CalcError::invalid_input(
                "hydraulics.hfl_m",
                self.hfl_m.to_string(),
                format!("HFL must be above the bed level {}", self.bed_level_m),
            ));
        }
        match &self.cross_section {
            CrossSection::Measured {
                area_m2,
                wetted_perimeter_m,
                surface_width_m,
            } => {
                positive("hydraulics.cross_section.area_m2", *area_m2)?;
                positive("hydraulics.cross_section.wetted_perimeter_m", *wetted_perimeter_m)?;
                positive("hydraulics.cross_section.surface_width_m", *surface_width_m)?;
            }
            CrossSection::Surveyed { points } => {
                if points.len() < 2 {
                    return Err(CalcError::invalid_input(
                        "hydraulics.cross_section.points",
                        points.len().to_string(),
                        "A surveyed section needs at least two points",
                    ));
                }
                if points.windows(2).any(|w| !(w[1].offset_m > w[0].offset_m)) {
                    return Err(CalcError::invalid_input(
                        "hydraulics.cross_section.points",
                        format!("{} points", points.len()),
                        "Survey offsets must be strictly increasing",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Water depth above the lowest bed level (m)
    pub fn flow_depth_m(&self) -> f64 {
        self.hfl_m - self.bed_level_m
    }

    /// Road level (m)
    pub fn deck_level_m(&self) -> f64 {
        self.hfl_m + self.freeboard_m
    }
}

/// Superstructure slab and footpaths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckParameters {
    pub slab_thickness_m: f64,
    pub wearing_coat_thickness_m: f64,
    /// Width of each footpath (two footpaths)
    pub footpath_width_m: f64,
    pub footpath_thickness_m: f64,
}

impl DeckParameters {
    pub fn validate(&self, bridge_width_m: f64) -> CalcResult<()> {
        positive("deck.slab_thickness_m", self.slab_thickness_m)?;
        non_negative("deck.wearing_coat_thickness_m", self.wearing_coat_thickness_m)?;
        non_negative("deck.footpath_width_m", self.footpath_width_m)?;
        non_negative("deck.footpath_thickness_m", self.footpath_thickness_m)?;
        if 2.0 * self.footpath_width_m >= bridge_width_m {
            return Err(CalcError::invalid_input(
                "deck.footpath_width_m",
                self.footpath_width_m.to_string(),
                "Footpaths leave no carriageway",
            ));
        }
        Ok(())
    }
}

/// Intermediate pier and its open footing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PierGeometry {
    /// Stem dimension along the bridge axis, facing the flow (m)
    pub stem_width_m: f64,
    /// Stem dimension parallel to the flow (m)
    pub stem_length_m: f64,
    /// Cap dimension across the bridge (m)
    pub cap_length_m: f64,
    /// Cap dimension along the bridge (m)
    pub cap_width_m: f64,
    pub cap_thickness_m: f64,
    /// Footing dimension along the bridge axis (m)
    pub footing_length_m: f64,
    /// Footing dimension across the bridge (m)
    pub footing_width_m: f64,
    pub footing_thickness_m: f64,
    /// Level of the footing underside (m)
    pub founding_level_m: f64,
}

impl PierGeometry {
    pub fn validate(&self) -> CalcResult<()> {
        positive("pier.stem_width_m", self.stem_width_m)?;
        positive("pier.stem_length_m", self.stem_length_m)?;
        positive("pier.cap_length_m", self.cap_length_m)?;
        positive("pier.cap_width_m", self.cap_width_m)?;
        positive("pier.cap_thickness_m", self.cap_thickness_m)?;
        positive("pier.footing_length_m", self.footing_length_m)?;
        positive("pier.footing_width_m", self.footing_width_m)?;
        positive("pier.footing_thickness_m", self.footing_thickness_m)?;
        if self.footing_length_m < self.stem_width_m || self.footing_width_m < self.stem_length_m {
            return Err(CalcError::invalid_input(
                "pier.footing_length_m",
                format!("{} x {}", self.footing_length_m, self.footing_width_m),
                "Footing must be at least as large as the pier stem",
            ));
        }
        Ok(())
    }

    pub fn footing_top_level_m(&self) -> f64 {
        self.founding_level_m + self.footing_thickness_m
    }
}

/// Vehicular and lateral actions on a pier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveLoadParameters {
    pub irc_class: IrcLoadClass,
    /// Maximum pier reaction from the IRC vehicle, before impact (kN)
    pub vertical_reaction_kn: f64,
    /// Longitudinal eccentricity of the live reaction from the pier axis (m)
    pub eccentricity_m: f64,
    /// Transverse wind force on the superstructure (kN)
    pub wind_force_kn: f64,
    /// Longitudinal seismic force from the superstructure (kN)
    pub seismic_force_kn: f64,
}

impl LiveLoadParameters {
    pub fn validate(&self) -> CalcResult<()> {
        non_negative("loading.vertical_reaction_kn", self.vertical_reaction_kn)?;
        non_negative("loading.eccentricity_m", self.eccentricity_m)?;
        non_negative("loading.wind_force_kn", self.wind_force_kn)?;
        non_negative("loading.seismic_force_kn", self.seismic_force_kn)?;
        Ok(())
    }
}

/// Battered (gravity) abutment proportions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteredGeometry {
    pub stem_top_width_m: f64,
    /// Horizontal run per unit height on each face
    pub batter: f64,
    pub toe_length_m: f64,
    pub heel_length_m: f64,
    pub base_thickness_m: f64,
}

/// Cantilever (L-shaped) abutment proportions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CantileverGeometry {
    pub stem_thickness_m: f64,
    pub toe_length_m: f64,
    pub heel_length_m: f64,
    pub base_thickness_m: f64,
}

/// Return walls on either side of the abutment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingWalls {
    pub count: u32,
    pub length_m: f64,
    pub height_m: f64,
    pub thickness_m: f64,
}

impl WingWalls {
    pub fn volume_m3(&self) -> f64 {
        f64::from(self.count) * self.length_m * self.height_m * self.thickness_m
    }
}

/// Both abutment variants are sized from the same parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbutmentParameters {
    /// Level of the abutment base underside (m)
    pub founding_level_m: f64,
    pub battered: BatteredGeometry,
    pub cantilever: CantileverGeometry,
    pub wing_walls: WingWalls,
}

impl AbutmentParameters {
    pub fn validate(&self, deck_level_m: f64) -> CalcResult<()> {
        let b = &self.battered;
        positive("abutment.battered.stem_top_width_m", b.stem_top_width_m)?;
        non_negative("abutment.battered.batter", b.batter)?;
        non_negative("abutment.battered.toe_length_m", b.toe_length_m)?;
        non_negative("abutment.battered.heel_length_m", b.heel_length_m)?;
        positive("abutment.battered.base_thickness_m", b.base_thickness_m)?;

        let c = &self.cantilever;
        positive("abutment.cantilever.stem_thickness_m", c.stem_thickness_m)?;
        non_negative("abutment.cantilever.toe_length_m", c.toe_length_m)?;
        non_negative("abutment.cantilever.heel_length_m", c.heel_length_m)?;
        positive("abutment.cantilever.base_thickness_m", c.base_thickness_m)?;

        let w = &self.wing_walls;
        non_negative("abutment.wing_walls.length_m", w.length_m)?;
        non_negative("abutment.wing_walls.height_m", w.height_m)?;
        non_negative("abutment.wing_walls.thickness_m", w.thickness_m)?;

        let height = deck_level_m - self.founding_level_m;
        let thickest_base = b.base_thickness_m.max(c.base_thickness_m);
        if !(height > thickest_base) {
            return Err(CalcError::invalid_input(
                "abutment.founding_level_m",
                self.founding_level_m.to_string(),
                format!(
                    "Abutment height {:.3} m leaves no stem above a {:.3} m base",
                    height, thickest_base
                ),
            ));
        }
        Ok(())
    }
}

/// The complete parameter bundle for one design run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignInput {
    pub project: ProjectParameters,
    pub soil: SoilParameters,
    pub material: MaterialProperties,
    pub abutment_type: AbutmentType,
    pub hydraulics: HydraulicParameters,
    pub deck: DeckParameters,
    pub pier: PierGeometry,
    pub loading: LiveLoadParameters,
    pub abutment: AbutmentParameters,
}

impl DesignInput {
    /// Parse a bundle from JSON, reporting absent fields as `MissingField`
    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(|e| CalcError::from_json_error(&e))
    }

    /// Validate every group, plus the cross-group level checks
    pub fn validate(&self) -> CalcResult<()> {
        self.project.validate()?;
        self.soil.validate()?;
        self.material.validate()?;
        self.hydraulics.validate()?;
        self.deck.validate(self.project.bridge_width_m)?;
        self.pier.validate()?;
        self.loading.validate()?;
        self.abutment.validate(self.deck_level_m())?;

        let stem_height = self.pier_stem_height_m();
        if !(stem_height > 0.0) {
            return Err(CalcError::invalid_input(
                "pier.founding_level_m",
                self.pier.founding_level_m.to_string(),
                format!("Pier stem height {:.3} m is not positive for the given levels", stem_height),
            ));
        }
        if self.pier.footing_top_level_m() > self.hydraulics.hfl_m {
            return Err(CalcError::invalid_input(
                "pier.founding_level_m",
                self.pier.founding_level_m.to_string(),
                "Pier footing must lie below HFL",
            ));
        }
        Ok(())
    }

    /// Road level (m)
    pub fn deck_level_m(&self) -> f64 {
        self.hydraulics.deck_level_m()
    }

    /// Underside of the deck slab (m)
    pub fn soffit_level_m(&self) -> f64 {
        self.deck_level_m() - self.deck.wearing_coat_thickness_m - self.deck.slab_thickness_m
    }

    /// Underside of the pier cap (m)
    pub fn cap_bottom_level_m(&self) -> f64 {
        self.soffit_level_m() - self.pier.cap_thickness_m
    }

    /// Clear height of the pier stem between footing and cap (m)
    pub fn pier_stem_height_m(&self) -> f64 {
        self.cap_bottom_level_m() - self.pier.footing_top_level_m()
    }
}

impl Default for DesignInput {
    fn default() -> Self {
        DesignInput {
            project: ProjectParameters {
                bridge_name: "Slab Bridge".to_string(),
                location: String::new(),
                bridge_type: BridgeType::RccSlab,
                effective_span_m: 9.6,
                bridge_width_m: 12.0,
                num_spans: 3,
                skew_angle_deg: 0.0,
            },
            soil: SoilParameters::default(),
            material: MaterialProperties::default(),
            abutment_type: AbutmentType::Battered,
            hydraulics: HydraulicParameters {
                discharge_cumecs: 1265.76,
                cross_section: CrossSection::Measured {
                    area_m2: 490.3,
                    wetted_perimeter_m: 175.43,
                    surface_width_m: 170.0,
                },
                hfl_m: 101.2,
                bed_level_m: 95.0,
                manning_n: 0.033,
                bed_slope_one_in: 975.0,
                silt_factor: 1.5,
                freeboard_m: 1.2,
            },
            deck: DeckParameters {
                slab_thickness_m: 0.6,
                wearing_coat_thickness_m: 0.065,
                footpath_width_m: 1.5,
                footpath_thickness_m: 0.25,
            },
            pier: PierGeometry {
                stem_width_m: 1.5,
                stem_length_m: 8.0,
                cap_length_m: 11.0,
                cap_width_m: 1.5,
                cap_thickness_m: 0.6,
                footing_length_m: 3.5,
                footing_width_m: 9.0,
                footing_thickness_m: 1.2,
                founding_level_m: 93.49,
            },
            loading: LiveLoadParameters {
                irc_class: IrcLoadClass::Class70R,
                vertical_reaction_kn: 1950.0,
                eccentricity_m: 1.0,
                wind_force_kn: 125.0,
                seismic_force_kn: 180.0,
            },
            abutment: AbutmentParameters {
                founding_level_m: 97.4,
                battered: BatteredGeometry {
                    stem_top_width_m: 1.0,
                    batter: 0.1,
                    toe_length_m: 0.5,
                    heel_length_m: 0.5,
                    base_thickness_m: 1.0,
                },
                cantilever: CantileverGeometry {
                    stem_thickness_m: 0.6,
                    toe_length_m: 1.5,
                    heel_length_m: 3.0,
                    base_thickness_m: 1.0,
                },
                wing_walls: WingWalls {
                    count: 2,
                    length_m: 6.0,
                    height_m: 2.5,
                    thickness_m: 0.3,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_input_is_valid() {
        assert!(DesignInput::default().validate().is_ok());
    }

    #[test]
    fn test_default_levels() {
        let input = DesignInput::default();
        assert!((input.deck_level_m() - 102.4).abs() < 1e-9);
        assert!((input.soffit_level_m() - 101.735).abs() < 1e-9);
        assert!((input.pier_stem_height_m() - 6.445).abs() < 1e-9);
    }

    #[test]
    fn test_friction_angle_out_of_range() {
        let mut input = DesignInput::default();
        input.soil.friction_angle_deg = 46.0;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "soil.friction_angle_deg"));
    }

    #[test]
    fn test_zero_bearing_capacity_rejected() {
        let mut input = DesignInput::default();
        input.soil.safe_bearing_capacity_kn_m2 = 0.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_zero_wetted_perimeter_rejected() {
        let mut input = DesignInput::default();
        input.hydraulics.cross_section = CrossSection::Measured {
            area_m2: 490.3,
            wetted_perimeter_m: 0.0,
            surface_width_m: 170.0,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_unsorted_survey_rejected() {
        let mut input = DesignInput::default();
        input.hydraulics.cross_section = CrossSection::Surveyed {
            points: vec![
                SurveyPoint { offset_m: 0.0, level_m: 102.0 },
                SurveyPoint { offset_m: 10.0, level_m: 96.0 },
                SurveyPoint { offset_m: 5.0, level_m: 102.0 },
            ],
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_pier_stem_must_have_height() {
        let mut input = DesignInput::default();
        input.pier.founding_level_m = 100.5;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_missing_field_reported_by_name() {
        let mut value = serde_json::to_value(DesignInput::default()).unwrap();
        value["soil"]
            .as_object_mut()
            .unwrap()
            .remove("safe_bearing_capacity_kn_m2");
        let err = DesignInput::from_json(&value.to_string()).unwrap_err();
        assert_eq!(err, CalcError::missing_field("safe_bearing_capacity_kn_m2"));
    }

    #[test]
    fn test_variant_selector_aliases() {
        let battered: AbutmentType = serde_json::from_str("\"Type-1\"").unwrap();
        let cantilever: AbutmentType = serde_json::from_str("\"Cantilever\"").unwrap();
        assert_eq!(battered, AbutmentType::Battered);
        assert_eq!(cantilever, AbutmentType::Cantilever);
        assert!(AbutmentType::from_str_flexible("arch").is_err());
    }

    #[test]
    fn test_single_span_has_no_piers() {
        let mut input = DesignInput::default();
        input.project.num_spans = 1;
        assert_eq!(input.project.num_piers(), 0);
        assert!((input.project.bridge_length_m() - 9.6).abs() < 1e-12);
    }
}
