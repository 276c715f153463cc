//! # Hydraulic Analysis
//!
//! Waterway adequacy of the bridge opening at the design flood.
//!
//! ## Method
//!
//! - Design velocity by continuity: V = Q / A
//! - Manning velocity: V = (1/n) R^(2/3) S^(1/2), with R = A / P
//! - Lacey regime width: W = C sqrt(Q)
//! - Afflux (Molesworth): h = (V²/17.85 + 0.0152)(A/a − 1)
//!
//! The obstructed area `a` is the effective linear waterway (bridge length,
//! capped at the water surface width, less pier widths) projected normal to
//! the flow and multiplied by the mean flow depth.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::hydraulics::{calculate, HydraulicInput};
//! use bridge_core::config::DesignConfig;
//! use bridge_core::input::DesignInput;
//!
//! let input = HydraulicInput::from_design(&DesignInput::default());
//! let result = calculate(&input, &DesignConfig::default()).unwrap();
//! assert!((result.design_velocity_m_s - 2.5816).abs() < 1e-4);
//! assert!(result.afflux_m >= 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, positive, DesignConfig};
use crate::errors::{CalcError, CalcResult};
use crate::input::{validate_skew, CrossSection, DesignInput, SurveyPoint};

/// Inputs to the hydraulic stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicInput {
    pub discharge_cumecs: f64,
    pub cross_section: CrossSection,
    pub hfl_m: f64,
    pub manning_n: f64,
    pub bed_slope_one_in: f64,
    /// Overall bridge length between abutments (m)
    pub bridge_length_m: f64,
    pub num_piers: u32,
    /// Pier width facing the flow (m)
    pub pier_width_m: f64,
    pub skew_angle_deg: f64,
}

impl HydraulicInput {
    pub fn from_design(input: &DesignInput) -> Self {
        HydraulicInput {
            discharge_cumecs: input.hydraulics.discharge_cumecs,
            cross_section: input.hydraulics.cross_section.clone(),
            hfl_m: input.hydraulics.hfl_m,
            manning_n: input.hydraulics.manning_n,
            bed_slope_one_in: input.hydraulics.bed_slope_one_in,
            bridge_length_m: input.project.bridge_length_m(),
            num_piers: input.project.num_piers(),
            pier_width_m: input.pier.stem_width_m,
            skew_angle_deg: input.project.skew_angle_deg,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        positive("discharge_cumecs", self.discharge_cumecs)?;
        positive("manning_n", self.manning_n)?;
        positive("bed_slope_one_in", self.bed_slope_one_in)?;
        positive("bridge_length_m", self.bridge_length_m)?;
        non_negative("pier_width_m", self.pier_width_m)?;
        validate_skew("skew_angle_deg", self.skew_angle_deg)
    }
}

/// Area, wetted perimeter and surface width of the flow at HFL
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub area_m2: f64,
    pub wetted_perimeter_m: f64,
    pub surface_width_m: f64,
}

/// Resolve the cross-section to flow properties at the given water level.
///
/// Survey points are integrated segment by segment with the trapezoidal
/// rule; a segment crossing the waterline is cut at the interpolated edge.
///
/// ```rust
/// use bridge_core::calculations::hydraulics::section_properties;
/// use bridge_core::input::{CrossSection, SurveyPoint};
///
/// // 10 m wide rectangular channel, 2 m deep
/// let section = CrossSection::Surveyed {
///     points: vec![
///         SurveyPoint { offset_m: 0.0, level_m: 100.0 },
///         SurveyPoint { offset_m: 0.0001, level_m: 98.0 },
///         SurveyPoint { offset_m: 10.0001, level_m: 98.0 },
///         SurveyPoint { offset_m: 10.0002, level_m: 100.0 },
///     ],
/// };
/// let props = section_properties(&section, 100.0).unwrap();
/// assert!((props.area_m2 - 20.0).abs() < 1e-3);
/// assert!((props.wetted_perimeter_m - 14.0).abs() < 1e-3);
/// ```
pub fn section_properties(section: &CrossSection, hfl_m: f64) -> CalcResult<SectionProperties> {
    let props = match section {
        CrossSection::Measured {
            area_m2,
            wetted_perimeter_m,
            surface_width_m,
        } => SectionProperties {
            area_m2: *area_m2,
            wetted_perimeter_m: *wetted_perimeter_m,
            surface_width_m: *surface_width_m,
        },
        CrossSection::Surveyed { points } => integrate_survey(points, hfl_m),
    };

    if !(props.wetted_perimeter_m > 0.0) {
        return Err(CalcError::invalid_input(
            "wetted_perimeter_m",
            props.wetted_perimeter_m.to_string(),
            "Wetted perimeter must be greater than zero",
        ));
    }
    if !(props.area_m2 > 0.0) || !(props.surface_width_m > 0.0) {
        return Err(CalcError::invalid_input(
            "area_m2",
            props.area_m2.to_string(),
            "Cross-section carries no flow at HFL",
        ));
    }
    Ok(props)
}

fn integrate_survey(points: &[SurveyPoint], hfl_m: f64) -> SectionProperties {
    let mut area = 0.0;
    let mut perimeter = 0.0;
    let mut width = 0.0;

    for pair in points.windows(2) {
        let dx = pair[1].offset_m - pair[0].offset_m;
        let d1 = hfl_m - pair[0].level_m;
        let d2 = hfl_m - pair[1].level_m;

        if d1 <= 0.0 && d2 <= 0.0 {
            continue;
        }
        if d1 >= 0.0 && d2 >= 0.0 {
            area += 0.5 * (d1 + d2) * dx;
            perimeter += dx.hypot(d2 - d1);
            width += dx;
        } else {
            // partially wet: keep the wet triangle
            let wet_depth = d1.max(d2);
            let wet_dx = dx * wet_depth / (d1 - d2).abs();
            area += 0.5 * wet_depth * wet_dx;
            perimeter += wet_dx.hypot(wet_depth);
            width += wet_dx;
        }
    }

    SectionProperties {
        area_m2: area,
        wetted_perimeter_m: perimeter,
        surface_width_m: width,
    }
}

/// Results from the hydraulic stage.
///
/// ## JSON Example
///
/// ```json
/// {
///   "discharge_cumecs": 1265.76,
///   "regime_width_m": 170.77,
///   "effective_waterway_m": 25.8,
///   "design_velocity_m_s": 2.58,
///   "afflux_m": 2.17,
///   "afflux_ok": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicResult {
    pub discharge_cumecs: f64,
    pub area_m2: f64,
    pub wetted_perimeter_m: f64,
    pub surface_width_m: f64,
    /// A / surface width (m)
    pub mean_depth_m: f64,
    pub hydraulic_radius_m: f64,
    /// Lacey regime width (m)
    pub regime_width_m: f64,
    /// Linear waterway through the bridge, net of piers (m)
    pub effective_waterway_m: f64,
    /// Flow area through the bridge opening (m²)
    pub obstructed_area_m2: f64,
    /// Unobstructed to obstructed area ratio A/a
    pub area_ratio: f64,
    /// Continuity velocity Q/A (m/s)
    pub design_velocity_m_s: f64,
    pub manning_velocity_m_s: f64,
    /// Velocity through the bridge opening Q/a (m/s)
    pub obstructed_velocity_m_s: f64,
    pub manning_n: f64,
    pub afflux_m: f64,
    /// HFL raised by the afflux (m)
    pub afflux_flood_level_m: f64,
    pub allowable_afflux_m: f64,
    pub afflux_ok: bool,
}

impl HydraulicResult {
    pub fn passes(&self) -> bool {
        self.afflux_ok
    }
}

/// Run the hydraulic checks.
///
/// # Returns
///
/// * `Ok(HydraulicResult)` - Always returned for consistent data, pass or fail
/// * `Err(CalcError::InvalidInput)` - Zero wetted perimeter or no flow through the opening
pub fn calculate(input: &HydraulicInput, config: &DesignConfig) -> CalcResult<HydraulicResult> {
    input.validate()?;
    let constants = &config.constants;

    let section = section_properties(&input.cross_section, input.hfl_m)?;
    let q = input.discharge_cumecs;
    let area = section.area_m2;

    let mean_depth = area / section.surface_width_m;
    let hydraulic_radius = area / section.wetted_perimeter_m;
    let design_velocity = q / area;
    let slope = 1.0 / input.bed_slope_one_in;
    let manning_velocity = hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt() / input.manning_n;
    let regime_width = constants.lacey_regime_coefficient * q.sqrt();

    let effective_waterway =
        input.bridge_length_m.min(section.surface_width_m) - f64::from(input.num_piers) * input.pier_width_m;
    let normal_waterway = effective_waterway * input.skew_angle_deg.to_radians().cos();
    if !(normal_waterway > 0.0) {
        return Err(CalcError::invalid_input(
            "obstructed_area_m2",
            format!("{:.3}", normal_waterway * mean_depth),
            "Piers leave no waterway through the bridge opening",
        ));
    }

    // A/a = (W * d) / (L_eff * cos(skew) * d), at least 1 since L_eff <= W
    let area_ratio = section.surface_width_m / normal_waterway;
    let obstructed_area = area / area_ratio;
    let obstructed_velocity = q / obstructed_area;

    let velocity_head_term =
        design_velocity.powi(2) / constants.afflux_velocity_divisor + constants.afflux_constant;
    let afflux = velocity_head_term * (area_ratio - 1.0);

    Ok(HydraulicResult {
        discharge_cumecs: q,
        area_m2: area,
        wetted_perimeter_m: section.wetted_perimeter_m,
        surface_width_m: section.surface_width_m,
        mean_depth_m: mean_depth,
        hydraulic_radius_m: hydraulic_radius,
        regime_width_m: regime_width,
        effective_waterway_m: effective_waterway,
        obstructed_area_m2: obstructed_area,
        area_ratio,
        design_velocity_m_s: design_velocity,
        manning_velocity_m_s: manning_velocity,
        obstructed_velocity_m_s: obstructed_velocity,
        manning_n: input.manning_n,
        afflux_m: afflux,
        afflux_flood_level_m: input.hfl_m + afflux,
        allowable_afflux_m: config.allowable_afflux_m,
        afflux_ok: afflux < config.allowable_afflux_m,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MAX_SKEW_ANGLE_DEG;

    fn default_input() -> HydraulicInput {
        HydraulicInput::from_design(&DesignInput::default())
    }

    #[test]
    fn test_continuity_velocity() {
        let result = calculate(&default_input(), &DesignConfig::default()).unwrap();
        assert!((result.design_velocity_m_s - 1265.76 / 490.3).abs() < 1e-12);
        assert!((result.design_velocity_m_s - 2.5816).abs() < 1e-4);
    }

    #[test]
    fn test_regime_width() {
        let result = calculate(&default_input(), &DesignConfig::default()).unwrap();
        assert!((result.regime_width_m - 4.8 * 1265.76_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_manning_velocity() {
        let result = calculate(&default_input(), &DesignConfig::default()).unwrap();
        let r: f64 = 490.3 / 175.43;
        let expected = r.powf(2.0 / 3.0) * (1.0_f64 / 975.0).sqrt() / 0.033;
        assert!((result.manning_velocity_m_s - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constricted_opening_fails_afflux() {
        // 3 x 9.6 m spans across a 170 m wide flood: heavy constriction
        let result = calculate(&default_input(), &DesignConfig::default()).unwrap();
        assert!((result.effective_waterway_m - 25.8).abs() < 1e-9);
        assert!((result.afflux_m - 2.1717).abs() < 1e-3);
        assert!(!result.afflux_ok);
        assert!(!result.passes());
        assert!(result.obstructed_velocity_m_s > result.design_velocity_m_s);
    }

    #[test]
    fn test_unconstricted_opening_has_zero_afflux() {
        let input = HydraulicInput {
            discharge_cumecs: 30.0,
            cross_section: CrossSection::Measured {
                area_m2: 30.0,
                wetted_perimeter_m: 32.0,
                surface_width_m: 30.0,
            },
            hfl_m: 101.0,
            manning_n: 0.03,
            bed_slope_one_in: 1000.0,
            bridge_length_m: 30.0,
            num_piers: 0,
            pier_width_m: 1.0,
            skew_angle_deg: 0.0,
        };
        let result = calculate(&input, &DesignConfig::default()).unwrap();
        assert_eq!(result.area_ratio, 1.0);
        assert_eq!(result.afflux_m, 0.0);
        assert!(result.afflux_ok);
    }

    #[test]
    fn test_skew_increases_afflux() {
        let mut skewed = default_input();
        skewed.skew_angle_deg = 30.0;
        let config = DesignConfig::default();
        let square = calculate(&default_input(), &config).unwrap();
        let skewed = calculate(&skewed, &config).unwrap();
        assert!(skewed.afflux_m > square.afflux_m);
    }

    #[test]
    fn test_skew_limit_matches_project_limit() {
        let config = DesignConfig::default();
        let mut input = default_input();
        input.skew_angle_deg = 54.9;
        assert!(calculate(&input, &config).is_ok());

        for skew in [MAX_SKEW_ANGLE_DEG, 60.0, -1.0] {
            input.skew_angle_deg = skew;
            let err = calculate(&input, &config).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");

            let mut design = DesignInput::default();
            design.project.skew_angle_deg = skew;
            assert!(design.validate().is_err());
        }
    }

    #[test]
    fn test_bridge_longer_than_stream_has_zero_afflux() {
        // The opening is capped at the surface width, so A/a stays at 1
        let mut input = default_input();
        input.cross_section = CrossSection::Measured {
            area_m2: 20.0,
            wetted_perimeter_m: 22.0,
            surface_width_m: 20.0,
        };
        input.num_piers = 0;
        let result = calculate(&input, &DesignConfig::default()).unwrap();
        assert_eq!(result.area_ratio, 1.0);
        assert_eq!(result.afflux_m, 0.0);
    }

    #[test]
    fn test_piers_blocking_waterway_is_fatal() {
        let mut input = default_input();
        input.pier_width_m = 15.0;
        let err = calculate(&input, &DesignConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_wetted_perimeter_is_fatal() {
        let mut input = default_input();
        input.cross_section = CrossSection::Measured {
            area_m2: 490.3,
            wetted_perimeter_m: 0.0,
            surface_width_m: 170.0,
        };
        assert!(calculate(&input, &DesignConfig::default()).is_err());
    }

    #[test]
    fn test_survey_trapezoid() {
        // banks at 1:1, 4 m bed, 2 m deep at HFL 100
        let points = vec![
            SurveyPoint { offset_m: 0.0, level_m: 101.0 },
            SurveyPoint { offset_m: 3.0, level_m: 98.0 },
            SurveyPoint { offset_m: 7.0, level_m: 98.0 },
            SurveyPoint { offset_m: 10.0, level_m: 101.0 },
        ];
        let props = section_properties(&CrossSection::Surveyed { points }, 100.0).unwrap();
        // area = (4 + 8) / 2 * 2 = 12
        assert!((props.area_m2 - 12.0).abs() < 1e-9);
        assert!((props.surface_width_m - 8.0).abs() < 1e-9);
        let expected_perimeter = 4.0 + 2.0 * 2.0 * std::f64::consts::SQRT_2;
        assert!((props.wetted_perimeter_m - expected_perimeter).abs() < 1e-9);
    }

    #[test]
    fn test_dry_survey_is_fatal() {
        let points = vec![
            SurveyPoint { offset_m: 0.0, level_m: 101.0 },
            SurveyPoint { offset_m: 5.0, level_m: 100.5 },
        ];
        assert!(section_properties(&CrossSection::Surveyed { points }, 100.0).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn afflux_non_negative_and_velocity_positive(
            q in 1.0_f64..5000.0,
            surface_width in 10.0_f64..400.0,
            depth in 0.5_f64..10.0,
            spans in 1u32..8,
            span in 5.0_f64..20.0,
            pier_width in 0.3_f64..1.5,
            skew in 0.0_f64..crate::input::MAX_SKEW_ANGLE_DEG,
        ) {
            // At most 6 piers of < 1.5 m against a surface width of 10 m or
            // more, so the opening is never blocked
            let area = surface_width * depth;
            let input = HydraulicInput {
                discharge_cumecs: q,
                cross_section: CrossSection::Measured {
                    area_m2: area,
                    wetted_perimeter_m: surface_width + 2.0 * depth,
                    surface_width_m: surface_width,
                },
                hfl_m: 100.0,
                manning_n: 0.033,
                bed_slope_one_in: 1000.0,
                bridge_length_m: f64::from(spans) * span,
                num_piers: spans - 1,
                pier_width_m: pier_width,
                skew_angle_deg: skew,
            };
            let result = calculate(&input, &DesignConfig::default());
            prop_assert!(result.is_ok(), "{:?}", result);
            let result = result.unwrap();
            prop_assert!(result.afflux_m >= 0.0);
            prop_assert!(result.area_ratio >= 1.0);
            prop_assert!(result.design_velocity_m_s > 0.0);
            prop_assert!(result.manning_velocity_m_s > 0.0);
        }
    }
}
