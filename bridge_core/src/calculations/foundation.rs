//! # Foundation Bearing
//!
//! Soil pressure under a rectangular isolated footing with biaxial moments,
//! and the trial-and-error sizing of the pier footing.
//!
//! ## Pressure Distribution
//!
//! ```text
//! σ = P/(L·B) ± 6·M_L/(B·L²) ± 6·M_T/(L·B²)
//! ```
//!
//! `L` is the footing dimension in the plane of `M_L`. When σmin < 0 part of
//! the base would be in tension; the tensile region is found by clipping the
//! footing rectangle against the zero-pressure line, and both its area and
//! the negative σmin are reported.
//!
//! ## Sizing
//!
//! In [`FoundationMode::Design`] the footing starts at the stem footprint
//! plus a projection on each side, then grows by the step on every side
//! until utilization ≤ 1 with no tension. Exhausting the iteration budget is
//! a [`CalcError::ConvergenceFailed`].
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::foundation::{check, FoundationInput};
//!
//! let input = FoundationInput {
//!     vertical_load_kn: 8658.3,
//!     longitudinal_moment_knm: 1950.0,
//!     transverse_moment_knm: 0.0,
//!     length_m: 9.0,
//!     width_m: 3.5,
//!     thickness_m: 1.2,
//!     footing_unit_weight_kn_m3: 0.0,
//!     safe_bearing_capacity_kn_m2: 450.0,
//! };
//!
//! let result = check(&input).unwrap();
//! assert!((result.max_pressure_kn_m2 - 316.1).abs() < 0.1);
//! assert!(!result.area_in_tension);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{non_negative, positive, FootingSizing, FoundationMode};
use crate::errors::{CalcError, CalcResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationInput {
    /// Vertical load at the top of the footing (kN)
    pub vertical_load_kn: f64,
    /// Moment in the plane of `length_m` (kN·m)
    pub longitudinal_moment_knm: f64,
    /// Moment in the plane of `width_m` (kN·m)
    pub transverse_moment_knm: f64,
    pub length_m: f64,
    pub width_m: f64,
    pub thickness_m: f64,
    /// Unit weight for the footing self-weight; 0 leaves it out (kN/m³)
    pub footing_unit_weight_kn_m3: f64,
    pub safe_bearing_capacity_kn_m2: f64,
}

impl FoundationInput {
    pub fn validate(&self) -> CalcResult<()> {
        positive("length_m", self.length_m)?;
        positive("width_m", self.width_m)?;
        non_negative("thickness_m", self.thickness_m)?;
        non_negative("footing_unit_weight_kn_m3", self.footing_unit_weight_kn_m3)?;
        positive("safe_bearing_capacity_kn_m2", self.safe_bearing_capacity_kn_m2)?;
        if !self.longitudinal_moment_knm.is_finite() || !self.transverse_moment_knm.is_finite() {
            return Err(CalcError::invalid_input(
                "moment",
                format!("{} / {}", self.longitudinal_moment_knm, self.transverse_moment_knm),
                "Moments must be finite",
            ));
        }
        Ok(())
    }

    /// Same loads on a different trial footing
    pub fn with_dimensions(&self, length_m: f64, width_m: f64) -> Self {
        FoundationInput {
            length_m,
            width_m,
            ..self.clone()
        }
    }

    pub fn footing_self_weight_kn(&self) -> f64 {
        self.length_m * self.width_m * self.thickness_m * self.footing_unit_weight_kn_m3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationResult {
    pub mode: FoundationMode,
    /// Trials evaluated (1 in check mode)
    pub iterations: u32,
    pub length_m: f64,
    pub width_m: f64,
    pub thickness_m: f64,
    pub footing_self_weight_kn: f64,
    /// Total vertical load including the footing (kN)
    pub vertical_load_kn: f64,
    pub longitudinal_moment_knm: f64,
    pub transverse_moment_knm: f64,
    /// M_L / P (m)
    pub eccentricity_longitudinal_m: f64,
    /// M_T / P (m)
    pub eccentricity_transverse_m: f64,
    /// |e_L| ≤ L/6
    pub within_kern_longitudinal: bool,
    /// |e_T| ≤ B/6
    pub within_kern_transverse: bool,
    /// 6|e_L|/L + 6|e_T|/B ≤ 1
    pub within_kern_combined: bool,
    pub average_pressure_kn_m2: f64,
    pub max_pressure_kn_m2: f64,
    pub min_pressure_kn_m2: f64,
    pub safe_bearing_capacity_kn_m2: f64,
    /// σmax / SBC
    pub utilization: f64,
    pub bearing_ok: bool,
    pub area_in_tension: bool,
    /// Plan area with σ < 0 (m²)
    pub tension_area_m2: f64,
    /// Tension area over footing area
    pub tension_fraction: f64,
}

impl FoundationResult {
    pub fn passes(&self) -> bool {
        self.bearing_ok && !self.area_in_tension
    }

    pub fn area_m2(&self) -> f64 {
        self.length_m * self.width_m
    }
}

/// Check the footing as given
pub fn check(input: &FoundationInput) -> CalcResult<FoundationResult> {
    input.validate()?;
    evaluate(input, FoundationMode::Check, 1)
}

/// Size the footing by growing it from the stem footprint
///
/// `stem_along_length_m` and `stem_along_width_m` are the stem dimensions
/// parallel to the footing length and width. The dimensions in `input` are
/// replaced by the trial dimensions.
///
/// ```rust
/// use bridge_core::calculations::foundation::{design, FoundationInput};
/// use bridge_core::config::FootingSizing;
///
/// let input = FoundationInput {
///     vertical_load_kn: 2000.0,
///     longitudinal_moment_knm: 0.0,
///     transverse_moment_knm: 0.0,
///     length_m: 0.0,
///     width_m: 0.0,
///     thickness_m: 1.0,
///     footing_unit_weight_kn_m3: 24.0,
///     safe_bearing_capacity_kn_m2: 200.0,
/// };
///
/// let result = design(&input, 1.0, 1.0, &FootingSizing::default()).unwrap();
/// assert!(result.utilization <= 1.0);
/// assert!(result.iterations > 1);
/// ```
pub fn design(
    input: &FoundationInput,
    stem_along_length_m: f64,
    stem_along_width_m: f64,
    sizing: &FootingSizing,
) -> CalcResult<FoundationResult> {
    sizing.validate()?;
    positive("stem_along_length_m", stem_along_length_m)?;
    positive("stem_along_width_m", stem_along_width_m)?;

    let start_length = stem_along_length_m + 2.0 * sizing.initial_projection_m;
    let start_width = stem_along_width_m + 2.0 * sizing.initial_projection_m;

    let mut last: Option<FoundationResult> = None;
    for iteration in 1..=sizing.max_iterations {
        let growth = 2.0 * sizing.step_m * f64::from(iteration - 1);
        let trial = input.with_dimensions(start_length + growth, start_width + growth);
        trial.validate()?;
        let result = evaluate(&trial, FoundationMode::Design, iteration)?;

        tracing::trace!(
            iteration,
            length_m = result.length_m,
            width_m = result.width_m,
            utilization = result.utilization,
            "footing trial"
        );

        if result.passes() {
            tracing::debug!(iterations = iteration, "footing sizing converged");
            return Ok(result);
        }
        last = Some(result);
    }

    let (last_length_m, last_width_m, last_utilization) = last
        .map(|r| (r.length_m, r.width_m, r.utilization))
        .unwrap_or((start_length, start_width, f64::NAN));
    Err(CalcError::ConvergenceFailed {
        component: "Pier footing".to_string(),
        iterations: sizing.max_iterations,
        last_length_m,
        last_width_m,
        last_utilization,
    })
}

fn evaluate(input: &FoundationInput, mode: FoundationMode, iterations: u32) -> CalcResult<FoundationResult> {
    let self_weight = input.footing_self_weight_kn();
    let p = input.vertical_load_kn + self_weight;
    if !(p > 0.0) {
        return Err(CalcError::calculation_failed(
            "Foundation",
            format!("Vertical load {:.2} kN must be positive", p),
        ));
    }

    let l = input.length_m;
    let b = input.width_m;
    let m_l = input.longitudinal_moment_knm;
    let m_t = input.transverse_moment_knm;

    let e_l = m_l / p;
    let e_t = m_t / p;

    let avg = p / (l * b);
    let delta_l = 6.0 * m_l.abs() / (b * l * l);
    let delta_t = 6.0 * m_t.abs() / (l * b * b);
    let max_pressure = avg + delta_l + delta_t;
    let min_pressure = avg - delta_l - delta_t;

    let area_in_tension = min_pressure < 0.0;
    let tension_area = if area_in_tension {
        tension_area(l, b, avg, 2.0 * delta_l / l, 2.0 * delta_t / b)
    } else {
        0.0
    };
    let utilization = max_pressure / input.safe_bearing_capacity_kn_m2;

    Ok(FoundationResult {
        mode,
        iterations,
        length_m: l,
        width_m: b,
        thickness_m: input.thickness_m,
        footing_self_weight_kn: self_weight,
        vertical_load_kn: p,
        longitudinal_moment_knm: m_l,
        transverse_moment_knm: m_t,
        eccentricity_longitudinal_m: e_l,
        eccentricity_transverse_m: e_t,
        within_kern_longitudinal: e_l.abs() <= l / 6.0,
        within_kern_transverse: e_t.abs() <= b / 6.0,
        within_kern_combined: 6.0 * e_l.abs() / l + 6.0 * e_t.abs() / b <= 1.0,
        average_pressure_kn_m2: avg,
        max_pressure_kn_m2: max_pressure,
        min_pressure_kn_m2: min_pressure,
        safe_bearing_capacity_kn_m2: input.safe_bearing_capacity_kn_m2,
        utilization,
        bearing_ok: utilization <= 1.0,
        area_in_tension,
        tension_area_m2: tension_area,
        tension_fraction: tension_area / (l * b),
    })
}

/// Area of the footing where σ(x, y) = avg + gx·x + gy·y is negative
///
/// Origin at the footing centre. Sutherland-Hodgman against the single
/// half-plane σ < 0, then a triangle fan from the first vertex.
fn tension_area(length: f64, width: f64, avg: f64, gx: f64, gy: f64) -> f64 {
    let pressure = |(x, y): (f64, f64)| avg + gx * x + gy * y;
    let (hl, hw) = (length / 2.0, width / 2.0);
    let corners = [(-hl, -hw), (hl, -hw), (hl, hw), (-hl, hw)];

    let mut clipped: Vec<(f64, f64)> = Vec::with_capacity(5);
    for i in 0..corners.len() {
        let p = corners[i];
        let q = corners[(i + 1) % corners.len()];
        let (sp, sq) = (pressure(p), pressure(q));
        if sp < 0.0 {
            clipped.push(p);
        }
        if (sp < 0.0) != (sq < 0.0) {
            let t = sp / (sp - sq);
            clipped.push((p.0 + t * (q.0 - p.0), p.1 + t * (q.1 - p.1)));
        }
    }

    let n = clipped.len();
    if n < 3 {
        return 0.0;
    }
    let (x0, y0) = clipped[0];
    let twice_area: f64 = (1..n - 1)
        .map(|i| {
            let (x1, y1) = (clipped[i].0 - x0, clipped[i].1 - y0);
            let (x2, y2) = (clipped[i + 1].0 - x0, clipped[i + 1].1 - y0);
            x1 * y2 - x2 * y1
        })
        .sum();
    twice_area.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> FoundationInput {
        FoundationInput {
            vertical_load_kn: 8658.3,
            longitudinal_moment_knm: 1950.0,
            transverse_moment_knm: 0.0,
            length_m: 9.0,
            width_m: 3.5,
            thickness_m: 1.2,
            footing_unit_weight_kn_m3: 0.0,
            safe_bearing_capacity_kn_m2: 450.0,
        }
    }

    #[test]
    fn test_uniaxial_pressures() {
        let result = check(&scenario()).unwrap();
        assert!((result.eccentricity_longitudinal_m - 0.2252).abs() < 1e-4);
        assert!((result.average_pressure_kn_m2 - 274.87).abs() < 0.01);
        assert!((result.max_pressure_kn_m2 - 316.14).abs() < 0.01);
        assert!((result.min_pressure_kn_m2 - 233.60).abs() < 0.01);
        assert!(!result.area_in_tension);
        assert_eq!(result.tension_area_m2, 0.0);
        assert!(result.within_kern_longitudinal);
        assert!(result.within_kern_combined);
        assert_eq!(result.mode, FoundationMode::Check);
    }

    #[test]
    fn test_self_weight_added() {
        let mut input = scenario();
        input.footing_unit_weight_kn_m3 = 24.0;
        let result = check(&input).unwrap();
        assert!((result.footing_self_weight_kn - 9.0 * 3.5 * 1.2 * 24.0).abs() < 1e-9);
        assert!((result.vertical_load_kn - (8658.3 + result.footing_self_weight_kn)).abs() < 1e-9);
    }

    #[test]
    fn test_biaxial_pressures() {
        let input = FoundationInput {
            vertical_load_kn: 1000.0,
            longitudinal_moment_knm: 200.0,
            transverse_moment_knm: 100.0,
            length_m: 4.0,
            width_m: 2.0,
            thickness_m: 0.0,
            footing_unit_weight_kn_m3: 0.0,
            safe_bearing_capacity_kn_m2: 300.0,
        };
        let result = check(&input).unwrap();
        // 125 ± 6·200/(2·16) ± 6·100/(4·4)
        assert!((result.max_pressure_kn_m2 - (125.0 + 37.5 + 37.5)).abs() < 1e-9);
        assert!((result.min_pressure_kn_m2 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_tension_area_uniaxial() {
        // e = L/3 leaves a strip along one edge in tension
        let input = FoundationInput {
            vertical_load_kn: 600.0,
            longitudinal_moment_knm: 1200.0,
            transverse_moment_knm: 0.0,
            length_m: 6.0,
            width_m: 1.0,
            thickness_m: 0.0,
            footing_unit_weight_kn_m3: 0.0,
            safe_bearing_capacity_kn_m2: 500.0,
        };
        let result = check(&input).unwrap();
        // avg 100, delta 200: σ(x) = 100 + 200·x/3, zero at x = -1.5
        assert!((result.min_pressure_kn_m2 + 100.0).abs() < 1e-9);
        assert!(result.area_in_tension);
        assert!((result.tension_area_m2 - 1.5).abs() < 1e-9);
        assert!((result.tension_fraction - 0.25).abs() < 1e-9);
        assert!(!result.within_kern_longitudinal);
        assert!(!result.passes());
    }

    #[test]
    fn test_tension_area_biaxial_corner() {
        // Zero line cuts one corner off a 2 x 2 footing
        let input = FoundationInput {
            vertical_load_kn: 400.0,
            longitudinal_moment_knm: 200.0,
            transverse_moment_knm: 200.0,
            length_m: 2.0,
            width_m: 2.0,
            thickness_m: 0.0,
            footing_unit_weight_kn_m3: 0.0,
            safe_bearing_capacity_kn_m2: 1000.0,
        };
        let result = check(&input).unwrap();
        // avg 100, each delta 150: σ = 100 + 150x + 150y, σ < 0 where x + y < -2/3,
        // a right triangle at (-1, -1) with legs of 4/3
        assert!((result.min_pressure_kn_m2 + 200.0).abs() < 1e-9);
        let leg = 4.0 / 3.0;
        assert!((result.tension_area_m2 - leg * leg / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_load_is_calculation_error() {
        let mut input = scenario();
        input.vertical_load_kn = 0.0;
        let err = check(&input).unwrap_err();
        assert!(matches!(err, CalcError::CalculationFailed { .. }));
    }

    #[test]
    fn test_design_grows_until_acceptable() {
        let input = FoundationInput {
            vertical_load_kn: 6486.5,
            longitudinal_moment_knm: 1950.0,
            transverse_moment_knm: 1300.0,
            length_m: 0.0,
            width_m: 0.0,
            thickness_m: 1.2,
            footing_unit_weight_kn_m3: 24.0,
            safe_bearing_capacity_kn_m2: 450.0,
        };
        let result = design(&input, 1.5, 8.0, &FootingSizing::default()).unwrap();
        assert_eq!(result.mode, FoundationMode::Design);
        assert_eq!(result.iterations, 2);
        assert!((result.length_m - 3.0).abs() < 1e-9);
        assert!((result.width_m - 9.5).abs() < 1e-9);
        assert!(result.passes());
    }

    #[test]
    fn test_design_reports_non_convergence() {
        let input = FoundationInput {
            vertical_load_kn: 1.0e6,
            longitudinal_moment_knm: 0.0,
            transverse_moment_knm: 0.0,
            length_m: 0.0,
            width_m: 0.0,
            thickness_m: 1.0,
            footing_unit_weight_kn_m3: 24.0,
            safe_bearing_capacity_kn_m2: 100.0,
        };
        let sizing = FootingSizing {
            max_iterations: 3,
            ..FootingSizing::default()
        };
        match design(&input, 1.0, 1.0, &sizing).unwrap_err() {
            CalcError::ConvergenceFailed {
                iterations,
                last_length_m,
                last_width_m,
                last_utilization,
                ..
            } => {
                assert_eq!(iterations, 3);
                assert!((last_length_m - 3.0).abs() < 1e-9);
                assert!((last_width_m - 3.0).abs() < 1e-9);
                assert!(last_utilization > 1.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
