//! # Materials
//!
//! Concrete and reinforcing steel grades per IS 456 / IRC 112, plus the unit
//! weights the load and quantity stages need.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::materials::{ConcreteGrade, MaterialProperties, SteelGrade};
//!
//! let material = MaterialProperties::new(ConcreteGrade::M30, SteelGrade::Fe500);
//! assert_eq!(material.fck_mpa(), 30.0);
//! assert_eq!(material.fy_mpa(), 500.0);
//!
//! let parsed = ConcreteGrade::from_str_flexible("m 25").unwrap();
//! assert_eq!(parsed, ConcreteGrade::M25);
//! ```

pub mod rebar;

pub use rebar::{BarSize, BarTable};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Concrete grade (characteristic cube strength in MPa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteGrade {
    M20,
    M25,
    M30,
    M35,
    M40,
    M45,
    M50,
}

impl ConcreteGrade {
    /// All grades in ascending strength
    pub const ALL: [ConcreteGrade; 7] = [
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
        ConcreteGrade::M40,
        ConcreteGrade::M45,
        ConcreteGrade::M50,
    ];

    /// Characteristic compressive strength fck (MPa)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::M20 => 20.0,
            ConcreteGrade::M25 => 25.0,
            ConcreteGrade::M30 => 30.0,
            ConcreteGrade::M35 => 35.0,
            ConcreteGrade::M40 => 40.0,
            ConcreteGrade::M45 => 45.0,
            ConcreteGrade::M50 => 50.0,
        }
    }

    /// Grade designation (e.g., "M25")
    pub fn code(&self) -> &'static str {
        match self {
            ConcreteGrade::M20 => "M20",
            ConcreteGrade::M25 => "M25",
            ConcreteGrade::M30 => "M30",
            ConcreteGrade::M35 => "M35",
            ConcreteGrade::M40 => "M40",
            ConcreteGrade::M45 => "M45",
            ConcreteGrade::M50 => "M50",
        }
    }

    /// Parse from common string representations ("M25", "m-25", "25")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_uppercase().replace([' ', '-', '_'], "");
        let digits = normalized.trim_start_matches('M');
        ConcreteGrade::ALL
            .into_iter()
            .find(|grade| grade.code().trim_start_matches('M') == digits)
            .ok_or_else(|| CalcError::material_not_found(s))
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reinforcing steel grade (yield strength in MPa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    Fe415,
    Fe500,
    Fe550,
}

impl SteelGrade {
    /// All grades in ascending strength
    pub const ALL: [SteelGrade; 3] = [SteelGrade::Fe415, SteelGrade::Fe500, SteelGrade::Fe550];

    /// Characteristic yield strength fy (MPa)
    pub fn fy_mpa(&self) -> f64 {
        match self {
            SteelGrade::Fe415 => 415.0,
            SteelGrade::Fe500 => 500.0,
            SteelGrade::Fe550 => 550.0,
        }
    }

    /// Grade designation (e.g., "Fe415")
    pub fn code(&self) -> &'static str {
        match self {
            SteelGrade::Fe415 => "Fe415",
            SteelGrade::Fe500 => "Fe500",
            SteelGrade::Fe550 => "Fe550",
        }
    }

    /// Parse from common string representations ("Fe415", "FE 500", "550")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.to_uppercase().replace([' ', '-', '_'], "");
        let digits = normalized.trim_start_matches("FE");
        SteelGrade::ALL
            .into_iter()
            .find(|grade| grade.code().trim_start_matches("Fe") == digits)
            .ok_or_else(|| CalcError::material_not_found(s))
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Material properties for one design run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "concrete_grade": "M25",
///   "steel_grade": "Fe415",
///   "concrete_unit_weight_kn_m3": 24.0,
///   "wearing_coat_unit_weight_kn_m3": 22.0,
///   "water_unit_weight_kn_m3": 10.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    pub concrete_grade: ConcreteGrade,
    pub steel_grade: SteelGrade,
    /// Reinforced concrete unit weight (kN/m³)
    pub concrete_unit_weight_kn_m3: f64,
    /// Bituminous wearing coat unit weight (kN/m³)
    pub wearing_coat_unit_weight_kn_m3: f64,
    /// Water unit weight used for buoyancy (kN/m³)
    pub water_unit_weight_kn_m3: f64,
}

impl MaterialProperties {
    /// Create material properties with standard unit weights
    pub fn new(concrete_grade: ConcreteGrade, steel_grade: SteelGrade) -> Self {
        MaterialProperties {
            concrete_grade,
            steel_grade,
            concrete_unit_weight_kn_m3: 24.0,
            wearing_coat_unit_weight_kn_m3: 22.0,
            water_unit_weight_kn_m3: 10.0,
        }
    }

    pub fn fck_mpa(&self) -> f64 {
        self.concrete_grade.fck_mpa()
    }

    pub fn fy_mpa(&self) -> f64 {
        self.steel_grade.fy_mpa()
    }

    /// Validate unit weights
    pub fn validate(&self) -> CalcResult<()> {
        let weights = [
            ("concrete_unit_weight_kn_m3", self.concrete_unit_weight_kn_m3),
            ("wearing_coat_unit_weight_kn_m3", self.wearing_coat_unit_weight_kn_m3),
            ("water_unit_weight_kn_m3", self.water_unit_weight_kn_m3),
        ];
        for (field, value) in weights {
            if !(value > 0.0) {
                return Err(CalcError::invalid_input(field, value.to_string(), "Unit weight must be positive"));
            }
        }
        Ok(())
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        MaterialProperties::new(ConcreteGrade::M25, SteelGrade::Fe415)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_strengths_positive() {
        assert!(ConcreteGrade::ALL.iter().all(|g| g.fck_mpa() > 0.0));
        assert!(SteelGrade::ALL.iter().all(|g| g.fy_mpa() > 0.0));
    }

    #[test]
    fn test_flexible_parsing() {
        assert_eq!(ConcreteGrade::from_str_flexible("M30").unwrap(), ConcreteGrade::M30);
        assert_eq!(ConcreteGrade::from_str_flexible("m-35").unwrap(), ConcreteGrade::M35);
        assert_eq!(SteelGrade::from_str_flexible("fe 500").unwrap(), SteelGrade::Fe500);
        assert_eq!(SteelGrade::from_str_flexible("415").unwrap(), SteelGrade::Fe415);
    }

    #[test]
    fn test_unknown_grade_is_material_not_found() {
        let err = ConcreteGrade::from_str_flexible("M95").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
        assert!(SteelGrade::from_str_flexible("Fe250").is_err());
    }

    #[test]
    fn test_grade_serialization() {
        let json = serde_json::to_string(&ConcreteGrade::M25).unwrap();
        assert_eq!(json, "\"M25\"");
        let parsed: SteelGrade = serde_json::from_str("\"Fe415\"").unwrap();
        assert_eq!(parsed, SteelGrade::Fe415);
    }

    #[test]
    fn test_unit_weight_validation() {
        let mut material = MaterialProperties::default();
        assert!(material.validate().is_ok());

        material.water_unit_weight_kn_m3 = 0.0;
        assert!(material.validate().is_err());
    }
}
