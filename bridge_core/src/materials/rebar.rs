//! Reinforcing bar sizes and unit weights.
//!
//! Unit weights follow the IS 1786 tabulation (≈ d²/162 kg/m). The table is
//! data, carried inside [`CodeConstants`](crate::config::CodeConstants) so a
//! different standard can supply its own sizes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One bar diameter and its mass per metre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSize {
    pub diameter_mm: u32,
    pub unit_weight_kg_m: f64,
}

impl BarSize {
    /// Nominal cross-sectional area (mm²)
    pub fn area_mm2(&self) -> f64 {
        let d = f64::from(self.diameter_mm);
        PI * d * d / 4.0
    }
}

/// Lookup table of available bar sizes.
///
/// ```rust
/// use bridge_core::materials::BarTable;
///
/// let table = BarTable::default();
/// let bar = table.lookup(20).unwrap();
/// assert_eq!(bar.unit_weight_kg_m, 2.47);
/// assert!((bar.area_mm2() - 314.16).abs() < 0.01);
/// assert!(table.lookup(22).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarTable(pub Vec<BarSize>);

impl BarTable {
    pub fn lookup(&self, diameter_mm: u32) -> CalcResult<&BarSize> {
        self.0
            .iter()
            .find(|bar| bar.diameter_mm == diameter_mm)
            .ok_or_else(|| CalcError::material_not_found(format!("{} mm reinforcing bar", diameter_mm)))
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.0.is_empty() {
            return Err(CalcError::invalid_input("bar_sizes", "[]", "Bar table cannot be empty"));
        }
        for bar in &self.0 {
            if bar.diameter_mm == 0 || !(bar.unit_weight_kg_m > 0.0) {
                return Err(CalcError::invalid_input(
                    "bar_sizes",
                    format!("{} mm @ {} kg/m", bar.diameter_mm, bar.unit_weight_kg_m),
                    "Bar diameter and unit weight must be positive",
                ));
            }
        }
        Ok(())
    }
}

impl Default for BarTable {
    fn default() -> Self {
        let sizes = [
            (8, 0.395),
            (10, 0.617),
            (12, 0.888),
            (16, 1.58),
            (20, 2.47),
            (25, 3.85),
            (28, 4.83),
            (32, 6.31),
        ];
        BarTable(
            sizes
                .into_iter()
                .map(|(diameter_mm, unit_weight_kg_m)| BarSize {
                    diameter_mm,
                    unit_weight_kg_m,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_weights_track_area() {
        // steel density 7850 kg/m³ → kg/m = area_mm2 * 7.85e-3
        for bar in &BarTable::default().0 {
            let derived = bar.area_mm2() * 7.85e-3;
            assert!((derived - bar.unit_weight_kg_m).abs() / bar.unit_weight_kg_m < 0.01, "{:?}", bar);
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(BarTable(Vec::new()).validate().is_err());
        assert!(BarTable::default().validate().is_ok());
    }

    #[test]
    fn test_table_serializes_as_list() {
        let json = serde_json::to_string(&BarTable::default()).unwrap();
        assert!(json.starts_with('['));
    }
}
