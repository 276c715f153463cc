//! Load cases and load combinations per IRC 6
//!
//! # Overview
//!
//! - [`LoadType`] - The action categories (DL, LL, W, EQ)
//! - [`LoadCase`] - Unfactored load values for one member
//! - [`LoadCombination`] - Factors applied for a code combination
//!
//! # Example
//!
//! ```
//! use bridge_core::loads::{irc_combinations, LoadCase, LoadType};
//!
//! let pier = LoadCase::new("Pier P1")
//!     .with_load(LoadType::Dead, 4956.0)
//!     .with_load(LoadType::Live, 2437.5);
//!
//! let max_load = irc_combinations()
//!     .iter()
//!     .map(|c| c.apply(&pier))
//!     .fold(0.0f64, f64::max);
//!
//! assert!((max_load - 1.5 * (4956.0 + 2437.5)).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::{
    evaluate_combinations,
    find_governing_combination,
    find_governing_for,
    irc_combinations,
    CombinationResult,
    LimitState,
    LoadCombination,
};
pub use load_types::LoadType;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A collection of unfactored load values by type
///
/// # Example
/// ```
/// use bridge_core::loads::{LoadCase, LoadType};
///
/// let case = LoadCase::new("Pier")
///     .with_load(LoadType::Dead, 5000.0)
///     .with_load(LoadType::Live, 2437.5);
///
/// assert_eq!(case.get(LoadType::Dead), 5000.0);
/// assert_eq!(case.get(LoadType::Seismic), 0.0);
/// ```
///
/// # JSON Format
/// ```json
/// {
///   "label": "Pier P1",
///   "loads": {
///     "Dead": 4956.2,
///     "Live": 2437.5
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCase {
    pub label: String,

    /// Load values keyed by type (kN)
    pub loads: BTreeMap<LoadType, f64>,
}

impl LoadCase {
    /// Create a new empty load case with a label
    pub fn new(label: impl Into<String>) -> Self {
        LoadCase {
            label: label.into(),
            loads: BTreeMap::new(),
        }
    }

    /// Add or update a load value (builder pattern)
    pub fn with_load(mut self, load_type: LoadType, value: f64) -> Self {
        self.loads.insert(load_type, value);
        self
    }

    /// Get the load value for a type, defaulting to 0.0 if not set
    pub fn get(&self, load_type: LoadType) -> f64 {
        self.loads.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Validate the load case
    ///
    /// Gravity loads must be non-negative; every value must be finite.
    pub fn validate(&self) -> CalcResult<()> {
        for (load_type, value) in &self.loads {
            if !value.is_finite() || (load_type.is_gravity() && *value < 0.0) {
                return Err(CalcError::invalid_input(
                    format!("load_{}", load_type.code()),
                    value.to_string(),
                    format!("{} must be a finite, non-negative value", load_type.description()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_case_builder() {
        let case = LoadCase::new("Test")
            .with_load(LoadType::Dead, 10.0)
            .with_load(LoadType::Live, 20.0);

        assert_eq!(case.label, "Test");
        assert_eq!(case.get(LoadType::Dead), 10.0);
        assert_eq!(case.get(LoadType::Wind), 0.0);
    }

    #[test]
    fn test_load_case_validation_negative_gravity() {
        let case = LoadCase::new("Invalid").with_load(LoadType::Dead, -10.0);
        assert!(case.validate().is_err());
    }

    #[test]
    fn test_load_case_serialization() {
        let case = LoadCase::new("Pier")
            .with_load(LoadType::Dead, 20.0)
            .with_load(LoadType::Live, 50.0);

        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains("\"Dead\":20.0"));
        let parsed: LoadCase = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, case);
    }
}
