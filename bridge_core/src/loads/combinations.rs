//! IRC 6 Load Combinations
//!
//! Factored combinations of dead, live, wind and seismic actions used for
//! the pier and its foundation. The default set is:
//!
//! | Name | Equation | Limit state |
//! |------|----------|-------------|
//! | LC1 | 1.5DL + 1.5LL | Ultimate |
//! | LC2 | 1.2(DL + LL + W) | Ultimate |
//! | LC3 | 1.2(DL + LL + EQ) | Ultimate |
//! | LC4 | DL + LL + W | Serviceability |
//!
//! The set lives in [`CodeConstants`](crate::config::CodeConstants), so an
//! edition with different factors is a data change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::LoadCase;

/// Limit state a combination is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitState {
    /// Strength checks (steel design, governing load)
    Ultimate,
    /// Working-load checks (bearing pressure)
    Serviceability,
}

/// A load combination with factors for each load type
///
/// # Example
/// ```
/// use bridge_core::loads::{LimitState, LoadCase, LoadCombination, LoadType};
///
/// let combo = LoadCombination::new("LC1", "1.5DL + 1.5LL", LimitState::Ultimate)
///     .with_factor(LoadType::Dead, 1.5)
///     .with_factor(LoadType::Live, 1.5);
///
/// let case = LoadCase::new("Pier P1")
///     .with_load(LoadType::Dead, 6220.8)
///     .with_load(LoadType::Live, 2437.5);
///
/// assert!((combo.apply(&case) - 12987.45).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "LC1")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.2(DL + LL + W)")
    pub equation: String,

    pub limit_state: LimitState,

    /// Load factors keyed by load type
    pub factors: BTreeMap<LoadType, f64>,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: impl Into<String>, equation: impl Into<String>, limit_state: LimitState) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            limit_state,
            factors: BTreeMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Apply this combination to a LoadCase, returning the total factored load
    ///
    /// Load types not in the combination are treated as having factor 0.
    pub fn apply(&self, case: &LoadCase) -> f64 {
        self.factors
            .iter()
            .map(|(load_type, factor)| factor * case.get(*load_type))
            .sum()
    }

    /// Get the factor for a specific load type (0.0 if not in combination)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }
}

/// Generate the IRC 6 combinations used for slab bridge substructures
///
/// # Example
/// ```
/// use bridge_core::loads::{irc_combinations, LoadType};
///
/// let combos = irc_combinations();
/// assert_eq!(combos.len(), 4);
/// assert_eq!(combos[1].get_factor(LoadType::Wind), 1.2);
/// ```
pub fn irc_combinations() -> Vec<LoadCombination> {
    vec![
        LoadCombination::new("LC1", "1.5DL + 1.5LL", LimitState::Ultimate)
            .with_factor(LoadType::Dead, 1.5)
            .with_factor(LoadType::Live, 1.5),
        LoadCombination::new("LC2", "1.2(DL + LL + W)", LimitState::Ultimate)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.2)
            .with_factor(LoadType::Wind, 1.2),
        LoadCombination::new("LC3", "1.2(DL + LL + EQ)", LimitState::Ultimate)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.2)
            .with_factor(LoadType::Seismic, 1.2),
        LoadCombination::new("LC4", "DL + LL + W", LimitState::Serviceability)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Wind, 1.0),
    ]
}

/// A combination evaluated against a load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationResult {
    pub combination: LoadCombination,

    /// Resulting factored load (kN)
    pub value_kn: f64,
}

/// Apply every combination to the load case, in declaration order
pub fn evaluate_combinations(case: &LoadCase, combinations: &[LoadCombination]) -> Vec<CombinationResult> {
    combinations
        .iter()
        .map(|combo| CombinationResult {
            combination: combo.clone(),
            value_kn: combo.apply(case),
        })
        .collect()
}

/// Find the governing (maximum) combination result
///
/// Ties keep the combination declared first.
///
/// # Example
/// ```
/// use bridge_core::loads::{evaluate_combinations, find_governing_combination, irc_combinations, LoadCase, LoadType};
///
/// let case = LoadCase::new("Pier")
///     .with_load(LoadType::Dead, 6220.8)
///     .with_load(LoadType::Live, 2437.5);
///
/// let results = evaluate_combinations(&case, &irc_combinations());
/// let governing = find_governing_combination(&results).unwrap();
/// assert_eq!(governing.combination.name, "LC1");
/// ```
pub fn find_governing_combination(results: &[CombinationResult]) -> Option<&CombinationResult> {
    governing(results)
}

/// Find the governing combination restricted to one limit state
pub fn find_governing_for(results: &[CombinationResult], limit_state: LimitState) -> Option<&CombinationResult> {
    governing(results.iter().filter(|r| r.combination.limit_state == limit_state))
}

/// Largest value, first wins ties
fn governing<'a>(results: impl IntoIterator<Item = &'a CombinationResult>) -> Option<&'a CombinationResult> {
    let mut found: Option<&CombinationResult> = None;
    for result in results {
        match found {
            Some(best) if result.value_kn <= best.value_kn => {}
            _ => found = Some(result),
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pier_case() -> LoadCase {
        LoadCase::new("Pier")
            .with_load(LoadType::Dead, 6220.8)
            .with_load(LoadType::Live, 2437.5)
            .with_load(LoadType::Wind, 125.0)
            .with_load(LoadType::Seismic, 180.0)
    }

    #[test]
    fn test_lc1_value() {
        let results = evaluate_combinations(&pier_case(), &irc_combinations());
        assert_eq!(results[0].combination.name, "LC1");
        assert!((results[0].value_kn - 12987.45).abs() < 1e-6);
    }

    #[test]
    fn test_all_combinations_evaluated_in_order() {
        let results = evaluate_combinations(&pier_case(), &irc_combinations());
        let names: Vec<&str> = results.iter().map(|r| r.combination.name.as_str()).collect();
        assert_eq!(names, vec!["LC1", "LC2", "LC3", "LC4"]);

        // LC2 = 1.2 * (6220.8 + 2437.5 + 125)
        assert!((results[1].value_kn - 10539.96).abs() < 1e-6);
        // LC4 = 6220.8 + 2437.5 + 125
        assert!((results[3].value_kn - 8783.3).abs() < 1e-6);
    }

    #[test]
    fn test_governing_is_lc1_without_large_lateral_loads() {
        let results = evaluate_combinations(&pier_case(), &irc_combinations());
        let governing = find_governing_combination(&results).unwrap();
        assert_eq!(governing.combination.name, "LC1");
    }

    #[test]
    fn test_seismic_can_govern() {
        let case = LoadCase::new("Pier")
            .with_load(LoadType::Dead, 100.0)
            .with_load(LoadType::Live, 0.0)
            .with_load(LoadType::Seismic, 1000.0);
        let results = evaluate_combinations(&case, &irc_combinations());
        assert_eq!(find_governing_combination(&results).unwrap().combination.name, "LC3");
    }

    #[test]
    fn test_tie_break_first_declared_wins() {
        let combos = vec![
            LoadCombination::new("A", "DL", LimitState::Ultimate).with_factor(LoadType::Dead, 1.0),
            LoadCombination::new("B", "DL", LimitState::Ultimate).with_factor(LoadType::Dead, 1.0),
            LoadCombination::new("C", "0.5DL", LimitState::Ultimate).with_factor(LoadType::Dead, 0.5),
        ];
        let case = LoadCase::new("Tie").with_load(LoadType::Dead, 10.0);
        let results = evaluate_combinations(&case, &combos);
        assert_eq!(find_governing_combination(&results).unwrap().combination.name, "A");
    }

    #[test]
    fn test_governing_for_serviceability() {
        let results = evaluate_combinations(&pier_case(), &irc_combinations());
        let service = find_governing_for(&results, LimitState::Serviceability).unwrap();
        assert_eq!(service.combination.name, "LC4");
    }

    #[test]
    fn test_governing_for_keeps_first_of_tied_limit_state() {
        let combos = vec![
            LoadCombination::new("S1", "2DL", LimitState::Serviceability).with_factor(LoadType::Dead, 2.0),
            LoadCombination::new("U1", "DL", LimitState::Ultimate).with_factor(LoadType::Dead, 1.0),
            LoadCombination::new("U2", "DL", LimitState::Ultimate).with_factor(LoadType::Dead, 1.0),
        ];
        let case = LoadCase::new("Tie").with_load(LoadType::Dead, 10.0);
        let results = evaluate_combinations(&case, &combos);
        assert_eq!(find_governing_for(&results, LimitState::Ultimate).unwrap().combination.name, "U1");
        assert_eq!(find_governing_combination(&results).unwrap().combination.name, "S1");
    }

    #[test]
    fn test_empty_results_have_no_governing() {
        assert!(find_governing_combination(&[]).is_none());
        assert!(find_governing_for(&[], LimitState::Ultimate).is_none());
    }
}
