//! Load type definitions per IRC 6
//!
//! The load categories that enter the pier and foundation combinations.

use serde::{Deserialize, Serialize};

/// Load types per IRC 6
///
/// Each load type has the abbreviation used in combination equations.
///
/// # Example
/// ```
/// use bridge_core::loads::LoadType;
///
/// let dead = LoadType::Dead;
/// assert_eq!(dead.code(), "DL");
/// assert_eq!(dead.description(), "Dead load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// DL - Self-weight of superstructure and substructure
    Dead,
    /// LL - Vehicular live load including impact
    Live,
    /// W - Wind load on the superstructure
    Wind,
    /// EQ - Seismic (earthquake) load
    Seismic,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 4] = [LoadType::Dead, LoadType::Live, LoadType::Wind, LoadType::Seismic];

    /// Standard abbreviation code (DL, LL, W, EQ)
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "DL",
            LoadType::Live => "LL",
            LoadType::Wind => "W",
            LoadType::Seismic => "EQ",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::Live => "Live load",
            LoadType::Wind => "Wind load",
            LoadType::Seismic => "Seismic load",
        }
    }

    /// Whether this load type acts vertically
    pub fn is_gravity(&self) -> bool {
        matches!(self, LoadType::Dead | LoadType::Live)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
