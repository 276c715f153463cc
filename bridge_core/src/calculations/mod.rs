//! # Design Stages
//!
//! Each stage of the slab-bridge design follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable), usually built with
//!   `from_design` from the input bundle and earlier stage results
//! - `*Result` - Stage results (JSON-serializable)
//! - `calculate(&input, &config) -> CalcResult<*Result>` - Pure calculation function
//!
//! Unsafe outcomes (afflux over the limit, a low safety factor, bearing
//! overstress) come back as flags on the result. Only bad data or a footing
//! search that never converges is an error.
//!
//! ## Stages
//!
//! - [`hydraulics`] - Waterway, velocity and afflux
//! - [`scour`] - Lacey scour depth and bed protection
//! - [`load_analysis`] - Pier dead/live loads and load combinations
//! - [`pier_stability`] - Overturning and sliding of the pier
//! - [`foundation`] - Bearing pressure and footing sizing
//! - [`abutment`] - Battered and cantilever abutments, compared
//! - [`reinforcement`] - Main steel and bar schedule
//! - [`estimate`] - Quantities and cost

pub mod abutment;
pub mod estimate;
pub mod foundation;
pub mod hydraulics;
pub mod load_analysis;
pub mod pier_stability;
pub mod reinforcement;
pub mod scour;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use abutment::{AbutmentComparison, AbutmentDesign, AbutmentInput, ComparisonSummary};
pub use estimate::{EstimateInput, EstimationResult};
pub use foundation::{FoundationInput, FoundationResult};
pub use hydraulics::{HydraulicInput, HydraulicResult};
pub use load_analysis::{LoadInput, LoadSet};
pub use pier_stability::{StabilityInput, StabilityResult, StabilityStatus};
pub use reinforcement::{ReinforcementInput, ReinforcementResult};
pub use scour::{ScourInput, ScourResult};

/// The pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Hydraulics,
    Scour,
    Loads,
    PierStability,
    Foundation,
    Abutment,
    Reinforcement,
    Estimate,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Hydraulics,
        Stage::Scour,
        Stage::Loads,
        Stage::PierStability,
        Stage::Foundation,
        Stage::Abutment,
        Stage::Reinforcement,
        Stage::Estimate,
    ];

    /// Get the stage name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Hydraulics => "Hydraulics",
            Stage::Scour => "Scour",
            Stage::Loads => "Loads",
            Stage::PierStability => "Pier stability",
            Stage::Foundation => "Foundation",
            Stage::Abutment => "Abutment",
            Stage::Reinforcement => "Reinforcement",
            Stage::Estimate => "Estimate",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
