//! # bridge_core - Slab Bridge Design Engine
//!
//! `bridge_core` runs the full design of a reinforced-concrete slab bridge:
//! waterway hydraulics, scour, pier loads and stability, open foundations,
//! two abutment variants, main reinforcement and a cost estimate. All inputs
//! and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Each stage is a pure function from input to result
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Flags, not panics**: An unsafe design is a result, not an error
//!
//! ## Quick Start
//!
//! ```rust
//! use bridge_core::{pipeline, DesignConfig, DesignInput};
//!
//! let input = DesignInput::default();
//! let report = pipeline::run(&input, &DesignConfig::default()).unwrap();
//!
//! for failure in report.design_status.failures() {
//!     println!("[FAIL] {}: {}", failure.stage, failure.check);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`input`] - The design input bundle
//! - [`config`] - Limits, unit rates and the code constants table
//! - [`calculations`] - The eight design stages
//! - [`pipeline`] - Runs the stages in order and assembles the report
//! - [`loads`] - Load types and IRC combinations
//! - [`materials`] - Concrete, steel and bar tables
//! - [`project`] - Project container and metadata
//! - [`templates`] - Built-in project presets
//! - [`errors`] - Structured error types
//! - [`file_io`] - Project files with atomic saves

pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod input;
pub mod loads;
pub mod materials;
pub mod pipeline;
pub mod project;
pub mod templates;

// Re-export commonly used types at crate root for convenience
pub use config::DesignConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_config, load_project, save_config, save_project};
pub use input::{AbutmentType, DesignInput};
pub use pipeline::{DesignCache, DesignReport, DesignStatus, FailedCheck};
pub use project::{BridgeProject, ProjectMetadata};
pub use templates::Template;
