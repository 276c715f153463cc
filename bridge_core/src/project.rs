//! # Project Container
//!
//! A [`BridgeProject`] is what lives in a `.sbd` file: metadata for the
//! title block, the design configuration, and the input bundle for one
//! bridge.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::project::BridgeProject;
//!
//! let project = BridgeProject::new("Engineer", "SB-001", "PWD Udaipur");
//! assert!(project.input.validate().is_ok());
//!
//! let json = serde_json::to_string(&project).unwrap();
//! assert!(json.contains("SB-001"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DesignConfig;
use crate::errors::CalcResult;
use crate::input::DesignInput;
use crate::pipeline::{self, DesignReport};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A slab-bridge project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeProject {
    pub meta: ProjectMetadata,

    /// Limits, unit rates and code constants used for this bridge
    #[serde(default)]
    pub config: DesignConfig,

    pub input: DesignInput,
}

impl BridgeProject {
    /// Create a project with the default input bundle and configuration.
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        Self::with_input(engineer, job_id, client, DesignInput::default())
    }

    /// Create a project around an existing input bundle.
    pub fn with_input(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        input: DesignInput,
    ) -> Self {
        let now = Utc::now();
        BridgeProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            config: DesignConfig::default(),
            input,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Run the full design with this project's configuration.
    pub fn run(&self) -> CalcResult<DesignReport> {
        pipeline::run(&self.input, &self.config)
    }
}

impl Default for BridgeProject {
    fn default() -> Self {
        BridgeProject::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client or owning department
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
