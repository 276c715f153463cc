//! # Project Templates
//!
//! Parameter presets for bridges the design office has already built.
//! A template is only a starting [`DesignInput`]; every value can be edited
//! in the saved project before a run.
//!
//! | Template | Spans | Abutment |
//! |----------|-------|----------|
//! | UIT | 3 x 9.6 m | Type-1 Battered |
//! | Chittorgarh | 2 x 10 m | Type-2 Cantilever |
//! | Kherwara | 4 x 8 m | Type-1 Battered |
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::templates::Template;
//!
//! let template: Template = "kherwara".parse().unwrap();
//! let project = template.project("Engineer", "SB-002", "PWD Dungarpur");
//! assert_eq!(project.input.project.num_spans, 4);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::input::{AbutmentType, DesignInput};
use crate::materials::{ConcreteGrade, MaterialProperties, SteelGrade};
use crate::project::BridgeProject;

/// Built-in project templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Template {
    Uit,
    Chittorgarh,
    Kherwara,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Uit, Template::Chittorgarh, Template::Kherwara];

    /// Short name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Template::Uit => "uit",
            Template::Chittorgarh => "chittorgarh",
            Template::Kherwara => "kherwara",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Uit => "UIT slab bridge, three spans on battered abutments",
            Template::Chittorgarh => "Chittorgarh district bridge, two spans on cantilever abutments",
            Template::Kherwara => "Kherwara river bridge, four spans on battered abutments",
        }
    }

    /// Parse a template name, ignoring case and a trailing " template".
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let normalized = s.trim().to_lowercase();
        let name = normalized.strip_suffix(" template").unwrap_or(&normalized);
        match name {
            "uit" => Ok(Template::Uit),
            "chittorgarh" | "chittor" => Ok(Template::Chittorgarh),
            "kherwara" => Ok(Template::Kherwara),
            _ => Err(CalcError::invalid_input(
                "template",
                s,
                "Expected one of: uit, chittorgarh, kherwara",
            )),
        }
    }

    /// The preset input bundle
    pub fn input(&self) -> DesignInput {
        match self {
            Template::Uit => uit(),
            Template::Chittorgarh => chittorgarh(),
            Template::Kherwara => kherwara(),
        }
    }

    /// A new project seeded with this template
    pub fn project(
        &self,
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> BridgeProject {
        BridgeProject::with_input(engineer, job_id, client, self.input())
    }
}

impl FromStr for Template {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::from_str_flexible(s)
    }
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn uit() -> DesignInput {
    let mut input = DesignInput::default();
    input.project.bridge_name = "UIT Slab Bridge".to_string();
    input.project.location = "Udaipur".to_string();
    input
}

fn chittorgarh() -> DesignInput {
    let mut input = DesignInput::default();
    input.project.bridge_name = "Chittorgarh District Bridge".to_string();
    input.project.location = "Chittorgarh".to_string();
    input.project.effective_span_m = 10.0;
    input.project.bridge_width_m = 10.0;
    input.project.num_spans = 2;
    input.abutment_type = AbutmentType::Cantilever;

    input.soil.safe_bearing_capacity_kn_m2 = 350.0;
    input.soil.friction_angle_deg = 28.0;

    input.deck.slab_thickness_m = 0.55;

    input.pier.stem_length_m = 7.0;
    input.pier.cap_length_m = 9.0;
    input.pier.footing_width_m = 8.0;

    input.abutment.wing_walls.length_m = 5.0;
    input
}

fn kherwara() -> DesignInput {
    let mut input = DesignInput::default();
    input.project.bridge_name = "Kherwara River Bridge".to_string();
    input.project.location = "Kherwara".to_string();
    input.project.effective_span_m = 8.0;
    input.project.bridge_width_m = 14.0;
    input.project.num_spans = 4;
    input.abutment_type = AbutmentType::Battered;

    input.soil.safe_bearing_capacity_kn_m2 = 500.0;
    input.soil.friction_angle_deg = 32.0;
    input.material = MaterialProperties::new(ConcreteGrade::M30, SteelGrade::Fe500);

    input.deck.slab_thickness_m = 0.65;

    input.pier.stem_length_m = 10.0;
    input.pier.cap_length_m = 13.0;
    input.pier.footing_width_m = 11.0;

    input.abutment.wing_walls.length_m = 7.0;
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_validate() {
        for template in Template::ALL {
            let input = template.input();
            assert!(
                input.validate().is_ok(),
                "{} template failed validation: {:?}",
                template,
                input.validate()
            );
        }
    }

    #[test]
    fn test_template_abutment_types() {
        assert_eq!(Template::Uit.input().abutment_type, AbutmentType::Battered);
        assert_eq!(Template::Chittorgarh.input().abutment_type, AbutmentType::Cantilever);
        assert_eq!(Template::Kherwara.input().abutment_type, AbutmentType::Battered);
    }

    #[test]
    fn test_uit_is_default_geometry() {
        let uit = Template::Uit.input();
        let default = DesignInput::default();
        assert_eq!(uit.project.effective_span_m, default.project.effective_span_m);
        assert_eq!(uit.pier, default.pier);
        assert_eq!(uit.hydraulics, default.hydraulics);
    }

    #[test]
    fn test_kherwara_materials() {
        let input = Template::Kherwara.input();
        assert_eq!(input.material.concrete_grade, ConcreteGrade::M30);
        assert!((input.project.bridge_length_m() - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_template_names() {
        assert_eq!(Template::from_str_flexible("UIT").unwrap(), Template::Uit);
        assert_eq!(Template::from_str_flexible(" Chittor ").unwrap(), Template::Chittorgarh);
        assert_eq!("Kherwara Template".parse::<Template>().unwrap(), Template::Kherwara);

        let err = Template::from_str_flexible("jaipur").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_names_roundtrip() {
        for template in Template::ALL {
            assert_eq!(Template::from_str_flexible(template.name()).unwrap(), template);
        }
    }

    #[test]
    fn test_template_project_metadata() {
        let project = Template::Chittorgarh.project("Engineer", "SB-003", "PWD");
        assert_eq!(project.meta.job_id, "SB-003");
        assert_eq!(project.input.project.location, "Chittorgarh");
    }
}
