//! # Quantities and Cost
//!
//! Material take-off for the deck, the piers and the two abutments, priced
//! with the unit rates of the configuration.
//!
//! - Line amount = quantity x rate
//! - Direct cost = Σ line amounts
//! - Contingency = % of direct cost
//! - Contractor's profit = % of (direct + contingency)
//! - Distribution = component subtotal / total, summing to 100 %
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::calculations::estimate::{calculate, ComponentQuantities, EstimateInput};
//! use bridge_core::config::UnitRates;
//!
//! let deck = ComponentQuantities { concrete_m3: 100.0, steel_kg: 11775.0, formwork_m2: 350.0, excavation_m3: 0.0, members: 1 };
//! let input = EstimateInput {
//!     bridge_length_m: 28.8,
//!     bridge_width_m: 12.0,
//!     deck,
//!     pier: ComponentQuantities::default(),
//!     abutment: ComponentQuantities::default(),
//! };
//!
//! let result = calculate(&input, &UnitRates::default()).unwrap();
//! let percent: f64 = result.distribution.iter().map(|s| s.percent).sum();
//! assert!((percent - 100.0).abs() < 0.1);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::abutment::AbutmentDesign;
use crate::calculations::foundation::FoundationResult;
use crate::calculations::reinforcement::{ReinforcedComponent, ReinforcementResult};
use crate::config::{non_negative, positive, DesignConfig, UnitRates};
use crate::errors::CalcResult;
use crate::input::DesignInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostComponent {
    Deck,
    Piers,
    Abutments,
    Contingency,
    ContractorProfit,
}

impl CostComponent {
    pub fn description(&self) -> &'static str {
        match self {
            CostComponent::Deck => "Deck slab and footpaths",
            CostComponent::Piers => "Piers",
            CostComponent::Abutments => "Abutments",
            CostComponent::Contingency => "Contingency",
            CostComponent::ContractorProfit => "Contractor's profit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Concrete,
    Steel,
    Formwork,
    Excavation,
}

impl Material {
    pub const ALL: [Material; 4] = [Material::Concrete, Material::Steel, Material::Formwork, Material::Excavation];

    pub fn unit(&self) -> &'static str {
        match self {
            Material::Concrete | Material::Excavation => "m³",
            Material::Steel => "kg",
            Material::Formwork => "m²",
        }
    }

    fn rate(&self, rates: &UnitRates) -> f64 {
        match self {
            Material::Concrete => rates.concrete_per_m3,
            Material::Steel => rates.steel_per_kg,
            Material::Formwork => rates.formwork_per_m2,
            Material::Excavation => rates.excavation_per_m3,
        }
    }
}

/// Quantities for one member and the number of identical members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentQuantities {
    pub concrete_m3: f64,
    pub steel_kg: f64,
    pub formwork_m2: f64,
    pub excavation_m3: f64,
    pub members: u32,
}

impl ComponentQuantities {
    fn validate(&self, component: &str) -> CalcResult<()> {
        non_negative(&format!("{component}.concrete_m3"), self.concrete_m3)?;
        non_negative(&format!("{component}.steel_kg"), self.steel_kg)?;
        non_negative(&format!("{component}.formwork_m2"), self.formwork_m2)?;
        non_negative(&format!("{component}.excavation_m3"), self.excavation_m3)?;
        Ok(())
    }

    /// Quantity across all members
    pub fn total(&self, material: Material) -> f64 {
        let per_member = match material {
            Material::Concrete => self.concrete_m3,
            Material::Steel => self.steel_kg,
            Material::Formwork => self.formwork_m2,
            Material::Excavation => self.excavation_m3,
        };
        per_member * f64::from(self.members)
    }

    /// Cost across all members before contingency and profit
    pub fn direct_cost(&self, rates: &UnitRates) -> f64 {
        Material::ALL
            .iter()
            .map(|material| self.total(*material) * material.rate(rates))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub bridge_length_m: f64,
    pub bridge_width_m: f64,
    pub deck: ComponentQuantities,
    pub pier: ComponentQuantities,
    pub abutment: ComponentQuantities,
}

impl EstimateInput {
    /// Take off quantities from the design results
    ///
    /// Pier quantities use the designed footing; abutment quantities use the
    /// selected variant.
    pub fn from_design(
        input: &DesignInput,
        footing: &FoundationResult,
        reinforcement: &ReinforcementResult,
        abutment: &AbutmentDesign,
        config: &DesignConfig,
    ) -> Self {
        let constants = &config.constants;
        let project = &input.project;
        let deck = &input.deck;
        let pier = &input.pier;
        let length = project.bridge_length_m();
        let working = constants.excavation_working_space_m;
        let extra_depth = constants.excavation_extra_depth_m;

        let deck_concrete = length * project.bridge_width_m * deck.slab_thickness_m
            + 2.0 * length * deck.footpath_width_m * deck.footpath_thickness_m;
        let deck_quantities = ComponentQuantities {
            concrete_m3: deck_concrete,
            steel_kg: deck_concrete * constants.deck_steel_percent / 100.0 * constants.steel_density_kg_m3,
            formwork_m2: length * project.bridge_width_m + 2.0 * length * deck.slab_thickness_m,
            excavation_m3: 0.0,
            members: 1,
        };

        let stem_height = input.pier_stem_height_m();
        let per_member = |component| {
            reinforcement
                .schedule(component)
                .map(|s| s.weight_per_member_kg)
                .unwrap_or(0.0)
        };
        let pier_quantities = ComponentQuantities {
            concrete_m3: pier.cap_length_m * pier.cap_width_m * pier.cap_thickness_m
                + pier.stem_width_m * pier.stem_length_m * stem_height
                + footing.length_m * footing.width_m * footing.thickness_m,
            steel_kg: per_member(ReinforcedComponent::PierCap)
                + per_member(ReinforcedComponent::PierStem)
                + per_member(ReinforcedComponent::PierFooting),
            formwork_m2: 2.0 * (pier.stem_width_m + pier.stem_length_m) * stem_height
                + 2.0 * (pier.cap_length_m + pier.cap_width_m) * pier.cap_thickness_m
                + (pier.cap_length_m * pier.cap_width_m - pier.stem_width_m * pier.stem_length_m).max(0.0)
                + 2.0 * (footing.length_m + footing.width_m) * footing.thickness_m,
            excavation_m3: (footing.length_m + 2.0 * working)
                * (footing.width_m + 2.0 * working)
                * (footing.thickness_m + extra_depth),
            members: project.num_piers(),
        };

        let abutment_quantities = ComponentQuantities {
            steel_kg: per_member(ReinforcedComponent::AbutmentStem),
            ..abutment.quantities(
                &input.abutment.wing_walls,
                input.material.concrete_unit_weight_kn_m3,
                constants,
            )
        };

        EstimateInput {
            bridge_length_m: length,
            bridge_width_m: project.bridge_width_m,
            deck: deck_quantities,
            pier: pier_quantities,
            abutment: abutment_quantities,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        positive("bridge_length_m", self.bridge_length_m)?;
        positive("bridge_width_m", self.bridge_width_m)?;
        self.deck.validate("deck")?;
        self.pier.validate("pier")?;
        self.abutment.validate("abutment")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub component: CostComponent,
    pub material: Material,
    pub quantity: f64,
    pub unit: String,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub concrete_m3: f64,
    pub steel_kg: f64,
    pub formwork_m2: f64,
    pub excavation_m3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostShare {
    pub component: CostComponent,
    pub amount: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub line_items: Vec<LineItem>,
    pub material_summary: MaterialSummary,
    pub direct_cost: f64,
    pub contingency: f64,
    pub contractor_profit: f64,
    pub total_cost: f64,
    pub distribution: Vec<CostShare>,
    pub deck_area_m2: f64,
    pub cost_per_m2: f64,
}

impl EstimationResult {
    pub fn share(&self, component: CostComponent) -> Option<&CostShare> {
        self.distribution.iter().find(|s| s.component == component)
    }
}

pub fn calculate(input: &EstimateInput, rates: &UnitRates) -> CalcResult<EstimationResult> {
    input.validate()?;
    rates.validate()?;

    let groups = [
        (CostComponent::Deck, &input.deck),
        (CostComponent::Piers, &input.pier),
        (CostComponent::Abutments, &input.abutment),
    ];

    let mut line_items = Vec::new();
    let mut summary = MaterialSummary::default();
    for (component, quantities) in groups {
        for material in Material::ALL {
            let quantity = quantities.total(material);
            match material {
                Material::Concrete => summary.concrete_m3 += quantity,
                Material::Steel => summary.steel_kg += quantity,
                Material::Formwork => summary.formwork_m2 += quantity,
                Material::Excavation => summary.excavation_m3 += quantity,
            }
            if quantity > 0.0 {
                let rate = material.rate(rates);
                line_items.push(LineItem {
                    component,
                    material,
                    quantity,
                    unit: material.unit().to_string(),
                    rate,
                    amount: quantity * rate,
                });
            }
        }
    }

    let subtotal = |component: CostComponent| -> f64 {
        line_items
            .iter()
            .filter(|l| l.component == component)
            .map(|l| l.amount)
            .sum()
    };
    let deck = subtotal(CostComponent::Deck);
    let piers = subtotal(CostComponent::Piers);
    let abutments = subtotal(CostComponent::Abutments);

    let direct = deck + piers + abutments;
    let contingency = direct * rates.contingency_percent / 100.0;
    let profit = (direct + contingency) * rates.contractor_profit_percent / 100.0;
    let total = direct + contingency + profit;

    let distribution = [
        (CostComponent::Deck, deck),
        (CostComponent::Piers, piers),
        (CostComponent::Abutments, abutments),
        (CostComponent::Contingency, contingency),
        (CostComponent::ContractorProfit, profit),
    ]
    .into_iter()
    .map(|(component, amount)| CostShare {
        component,
        amount,
        percent: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
    })
    .collect();

    let deck_area = input.bridge_length_m * input.bridge_width_m;

    Ok(EstimationResult {
        line_items,
        material_summary: summary,
        direct_cost: direct,
        contingency,
        contractor_profit: profit,
        total_cost: total,
        distribution,
        deck_area_m2: deck_area,
        cost_per_m2: total / deck_area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quantities(concrete_m3: f64, steel_kg: f64, members: u32) -> ComponentQuantities {
        ComponentQuantities {
            concrete_m3,
            steel_kg,
            formwork_m2: 10.0,
            excavation_m3: 5.0,
            members,
        }
    }

    fn input() -> EstimateInput {
        EstimateInput {
            bridge_length_m: 20.0,
            bridge_width_m: 10.0,
            deck: quantities(100.0, 1000.0, 1),
            pier: quantities(20.0, 500.0, 1),
            abutment: quantities(30.0, 400.0, 2),
        }
    }

    #[test]
    fn test_line_amount_is_quantity_times_rate() {
        let result = calculate(&input(), &UnitRates::default()).unwrap();
        for line in &result.line_items {
            assert!((line.amount - line.quantity * line.rate).abs() < 1e-9);
        }
        let deck_concrete = result
            .line_items
            .iter()
            .find(|l| l.component == CostComponent::Deck && l.material == Material::Concrete)
            .unwrap();
        assert_eq!(deck_concrete.amount, 100.0 * 8500.0);
        assert_eq!(deck_concrete.unit, "m³");
    }

    #[test]
    fn test_member_counts_multiply() {
        let result = calculate(&input(), &UnitRates::default()).unwrap();
        assert!((result.material_summary.concrete_m3 - (100.0 + 20.0 + 60.0)).abs() < 1e-9);
        assert!((result.material_summary.steel_kg - (1000.0 + 500.0 + 800.0)).abs() < 1e-9);
    }

    #[test]
    fn test_contingency_and_profit() {
        let rates = UnitRates::default();
        let result = calculate(&input(), &rates).unwrap();
        let direct: f64 = result.line_items.iter().map(|l| l.amount).sum();
        assert!((result.direct_cost - direct).abs() < 1e-6);
        assert!((result.contingency - 0.10 * direct).abs() < 1e-6);
        assert!((result.contractor_profit - 0.12 * 1.10 * direct).abs() < 1e-6);
        assert!((result.cost_per_m2 - result.total_cost / 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_piers_for_single_span() {
        let mut single = input();
        single.pier.members = 0;
        let result = calculate(&single, &UnitRates::default()).unwrap();
        assert!(result.line_items.iter().all(|l| l.component != CostComponent::Piers));
        assert_eq!(result.share(CostComponent::Piers).unwrap().amount, 0.0);
    }

    #[test]
    fn test_direct_cost_matches_line_items() {
        let rates = UnitRates::default();
        let input = input();
        let result = calculate(&input, &rates).unwrap();
        let abutment_lines: f64 = result
            .line_items
            .iter()
            .filter(|l| l.component == CostComponent::Abutments)
            .map(|l| l.amount)
            .sum();
        assert!((input.abutment.direct_cost(&rates) - abutment_lines).abs() < 1e-6);
        // 2 x (30·8500 + 400·75 + 10·450 + 5·180)
        assert!((input.abutment.direct_cost(&rates) - 580_800.0).abs() < 1e-6);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut bad = input();
        bad.deck.concrete_m3 = -1.0;
        assert!(calculate(&bad, &UnitRates::default()).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn group() -> impl Strategy<Value = ComponentQuantities> {
        (0.0_f64..500.0, 0.0_f64..50000.0, 0.0_f64..800.0, 0.0_f64..400.0, 0_u32..6).prop_map(
            |(concrete_m3, steel_kg, formwork_m2, excavation_m3, members)| ComponentQuantities {
                concrete_m3,
                steel_kg,
                formwork_m2,
                excavation_m3,
                members,
            },
        )
    }

    proptest! {
        #[test]
        fn distribution_sums_to_hundred(
            deck in group(),
            pier in group(),
            abutment in group(),
            contingency in 0.0_f64..20.0,
            profit in 0.0_f64..20.0,
        ) {
            let mut deck = deck;
            deck.concrete_m3 += 1.0;
            deck.members = deck.members.max(1);
            let input = EstimateInput {
                bridge_length_m: 30.0,
                bridge_width_m: 12.0,
                deck,
                pier,
                abutment,
            };
            let rates = UnitRates {
                contingency_percent: contingency,
                contractor_profit_percent: profit,
                ..UnitRates::default()
            };
            let result = calculate(&input, &rates).unwrap();
            let percent: f64 = result.distribution.iter().map(|s| s.percent).sum();
            prop_assert!((percent - 100.0).abs() < 0.1);
            let amounts: f64 = result.distribution.iter().map(|s| s.amount).sum();
            prop_assert!((amounts - result.total_cost).abs() <= 1e-6 * result.total_cost);
        }
    }
}
