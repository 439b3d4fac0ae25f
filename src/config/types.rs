//! Catalog configuration types.
//!
//! This module contains the strongly-typed structures deserialized from
//! the catalog YAML files, and the [`Catalog`] they are assembled into.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Accessory, CatalogId, LogisticsLeg, MachineBase, Tax};

/// Metadata about the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    /// Human-readable name of the catalog.
    pub name: String,
    /// Currency every price is expressed in.
    pub currency: String,
    /// Version or publication date of the catalog.
    pub version: String,
}

/// Markups used to suggest selling and rental prices from a unit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    /// Markup over cost for the sale price (0.30 = 30%).
    pub sale_markup: Decimal,
    /// Fraction of cost charged per rental month (0.05 = 5%).
    pub rent_monthly_rate: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            sale_markup: Decimal::new(30, 2),
            rent_monthly_rate: Decimal::new(5, 2),
        }
    }
}

/// `machines.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct MachinesConfig {
    /// Machine models.
    pub machines: Vec<MachineBase>,
}

/// `accessories.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessoriesConfig {
    /// Accessories.
    pub accessories: Vec<Accessory>,
}

/// `logistics_legs.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticsLegsConfig {
    /// Logistics legs.
    pub logistics_legs: Vec<LogisticsLeg>,
}

/// `taxes.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxesConfig {
    /// Taxes.
    pub taxes: Vec<Tax>,
}

/// `pricing.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Price suggestion rules; defaults apply when the section is absent.
    #[serde(default)]
    pub pricing: PricingRules,
}

/// Complete catalog.
///
/// Entities are indexed by id in ordered maps so iteration is stable.
#[derive(Debug, Clone)]
pub struct Catalog {
    metadata: CatalogMetadata,
    machines: BTreeMap<CatalogId, MachineBase>,
    accessories: BTreeMap<CatalogId, Accessory>,
    logistics_legs: BTreeMap<CatalogId, LogisticsLeg>,
    taxes: BTreeMap<CatalogId, Tax>,
    pricing: PricingRules,
}

impl Catalog {
    /// Creates a catalog from its component parts.
    ///
    /// A later entry with a repeated id replaces the earlier one.
    pub fn new(
        metadata: CatalogMetadata,
        machines: Vec<MachineBase>,
        accessories: Vec<Accessory>,
        logistics_legs: Vec<LogisticsLeg>,
        taxes: Vec<Tax>,
        pricing: PricingRules,
    ) -> Self {
        Self {
            metadata,
            machines: machines.into_iter().map(|m| (m.id, m)).collect(),
            accessories: accessories.into_iter().map(|a| (a.id, a)).collect(),
            logistics_legs: logistics_legs.into_iter().map(|l| (l.id, l)).collect(),
            taxes: taxes.into_iter().map(|t| (t.id, t)).collect(),
            pricing,
        }
    }

    /// Returns the catalog metadata.
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Returns the price suggestion rules.
    pub fn pricing(&self) -> &PricingRules {
        &self.pricing
    }

    /// Looks up a machine by id.
    pub fn machine(&self, id: CatalogId) -> EngineResult<&MachineBase> {
        self.machines
            .get(&id)
            .ok_or(EngineError::MachineNotFound { id })
    }

    /// Looks up an accessory by id.
    pub fn accessory(&self, id: CatalogId) -> EngineResult<&Accessory> {
        self.accessories
            .get(&id)
            .ok_or(EngineError::AccessoryNotFound { id })
    }

    /// Looks up a logistics leg by id.
    pub fn logistics_leg(&self, id: CatalogId) -> EngineResult<&LogisticsLeg> {
        self.logistics_legs
            .get(&id)
            .ok_or(EngineError::LogisticsLegNotFound { id })
    }

    /// Looks up a tax by id.
    pub fn tax(&self, id: CatalogId) -> EngineResult<&Tax> {
        self.taxes.get(&id).ok_or(EngineError::TaxNotFound { id })
    }

    /// Iterates machines in id order.
    pub fn machines(&self) -> impl Iterator<Item = &MachineBase> {
        self.machines.values()
    }

    /// Iterates accessories in id order.
    pub fn accessories(&self) -> impl Iterator<Item = &Accessory> {
        self.accessories.values()
    }

    /// Iterates logistics legs in id order.
    pub fn logistics_legs(&self) -> impl Iterator<Item = &LogisticsLeg> {
        self.logistics_legs.values()
    }

    /// Iterates taxes in id order.
    pub fn taxes(&self) -> impl Iterator<Item = &Tax> {
        self.taxes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> CatalogMetadata {
        CatalogMetadata {
            name: "Test".to_string(),
            currency: "USD".to_string(),
            version: "1".to_string(),
        }
    }

    fn machine(id: CatalogId, name: &str) -> MachineBase {
        MachineBase {
            id,
            name: name.to_string(),
            total: Decimal::new(1000, 0),
        }
    }

    #[test]
    fn test_pricing_defaults() {
        let rules = PricingRules::default();
        assert_eq!(rules.sale_markup, Decimal::new(30, 2));
        assert_eq!(rules.rent_monthly_rate, Decimal::new(5, 2));
    }

    #[test]
    fn test_lookup_missing_machine() {
        let catalog = Catalog::new(metadata(), vec![], vec![], vec![], vec![], PricingRules::default());
        assert!(matches!(
            catalog.machine(4),
            Err(EngineError::MachineNotFound { id: 4 })
        ));
        assert!(matches!(catalog.tax(1), Err(EngineError::TaxNotFound { id: 1 })));
    }

    #[test]
    fn test_iteration_is_in_id_order() {
        let catalog = Catalog::new(
            metadata(),
            vec![machine(9, "Loader"), machine(2, "Crane")],
            vec![],
            vec![],
            vec![],
            PricingRules::default(),
        );
        let ids: Vec<CatalogId> = catalog.machines().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 9]);
    }

    #[test]
    fn test_repeated_id_keeps_last_entry() {
        let catalog = Catalog::new(
            metadata(),
            vec![machine(1, "Old"), machine(1, "New")],
            vec![],
            vec![],
            vec![],
            PricingRules::default(),
        );
        assert_eq!(catalog.machine(1).unwrap().name, "New");
    }

    #[test]
    fn test_pricing_section_is_optional() {
        let config: PricingConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.pricing, PricingRules::default());
    }
}
