//! Catalog records.
//!
//! Machines, accessories, logistics legs and taxes as published by the
//! catalog. Drafts copy the values they need from these records at
//! selection time and never read them back afterwards.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier shared by every catalog entity.
pub type CatalogId = u64;

/// A base machine model that can be quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineBase {
    /// Catalog identifier.
    pub id: CatalogId,
    /// Display name.
    #[serde(alias = "nombre")]
    pub name: String,
    /// Catalog unit price.
    pub total: Decimal,
}

/// An accessory that can be attached to a machine line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    /// Catalog identifier.
    pub id: CatalogId,
    /// Display name.
    #[serde(alias = "nombre")]
    pub name: String,
    /// Catalog unit price.
    pub total: Decimal,
}

/// Transport mode of a logistics leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsType {
    /// Road transport.
    #[serde(alias = "TERRESTRE")]
    Land,
    /// Air freight.
    #[serde(alias = "AEREO")]
    Air,
    /// Sea freight.
    #[serde(alias = "MARITIMO")]
    Sea,
}

impl fmt::Display for LogisticsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogisticsType::Land => "LAND",
            LogisticsType::Air => "AIR",
            LogisticsType::Sea => "SEA",
        };
        f.write_str(label)
    }
}

/// Customs stage of a logistics leg.
///
/// Pre-customs legs are part of the taxable base; post-customs legs are
/// added to the grand total after taxes.
///
/// # Example
///
/// ```
/// use budget_engine::models::LogisticsStage;
///
/// let stage: LogisticsStage = serde_json::from_str("\"HASTA_ADUANA\"").unwrap();
/// assert_eq!(stage, LogisticsStage::PreCustoms);
/// assert!(stage.is_taxable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogisticsStage {
    /// Up to and including customs clearance.
    #[serde(alias = "HASTA_ADUANA", alias = "PRE")]
    PreCustoms,
    /// After customs clearance.
    #[serde(alias = "POST_ADUANA", alias = "POST")]
    PostCustoms,
}

impl LogisticsStage {
    /// Returns true when costs in this stage enter the taxable base.
    pub fn is_taxable(self) -> bool {
        matches!(self, LogisticsStage::PreCustoms)
    }
}

impl fmt::Display for LogisticsStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogisticsStage::PreCustoms => "PRE_CUSTOMS",
            LogisticsStage::PostCustoms => "POST_CUSTOMS",
        };
        f.write_str(label)
    }
}

/// A priced transport leg between two places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsLeg {
    /// Catalog identifier.
    pub id: CatalogId,
    /// Origin.
    #[serde(alias = "desde")]
    pub origin: String,
    /// Destination.
    #[serde(alias = "hasta")]
    pub destination: String,
    /// Transport mode.
    #[serde(alias = "tipo")]
    pub kind: LogisticsType,
    /// Customs stage.
    #[serde(alias = "etapa")]
    pub stage: LogisticsStage,
    /// Catalog price of the leg.
    pub total: Decimal,
}

impl LogisticsLeg {
    /// Human-readable label, e.g. `Shanghai -> Buenos Aires (SEA, PRE_CUSTOMS)`.
    pub fn label(&self) -> String {
        format!(
            "{} -> {} ({}, {})",
            self.origin, self.destination, self.kind, self.stage
        )
    }
}

/// A percentage tax applicable to budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tax {
    /// Catalog identifier.
    pub id: CatalogId,
    /// Display name.
    #[serde(alias = "nombre")]
    pub name: String,
    /// Percentage applied to the taxable base (0-100).
    #[serde(alias = "porcentaje")]
    pub percentage: Decimal,
    /// Whether new drafts include this tax by default.
    #[serde(default, alias = "siempre_incluir")]
    pub always_include: bool,
    /// Minimum amount maintained by the backend; displayed only.
    #[serde(default, alias = "monto_minimo")]
    pub minimum_amount: Option<Decimal>,
}
