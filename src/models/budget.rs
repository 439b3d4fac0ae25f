//! Saved budget records and submission payloads.
//!
//! A [`SavedBudget`] is what the backend returns for an existing budget;
//! it seeds a draft in edit mode. A [`BudgetPayload`] is what a draft
//! submits, with every override resolved to an exact amount.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{CatalogId, LogisticsStage};

/// Lifecycle status of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// Editable quote.
    Draft,
    /// Frozen quote, ready to be purchased.
    #[serde(alias = "CERRADO")]
    Closed,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::Draft => f.write_str("DRAFT"),
            BudgetStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

/// An accessory line stored with a saved budget item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBudgetAccessory {
    /// Accessory id.
    #[serde(alias = "accessory")]
    pub accessory_id: CatalogId,
    /// Quantity.
    #[serde(alias = "cantidad")]
    pub quantity: u32,
    /// Unit price the budget was saved with.
    #[serde(default)]
    pub accessory_total_snapshot: Option<Decimal>,
}

/// A machine line stored with a saved budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBudgetItem {
    /// Machine id.
    #[serde(alias = "machine_base")]
    pub machine_base_id: CatalogId,
    /// Quantity.
    #[serde(alias = "cantidad")]
    pub quantity: u32,
    /// Unit price the budget was saved with.
    #[serde(default)]
    pub machine_total_snapshot: Option<Decimal>,
    /// Accessories attached to this machine.
    #[serde(default, alias = "accesorios")]
    pub accessories: Vec<SavedBudgetAccessory>,
}

/// A logistics leg selected in a saved budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLogisticsLeg {
    /// Leg id.
    #[serde(alias = "logistics_leg")]
    pub logistics_leg_id: CatalogId,
    /// Leg total the budget was saved with.
    #[serde(default)]
    pub total_snapshot: Option<Decimal>,
    /// Stage, when the backend reports it.
    #[serde(default, alias = "etapa")]
    pub stage: Option<LogisticsStage>,
}

/// A tax applied in a saved budget.
///
/// The minimum and applied amounts are computed by the backend and kept
/// here only so they can be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTax {
    /// Tax id.
    #[serde(alias = "tax")]
    pub tax_id: CatalogId,
    /// Display name, when the backend reports it.
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    /// Whether the tax was included.
    #[serde(default = "default_included", alias = "incluido")]
    pub included: bool,
    /// Percentage the budget was saved with.
    #[serde(default, alias = "porcentaje_snapshot")]
    pub percentage_snapshot: Option<Decimal>,
    /// Backend-computed minimum amount.
    #[serde(default, alias = "monto_minimo_snapshot")]
    pub minimum_amount_snapshot: Option<Decimal>,
    /// Backend-computed applied amount.
    #[serde(default, alias = "monto_aplicado_snapshot")]
    pub applied_amount_snapshot: Option<Decimal>,
}

fn default_included() -> bool {
    true
}

/// A budget as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBudget {
    /// Backend id.
    pub id: u64,
    /// Budget number, e.g. `PRESU-20250301-...`.
    #[serde(alias = "numero")]
    pub number: String,
    /// Budget date.
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    /// Current status.
    #[serde(alias = "estado")]
    pub status: BudgetStatus,
    /// Machine lines.
    #[serde(default)]
    pub items: Vec<SavedBudgetItem>,
    /// Selected logistics legs.
    #[serde(default, alias = "logisticas")]
    pub logistics: Vec<SavedLogisticsLeg>,
    /// Tax selections.
    #[serde(default, alias = "impuestos")]
    pub taxes: Vec<SavedTax>,
    /// Grand total persisted by the backend.
    #[serde(default)]
    pub total_snapshot: Decimal,
    /// Whether a purchase already exists for this budget.
    #[serde(default, alias = "tiene_compra")]
    pub purchased: bool,
}

impl SavedBudget {
    /// Fails unless the budget is still a draft.
    pub fn ensure_editable(&self) -> EngineResult<()> {
        match self.status {
            BudgetStatus::Draft => self.ensure_not_purchased(),
            status => Err(EngineError::BudgetNotEditable {
                number: self.number.clone(),
                status: status.to_string(),
            }),
        }
    }

    /// Fails when a purchase already exists for the budget.
    pub fn ensure_not_purchased(&self) -> EngineResult<()> {
        if self.purchased {
            return Err(EngineError::BudgetAlreadyPurchased {
                number: self.number.clone(),
            });
        }
        Ok(())
    }

    /// Moves a draft budget to [`BudgetStatus::Closed`].
    pub fn close(&mut self) -> EngineResult<()> {
        self.ensure_editable()?;
        self.status = BudgetStatus::Closed;
        Ok(())
    }
}

/// Accessory line in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryPayload {
    /// Accessory id.
    pub accessory_id: CatalogId,
    /// Quantity (at least 1).
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: u32,
    /// Resolved unit price.
    pub accessory_total: Decimal,
}

/// Machine line in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItemPayload {
    /// Machine id.
    pub machine_base_id: CatalogId,
    /// Quantity (at least 1).
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: u32,
    /// Resolved unit price.
    pub machine_total: Decimal,
    /// Attached accessories.
    #[serde(rename = "accesorios", alias = "accessories")]
    pub accessories: Vec<AccessoryPayload>,
}

/// Selected logistics leg in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogisticsPayload {
    /// Leg id.
    pub logistics_leg_id: CatalogId,
    /// Resolved leg total.
    pub total: Decimal,
}

/// Tax selection in a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxPayload {
    /// Tax id.
    pub tax_id: CatalogId,
    /// Whether the tax is included.
    #[serde(rename = "incluido", alias = "included")]
    pub included: bool,
    /// Resolved percentage.
    #[serde(rename = "porcentaje", alias = "percentage")]
    pub percentage: Decimal,
}

/// Everything the backend needs to create or update a budget.
///
/// Serializes with the backend's field names (`fecha`, `cantidad`,
/// `accesorios`, `logisticas`, `impuestos`, `incluido`, `porcentaje`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPayload {
    /// Budget date.
    #[serde(rename = "fecha", alias = "date")]
    pub date: NaiveDate,
    /// Machine lines.
    pub items: Vec<BudgetItemPayload>,
    /// Selected logistics legs.
    #[serde(rename = "logisticas", alias = "logistics")]
    pub logistics: Vec<LogisticsPayload>,
    /// Tax selections.
    #[serde(rename = "impuestos", alias = "taxes")]
    pub taxes: Vec<TaxPayload>,
}
