//! Request types for the Budget Engine API.
//!
//! Field names follow the engine's English naming; the backend's original
//! names (`cantidad`, `logisticas`, `impuestos`, ...) are accepted as
//! aliases so saved payloads can be posted unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CatalogId, LogisticsStage};
use crate::money::MoneyInput;

/// Request body for `POST /budgets/breakdown`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRequest {
    /// Budget date; today when absent.
    #[serde(default, alias = "fecha")]
    pub date: Option<NaiveDate>,
    /// Machine lines.
    #[serde(default)]
    pub items: Vec<ItemRequest>,
    /// Selected logistics legs.
    #[serde(default, alias = "logisticas")]
    pub logistics: Vec<LogisticsRequest>,
    /// Tax selections. When absent, the catalog's always-included taxes apply.
    #[serde(default, alias = "impuestos")]
    pub taxes: Option<Vec<TaxRequest>>,
}

/// A machine line in a breakdown request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    /// Machine id.
    #[serde(alias = "machine_base")]
    pub machine_base_id: CatalogId,
    /// Quantity; values below 1 are clamped to 1.
    #[serde(default = "default_quantity", alias = "cantidad")]
    pub quantity: i64,
    /// Unit price override.
    #[serde(default, alias = "machine_total")]
    pub unit_price: Option<MoneyInput>,
    /// Attached accessories.
    #[serde(default, alias = "accesorios")]
    pub accessories: Vec<AccessoryRequest>,
}

/// An accessory attached to a machine line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryRequest {
    /// Accessory id.
    #[serde(alias = "accessory")]
    pub accessory_id: CatalogId,
    /// Quantity; values below 1 are clamped to 1.
    #[serde(default = "default_quantity", alias = "cantidad")]
    pub quantity: i64,
    /// Unit price override.
    #[serde(default, alias = "accessory_total")]
    pub unit_price: Option<MoneyInput>,
}

/// A selected logistics leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsRequest {
    /// Leg id.
    #[serde(alias = "logistics_leg")]
    pub logistics_leg_id: CatalogId,
    /// Total override; the catalog total when absent.
    #[serde(default)]
    pub total: Option<MoneyInput>,
    /// Stage override; the catalog stage when absent.
    #[serde(default, alias = "etapa")]
    pub stage: Option<LogisticsStage>,
}

/// A tax selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRequest {
    /// Tax id.
    #[serde(alias = "tax")]
    pub tax_id: CatalogId,
    /// Whether the tax is included.
    #[serde(default = "default_included", alias = "incluido")]
    pub included: bool,
    /// Percentage override; the catalog percentage when absent.
    #[serde(default, alias = "porcentaje")]
    pub percentage: Option<MoneyInput>,
}

/// Request body for `POST /pricing/suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSuggestionRequest {
    /// Unit cost.
    #[serde(alias = "costo")]
    pub cost: MoneyInput,
}

fn default_quantity() -> i64 {
    1
}

fn default_included() -> bool {
    true
}
