//! Quote models.
//!
//! A [`BudgetQuote`] is what the preview API returns for a draft: the
//! breakdown, its display strings, the priced lines and the audit trace
//! explaining every figure.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, BudgetBreakdown, CatalogId, FormattedBreakdown, TaxLine};

/// Category of a quote line.
///
/// # Example
///
/// ```
/// use budget_engine::models::QuoteCategory;
///
/// let json = serde_json::to_string(&QuoteCategory::PreCustomsLogistics).unwrap();
/// assert_eq!(json, "\"pre_customs_logistics\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteCategory {
    /// A machine line.
    Machine,
    /// An accessory attached to a machine line.
    Accessory,
    /// A logistics leg up to customs.
    PreCustomsLogistics,
    /// A logistics leg after customs.
    PostCustomsLogistics,
}

/// A single priced line of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLine {
    /// The category of this line.
    pub category: QuoteCategory,
    /// Catalog id of the priced entity.
    pub reference_id: CatalogId,
    /// Display label.
    pub label: String,
    /// Quantity; 1 for logistics legs.
    pub quantity: u32,
    /// Resolved unit price.
    pub unit_price: Decimal,
    /// `unit_price × quantity`.
    pub amount: Decimal,
}

/// The complete result of pricing a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetQuote {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the quote.
    pub engine_version: String,
    /// The computed figures at full precision.
    pub breakdown: BudgetBreakdown,
    /// Display strings for the figures.
    pub formatted: FormattedBreakdown,
    /// Priced lines in draft order.
    pub lines: Vec<QuoteLine>,
    /// One entry per tax selection.
    pub tax_lines: Vec<TaxLine>,
    /// Steps and warnings.
    pub audit_trace: AuditTrace,
}
