//! Budget breakdown models.
//!
//! A [`BudgetBreakdown`] is derived data: a pure function of the current
//! draft, recomputed on every change and never persisted by this crate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{format_usd_amount, round_money};

use super::{AuditStep, CatalogId};

/// Monetary breakdown of a budget draft.
///
/// Values are kept at full precision; use [`BudgetBreakdown::rounded`] or
/// [`BudgetBreakdown::formatted`] for presentation.
///
/// # Invariants
///
/// - `taxable_base = machines_subtotal + accessories_subtotal + pre_customs_logistics`
/// - `customs_cost = pre_customs_logistics + taxes_total`
/// - `grand_total = taxable_base + taxes_total + post_customs_logistics`
///
/// # Example
///
/// ```
/// use budget_engine::models::BudgetBreakdown;
/// use rust_decimal::Decimal;
///
/// let empty = BudgetBreakdown::default();
/// assert_eq!(empty.grand_total, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    /// Sum of machine unit price × quantity.
    pub machines_subtotal: Decimal,
    /// Sum of accessory unit price × quantity across all machine lines.
    pub accessories_subtotal: Decimal,
    /// Selected logistics legs up to customs.
    pub pre_customs_logistics: Decimal,
    /// Selected logistics legs after customs.
    pub post_customs_logistics: Decimal,
    /// Base on which every included tax is computed.
    pub taxable_base: Decimal,
    /// Sum of included tax amounts.
    pub taxes_total: Decimal,
    /// Cost incurred up to customs clearance: pre-customs logistics plus taxes.
    pub customs_cost: Decimal,
    /// Final amount of the budget.
    pub grand_total: Decimal,
}

impl BudgetBreakdown {
    /// Returns a copy with every figure rounded to cents.
    pub fn rounded(&self) -> Self {
        Self {
            machines_subtotal: round_money(self.machines_subtotal),
            accessories_subtotal: round_money(self.accessories_subtotal),
            pre_customs_logistics: round_money(self.pre_customs_logistics),
            post_customs_logistics: round_money(self.post_customs_logistics),
            taxable_base: round_money(self.taxable_base),
            taxes_total: round_money(self.taxes_total),
            customs_cost: round_money(self.customs_cost),
            grand_total: round_money(self.grand_total),
        }
    }

    /// Returns display strings for every figure.
    pub fn formatted(&self) -> FormattedBreakdown {
        FormattedBreakdown {
            machines_subtotal: format_usd_amount(self.machines_subtotal),
            accessories_subtotal: format_usd_amount(self.accessories_subtotal),
            pre_customs_logistics: format_usd_amount(self.pre_customs_logistics),
            post_customs_logistics: format_usd_amount(self.post_customs_logistics),
            taxable_base: format_usd_amount(self.taxable_base),
            taxes_total: format_usd_amount(self.taxes_total),
            customs_cost: format_usd_amount(self.customs_cost),
            grand_total: format_usd_amount(self.grand_total),
        }
    }
}

/// Display version of a [`BudgetBreakdown`], e.g. `"U$D 1.210,00"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedBreakdown {
    /// Formatted machines subtotal.
    pub machines_subtotal: String,
    /// Formatted accessories subtotal.
    pub accessories_subtotal: String,
    /// Formatted pre-customs logistics.
    pub pre_customs_logistics: String,
    /// Formatted post-customs logistics.
    pub post_customs_logistics: String,
    /// Formatted taxable base.
    pub taxable_base: String,
    /// Formatted taxes total.
    pub taxes_total: String,
    /// Formatted customs cost.
    pub customs_cost: String,
    /// Formatted grand total.
    pub grand_total: String,
}

/// The contribution of one tax selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxLine {
    /// The tax id.
    pub tax_id: CatalogId,
    /// Display name captured at selection.
    pub name: String,
    /// Whether the tax contributes to the total.
    pub included: bool,
    /// Resolved percentage.
    pub percentage: Decimal,
    /// Amount contributed; zero when not included.
    pub amount: Decimal,
}

/// A breakdown together with its per-tax detail and audit steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownResult {
    /// The computed figures.
    pub breakdown: BudgetBreakdown,
    /// One entry per tax selection, in id order.
    pub tax_lines: Vec<TaxLine>,
    /// Steps recorded by each pricing component.
    pub steps: Vec<AuditStep>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> BudgetBreakdown {
        BudgetBreakdown {
            machines_subtotal: dec("1000.005"),
            accessories_subtotal: dec("0"),
            pre_customs_logistics: dec("0"),
            post_customs_logistics: dec("50"),
            taxable_base: dec("1000.005"),
            taxes_total: dec("210.00105"),
            customs_cost: dec("210.00105"),
            grand_total: dec("1260.00605"),
        }
    }

    #[test]
    fn test_default_is_all_zero() {
        let b = BudgetBreakdown::default();
        assert_eq!(b.machines_subtotal, Decimal::ZERO);
        assert_eq!(b.taxable_base, Decimal::ZERO);
        assert_eq!(b.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_rounded_rounds_each_field_to_cents() {
        let rounded = sample().rounded();
        assert_eq!(rounded.machines_subtotal, dec("1000.01"));
        assert_eq!(rounded.taxes_total, dec("210.00"));
        assert_eq!(rounded.grand_total, dec("1260.01"));
    }

    #[test]
    fn test_formatted_uses_display_format() {
        let formatted = sample().formatted();
        assert_eq!(formatted.post_customs_logistics, "U$D 50,00");
        assert_eq!(formatted.grand_total, "U$D 1.260,01");
    }

    #[test]
    fn test_breakdown_serializes_decimals_as_strings() {
        let json = serde_json::to_value(BudgetBreakdown::default()).unwrap();
        assert!(json["grand_total"].is_string());
    }
}
