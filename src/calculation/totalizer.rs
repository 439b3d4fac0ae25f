//! Budget totalizer.
//!
//! Composes the line aggregator, the logistics splitter and the tax
//! engine into a [`BudgetBreakdown`]. The computation is pure: the same
//! inputs always produce the same decimals, and nothing is rounded.

use crate::models::{
    AuditStep, BreakdownResult, BudgetBreakdown, LogisticsSelections, MachineLine,
    PriceOverrides, TaxSelections,
};

use super::{aggregate_lines, assess_taxes, split_logistics};

/// Computes the breakdown of a budget.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::compute_breakdown;
/// use budget_engine::models::{
///     LogisticsSelection, LogisticsSelections, LogisticsStage, MachineLine, PriceOverrides,
///     TaxSelection, TaxSelections,
/// };
/// use budget_engine::money::MoneyInput;
/// use rust_decimal::Decimal;
///
/// let lines = vec![MachineLine {
///     machine_base_id: 1,
///     quantity: 1,
///     unit_price: Decimal::new(1000, 0),
///     accessories: vec![],
/// }];
///
/// let mut logistics = LogisticsSelections::new();
/// logistics.insert(7, LogisticsSelection {
///     logistics_leg_id: 7,
///     total: MoneyInput::from(Decimal::new(50, 0)),
///     stage: LogisticsStage::PostCustoms,
/// });
///
/// let mut taxes = TaxSelections::new();
/// taxes.insert(1, TaxSelection {
///     tax_id: 1,
///     name: "VAT".to_string(),
///     included: true,
///     percentage: MoneyInput::from(Decimal::new(21, 0)),
///     minimum_amount: None,
/// });
///
/// let breakdown = compute_breakdown(&lines, &logistics, &taxes, &PriceOverrides::default());
/// assert_eq!(breakdown.taxable_base, Decimal::new(1000, 0));
/// assert_eq!(breakdown.taxes_total, Decimal::new(210, 0));
/// assert_eq!(breakdown.grand_total, Decimal::new(1260, 0));
/// ```
pub fn compute_breakdown(
    lines: &[MachineLine],
    logistics: &LogisticsSelections,
    taxes: &TaxSelections,
    overrides: &PriceOverrides,
) -> BudgetBreakdown {
    explain_breakdown(lines, logistics, taxes, overrides).breakdown
}

/// Computes the breakdown together with per-tax detail and audit steps.
pub fn explain_breakdown(
    lines: &[MachineLine],
    logistics: &LogisticsSelections,
    taxes: &TaxSelections,
    overrides: &PriceOverrides,
) -> BreakdownResult {
    let aggregation = aggregate_lines(lines, overrides, 1);
    let split = split_logistics(logistics, 2);

    let taxable_base = aggregation
        .machines_subtotal
        .saturating_add(aggregation.accessories_subtotal)
        .saturating_add(split.pre_customs);

    let assessment = assess_taxes(taxes, taxable_base, 3);

    let breakdown = BudgetBreakdown {
        machines_subtotal: aggregation.machines_subtotal,
        accessories_subtotal: aggregation.accessories_subtotal,
        pre_customs_logistics: split.pre_customs,
        post_customs_logistics: split.post_customs,
        taxable_base,
        taxes_total: assessment.taxes_total,
        customs_cost: split.pre_customs.saturating_add(assessment.taxes_total),
        grand_total: taxable_base
            .saturating_add(assessment.taxes_total)
            .saturating_add(split.post_customs),
    };

    let totals_step = AuditStep {
        step_number: 4,
        rule_id: "budget_totals".to_string(),
        rule_name: "Budget Totals".to_string(),
        input: serde_json::json!({
            "taxable_base": breakdown.taxable_base.to_string(),
            "taxes_total": breakdown.taxes_total.to_string(),
            "post_customs_logistics": breakdown.post_customs_logistics.to_string()
        }),
        output: serde_json::json!({
            "customs_cost": breakdown.customs_cost.to_string(),
            "grand_total": breakdown.grand_total.to_string()
        }),
        reasoning: format!(
            "Grand total {} = taxable base {} + taxes {} + post-customs logistics {}",
            breakdown.grand_total,
            breakdown.taxable_base,
            breakdown.taxes_total,
            breakdown.post_customs_logistics
        ),
    };

    BreakdownResult {
        breakdown,
        tax_lines: assessment.lines,
        steps: vec![
            aggregation.audit_step,
            split.audit_step,
            assessment.audit_step,
            totals_step,
        ],
    }
}
