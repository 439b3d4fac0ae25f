//! Flat tax assessment over the taxable base.
//!
//! Every included tax is a plain percentage of the same base. Taxes do
//! not compound and the engine applies no minimum or cap; minimum amounts
//! published by the catalog are carried for display only.

use rust_decimal::Decimal;

use crate::models::{AuditStep, TaxLine, TaxSelections};

/// The result of assessing taxes, including per-tax detail.
#[derive(Debug, Clone)]
pub struct TaxAssessment {
    /// Sum of included tax amounts.
    pub taxes_total: Decimal,
    /// One line per selection, in id order.
    pub lines: Vec<TaxLine>,
    /// The audit step recording this assessment.
    pub audit_step: AuditStep,
}

/// Applies each included tax percentage to the taxable base.
///
/// Unparsable percentages count as zero. Negative percentages are not
/// rejected.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::assess_taxes;
/// use budget_engine::models::{TaxSelection, TaxSelections};
/// use budget_engine::money::MoneyInput;
/// use rust_decimal::Decimal;
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
/// let result = assess_taxes(&taxes, Decimal::new(1000, 0), 1);
/// assert_eq!(result.taxes_total, Decimal::new(210, 0));
/// ```
pub fn assess_taxes(
    selections: &TaxSelections,
    taxable_base: Decimal,
    step_number: u32,
) -> TaxAssessment {
    let mut taxes_total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(selections.len());

    for selection in selections.values() {
        let percentage = selection.percentage.amount_or_zero();
        let amount = if selection.included {
            taxable_base.saturating_mul(percentage) / Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
        taxes_total = taxes_total.saturating_add(amount);

        lines.push(TaxLine {
            tax_id: selection.tax_id,
            name: selection.name.clone(),
            included: selection.included,
            percentage,
            amount,
        });
    }

    let included: Vec<_> = lines
        .iter()
        .filter(|line| line.included)
        .map(|line| {
            serde_json::json!({
                "tax_id": line.tax_id,
                "percentage": line.percentage.to_string(),
                "amount": line.amount.to_string()
            })
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_assessment".to_string(),
        rule_name: "Flat Tax Assessment".to_string(),
        input: serde_json::json!({
            "taxable_base": taxable_base.to_string(),
            "known_taxes": selections.len()
        }),
        output: serde_json::json!({
            "included": included,
            "taxes_total": taxes_total.to_string()
        }),
        reasoning: format!(
            "{} of {} tax(es) included over a base of {}, totalling {}",
            included.len(),
            selections.len(),
            taxable_base,
            taxes_total
        ),
    };

    TaxAssessment {
        taxes_total,
        lines,
        audit_step,
    }
}
