//! Machine and accessory subtotals.
//!
//! Each line is priced at its resolved unit price (the shared override for
//! its id when one exists, else the catalog snapshot) times its quantity.

use rust_decimal::Decimal;

use crate::models::{AuditStep, MachineLine, PriceOverrides};

/// The result of aggregating machine lines, including the audit step.
#[derive(Debug, Clone)]
pub struct LineAggregation {
    /// Sum of machine price × quantity.
    pub machines_subtotal: Decimal,
    /// Sum of accessory price × quantity across every machine line.
    pub accessories_subtotal: Decimal,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Sums machine lines and their nested accessories.
///
/// Quantities are trusted as given; the draft clamps them on mutation.
/// Unparsable overrides contribute zero.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::aggregate_lines;
/// use budget_engine::models::{AccessoryLine, MachineLine, PriceOverrides};
/// use rust_decimal::Decimal;
///
/// let lines = vec![MachineLine {
///     machine_base_id: 1,
///     quantity: 2,
///     unit_price: Decimal::new(100, 0),
///     accessories: vec![AccessoryLine {
///         accessory_id: 5,
///         quantity: 3,
///         unit_price: Decimal::new(10, 0),
///     }],
/// }];
///
/// let result = aggregate_lines(&lines, &PriceOverrides::default(), 1);
/// assert_eq!(result.machines_subtotal, Decimal::new(200, 0));
/// assert_eq!(result.accessories_subtotal, Decimal::new(30, 0));
/// ```
pub fn aggregate_lines(
    lines: &[MachineLine],
    overrides: &PriceOverrides,
    step_number: u32,
) -> LineAggregation {
    let mut machines_subtotal = Decimal::ZERO;
    let mut accessories_subtotal = Decimal::ZERO;
    let mut accessory_count = 0usize;

    for line in lines {
        let price = overrides.machine_unit_price(line);
        machines_subtotal =
            machines_subtotal.saturating_add(price.saturating_mul(Decimal::from(line.quantity)));

        for accessory in &line.accessories {
            let price = overrides.accessory_unit_price(accessory);
            accessories_subtotal = accessories_subtotal
                .saturating_add(price.saturating_mul(Decimal::from(accessory.quantity)));
            accessory_count += 1;
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "line_aggregation".to_string(),
        rule_name: "Machine and Accessory Subtotals".to_string(),
        input: serde_json::json!({
            "machine_lines": lines.len(),
            "accessory_lines": accessory_count,
            "machine_overrides": overrides.machines.len(),
            "accessory_overrides": overrides.accessories.len()
        }),
        output: serde_json::json!({
            "machines_subtotal": machines_subtotal.to_string(),
            "accessories_subtotal": accessories_subtotal.to_string()
        }),
        reasoning: format!(
            "{} machine line(s) total {}; {} accessory line(s) total {}",
            lines.len(),
            machines_subtotal,
            accessory_count,
            accessories_subtotal
        ),
    };

    LineAggregation {
        machines_subtotal,
        accessories_subtotal,
        audit_step,
    }
}
