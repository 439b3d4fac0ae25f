//! Logistics split by customs stage.

use rust_decimal::Decimal;

use crate::models::{AuditStep, LogisticsSelections, LogisticsStage};

/// Selected logistics totals per customs stage, including the audit step.
#[derive(Debug, Clone)]
pub struct LogisticsSplit {
    /// Legs up to customs; part of the taxable base.
    pub pre_customs: Decimal,
    /// Legs after customs; added after taxes.
    pub post_customs: Decimal,
    /// The audit step recording this split.
    pub audit_step: AuditStep,
}

/// Partitions the selected legs by the stage captured at selection.
///
/// Leg totals that cannot be parsed contribute zero.
pub fn split_logistics(selections: &LogisticsSelections, step_number: u32) -> LogisticsSplit {
    let mut pre_customs = Decimal::ZERO;
    let mut post_customs = Decimal::ZERO;

    for selection in selections.values() {
        let total = selection.total.amount_or_zero();
        match selection.stage {
            LogisticsStage::PreCustoms => pre_customs = pre_customs.saturating_add(total),
            LogisticsStage::PostCustoms => post_customs = post_customs.saturating_add(total),
        }
    }

    let leg_ids: Vec<_> = selections.keys().collect();
    let audit_step = AuditStep {
        step_number,
        rule_id: "logistics_split".to_string(),
        rule_name: "Logistics Split by Customs Stage".to_string(),
        input: serde_json::json!({
            "selected_legs": leg_ids
        }),
        output: serde_json::json!({
            "pre_customs": pre_customs.to_string(),
            "post_customs": post_customs.to_string()
        }),
        reasoning: format!(
            "{} leg(s) selected: {} before customs enters the taxable base, {} after customs is added after taxes",
            selections.len(),
            pre_customs,
            post_customs
        ),
    };

    LogisticsSplit {
        pre_customs,
        post_customs,
        audit_step,
    }
}
