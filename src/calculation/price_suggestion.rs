//! Sale and rental price suggestions derived from a unit cost.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PricingRules;
use crate::models::AuditStep;

/// Suggested prices for one unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    /// The cost the suggestion is based on.
    pub cost: Decimal,
    /// Suggested sale price, rounded to whole units.
    pub sale_price: Decimal,
    /// Suggested monthly rent, rounded to whole units.
    pub monthly_rent: Decimal,
    /// The audit step recording this suggestion.
    pub audit_step: AuditStep,
}

/// Suggests a sale price and a monthly rent for a unit cost.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::suggest_prices;
/// use budget_engine::config::PricingRules;
/// use rust_decimal::Decimal;
///
/// let suggestion = suggest_prices(Decimal::new(1000, 0), &PricingRules::default(), 1);
/// assert_eq!(suggestion.sale_price, Decimal::new(1300, 0));
/// assert_eq!(suggestion.monthly_rent, Decimal::new(50, 0));
/// ```
pub fn suggest_prices(cost: Decimal, rules: &PricingRules, step_number: u32) -> PriceSuggestion {
    let sale_price = round_whole(cost.saturating_mul(Decimal::ONE.saturating_add(rules.sale_markup)));
    let monthly_rent = round_whole(cost.saturating_mul(rules.rent_monthly_rate));

    let audit_step = AuditStep {
        step_number,
        rule_id: "price_suggestion".to_string(),
        rule_name: "Sale and Rent Suggestion".to_string(),
        input: serde_json::json!({
            "cost": cost.to_string(),
            "sale_markup": rules.sale_markup.to_string(),
            "rent_monthly_rate": rules.rent_monthly_rate.to_string()
        }),
        output: serde_json::json!({
            "sale_price": sale_price.to_string(),
            "monthly_rent": monthly_rent.to_string()
        }),
        reasoning: format!(
            "Sale price {} applies a {} markup to cost {}; monthly rent {} is {} of cost",
            sale_price, rules.sale_markup, cost, monthly_rent, rules.rent_monthly_rate
        ),
    };

    PriceSuggestion {
        cost,
        sale_price,
        monthly_rent,
        audit_step,
    }
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_rules() {
        let suggestion = suggest_prices(dec("48500"), &PricingRules::default(), 1);
        assert_eq!(suggestion.sale_price, dec("63050"));
        assert_eq!(suggestion.monthly_rent, dec("2425"));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 10 × 1.30 = 13; 10 × 0.05 = 0.5 → 1
        let suggestion = suggest_prices(dec("10"), &PricingRules::default(), 1);
        assert_eq!(suggestion.sale_price, dec("13"));
        assert_eq!(suggestion.monthly_rent, dec("1"));

        // 1234.5 × 1.30 = 1604.85 → 1605
        let suggestion = suggest_prices(dec("1234.5"), &PricingRules::default(), 1);
        assert_eq!(suggestion.sale_price, dec("1605"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            sale_markup: dec("0.5"),
            rent_monthly_rate: dec("0.1"),
        };
        let suggestion = suggest_prices(dec("200"), &rules, 2);
        assert_eq!(suggestion.sale_price, dec("300"));
        assert_eq!(suggestion.monthly_rent, dec("20"));
        assert_eq!(suggestion.audit_step.step_number, 2);
    }

    #[test]
    fn test_zero_cost() {
        let suggestion = suggest_prices(Decimal::ZERO, &PricingRules::default(), 1);
        assert_eq!(suggestion.sale_price, Decimal::ZERO);
        assert_eq!(suggestion.monthly_rent, Decimal::ZERO);
    }
}
