//! Budget purchase and unit lifecycle.
//!
//! A closed budget is purchased once, creating one [`PurchasedUnit`] per
//! machine and quantity. Units start in the deposit; from there they can
//! be rented (and returned) or sold. Rental periods are whole months
//! counted inclusively, so dates are normalized to the first of their
//! month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    BudgetStatus, Purchase, PurchasedUnit, RevenueEvent, RevenueKind, SavedBudget,
    SavedBudgetItem, UnitStatus,
};

/// Counts the months from `start` to `end`, both included.
///
/// Days are ignored: January 31st to February 1st is two months.
///
/// # Example
///
/// ```
/// use budget_engine::lifecycle::months_inclusive;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
/// assert_eq!(months_inclusive(start, end).unwrap(), 4);
/// ```
pub fn months_inclusive(start: NaiveDate, end: NaiveDate) -> EngineResult<u32> {
    let start_index = i64::from(start.year()) * 12 + i64::from(start.month());
    let end_index = i64::from(end.year()) * 12 + i64::from(end.month());
    let months = end_index - start_index + 1;

    if months < 1 {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    u32::try_from(months).map_err(|_| EngineError::InvalidDateRange { start, end })
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Creates the units bought with a budget.
///
/// Identifiers are `{budget_number}-{machine_id}-{n}` with `n` counting
/// from 1 within each item.
pub fn units_for_purchase(budget_number: &str, items: &[SavedBudgetItem]) -> Vec<PurchasedUnit> {
    items
        .iter()
        .flat_map(|item| {
            (1..=item.quantity).map(move |n| PurchasedUnit {
                identifier: format!("{}-{}-{}", budget_number, item.machine_base_id, n),
                machine_base_id: item.machine_base_id,
                budget_number: budget_number.to_string(),
                status: UnitStatus::Deposit,
            })
        })
        .collect()
}

/// Purchases a closed budget and marks it as purchased.
///
/// The purchase total is the budget's persisted total. A budget is
/// purchased at most once.
pub fn create_purchase(budget: &mut SavedBudget, date: NaiveDate) -> EngineResult<Purchase> {
    if budget.status != BudgetStatus::Closed {
        return Err(EngineError::BudgetNotClosed {
            number: budget.number.clone(),
            status: budget.status.to_string(),
        });
    }
    budget.ensure_not_purchased()?;
    budget.purchased = true;

    Ok(Purchase {
        budget_number: budget.number.clone(),
        date,
        total: budget.total_snapshot,
        units: units_for_purchase(&budget.number, &budget.items),
    })
}

/// Closes a draft budget and purchases it.
pub fn purchase_from_draft(budget: &mut SavedBudget, date: NaiveDate) -> EngineResult<Purchase> {
    budget.close()?;
    create_purchase(budget, date)
}

/// Rents out a unit that is in the deposit.
///
/// The rental total is `monthly_amount` times the months from `start` to
/// `estimated_return`, both included.
pub fn mark_rented(
    unit: &mut PurchasedUnit,
    start: NaiveDate,
    estimated_return: NaiveDate,
    monthly_amount: Decimal,
) -> EngineResult<RevenueEvent> {
    ensure_status(unit, UnitStatus::Deposit, "rent")?;

    let start = first_of_month(start);
    let estimated_return = first_of_month(estimated_return);
    let months = months_inclusive(start, estimated_return)?;

    unit.status = UnitStatus::Rented;
    Ok(RevenueEvent {
        unit_identifier: unit.identifier.clone(),
        kind: RevenueKind::Rental,
        date: start,
        estimated_return: Some(estimated_return),
        actual_return: None,
        monthly_amount: Some(monthly_amount),
        total: monthly_amount.saturating_mul(Decimal::from(months)),
    })
}

/// Finishes the open rental of a unit and returns it to the deposit.
///
/// The rental total is recomputed over the months actually rented.
pub fn finish_rental(
    unit: &mut PurchasedUnit,
    rental: &mut RevenueEvent,
    actual_return: NaiveDate,
) -> EngineResult<()> {
    ensure_status(unit, UnitStatus::Rented, "finish a rental")?;

    let is_open_rental = rental.kind == RevenueKind::Rental
        && rental.actual_return.is_none()
        && rental.unit_identifier == unit.identifier;
    if !is_open_rental {
        return Err(EngineError::NoActiveRental {
            unit: unit.identifier.clone(),
        });
    }

    let actual_return = first_of_month(actual_return);
    let months = months_inclusive(rental.date, actual_return)?;
    let monthly_amount = rental.monthly_amount.unwrap_or(Decimal::ZERO);

    rental.actual_return = Some(actual_return);
    rental.total = monthly_amount.saturating_mul(Decimal::from(months));
    unit.status = UnitStatus::Deposit;
    Ok(())
}

/// Sells a unit that is in the deposit.
pub fn mark_sold(
    unit: &mut PurchasedUnit,
    date: NaiveDate,
    total: Decimal,
) -> EngineResult<RevenueEvent> {
    ensure_status(unit, UnitStatus::Deposit, "sell")?;

    unit.status = UnitStatus::Sold;
    Ok(RevenueEvent {
        unit_identifier: unit.identifier.clone(),
        kind: RevenueKind::Sale,
        date,
        estimated_return: None,
        actual_return: None,
        monthly_amount: None,
        total,
    })
}

fn ensure_status(unit: &PurchasedUnit, expected: UnitStatus, action: &str) -> EngineResult<()> {
    if unit.status == expected {
        return Ok(());
    }
    Err(EngineError::InvalidUnitTransition {
        unit: unit.identifier.clone(),
        action: action.to_string(),
        status: unit.status.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn item(machine_base_id: u64, quantity: u32) -> SavedBudgetItem {
        SavedBudgetItem {
            machine_base_id,
            quantity,
            machine_total_snapshot: None,
            accessories: vec![],
        }
    }

    fn budget(status: BudgetStatus) -> SavedBudget {
        SavedBudget {
            id: 1,
            number: "PRESU-1".to_string(),
            date: date(2025, 3, 1),
            status,
            items: vec![item(4, 2), item(7, 1)],
            logistics: vec![],
            taxes: vec![],
            total_snapshot: Decimal::new(150_000, 0),
            purchased: false,
        }
    }

    fn unit() -> PurchasedUnit {
        units_for_purchase("PRESU-1", &[item(4, 1)]).remove(0)
    }

    #[test]
    fn test_months_inclusive_same_month() {
        assert_eq!(months_inclusive(date(2025, 3, 1), date(2025, 3, 31)).unwrap(), 1);
    }

    #[test]
    fn test_months_inclusive_across_years() {
        assert_eq!(months_inclusive(date(2024, 12, 15), date(2025, 1, 2)).unwrap(), 2);
    }

    #[test]
    fn test_months_inclusive_rejects_reversed_range() {
        assert!(matches!(
            months_inclusive(date(2025, 3, 1), date(2025, 2, 1)),
            Err(EngineError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_units_one_per_quantity() {
        let units = units_for_purchase("PRESU-1", &[item(4, 2), item(7, 1)]);
        let ids: Vec<&str> = units.iter().map(|u| u.identifier.as_str()).collect();
        assert_eq!(ids, vec!["PRESU-1-4-1", "PRESU-1-4-2", "PRESU-1-7-1"]);
        assert!(units.iter().all(|u| u.status == UnitStatus::Deposit));
    }

    #[test]
    fn test_purchase_requires_closed_budget() {
        match create_purchase(&mut budget(BudgetStatus::Draft), date(2025, 3, 2)) {
            Err(EngineError::BudgetNotClosed { number, status }) => {
                assert_eq!(number, "PRESU-1");
                assert_eq!(status, "DRAFT");
            }
            other => panic!("Expected BudgetNotClosed, got {:?}", other),
        }
    }

    #[test]
    fn test_purchase_of_closed_budget() {
        let mut closed = budget(BudgetStatus::Closed);
        let purchase = create_purchase(&mut closed, date(2025, 3, 2)).unwrap();
        assert_eq!(purchase.total, Decimal::new(150_000, 0));
        assert_eq!(purchase.units.len(), 3);
        assert!(closed.purchased);
    }

    #[test]
    fn test_budget_is_purchased_only_once() {
        let mut closed = budget(BudgetStatus::Closed);
        create_purchase(&mut closed, date(2025, 3, 2)).unwrap();

        match create_purchase(&mut closed, date(2025, 3, 3)) {
            Err(EngineError::BudgetAlreadyPurchased { number }) => assert_eq!(number, "PRESU-1"),
            other => panic!("Expected BudgetAlreadyPurchased, got {:?}", other),
        }
    }

    #[test]
    fn test_purchase_from_draft_closes_budget() {
        let mut draft = budget(BudgetStatus::Draft);
        let purchase = purchase_from_draft(&mut draft, date(2025, 3, 2)).unwrap();
        assert_eq!(draft.status, BudgetStatus::Closed);
        assert_eq!(purchase.units.len(), 3);
    }

    #[test]
    fn test_purchase_from_closed_budget_is_rejected() {
        let mut closed = budget(BudgetStatus::Closed);
        assert!(matches!(
            purchase_from_draft(&mut closed, date(2025, 3, 2)),
            Err(EngineError::BudgetNotEditable { .. })
        ));
    }

    #[test]
    fn test_rent_computes_total_over_estimated_months() {
        let mut unit = unit();
        let rental =
            mark_rented(&mut unit, date(2025, 1, 20), date(2025, 3, 5), Decimal::new(500, 0))
                .unwrap();

        assert_eq!(unit.status, UnitStatus::Rented);
        assert_eq!(rental.date, date(2025, 1, 1));
        assert_eq!(rental.estimated_return, Some(date(2025, 3, 1)));
        assert_eq!(rental.total, Decimal::new(1500, 0));
        assert!(!rental.is_finished());
    }

    #[test]
    fn test_rent_with_reversed_dates_leaves_unit_in_deposit() {
        let mut unit = unit();
        let result = mark_rented(&mut unit, date(2025, 3, 1), date(2025, 1, 1), Decimal::ONE);
        assert!(result.is_err());
        assert_eq!(unit.status, UnitStatus::Deposit);
    }

    #[test]
    fn test_finish_rental_recomputes_total_on_actual_months() {
        let mut unit = unit();
        let mut rental =
            mark_rented(&mut unit, date(2025, 1, 1), date(2025, 3, 1), Decimal::new(500, 0))
                .unwrap();

        finish_rental(&mut unit, &mut rental, date(2025, 5, 10)).unwrap();

        assert_eq!(unit.status, UnitStatus::Deposit);
        assert_eq!(rental.actual_return, Some(date(2025, 5, 1)));
        assert_eq!(rental.total, Decimal::new(2500, 0));
    }

    #[test]
    fn test_finish_rental_requires_rented_unit() {
        let mut unit = unit();
        let mut sale = mark_sold(&mut unit.clone(), date(2025, 1, 1), Decimal::ONE).unwrap();
        match finish_rental(&mut unit, &mut sale, date(2025, 2, 1)) {
            Err(EngineError::InvalidUnitTransition { action, status, .. }) => {
                assert_eq!(action, "finish a rental");
                assert_eq!(status, "DEPOSIT");
            }
            other => panic!("Expected InvalidUnitTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_finish_rental_twice_is_rejected() {
        let mut unit = unit();
        let mut rental =
            mark_rented(&mut unit, date(2025, 1, 1), date(2025, 2, 1), Decimal::ONE).unwrap();
        finish_rental(&mut unit, &mut rental, date(2025, 2, 1)).unwrap();

        unit.status = UnitStatus::Rented;
        assert!(matches!(
            finish_rental(&mut unit, &mut rental, date(2025, 3, 1)),
            Err(EngineError::NoActiveRental { .. })
        ));
    }

    #[test]
    fn test_sold_unit_cannot_be_rented() {
        let mut unit = unit();
        mark_sold(&mut unit, date(2025, 4, 1), Decimal::new(90_000, 0)).unwrap();
        assert_eq!(unit.status, UnitStatus::Sold);

        match mark_rented(&mut unit, date(2025, 5, 1), date(2025, 6, 1), Decimal::ONE) {
            Err(EngineError::InvalidUnitTransition { unit, action, status }) => {
                assert_eq!(unit, "PRESU-1-4-1");
                assert_eq!(action, "rent");
                assert_eq!(status, "SOLD");
            }
            other => panic!("Expected InvalidUnitTransition, got {:?}", other),
        }
    }

    #[test]
    fn test_rented_unit_cannot_be_sold() {
        let mut unit = unit();
        mark_rented(&mut unit, date(2025, 1, 1), date(2025, 2, 1), Decimal::ONE).unwrap();
        assert!(mark_sold(&mut unit, date(2025, 1, 15), Decimal::ONE).is_err());
    }
}
