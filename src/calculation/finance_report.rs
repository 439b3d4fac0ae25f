//! Daily income and expense report.
//!
//! Income is recognized when it is final: sales on their date, rentals
//! only once the unit is returned, on the actual return date. Purchases
//! are expenses on the purchase date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{FinanceDayRow, FinanceReport, FinanceTotals, Purchase, RevenueEvent};

/// Builds the report over the inclusive range `from..=to`.
///
/// Every day in the range gets a row, including days without movement.
///
/// # Errors
///
/// Returns `InvalidDateRange` when `to` is before `from`.
///
/// # Example
///
/// ```
/// use budget_engine::calculation::build_finance_report;
/// use budget_engine::models::{RevenueEvent, RevenueKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
/// let sale = RevenueEvent {
///     unit_identifier: "PRESU-1-1-1".to_string(),
///     kind: RevenueKind::Sale,
///     date: day(2),
///     estimated_return: None,
///     actual_return: None,
///     monthly_amount: None,
///     total: Decimal::new(5000, 0),
/// };
///
/// let report = build_finance_report(day(1), day(3), &[sale], &[]).unwrap();
/// assert_eq!(report.days.len(), 3);
/// assert_eq!(report.days[1].income, Decimal::new(5000, 0));
/// assert_eq!(report.totals.profit, Decimal::new(5000, 0));
/// ```
pub fn build_finance_report(
    from: NaiveDate,
    to: NaiveDate,
    revenues: &[RevenueEvent],
    purchases: &[Purchase],
) -> EngineResult<FinanceReport> {
    if to < from {
        return Err(EngineError::InvalidDateRange {
            start: from,
            end: to,
        });
    }

    let in_range = |date: &NaiveDate| *date >= from && *date <= to;

    let mut income: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for (date, total) in revenues
        .iter()
        .filter_map(|event| event.recognized_on().map(|date| (date, event.total)))
        .filter(|(date, _)| in_range(date))
    {
        let entry = income.entry(date).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(total);
    }

    let mut expenses: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for purchase in purchases.iter().filter(|p| in_range(&p.date)) {
        let entry = expenses.entry(purchase.date).or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(purchase.total);
    }

    let mut totals = FinanceTotals::default();
    let days: Vec<FinanceDayRow> = from
        .iter_days()
        .take_while(|day| *day <= to)
        .map(|day| {
            let day_income = income.get(&day).copied().unwrap_or(Decimal::ZERO);
            let day_expenses = expenses.get(&day).copied().unwrap_or(Decimal::ZERO);
            totals.income = totals.income.saturating_add(day_income);
            totals.expenses = totals.expenses.saturating_add(day_expenses);
            FinanceDayRow {
                date: day,
                income: day_income,
                expenses: day_expenses,
                profit: day_income.saturating_sub(day_expenses),
            }
        })
        .collect();
    totals.profit = totals.income.saturating_sub(totals.expenses);

    Ok(FinanceReport {
        from,
        to,
        days,
        totals,
    })
}
