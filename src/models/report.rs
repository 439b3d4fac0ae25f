//! Finance report models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income and expenses booked on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceDayRow {
    /// The day.
    pub date: NaiveDate,
    /// Sales and finished rentals.
    pub income: Decimal,
    /// Purchases.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub profit: Decimal,
}

/// Totals over the whole report range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTotals {
    /// Total income.
    pub income: Decimal,
    /// Total expenses.
    pub expenses: Decimal,
    /// Income minus expenses.
    pub profit: Decimal,
}

/// A daily income/expense report over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceReport {
    /// First day of the range.
    pub from: NaiveDate,
    /// Last day of the range.
    pub to: NaiveDate,
    /// One row per day in the range, including days without movement.
    pub days: Vec<FinanceDayRow>,
    /// Totals over the range.
    pub totals: FinanceTotals,
}
