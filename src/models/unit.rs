//! Purchased units and the revenue they produce.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CatalogId;

/// Where a purchased unit currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    /// In the yard, available to rent or sell.
    #[serde(alias = "DEPOSITO")]
    Deposit,
    /// Out on a rental.
    #[serde(alias = "ALQUILADA")]
    Rented,
    /// Sold; terminal.
    #[serde(alias = "VENDIDA")]
    Sold,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnitStatus::Deposit => "DEPOSIT",
            UnitStatus::Rented => "RENTED",
            UnitStatus::Sold => "SOLD",
        };
        f.write_str(label)
    }
}

/// A physical machine bought through a closed budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedUnit {
    /// Unique identifier, `{budget_number}-{machine_id}-{n}`.
    #[serde(alias = "identificador")]
    pub identifier: String,
    /// Machine model of this unit.
    pub machine_base_id: CatalogId,
    /// Number of the budget the unit was bought with.
    pub budget_number: String,
    /// Current status.
    #[serde(alias = "estado")]
    pub status: UnitStatus,
}

/// A purchase of a closed budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    /// Number of the purchased budget.
    pub budget_number: String,
    /// Purchase date; the expense is booked on this day.
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    /// Amount paid.
    pub total: Decimal,
    /// Units created by the purchase.
    #[serde(default)]
    pub units: Vec<PurchasedUnit>,
}

/// Kind of revenue a unit produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevenueKind {
    /// A sale.
    #[serde(alias = "VENTA")]
    Sale,
    /// A rental.
    #[serde(alias = "ALQUILER")]
    Rental,
}

/// A sale or rental of a unit.
///
/// Rentals carry a monthly amount and both return dates; the total is
/// the monthly amount times the months covered, counting both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueEvent {
    /// Identifier of the unit.
    pub unit_identifier: String,
    /// Sale or rental.
    #[serde(alias = "tipo")]
    pub kind: RevenueKind,
    /// Sale date, or start of the rental.
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    /// Expected return of a rental.
    #[serde(default)]
    pub estimated_return: Option<NaiveDate>,
    /// Actual return of a rental; set when the rental is finished.
    #[serde(default)]
    pub actual_return: Option<NaiveDate>,
    /// Monthly amount of a rental.
    #[serde(default)]
    pub monthly_amount: Option<Decimal>,
    /// Total amount.
    pub total: Decimal,
}

impl RevenueEvent {
    /// Returns true for sales and for rentals that were returned.
    pub fn is_finished(&self) -> bool {
        match self.kind {
            RevenueKind::Sale => true,
            RevenueKind::Rental => self.actual_return.is_some(),
        }
    }

    /// The day the income is recognized, if it is recognized at all.
    pub fn recognized_on(&self) -> Option<NaiveDate> {
        match self.kind {
            RevenueKind::Sale => Some(self.date),
            RevenueKind::Rental => self.actual_return,
        }
    }
}
