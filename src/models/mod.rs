//! Core data models for the Budget Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod breakdown;
mod budget;
mod catalog;
mod draft;
mod quote;
mod report;
mod unit;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use breakdown::{BreakdownResult, BudgetBreakdown, FormattedBreakdown, TaxLine};
pub use budget::{
    AccessoryPayload, BudgetItemPayload, BudgetPayload, BudgetStatus, LogisticsPayload,
    SavedBudget, SavedBudgetAccessory, SavedBudgetItem, SavedLogisticsLeg, SavedTax, TaxPayload,
};
pub use catalog::{Accessory, CatalogId, LogisticsLeg, LogisticsStage, LogisticsType, MachineBase, Tax};
pub use draft::{
    AccessoryLine, BudgetDraft, LogisticsSelection, LogisticsSelections, MachineLine,
    PriceOverrides, TaxSelection, TaxSelections, clamp_quantity,
};
pub use quote::{BudgetQuote, QuoteCategory, QuoteLine};
pub use report::{FinanceDayRow, FinanceReport, FinanceTotals};
pub use unit::{Purchase, PurchasedUnit, RevenueEvent, RevenueKind, UnitStatus};
