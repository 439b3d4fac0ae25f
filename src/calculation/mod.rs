//! Calculation logic for the Budget Engine.
//!
//! This module contains the pricing pipeline (line aggregation, logistics
//! split by customs stage, flat tax assessment and the totalizer that
//! composes them) as well as price suggestions and the finance report.

mod finance_report;
mod line_aggregator;
mod logistics_splitter;
mod price_suggestion;
mod tax_engine;
mod totalizer;

pub use finance_report::build_finance_report;
pub use line_aggregator::{LineAggregation, aggregate_lines};
pub use logistics_splitter::{LogisticsSplit, split_logistics};
pub use price_suggestion::{PriceSuggestion, suggest_prices};
pub use tax_engine::{TaxAssessment, assess_taxes};
pub use totalizer::{compute_breakdown, explain_breakdown};
