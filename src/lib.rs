//! Budget Engine for heavy-machinery imports
//!
//! This crate prices purchase budgets composed of machines, accessories,
//! logistics legs and taxes, and tracks the units bought with them through
//! rental and sale.
//!
//! The core is [`calculation::compute_breakdown`]: machine and accessory
//! subtotals plus logistics up to customs form the taxable base, every
//! included tax is a flat percentage of that base, and logistics after
//! customs are added last.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod money;
