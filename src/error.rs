//! Error types for the Budget Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every fallible operation outside of the pure pricing aggregation.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::CatalogId;

/// The main error type for the Budget Engine.
///
/// Pricing aggregation itself never fails; this type covers configuration
/// loading, catalog lookups, draft submission and unit lifecycle rules.
///
/// # Example
///
/// ```
/// use budget_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/machines.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/machines.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Machine id is not present in the catalog.
    #[error("Machine not found: {id}")]
    MachineNotFound {
        /// The missing machine id.
        id: CatalogId,
    },

    /// Accessory id is not present in the catalog.
    #[error("Accessory not found: {id}")]
    AccessoryNotFound {
        /// The missing accessory id.
        id: CatalogId,
    },

    /// Logistics leg id is not present in the catalog.
    #[error("Logistics leg not found: {id}")]
    LogisticsLegNotFound {
        /// The missing leg id.
        id: CatalogId,
    },

    /// Tax id is not present in the catalog.
    #[error("Tax not found: {id}")]
    TaxNotFound {
        /// The missing tax id.
        id: CatalogId,
    },

    /// A draft line index does not exist.
    #[error("Budget line not found at index {index}")]
    LineNotFound {
        /// The requested line index.
        index: usize,
    },

    /// A user-entered amount could not be parsed.
    #[error("Invalid amount for '{field}': '{value}'")]
    InvalidAmount {
        /// The field holding the amount.
        field: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// A budget must contain at least one machine line to be submitted.
    #[error("Budget must contain at least one machine")]
    EmptyBudget,

    /// The budget is no longer a draft.
    #[error("Budget '{number}' cannot be modified in status {status}")]
    BudgetNotEditable {
        /// The budget number.
        number: String,
        /// The current status.
        status: String,
    },

    /// Only closed budgets can be purchased.
    #[error("Budget '{number}' must be CLOSED to be purchased, found {status}")]
    BudgetNotClosed {
        /// The budget number.
        number: String,
        /// The current status.
        status: String,
    },

    /// A budget can only be purchased once.
    #[error("Budget '{number}' already has a purchase")]
    BudgetAlreadyPurchased {
        /// The budget number.
        number: String,
    },

    /// A unit has no open rental to finish.
    #[error("No active rental found for unit '{unit}'")]
    NoActiveRental {
        /// The unit identifier.
        unit: String,
    },

    /// A purchased unit cannot perform the requested transition.
    #[error("Unit '{unit}' cannot {action} while {status}")]
    InvalidUnitTransition {
        /// The unit identifier.
        unit: String,
        /// The attempted action.
        action: String,
        /// The current status.
        status: String,
    },

    /// A date range ends before it starts.
    #[error("Invalid date range: {end} is before {start}")]
    InvalidDateRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
