//! HTTP API module for the Budget Engine.
//!
//! This module provides a stateless preview surface: drafts are priced
//! against the loaded catalog and nothing is persisted.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AccessoryRequest, BreakdownRequest, ItemRequest, LogisticsRequest, PriceSuggestionRequest,
    TaxRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
