//! Catalog configuration for the Budget Engine.
//!
//! This module loads the catalog (machines, accessories, logistics legs,
//! taxes and pricing rules) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use budget_engine::config::CatalogLoader;
//!
//! let catalog = CatalogLoader::load("./config/catalog").unwrap().into_catalog();
//! for machine in catalog.machines() {
//!     println!("{}: {}", machine.name, machine.total);
//! }
//! ```

mod loader;
mod types;

pub use loader::CatalogLoader;
pub use types::{
    AccessoriesConfig, Catalog, CatalogMetadata, LogisticsLegsConfig, MachinesConfig,
    PricingConfig, PricingRules, TaxesConfig,
};
