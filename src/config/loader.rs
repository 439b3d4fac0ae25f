//! Catalog loading functionality.
//!
//! This module provides the [`CatalogLoader`] type for loading the
//! catalog from YAML files.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::types::{
    AccessoriesConfig, Catalog, CatalogMetadata, LogisticsLegsConfig, MachinesConfig,
    PricingConfig, TaxesConfig,
};

/// Loads the catalog from a directory of YAML files.
///
/// # Directory Structure
///
/// ```text
/// config/catalog/
/// ├── catalog.yaml         # Catalog metadata
/// ├── machines.yaml        # Machine models and prices
/// ├── accessories.yaml     # Accessories and prices
/// ├── logistics_legs.yaml  # Transport legs with customs stage
/// ├── taxes.yaml           # Tax percentages
/// └── pricing.yaml         # Price suggestion rules
/// ```
///
/// # Example
///
/// ```no_run
/// use budget_engine::config::CatalogLoader;
///
/// let loader = CatalogLoader::load("./config/catalog")?;
/// println!("Loaded catalog: {}", loader.catalog().metadata().name);
/// # Ok::<(), budget_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: Catalog,
}

impl CatalogLoader {
    /// Loads the catalog from the specified directory.
    ///
    /// Returns `ConfigNotFound` when a file is missing and
    /// `ConfigParseError` when a file is not valid for its structure.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<CatalogMetadata>(&path.join("catalog.yaml"))?;
        let machines = Self::load_yaml::<MachinesConfig>(&path.join("machines.yaml"))?;
        let accessories = Self::load_yaml::<AccessoriesConfig>(&path.join("accessories.yaml"))?;
        let legs = Self::load_yaml::<LogisticsLegsConfig>(&path.join("logistics_legs.yaml"))?;
        let taxes = Self::load_yaml::<TaxesConfig>(&path.join("taxes.yaml"))?;
        let pricing = Self::load_yaml::<PricingConfig>(&path.join("pricing.yaml"))?;

        info!(
            catalog = %metadata.name,
            version = %metadata.version,
            machines = machines.machines.len(),
            accessories = accessories.accessories.len(),
            logistics_legs = legs.logistics_legs.len(),
            taxes = taxes.taxes.len(),
            "catalog loaded"
        );

        let catalog = Catalog::new(
            metadata,
            machines.machines,
            accessories.accessories,
            legs.logistics_legs,
            taxes.taxes,
            pricing.pricing,
        );

        Ok(Self { catalog })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();
        debug!(path = %path_str, "reading catalog file");

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consumes the loader, returning the catalog.
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}
