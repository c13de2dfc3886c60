//! Fixtures

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    engine::{Engine, EngineError},
    fixtures::{catalogs::CatalogFixture, engines::EngineFixture, inventories::InventoryFixture},
    inventory::Inventory,
    shims::{ShimCatalog, ShimSize},
    valves::LashSpecError,
};

pub mod catalogs;
pub mod engines;
pub mod inventories;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid measurement format
    #[error("Invalid measurement format: {0}")]
    InvalidMeasurement(String),

    /// Invalid lash window
    #[error("Invalid lash window: {0}")]
    LashSpec(#[from] LashSpecError),

    /// Engine assembly error
    #[error("Failed to assemble engine: {0}")]
    Engine(#[from] EngineError),

    /// No engine loaded
    #[error("No engine loaded; measurements unknown")]
    NoEngine,

    /// No catalog loaded
    #[error("No catalog loaded; purchasable sizes unknown")]
    NoCatalog,

    /// No inventory loaded
    #[error("No inventory loaded; spare shims unknown")]
    NoInventory,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Measured engine
    engine: Option<Engine>,

    /// Loose spare shims
    spares: Option<Vec<ShimSize>>,

    /// Purchasable sizes
    catalog: Option<ShimCatalog>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            engine: None,
            spares: None,
            catalog: None,
        }
    }

    /// Load an engine from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or assembled
    /// into an engine.
    pub fn load_engine(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("engines").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: EngineFixture = serde_norway::from_str(&contents)?;

        self.engine = Some(fixture.try_into()?);

        Ok(self)
    }

    /// Load spare shims from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_inventory(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("inventories")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: InventoryFixture = serde_norway::from_str(&contents)?;

        self.spares = Some(fixture.spares.into_iter().map(ShimSize::new).collect());

        Ok(self)
    }

    /// Load purchasable sizes from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        self.catalog = Some(ShimCatalog::new(fixture.sizes));

        Ok(self)
    }

    /// Load a complete fixture set (engine, inventory and catalog with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_engine(name)?
            .load_inventory(name)?
            .load_catalog(name)?;

        Ok(fixture)
    }

    /// Get the loaded engine
    ///
    /// # Errors
    ///
    /// Returns an error if no engine has been loaded yet.
    pub fn engine(&self) -> Result<&Engine, FixtureError> {
        self.engine.as_ref().ok_or(FixtureError::NoEngine)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn catalog(&self) -> Result<&ShimCatalog, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Assemble the shim pool: the loaded spares plus every shim
    /// currently fitted on the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine or the spares are missing.
    pub fn inventory(&self) -> Result<Inventory, FixtureError> {
        let engine = self.engine()?;
        let spares = self.spares.as_ref().ok_or(FixtureError::NoInventory)?;

        let mut inventory = Inventory::new();

        for &size in spares {
            inventory.add_spare(size);
        }

        for (valve, measurement) in engine.valves().iter().enumerate() {
            inventory.add_fitted(measurement.fitted(), valve);
        }

        Ok(inventory)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
