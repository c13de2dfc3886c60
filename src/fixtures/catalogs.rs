//! Catalog Fixtures

use serde::Deserialize;

/// Wrapper for a shim catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Catalog ids of every purchasable size
    pub sizes: Vec<u16>,
}
