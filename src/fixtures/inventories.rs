//! Inventory Fixtures

use serde::Deserialize;

/// Wrapper for spare shims in YAML
#[derive(Debug, Deserialize)]
pub struct InventoryFixture {
    /// Catalog ids of loose spare shims
    pub spares: Vec<u16>,
}
