//! Cart records

use serde::Deserialize;

use crate::items::ProductId;

/// Wrapper for a saved cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartsFile {
    /// Cart lines, in the order they were added
    pub items: Vec<CartLineRecord>,
}

/// One saved cart line; the price comes from the catalog.
#[derive(Debug, Deserialize)]
pub struct CartLineRecord {
    /// Product id
    pub product: ProductId,

    /// Number of units
    pub quantity: u32,
}
