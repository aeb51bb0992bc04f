//! Items

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

/// Catalog identifier for a product.
///
/// The storefront catalog uses both numeric and string ids, so both are
/// accepted and normalised to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawProductId")]
pub struct ProductId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Numeric(u64),
    Text(String),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Numeric(id) => ProductId::from(id),
            RawProductId::Text(id) => ProductId::from(id),
        }
    }
}

impl ProductId {
    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id.trim().to_string())
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId(id.trim().to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One product and quantity entry in a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductId,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item.
    ///
    /// No validation happens here; pricing rejects malformed lines.
    pub fn new(product: impl Into<ProductId>, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            unit_price,
            quantity,
        }
    }

    /// Returns the product id of the line
    pub fn product(&self) -> &ProductId {
        &self.product
    }

    /// Returns the unit price of the line
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the number of units on the line
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Line total in minor units, or `None` if it overflows.
    pub fn line_total_minor(&self) -> Option<i64> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
    }
}
