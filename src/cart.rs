//! Cart
//!
//! The cart is owned by the caller. Pricing never mutates it; quotes are built
//! from the slice returned by [`Cart::items`].

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    items::{LineItem, ProductId},
    pricing::{PricingError, compute_subtotal},
};

/// Errors related to cart changes.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product was added with zero quantity.
    #[error("cannot add zero units of product {0}")]
    ZeroQuantity(ProductId),

    /// A product was added with a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product's currency differs from the cart currency (product, item currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The line's quantity no longer fits.
    #[error("quantity overflowed for product {0}")]
    QuantityOverflow(ProductId),
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: SmallVec<[LineItem<'a>; 10]>,
    currency: &'a Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Cart {
            items: SmallVec::new(),
            currency,
        }
    }

    /// Add units of a product.
    ///
    /// Adding a product already in the cart increases that line's quantity and
    /// keeps its original unit price.
    ///
    /// # Errors
    ///
    /// - [`CartError::ZeroQuantity`]: `quantity` is zero.
    /// - [`CartError::NegativePrice`]: `unit_price` is below zero.
    /// - [`CartError::CurrencyMismatch`]: `unit_price` is not in the cart currency.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    pub fn add(
        &mut self,
        product: impl Into<ProductId>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<(), CartError> {
        let product = product.into();

        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product));
        }

        let item_currency = unit_price.currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product,
                item_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if unit_price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(product));
        }

        if let Some(existing) = self.line_mut(&product) {
            let merged = existing
                .quantity()
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.clone()))?;

            existing.set_quantity(merged);
        } else {
            self.items.push(LineItem::new(product, unit_price, quantity));
        }

        Ok(())
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// A quantity of zero removes the line. Returns `false` if the product is
    /// not in the cart.
    pub fn set_quantity(&mut self, product: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product).is_some();
        }

        match self.line_mut(product) {
            Some(line) => {
                line.set_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a product's line, returning it.
    pub fn remove(&mut self, product: &ProductId) -> Option<LineItem<'a>> {
        let idx = self.items.iter().position(|line| line.product() == product)?;

        Some(self.items.remove(idx))
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Look up a product's line.
    pub fn line(&self, product: &ProductId) -> Option<&LineItem<'a>> {
        self.items.iter().find(|line| line.product() == product)
    }

    fn line_mut(&mut self, product: &ProductId) -> Option<&mut LineItem<'a>> {
        self.items.iter_mut().find(|line| line.product() == product)
    }

    /// Snapshot of the cart's lines, in insertion order.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line is malformed or the sum overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        compute_subtotal(&self.items, self.currency)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn filled_cart<'a>() -> Result<Cart<'a>, CartError> {
        let mut cart = Cart::new(iso::RUB);

        cart.add(1, Money::from_minor(1500, iso::RUB), 2)?;
        cart.add(2, Money::from_minor(700, iso::RUB), 1)?;

        Ok(cart)
    }

    #[test]
    fn new_with_currency() {
        let cart = Cart::new(iso::RUB);

        assert_eq!(cart.currency(), iso::RUB);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_appends_new_lines() -> TestResult {
        let cart = filled_cart()?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn add_merges_existing_product() -> TestResult {
        let mut cart = filled_cart()?;

        cart.add(1, Money::from_minor(9999, iso::RUB), 3)?;

        let line = cart.line(&ProductId::from(1)).ok_or("missing line")?;

        assert_eq!(cart.len(), 2);
        assert_eq!(line.quantity(), 5);
        assert_eq!(line.unit_price(), &Money::from_minor(1500, iso::RUB));

        Ok(())
    }

    #[test]
    fn add_rejects_zero_quantity() {
        let mut cart = Cart::new(iso::RUB);

        let result = cart.add(1, Money::from_minor(100, iso::RUB), 0);

        assert_eq!(result, Err(CartError::ZeroQuantity(ProductId::from(1))));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_rejects_negative_price() {
        let mut cart = Cart::new(iso::RUB);

        let result = cart.add(1, Money::from_minor(-100, iso::RUB), 1);

        assert_eq!(result, Err(CartError::NegativePrice(ProductId::from(1))));
    }

    #[test]
    fn add_currency_mismatch_errors() {
        let mut cart = Cart::new(iso::RUB);

        let result = cart.add("tulip", Money::from_minor(100, iso::USD), 1);

        match result {
            Err(CartError::CurrencyMismatch(product, item_currency, cart_currency)) => {
                assert_eq!(product, ProductId::from("tulip"));
                assert_eq!(item_currency, iso::USD.iso_alpha_code);
                assert_eq!(cart_currency, iso::RUB.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn add_reports_quantity_overflow() -> TestResult {
        let mut cart = Cart::new(iso::RUB);
        cart.add(1, Money::from_minor(100, iso::RUB), u32::MAX)?;

        let result = cart.add(1, Money::from_minor(100, iso::RUB), 1);

        assert_eq!(
            result,
            Err(CartError::QuantityOverflow(ProductId::from(1)))
        );

        Ok(())
    }

    #[test]
    fn set_quantity_updates_line() -> TestResult {
        let mut cart = filled_cart()?;

        assert!(cart.set_quantity(&ProductId::from(2), 4));
        assert_eq!(cart.item_count(), 6);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_removes_line() -> TestResult {
        let mut cart = filled_cart()?;

        assert!(cart.set_quantity(&ProductId::from(1), 0));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(&ProductId::from(1)).is_none());

        Ok(())
    }

    #[test]
    fn set_quantity_unknown_product_is_noop() -> TestResult {
        let mut cart = filled_cart()?;

        assert!(!cart.set_quantity(&ProductId::from(42), 3));
        assert_eq!(cart.item_count(), 3);

        Ok(())
    }

    #[test]
    fn remove_returns_line() -> TestResult {
        let mut cart = filled_cart()?;

        let removed = cart.remove(&ProductId::from(2)).ok_or("missing line")?;

        assert_eq!(removed.quantity(), 1);
        assert_eq!(cart.len(), 1);
        assert!(cart.remove(&ProductId::from(2)).is_none());

        Ok(())
    }

    #[test]
    fn clear_empties_cart() -> TestResult {
        let mut cart = filled_cart()?;

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);

        Ok(())
    }

    #[test]
    fn subtotal_with_items() -> TestResult {
        let cart = filled_cart()?;

        assert_eq!(cart.subtotal()?, Money::from_minor(3700, iso::RUB));

        Ok(())
    }

    #[test]
    fn subtotal_with_no_items() -> TestResult {
        let cart = Cart::new(iso::RUB);

        assert_eq!(cart.subtotal()?, Money::from_minor(0, iso::RUB));

        Ok(())
    }
}
