//! Product records

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, RUB, USD},
};
use serde::Deserialize;

use crate::{items::ProductId, products::Product, store::StoreError};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    /// Product records
    pub products: Vec<ProductRecord>,
}

/// Product record
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    /// Catalog id, numeric or string
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product price (e.g., "45.00 RUB")
    pub price: String,

    /// Price before markdown
    #[serde(default)]
    pub old_price: Option<String>,

    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
}

impl TryFrom<ProductRecord> for Product<'_> {
    type Error = StoreError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let price = parse_money(&record.price)?;

        let old_price = record
            .old_price
            .as_deref()
            .map(parse_money)
            .transpose()?;

        if let Some(old) = old_price
            && old.currency() != price.currency()
        {
            return Err(StoreError::CurrencyMismatch(
                price.currency().iso_alpha_code.to_string(),
                old.currency().iso_alpha_code.to_string(),
            ));
        }

        Ok(Product {
            id: record.id,
            name: record.name,
            price,
            old_price,
            category: record.category,
        })
    }
}

/// Parse a price string straight into money.
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, StoreError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "2500 RUB") into minor units and currency
///
/// Amounts are whole currency units, optionally with a fractional part, and
/// are scaled to minor units by the currency's exponent.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is negative or finer than the currency's minor unit, or if
/// the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), StoreError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let (Some(amount), Some(currency_code), 2) = (parts.first(), parts.get(1), parts.len()) else {
        return Err(StoreError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match *currency_code {
        "RUB" => RUB,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(StoreError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| StoreError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(StoreError::InvalidPrice(s.to_string()));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(Decimal::from(factor)))
        .filter(|scaled| scaled.fract().is_zero())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(|| StoreError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}
