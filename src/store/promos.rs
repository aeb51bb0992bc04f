//! Promo code records

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    promotions::{PromoCode, PromoKind},
    store::{StoreError, dates::parse_timestamp, products::parse_money},
};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromosFile {
    /// Promo code records
    pub promos: Vec<PromoRecord>,
}

/// Promo code record
///
/// `discount` is either a percentage (`"10%"`) or a fixed amount (`"5.00 RUB"`).
#[derive(Debug, Deserialize)]
pub struct PromoRecord {
    /// Code as typed by the customer
    pub code: String,

    /// Percentage or fixed amount
    pub discount: String,

    /// Minimum pre-shipping subtotal (e.g., "20.00 RUB")
    #[serde(default)]
    pub min_cart_amount: Option<String>,

    /// Expiry date (`YYYY-MM-DD`, `DD.MM.YYYY` or RFC 3339)
    #[serde(default)]
    pub expiry: Option<String>,

    /// Description shown to customers
    #[serde(default)]
    pub description: Option<String>,
}

impl PromoRecord {
    /// Convert the record into a promo code.
    ///
    /// `currency` is the store currency, used for a missing minimum when the
    /// record itself names no currency.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is malformed, if the record's amounts use
    /// different currencies, or if no currency can be determined.
    pub fn into_promo(
        self,
        currency: Option<&'static Currency>,
    ) -> Result<PromoCode<'static>, StoreError> {
        let kind = parse_discount(&self.discount)?;

        let min_cart_amount = match self.min_cart_amount.as_deref() {
            Some(amount) => parse_money(amount)?,
            None => {
                let currency = match kind {
                    PromoKind::Fixed(amount) => amount.currency(),
                    PromoKind::Percent(_) => currency.ok_or(StoreError::NoCurrency)?,
                };

                Money::from_minor(0, currency)
            }
        };

        let mut promo = PromoCode::new(&self.code, kind, min_cart_amount)?;

        if let Some(expiry) = self.expiry.as_deref() {
            promo = promo.with_expiry(parse_timestamp(expiry)?);
        }

        if let Some(description) = self.description {
            promo = promo.with_description(description);
        }

        Ok(promo)
    }
}

/// Parse a discount string: `"10%"` is a percentage, anything else a fixed price.
///
/// # Errors
///
/// Returns an error if the percentage or price cannot be parsed.
pub fn parse_discount(s: &str) -> Result<PromoKind<'static>, StoreError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| StoreError::InvalidPercentage(s.to_string()))?;

        Ok(PromoKind::Percent(value))
    } else {
        Ok(PromoKind::Fixed(parse_money(trimmed)?))
    }
}
