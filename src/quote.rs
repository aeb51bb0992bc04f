//! Quote
//!
//! A [`Quote`] is the pricing breakdown for a cart snapshot at one instant.
//! It is recomputed on every change and never persisted.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{Span, debug};

use crate::{
    discounts::{DiscountError, applied_discount, ensure_same_currency, evaluate_promo},
    items::LineItem,
    pricing::{PricingError, compute_subtotal},
    promotions::{PromoCode, PromoStatus, resolve_promo},
    shipping::{ShippingPolicy, compute_shipping},
};

/// Errors that can occur while building a quote.
///
/// Promo rejections are not errors; they are reported through [`Quote::promo_status`].
#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    /// A line item was malformed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The discount could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Subtotal plus shipping does not fit in minor units.
    #[error("quote total overflowed")]
    Overflow,
}

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote<'a> {
    subtotal: Money<'a, Currency>,
    shipping: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    applied_promo_code: Option<String>,
    promo_status: Option<PromoStatus<'a>>,
}

impl<'a> Quote<'a> {
    /// Sum of line totals, before shipping and discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Shipping cost
    pub fn shipping(&self) -> Money<'a, Currency> {
        self.shipping
    }

    /// Discount taken off by the promo code
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Amount payable, never negative
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Canonical code of the promo that was applied, if any
    pub fn applied_promo_code(&self) -> Option<&str> {
        self.applied_promo_code.as_deref()
    }

    /// Outcome of the promo code, or `None` when no code was supplied
    pub fn promo_status(&self) -> Option<PromoStatus<'a>> {
        self.promo_status
    }

    /// Currency of every amount in the quote
    pub fn currency(&self) -> &'a Currency {
        self.total.currency()
    }

    /// Whether shipping is free for this quote
    pub fn ships_free(&self) -> bool {
        self.shipping.to_minor_units() == 0
    }
}

/// Builds a quote for a cart snapshot.
///
/// Runs subtotal, shipping, promo lookup, discount and total in that order.
/// An unknown, expired or below-minimum code gives no discount and is reported
/// through the quote's promo status. A blank code counts as no code at all.
///
/// The quote is in the shipping policy's currency. Identical inputs always
/// produce an identical quote.
///
/// # Errors
///
/// - [`QuoteError::Pricing`]: a line item is malformed or in the wrong currency.
/// - [`QuoteError::Discount`]: the matched promo is in the wrong currency or its
///   percentage cannot be represented.
/// - [`QuoteError::Overflow`]: the total does not fit in minor units.
#[tracing::instrument(
    name = "pricing.build_quote",
    skip(items, catalog, policy),
    fields(
        item_count = items.len(),
        promo_status = tracing::field::Empty
    ),
    err
)]
pub fn build_quote<'a>(
    items: &[LineItem<'_>],
    promo_code: Option<&str>,
    catalog: &[PromoCode<'a>],
    policy: &ShippingPolicy<'a>,
    now: Timestamp,
) -> Result<Quote<'a>, QuoteError> {
    let subtotal = compute_subtotal(items, policy.currency())?;
    let shipping = compute_shipping(subtotal, policy);

    let code = promo_code.map(str::trim).filter(|code| !code.is_empty());

    let (discount, applied_promo_code, promo_status) = match code {
        None => (Money::from_minor(0, subtotal.currency()), None, None),
        Some(code) => match resolve_promo(code, catalog) {
            Err(err) => {
                debug!(%err, "promo code rejected");

                (
                    Money::from_minor(0, subtotal.currency()),
                    None,
                    Some(PromoStatus::NotFound),
                )
            }
            Ok(promo) => {
                ensure_same_currency(subtotal, promo)?;

                let status = evaluate_promo(subtotal, promo, now);

                if status.is_applied() {
                    (
                        applied_discount(subtotal, promo)?,
                        Some(promo.code().to_string()),
                        Some(status),
                    )
                } else {
                    debug!(code = promo.code(), status = status.as_str(), "promo code rejected");

                    (Money::from_minor(0, subtotal.currency()), None, Some(status))
                }
            }
        },
    };

    if let Some(status) = promo_status {
        Span::current().record("promo_status", status.as_str());
    }

    let total = subtotal
        .to_minor_units()
        .checked_add(shipping.to_minor_units())
        .ok_or(QuoteError::Overflow)?
        .saturating_sub(discount.to_minor_units())
        .max(0);

    Ok(Quote {
        subtotal,
        shipping,
        discount,
        total: Money::from_minor(total, subtotal.currency()),
        applied_promo_code,
        promo_status,
    })
}
