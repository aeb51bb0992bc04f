//! Discounts

use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::promotions::{PromoCode, PromoKind, PromoStatus};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be represented in minor units.
    #[error("percentage discount could not be represented in minor units")]
    PercentConversion,

    /// Promo amounts are in a different currency than the subtotal (promo, subtotal).
    #[error("promo is in {0}, but subtotal is in {1}")]
    CurrencyMismatch(&'static str, &'static str),
}

/// Decide whether `promo` applies to `subtotal` at `now`.
///
/// Expiry is checked before the minimum cart amount.
pub fn evaluate_promo<'a>(
    subtotal: Money<'_, Currency>,
    promo: &PromoCode<'a>,
    now: Timestamp,
) -> PromoStatus<'a> {
    if promo.is_expired(now) {
        return PromoStatus::Expired;
    }

    if subtotal.to_minor_units() < promo.min_cart_amount().to_minor_units() {
        return PromoStatus::BelowMinimum {
            minimum: promo.min_cart_amount(),
        };
    }

    PromoStatus::Applied
}

/// Calculates the discount a promo gives on a subtotal.
///
/// Rejected promos (expired, below minimum) and a missing promo give zero.
/// The result never exceeds `subtotal`.
///
/// # Errors
///
/// - [`DiscountError::CurrencyMismatch`]: the promo is not in the subtotal's currency.
/// - [`DiscountError::PercentConversion`]: the percentage amount does not fit in minor units.
pub fn compute_discount<'a>(
    subtotal: Money<'a, Currency>,
    promo: Option<&PromoCode<'_>>,
    now: Timestamp,
) -> Result<Money<'a, Currency>, DiscountError> {
    let Some(promo) = promo else {
        return Ok(Money::from_minor(0, subtotal.currency()));
    };

    ensure_same_currency(subtotal, promo)?;

    if !evaluate_promo(subtotal, promo, now).is_applied() {
        return Ok(Money::from_minor(0, subtotal.currency()));
    }

    applied_discount(subtotal, promo)
}

/// Reject promos whose amounts are not in the subtotal's currency.
pub(crate) fn ensure_same_currency(
    subtotal: Money<'_, Currency>,
    promo: &PromoCode<'_>,
) -> Result<(), DiscountError> {
    let promo_currency = promo.min_cart_amount().currency();

    if promo_currency == subtotal.currency() {
        Ok(())
    } else {
        Err(DiscountError::CurrencyMismatch(
            promo_currency.iso_alpha_code,
            subtotal.currency().iso_alpha_code,
        ))
    }
}

/// Discount for a promo already known to apply, clamped to the subtotal.
pub(crate) fn applied_discount<'a>(
    subtotal: Money<'a, Currency>,
    promo: &PromoCode<'_>,
) -> Result<Money<'a, Currency>, DiscountError> {
    let currency = subtotal.currency();
    let subtotal_minor = subtotal.to_minor_units();

    let raw = match promo.kind() {
        PromoKind::Percent(percent) => percent_of_minor_floor(percent, subtotal_minor)?,
        PromoKind::Fixed(amount) => amount.to_minor_units(),
    };

    Ok(Money::from_minor(raw.min(subtotal_minor), currency))
}

/// `floor(minor * percent / 100)`, computed exactly.
fn percent_of_minor_floor(percent: Decimal, minor: i64) -> Result<i64, DiscountError> {
    let Some(applied) = Decimal::from(minor).checked_mul(percent) else {
        return Err(DiscountError::PercentConversion);
    };

    let Some(scaled) = applied.checked_div(Decimal::ONE_HUNDRED) else {
        return Err(DiscountError::PercentConversion);
    };

    scaled.floor().to_i64().ok_or(DiscountError::PercentConversion)
}
