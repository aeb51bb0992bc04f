//! Shipping

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Storefront default: orders of 5000 whole currency units or more ship free.
pub const DEFAULT_FREE_THRESHOLD: i64 = 5000;

/// Storefront default flat delivery charge in whole currency units.
pub const DEFAULT_FLAT_RATE: i64 = 300;

/// Errors constructing a shipping policy.
#[derive(Debug, Error, PartialEq)]
pub enum ShippingError {
    /// Threshold and flat rate are in different currencies (threshold, flat rate).
    #[error("free shipping threshold is in {0}, but flat rate is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// A negative threshold or rate was supplied.
    #[error("shipping amounts must not be negative")]
    NegativeAmount,

    /// A whole-unit amount does not fit in minor units.
    #[error("shipping amount {0} is too large")]
    Overflow(i64),
}

/// Free-over-threshold, flat-rate-otherwise shipping policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShippingPolicy<'a> {
    free_threshold: Money<'a, Currency>,
    flat_rate: Money<'a, Currency>,
}

impl<'a> ShippingPolicy<'a> {
    /// Create a new shipping policy.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::CurrencyMismatch`]: the two amounts use different currencies.
    /// - [`ShippingError::NegativeAmount`]: either amount is below zero.
    pub fn new(
        free_threshold: Money<'a, Currency>,
        flat_rate: Money<'a, Currency>,
    ) -> Result<Self, ShippingError> {
        if free_threshold.currency() != flat_rate.currency() {
            return Err(ShippingError::CurrencyMismatch(
                free_threshold.currency().iso_alpha_code,
                flat_rate.currency().iso_alpha_code,
            ));
        }

        if free_threshold.to_minor_units() < 0 || flat_rate.to_minor_units() < 0 {
            return Err(ShippingError::NegativeAmount);
        }

        Ok(Self {
            free_threshold,
            flat_rate,
        })
    }

    /// Create a policy from amounts in whole currency units.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::NegativeAmount`]: either amount is below zero.
    /// - [`ShippingError::Overflow`]: an amount does not fit in minor units.
    pub fn from_whole_units(
        free_threshold: i64,
        flat_rate: i64,
        currency: &'a Currency,
    ) -> Result<Self, ShippingError> {
        Self::new(
            whole_units(free_threshold, currency).ok_or(ShippingError::Overflow(free_threshold))?,
            whole_units(flat_rate, currency).ok_or(ShippingError::Overflow(flat_rate))?,
        )
    }

    /// The storefront's default policy in the given currency.
    pub fn storefront(currency: &'a Currency) -> Self {
        Self {
            free_threshold: Money::from_major(DEFAULT_FREE_THRESHOLD, currency),
            flat_rate: Money::from_major(DEFAULT_FLAT_RATE, currency),
        }
    }

    /// Subtotal at or above which shipping is free
    pub fn free_threshold(&self) -> Money<'a, Currency> {
        self.free_threshold
    }

    /// Charge applied below the threshold
    pub fn flat_rate(&self) -> Money<'a, Currency> {
        self.flat_rate
    }

    /// Currency the policy is expressed in
    pub fn currency(&self) -> &'a Currency {
        self.flat_rate.currency()
    }
}

/// `amount` whole units of `currency`, scaled to minor units by its exponent.
pub fn whole_units(amount: i64, currency: &Currency) -> Option<Money<'_, Currency>> {
    10_i64
        .checked_pow(currency.exponent)
        .and_then(|factor| amount.checked_mul(factor))
        .map(|minor| Money::from_minor(minor, currency))
}

/// Calculates the shipping cost for a subtotal.
///
/// The threshold is inclusive: a subtotal exactly equal to it ships free.
pub fn compute_shipping<'a>(
    subtotal: Money<'_, Currency>,
    policy: &ShippingPolicy<'a>,
) -> Money<'a, Currency> {
    if subtotal.to_minor_units() >= policy.free_threshold.to_minor_units() {
        Money::from_minor(0, policy.currency())
    } else {
        policy.flat_rate
    }
}
