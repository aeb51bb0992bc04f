//! Promotions
//!
//! Promo codes are immutable reference data supplied by the store. Looking a
//! code up and deciding whether it applies are separate steps: [`resolve_promo`]
//! only matches the code, while expiry and minimum spend are checked when the
//! discount is computed.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

pub mod status;

pub use status::PromoStatus;

/// Errors related to promo codes.
#[derive(Debug, Error, PartialEq)]
pub enum PromoError {
    /// No promo code in the catalog matches.
    #[error("promo code not found: {0}")]
    NotFound(String),

    /// The code string is empty or whitespace.
    #[error("promo code must not be empty")]
    EmptyCode,

    /// Percentage outside 0..=100 (code, percent).
    #[error("promo code {0} has percentage {1}, expected 0-100")]
    InvalidPercent(String, Decimal),

    /// Negative fixed value or minimum cart amount.
    #[error("promo code {0} has a negative amount")]
    NegativeAmount(String),

    /// Fixed value and minimum cart amount are in different currencies.
    #[error("promo code {0} mixes currencies {1} and {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// How a promo code discounts the cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromoKind<'a> {
    /// Percentage of the subtotal, rounded down to whole minor units.
    Percent(Decimal),

    /// Fixed amount off the subtotal.
    Fixed(Money<'a, Currency>),
}

impl fmt::Display for PromoKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromoKind::Percent(percent) => write!(f, "{}%", percent.normalize()),
            PromoKind::Fixed(amount) => write!(f, "{amount}"),
        }
    }
}

/// Promo code
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCode<'a> {
    code: String,
    kind: PromoKind<'a>,
    min_cart_amount: Money<'a, Currency>,
    expiry: Option<Timestamp>,
    description: Option<String>,
}

impl<'a> PromoCode<'a> {
    /// Create a new promo code with no expiry.
    ///
    /// The code is stored in its canonical upper-case form.
    ///
    /// # Errors
    ///
    /// - [`PromoError::EmptyCode`]: `code` is blank.
    /// - [`PromoError::InvalidPercent`]: a percentage outside 0..=100.
    /// - [`PromoError::NegativeAmount`]: a negative fixed value or minimum.
    /// - [`PromoError::CurrencyMismatch`]: fixed value and minimum use different currencies.
    pub fn new(
        code: &str,
        kind: PromoKind<'a>,
        min_cart_amount: Money<'a, Currency>,
    ) -> Result<Self, PromoError> {
        let code = normalise_code(code);

        if code.is_empty() {
            return Err(PromoError::EmptyCode);
        }

        if min_cart_amount.to_minor_units() < 0 {
            return Err(PromoError::NegativeAmount(code));
        }

        match kind {
            PromoKind::Percent(percent) => {
                if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                    return Err(PromoError::InvalidPercent(code, percent));
                }
            }
            PromoKind::Fixed(amount) => {
                if amount.to_minor_units() < 0 {
                    return Err(PromoError::NegativeAmount(code));
                }

                if amount.currency() != min_cart_amount.currency() {
                    return Err(PromoError::CurrencyMismatch(
                        code,
                        amount.currency().iso_alpha_code,
                        min_cart_amount.currency().iso_alpha_code,
                    ));
                }
            }
        }

        Ok(Self {
            code,
            kind,
            min_cart_amount,
            expiry: None,
            description: None,
        })
    }

    /// Set the instant from which the code no longer applies.
    #[must_use]
    pub fn with_expiry(mut self, expiry: Timestamp) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Attach a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Canonical (upper-case) code
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Discount kind
    pub fn kind(&self) -> PromoKind<'a> {
        self.kind
    }

    /// Minimum pre-shipping subtotal for the code to apply
    pub fn min_cart_amount(&self) -> Money<'a, Currency> {
        self.min_cart_amount
    }

    /// Expiry instant, if any
    pub fn expiry(&self) -> Option<Timestamp> {
        self.expiry
    }

    /// Description, if any
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether the code has expired at `now`. Codes without expiry never do.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }

    /// Whether `code` names this promo, ignoring case and surrounding whitespace.
    pub fn matches(&self, code: &str) -> bool {
        normalise_code(code) == self.code
    }
}

/// Canonical form of a user-entered code.
pub(crate) fn normalise_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Look up a promo code by its code, case-insensitively.
///
/// Expiry and minimum spend are not checked here.
///
/// # Errors
///
/// Returns [`PromoError::NotFound`] if no promo in `catalog` matches.
pub fn resolve_promo<'c, 'a>(
    code: &str,
    catalog: &'c [PromoCode<'a>],
) -> Result<&'c PromoCode<'a>, PromoError> {
    let wanted = normalise_code(code);

    catalog
        .iter()
        .find(|promo| promo.code == wanted)
        .ok_or(PromoError::NotFound(wanted))
}
