//! Promo application status

use std::fmt;

use rusty_money::{Money, iso::Currency};

/// Outcome of trying to apply a promo code to a cart.
///
/// None of these are errors: a rejected code simply yields no discount, and
/// the status tells the presentation layer why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromoStatus<'a> {
    /// The code was applied.
    Applied,

    /// No promo matches the code.
    NotFound,

    /// The pre-shipping subtotal is below the code's minimum.
    BelowMinimum {
        /// Minimum cart amount required by the code
        minimum: Money<'a, Currency>,
    },

    /// The code is past its expiry.
    Expired,
}

impl PromoStatus<'_> {
    /// Whether the code produced a discount.
    pub fn is_applied(&self) -> bool {
        matches!(self, PromoStatus::Applied)
    }

    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromoStatus::Applied => "applied",
            PromoStatus::NotFound => "not_found",
            PromoStatus::BelowMinimum { .. } => "below_minimum",
            PromoStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for PromoStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromoStatus::Applied => f.write_str("Promo code applied"),
            PromoStatus::NotFound => f.write_str("Invalid promo code"),
            PromoStatus::BelowMinimum { minimum } => {
                write!(f, "Minimum cart amount for this promo code: {minimum}")
            }
            PromoStatus::Expired => f.write_str("Promo code has expired"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;

    use super::*;

    #[test]
    fn only_applied_is_applied() {
        assert!(PromoStatus::Applied.is_applied());
        assert!(!PromoStatus::NotFound.is_applied());
        assert!(!PromoStatus::Expired.is_applied());
        assert!(
            !PromoStatus::BelowMinimum {
                minimum: Money::from_minor(100, RUB)
            }
            .is_applied()
        );
    }

    #[test]
    fn names_are_snake_case() {
        let below = PromoStatus::BelowMinimum {
            minimum: Money::from_minor(5000, RUB),
        };

        assert_eq!(PromoStatus::Applied.as_str(), "applied");
        assert_eq!(PromoStatus::NotFound.as_str(), "not_found");
        assert_eq!(below.as_str(), "below_minimum");
        assert_eq!(PromoStatus::Expired.as_str(), "expired");
    }

    #[test]
    fn below_minimum_reason_mentions_the_minimum() {
        let minimum = Money::from_minor(5000, RUB);
        let reason = PromoStatus::BelowMinimum { minimum }.to_string();

        assert!(reason.starts_with("Minimum cart amount"));
        assert!(reason.ends_with(&minimum.to_string()));
    }
}
