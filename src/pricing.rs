//! Pricing

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Malformed line items. These indicate a caller bug and are never recovered from.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line has a negative unit price (index, price in minor units).
    #[error("item {0} has a negative unit price ({1})")]
    NegativePrice(usize, i64),

    /// A line has zero quantity; such lines should have been removed from the cart.
    #[error("item {0} has zero quantity")]
    ZeroQuantity(usize),

    /// A line's currency differs from the quote currency (index, item currency, quote currency).
    #[error("item {0} has currency {1}, but quote has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// The running subtotal no longer fits in minor units.
    #[error("subtotal overflowed at item {0}")]
    Overflow(usize),
}

/// Calculates the subtotal of a set of line items.
///
/// Every line is validated before it contributes to the sum, so a bad line
/// aborts the whole calculation. An empty slice yields zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::NegativePrice`]: a unit price is below zero.
/// - [`PricingError::ZeroQuantity`]: a line has no units.
/// - [`PricingError::CurrencyMismatch`]: a unit price is not in `currency`.
/// - [`PricingError::Overflow`]: the sum does not fit in minor units.
pub fn compute_subtotal<'a>(
    items: &[LineItem<'_>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = items
        .iter()
        .enumerate()
        .try_fold(0i64, |acc, (idx, item)| {
            let line_total = validated_line_total(idx, item, currency)?;

            acc.checked_add(line_total)
                .ok_or(PricingError::Overflow(idx))
        })?;

    Ok(Money::from_minor(minor, currency))
}

/// Check a single line and return its total in minor units.
fn validated_line_total(
    idx: usize,
    item: &LineItem<'_>,
    currency: &Currency,
) -> Result<i64, PricingError> {
    let item_currency = item.unit_price().currency();

    if item_currency != currency {
        return Err(PricingError::CurrencyMismatch(
            idx,
            item_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ));
    }

    let price = item.unit_price().to_minor_units();

    if price < 0 {
        return Err(PricingError::NegativePrice(idx, price));
    }

    if item.quantity() == 0 {
        return Err(PricingError::ZeroQuantity(idx));
    }

    item.line_total_minor().ok_or(PricingError::Overflow(idx))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{RUB, USD};
    use testresult::TestResult;

    use super::*;

    fn test_items<'a>() -> [LineItem<'a>; 3] {
        [
            LineItem::new(1, Money::from_minor(1500, RUB), 2),
            LineItem::new(2, Money::from_minor(700, RUB), 1),
            LineItem::new("peony", Money::from_minor(250, RUB), 4),
        ]
    }

    #[test]
    fn subtotal_sums_price_times_quantity() -> TestResult {
        let items = test_items();

        assert_eq!(compute_subtotal(&items, RUB)?, Money::from_minor(4700, RUB));

        Ok(())
    }

    #[test]
    fn subtotal_is_independent_of_item_order() -> TestResult {
        let items = test_items();
        let mut reversed = items.clone();
        reversed.reverse();

        let mut rotated = items.clone();
        rotated.rotate_left(1);

        let expected = compute_subtotal(&items, RUB)?;

        assert_eq!(compute_subtotal(&reversed, RUB)?, expected);
        assert_eq!(compute_subtotal(&rotated, RUB)?, expected);

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_cart_is_zero() -> TestResult {
        let items: [LineItem<'static>; 0] = [];

        assert_eq!(compute_subtotal(&items, RUB)?, Money::from_minor(0, RUB));

        Ok(())
    }

    #[test]
    fn free_items_contribute_nothing() -> TestResult {
        let items = [
            LineItem::new(1, Money::from_minor(0, RUB), 5),
            LineItem::new(2, Money::from_minor(100, RUB), 1),
        ];

        assert_eq!(compute_subtotal(&items, RUB)?, Money::from_minor(100, RUB));

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() {
        let items = [
            LineItem::new(1, Money::from_minor(100, RUB), 1),
            LineItem::new(2, Money::from_minor(-1, RUB), 1),
        ];

        assert_eq!(
            compute_subtotal(&items, RUB),
            Err(PricingError::NegativePrice(1, -1))
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let items = [LineItem::new(1, Money::from_minor(100, RUB), 0)];

        assert_eq!(
            compute_subtotal(&items, RUB),
            Err(PricingError::ZeroQuantity(0))
        );
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let items = [
            LineItem::new(1, Money::from_minor(100, RUB), 1),
            LineItem::new(2, Money::from_minor(100, USD), 1),
        ];

        assert_eq!(
            compute_subtotal(&items, RUB),
            Err(PricingError::CurrencyMismatch(
                1,
                USD.iso_alpha_code,
                RUB.iso_alpha_code
            ))
        );
    }

    #[test]
    fn overflowing_subtotal_is_rejected() {
        let items = [
            LineItem::new(1, Money::from_minor(i64::MAX, RUB), 1),
            LineItem::new(2, Money::from_minor(1, RUB), 1),
        ];

        assert_eq!(
            compute_subtotal(&items, RUB),
            Err(PricingError::Overflow(1))
        );
    }
}
