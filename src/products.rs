//! Products

use rusty_money::{Money, iso::Currency};

use crate::items::ProductId;

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Current price
    pub price: Money<'a, Currency>,

    /// Price before markdown, if the product is on sale
    pub old_price: Option<Money<'a, Currency>>,

    /// Catalog category slug
    pub category: Option<String>,
}

impl Product<'_> {
    /// Whether the product is marked down from a higher previous price.
    pub fn is_discounted(&self) -> bool {
        self.old_price
            .is_some_and(|old| old.to_minor_units() > self.price.to_minor_units())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::RUB;

    use super::*;

    fn rose<'a>(old_price: Option<Money<'a, Currency>>) -> Product<'a> {
        Product {
            id: ProductId::from(1),
            name: "Red roses".to_string(),
            price: Money::from_minor(4500, RUB),
            old_price,
            category: Some("roses".to_string()),
        }
    }

    #[test]
    fn discounted_when_old_price_is_higher() {
        assert!(rose(Some(Money::from_minor(5000, RUB))).is_discounted());
    }

    #[test]
    fn not_discounted_without_old_price() {
        assert!(!rose(None).is_discounted());
    }

    #[test]
    fn not_discounted_when_old_price_is_lower() {
        assert!(!rose(Some(Money::from_minor(4000, RUB))).is_discounted());
    }
}
