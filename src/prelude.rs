//! Bouquet prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    discounts::{DiscountError, compute_discount, evaluate_promo},
    items::{LineItem, ProductId},
    pricing::{PricingError, compute_subtotal},
    products::Product,
    promotions::{PromoCode, PromoError, PromoKind, PromoStatus, resolve_promo},
    quote::{Quote, QuoteError, build_quote},
    receipt::{Receipt, ReceiptError},
    shipping::{ShippingError, ShippingPolicy, compute_shipping},
    store::{Store, StoreError},
};
