//! Bouquet
//!
//! Bouquet prices flower-shop carts: it sums cart lines, applies the shipping
//! policy and evaluates a single promo code against the subtotal.

pub mod cart;
pub mod config;
pub mod discounts;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod quote;
pub mod receipt;
pub mod shipping;
pub mod store;
