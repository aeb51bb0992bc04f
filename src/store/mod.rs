//! Catalog and promo store
//!
//! Read-only reference data loaded from YAML files under a base directory:
//!
//! - `products/<set>.yml`
//! - `promos/<set>.yml`
//! - `carts/<set>.yml`
//!
//! Prices are normalised to minor units and promo expiry dates to timestamps
//! here, so the pricing engine only ever sees parsed values.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    items::ProductId,
    products::Product,
    promotions::{PromoCode, PromoError},
    store::{carts::CartsFile, products::ProductsFile, promos::PromosFile},
};

pub mod carts;
pub mod dates;
pub mod products;
pub mod promos;

/// Store loading and lookup errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading store files
    #[error("Failed to read store file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid date format
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between records
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// Two promos share a code
    #[error("Duplicate promo code: {0}")]
    DuplicatePromo(String),

    /// Promo record rejected
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Cart record rejected
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Store
#[derive(Debug)]
pub struct Store<'a> {
    base_path: PathBuf,
    products: FxHashMap<ProductId, Product<'a>>,
    promos: Vec<PromoCode<'a>>,
    currency: Option<&'static Currency>,
}

impl<'a> Store<'a> {
    /// Create a new empty store with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty store with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: FxHashMap::default(),
            promos: Vec::new(),
            currency: None,
        }
    }

    /// Load products from a YAML file
    ///
    /// The whole file is validated before anything is added to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if prices are
    /// malformed or in mixed currencies, or if a product id repeats.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, StoreError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let file: ProductsFile = serde_norway::from_str(&contents)?;

        let mut currency = self.currency;
        let mut loaded: FxHashMap<ProductId, Product<'a>> = FxHashMap::default();

        for record in file.products {
            let product: Product<'static> = record.try_into()?;

            currency = Some(reconcile_currency(currency, product.price.currency())?);

            if self.products.contains_key(&product.id) || loaded.contains_key(&product.id) {
                return Err(StoreError::DuplicateProduct(product.id));
            }

            loaded.insert(product.id.clone(), product);
        }

        debug!(path = %file_path.display(), count = loaded.len(), "loaded products");

        self.products.extend(loaded);
        self.currency = currency;

        Ok(self)
    }

    /// Load promo codes from a YAML file
    ///
    /// The whole file is validated before anything is added to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a record is
    /// malformed, or if a code repeats (ignoring case).
    pub fn load_promos(&mut self, name: &str) -> Result<&mut Self, StoreError> {
        let file_path = self.base_path.join("promos").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let file: PromosFile = serde_norway::from_str(&contents)?;

        let mut currency = self.currency;
        let mut loaded: Vec<PromoCode<'a>> = Vec::with_capacity(file.promos.len());

        for record in file.promos {
            let promo = record.into_promo(currency)?;

            currency = Some(reconcile_currency(currency, promo.min_cart_amount().currency())?);

            if self
                .promos
                .iter()
                .chain(&loaded)
                .any(|existing| existing.code() == promo.code())
            {
                return Err(StoreError::DuplicatePromo(promo.code().to_string()));
            }

            loaded.push(promo);
        }

        debug!(path = %file_path.display(), count = loaded.len(), "loaded promos");

        self.promos.extend(loaded);
        self.currency = currency;

        Ok(self)
    }

    /// Load products and promos with the same set name
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be loaded.
    pub fn from_set(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, StoreError> {
        let mut store = Self::with_base_path(base_path);

        store.load_products(name)?.load_promos(name)?;

        Ok(store)
    }

    /// Build a cart from a YAML cart file, pricing lines from the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a product is
    /// unknown, or if a line is rejected by the cart.
    pub fn cart(&self, name: &str) -> Result<Cart<'a>, StoreError> {
        let currency = self.currency()?;
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let file: CartsFile = serde_norway::from_str(&contents)?;

        let mut cart = Cart::new(currency);

        for line in file.items {
            let price = self.price_of(&line.product)?;

            cart.add(line.product, price, line.quantity)?;
        }

        Ok(cart)
    }

    /// Get a product by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, id: &ProductId) -> Result<&Product<'a>, StoreError> {
        self.products
            .get(id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))
    }

    /// Get a product's current price by id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn price_of(&self, id: &ProductId) -> Result<Money<'a, Currency>, StoreError> {
        Ok(self.product(id)?.price)
    }

    /// All products, in no particular order
    pub fn products(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// All promo codes, in file order
    pub fn promos(&self) -> &[PromoCode<'a>] {
        &self.promos
    }

    /// Promo codes currently on offer: those with an expiry still in the future.
    pub fn active_promos(&self, now: Timestamp) -> Vec<&PromoCode<'a>> {
        self.promos
            .iter()
            .filter(|promo| promo.expiry().is_some_and(|expiry| expiry > now))
            .collect()
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, StoreError> {
        self.currency.ok_or(StoreError::NoCurrency)
    }
}

/// The store currency after seeing `found`; the first currency seen wins.
fn reconcile_currency(
    existing: Option<&'static Currency>,
    found: &'static Currency,
) -> Result<&'static Currency, StoreError> {
    match existing {
        Some(existing) if existing != found => Err(StoreError::CurrencyMismatch(
            existing.iso_alpha_code.to_string(),
            found.iso_alpha_code.to_string(),
        )),
        _ => Ok(found),
    }
}

impl Default for Store<'_> {
    fn default() -> Self {
        Self::new()
    }
}
