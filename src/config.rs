//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use rusty_money::iso::Currency;

use crate::shipping::{DEFAULT_FLAT_RATE, DEFAULT_FREE_THRESHOLD, ShippingError, ShippingPolicy};

/// Bouquet configuration
#[derive(Debug, Parser)]
#[command(name = "bouquet", about = "Flower shop cart pricing", long_about = None)]
pub struct Config {
    /// Store file settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Shipping policy settings.
    #[command(flatten)]
    pub shipping: ShippingConfig,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Where store files live.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// Base directory of the store files
    #[arg(short, long, env = "BOUQUET_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Name of the product and promo set to load
    #[arg(short, long, env = "BOUQUET_SET", default_value = "storefront")]
    pub set: String,
}

/// Shipping policy, in whole units of the store currency.
#[derive(Debug, Args)]
pub struct ShippingConfig {
    /// Subtotal at or above which shipping is free
    #[arg(long, env = "BOUQUET_FREE_SHIPPING_THRESHOLD", default_value_t = DEFAULT_FREE_THRESHOLD)]
    pub free_shipping_threshold: i64,

    /// Shipping charge below the threshold
    #[arg(long, env = "BOUQUET_FLAT_SHIPPING_RATE", default_value_t = DEFAULT_FLAT_RATE)]
    pub flat_shipping_rate: i64,
}

impl ShippingConfig {
    /// Build the shipping policy in the given currency.
    ///
    /// # Errors
    ///
    /// Returns an error if either amount is negative or too large.
    pub fn policy<'a>(&self, currency: &'a Currency) -> Result<ShippingPolicy<'a>, ShippingError> {
        ShippingPolicy::from_whole_units(
            self.free_shipping_threshold,
            self.flat_shipping_rate,
            currency,
        )
    }
}

/// Bouquet commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a saved cart
    Quote {
        /// Name of the saved cart
        #[arg(short, long)]
        cart: String,

        /// Promo code to apply
        #[arg(short, long)]
        promo: Option<String>,

        /// Price as of this instant instead of now (RFC 3339)
        #[arg(long)]
        now: Option<Timestamp>,
    },

    /// List promo codes currently on offer
    Promos {
        /// List as of this instant instead of now (RFC 3339)
        #[arg(long)]
        now: Option<Timestamp>,
    },
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::RUB};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_storefront_policy() -> TestResult {
        let config = Config::try_parse_from(["bouquet", "quote", "--cart", "small"])?;

        assert_eq!(config.store.set, "storefront");
        assert_eq!(config.store.fixtures, PathBuf::from("./fixtures"));
        assert_eq!(
            config.shipping.policy(RUB)?,
            ShippingPolicy::storefront(RUB)
        );

        Ok(())
    }

    #[test]
    fn quote_command_parses_promo_and_now() -> TestResult {
        let config = Config::try_parse_from([
            "bouquet",
            "--free-shipping-threshold",
            "1000",
            "quote",
            "--cart",
            "small",
            "--promo",
            "welcome10",
            "--now",
            "2025-06-01T00:00:00Z",
        ])?;

        assert_eq!(config.shipping.free_shipping_threshold, 1000);
        assert_eq!(
            config.shipping.policy(RUB)?.free_threshold(),
            Money::from_major(1000, RUB)
        );

        match config.command {
            Command::Quote { cart, promo, now } => {
                assert_eq!(cart, "small");
                assert_eq!(promo.as_deref(), Some("welcome10"));
                assert_eq!(now, Some("2025-06-01T00:00:00Z".parse()?));
            }
            other => panic!("expected Quote command, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn negative_rates_are_rejected() -> TestResult {
        let config =
            Config::try_parse_from(["bouquet", "--flat-shipping-rate=-5", "promos"])?;

        assert_eq!(
            config.shipping.policy(RUB),
            Err(ShippingError::NegativeAmount)
        );

        Ok(())
    }

    #[test]
    fn quote_requires_a_cart() {
        assert!(Config::try_parse_from(["bouquet", "quote"]).is_err());
    }
}
