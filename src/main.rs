//! Bouquet CLI

use std::{io, process};

use anyhow::Context;
use jiff::{Timestamp, tz::TimeZone};
use tabled::{
    builder::Builder,
    settings::{Color, Style, object::Rows},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bouquet::{
    config::{Command, Config},
    promotions::PromoCode,
    quote::build_quote,
    receipt::Receipt,
    store::Store,
};

/// Bouquet CLI entry point
///
/// # Errors
///
/// Returns an error if the store cannot be loaded or a quote cannot be built.
pub fn main() -> anyhow::Result<()> {
    // Load configuration from .env and CLI arguments
    let config = Config::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging; stdout is reserved for output
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let store = Store::from_set(config.store.fixtures, &config.store.set)
        .with_context(|| format!("failed to load store set {}", config.store.set))?;

    let policy = config.shipping.policy(store.currency()?)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match config.command {
        Command::Quote { cart, promo, now } => {
            let now = now.unwrap_or_else(Timestamp::now);

            let cart = store
                .cart(&cart)
                .with_context(|| format!("failed to load cart {cart}"))?;

            let quote = build_quote(cart.items(), promo.as_deref(), store.promos(), &policy, now)?;

            info!(subtotal = %quote.subtotal(), total = %quote.total(), "quote built");

            Receipt::new(cart.items(), quote, &store)?.write_to(&mut out)?;
        }
        Command::Promos { now } => {
            let now = now.unwrap_or_else(Timestamp::now);

            write_promos(&mut out, &store.active_promos(now))?;
        }
    }

    Ok(())
}

fn write_promos(out: &mut impl io::Write, promos: &[&PromoCode<'_>]) -> io::Result<()> {
    if promos.is_empty() {
        return writeln!(out, "No promo codes on offer.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Code", "Discount", "Minimum", "Expires", "Description"]);

    for promo in promos {
        builder.push_record([
            promo.code().to_string(),
            promo.kind().to_string(),
            promo.min_cart_amount().to_string(),
            promo
                .expiry()
                .map(|expiry| expiry.to_zoned(TimeZone::UTC).date().to_string())
                .unwrap_or_default(),
            promo.description().unwrap_or_default().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(out, "{table}")
}
