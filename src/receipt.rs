//! Receipt
//!
//! Terminal rendering of a quote. This sits at the presentation boundary: it
//! only formats values the pricing engine already computed.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    items::{LineItem, ProductId},
    promotions::PromoStatus,
    quote::Quote,
    store::Store,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line refers to a product missing from the catalog.
    #[error("Missing product {0}")]
    MissingProduct(ProductId),

    /// A line total does not fit in minor units.
    #[error("Line total overflowed for product {0}")]
    Overflow(ProductId),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One printed cart line.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Product name
    pub name: String,

    /// Unit price
    pub unit_price: Money<'a, Currency>,

    /// Units bought
    pub quantity: u32,

    /// Unit price times quantity
    pub line_total: Money<'a, Currency>,
}

/// Printable summary of a quote.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,
    quote: Quote<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt for the cart snapshot a quote was computed from.
    ///
    /// # Errors
    ///
    /// - [`ReceiptError::MissingProduct`]: a line's product is not in `store`.
    /// - [`ReceiptError::Overflow`]: a line total does not fit in minor units.
    pub fn new(
        items: &[LineItem<'a>],
        quote: Quote<'a>,
        store: &Store<'_>,
    ) -> Result<Self, ReceiptError> {
        let lines = items
            .iter()
            .map(|item| {
                let product = store
                    .product(item.product())
                    .map_err(|_err| ReceiptError::MissingProduct(item.product().clone()))?;

                let line_total = item
                    .line_total_minor()
                    .ok_or_else(|| ReceiptError::Overflow(item.product().clone()))?;

                Ok(ReceiptLine {
                    name: product.name.clone(),
                    unit_price: *item.unit_price(),
                    quantity: item.quantity(),
                    line_total: Money::from_minor(line_total, item.unit_price().currency()),
                })
            })
            .collect::<Result<_, ReceiptError>>()?;

        Ok(Self { lines, quote })
    }

    /// Printed lines
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// The quote being printed
    pub fn quote(&self) -> &Quote<'a> {
        &self.quote
    }

    /// Discount as a fraction of the subtotal.
    pub fn savings_percent(&self) -> Percentage {
        let subtotal_minor = self.quote.subtotal().to_minor_units();

        if subtotal_minor == 0 {
            return Percentage::from(Decimal::ZERO);
        }

        let savings = Decimal::from(self.quote.discount().to_minor_units());
        let subtotal = Decimal::from(subtotal_minor);

        Percentage::from(savings / subtotal)
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Unit Price", "Qty", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                format!("{}", line.unit_price),
                line.quantity.to_string(),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let quote = &self.quote;

        let shipping = if quote.ships_free() {
            "Free".to_string()
        } else {
            quote.shipping().to_string()
        };

        let mut rows: SmallVec<[(&str, String); 5]> = SmallVec::new();

        rows.push(("Subtotal:", quote.subtotal().to_string()));
        rows.push(("Shipping:", shipping));

        if quote.discount().to_minor_units() > 0 {
            let percent_points = percent_points(self.savings_percent());

            rows.push((
                "Discount:",
                format!("({percent_points:.2}%) -{}", quote.discount()),
            ));
        }

        rows.push(("Total:", quote.total().to_string()));

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.chars().count()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        if let Some(status) = quote.promo_status() {
            write_promo_status(out, status, quote.applied_promo_code())?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn write_promo_status(
    out: &mut impl io::Write,
    status: PromoStatus<'_>,
    applied_code: Option<&str>,
) -> Result<(), ReceiptError> {
    match applied_code {
        Some(code) => writeln!(out, "\n {status}: {code}"),
        None => writeln!(out, "\n {status}"),
    }
    .map_err(|_err| ReceiptError::IO)
}

fn percent_points(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.1), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
