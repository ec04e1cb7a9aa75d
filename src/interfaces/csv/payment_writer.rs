use crate::application::checkout::{CheckoutOutcome, CheckoutResult};
use crate::domain::payment::Quote;
use crate::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;

/// Rounds half away from zero before formatting; `{:.2}` alone truncates.
fn cents(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[derive(Serialize)]
struct QuoteRow {
    amount: String,
    platform_fee: String,
    tip: String,
    total: String,
}

impl From<&Quote> for QuoteRow {
    fn from(quote: &Quote) -> Self {
        Self {
            amount: cents(quote.amount),
            platform_fee: cents(quote.platform_fee),
            tip: cents(quote.tip),
            total: cents(quote.total),
        }
    }
}

#[derive(Serialize)]
struct OutcomeRow<'a> {
    recipient: &'a str,
    kind: String,
    amount: String,
    platform_fee: String,
    tip: String,
    total: String,
    status: &'static str,
    reference: &'a str,
}

impl<'a> From<&'a CheckoutOutcome> for OutcomeRow<'a> {
    fn from(outcome: &'a CheckoutOutcome) -> Self {
        let (status, reference) = match &outcome.result {
            CheckoutResult::Succeeded(id) => ("succeeded", id.0.as_str()),
            CheckoutResult::Declined(message) => ("declined", message.as_str()),
        };
        Self {
            recipient: &outcome.recipient,
            kind: outcome.kind.to_string(),
            amount: cents(outcome.quote.amount),
            platform_fee: cents(outcome.quote.platform_fee),
            tip: cents(outcome.quote.tip),
            total: cents(outcome.quote.total),
            status,
            reference,
        }
    }
}

/// Writes a price breakdown as a single CSV row, amounts in cents precision.
pub struct QuoteWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> QuoteWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_quote(&mut self, quote: &Quote) -> Result<()> {
        self.writer.serialize(QuoteRow::from(quote))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes checkout outcomes as CSV as they complete.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcome(&mut self, outcome: &CheckoutOutcome) -> Result<()> {
        self.writer.serialize(OutcomeRow::from(outcome))?;
        self.writer.flush()?;
        Ok(())
    }
}
