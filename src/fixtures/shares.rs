//! Share Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{catalog::Share, fixtures::FixtureError};

/// Portfolio file: a budget and the shares on offer
#[derive(Debug, Deserialize)]
pub struct PortfolioFixture {
    /// Budget (e.g., "500.00 EUR")
    pub budget: String,

    /// Shares, in the order they are offered
    pub shares: Vec<ShareFixture>,
}

/// Share Fixture
#[derive(Debug, Deserialize)]
pub struct ShareFixture {
    /// Share name
    pub name: String,

    /// Share price (e.g., "20.50 EUR")
    pub price: String,

    /// Profit rate after two years (e.g., "17.25%")
    pub profit: String,
}

impl TryFrom<ShareFixture> for Share<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ShareFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let rate = parse_rate(&fixture.profit)?;

        Ok(Share::new(
            fixture.name,
            Money::from_minor(minor_units, currency),
            rate,
        ))
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// The amount must be exact in the currency's minor unit: "2.999 GBP" is rejected
/// rather than rounded.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number with at most the currency's number
/// of decimal places, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    if !minor.fract().is_zero() {
        return Err(FixtureError::InvalidPrice(format!(
            "{s} has more than {} decimal places",
            currency.exponent
        )));
    }

    let minor_units = minor
        .to_i64()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse a profit rate in percent (e.g., "17.25%" or "17.25")
///
/// Both forms mean 17.25 percent.
///
/// # Errors
///
/// Returns an error if the string is not a decimal number.
pub fn parse_rate(s: &str) -> Result<Decimal, FixtureError> {
    let trimmed = s.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    number
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidRate(s.to_string()))
}
