//! Fixtures
//!
//! Portfolio sets are YAML files under `<base>/portfolios/<name>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError, Share},
    fixtures::shares::{PortfolioFixture, parse_price},
};

pub mod shares;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid rate format
    #[error("Invalid rate format: {0}")]
    InvalidRate(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between shares or budget
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No portfolio loaded yet
    #[error("No portfolio loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog creation error
    #[error("Failed to create catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    shares: Vec<Share<'a>>,

    budget: Option<Money<'a, Currency>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            shares: Vec::new(),
            budget: None,
            currency: None,
        }
    }

    /// Load a portfolio (budget and shares) from a YAML fixture file.
    ///
    /// Loading more than one portfolio appends the shares; the last budget wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price, rate or
    /// currency is invalid, or if currencies differ.
    pub fn load_portfolio(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("portfolios")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PortfolioFixture = serde_norway::from_str(&contents)?;

        let (budget_minor, budget_currency) = parse_price(&fixture.budget)?;
        self.check_currency(budget_currency)?;
        self.budget = Some(Money::from_minor(budget_minor, budget_currency));

        for share_fixture in fixture.shares {
            // Parse to get currency first (before creating Share)
            let (_minor_units, currency) = parse_price(&share_fixture.price)?;
            self.check_currency(currency)?;

            let share: Share<'a> = share_fixture.try_into()?;
            self.shares.push(share);
        }

        debug!(
            path = %file_path.display(),
            shares = self.shares.len(),
            "portfolio loaded"
        );

        Ok(self)
    }

    /// Load a complete fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_portfolio(name)?;

        Ok(fixture)
    }

    fn check_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        match self.currency {
            Some(existing) if existing != currency => Err(FixtureError::CurrencyMismatch(
                existing.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            )),
            Some(_) => Ok(()),
            None => {
                self.currency = Some(currency);
                Ok(())
            }
        }
    }

    /// Create a catalog from the loaded shares
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded.
    pub fn catalog(&self) -> Result<Catalog<'a>, FixtureError> {
        let currency = self.currency()?;

        Ok(Catalog::with_shares(self.shares.clone(), currency)?)
    }

    /// The budget from the last loaded portfolio
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded.
    pub fn budget(&self) -> Result<Money<'a, Currency>, FixtureError> {
        self.budget.ok_or(FixtureError::NoCurrency)
    }

    /// Get the currency for the fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if no currency has been set.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Loaded shares, in file order
    pub fn shares(&self) -> &[Share<'a>] {
        &self.shares
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
