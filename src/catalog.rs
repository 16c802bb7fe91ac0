//! Catalog
//!
//! Shares priced in one currency, and their conversion into solver [`Item`]s.
//!
//! Costs become minor units. Returns are kept exact by measuring them in
//! [`RETURN_SCALE`] units per minor unit: a share costing 2050 minor units with a
//! 17.25% rate returns `2050 × 1725` units, which is 353.625 minor units.

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::items::Item;

/// Return units per currency minor unit
pub const RETURN_SCALE: i64 = 10_000;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A share's currency differs from the catalog currency (index, share currency, catalog currency).
    #[error("Share {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// Errors turning shares into solver items.
#[derive(Debug, Error, PartialEq)]
pub enum PreparationError {
    /// Rate has more precision than a basis point.
    #[error("rate {rate}% for {name} is finer than a basis point")]
    RatePrecision {
        /// Share name
        name: String,
        /// Offending rate, in percent
        rate: Decimal,
    },

    /// Cost times rate does not fit an `i64`.
    #[error("return for {name} overflows")]
    Overflow {
        /// Share name
        name: String,
    },
}

/// A share that can be bought once, at a fixed price, for a fixed profit rate.
#[derive(Clone, Debug, PartialEq)]
pub struct Share<'a> {
    name: String,
    price: Money<'a, Currency>,
    rate: Decimal,
}

impl<'a> Share<'a> {
    /// Creates a share. `rate` is a percentage, so `17.25` means 17.25%.
    pub fn new(name: impl Into<String>, price: Money<'a, Currency>, rate: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            rate,
        }
    }

    /// Share name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Share price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Profit rate in percent
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

/// Why a share was left out of the solver input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Price is zero or negative
    NonPositivePrice,

    /// Rate is zero or negative
    NonPositiveRate,

    /// An earlier share has the same name
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NonPositivePrice => f.write_str("price is not positive"),
            RejectReason::NonPositiveRate => f.write_str("rate is not positive"),
            RejectReason::Duplicate => f.write_str("duplicate name"),
        }
    }
}

/// A share that was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Index of the share in the catalog
    pub index: usize,

    /// Why it was rejected
    pub reason: RejectReason,
}

/// Solver input built from a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    items: Vec<Item>,

    /// Catalog index of each item
    sources: Vec<usize>,

    rejected: Vec<Rejection>,
}

impl Prepared {
    /// The solver items, in catalog order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Catalog index for the item at `item_idx`
    pub fn source(&self, item_idx: usize) -> Option<usize> {
        self.sources.get(item_idx).copied()
    }

    /// Shares that were left out
    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }
}

/// Catalog
#[derive(Debug)]
pub struct Catalog<'a> {
    shares: Vec<Share<'a>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            shares: Vec::new(),
            currency,
        }
    }

    /// Create a new catalog with the given shares.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if a share is priced in another currency.
    pub fn with_shares(
        shares: impl Into<Vec<Share<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let shares = shares.into();

        shares.iter().enumerate().try_for_each(|(i, share)| {
            let share_currency = share.price().currency();
            if share_currency == currency {
                Ok(())
            } else {
                Err(CatalogError::CurrencyMismatch(
                    i,
                    share_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        Ok(Catalog { shares, currency })
    }

    /// Get a share by catalog index
    pub fn get(&self, idx: usize) -> Option<&Share<'a>> {
        self.shares.get(idx)
    }

    /// Iterate over the shares in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Share<'a>> {
        self.shares.iter()
    }

    /// Get the number of shares in the catalog.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Converts a budget into minor units.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the budget is in another currency.
    pub fn budget_units(&self, budget: &Money<'_, Currency>) -> Result<i64, CatalogError> {
        if budget.currency() == self.currency {
            Ok(budget.to_minor_units())
        } else {
            Err(CatalogError::CurrencyMismatch(
                0,
                budget.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }

    /// Converts the catalog into solver items.
    ///
    /// Shares with a non-positive price or rate, and repeats of an earlier name,
    /// are left out and listed in [`Prepared::rejected`].
    ///
    /// # Errors
    ///
    /// - [`PreparationError::RatePrecision`] if a rate is finer than a basis point.
    /// - [`PreparationError::Overflow`] if a return cannot be represented.
    pub fn prepare(&self) -> Result<Prepared, PreparationError> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut prepared = Prepared {
            items: Vec::with_capacity(self.shares.len()),
            sources: Vec::with_capacity(self.shares.len()),
            rejected: Vec::new(),
        };

        for (index, share) in self.shares.iter().enumerate() {
            let cost = share.price().to_minor_units();

            let reason = if cost <= 0 {
                Some(RejectReason::NonPositivePrice)
            } else if share.rate() <= Decimal::ZERO {
                Some(RejectReason::NonPositiveRate)
            } else if !seen.insert(share.name()) {
                Some(RejectReason::Duplicate)
            } else {
                None
            };

            if let Some(reason) = reason {
                warn!(share = share.name(), index, %reason, "share rejected");
                prepared.rejected.push(Rejection { index, reason });
                continue;
            }

            let bps = rate_basis_points(share)?;
            let return_value = cost
                .checked_mul(bps)
                .ok_or_else(|| PreparationError::Overflow {
                    name: share.name().to_string(),
                })?;

            prepared
                .items
                .push(Item::new(share.name(), cost, return_value));
            prepared.sources.push(index);
        }

        debug!(
            accepted = prepared.items.len(),
            rejected = prepared.rejected.len(),
            "catalog prepared"
        );

        Ok(prepared)
    }
}

/// Percent rate as whole basis points, rejecting anything finer.
fn rate_basis_points(share: &Share<'_>) -> Result<i64, PreparationError> {
    let precision = || PreparationError::RatePrecision {
        name: share.name().to_string(),
        rate: share.rate(),
    };

    let bps = share
        .rate()
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(precision)?;

    if !bps.fract().is_zero() {
        return Err(precision());
    }

    bps.to_i64().ok_or_else(|| PreparationError::Overflow {
        name: share.name().to_string(),
    })
}

/// Converts return units back into an exact decimal amount of money.
pub fn return_amount(units: i64, currency: &Currency) -> Decimal {
    let minor = Decimal::from(units) / Decimal::from(RETURN_SCALE);

    minor / Decimal::from(10_i64.pow(currency.exponent))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn share(name: &str, minor: i64, rate: Decimal) -> Share<'static> {
        Share::new(name, Money::from_minor(minor, iso::EUR), rate)
    }

    #[test]
    fn with_shares_currency_mismatch_errors() {
        let shares = [
            share("A", 100, Decimal::from(5)),
            Share::new("B", Money::from_minor(100, iso::GBP), Decimal::from(5)),
        ];

        assert_eq!(
            Catalog::with_shares(shares, iso::EUR).err(),
            Some(CatalogError::CurrencyMismatch(
                1,
                iso::GBP.iso_alpha_code,
                iso::EUR.iso_alpha_code,
            ))
        );
    }

    #[test]
    fn prepare_converts_exactly() -> TestResult {
        let catalog = Catalog::with_shares([share("A", 2050, Decimal::new(1725, 2))], iso::EUR)?;

        let prepared = catalog.prepare()?;

        assert_eq!(prepared.items(), [Item::new("A", 2050, 2050 * 1725)]);
        assert_eq!(prepared.source(0), Some(0));

        Ok(())
    }

    #[test]
    fn prepare_drops_non_positive_and_duplicates() -> TestResult {
        let catalog = Catalog::with_shares(
            [
                share("Zero", 0, Decimal::from(5)),
                share("A", 100, Decimal::from(5)),
                share("Negative", -100, Decimal::from(5)),
                share("Flat", 100, Decimal::from(0)),
                share("A", 300, Decimal::from(9)),
                share("B", 200, Decimal::new(15, 1)),
            ],
            iso::EUR,
        )?;

        let prepared = catalog.prepare()?;

        let ids: Vec<&str> = prepared.items().iter().map(Item::id).collect();
        assert_eq!(ids, ["A", "B"]);
        assert_eq!(prepared.source(1), Some(5));

        let reasons: Vec<(usize, RejectReason)> = prepared
            .rejected()
            .iter()
            .map(|rejection| (rejection.index, rejection.reason))
            .collect();

        assert_eq!(
            reasons,
            [
                (0, RejectReason::NonPositivePrice),
                (2, RejectReason::NonPositivePrice),
                (3, RejectReason::NonPositiveRate),
                (4, RejectReason::Duplicate),
            ]
        );

        Ok(())
    }

    #[test]
    fn prepare_rejects_sub_basis_point_rates() -> TestResult {
        let catalog = Catalog::with_shares([share("A", 100, Decimal::new(1234, 3))], iso::EUR)?;

        assert_eq!(
            catalog.prepare(),
            Err(PreparationError::RatePrecision {
                name: "A".to_string(),
                rate: Decimal::new(1234, 3),
            })
        );

        Ok(())
    }

    #[test]
    fn prepare_reports_overflow() -> TestResult {
        let catalog = Catalog::with_shares([share("A", i64::MAX / 2, Decimal::from(50))], iso::EUR)?;

        assert_eq!(
            catalog.prepare(),
            Err(PreparationError::Overflow {
                name: "A".to_string()
            })
        );

        Ok(())
    }

    #[test]
    fn budget_units_checks_currency() -> TestResult {
        let catalog = Catalog::new(iso::EUR);

        assert_eq!(catalog.budget_units(&Money::from_minor(50_000, iso::EUR))?, 50_000);
        assert!(catalog.budget_units(&Money::from_minor(1, iso::USD)).is_err());

        Ok(())
    }

    #[test]
    fn return_amount_is_exact() {
        assert_eq!(return_amount(2050 * 1725, iso::EUR), Decimal::new(353625, 5));
        assert_eq!(return_amount(0, iso::EUR), Decimal::ZERO);
    }
}
