//! Report
//!
//! Turns a [`Solution`] back into money and renders it as a table.

use std::{cmp::Reverse, io};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    catalog::{Catalog, Prepared, RETURN_SCALE, return_amount},
    solvers::Solution,
};

/// Errors that can occur when building or writing a report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A selected item has no share in the catalog.
    #[error("no share for selected item {0}")]
    MissingShare(usize),

    /// A total does not fit in minor units.
    #[error("report total overflows")]
    Overflow,

    /// IO error
    #[error("IO error")]
    IO,
}

/// One bought share
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine<'a> {
    /// Share name
    pub name: String,

    /// Price paid
    pub price: Money<'a, Currency>,

    /// Profit rate in percent
    pub rate: Decimal,

    /// Return in fixed-point return units
    pub return_units: i64,

    /// Exact return in currency units
    pub return_amount: Decimal,
}

/// Selected shares with their totals
#[derive(Debug, Clone)]
pub struct Report<'a> {
    /// Sorted by return, highest first
    lines: Vec<ReportLine<'a>>,

    budget: Money<'a, Currency>,

    total_cost: Money<'a, Currency>,

    remaining: Money<'a, Currency>,

    /// Exact best return in return units
    best_return_units: i64,

    currency: &'static Currency,
}

impl<'a> Report<'a> {
    /// Build a report for a solution over a prepared catalog.
    ///
    /// # Errors
    ///
    /// - [`ReportError::MissingShare`] if a selected item cannot be traced back to a share.
    /// - [`ReportError::Overflow`] if the remaining budget cannot be represented.
    pub fn from_solution(
        catalog: &Catalog<'a>,
        prepared: &Prepared,
        solution: &Solution<'_>,
        budget_minor: i64,
    ) -> Result<Self, ReportError> {
        let currency = catalog.currency();

        let mut lines = solution
            .selected_indices()
            .iter()
            .zip(solution.selected_items())
            .map(|(&item_idx, item)| {
                let share = prepared
                    .source(item_idx)
                    .and_then(|source| catalog.get(source))
                    .ok_or(ReportError::MissingShare(item_idx))?;

                Ok(ReportLine {
                    name: share.name().to_string(),
                    price: *share.price(),
                    rate: share.rate(),
                    return_units: item.return_value(),
                    return_amount: return_amount(item.return_value(), currency),
                })
            })
            .collect::<Result<Vec<_>, ReportError>>()?;

        lines.sort_by(|a, b| {
            Reverse(a.return_units)
                .cmp(&Reverse(b.return_units))
                .then_with(|| a.name.cmp(&b.name))
        });

        let cost_minor = solution.total_cost();
        let remaining_minor = budget_minor
            .checked_sub(cost_minor)
            .ok_or(ReportError::Overflow)?;

        Ok(Self {
            lines,
            budget: Money::from_minor(budget_minor, currency),
            total_cost: Money::from_minor(cost_minor, currency),
            remaining: Money::from_minor(remaining_minor, currency),
            best_return_units: solution.best_return(),
            currency,
        })
    }

    /// Bought shares, highest return first
    pub fn lines(&self) -> &[ReportLine<'a>] {
        &self.lines
    }

    /// Budget available
    pub fn budget(&self) -> Money<'a, Currency> {
        self.budget
    }

    /// Total paid for the selected shares
    pub fn total_cost(&self) -> Money<'a, Currency> {
        self.total_cost
    }

    /// Budget left over
    pub fn remaining(&self) -> Money<'a, Currency> {
        self.remaining
    }

    /// Exact best return in currency units
    pub fn best_return(&self) -> Decimal {
        return_amount(self.best_return_units, self.currency)
    }

    /// Best return rounded to the currency's minor unit (half to even).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Overflow`] if the rounded value does not fit in minor units.
    pub fn best_return_money(&self) -> Result<Money<'a, Currency>, ReportError> {
        let minor = rounded_minor(self.best_return_units).ok_or(ReportError::Overflow)?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Return as a percentage of the amount spent, two decimal places.
    ///
    /// `None` when nothing was spent.
    pub fn yield_percent(&self) -> Option<Decimal> {
        let spent = Decimal::from(self.total_cost.to_minor_units());

        if spent.is_zero() {
            return None;
        }

        let ratio = Decimal::from(self.best_return_units)
            .checked_div(spent * Decimal::from(RETURN_SCALE))?;

        Some((ratio * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Writes the report table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Share", "Price", "Profit", "Return"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let rounded = Money::from_minor(
                rounded_minor(line.return_units).ok_or(ReportError::Overflow)?,
                self.currency,
            );

            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                format!("{}", line.price),
                format!("{}%", line.rate.normalize()),
                format!("{rounded}"),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReportError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReportError> {
        let best_return = self.best_return_money()?;
        let yield_percent = self
            .yield_percent()
            .map_or_else(|| "-".to_string(), |percent| format!("{percent}%"));

        let rows = [
            (" Shares:", self.lines.len().to_string()),
            (" Budget:", format!("{}", self.budget)),
            (" Total cost:", format!("{}", self.total_cost)),
            (" Remaining:", format!("{}", self.remaining)),
            (" Return:", format!("{best_return}")),
            (" Yield:", yield_percent),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, "{label:<label_width$} {value:>value_width$}")
                .map_err(|_err| ReportError::IO)?;
        }

        writeln!(out).map_err(|_err| ReportError::IO)
    }
}

/// Return units to whole minor units, half to even.
fn rounded_minor(units: i64) -> Option<i64> {
    (Decimal::from(units) / Decimal::from(RETURN_SCALE))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}
