//! Portfolio Example
//!
//! Picks the best-returning shares from a fixture set within its budget.
//!
//! Use `-f` to load a fixture set by name
//! Use `-b` to override the budget, e.g. `-b "250.00 EUR"`
//! Use `-s compact` to solve with the rolling-row table

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use rusty_money::Money;
use tracing_subscriber::EnvFilter;

use satchel::{
    fixtures::{Fixture, shares::parse_price},
    report::Report,
    solvers::dynamic::{DynamicSolver, SolverConfig, table::ValueTable},
    utils::ExamplePortfolioArgs,
};

/// Portfolio Example
pub fn main() -> Result<()> {
    let args = ExamplePortfolioArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    let fixture = Fixture::from_set(&args.fixture)?;
    let catalog = fixture.catalog()?;

    let budget = match args.budget.as_deref() {
        Some(budget) => {
            let (minor, currency) = parse_price(budget)?;
            Money::from_minor(minor, currency)
        }
        None => fixture.budget()?,
    };
    let budget_minor = catalog.budget_units(&budget)?;

    let config = SolverConfig {
        strategy: args.strategy.into(),
        max_cells: args.max_cells,
    };

    let start = Instant::now();

    let prepared = catalog.prepare()?;
    let mut table = ValueTable::new();
    let solution = DynamicSolver::new(config).solve_in(prepared.items(), budget_minor, &mut table)?;

    let elapsed = start.elapsed();

    let report = Report::from_solution(&catalog, &prepared, &solution, budget_minor)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(
        handle,
        "\n {} shares offered, {} rejected",
        catalog.len(),
        prepared.rejected().len()
    )?;

    report.write_to(&mut handle)?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
