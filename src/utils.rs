//! Utils

use clap::{Parser, ValueEnum};

use crate::solvers::dynamic::Strategy;

/// Arguments for the portfolio demo
#[derive(Debug, Parser)]
pub struct ExamplePortfolioArgs {
    /// Fixture set to load from `fixtures/portfolios`
    #[clap(short, long, default_value = "small")]
    pub fixture: String,

    /// Budget override (e.g., "250.00 EUR")
    #[clap(short, long)]
    pub budget: Option<String>,

    /// Value table storage
    #[clap(short, long, value_enum, default_value_t = StrategyArg::Full)]
    pub strategy: StrategyArg,

    /// Refuse to solve if the value table would need more cells than this
    #[clap(long)]
    pub max_cells: Option<usize>,

    /// Log filter used when `RUST_LOG` is not set
    #[clap(long, default_value = "warn")]
    pub log: String,
}

/// Value table storage, as a command line value
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Full value table
    Full,

    /// Rolling row and decision bits
    Compact,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Full => Strategy::FullTable,
            StrategyArg::Compact => Strategy::Compact,
        }
    }
}
