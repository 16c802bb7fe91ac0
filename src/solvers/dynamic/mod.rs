//! Dynamic Programming Solver
//!
//! Exact 0/1 knapsack over integer costs and returns.
//!
//! Time is `O(n × budget)`. Space depends on the [`Strategy`]:
//!
//! - [`Strategy::FullTable`] keeps every row, `8 × (n + 1) × (budget + 1)` bytes.
//! - [`Strategy::Compact`] keeps one rolling row plus one decision bit per cell,
//!   roughly `8 × (budget + 1) + n × (budget + 1) / 8` bytes.
//!
//! The budget is in currency minor units, so memory grows linearly with it: a
//! 500.00 budget over 1000 items is about 400MB with the full table and about
//! 6MB compact. Budgets above the total cost of all items are clamped to that
//! total before allocating; the extra columns could never change the result.
//!
//! # Ties
//!
//! When including and excluding an item give the same value, the item is
//! included. Both strategies apply the same rule and so return the same
//! selection. The walk runs from the last item to the first, so among
//! equal-valued alternatives the later items win.
//!
//! A zero budget selects nothing, even zero-cost items. With any positive budget,
//! zero-cost items are always selected.

use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use crate::{
    items::{Item, total_cost, total_return},
    solvers::{ItemField, Solution, Solver, SolverError},
};

pub mod decisions;
pub mod table;

use table::ValueTable;

/// How the value table is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Keep every row and backtrack by comparing values
    #[default]
    FullTable,

    /// Keep one rolling row and a decision bitset
    Compact,
}

/// Configuration for the dynamic solver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Table storage strategy
    pub strategy: Strategy,

    /// Maximum number of value cells a single solve may address
    pub max_cells: Option<usize>,
}

impl SolverConfig {
    /// Full table, no cell limit
    #[must_use]
    pub const fn full_table() -> Self {
        Self {
            strategy: Strategy::FullTable,
            max_cells: None,
        }
    }

    /// Compact storage, no cell limit
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            strategy: Strategy::Compact,
            max_cells: None,
        }
    }

    /// Same configuration with a cell limit
    #[must_use]
    pub const fn with_max_cells(self, limit: usize) -> Self {
        Self {
            max_cells: Some(limit),
            ..self
        }
    }
}

/// Dynamic programming solver
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicSolver {
    config: SolverConfig,
}

impl DynamicSolver {
    /// Create a solver with the given configuration
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve using a caller-owned table, reusing its allocation.
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidBudget`] / [`SolverError::InvalidItem`] for negative input.
    /// - [`SolverError::Overflow`] if the total return does not fit an `i64`, or the
    ///   table cannot be addressed.
    /// - [`SolverError::TableTooLarge`] if the configured cell limit is exceeded.
    /// - [`SolverError::Allocation`] if the table cannot be allocated.
    pub fn solve_in<'a>(
        &self,
        items: &'a [Item],
        budget: i64,
        table: &mut ValueTable,
    ) -> Result<Solution<'a>, SolverError> {
        let _span = debug_span!(
            "solve",
            items = items.len(),
            budget,
            strategy = ?self.config.strategy
        )
        .entered();

        let budget = validate(items, budget)?;

        if items.is_empty() || budget == 0 {
            debug!("nothing to select");
            return Ok(Solution::empty(items));
        }

        let columns = columns_for(items, budget)?;
        let rows = items.len() + 1;

        let cells = rows.checked_mul(columns).ok_or(SolverError::Overflow {
            what: "cell count",
        })?;

        if let Some(limit) = self.config.max_cells
            && cells > limit
        {
            return Err(SolverError::TableTooLarge { cells, limit });
        }

        trace!(rows, columns, cells, "allocating value table");

        let solution = match self.config.strategy {
            Strategy::FullTable => solve_full(items, columns, table)?,
            Strategy::Compact => solve_compact(items, columns, table)?,
        };

        debug!(
            best_return = solution.best_return(),
            selected = solution.len(),
            table_bytes = table.capacity_bytes(),
            "solved"
        );

        Ok(solution)
    }
}

impl Solver for DynamicSolver {
    fn solve<'a>(&self, items: &'a [Item], budget: i64) -> Result<Solution<'a>, SolverError> {
        self.solve_in(items, budget, &mut ValueTable::new())
    }
}

/// Rejects negative input and anything whose total return cannot be held.
fn validate(items: &[Item], budget: i64) -> Result<usize, SolverError> {
    let budget = usize::try_from(budget).map_err(|_err| {
        if budget < 0 {
            SolverError::InvalidBudget(budget)
        } else {
            SolverError::Overflow { what: "budget" }
        }
    })?;

    for (index, item) in items.iter().enumerate() {
        if item.cost() < 0 {
            return Err(SolverError::InvalidItem {
                index,
                field: ItemField::Cost,
                value: item.cost(),
            });
        }

        if item.return_value() < 0 {
            return Err(SolverError::InvalidItem {
                index,
                field: ItemField::Return,
                value: item.return_value(),
            });
        }
    }

    // No cell can exceed the sum of all returns, so this bounds every addition.
    total_return(items).ok_or(SolverError::Overflow {
        what: "total return",
    })?;

    Ok(budget)
}

/// Columns needed: `min(budget, total cost) + 1`.
fn columns_for(items: &[Item], budget: usize) -> Result<usize, SolverError> {
    let reachable = total_cost(items)
        .and_then(|total| usize::try_from(total).ok())
        .map_or(budget, |total| total.min(budget));

    reachable.checked_add(1).ok_or(SolverError::Overflow {
        what: "budget",
    })
}

/// Cost as a column offset. Costs beyond the address space can never fit.
fn cost_columns(item: &Item) -> usize {
    usize::try_from(item.cost()).unwrap_or(usize::MAX)
}

/// Return as a cell value.
///
/// Only valid after [`validate`] has rejected negative returns; a negative
/// return would otherwise be read as zero.
fn return_cells(item: &Item) -> u64 {
    debug_assert!(item.return_value() >= 0, "return_cells before validate");

    u64::try_from(item.return_value()).unwrap_or(0)
}

fn best_return(value: u64) -> Result<i64, SolverError> {
    i64::try_from(value).map_err(|_err| SolverError::Overflow {
        what: "best return",
    })
}

fn invariant(message: &'static str) -> SolverError {
    SolverError::InvariantViolation { message }
}

fn solve_full<'a>(
    items: &'a [Item],
    columns: usize,
    table: &mut ValueTable,
) -> Result<Solution<'a>, SolverError> {
    table.reset_full(items.len() + 1, columns)?;

    for (idx, item) in items.iter().enumerate() {
        let (previous, current) = table
            .split_rows(idx + 1)
            .ok_or_else(|| invariant("value table row out of range"))?;

        fill_row(previous, current, cost_columns(item), return_cells(item));
    }

    let best = table
        .get(items.len(), columns - 1)
        .ok_or_else(|| invariant("value table corner out of range"))?;

    let mut selected: SmallVec<[usize; 16]> = SmallVec::new();
    let mut remaining = columns - 1;

    for (idx, item) in items.iter().enumerate().rev() {
        let Some(rest) = remaining.checked_sub(cost_columns(item)) else {
            continue;
        };

        let here = table
            .get(idx + 1, remaining)
            .ok_or_else(|| invariant("backtrack cell out of range"))?;
        let without = table
            .get(idx, rest)
            .ok_or_else(|| invariant("backtrack cell out of range"))?;

        if here == without + return_cells(item) {
            selected.push(idx);
            remaining = rest;
        }
    }

    selected.reverse();

    Ok(Solution::new(best_return(best)?, selected, items))
}

/// Writes one row of the table from the previous one.
fn fill_row(previous: &[u64], current: &mut [u64], cost: usize, value: u64) {
    for (budget, (cell, &exclude)) in current.iter_mut().zip(previous).enumerate() {
        *cell = match budget.checked_sub(cost).and_then(|rest| previous.get(rest)) {
            Some(&rest) => exclude.max(rest + value),
            None => exclude,
        };
    }
}

fn solve_compact<'a>(
    items: &'a [Item],
    columns: usize,
    table: &mut ValueTable,
) -> Result<Solution<'a>, SolverError> {
    table.reset_compact(items.len(), columns)?;

    for (idx, item) in items.iter().enumerate() {
        let cost = cost_columns(item);
        let value = return_cells(item);

        // High to low, so `budget - cost` still holds the previous row's value.
        for budget in (cost..columns).rev() {
            let row = table.rolling_row_mut();

            let include = row
                .get(budget - cost)
                .ok_or_else(|| invariant("rolling row out of range"))?
                + value;

            let cell = row
                .get_mut(budget)
                .ok_or_else(|| invariant("rolling row out of range"))?;

            if include >= *cell {
                *cell = include;
                table.decisions_mut().set(idx, budget);
            }
        }
    }

    let best = table
        .get(0, columns - 1)
        .ok_or_else(|| invariant("rolling row out of range"))?;

    let mut selected: SmallVec<[usize; 16]> = SmallVec::new();
    let mut remaining = columns - 1;

    for (idx, item) in items.iter().enumerate().rev() {
        if table.decisions().get(idx, remaining) {
            selected.push(idx);
            remaining = remaining
                .checked_sub(cost_columns(item))
                .ok_or_else(|| invariant("decision recorded for an item that does not fit"))?;
        }
    }

    selected.reverse();

    Ok(Solution::new(best_return(best)?, selected, items))
}
