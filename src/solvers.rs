//! Solvers for budgeted selection

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

use crate::items::Item;

pub mod dynamic;

/// The item field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    /// Item cost
    Cost,

    /// Item return
    Return,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemField::Cost => f.write_str("cost"),
            ItemField::Return => f.write_str("return"),
        }
    }
}

/// Solver Errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    /// An item carries a negative cost or return.
    #[error("item {index} has negative {field}: {value}")]
    InvalidItem {
        /// Index of the item in the input
        index: usize,
        /// Offending field
        field: ItemField,
        /// Offending value
        value: i64,
    },

    /// The budget is negative.
    #[error("budget must not be negative: {0}")]
    InvalidBudget(i64),

    /// A value does not fit the table's numeric width or the address space.
    #[error("{what} overflows the value table")]
    Overflow {
        /// What overflowed
        what: &'static str,
    },

    /// The value table would exceed the configured cell limit.
    #[error("value table needs {cells} cells, limit is {limit}")]
    TableTooLarge {
        /// Cells required
        cells: usize,
        /// Configured limit
        limit: usize,
    },

    /// The value table could not be allocated.
    #[error("cannot allocate a value table of {cells} cells")]
    Allocation {
        /// Cells requested
        cells: usize,
    },

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

impl SolverError {
    /// Returns true for errors caused by bad caller input rather than capacity limits.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SolverError::InvalidItem { .. } | SolverError::InvalidBudget(_)
        )
    }
}

/// An optimal selection over a borrowed item list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<'a> {
    best_return: i64,

    /// Indexes of selected items, ascending
    selected: SmallVec<[usize; 16]>,

    items: &'a [Item],
}

impl<'a> Solution<'a> {
    /// A solution that selects nothing.
    pub fn empty(items: &'a [Item]) -> Self {
        Self {
            best_return: 0,
            selected: SmallVec::new(),
            items,
        }
    }

    pub(crate) fn new(best_return: i64, selected: SmallVec<[usize; 16]>, items: &'a [Item]) -> Self {
        Self {
            best_return,
            selected,
            items,
        }
    }

    /// Maximum total return achievable within the budget
    pub fn best_return(&self) -> i64 {
        self.best_return
    }

    /// Indexes of the selected items in the input, in ascending order
    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    /// The selected items, in input order
    pub fn selected_items(&self) -> impl Iterator<Item = &'a Item> + '_ {
        self.selected.iter().filter_map(|&idx| self.items.get(idx))
    }

    /// Total cost of the selected items
    pub fn total_cost(&self) -> i64 {
        self.selected_items().map(Item::cost).sum()
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The items the solution was computed over
    pub fn items(&self) -> &'a [Item] {
        self.items
    }
}

/// Trait for choosing the best-returning subset of items within a budget
pub trait Solver {
    /// Solve for the given items and budget
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the input is invalid or the problem is too large.
    fn solve<'a>(&self, items: &'a [Item], budget: i64) -> Result<Solution<'a>, SolverError>;
}
