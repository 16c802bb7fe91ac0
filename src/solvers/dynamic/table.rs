//! Value Table
//!
//! Caller-owned scratch storage for the dynamic solver. A table can be passed to
//! [`super::DynamicSolver::solve_in`] repeatedly so the allocation is reused; its
//! contents are overwritten on every call and never carried between solves.

use super::decisions::Decisions;
use crate::solvers::SolverError;

/// Best-return cells indexed by (items considered, budget level), stored row-major.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    cells: Vec<u64>,
    rows: usize,
    columns: usize,
    decisions: Decisions,
}

impl ValueTable {
    /// Creates an empty table. Nothing is allocated until the first solve.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in use (items considered + 1)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in use (budget levels + 1)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Allocated size in bytes, including the decision bitset
    pub fn capacity_bytes(&self) -> usize {
        self.cells.capacity() * size_of::<u64>() + self.decisions.capacity_bytes()
    }

    /// Reads a cell
    pub fn get(&self, row: usize, column: usize) -> Option<u64> {
        if column >= self.columns {
            return None;
        }

        self.cells.get(row * self.columns + column).copied()
    }

    /// Zero `rows × columns` cells for a full-table solve.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Allocation`] if the cells cannot be allocated.
    pub(crate) fn reset_full(&mut self, rows: usize, columns: usize) -> Result<(), SolverError> {
        let cells = rows
            .checked_mul(columns)
            .ok_or(SolverError::Allocation { cells: usize::MAX })?;

        zeroed(&mut self.cells, cells)?;
        self.decisions.reset(0, 0)?;
        self.rows = rows;
        self.columns = columns;

        Ok(())
    }

    /// Zero a single rolling row and a decision bitset for `items` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Allocation`] if the row or bitset cannot be allocated.
    pub(crate) fn reset_compact(&mut self, items: usize, columns: usize) -> Result<(), SolverError> {
        zeroed(&mut self.cells, columns)?;
        self.decisions.reset(items, columns)?;
        self.rows = 1;
        self.columns = columns;

        Ok(())
    }

    /// Splits out the previous row (read-only) and row `row` (writable).
    pub(crate) fn split_rows(&mut self, row: usize) -> Option<(&[u64], &mut [u64])> {
        let start = row.checked_sub(1)? * self.columns;
        let end = start + 2 * self.columns;
        let pair = self.cells.get_mut(start..end)?;

        let (previous, current) = pair.split_at_mut(self.columns);

        Some((&*previous, current))
    }

    pub(crate) fn rolling_row_mut(&mut self) -> &mut [u64] {
        &mut self.cells
    }

    pub(crate) fn decisions(&self) -> &Decisions {
        &self.decisions
    }

    pub(crate) fn decisions_mut(&mut self) -> &mut Decisions {
        &mut self.decisions
    }
}

/// Clears `cells` and refills it with `len` zeroes without panicking on allocation failure.
pub(super) fn zeroed(cells: &mut Vec<u64>, len: usize) -> Result<(), SolverError> {
    cells.clear();
    cells
        .try_reserve_exact(len)
        .map_err(|_err| SolverError::Allocation { cells: len })?;
    cells.resize(len, 0);

    Ok(())
}
