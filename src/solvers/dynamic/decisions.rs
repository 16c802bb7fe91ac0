//! Decision bitset for the compact strategy

use super::table::zeroed;
use crate::solvers::SolverError;

/// One bit per (item, budget) cell, set when including the item won the cell.
#[derive(Debug, Clone, Default)]
pub struct Decisions {
    words: Vec<u64>,
    columns: usize,
}

impl Decisions {
    /// Clear and size the bitset for `rows` items and `columns` budget levels.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Allocation`] if the bitset cannot be allocated.
    pub(crate) fn reset(&mut self, rows: usize, columns: usize) -> Result<(), SolverError> {
        let bits = rows
            .checked_mul(columns)
            .ok_or(SolverError::Allocation { cells: usize::MAX })?;

        zeroed(&mut self.words, bits.div_ceil(64))?;
        self.columns = columns;

        Ok(())
    }

    pub(crate) fn set(&mut self, row: usize, column: usize) {
        let bit = row * self.columns + column;

        if let Some(word) = self.words.get_mut(bit / 64) {
            *word |= 1 << (bit % 64);
        }
    }

    pub(crate) fn get(&self, row: usize, column: usize) -> bool {
        let bit = row * self.columns + column;

        self.words
            .get(bit / 64)
            .is_some_and(|word| word & (1 << (bit % 64)) != 0)
    }

    /// Allocated size in bytes
    pub fn capacity_bytes(&self) -> usize {
        self.words.capacity() * size_of::<u64>()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_bits_are_read_back() -> TestResult {
        let mut decisions = Decisions::default();
        decisions.reset(3, 70)?;

        decisions.set(0, 0);
        decisions.set(1, 69);
        decisions.set(2, 5);

        assert!(decisions.get(0, 0));
        assert!(decisions.get(1, 69));
        assert!(decisions.get(2, 5));
        assert!(!decisions.get(1, 68));
        assert!(!decisions.get(2, 6));

        Ok(())
    }

    #[test]
    fn reset_clears_previous_bits() -> TestResult {
        let mut decisions = Decisions::default();
        decisions.reset(2, 10)?;
        decisions.set(1, 3);

        decisions.reset(2, 10)?;

        assert!(!decisions.get(1, 3));

        Ok(())
    }

    #[test]
    fn out_of_range_reads_are_false() -> TestResult {
        let mut decisions = Decisions::default();
        decisions.reset(1, 4)?;

        assert!(!decisions.get(10, 10));

        Ok(())
    }

    #[test]
    fn oversized_bitset_is_an_error() {
        let mut decisions = Decisions::default();

        assert_eq!(
            decisions.reset(usize::MAX, 2),
            Err(SolverError::Allocation { cells: usize::MAX })
        );
    }
}
