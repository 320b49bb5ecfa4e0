//! The copy constraints of a circuit, as cycles over its cells.
//!
//! Cells are addressed by `(column, row)` where `column` is the position of
//! the column in the permutation argument. The store keeps three tables:
//!
//! - `mapping`: the next cell of the cycle of each cell,
//! - `aux`: the representative of the cycle of each cell,
//! - `sizes`: the size of each cycle, at its representative.

use crate::{
    circuits::column::{Any, Column},
    error::SynthesisError,
    permutation::Argument,
};

pub type Label = (usize, usize);

#[derive(Clone, Debug)]
pub struct Assembly {
    columns: Vec<Column<Any>>,
    mapping: Vec<Vec<Label>>,
    aux: Vec<Vec<Label>>,
    sizes: Vec<Vec<usize>>,
}

impl Assembly {
    /// Every cell starts in a cycle of its own.
    pub fn new(n: usize, argument: &Argument) -> Self {
        let identity: Vec<Vec<Label>> = (0..argument.columns().len())
            .map(|column| (0..n).map(|row| (column, row)).collect())
            .collect();
        Assembly {
            columns: argument.columns().to_vec(),
            mapping: identity.clone(),
            aux: identity,
            sizes: vec![vec![1; n]; argument.columns().len()],
        }
    }

    /// Puts the two cells in the same cycle, merging the smaller cycle into
    /// the larger one.
    pub fn copy(
        &mut self,
        left_column: Column<Any>,
        left_row: usize,
        right_column: Column<Any>,
        right_row: usize,
    ) -> Result<(), SynthesisError> {
        let left_column = self.position(left_column)?;
        let right_column = self.position(right_column)?;

        if left_row >= self.mapping[left_column].len()
            || right_row >= self.mapping[right_column].len()
        {
            return Err(SynthesisError::BoundsFailure);
        }

        let mut left_cycle = self.aux[left_column][left_row];
        let mut right_cycle = self.aux[right_column][right_row];
        if left_cycle == right_cycle {
            return Ok(());
        }

        if self.sizes[left_cycle.0][left_cycle.1] < self.sizes[right_cycle.0][right_cycle.1] {
            std::mem::swap(&mut left_cycle, &mut right_cycle);
        }

        // merge the right cycle into the left one
        self.sizes[left_cycle.0][left_cycle.1] += self.sizes[right_cycle.0][right_cycle.1];
        let mut cell = right_cycle;
        loop {
            self.aux[cell.0][cell.1] = left_cycle;
            cell = self.mapping[cell.0][cell.1];
            if cell == right_cycle {
                break;
            }
        }

        let tmp = self.mapping[left_column][left_row];
        self.mapping[left_column][left_row] = self.mapping[right_column][right_row];
        self.mapping[right_column][right_row] = tmp;

        Ok(())
    }

    fn position(&self, column: Column<Any>) -> Result<usize, SynthesisError> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .ok_or(SynthesisError::ColumnNotInPermutation(column))
    }

    pub fn columns(&self) -> &[Column<Any>] {
        &self.columns
    }

    pub fn mapping(&self) -> &[Vec<Label>] {
        &self.mapping
    }

    pub fn aux(&self) -> &[Vec<Label>] {
        &self.aux
    }

    pub fn sizes(&self) -> &[Vec<usize>] {
        &self.sizes
    }
}
